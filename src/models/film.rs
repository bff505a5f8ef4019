use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::FilmId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    pub name: String,
    pub description: String,
    pub date_of_release: NaiveDate,
    pub rating: f64,
}

/// Film fields without an id, used when the database assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmInput {
    pub name: String,
    pub description: String,
    pub date_of_release: NaiveDate,
    pub rating: f64,
}

impl FilmInput {
    #[must_use]
    pub fn with_id(self, id: FilmId) -> Film {
        Film {
            id,
            name: self.name,
            description: self.description,
            date_of_release: self.date_of_release,
            rating: self.rating,
        }
    }
}
