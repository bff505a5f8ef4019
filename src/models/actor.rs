use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Film;
use crate::domain::{ActorId, Gender};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub surname: String,
    pub gender: Gender,
    pub birthday: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorInput {
    pub name: String,
    pub surname: String,
    pub gender: Gender,
    pub birthday: NaiveDate,
}

impl ActorInput {
    #[must_use]
    pub fn with_id(self, id: ActorId) -> Actor {
        Actor {
            id,
            name: self.name,
            surname: self.surname,
            gender: self.gender,
            birthday: self.birthday,
        }
    }
}

/// An actor together with every film it is linked to.
///
/// Serializes flat: the actor's fields followed by a `films` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorWithFilms {
    #[serde(flatten)]
    pub actor: Actor,
    pub films: Vec<Film>,
}
