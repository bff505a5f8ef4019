use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set, TransactionTrait,
};
use std::collections::HashMap;

use super::search_key;
use crate::domain::{ActorId, FilmId, Gender};
use crate::entities::prelude::*;
use crate::entities::{actors, film_actors, films};
use crate::models::{Actor, ActorInput, ActorWithFilms, Film};

#[async_trait]
pub trait ActorRepository: Send + Sync {
    async fn get_actors(&self) -> Result<Vec<ActorWithFilms>>;

    async fn get_actor_by_id(&self, id: ActorId) -> Result<Option<ActorWithFilms>>;

    async fn add_actor(&self, actor: &ActorInput) -> Result<ActorId>;

    /// Returns `false` when no actor has the given id.
    async fn update_actor(&self, actor: &Actor) -> Result<bool>;

    /// Removes the actor and its film links. Returns `false` when no actor
    /// has the given id.
    async fn delete_actor(&self, id: ActorId) -> Result<bool>;
}

/// One row of `actors LEFT JOIN film_actors LEFT JOIN films`. Film columns are null
/// for an actor without films.
#[derive(Debug, Clone, FromQueryResult)]
struct ActorFilmRow {
    actor_id: i32,
    actor_name: String,
    actor_surname: String,
    actor_gender: String,
    actor_birthday: NaiveDate,
    film_id: Option<i32>,
    film_name: Option<String>,
    film_description: Option<String>,
    film_date_of_release: Option<NaiveDate>,
    film_rating: Option<f64>,
}

impl ActorFilmRow {
    fn actor(&self) -> Result<Actor> {
        let gender: Gender = self
            .actor_gender
            .parse()
            .with_context(|| format!("Actor {} has a corrupt gender", self.actor_id))?;

        Ok(Actor {
            id: ActorId::new(self.actor_id),
            name: self.actor_name.clone(),
            surname: self.actor_surname.clone(),
            gender,
            birthday: self.actor_birthday,
        })
    }

    fn film(&self) -> Option<Film> {
        Some(Film {
            id: FilmId::new(self.film_id?),
            name: self.film_name.clone()?,
            description: self.film_description.clone()?,
            date_of_release: self.film_date_of_release?,
            rating: self.film_rating?,
        })
    }
}

/// Folds flat join rows into one record per actor, in first-seen order.
fn group_actor_rows(rows: Vec<ActorFilmRow>) -> Result<Vec<ActorWithFilms>> {
    let mut grouped: Vec<ActorWithFilms> = Vec::new();
    let mut index: HashMap<i32, usize> = HashMap::new();

    for row in rows {
        let slot = if let Some(&slot) = index.get(&row.actor_id) {
            slot
        } else {
            grouped.push(ActorWithFilms {
                actor: row.actor()?,
                films: Vec::new(),
            });
            index.insert(row.actor_id, grouped.len() - 1);
            grouped.len() - 1
        };

        if let Some(film) = row.film() {
            grouped[slot].films.push(film);
        }
    }

    Ok(grouped)
}

fn actor_search_key(name: &str, surname: &str) -> String {
    search_key(&format!("{name} {surname}"))
}

pub struct SeaOrmActorRepository {
    conn: DatabaseConnection,
}

impl SeaOrmActorRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn actor_film_rows() -> Select<Actors> {
        Actors::find()
            .select_only()
            .column_as(actors::Column::Id, "actor_id")
            .column_as(actors::Column::Name, "actor_name")
            .column_as(actors::Column::Surname, "actor_surname")
            .column_as(actors::Column::Gender, "actor_gender")
            .column_as(actors::Column::Birthday, "actor_birthday")
            .column_as(films::Column::Id, "film_id")
            .column_as(films::Column::Name, "film_name")
            .column_as(films::Column::Description, "film_description")
            .column_as(films::Column::DateOfRelease, "film_date_of_release")
            .column_as(films::Column::Rating, "film_rating")
            .join(JoinType::LeftJoin, actors::Relation::FilmActors.def())
            .join(JoinType::LeftJoin, film_actors::Relation::Films.def())
            .order_by_asc(actors::Column::Id)
            .order_by_asc(films::Column::Id)
    }
}

#[async_trait]
impl ActorRepository for SeaOrmActorRepository {
    async fn get_actors(&self) -> Result<Vec<ActorWithFilms>> {
        let rows = Self::actor_film_rows()
            .into_model::<ActorFilmRow>()
            .all(&self.conn)
            .await
            .context("Failed to list actors")?;

        group_actor_rows(rows)
    }

    async fn get_actor_by_id(&self, id: ActorId) -> Result<Option<ActorWithFilms>> {
        let rows = Self::actor_film_rows()
            .filter(actors::Column::Id.eq(id.value()))
            .into_model::<ActorFilmRow>()
            .all(&self.conn)
            .await
            .context("Failed to query actor by ID")?;

        Ok(group_actor_rows(rows)?.into_iter().next())
    }

    async fn add_actor(&self, actor: &ActorInput) -> Result<ActorId> {
        let inserted = Actors::insert(actors::ActiveModel {
            name: Set(actor.name.clone()),
            surname: Set(actor.surname.clone()),
            gender: Set(actor.gender.as_str().to_string()),
            birthday: Set(actor.birthday),
            search_name: Set(actor_search_key(&actor.name, &actor.surname)),
            ..Default::default()
        })
        .exec(&self.conn)
        .await
        .context("Failed to insert actor")?;

        Ok(ActorId::new(inserted.last_insert_id))
    }

    async fn update_actor(&self, actor: &Actor) -> Result<bool> {
        let result = Actors::update_many()
            .set(actors::ActiveModel {
                name: Set(actor.name.clone()),
                surname: Set(actor.surname.clone()),
                gender: Set(actor.gender.as_str().to_string()),
                birthday: Set(actor.birthday),
                search_name: Set(actor_search_key(&actor.name, &actor.surname)),
                ..Default::default()
            })
            .filter(actors::Column::Id.eq(actor.id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to update actor")?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_actor(&self, id: ActorId) -> Result<bool> {
        let txn = self.conn.begin().await?;

        FilmActors::delete_many()
            .filter(film_actors::Column::ActorId.eq(id.value()))
            .exec(&txn)
            .await
            .context("Failed to clear actor films")?;

        let result = Actors::delete_by_id(id.value())
            .exec(&txn)
            .await
            .context("Failed to delete actor")?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(actor_id: i32, film_id: Option<i32>) -> ActorFilmRow {
        ActorFilmRow {
            actor_id,
            actor_name: format!("Name{actor_id}"),
            actor_surname: format!("Surname{actor_id}"),
            actor_gender: "female".to_string(),
            actor_birthday: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            film_id,
            film_name: film_id.map(|id| format!("Film{id}")),
            film_description: film_id.map(|_| "desc".to_string()),
            film_date_of_release: film_id.map(|_| NaiveDate::from_ymd_opt(2000, 6, 1).unwrap()),
            film_rating: film_id.map(|_| 7.5),
        }
    }

    #[test]
    fn test_group_merges_rows_per_actor() {
        let grouped =
            group_actor_rows(vec![row(5, Some(1)), row(5, Some(2)), row(6, Some(1))]).unwrap();

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].actor.id, ActorId::new(5));
        assert_eq!(grouped[0].films.len(), 2);
        assert_eq!(grouped[1].actor.id, ActorId::new(6));
        assert_eq!(grouped[1].films[0].id, FilmId::new(1));
    }

    #[test]
    fn test_group_actor_without_films() {
        let grouped = group_actor_rows(vec![row(9, None)]).unwrap();

        assert_eq!(grouped.len(), 1);
        assert!(grouped[0].films.is_empty());
    }

    #[test]
    fn test_group_preserves_first_seen_order() {
        let grouped = group_actor_rows(vec![row(3, None), row(1, Some(4)), row(2, None)]).unwrap();
        let ids: Vec<i32> = grouped.iter().map(|a| a.actor.id.value()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_group_rejects_corrupt_gender() {
        let mut bad = row(1, None);
        bad.actor_gender = "unknown".to_string();
        assert!(group_actor_rows(vec![bad]).is_err());
    }
}
