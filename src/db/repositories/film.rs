use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
    sea_query::Expr,
};

use super::search_key;
use crate::domain::{ActorId, FilmId, FilmSort};
use crate::entities::prelude::*;
use crate::entities::{actors, film_actors, films};
use crate::models::{Film, FilmInput};

impl From<films::Model> for Film {
    fn from(model: films::Model) -> Self {
        Self {
            id: FilmId::new(model.id),
            name: model.name,
            description: model.description,
            date_of_release: model.date_of_release,
            rating: model.rating,
        }
    }
}

/// Persistence for films and their actor links.
///
/// Writes that touch `film_actors` run in a single transaction. A write that
/// references a missing actor is rolled back and reported as `None`/`false`
/// rather than as an error; only store failures surface as `Err`.
#[async_trait]
pub trait FilmRepository: Send + Sync {
    async fn get_films(&self, sort: FilmSort) -> Result<Vec<Film>>;

    async fn get_film_by_id(&self, id: FilmId) -> Result<Option<Film>>;

    /// Films whose name, or the "name surname" of any linked actor, contains
    /// `text` case-insensitively. Ordered by film id.
    async fn get_films_by_search(&self, text: &str) -> Result<Vec<Film>>;

    /// Returns the new film id, or `None` if any actor id does not exist.
    async fn add_film(&self, film: &FilmInput, actor_ids: &[ActorId]) -> Result<Option<FilmId>>;

    /// Replaces the film's fields and its whole actor set. Returns `false`
    /// when the film or any actor does not exist.
    async fn update_film(&self, film: &Film, actor_ids: &[ActorId]) -> Result<bool>;

    async fn delete_film(&self, id: FilmId) -> Result<bool>;

    async fn get_film_actor_ids(&self, id: FilmId) -> Result<Vec<ActorId>>;
}

pub struct SeaOrmFilmRepository {
    conn: DatabaseConnection,
}

impl SeaOrmFilmRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl FilmRepository for SeaOrmFilmRepository {
    async fn get_films(&self, sort: FilmSort) -> Result<Vec<Film>> {
        let column = match sort {
            FilmSort::Rating => films::Column::Rating,
            FilmSort::Name => films::Column::Name,
            FilmSort::DateOfRelease => films::Column::DateOfRelease,
        };

        let rows = Films::find()
            .order_by_desc(column)
            .order_by_asc(films::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list films")?;

        Ok(rows.into_iter().map(Film::from).collect())
    }

    async fn get_film_by_id(&self, id: FilmId) -> Result<Option<Film>> {
        let row = Films::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query film by ID")?;

        Ok(row.map(Film::from))
    }

    async fn get_films_by_search(&self, text: &str) -> Result<Vec<Film>> {
        let pattern = like_pattern(text);

        let rows = Films::find()
            .distinct()
            .join(JoinType::LeftJoin, films::Relation::FilmActors.def())
            .join(JoinType::LeftJoin, film_actors::Relation::Actors.def())
            .filter(
                Condition::any()
                    .add(Expr::cust_with_values(
                        r"films.search_name LIKE ? ESCAPE '\'",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        r"actors.search_name LIKE ? ESCAPE '\'",
                        [pattern],
                    )),
            )
            .order_by_asc(films::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to search films")?;

        Ok(rows.into_iter().map(Film::from).collect())
    }

    async fn add_film(&self, film: &FilmInput, actor_ids: &[ActorId]) -> Result<Option<FilmId>> {
        let txn = self.conn.begin().await?;

        let inserted = Films::insert(films::ActiveModel {
            name: Set(film.name.clone()),
            description: Set(film.description.clone()),
            date_of_release: Set(film.date_of_release),
            rating: Set(film.rating),
            search_name: Set(search_key(&film.name)),
            ..Default::default()
        })
        .exec(&txn)
        .await
        .context("Failed to insert film")?;

        let film_id = inserted.last_insert_id;

        if !link_actors(&txn, film_id, actor_ids).await? {
            txn.rollback().await?;
            return Ok(None);
        }

        txn.commit().await?;
        Ok(Some(FilmId::new(film_id)))
    }

    async fn update_film(&self, film: &Film, actor_ids: &[ActorId]) -> Result<bool> {
        let film_id = film.id.value();
        let txn = self.conn.begin().await?;

        let updated = Films::update_many()
            .set(films::ActiveModel {
                name: Set(film.name.clone()),
                description: Set(film.description.clone()),
                date_of_release: Set(film.date_of_release),
                rating: Set(film.rating),
                search_name: Set(search_key(&film.name)),
                ..Default::default()
            })
            .filter(films::Column::Id.eq(film_id))
            .exec(&txn)
            .await
            .context("Failed to update film")?;

        if updated.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        FilmActors::delete_many()
            .filter(film_actors::Column::FilmId.eq(film_id))
            .exec(&txn)
            .await
            .context("Failed to clear film actors")?;

        if !link_actors(&txn, film_id, actor_ids).await? {
            txn.rollback().await?;
            return Ok(false);
        }

        txn.commit().await?;
        Ok(true)
    }

    async fn delete_film(&self, id: FilmId) -> Result<bool> {
        let txn = self.conn.begin().await?;

        FilmActors::delete_many()
            .filter(film_actors::Column::FilmId.eq(id.value()))
            .exec(&txn)
            .await
            .context("Failed to clear film actors")?;

        let result = Films::delete_by_id(id.value())
            .exec(&txn)
            .await
            .context("Failed to delete film")?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn get_film_actor_ids(&self, id: FilmId) -> Result<Vec<ActorId>> {
        let rows = FilmActors::find()
            .filter(film_actors::Column::FilmId.eq(id.value()))
            .order_by_asc(film_actors::Column::ActorId)
            .all(&self.conn)
            .await
            .context("Failed to query film actors")?;

        Ok(rows.into_iter().map(|r| ActorId::new(r.actor_id)).collect())
    }
}

/// Inserts one `film_actors` row per distinct actor id. Returns `false`
/// without writing anything if any of the actors is missing; the caller owns
/// the transaction and decides whether to roll back.
async fn link_actors(
    txn: &DatabaseTransaction,
    film_id: i32,
    actor_ids: &[ActorId],
) -> Result<bool> {
    let ids = distinct_ids(actor_ids);
    if ids.is_empty() {
        return Ok(true);
    }

    let found = Actors::find()
        .filter(actors::Column::Id.is_in(ids.clone()))
        .count(txn)
        .await
        .context("Failed to check actor existence")?;

    if found != u64::try_from(ids.len()).unwrap_or(u64::MAX) {
        return Ok(false);
    }

    FilmActors::insert_many(ids.into_iter().map(|actor_id| film_actors::ActiveModel {
        film_id: Set(film_id),
        actor_id: Set(actor_id),
    }))
    .exec_without_returning(txn)
    .await
    .context("Failed to link film actors")?;

    Ok(true)
}

/// Keeps the first occurrence of every id.
fn distinct_ids(actor_ids: &[ActorId]) -> Vec<i32> {
    let mut seen = std::collections::HashSet::with_capacity(actor_ids.len());
    actor_ids
        .iter()
        .map(ActorId::value)
        .filter(|id| seen.insert(*id))
        .collect()
}

fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in search_key(text).chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
