use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "films")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub date_of_release: Date,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    /// Lowercased `name`, maintained by the repository for search.
    pub search_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::film_actors::Entity")]
    FilmActors,
}

impl Related<super::film_actors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FilmActors.def()
    }
}

impl Related<super::actors::Entity> for Entity {
    fn to() -> RelationDef {
        super::film_actors::Relation::Actors.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::film_actors::Relation::Films.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
