use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub surname: String,
    /// "male" or "female"
    pub gender: String,
    pub birthday: Date,
    /// Lowercased "name surname", maintained by the repository for search.
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

impl Related<super::films::Entity> for Entity {
    fn to() -> RelationDef {
        super::film_actors::Relation::Films.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::film_actors::Relation::Actors.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
