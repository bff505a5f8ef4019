pub use super::actors::Entity as Actors;
pub use super::film_actors::Entity as FilmActors;
pub use super::films::Entity as Films;
pub use super::users::Entity as Users;
