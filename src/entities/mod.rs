pub mod prelude;

pub mod actors;
pub mod film_actors;
pub mod films;
pub mod users;
