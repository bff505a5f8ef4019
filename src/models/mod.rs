pub mod actor;
pub mod film;
pub mod session;
pub mod user;

pub use actor::{Actor, ActorInput, ActorWithFilms};
pub use film::{Film, FilmInput};
pub use session::Session;
pub use user::User;
