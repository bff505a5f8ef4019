pub mod actor_service;
pub mod actor_service_impl;
pub use actor_service::{ActorError, ActorService};
pub use actor_service_impl::DefaultActorService;

pub mod film_service;
pub mod film_service_impl;
pub use film_service::{FilmError, FilmService};
pub use film_service_impl::DefaultFilmService;

pub mod session_service;
pub mod session_service_impl;
pub use session_service::{SessionError, SessionService};
pub use session_service_impl::DefaultSessionService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserService};
pub use user_service_impl::DefaultUserService;
