use crate::domain::{Role, UserId};

/// A user as seen outside the repository. The password hash never leaves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}
