use crate::domain::UserId;

/// A live login session: the opaque token handed to the client and the user
/// it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user_id: UserId,
}
