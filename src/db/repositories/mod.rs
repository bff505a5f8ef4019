pub mod actor;
pub mod film;
pub mod session;
pub mod user;

/// Case folding for searchable names, applied on write and to search text on
/// read. SQLite `LOWER` folds ASCII only.
pub(crate) fn search_key(text: &str) -> String {
    text.to_lowercase()
}
