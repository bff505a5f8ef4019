use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::{ActorRequest, ApiError, AuthRequest, FilmRequest};
use crate::domain::{ActorId, FilmId, FilmSort, Gender};
use crate::models::{Actor, ActorInput, Film, FilmInput};

const DATE_FORMAT: &str = "%Y-%m-%d";

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("Invalid regex"))
}

/// Accumulates field messages so one response reports every problem.
#[derive(Debug, Default)]
struct Violations(Vec<String>);

impl Violations {
    fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.0.push(message.into());
        }
    }

    fn length(&mut self, field: &str, value: &str, max: usize) {
        let len = value.chars().count();
        if len == 0 {
            self.0.push(format!("{field} is required"));
        } else if len > max {
            self.0.push(format!("{field} must be at most {max} characters"));
        }
    }

    fn date(&mut self, field: &str, value: &str) -> Option<NaiveDate> {
        if value.is_empty() {
            self.0.push(format!("{field} is required"));
            return None;
        }
        let parsed = NaiveDate::parse_from_str(value, DATE_FORMAT).ok();
        if parsed.is_none() {
            self.0.push(format!("{field} must be a date in YYYY-MM-DD format"));
        }
        parsed
    }

    fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.0.join("; ")))
        }
    }
}

/// Parses an id taken from the URL path. Anything but a positive integer is
/// a malformed request.
pub fn parse_path_id(kind: &str, raw: &str) -> Result<i32, ApiError> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::bad_request(format!(
            "bad format of {kind} id: {raw}"
        ))),
    }
}

pub fn validate_sort_param(raw: &str) -> Result<FilmSort, ApiError> {
    raw.parse::<FilmSort>()
        .map_err(|_| ApiError::validation(format!("{raw} can not be sorting param")))
}

pub fn validate_search_text(text: &str) -> Result<&str, ApiError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Search text cannot be empty"));
    }
    if trimmed.chars().count() > 150 {
        return Err(ApiError::validation(
            "Search text must be at most 150 characters",
        ));
    }
    Ok(trimmed)
}

pub fn validate_credentials(req: &AuthRequest) -> Result<(), ApiError> {
    let mut v = Violations::default();

    if req.username.is_empty() {
        v.check(false, "username is required");
    } else {
        v.check(
            username_regex().is_match(&req.username),
            "username may only contain letters, digits and underscores",
        );
    }

    let password_len = req.password.chars().count();
    v.check(
        (8..=255).contains(&password_len),
        "password must be between 8 and 255 characters",
    );

    v.into_result()
}

fn film_fields(req: &FilmRequest, v: &mut Violations) -> Option<(FilmInput, Vec<ActorId>)> {
    v.length("name", &req.name, 150);
    v.length("description", &req.description, 1000);
    let date = v.date("date_of_release", &req.date_of_release);

    match req.rating {
        None => v.check(false, "rating is required"),
        Some(rating) => v.check(
            (0.0..=10.0).contains(&rating),
            "rating must be between 0 and 10",
        ),
    }

    v.check(
        req.actor_ids.iter().all(|&id| id > 0),
        "actor_ids must be positive",
    );

    Some((
        FilmInput {
            name: req.name.clone(),
            description: req.description.clone(),
            date_of_release: date?,
            rating: req.rating?,
        },
        req.actor_ids.iter().copied().map(ActorId::new).collect(),
    ))
}

pub fn validate_film_add(req: &FilmRequest) -> Result<(FilmInput, Vec<ActorId>), ApiError> {
    let mut v = Violations::default();
    let fields = film_fields(req, &mut v);
    v.into_result()?;
    fields.ok_or_else(|| ApiError::validation("invalid film"))
}

pub fn validate_film_update(req: &FilmRequest) -> Result<(Film, Vec<ActorId>), ApiError> {
    let mut v = Violations::default();
    v.check(req.id.is_some_and(|id| id > 0), "id must be a positive integer");
    let fields = film_fields(req, &mut v);
    v.into_result()?;

    match (req.id, fields) {
        (Some(id), Some((input, actor_ids))) => Ok((input.with_id(FilmId::new(id)), actor_ids)),
        _ => Err(ApiError::validation("invalid film")),
    }
}

fn actor_fields(req: &ActorRequest, v: &mut Violations) -> Option<ActorInput> {
    v.length("name", &req.name, 40);
    v.length("surname", &req.surname, 40);
    let birthday = v.date("birthday", &req.birthday);

    let gender = req.gender.parse::<Gender>().ok();
    v.check(gender.is_some(), "gender must be male or female");

    Some(ActorInput {
        name: req.name.clone(),
        surname: req.surname.clone(),
        gender: gender?,
        birthday: birthday?,
    })
}

pub fn validate_actor_add(req: &ActorRequest) -> Result<ActorInput, ApiError> {
    let mut v = Violations::default();
    let fields = actor_fields(req, &mut v);
    v.into_result()?;
    fields.ok_or_else(|| ApiError::validation("invalid actor"))
}

pub fn validate_actor_update(req: &ActorRequest) -> Result<Actor, ApiError> {
    let mut v = Violations::default();
    v.check(req.id.is_some_and(|id| id > 0), "id must be a positive integer");
    let fields = actor_fields(req, &mut v);
    v.into_result()?;

    match (req.id, fields) {
        (Some(id), Some(input)) => Ok(input.with_id(ActorId::new(id))),
        _ => Err(ApiError::validation("invalid actor")),
    }
}
