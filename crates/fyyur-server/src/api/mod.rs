pub mod artists;
pub mod home;
pub mod shows;
pub mod venues;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use chrono::NaiveDateTime;
use fyyur_db::AppState;
use std::sync::Arc;

use crate::page::Page;

pub type SharedState = Arc<AppState>;

/// Reference time for one request, as server-local wall-clock time. Show
/// start times are typed as local times, so every past/upcoming split in the
/// request compares against this one instant.
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Unsigned integer `{id}` path segment. Anything but ASCII digits (signs
/// included) is answered with the 404 page, the same as an unknown route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub i32);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| Page::not_found().into_response())?;
        parse_entity_id(&raw)
            .map(EntityId)
            .ok_or_else(|| Page::not_found().into_response())
    }
}

fn parse_entity_id(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity_id() {
        assert_eq!(parse_entity_id("7"), Some(7));
        assert_eq!(parse_entity_id("007"), Some(7));
        assert_eq!(parse_entity_id("-1"), None);
        assert_eq!(parse_entity_id("+5"), None);
        assert_eq!(parse_entity_id(" 5"), None);
        assert_eq!(parse_entity_id(""), None);
        assert_eq!(parse_entity_id("99999999999"), None);
    }
}
