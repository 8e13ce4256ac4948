use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

pub mod artist;
pub mod show;
pub mod venue;

/// Ordered genre list, stored as a JSON array so it round-trips unchanged on
/// both PostgreSQL and SQLite.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Genres(pub Vec<String>);

impl From<Vec<String>> for Genres {
    fn from(genres: Vec<String>) -> Self {
        Self(genres)
    }
}

impl Genres {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
