//! Form submissions and form payloads.
//!
//! Submissions are decoded into ordered key/value pairs so that repeated keys
//! (`genres=Rock&genres=Jazz`) survive as an ordered list.

use axum::extract::{rejection::FormRejection, Form};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;

use fyyur_db::entities::{artist, venue};
use fyyur_db::records::{ArtistDraft, ShowDraft, VenueDraft};
use fyyur_db::schedule::format_start_time;
use fyyur_db::StoreError;

pub type Submission = Result<Form<Vec<(String, String)>>, FormRejection>;

pub const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub const STATE_CHOICES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

const START_TIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

// ─── Submissions ────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct FormFields(Vec<(String, String)>);

impl From<Submission> for FormFields {
    fn from(submission: Submission) -> Self {
        match submission {
            Ok(Form(pairs)) => Self(pairs),
            Err(rejection) => {
                tracing::debug!("unreadable form submission: {rejection}");
                Self::default()
            }
        }
    }
}

impl FromIterator<(String, String)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FormFields {
    /// First value submitted under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted under `key`, in submission order.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn require(&self, key: &'static str) -> Result<String, StoreError> {
        self.get(key)
            .map(str::to_owned)
            .ok_or(StoreError::MissingField(key))
    }

    pub fn optional(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_owned)
    }

    /// Submitted `name`, for notifications; empty when absent.
    pub fn name(&self) -> &str {
        self.get("name").unwrap_or_default()
    }

    /// Venue columns from the submission. `seeking_talent` is always true.
    pub fn venue_draft(&self) -> Result<VenueDraft, StoreError> {
        Ok(VenueDraft {
            name: self.require("name")?,
            city: self.require("city")?,
            state: self.require("state")?,
            address: self.require("address")?,
            phone: self.require("phone")?,
            image_link: self.require("image_link")?,
            facebook_link: self.optional("facebook_link"),
            genres: self.list("genres"),
            website: self.optional("website"),
            seeking_talent: true,
            seeking_description: self
                .optional("seeking_description")
                .unwrap_or_else(|| venue::DEFAULT_SEEKING_DESCRIPTION.to_string()),
        })
    }

    /// Artist columns from the submission. `seeking_venue` is always true.
    pub fn artist_draft(&self) -> Result<ArtistDraft, StoreError> {
        Ok(ArtistDraft {
            name: self.require("name")?,
            city: self.require("city")?,
            state: self.require("state")?,
            phone: self.require("phone")?,
            genres: self.list("genres"),
            image_link: self.require("image_link")?,
            facebook_link: self.optional("facebook_link"),
            website: self.optional("website"),
            seeking_venue: true,
            seeking_description: self
                .optional("seeking_description")
                .unwrap_or_else(|| artist::DEFAULT_SEEKING_DESCRIPTION.to_string()),
        })
    }

    pub fn show_draft(&self) -> Result<ShowDraft, StoreError> {
        Ok(ShowDraft {
            artist_id: parse_id("artist_id", &self.require("artist_id")?)?,
            venue_id: parse_id("venue_id", &self.require("venue_id")?)?,
            start_time: parse_start_time(&self.require("start_time")?)?,
        })
    }
}

pub fn parse_id(field: &'static str, raw: &str) -> Result<i32, StoreError> {
    raw.trim()
        .parse()
        .map_err(|_| StoreError::invalid(field, raw))
}

pub fn parse_start_time(raw: &str) -> Result<NaiveDateTime, StoreError> {
    let raw_trimmed = raw.trim();
    START_TIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw_trimmed, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw_trimmed)
                .ok()
                .map(|dt| dt.with_timezone(&Local).naive_local())
        })
        .ok_or_else(|| StoreError::invalid("start_time", raw))
}

// ─── Form payloads ──────────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

impl From<&venue::Model> for VenueForm {
    fn from(v: &venue::Model) -> Self {
        Self {
            name: v.name.clone(),
            city: v.city.clone(),
            state: v.state.clone(),
            address: v.address.clone(),
            phone: v.phone.clone(),
            image_link: v.image_link.clone(),
            genres: v.genres.0.clone(),
            facebook_link: v.facebook_link.clone(),
            website: v.website.clone(),
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

impl From<&artist::Model> for ArtistForm {
    fn from(a: &artist::Model) -> Self {
        Self {
            name: a.name.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            phone: a.phone.clone(),
            image_link: a.image_link.clone(),
            genres: a.genres.0.clone(),
            facebook_link: a.facebook_link.clone(),
            website: a.website.clone(),
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    /// Pre-filled with the current time.
    pub start_time: String,
}

impl ShowForm {
    pub fn starting_at(now: NaiveDateTime) -> Self {
        Self {
            artist_id: String::new(),
            venue_id: String::new(),
            start_time: format_start_time(now),
        }
    }
}

/// Choice lists offered by the venue and artist forms.
#[derive(Debug, Serialize)]
pub struct Choices {
    pub genres: &'static [&'static str],
    pub states: &'static [&'static str],
}

impl Default for Choices {
    fn default() -> Self {
        Self {
            genres: GENRE_CHOICES,
            states: STATE_CHOICES,
        }
    }
}
