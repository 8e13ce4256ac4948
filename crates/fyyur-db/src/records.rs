//! Write-side records: the full set of user-editable columns for each entity.
//!
//! Creating and editing both go through these drafts, so an edit always
//! reassigns every column, never a partial patch.

use chrono::NaiveDateTime;
use sea_orm::{ActiveValue::NotSet, Set};

use crate::entities::{artist, show, venue, Genres};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueDraft {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: Option<String>,
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

impl VenueDraft {
    pub fn apply(self, active: &mut venue::ActiveModel) {
        active.name = Set(self.name);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.address = Set(self.address);
        active.phone = Set(self.phone);
        active.image_link = Set(self.image_link);
        active.facebook_link = Set(self.facebook_link);
        active.genres = Set(Genres(self.genres));
        active.website = Set(self.website);
        active.seeking_talent = Set(self.seeking_talent);
        active.seeking_description = Set(self.seeking_description);
    }

    pub fn into_active_model(self) -> venue::ActiveModel {
        let mut active = venue::ActiveModel {
            id: NotSet,
            ..Default::default()
        };
        self.apply(&mut active);
        active
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistDraft {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

impl ArtistDraft {
    pub fn apply(self, active: &mut artist::ActiveModel) {
        active.name = Set(self.name);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.phone = Set(self.phone);
        active.genres = Set(Genres(self.genres));
        active.image_link = Set(self.image_link);
        active.facebook_link = Set(self.facebook_link);
        active.website = Set(self.website);
        active.seeking_venue = Set(self.seeking_venue);
        active.seeking_description = Set(self.seeking_description);
    }

    pub fn into_active_model(self) -> artist::ActiveModel {
        let mut active = artist::ActiveModel {
            id: NotSet,
            ..Default::default()
        };
        self.apply(&mut active);
        active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowDraft {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: NaiveDateTime,
}

impl ShowDraft {
    pub fn into_active_model(self) -> show::ActiveModel {
        show::ActiveModel {
            id: NotSet,
            start_time: Set(self.start_time),
            venue_id: Set(self.venue_id),
            artist_id: Set(self.artist_id),
        }
    }
}
