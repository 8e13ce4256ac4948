use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

use super::{now, EntityId, SharedState};
use crate::flash::Flashes;
use crate::forms::{self, Choices, FormFields, Submission, VenueForm};
use crate::page::Page;
use fyyur_db::entities::{show, venue};
use fyyur_db::repo::{self, ShowWithArtist};
use fyyur_db::schedule::{count_past, count_upcoming, format_start_time, split_by_time};

// ─── Payloads ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Serialize)]
pub struct VenuesContext {
    pub areas: Vec<Area>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct SearchContext<T> {
    pub results: SearchResults<T>,
    pub search_term: String,
}

/// A show at this venue, seen from the venue page.
#[derive(Debug, Serialize)]
pub struct ArtistShow {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

impl From<ShowWithArtist> for ArtistShow {
    fn from(s: ShowWithArtist) -> Self {
        Self {
            artist_id: s.show.artist_id,
            artist_name: s.artist.name,
            artist_image_link: s.artist.image_link,
            start_time: format_start_time(s.show.start_time),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VenueDetail {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub image_link: String,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenueDetail {
    pub fn build(v: venue::Model, shows: Vec<ShowWithArtist>, now: NaiveDateTime) -> Self {
        let past_shows_count = count_past(&shows, now);
        let upcoming_shows_count = count_upcoming(&shows, now);
        let (past, upcoming) = split_by_time(shows, now);
        Self {
            id: v.id,
            name: v.name,
            genres: v.genres.0,
            address: v.address,
            city: v.city,
            state: v.state,
            phone: v.phone,
            website: v.website,
            facebook_link: v.facebook_link,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
            image_link: v.image_link,
            past_shows: past.into_iter().map(ArtistShow::from).collect(),
            upcoming_shows: upcoming.into_iter().map(ArtistShow::from).collect(),
            past_shows_count,
            upcoming_shows_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VenueDetailContext {
    pub venue: VenueDetail,
}

#[derive(Debug, Serialize)]
pub struct VenueFormContext {
    pub form: VenueForm,
    pub choices: Choices,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<venue::Model>,
}

fn summarize(
    venues: Vec<venue::Model>,
    shows: &HashMap<i32, Vec<show::Model>>,
    now: NaiveDateTime,
) -> Vec<VenueSummary> {
    venues
        .into_iter()
        .map(|v| VenueSummary {
            num_upcoming_shows: shows
                .get(&v.id)
                .map(|s| count_upcoming(s, now))
                .unwrap_or(0),
            id: v.id,
            name: v.name,
        })
        .collect()
}

fn ids(venues: &[venue::Model]) -> Vec<i32> {
    venues.iter().map(|v| v.id).collect()
}

// ─── Handlers ───────────────────────────────────────────────────────

/// GET /venues: venues grouped by (city, state)
pub async fn list_venues(State(state): State<SharedState>, mut flashes: Flashes) -> Response {
    let now = now();
    let res = repo::with_session(&state.db, move |txn| {
        Box::pin(async move {
            let mut areas = Vec::new();
            for location in repo::list_distinct_venue_locations(txn).await? {
                let venues =
                    repo::list_venues_by_location(txn, &location.city, &location.state).await?;
                let shows = repo::list_shows_for_venues(txn, &ids(&venues)).await?;
                areas.push(Area {
                    city: location.city,
                    state: location.state,
                    venues: summarize(venues, &shows, now),
                });
            }
            Ok(areas)
        })
    })
    .await;

    match res {
        Ok(areas) => Page::new("pages/venues.html", VenuesContext { areas }, flashes).into_response(),
        Err(e) => {
            tracing::warn!("listing venues failed: {e}");
            flashes.push("An error occurred!");
            Page::home(flashes).into_response()
        }
    }
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<SharedState>,
    mut flashes: Flashes,
    submission: Submission,
) -> Response {
    let now = now();
    let search_term = FormFields::from(submission)
        .optional("search_term")
        .unwrap_or_default();
    let term = search_term.clone();
    let res = repo::with_session(&state.db, move |txn| {
        Box::pin(async move {
            let venues = repo::search_venues_by_name(txn, &term).await?;
            let shows = repo::list_shows_for_venues(txn, &ids(&venues)).await?;
            Ok(summarize(venues, &shows, now))
        })
    })
    .await;

    match res {
        Ok(data) => {
            let context = SearchContext {
                results: SearchResults {
                    count: data.len(),
                    data,
                },
                search_term,
            };
            Page::new("pages/search_venues.html", context, flashes).into_response()
        }
        Err(e) => {
            tracing::warn!(%search_term, "venue search failed: {e}");
            flashes.push("An error occurred!");
            Page::home(flashes).into_response()
        }
    }
}

/// GET /venues/{id}
pub async fn show_venue(
    State(state): State<SharedState>,
    mut flashes: Flashes,
    EntityId(id): EntityId,
) -> Response {
    let now = now();
    let res = repo::with_session(&state.db, move |txn| {
        Box::pin(async move {
            let v = repo::get_venue_by_id(txn, id).await?;
            let shows = repo::list_shows_joined_with_artist(txn, id).await?;
            Ok(VenueDetail::build(v, shows, now))
        })
    })
    .await;

    match res {
        Ok(venue) => {
            Page::new("pages/show_venue.html", VenueDetailContext { venue }, flashes)
                .into_response()
        }
        Err(e) => {
            tracing::warn!(venue_id = id, "venue detail failed: {e}");
            flashes.push("Not a valid venue id!");
            Page::home(flashes).into_response()
        }
    }
}

/// GET /venues/create
pub async fn create_venue_form(flashes: Flashes) -> Response {
    let context = VenueFormContext {
        form: VenueForm::default(),
        choices: Choices::default(),
        venue: None,
    };
    Page::new("forms/new_venue.html", context, flashes).into_response()
}

/// POST /venues/create: always lands on the home page
pub async fn create_venue_submission(
    State(state): State<SharedState>,
    mut flashes: Flashes,
    submission: Submission,
) -> Response {
    let fields = FormFields::from(submission);
    let name = fields.name().to_owned();
    let res = match fields.venue_draft() {
        Ok(draft) => {
            repo::with_session(&state.db, move |txn| {
                Box::pin(async move { repo::insert_venue(txn, draft).await })
            })
            .await
        }
        Err(e) => Err(e),
    };

    match res {
        Ok(created) => {
            tracing::info!(venue_id = created.id, "venue listed");
            flashes.push(format!("Venue {} was successfully listed!", created.name));
        }
        Err(e) => {
            tracing::warn!(%name, "creating venue failed: {e}");
            flashes.push(format!("An error occurred. Venue {name} could not be listed."));
        }
    }
    Page::home(flashes).into_response()
}

/// DELETE /venues/{id}: no body either way; the outcome rides in the flash cookie
pub async fn delete_venue(
    State(state): State<SharedState>,
    mut flashes: Flashes,
    Path(raw_id): Path<String>,
) -> Response {
    let res = match forms::parse_id("venue_id", &raw_id) {
        Ok(id) => {
            repo::with_session(&state.db, move |txn| {
                Box::pin(async move { repo::delete_venue(txn, id).await })
            })
            .await
        }
        Err(e) => Err(e),
    };

    match res {
        Ok(()) => {
            tracing::info!(venue_id = %raw_id, "venue deleted");
            flashes.push("Venue successfully deleted!");
        }
        Err(e) => {
            tracing::warn!(venue_id = %raw_id, "deleting venue failed: {e}");
            flashes.push("An error occurred while trying to delete.");
        }
    }
    (flashes, StatusCode::NO_CONTENT).into_response()
}

/// GET /venues/{id}/edit
pub async fn edit_venue(
    State(state): State<SharedState>,
    mut flashes: Flashes,
    EntityId(id): EntityId,
) -> Response {
    let res = repo::with_session(&state.db, move |txn| {
        Box::pin(async move { repo::get_venue_by_id(txn, id).await })
    })
    .await;

    match res {
        Ok(v) => {
            let context = VenueFormContext {
                form: VenueForm::from(&v),
                choices: Choices::default(),
                venue: Some(v),
            };
            Page::new("forms/edit_venue.html", context, flashes).into_response()
        }
        Err(e) => {
            tracing::warn!(venue_id = id, "venue edit form failed: {e}");
            flashes.push("Venue id is not valid!");
            Page::home(flashes).into_response()
        }
    }
}

/// POST /venues/{id}/edit: redirects to the venue page whatever the outcome
pub async fn edit_venue_submission(
    State(state): State<SharedState>,
    mut flashes: Flashes,
    EntityId(id): EntityId,
    submission: Submission,
) -> Response {
    let fields = FormFields::from(submission);
    let name = fields.name().to_owned();
    let res = match fields.venue_draft() {
        Ok(draft) => {
            repo::with_session(&state.db, move |txn| {
                Box::pin(async move { repo::update_venue(txn, id, draft).await })
            })
            .await
        }
        Err(e) => Err(e),
    };

    match res {
        Ok(_) => flashes.push(format!("Venue {name} was successfully edited!")),
        Err(e) => {
            tracing::warn!(venue_id = id, "editing venue failed: {e}");
            flashes.push(format!("Venue {name} edit failed!"));
        }
    }
    (flashes, Redirect::to(&format!("/venues/{id}"))).into_response()
}
