use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

use super::venues::{SearchContext, SearchResults};
use super::{now, EntityId, SharedState};
use crate::flash::Flashes;
use crate::forms::{ArtistForm, Choices, FormFields, Submission};
use crate::page::Page;
use fyyur_db::entities::{artist, show};
use fyyur_db::repo::{self, ShowWithVenue};
use fyyur_db::schedule::{count_past, count_upcoming, format_start_time, split_by_time};

#[derive(Debug, Serialize)]
pub struct ArtistEntry {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ArtistsContext {
    pub artists: Vec<ArtistEntry>,
}

#[derive(Debug, Serialize)]
pub struct ArtistSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// A show by this artist, seen from the artist page.
#[derive(Debug, Serialize)]
pub struct VenueShow {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: String,
    pub start_time: String,
}

impl From<ShowWithVenue> for VenueShow {
    fn from(s: ShowWithVenue) -> Self {
        Self {
            venue_id: s.show.venue_id,
            venue_name: s.venue.name,
            venue_image_link: s.venue.image_link,
            start_time: format_start_time(s.show.start_time),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistDetail {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub image_link: String,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistDetail {
    pub fn build(a: artist::Model, shows: Vec<ShowWithVenue>, now: NaiveDateTime) -> Self {
        let past_shows_count = count_past(&shows, now);
        let upcoming_shows_count = count_upcoming(&shows, now);
        let (past, upcoming) = split_by_time(shows, now);
        Self {
            id: a.id,
            name: a.name,
            genres: a.genres.0,
            city: a.city,
            state: a.state,
            phone: a.phone,
            website: a.website,
            facebook_link: a.facebook_link,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
            image_link: a.image_link,
            past_shows: past.into_iter().map(VenueShow::from).collect(),
            upcoming_shows: upcoming.into_iter().map(VenueShow::from).collect(),
            past_shows_count,
            upcoming_shows_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailContext {
    pub artist: ArtistDetail,
}

#[derive(Debug, Serialize)]
pub struct ArtistFormContext {
    pub form: ArtistForm,
    pub choices: Choices,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<artist::Model>,
}

fn summarize(
    artists: Vec<artist::Model>,
    shows: &HashMap<i32, Vec<show::Model>>,
    now: NaiveDateTime,
) -> Vec<ArtistSummary> {
    artists
        .into_iter()
        .map(|a| ArtistSummary {
            num_upcoming_shows: shows
                .get(&a.id)
                .map(|s| count_upcoming(s, now))
                .unwrap_or(0),
            id: a.id,
            name: a.name,
        })
        .collect()
}

/// GET /artists
pub async fn list_artists(State(state): State<SharedState>, mut flashes: Flashes) -> Response {
    let res = repo::with_session(&state.db, |txn| {
        Box::pin(async move { repo::list_all_artists(txn).await })
    })
    .await;

    match res {
        Ok(artists) => {
            let artists = artists
                .into_iter()
                .map(|a| ArtistEntry {
                    id: a.id,
                    name: a.name,
                })
                .collect();
            Page::new("pages/artists.html", ArtistsContext { artists }, flashes).into_response()
        }
        Err(e) => {
            tracing::warn!("listing artists failed: {e}");
            flashes.push("An error occurred!");
            Page::home(flashes).into_response()
        }
    }
}

/// POST /artists/search
pub async fn search_artists(
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
            let artists = repo::search_artists_by_name(txn, &term).await?;
            let ids: Vec<i32> = artists.iter().map(|a| a.id).collect();
            let shows = repo::list_shows_for_artists(txn, &ids).await?;
            Ok(summarize(artists, &shows, now))
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
            Page::new("pages/search_artists.html", context, flashes).into_response()
        }
        Err(e) => {
            tracing::warn!(%search_term, "artist search failed: {e}");
            flashes.push("An error occurred!");
            Page::home(flashes).into_response()
        }
    }
}

/// GET /artists/{id}
pub async fn show_artist(
    State(state): State<SharedState>,
    mut flashes: Flashes,
    EntityId(id): EntityId,
) -> Response {
    let now = now();
    let res = repo::with_session(&state.db, move |txn| {
        Box::pin(async move {
            let a = repo::get_artist_by_id(txn, id).await?;
            let shows = repo::list_shows_joined_with_venue(txn, id).await?;
            Ok(ArtistDetail::build(a, shows, now))
        })
    })
    .await;

    match res {
        Ok(artist) => {
            Page::new("pages/show_artist.html", ArtistDetailContext { artist }, flashes)
                .into_response()
        }
        Err(e) => {
            tracing::warn!(artist_id = id, "artist detail failed: {e}");
            flashes.push("Not a valid artist id!");
            Page::home(flashes).into_response()
        }
    }
}

/// GET /artists/{id}/edit
pub async fn edit_artist(
    State(state): State<SharedState>,
    mut flashes: Flashes,
    EntityId(id): EntityId,
) -> Response {
    let res = repo::with_session(&state.db, move |txn| {
        Box::pin(async move { repo::get_artist_by_id(txn, id).await })
    })
    .await;

    match res {
        Ok(a) => {
            let context = ArtistFormContext {
                form: ArtistForm::from(&a),
                choices: Choices::default(),
                artist: Some(a),
            };
            Page::new("forms/edit_artist.html", context, flashes).into_response()
        }
        Err(e) => {
            tracing::warn!(artist_id = id, "artist edit form failed: {e}");
            flashes.push("Artist id is not valid!");
            Page::home(flashes).into_response()
        }
    }
}

/// POST /artists/{id}/edit: redirects to the artist page whatever the outcome
pub async fn edit_artist_submission(
    State(state): State<SharedState>,
    mut flashes: Flashes,
    EntityId(id): EntityId,
    submission: Submission,
) -> Response {
    let fields = FormFields::from(submission);
    let name = fields.name().to_owned();
    let res = match fields.artist_draft() {
        Ok(draft) => {
            repo::with_session(&state.db, move |txn| {
                Box::pin(async move { repo::update_artist(txn, id, draft).await })
            })
            .await
        }
        Err(e) => Err(e),
    };

    match res {
        Ok(_) => flashes.push(format!("Artist {name} was successfully edited!")),
        Err(e) => {
            tracing::warn!(artist_id = id, "editing artist failed: {e}");
            flashes.push(format!("Artist {name} edit failed!"));
        }
    }
    (flashes, Redirect::to(&format!("/artists/{id}"))).into_response()
}

/// GET /artists/create
pub async fn create_artist_form(flashes: Flashes) -> Response {
    let context = ArtistFormContext {
        form: ArtistForm::default(),
        choices: Choices::default(),
        artist: None,
    };
    Page::new("forms/new_artist.html", context, flashes).into_response()
}

/// POST /artists/create: always lands on the home page
pub async fn create_artist_submission(
    State(state): State<SharedState>,
    mut flashes: Flashes,
    submission: Submission,
) -> Response {
    let fields = FormFields::from(submission);
    let name = fields.name().to_owned();
    let res = match fields.artist_draft() {
        Ok(draft) => {
            repo::with_session(&state.db, move |txn| {
                Box::pin(async move { repo::insert_artist(txn, draft).await })
            })
            .await
        }
        Err(e) => Err(e),
    };

    match res {
        Ok(created) => {
            tracing::info!(artist_id = created.id, "artist listed");
            flashes.push(format!("Artist {} was successfully listed!", created.name));
        }
        Err(e) => {
            tracing::warn!(%name, "creating artist failed: {e}");
            flashes.push(format!("An error occurred. Artist {name} could not be listed."));
        }
    }
    Page::home(flashes).into_response()
}
