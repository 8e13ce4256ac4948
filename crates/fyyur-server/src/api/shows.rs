use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::NaiveDateTime;
use serde::Serialize;

use super::{now, SharedState};
use crate::flash::Flashes;
use crate::forms::{FormFields, ShowForm, Submission};
use crate::page::Page;
use fyyur_db::repo::{self, ShowListing};
use fyyur_db::schedule::format_start_time;

#[derive(Debug, Serialize)]
pub struct ShowEntry {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

impl From<ShowListing> for ShowEntry {
    fn from(s: ShowListing) -> Self {
        Self {
            venue_id: s.venue.id,
            venue_name: s.venue.name,
            artist_id: s.artist.id,
            artist_name: s.artist.name,
            artist_image_link: s.artist.image_link,
            start_time: format_start_time(s.show.start_time),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShowsContext {
    pub shows: Vec<ShowEntry>,
}

#[derive(Debug, Serialize)]
pub struct ShowFormContext {
    pub form: ShowForm,
}

/// Shows still to come, keeping the newest-first order of `listings`.
fn upcoming_only(listings: Vec<ShowListing>, now: NaiveDateTime) -> Vec<ShowEntry> {
    listings
        .into_iter()
        .filter(|s| s.show.start_time > now)
        .map(ShowEntry::from)
        .collect()
}

/// GET /shows
pub async fn list_shows(State(state): State<SharedState>, mut flashes: Flashes) -> Response {
    let now = now();
    let res = repo::with_session(&state.db, |txn| {
        Box::pin(async move { repo::list_all_shows_desc(txn).await })
    })
    .await;

    match res {
        Ok(listings) => {
            let shows = upcoming_only(listings, now);
            Page::new("pages/shows.html", ShowsContext { shows }, flashes).into_response()
        }
        Err(e) => {
            tracing::warn!("listing shows failed: {e}");
            flashes.push("An error occurred!");
            Page::home(flashes).into_response()
        }
    }
}

/// GET /shows/create
pub async fn create_shows(flashes: Flashes) -> Response {
    let context = ShowFormContext {
        form: ShowForm::starting_at(now()),
    };
    Page::new("forms/new_show.html", context, flashes).into_response()
}

/// POST /shows/create: always lands on the home page
pub async fn create_show_submission(
    State(state): State<SharedState>,
    mut flashes: Flashes,
    submission: Submission,
) -> Response {
    let fields = FormFields::from(submission);
    let res = match fields.show_draft() {
        Ok(draft) => {
            repo::with_session(&state.db, move |txn| {
                Box::pin(async move { repo::insert_show(txn, draft).await })
            })
            .await
        }
        Err(e) => Err(e),
    };

    match res {
        Ok(created) => {
            tracing::info!(
                show_id = created.id,
                venue_id = created.venue_id,
                artist_id = created.artist_id,
                "show listed"
            );
            flashes.push("Show was successfully listed!");
        }
        Err(e) => {
            tracing::warn!("creating show failed: {e}");
            flashes.push("An error occurred. Show could not be added.");
        }
    }
    Page::home(flashes).into_response()
}
