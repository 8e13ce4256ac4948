//! Record access layer.
//!
//! Every function is generic over [`ConnectionTrait`] so it runs the same on a
//! pooled connection or inside the request session opened by [`with_session`].

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::entities::{artist, show, venue};
use crate::records::{ArtistDraft, ShowDraft, VenueDraft};
use crate::schedule::Scheduled;
use crate::StoreError;

// ─── Sessions ───────────────────────────────────────────────────────

/// Run `f` inside a request-scoped transaction.
///
/// Commits when `f` succeeds and rolls back when it fails; the underlying pool
/// connection is released on every path.
pub async fn with_session<F, T>(db: &DatabaseConnection, f: F) -> Result<T, StoreError>
where
    F: for<'c> FnOnce(
        &'c DatabaseTransaction,
    ) -> Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'c>>,
{
    let txn = db.begin().await?;
    match f(&txn).await {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("session rollback failed: {rollback_err}");
            } else {
                tracing::debug!("session rolled back: {err}");
            }
            Err(err)
        }
    }
}

// ─── Joined rows ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub state: String,
}

/// A show of some venue, with the performing artist loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowWithArtist {
    pub show: show::Model,
    pub artist: artist::Model,
}

/// A show of some artist, with the hosting venue loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowWithVenue {
    pub show: show::Model,
    pub venue: venue::Model,
}

/// A show with both sides loaded, for the global listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowListing {
    pub show: show::Model,
    pub venue: venue::Model,
    pub artist: artist::Model,
}

impl Scheduled for ShowWithArtist {
    fn start_time(&self) -> chrono::NaiveDateTime {
        self.show.start_time
    }
}

impl Scheduled for ShowWithVenue {
    fn start_time(&self) -> chrono::NaiveDateTime {
        self.show.start_time
    }
}

impl Scheduled for ShowListing {
    fn start_time(&self) -> chrono::NaiveDateTime {
        self.show.start_time
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Case-insensitive substring match. Both sides are folded by the database's
/// `LOWER`, so a name always matches itself; LIKE wildcards in `term` match
/// literally.
fn name_contains<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(term));
    Expr::cust_with_exprs(
        format!("LOWER($1) LIKE LOWER($2) ESCAPE '{LIKE_ESCAPE}'"),
        [Expr::col(column).into(), Expr::val(pattern).into()],
    )
}

const LIKE_ESCAPE: char = '!';

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

// ─── Venues ─────────────────────────────────────────────────────────

pub async fn get_venue_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<venue::Model, StoreError> {
    venue::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::not_found("venue", id))
}

pub async fn list_distinct_venue_locations<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<Location>, StoreError> {
    let rows = venue::Entity::find()
        .select_only()
        .column(venue::Column::City)
        .column(venue::Column::State)
        .distinct()
        .order_by_asc(venue::Column::State)
        .order_by_asc(venue::Column::City)
        .into_tuple::<(String, String)>()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(city, state)| Location { city, state })
        .collect())
}

pub async fn list_venues_by_location<C: ConnectionTrait>(
    db: &C,
    city: &str,
    state: &str,
) -> Result<Vec<venue::Model>, StoreError> {
    Ok(venue::Entity::find()
        .filter(venue::Column::City.eq(city))
        .filter(venue::Column::State.eq(state))
        .order_by_asc(venue::Column::Name)
        .all(db)
        .await?)
}

pub async fn search_venues_by_name<C: ConnectionTrait>(
    db: &C,
    term: &str,
) -> Result<Vec<venue::Model>, StoreError> {
    Ok(venue::Entity::find()
        .filter(name_contains(venue::Column::Name, term))
        .order_by_asc(venue::Column::Name)
        .all(db)
        .await?)
}

pub async fn insert_venue<C: ConnectionTrait>(
    db: &C,
    draft: VenueDraft,
) -> Result<venue::Model, StoreError> {
    Ok(draft.into_active_model().insert(db).await?)
}

pub async fn update_venue<C: ConnectionTrait>(
    db: &C,
    id: i32,
    draft: VenueDraft,
) -> Result<venue::Model, StoreError> {
    let mut active: venue::ActiveModel = get_venue_by_id(db, id).await?.into();
    draft.apply(&mut active);
    Ok(active.update(db).await?)
}

/// Delete a venue; its shows go with it through the foreign key cascade.
pub async fn delete_venue<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), StoreError> {
    let res = venue::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(StoreError::not_found("venue", id));
    }
    Ok(())
}

// ─── Artists ────────────────────────────────────────────────────────

pub async fn get_artist_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<artist::Model, StoreError> {
    artist::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::not_found("artist", id))
}

pub async fn list_all_artists<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<artist::Model>, StoreError> {
    Ok(artist::Entity::find()
        .order_by_asc(artist::Column::Name)
        .all(db)
        .await?)
}

pub async fn search_artists_by_name<C: ConnectionTrait>(
    db: &C,
    term: &str,
) -> Result<Vec<artist::Model>, StoreError> {
    Ok(artist::Entity::find()
        .filter(name_contains(artist::Column::Name, term))
        .order_by_asc(artist::Column::Name)
        .all(db)
        .await?)
}

pub async fn insert_artist<C: ConnectionTrait>(
    db: &C,
    draft: ArtistDraft,
) -> Result<artist::Model, StoreError> {
    Ok(draft.into_active_model().insert(db).await?)
}

pub async fn update_artist<C: ConnectionTrait>(
    db: &C,
    id: i32,
    draft: ArtistDraft,
) -> Result<artist::Model, StoreError> {
    let mut active: artist::ActiveModel = get_artist_by_id(db, id).await?.into();
    draft.apply(&mut active);
    Ok(active.update(db).await?)
}

// ─── Shows ──────────────────────────────────────────────────────────

/// Shows of every venue in `venue_ids`, keyed by venue id.
pub async fn list_shows_for_venues<C: ConnectionTrait>(
    db: &C,
    venue_ids: &[i32],
) -> Result<HashMap<i32, Vec<show::Model>>, StoreError> {
    if venue_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let shows = show::Entity::find()
        .filter(show::Column::VenueId.is_in(venue_ids.iter().copied()))
        .all(db)
        .await?;

    let mut by_venue: HashMap<i32, Vec<show::Model>> = HashMap::new();
    for s in shows {
        by_venue.entry(s.venue_id).or_default().push(s);
    }
    Ok(by_venue)
}

/// Shows of every artist in `artist_ids`, keyed by artist id.
pub async fn list_shows_for_artists<C: ConnectionTrait>(
    db: &C,
    artist_ids: &[i32],
) -> Result<HashMap<i32, Vec<show::Model>>, StoreError> {
    if artist_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let shows = show::Entity::find()
        .filter(show::Column::ArtistId.is_in(artist_ids.iter().copied()))
        .all(db)
        .await?;

    let mut by_artist: HashMap<i32, Vec<show::Model>> = HashMap::new();
    for s in shows {
        by_artist.entry(s.artist_id).or_default().push(s);
    }
    Ok(by_artist)
}

pub async fn list_shows_joined_with_artist<C: ConnectionTrait>(
    db: &C,
    venue_id: i32,
) -> Result<Vec<ShowWithArtist>, StoreError> {
    let rows = show::Entity::find()
        .filter(show::Column::VenueId.eq(venue_id))
        .order_by_asc(show::Column::StartTime)
        .find_also_related(artist::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(show, artist)| artist.map(|artist| ShowWithArtist { show, artist }))
        .collect())
}

pub async fn list_shows_joined_with_venue<C: ConnectionTrait>(
    db: &C,
    artist_id: i32,
) -> Result<Vec<ShowWithVenue>, StoreError> {
    let rows = show::Entity::find()
        .filter(show::Column::ArtistId.eq(artist_id))
        .order_by_asc(show::Column::StartTime)
        .find_also_related(venue::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(show, venue)| venue.map(|venue| ShowWithVenue { show, venue }))
        .collect())
}

/// Every show, newest first, with venue and artist loaded.
pub async fn list_all_shows_desc<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<ShowListing>, StoreError> {
    let shows = show::Entity::find()
        .order_by_desc(show::Column::StartTime)
        .all(db)
        .await?;
    if shows.is_empty() {
        return Ok(Vec::new());
    }

    // Batch-fetch both sides
    let venue_ids: Vec<i32> = shows.iter().map(|s| s.venue_id).collect();
    let artist_ids: Vec<i32> = shows.iter().map(|s| s.artist_id).collect();
    let venues: HashMap<i32, venue::Model> = venue::Entity::find()
        .filter(venue::Column::Id.is_in(venue_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|v| (v.id, v))
        .collect();
    let artists: HashMap<i32, artist::Model> = artist::Entity::find()
        .filter(artist::Column::Id.is_in(artist_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    Ok(shows
        .into_iter()
        .filter_map(|show| {
            let venue = venues.get(&show.venue_id)?.clone();
            let artist = artists.get(&show.artist_id)?.clone();
            Some(ShowListing {
                show,
                venue,
                artist,
            })
        })
        .collect())
}

pub async fn insert_show<C: ConnectionTrait>(
    db: &C,
    draft: ShowDraft,
) -> Result<show::Model, StoreError> {
    Ok(draft.into_active_model().insert(db).await?)
}
