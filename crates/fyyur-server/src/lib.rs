use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use fyyur_db::AppState;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod flash;
pub mod forms;
pub mod page;

/// Every route of the site, with the 404 fallback and the 500 panic page.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::home::index))
        // Venues
        .route("/venues", get(api::venues::list_venues))
        .route("/venues/search", post(api::venues::search_venues))
        .route(
            "/venues/create",
            get(api::venues::create_venue_form).post(api::venues::create_venue_submission),
        )
        .route(
            "/venues/{id}",
            get(api::venues::show_venue).delete(api::venues::delete_venue),
        )
        .route(
            "/venues/{id}/edit",
            get(api::venues::edit_venue).post(api::venues::edit_venue_submission),
        )
        // Artists
        .route("/artists", get(api::artists::list_artists))
        .route("/artists/search", post(api::artists::search_artists))
        .route(
            "/artists/create",
            get(api::artists::create_artist_form).post(api::artists::create_artist_submission),
        )
        .route("/artists/{id}", get(api::artists::show_artist))
        .route(
            "/artists/{id}/edit",
            get(api::artists::edit_artist).post(api::artists::edit_artist_submission),
        )
        // Shows
        .route("/shows", get(api::shows::list_shows))
        .route(
            "/shows/create",
            get(api::shows::create_shows).post(api::shows::create_show_submission),
        )
        .fallback(api::home::not_found)
        .layer(CatchPanicLayer::custom(api::home::server_error))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state)
}
