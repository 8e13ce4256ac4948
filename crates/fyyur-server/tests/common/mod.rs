// Shared test utilities for integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, Method, Request, StatusCode,
    },
    Router,
};
use chrono::{Duration, Local};
use fyyur_db::entities::{artist, venue};
use fyyur_db::records::{ArtistDraft, ShowDraft, VenueDraft};
use fyyur_db::sea_orm::DatabaseConnection;
use fyyur_db::{repo, AppState, DatabaseConfig};
use fyyur_migration::{Migrator, MigratorTrait};
use fyyur_server::flash::Flashes;
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

/// Router over a freshly migrated in-memory database
pub async fn test_app() -> TestApp {
    let db = fyyur_db::connect(&DatabaseConfig::in_memory())
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    let router = fyyur_server::router(Arc::new(AppState { db: db.clone() }));
    TestApp { router, db }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON payload, `Null` for empty bodies
    pub body: serde_json::Value,
}

impl TestResponse {
    pub fn template(&self) -> &str {
        self.body["template"].as_str().unwrap_or_default()
    }

    /// Messages embedded in the rendered page
    pub fn flashes(&self) -> Vec<String> {
        self.body["flashes"]
            .as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|m| m.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Messages handed to the next request through the flash cookie
    pub fn carried_flashes(&self) -> Vec<String> {
        self.flash_cookie()
            .map(|pair| {
                let mut headers = HeaderMap::new();
                headers.insert(COOKIE, HeaderValue::from_str(&pair).unwrap());
                Flashes::from_headers(&headers).messages().to_vec()
            })
            .unwrap_or_default()
    }

    /// `flash=...` pair of the flash `Set-Cookie`, as a browser would send it back
    pub fn flash_cookie(&self) -> Option<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("flash="))
            .and_then(|v| v.split(';').next())
            .map(str::to_owned)
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> TestResponse {
        let req = Request::get(uri)
            .header(COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let req = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(fields)))
            .unwrap();
        self.send(req).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        let req = Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    pub async fn seed_venue(&self, name: &str, city: &str, state: &str) -> venue::Model {
        repo::insert_venue(&self.db, venue_draft(name, city, state))
            .await
            .unwrap()
    }

    pub async fn seed_artist(&self, name: &str) -> artist::Model {
        repo::insert_artist(&self.db, artist_draft(name))
            .await
            .unwrap()
    }

    /// Show starting `offset` from now
    pub async fn seed_show(&self, venue_id: i32, artist_id: i32, offset: Duration) {
        let draft = ShowDraft {
            artist_id,
            venue_id,
            start_time: Local::now().naive_local() + offset,
        };
        repo::insert_show(&self.db, draft).await.unwrap();
    }
}

pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn venue_draft(name: &str, city: &str, state: &str) -> VenueDraft {
    VenueDraft {
        name: name.into(),
        city: city.into(),
        state: state.into(),
        address: "1015 Folsom Street".into(),
        phone: "123-123-1234".into(),
        image_link: "https://img.example/venue.jpg".into(),
        facebook_link: None,
        genres: vec!["Jazz".into()],
        website: None,
        seeking_talent: true,
        seeking_description: venue::DEFAULT_SEEKING_DESCRIPTION.into(),
    }
}

pub fn artist_draft(name: &str) -> ArtistDraft {
    ArtistDraft {
        name: name.into(),
        city: "San Francisco".into(),
        state: "CA".into(),
        phone: "326-123-5000".into(),
        genres: vec!["Rock n Roll".into()],
        image_link: "https://img.example/artist.jpg".into(),
        facebook_link: None,
        website: None,
        seeking_venue: true,
        seeking_description: artist::DEFAULT_SEEKING_DESCRIPTION.into(),
    }
}

pub fn venue_form<'a>(name: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("name", name),
        ("city", "SF"),
        ("state", "CA"),
        ("address", "123 X St"),
        ("phone", "555-1234"),
        ("image_link", "http://x/img.png"),
        ("facebook_link", "https://www.facebook.com/fillmore"),
        ("genres", "Rock n Roll"),
        ("genres", "Jazz"),
        ("website", "https://fillmore.example"),
        ("seeking_talent", "n"),
        ("seeking_description", "Bring your own amp"),
    ]
}

pub fn artist_form<'a>(name: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("name", name),
        ("city", "New York"),
        ("state", "NY"),
        ("phone", "300-400-5000"),
        ("image_link", "https://img.example/matt.jpg"),
        ("genres", "Jazz"),
        ("seeking_venue", "n"),
    ]
}
