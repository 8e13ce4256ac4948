//! Page payloads.
//!
//! Handlers do not render HTML: they answer with the template a renderer would
//! use, the pending notifications, and the template context, all as one JSON
//! object.

use axum::{
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::flash::Flashes;

pub const HOME: &str = "pages/home.html";
pub const NOT_FOUND: &str = "errors/404.html";
pub const SERVER_ERROR: &str = "errors/500.html";

/// Context for templates that take none.
#[derive(Debug, Default, Serialize)]
pub struct NoContext {}

#[derive(Debug)]
pub struct Page<T> {
    template: &'static str,
    status: StatusCode,
    flashes: Flashes,
    context: T,
}

#[derive(Serialize)]
struct PageBody<'a, T> {
    template: &'a str,
    flashes: &'a [String],
    #[serde(flatten)]
    context: &'a T,
}

impl<T: Serialize> Page<T> {
    pub fn new(template: &'static str, context: T, flashes: Flashes) -> Self {
        Self {
            template,
            status: StatusCode::OK,
            flashes,
            context,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl Page<NoContext> {
    pub fn home(flashes: Flashes) -> Self {
        Self::new(HOME, NoContext::default(), flashes)
    }

    pub fn not_found() -> Self {
        Self::new(NOT_FOUND, NoContext::default(), Flashes::default())
            .with_status(StatusCode::NOT_FOUND)
    }

    pub fn server_error() -> Self {
        Self::new(SERVER_ERROR, NoContext::default(), Flashes::default())
            .with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        let body = PageBody {
            template: self.template,
            flashes: self.flashes.messages(),
            context: &self.context,
        };
        let mut res = (self.status, Json(&body)).into_response();
        if let Some(cookie) = self.flashes.consumed() {
            res.headers_mut().append(SET_COOKIE, cookie);
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

    #[derive(Serialize)]
    struct Ctx {
        search_term: &'static str,
    }

    #[test]
    fn test_body_flattens_context() {
        let mut flashes = Flashes::default();
        flashes.push("hi");
        let page = Page::new("pages/search_venues.html", Ctx { search_term: "hop" }, flashes);
        let body = PageBody {
            template: page.template,
            flashes: page.flashes.messages(),
            context: &page.context,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["template"], "pages/search_venues.html");
        assert_eq!(json["flashes"][0], "hi");
        assert_eq!(json["search_term"], "hop");
    }

    #[test]
    fn test_error_pages_status() {
        assert_eq!(Page::not_found().into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Page::server_error().into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rendering_clears_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("flash=Saved"));
        let res = Page::home(Flashes::from_headers(&headers)).into_response();
        let cookie = res.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));

        let res = Page::home(Flashes::default()).into_response();
        assert!(res.headers().get(SET_COOKIE).is_none());
    }
}
