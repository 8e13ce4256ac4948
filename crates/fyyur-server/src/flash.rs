//! One-shot user notifications.
//!
//! Messages pushed while handling a request are either embedded in the page
//! payload that request renders, or, for redirects and empty responses, carried
//! to the next request in the `flash` cookie. Rendering a page consumes any
//! carried messages and clears the cookie.

use axum::{
    extract::FromRequestParts,
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue,
    },
    response::{IntoResponseParts, ResponseParts},
};
use std::convert::Infallible;

pub const FLASH_COOKIE: &str = "flash";

const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Lax";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Flashes {
    messages: Vec<String>,
    from_cookie: bool,
}

impl Flashes {
    /// Messages carried over from a previous response.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let raw = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == FLASH_COOKIE)
            .map(|(_, value)| value);

        match raw {
            Some(value) => Self {
                messages: decode(value),
                from_cookie: true,
            },
            None => Self::default(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// `Set-Cookie` value handing every pending message to the next request.
    pub fn carry_over(&self) -> Option<HeaderValue> {
        if !self.messages.is_empty() {
            let value = format!("{FLASH_COOKIE}={}; {COOKIE_ATTRIBUTES}", encode(&self.messages));
            HeaderValue::from_str(&value).ok()
        } else {
            self.consumed()
        }
    }

    /// `Set-Cookie` value clearing a cookie this request read from, if any.
    pub fn consumed(&self) -> Option<HeaderValue> {
        if !self.from_cookie {
            return None;
        }
        let value = format!("{FLASH_COOKIE}=; Max-Age=0; {COOKIE_ATTRIBUTES}");
        HeaderValue::from_str(&value).ok()
    }
}

fn encode(messages: &[String]) -> String {
    messages
        .iter()
        .map(|m| urlencoding::encode(m).into_owned())
        .collect::<Vec<_>>()
        .join("&")
}

fn decode(value: &str) -> Vec<String> {
    value
        .split('&')
        .filter(|part| !part.is_empty())
        .filter_map(|part| urlencoding::decode(part).ok())
        .map(|m| m.into_owned())
        .collect()
}

impl<S> FromRequestParts<S> for Flashes
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Attaching `Flashes` to a non-page response hands them to the next request.
impl IntoResponseParts for Flashes {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Some(cookie) = self.carry_over() {
            res.headers_mut().append(SET_COOKIE, cookie);
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_no_cookie_means_no_messages() {
        let flashes = Flashes::from_headers(&HeaderMap::new());
        assert!(flashes.is_empty());
        assert!(flashes.consumed().is_none());
        assert!(flashes.carry_over().is_none());
    }

    #[test]
    fn test_carry_over_then_read_back() {
        let mut flashes = Flashes::default();
        flashes.push("Venue The Fillmore was successfully listed!");
        flashes.push("50% off; today & tomorrow");

        let set_cookie = flashes.carry_over().unwrap();
        let set_cookie = set_cookie.to_str().unwrap();
        assert!(set_cookie.starts_with("flash="));
        assert!(set_cookie.contains("Path=/"));

        // The browser sends back only the name=value pair.
        let pair = set_cookie.split(';').next().unwrap();
        let read = Flashes::from_headers(&headers_with_cookie(&format!("theme=dark; {pair}")));
        assert_eq!(
            read.messages(),
            [
                "Venue The Fillmore was successfully listed!".to_string(),
                "50% off; today & tomorrow".to_string()
            ]
        );
    }

    #[test]
    fn test_consumed_clears_cookie_only_when_read() {
        let read = Flashes::from_headers(&headers_with_cookie("flash=hello"));
        assert_eq!(read.messages(), ["hello".to_string()]);
        let cleared = read.consumed().unwrap();
        assert!(cleared.to_str().unwrap().contains("Max-Age=0"));
    }

    #[test]
    fn test_carry_over_with_nothing_left_clears_read_cookie() {
        let read = Flashes::from_headers(&headers_with_cookie("flash="));
        assert!(read.is_empty());
        let value = read.carry_over().unwrap();
        assert!(value.to_str().unwrap().contains("Max-Age=0"));
    }

    #[test]
    fn test_other_cookies_are_ignored() {
        let read = Flashes::from_headers(&headers_with_cookie("session=abc; flashy=nope"));
        assert!(read.is_empty());
        assert!(read.consumed().is_none());
    }
}
