use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::joke::Joke;

/// Characters left untouched by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const FAVORITES_COOKIE: &str = "favorites";
/// One year.
pub const FAVORITES_MAX_AGE: i64 = 31_536_000;

pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

pub fn decode_uri_component(value: &str) -> Option<String> {
    percent_decode_str(value)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

/// A cookie as written by the client: `name=value; path=/; max-age=N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub max_age: i64,
}

impl SetCookie {
    pub fn favorites(favorites: &[Joke]) -> Self {
        Self {
            name: FAVORITES_COOKIE.to_string(),
            value: encode_favorites(favorites),
            path: "/".to_string(),
            max_age: FAVORITES_MAX_AGE,
        }
    }

    /// Parse a `Set-Cookie` style string. Unknown attributes are ignored;
    /// a missing max-age means the cookie never expires on its own.
    pub fn parse(header: &str) -> Option<Self> {
        let mut parts = header.split(';').map(str::trim);
        let (name, value) = parts.next()?.split_once('=')?;
        if name.is_empty() {
            return None;
        }

        let mut cookie = Self {
            name: name.to_string(),
            value: value.to_string(),
            path: "/".to_string(),
            max_age: i64::MAX,
        };
        for attr in parts {
            let Some((key, val)) = attr.split_once('=') else {
                continue;
            };
            match key.to_ascii_lowercase().as_str() {
                "path" => cookie.path = val.to_string(),
                "max-age" => cookie.max_age = val.parse().ok()?,
                _ => {}
            }
        }
        Some(cookie)
    }

    /// Whether the cookie is still alive `elapsed` seconds after being set.
    pub fn alive_after(&self, elapsed: i64) -> bool {
        self.max_age > 0 && elapsed < self.max_age
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; path={}; max-age={}",
            self.name, self.value, self.path, self.max_age
        )
    }
}

/// Find `name` in a `document.cookie` style header (`a=1; b=2`).
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split("; ").find_map(|pair| {
        pair.strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
    })
}

pub fn encode_favorites(favorites: &[Joke]) -> String {
    // Serializing plain strings cannot fail.
    let json = serde_json::to_string(favorites).unwrap_or_else(|_| "[]".to_string());
    encode_uri_component(&json)
}

/// Decode a cookie value; anything malformed yields `None`.
pub fn decode_favorites(value: &str) -> Option<Vec<Joke>> {
    let json = decode_uri_component(value)?;
    serde_json::from_str(&json).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_encode_uri_component() {
        assert_eq!(encode_uri_component("a b&c"), "a%20b%26c");
        assert_eq!(encode_uri_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_uri_component("[{\"x\":1}]"), "%5B%7B%22x%22%3A1%7D%5D");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
        assert_eq!(encode_uri_component("a;b=c"), "a%3Bb%3Dc");
    }

    #[test]
    fn test_favorites_cookie_string() {
        let cookie = SetCookie::favorites(&[Joke::new("hi", None)]);
        assert_eq!(
            cookie.to_string(),
            "favorites=%5B%7B%22joke_text%22%3A%22hi%22%2C%22audio_file_path%22%3Anull%7D%5D; path=/; max-age=31536000"
        );
    }

    #[test]
    fn test_set_cookie_parse() {
        let cookie = SetCookie::parse("favorites=abc; path=/; max-age=60").unwrap();
        assert_eq!(cookie.name, "favorites");
        assert_eq!(cookie.value, "abc");
        assert_eq!(cookie.path, "/");
        assert_eq!(cookie.max_age, 60);

        let cookie = SetCookie::parse("session=x; Secure").unwrap();
        assert_eq!(cookie.max_age, i64::MAX);

        assert!(SetCookie::parse("novalue").is_none());
        assert!(SetCookie::parse("=x").is_none());
        assert!(SetCookie::parse("a=b; max-age=soon").is_none());
    }

    #[test]
    fn test_set_cookie_display_parses_back() {
        let cookie = SetCookie::favorites(&[Joke::new("a; b", Some("/x.mp3"))]);
        assert_eq!(SetCookie::parse(&cookie.to_string()), Some(cookie));
    }

    #[test]
    fn test_alive_after() {
        let cookie = SetCookie::parse("a=b; max-age=10").unwrap();
        assert!(cookie.alive_after(0));
        assert!(cookie.alive_after(9));
        assert!(!cookie.alive_after(10));
        assert!(!SetCookie::parse("a=b; max-age=0").unwrap().alive_after(0));
    }

    #[test]
    fn test_cookie_value_lookup() {
        let header = "theme=dark; favorites=%5B%5D; xfavorites=nope";
        assert_eq!(cookie_value(header, "favorites"), Some("%5B%5D"));
        assert_eq!(cookie_value(header, "theme"), Some("dark"));
        assert_eq!(cookie_value("xfavorites=1", "favorites"), None);
        assert_eq!(cookie_value("", "favorites"), None);
    }

    #[test]
    fn test_decode_favorites() {
        let jokes = vec![Joke::new("line\nbreak", Some("/a.mp3")), Joke::new("two", None)];
        assert_eq!(decode_favorites(&encode_favorites(&jokes)), Some(jokes));
    }

    #[test]
    fn test_decode_favorites_rejects_garbage() {
        assert_eq!(decode_favorites("not-json"), None);
        assert_eq!(decode_favorites("%7B%22a%22%3A1%7D"), None);
        assert_eq!(decode_favorites("%FF%FE"), None);
    }
}
