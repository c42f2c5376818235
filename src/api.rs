use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cookies::codec::encode_uri_component;
use crate::joke::Joke;

pub const API_BASE_URL: &str = "https://jokegen-backend.onrender.com";

/// Which backend call failed; decides the unreachable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Random,
    Search,
}

impl Endpoint {
    fn unreachable_message(&self) -> &'static str {
        match self {
            Endpoint::Random => {
                "Failed to fetch joke. Is the backend running or is the Render backend URL correct?"
            }
            Endpoint::Search => "Failed to fetch search results. Is the Render backend URL correct?",
        }
    }
}

/// Failure of a single backend call. `Display` is the inline message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Error: {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("Error: {0}")]
    Backend(String),
    #[error("{}", .0.unreachable_message())]
    Unreachable(Endpoint),
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(default)]
    jokes: Vec<Joke>,
}

pub struct JokeApi {
    client: reqwest::Client,
    base_url: String,
}

impl JokeApi {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("jokegen-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    fn random_url(&self) -> String {
        format!("{}/random", self.base_url)
    }

    fn search_url(&self, term: &str) -> String {
        format!("{}/search?term={}", self.base_url, encode_uri_component(term))
    }

    /// One attempt, no retry.
    pub async fn fetch_random(&self) -> Result<Joke, FetchError> {
        let (status, body) = self.get(&self.random_url(), Endpoint::Random).await?;
        interpret_random(status, &body)
    }

    pub async fn fetch_search(&self, term: &str) -> Result<Vec<Joke>, FetchError> {
        let (status, body) = self.get(&self.search_url(term), Endpoint::Search).await?;
        interpret_search(status, &body)
    }

    async fn get(&self, url: &str, endpoint: Endpoint) -> Result<(StatusCode, String), FetchError> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            warn!(url, error = %e, "backend unreachable");
            FetchError::Unreachable(endpoint)
        })?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            warn!(url, error = %e, "failed to read backend response");
            FetchError::Unreachable(endpoint)
        })?;
        debug!(url, status = status.as_u16(), len = body.len(), "backend responded");
        Ok((status, body))
    }
}

/// Checks status, body shape, and the application-level `error` field.
fn parse_body(status: StatusCode, body: &str, endpoint: Endpoint) -> Result<serde_json::Value, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        });
    }

    let json: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "backend returned invalid JSON");
        FetchError::Unreachable(endpoint)
    })?;

    // Only a truthy `error` counts, so `null`, `false`, `0` and `""` fall through.
    match json.get("error") {
        None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => Ok(json),
        Some(serde_json::Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(json),
        Some(serde_json::Value::String(msg)) if msg.is_empty() => Ok(json),
        Some(serde_json::Value::String(msg)) => Err(FetchError::Backend(msg.clone())),
        Some(other) => Err(FetchError::Backend(other.to_string())),
    }
}

pub fn interpret_random(status: StatusCode, body: &str) -> Result<Joke, FetchError> {
    let json = parse_body(status, body, Endpoint::Random)?;
    serde_json::from_value(json).map_err(|e| {
        warn!(error = %e, "random joke payload did not match");
        FetchError::Unreachable(Endpoint::Random)
    })
}

pub fn interpret_search(status: StatusCode, body: &str) -> Result<Vec<Joke>, FetchError> {
    let json = parse_body(status, body, Endpoint::Search)?;
    let parsed: SearchBody = serde_json::from_value(json).map_err(|e| {
        warn!(error = %e, "search payload did not match");
        FetchError::Unreachable(Endpoint::Search)
    })?;
    Ok(parsed.jokes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ok() {
        let body = r#"{"joke_text":"A pun","audio_file_path":"/audio/1.mp3"}"#;
        let joke = interpret_random(StatusCode::OK, body).unwrap();
        assert_eq!(joke, Joke::new("A pun", Some("/audio/1.mp3")));
    }

    #[test]
    fn test_random_error_field() {
        let err = interpret_random(StatusCode::OK, r#"{"error":"rate limited"}"#).unwrap_err();
        assert_eq!(err, FetchError::Backend("rate limited".to_string()));
        assert_eq!(err.to_string(), "Error: rate limited");
    }

    #[test]
    fn test_falsy_error_field_ignored() {
        let body = r#"{"error":null,"joke_text":"ok"}"#;
        assert_eq!(interpret_random(StatusCode::OK, body).unwrap().joke_text, "ok");
        let body = r#"{"error":"","jokes":[]}"#;
        assert!(interpret_search(StatusCode::OK, body).unwrap().is_empty());
        let body = r#"{"error":0,"joke_text":"hi"}"#;
        assert_eq!(interpret_random(StatusCode::OK, body).unwrap().joke_text, "hi");
        let body = r#"{"error":0.0,"jokes":[]}"#;
        assert!(interpret_search(StatusCode::OK, body).is_ok());
    }

    #[test]
    fn test_nonzero_error_number_surfaced() {
        let err = interpret_random(StatusCode::OK, r#"{"error":1}"#).unwrap_err();
        assert_eq!(err.to_string(), "Error: 1");
    }

    #[test]
    fn test_null_text_keeps_audio() {
        let body = r#"{"joke_text":null,"audio_file_path":"/a.mp3"}"#;
        let joke = interpret_random(StatusCode::OK, body).unwrap();
        assert_eq!(joke.display_lines(), vec!["No joke found."]);
        assert_eq!(
            joke.audio_src().as_deref(),
            Some("https://jokegen-backend.onrender.com/a.mp3")
        );
    }

    #[test]
    fn test_search_with_null_text_entry() {
        let body = r#"{"jokes":[{"joke_text":"one"},{"joke_text":null,"audio_file_path":"/b.mp3"}]}"#;
        let jokes = interpret_search(StatusCode::OK, body).unwrap();
        assert_eq!(jokes.len(), 2);
        assert_eq!(jokes[1].joke_text, "");
    }

    #[test]
    fn test_status_surfaced() {
        let err = interpret_random(StatusCode::SERVICE_UNAVAILABLE, "").unwrap_err();
        assert_eq!(err.to_string(), "Error: 503 Service Unavailable");

        let err = interpret_search(StatusCode::NOT_FOUND, "{}").unwrap_err();
        assert_eq!(err.to_string(), "Error: 404 Not Found");
    }

    #[test]
    fn test_invalid_json_is_unreachable() {
        let err = interpret_random(StatusCode::OK, "<html>").unwrap_err();
        assert_eq!(err, FetchError::Unreachable(Endpoint::Random));
        assert!(err.to_string().starts_with("Failed to fetch joke."));

        let err = interpret_search(StatusCode::OK, "nope").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch search results. Is the Render backend URL correct?"
        );
    }

    #[test]
    fn test_search_results() {
        let body = r#"{"jokes":[{"joke_text":"one","audio_file_path":null},{"joke_text":"two","audio_file_path":"/b.mp3"}]}"#;
        let jokes = interpret_search(StatusCode::OK, body).unwrap();
        assert_eq!(jokes.len(), 2);
        assert_eq!(jokes[1].audio_file_path.as_deref(), Some("/b.mp3"));
    }

    #[test]
    fn test_search_missing_jokes_is_empty() {
        assert!(interpret_search(StatusCode::OK, "{}").unwrap().is_empty());
    }

    #[test]
    fn test_search_url_encodes_term() {
        let api = JokeApi::new().unwrap();
        assert_eq!(
            api.search_url("cats & dogs"),
            "https://jokegen-backend.onrender.com/search?term=cats%20%26%20dogs"
        );
        assert_eq!(api.random_url(), "https://jokegen-backend.onrender.com/random");
    }
}
