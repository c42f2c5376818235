use serde::{Deserialize, Deserializer, Serialize};

use crate::api::API_BASE_URL;

/// A joke as served by the backend. `joke_text` doubles as its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub joke_text: String,
    #[serde(default)]
    pub audio_file_path: Option<String>,
}

impl Joke {
    #[cfg(test)]
    pub fn new(joke_text: impl Into<String>, audio_file_path: Option<&str>) -> Self {
        Self {
            joke_text: joke_text.into(),
            audio_file_path: audio_file_path.map(|s| s.to_string()),
        }
    }

    /// Two jokes are the same favorite when their text matches exactly.
    /// Audio is ignored, so identical text with different audio collides.
    pub fn same_joke(&self, other: &Joke) -> bool {
        self.joke_text == other.joke_text
    }

    /// Text split into display lines. Empty text renders as a fallback line.
    pub fn display_lines(&self) -> Vec<String> {
        if self.joke_text.is_empty() {
            return vec!["No joke found.".to_string()];
        }
        self.joke_text.split('\n').map(|l| l.to_string()).collect()
    }

    /// Playable audio URL, if the joke has one.
    pub fn audio_src(&self) -> Option<String> {
        self.audio_file_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(resolve_audio_src)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Backend-relative paths (leading `/`) are served by the backend itself.
pub fn resolve_audio_src(path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", API_BASE_URL, path)
    } else {
        path.to_string()
    }
}
