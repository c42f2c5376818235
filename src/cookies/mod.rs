pub mod codec;

use std::path::Path;

use anyhow::{Context, Result};
use cnidarium::{StateDelta, StateRead, StateWrite, Storage};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use codec::SetCookie;

// Key prefix (no trailing slash, cnidarium convention)
const COOKIE_PREFIX: &str = "cookie";

fn owner_prefix(owner: u64) -> String {
    format!("{}/{}/", COOKIE_PREFIX, owner)
}
fn cookie_key(owner: u64, name: &str) -> String {
    format!("{}{}", owner_prefix(owner), name)
}

/// A cookie as persisted, with the moment it was written so max-age can be enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCookie {
    header: String,
    set_at: i64,
}

/// Persistent cookie jars, one per Discord user.
pub struct CookieJar {
    storage: Storage,
}

impl CookieJar {
    pub async fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let storage = Storage::load(data_dir.to_path_buf(), vec![COOKIE_PREFIX.to_string()])
            .await
            .context("Failed to init cnidarium storage")?;
        Ok(Self { storage })
    }

    pub async fn set(&self, owner: u64, cookie: &SetCookie) -> Result<()> {
        self.set_at(owner, cookie, chrono::Utc::now().timestamp()).await
    }

    /// Store `cookie` as written at `now`. A non-positive max-age deletes it.
    pub async fn set_at(&self, owner: u64, cookie: &SetCookie, now: i64) -> Result<()> {
        let snapshot = self.storage.latest_snapshot();
        let mut delta = StateDelta::new(snapshot);
        let key = cookie_key(owner, &cookie.name);

        if cookie.max_age <= 0 {
            delta.delete(key);
        } else {
            let stored = StoredCookie {
                header: cookie.to_string(),
                set_at: now,
            };
            delta.put_raw(key, serde_json::to_vec(&stored).context("serialize cookie")?);
        }

        self.storage.commit(delta).await?;
        debug!(owner, name = %cookie.name, max_age = cookie.max_age, "cookie written");
        Ok(())
    }

    /// `document.cookie` for this owner: live cookies as `name=value; ...`.
    pub async fn header(&self, owner: u64) -> Result<String> {
        self.header_at(owner, chrono::Utc::now().timestamp()).await
    }

    pub async fn header_at(&self, owner: u64, now: i64) -> Result<String> {
        let snapshot = self.storage.latest_snapshot();
        let prefix = owner_prefix(owner);
        let mut stream = snapshot.prefix_raw(&prefix);
        let mut pairs = Vec::new();

        while let Some(entry) = stream.next().await {
            let (key, value) = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error reading cookie stream: {}", e);
                    continue;
                }
            };
            let Ok(stored) = serde_json::from_slice::<StoredCookie>(&value) else {
                warn!(key = %key, "skipping undecodable cookie record");
                continue;
            };
            let Some(cookie) = SetCookie::parse(&stored.header) else {
                warn!(key = %key, "skipping malformed cookie header");
                continue;
            };
            if cookie.alive_after(now - stored.set_at) {
                pairs.push(format!("{}={}", cookie.name, cookie.value));
            }
        }

        Ok(pairs.join("; "))
    }
}
