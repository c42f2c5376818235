use std::future::Future;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cookies::codec::{cookie_value, decode_favorites, SetCookie, FAVORITES_COOKIE};
use crate::cookies::CookieJar;
use crate::joke::Joke;

/// Where a user's favorites list lives. Reads fail closed; writes are best-effort.
pub trait FavoritesStore: Send + Sync {
    fn read(&self, owner: u64) -> impl Future<Output = Vec<Joke>> + Send;
    fn write(&self, owner: u64, favorites: &[Joke]) -> impl Future<Output = ()> + Send;
}

/// Favorites kept in the owner's `favorites` cookie.
pub struct CookieStore {
    jar: CookieJar,
}

impl CookieStore {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }
}

impl FavoritesStore for CookieStore {
    async fn read(&self, owner: u64) -> Vec<Joke> {
        let header = match self.jar.header(owner).await {
            Ok(header) => header,
            Err(e) => {
                warn!(owner, "Failed to read cookie jar: {}", e);
                return Vec::new();
            }
        };
        let Some(value) = cookie_value(&header, FAVORITES_COOKIE) else {
            return Vec::new();
        };
        decode_favorites(value).unwrap_or_else(|| {
            debug!(owner, "favorites cookie unparseable, treating as empty");
            Vec::new()
        })
    }

    async fn write(&self, owner: u64, favorites: &[Joke]) {
        if let Err(e) = self.jar.set(owner, &SetCookie::favorites(favorites)).await {
            warn!(owner, "Failed to write favorites cookie: {}", e);
        }
    }
}

pub fn contains(favorites: &[Joke], joke: &Joke) -> bool {
    favorites.iter().any(|fav| fav.same_joke(joke))
}

pub struct Favorites<S> {
    store: S,
    // Serializes read-modify-write across concurrent button presses.
    write_lock: Mutex<()>,
}

impl<S: FavoritesStore> Favorites<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list(&self, owner: u64) -> Vec<Joke> {
        self.store.read(owner).await
    }

    pub async fn is_favorited(&self, owner: u64, joke: &Joke) -> bool {
        contains(&self.store.read(owner).await, joke)
    }

    /// Add the joke if absent, remove every entry with its text otherwise.
    /// Returns the list as persisted, for re-rendering the sidebar.
    pub async fn toggle(&self, owner: u64, joke: &Joke) -> Vec<Joke> {
        let _guard = self.write_lock.lock().await;
        let mut favorites = self.store.read(owner).await;

        if contains(&favorites, joke) {
            favorites.retain(|fav| !fav.same_joke(joke));
            debug!(owner, count = favorites.len(), "favorite removed");
        } else {
            favorites.push(joke.clone());
            debug!(owner, count = favorites.len(), "favorite added");
        }

        self.store.write(owner, &favorites).await;
        favorites
    }
}
