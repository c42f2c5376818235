use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::JokeApi;
use crate::favorites::{CookieStore, Favorites};
use crate::session::Sessions;

pub struct AppState {
    pub api: Arc<JokeApi>,
    pub favorites: Arc<Favorites<CookieStore>>,
    /// One page per Discord user. Idle pages are swept by a background task.
    pub sessions: Arc<RwLock<Sessions>>,
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
