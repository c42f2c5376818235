use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::api::FetchError;
use crate::joke::Joke;
use crate::render::search::SearchSession;
use crate::render::{
    display_joke, render_favorites_sidebar, render_search_batch, Block, Frame, FrameKind,
    RenderTarget, Screen,
};

/// Sent views kept around for button presses. Older ones report as expired.
const FRAME_HISTORY: usize = 64;

pub const LOADING: &str = "Loading...";
pub const SEARCHING: &str = "Searching...";
pub const NO_RESULTS: &str = "No jokes found.";

/// Sessions untouched for this long are dropped by [`Sessions::evict_idle`].
pub const SESSION_IDLE_SECS: i64 = 60 * 60;

/// Per-user page state: what the browser tab would hold.
#[derive(Debug, Default)]
pub struct UserSession {
    pub screen: Screen,
    pub search: SearchSession,
    pub autoplay: bool,
    frames: VecDeque<Frame>,
    next_frame: u64,
    /// Bumped by every search, so views from earlier searches can be told apart.
    search_generation: u64,
    last_seen: i64,
}

impl UserSession {
    fn push_frame(&mut self, kind: FrameKind, blocks: Vec<Block>, show_more: bool) -> Frame {
        self.next_frame += 1;
        let frame = Frame {
            id: self.next_frame,
            kind,
            blocks,
            show_more,
            search: if kind == FrameKind::Results {
                self.search_generation
            } else {
                0
            },
        };
        if self.frames.len() == FRAME_HISTORY {
            self.frames.pop_front();
        }
        self.frames.push_back(frame.clone());
        frame
    }

    pub fn frame(&self, id: u64) -> Option<&Frame> {
        self.frames.iter().find(|f| f.id == id)
    }

    fn frame_mut(&mut self, id: u64) -> Option<&mut Frame> {
        self.frames.iter_mut().find(|f| f.id == id)
    }

    fn display_frame(&mut self) -> Frame {
        let blocks = self.screen.display.blocks().to_vec();
        self.push_frame(FrameKind::Display, blocks, false)
    }

    fn sidebar_frame(&mut self) -> Frame {
        let blocks = self.screen.sidebar.blocks().to_vec();
        self.push_frame(FrameKind::Sidebar, blocks, false)
    }

    pub fn begin_random(&mut self) {
        self.screen.display.show_message(LOADING);
    }

    /// Render the outcome of a random-joke request into the display area.
    pub fn show_random(&mut self, result: Result<Joke, FetchError>, favorites: &[Joke]) -> Frame {
        match result {
            Ok(joke) => display_joke(&mut self.screen.display, &joke, favorites, self.autoplay),
            Err(e) => self.screen.display.show_message(&e.to_string()),
        }
        self.display_frame()
    }

    pub fn begin_search(&mut self) {
        self.screen.results.show_message(SEARCHING);
        self.screen.search_visible = true;
    }

    /// Render the outcome of a search, restarting pagination on success.
    pub fn show_search(
        &mut self,
        result: Result<Vec<Joke>, FetchError>,
        favorites: &[Joke],
    ) -> Frame {
        self.search_generation += 1;
        match result {
            Ok(jokes) if !jokes.is_empty() => {
                self.search = SearchSession::new(jokes);
                self.screen.results.clear();
                self.screen.show_more_visible = render_search_batch(
                    &mut self.search,
                    &mut self.screen.results,
                    favorites,
                    self.autoplay,
                );
                debug!(visible = self.search.visible(), "first search batch rendered");
            }
            Ok(_) => {
                self.search = SearchSession::default();
                self.screen.results.show_message(NO_RESULTS);
                self.screen.show_more_visible = false;
            }
            Err(e) => {
                self.search = SearchSession::default();
                self.screen.results.show_message(&e.to_string());
                self.screen.show_more_visible = false;
            }
        }
        let blocks = self.screen.results.blocks().to_vec();
        let show_more = self.screen.show_more_visible;
        self.push_frame(FrameKind::Results, blocks, show_more)
    }

    /// Render the next batch as a new view. `from` is the view whose
    /// "load more" was pressed; it loses the control. None when nothing is
    /// pending or `from` belongs to an earlier search.
    pub fn show_more(&mut self, from: Option<u64>, favorites: &[Joke]) -> Option<(Option<Frame>, Frame)> {
        if !self.screen.show_more_visible || !self.search.has_more() {
            return None;
        }

        let generation = self.search_generation;
        let previous = match from {
            Some(id) => {
                let frame = self.frame_mut(id)?;
                if frame.kind != FrameKind::Results || frame.search != generation {
                    debug!(frame = id, generation, "load more from an earlier search");
                    return None;
                }
                frame.show_more = false;
                Some(frame.clone())
            }
            None => None,
        };

        let start = self.screen.results.len();
        self.screen.show_more_visible = render_search_batch(
            &mut self.search,
            &mut self.screen.results,
            favorites,
            self.autoplay,
        );
        let blocks = self.screen.results.blocks()[start..].to_vec();
        let show_more = self.screen.show_more_visible;
        Some((previous, self.push_frame(FrameKind::Results, blocks, show_more)))
    }

    pub fn open_sidebar(&mut self, favorites: &[Joke]) -> Frame {
        self.screen.sidebar_open = true;
        render_favorites_sidebar(&mut self.screen.sidebar, favorites);
        self.sidebar_frame()
    }

    /// Returns whether the sidebar was open.
    pub fn close_sidebar(&mut self) -> bool {
        std::mem::replace(&mut self.screen.sidebar_open, false)
    }

    /// A sidebar entry was clicked: show it in the display area.
    pub fn open_favorite(&mut self, frame_id: u64, card: usize, favorites: &[Joke]) -> Option<Frame> {
        let joke = self.frame(frame_id)?.card(card)?.joke.clone();
        display_joke(&mut self.screen.display, &joke, favorites, self.autoplay);
        Some(self.display_frame())
    }

    /// The joke behind a heart button, if that view is still known.
    pub fn heart_target(&self, frame_id: u64, card: usize) -> Option<Joke> {
        let card = self.frame(frame_id)?.card(card)?;
        card.heart.map(|_| card.joke.clone())
    }

    /// Record a finished toggle of `joke`: re-render the sidebar from `list`
    /// and flip the pressed heart to `favorited`. Returns the view to redraw;
    /// for the sidebar that is the re-rendered sidebar itself.
    pub fn apply_heart(
        &mut self,
        frame_id: u64,
        card: usize,
        joke: &Joke,
        list: &[Joke],
        favorited: bool,
    ) -> Option<Frame> {
        render_favorites_sidebar(&mut self.screen.sidebar, list);
        let sidebar = self.screen.sidebar.blocks().to_vec();

        let frame = self.frame_mut(frame_id)?;
        if frame.kind == FrameKind::Sidebar {
            frame.blocks = sidebar;
        } else if frame.card(card).is_some_and(|c| c.joke.same_joke(joke)) {
            frame.set_heart(card, favorited);
        }
        Some(frame.clone())
    }
}

/// Every user's page, dropped after [`SESSION_IDLE_SECS`] without activity.
#[derive(Debug, Default)]
pub struct Sessions {
    by_owner: HashMap<u64, UserSession>,
}

impl Sessions {
    pub fn get(&mut self, owner: u64) -> &mut UserSession {
        self.get_at(owner, chrono::Utc::now().timestamp())
    }

    /// The owner's session, created if needed and marked active at `now`.
    pub fn get_at(&mut self, owner: u64, now: i64) -> &mut UserSession {
        let session = self.by_owner.entry(owner).or_default();
        session.last_seen = now;
        session
    }

    /// Drop sessions idle for at least [`SESSION_IDLE_SECS`]. Returns how many went.
    pub fn evict_idle(&mut self, now: i64) -> usize {
        let before = self.by_owner.len();
        self.by_owner
            .retain(|_, session| now - session.last_seen < SESSION_IDLE_SECS);
        before - self.by_owner.len()
    }
}
