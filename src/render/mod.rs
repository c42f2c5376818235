//! View model for the joke screens.
//!
//! Rendering writes [`Block`]s into a [`RenderTarget`] instead of talking to
//! Discord directly, so the favorite and audio wiring can be checked without a
//! gateway connection. [`discord`] turns the result into messages and buttons.

pub mod discord;
pub mod search;

use crate::favorites::contains;
use crate::joke::Joke;

use search::SearchSession;

pub const NO_FAVORITES: &str = "No favorites yet.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioControl {
    pub src: String,
    pub autoplay: bool,
}

/// The heart toggle. Its state is what the user sees, not what the store says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartControl {
    pub favorited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JokeCard {
    pub joke: Joke,
    /// 1-based position shown next to the joke and on its buttons.
    pub number: usize,
    pub lines: Vec<String>,
    pub audio: Option<AudioControl>,
    pub heart: Option<HeartControl>,
    /// Sidebar entries open the joke in the display area when clicked.
    pub opens_display: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Message(String),
    Card(JokeCard),
}

impl Block {
    pub fn as_card(&self) -> Option<&JokeCard> {
        match self {
            Block::Card(card) => Some(card),
            Block::Message(_) => None,
        }
    }
}

/// A container the renderer can clear and fill.
pub trait RenderTarget {
    fn clear(&mut self);
    fn append(&mut self, block: Block);

    fn show_message(&mut self, text: &str) {
        self.clear();
        self.append(Block::Message(text.to_string()));
    }
}

#[derive(Debug, Clone, Default)]
pub struct Panel {
    blocks: Vec<Block>,
}

impl Panel {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }
}

impl RenderTarget for Panel {
    fn clear(&mut self) {
        self.blocks.clear();
    }

    fn append(&mut self, block: Block) {
        self.blocks.push(block);
    }
}

/// Card with the audio player and heart, which only exist when the joke has audio.
fn media_card(joke: &Joke, number: usize, favorites: &[Joke], autoplay: bool) -> JokeCard {
    let audio = joke.audio_src().map(|src| AudioControl { src, autoplay });
    let heart = audio.as_ref().map(|_| HeartControl {
        favorited: contains(favorites, joke),
    });
    JokeCard {
        joke: joke.clone(),
        number,
        lines: joke.display_lines(),
        audio,
        heart,
        opens_display: false,
    }
}

pub fn display_joke(target: &mut impl RenderTarget, joke: &Joke, favorites: &[Joke], autoplay: bool) {
    target.clear();
    target.append(Block::Card(media_card(joke, 1, favorites, autoplay)));
}

/// Append the next batch. Returns whether the "load more" control should show.
pub fn render_search_batch(
    session: &mut SearchSession,
    target: &mut impl RenderTarget,
    favorites: &[Joke],
    autoplay: bool,
) -> bool {
    let (start, batch) = session.next_batch();
    for (i, joke) in batch.iter().enumerate() {
        let mut card = media_card(joke, start + i + 1, favorites, autoplay);
        // Search results show the raw text without the empty-text fallback.
        card.lines = joke.joke_text.split('\n').map(|l| l.to_string()).collect();
        target.append(Block::Card(card));
    }
    session.has_more()
}

pub fn render_favorites_sidebar(target: &mut impl RenderTarget, favorites: &[Joke]) {
    target.clear();
    if favorites.is_empty() {
        target.append(Block::Message(NO_FAVORITES.to_string()));
        return;
    }
    for (i, joke) in favorites.iter().enumerate() {
        target.append(Block::Card(JokeCard {
            joke: joke.clone(),
            number: i + 1,
            lines: vec![joke.joke_text.clone()],
            audio: None,
            heart: Some(HeartControl { favorited: true }),
            opens_display: true,
        }));
    }
}

/// Which area a sent view was rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Display,
    Results,
    Sidebar,
}

/// A rendered view that was sent to the user and can still receive clicks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: u64,
    pub kind: FrameKind,
    pub blocks: Vec<Block>,
    pub show_more: bool,
    /// Which search a results view belongs to. Zero for other views.
    pub search: u64,
}

impl Frame {
    pub fn card(&self, index: usize) -> Option<&JokeCard> {
        self.blocks.get(index).and_then(Block::as_card)
    }

    /// Flip the heart on one card in place. False when there is no heart there.
    pub fn set_heart(&mut self, index: usize, favorited: bool) -> bool {
        match self.blocks.get_mut(index) {
            Some(Block::Card(JokeCard {
                heart: Some(heart), ..
            })) => {
                heart.favorited = favorited;
                true
            }
            _ => false,
        }
    }
}

/// Everything one user currently sees.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub display: Panel,
    pub results: Panel,
    pub sidebar: Panel,
    pub search_visible: bool,
    pub show_more_visible: bool,
    pub sidebar_open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jokes(n: usize) -> Vec<Joke> {
        (0..n)
            .map(|i| Joke::new(format!("joke {}", i), Some(&format!("/audio/{}.mp3", i))))
            .collect()
    }

    fn cards(panel: &Panel) -> Vec<&JokeCard> {
        panel.blocks().iter().filter_map(Block::as_card).collect()
    }

    #[test]
    fn test_display_joke_with_audio() {
        let mut panel = Panel::default();
        let joke = Joke::new("Line one\nLine two", Some("/audio/7.mp3"));
        display_joke(&mut panel, &joke, &[joke.clone()], true);

        assert_eq!(panel.len(), 1);
        let card = cards(&panel)[0];
        assert_eq!(card.lines, vec!["Line one", "Line two"]);
        assert_eq!(
            card.audio,
            Some(AudioControl {
                src: "https://jokegen-backend.onrender.com/audio/7.mp3".to_string(),
                autoplay: true,
            })
        );
        assert_eq!(card.heart, Some(HeartControl { favorited: true }));
    }

    #[test]
    fn test_display_joke_without_audio_has_no_heart() {
        let mut panel = Panel::default();
        display_joke(&mut panel, &Joke::new("silent", None), &[], false);
        let card = cards(&panel)[0];
        assert!(card.audio.is_none());
        assert!(card.heart.is_none());
    }

    #[test]
    fn test_display_joke_replaces_previous() {
        let mut panel = Panel::default();
        panel.show_message("Loading...");
        display_joke(&mut panel, &Joke::new("a", None), &[], false);
        display_joke(&mut panel, &Joke::new("b", None), &[], false);
        assert_eq!(panel.len(), 1);
        assert_eq!(cards(&panel)[0].joke.joke_text, "b");
    }

    #[test]
    fn test_search_batches_of_twelve() {
        let mut session = SearchSession::new(jokes(12));
        let mut panel = Panel::default();

        assert!(render_search_batch(&mut session, &mut panel, &[], false));
        assert_eq!(panel.len(), 5);
        assert!(render_search_batch(&mut session, &mut panel, &[], false));
        assert_eq!(panel.len(), 10);
        assert!(!render_search_batch(&mut session, &mut panel, &[], false));
        assert_eq!(panel.len(), 12);

        let numbers: Vec<usize> = cards(&panel).iter().map(|c| c.number).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_search_batch_reflects_favorites() {
        let results = jokes(3);
        let favorites = vec![results[1].clone()];
        let mut session = SearchSession::new(results);
        let mut panel = Panel::default();
        render_search_batch(&mut session, &mut panel, &favorites, false);

        let hearts: Vec<bool> = cards(&panel)
            .iter()
            .map(|c| c.heart.unwrap().favorited)
            .collect();
        assert_eq!(hearts, vec![false, true, false]);
    }

    #[test]
    fn test_sidebar_placeholder_when_empty() {
        let mut panel = Panel::default();
        render_favorites_sidebar(&mut panel, &[]);
        assert_eq!(panel.blocks(), &[Block::Message(NO_FAVORITES.to_string())]);
    }

    #[test]
    fn test_sidebar_rebuilds_from_list() {
        let mut panel = Panel::default();
        render_favorites_sidebar(&mut panel, &jokes(3));
        render_favorites_sidebar(&mut panel, &jokes(2));

        let entries = cards(&panel);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|c| c.opens_display));
        assert!(entries.iter().all(|c| c.heart == Some(HeartControl { favorited: true })));
        assert!(entries.iter().all(|c| c.audio.is_none()));
    }

    #[test]
    fn test_frame_set_heart_only_touches_target() {
        let mut panel = Panel::default();
        let mut session = SearchSession::new(jokes(3));
        render_search_batch(&mut session, &mut panel, &[], false);
        let mut frame = Frame {
            id: 1,
            kind: FrameKind::Results,
            blocks: panel.blocks().to_vec(),
            show_more: false,
            search: 1,
        };

        assert!(frame.set_heart(1, true));
        assert_eq!(frame.card(0).unwrap().heart.unwrap().favorited, false);
        assert_eq!(frame.card(1).unwrap().heart.unwrap().favorited, true);
        assert_eq!(frame.card(2).unwrap().heart.unwrap().favorited, false);
        assert!(!frame.set_heart(9, true));
    }
}
