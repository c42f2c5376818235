use std::fmt;

use poise::serenity_prelude as serenity;

use super::{Block, Frame, FrameKind, JokeCard};

/// Discord rejects message content above this many characters.
const MESSAGE_LIMIT: usize = 2000;
/// Room kept for the "…and N more" line when entries are left out.
const OMITTED_RESERVE: usize = 24;
/// Sidebar entries that get buttons (two rows each of open and heart).
const SIDEBAR_BUTTONS: usize = 10;
const BUTTONS_PER_ROW: usize = 5;

pub const SIDEBAR_CLOSED: &str = "Favorites closed.";
pub const EXPIRED: &str = "This view has expired. Run the command again.";
pub const NO_MORE: &str = "No more results.";

/// A clickable control, encoded into a button's custom id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Heart { frame: u64, card: usize },
    Open { frame: u64, card: usize },
    More { frame: u64 },
    Close { frame: u64 },
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Heart { frame, card } => write!(f, "jokes:fav:{}:{}", frame, card),
            Control::Open { frame, card } => write!(f, "jokes:open:{}:{}", frame, card),
            Control::More { frame } => write!(f, "jokes:more:{}", frame),
            Control::Close { frame } => write!(f, "jokes:close:{}", frame),
        }
    }
}

impl Control {
    /// Decode a custom id. Ids from other components yield `None`.
    pub fn parse(custom_id: &str) -> Option<Self> {
        let mut parts = custom_id.strip_prefix("jokes:")?.split(':');
        let kind = parts.next()?;
        let frame = parts.next()?.parse().ok()?;
        let card = parts.next().map(|c| c.parse::<usize>());
        if parts.next().is_some() {
            return None;
        }

        match (kind, card) {
            ("fav", Some(Ok(card))) => Some(Control::Heart { frame, card }),
            ("open", Some(Ok(card))) => Some(Control::Open { frame, card }),
            ("more", None) => Some(Control::More { frame }),
            ("close", None) => Some(Control::Close { frame }),
            _ => None,
        }
    }

    pub fn frame(&self) -> u64 {
        match self {
            Control::Heart { frame, .. }
            | Control::Open { frame, .. }
            | Control::More { frame }
            | Control::Close { frame } => *frame,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Primary,
    Secondary,
    Danger,
}

impl From<Tone> for serenity::ButtonStyle {
    fn from(tone: Tone) -> Self {
        match tone {
            Tone::Primary => serenity::ButtonStyle::Primary,
            Tone::Secondary => serenity::ButtonStyle::Secondary,
            Tone::Danger => serenity::ButtonStyle::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    pub control: Control,
    pub label: String,
    pub tone: Tone,
}

fn heart_button(frame: u64, index: usize, card: &JokeCard, favorited: bool) -> ButtonSpec {
    ButtonSpec {
        control: Control::Heart { frame, card: index },
        label: format!("♥ {}", card.number),
        // Red when favorited, grey otherwise.
        tone: if favorited { Tone::Danger } else { Tone::Secondary },
    }
}

fn audio_line(card: &JokeCard) -> Option<String> {
    let audio = card.audio.as_ref()?;
    // A bare link gets an inline player; angle brackets suppress it.
    Some(if audio.autoplay {
        format!("🔊 {}", audio.src)
    } else {
        format!("🔊 [Play audio](<{}>)", audio.src)
    })
}

fn clip(text: String) -> String {
    if text.chars().count() <= MESSAGE_LIMIT {
        return text;
    }
    let mut clipped: String = text.chars().take(MESSAGE_LIMIT - 1).collect();
    clipped.push('…');
    clipped
}

fn block_text(kind: FrameKind, block: &Block) -> String {
    let mut out = match block {
        Block::Message(text) => text.clone(),
        Block::Card(card) => {
            let mut text = match kind {
                FrameKind::Display => card.lines.join("\n"),
                FrameKind::Results => format!("**{}.** {}", card.number, card.lines.join("\n")),
                FrameKind::Sidebar => format!("`{}.` {}", card.number, card.lines.join(" ")),
            };
            if let Some(line) = audio_line(card) {
                text.push('\n');
                text.push_str(&line);
            }
            text
        }
    };
    out.push('\n');
    if kind == FrameKind::Results {
        out.push('\n');
    }
    out
}

/// Message text for a view. Whole entries that no longer fit are left out
/// and counted on a closing "…and N more" line.
pub fn content(frame: &Frame) -> String {
    let mut out = String::new();
    if frame.kind == FrameKind::Sidebar {
        out.push_str("**Favorites**\n");
    }
    let mut used = out.chars().count();

    let total = frame.blocks.len();
    for (i, block) in frame.blocks.iter().enumerate() {
        let text = block_text(frame.kind, block);
        let len = text.chars().count();
        let reserve = if i + 1 < total { OMITTED_RESERVE } else { 0 };
        if i > 0 && used + len + reserve > MESSAGE_LIMIT {
            out.push_str(&format!("…and {} more", total - i));
            break;
        }
        out.push_str(&text);
        used += len;
    }

    clip(out.trim_end().to_string())
}

pub fn button_rows(frame: &Frame) -> Vec<Vec<ButtonSpec>> {
    let cards = frame
        .blocks
        .iter()
        .enumerate()
        .filter_map(|(i, b)| b.as_card().map(|c| (i, c)));

    let mut rows = Vec::new();
    match frame.kind {
        FrameKind::Display | FrameKind::Results => {
            let hearts: Vec<ButtonSpec> = cards
                .filter_map(|(i, c)| c.heart.map(|h| heart_button(frame.id, i, c, h.favorited)))
                .collect();
            rows.extend(hearts.chunks(BUTTONS_PER_ROW).map(|r| r.to_vec()));

            if frame.show_more {
                rows.push(vec![ButtonSpec {
                    control: Control::More { frame: frame.id },
                    label: "Show More Results".to_string(),
                    tone: Tone::Primary,
                }]);
            }
        }
        FrameKind::Sidebar => {
            let entries: Vec<(usize, &JokeCard)> = cards.take(SIDEBAR_BUTTONS).collect();
            let opens: Vec<ButtonSpec> = entries
                .iter()
                .filter(|(_, c)| c.opens_display)
                .map(|(i, c)| ButtonSpec {
                    control: Control::Open {
                        frame: frame.id,
                        card: *i,
                    },
                    label: format!("▶ {}", c.number),
                    tone: Tone::Secondary,
                })
                .collect();
            let hearts: Vec<ButtonSpec> = entries
                .iter()
                .filter_map(|(i, c)| c.heart.map(|h| heart_button(frame.id, *i, c, h.favorited)))
                .collect();
            rows.extend(opens.chunks(BUTTONS_PER_ROW).map(|r| r.to_vec()));
            rows.extend(hearts.chunks(BUTTONS_PER_ROW).map(|r| r.to_vec()));

            rows.push(vec![ButtonSpec {
                control: Control::Close { frame: frame.id },
                label: "Close".to_string(),
                tone: Tone::Secondary,
            }]);
        }
    }
    rows
}

pub fn components(frame: &Frame) -> Vec<serenity::CreateActionRow> {
    button_rows(frame)
        .into_iter()
        .map(|row| {
            serenity::CreateActionRow::Buttons(
                row.into_iter()
                    .map(|b| {
                        serenity::CreateButton::new(b.control.to_string())
                            .label(b.label)
                            .style(b.tone.into())
                    })
                    .collect(),
            )
        })
        .collect()
}

/// First response to a slash command.
pub fn reply(frame: &Frame) -> poise::CreateReply {
    poise::CreateReply::default()
        .content(content(frame))
        .components(components(frame))
        .ephemeral(true)
}

/// Redraw the message a button belongs to.
pub fn update(frame: &Frame) -> serenity::CreateInteractionResponse {
    serenity::CreateInteractionResponse::UpdateMessage(
        serenity::CreateInteractionResponseMessage::new()
            .content(content(frame))
            .components(components(frame)),
    )
}

/// A new message in answer to a button press.
pub fn message(frame: &Frame) -> serenity::CreateInteractionResponse {
    serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .content(content(frame))
            .components(components(frame))
            .ephemeral(true),
    )
}

/// An extra message after the button's own message was redrawn.
pub fn followup(frame: &Frame) -> serenity::CreateInteractionResponseFollowup {
    serenity::CreateInteractionResponseFollowup::new()
        .content(content(frame))
        .components(components(frame))
        .ephemeral(true)
}

pub fn closed() -> serenity::CreateInteractionResponse {
    serenity::CreateInteractionResponse::UpdateMessage(
        serenity::CreateInteractionResponseMessage::new()
            .content(SIDEBAR_CLOSED)
            .components(vec![]),
    )
}

pub fn notice(text: &str) -> serenity::CreateInteractionResponse {
    serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .content(text)
            .ephemeral(true),
    )
}
