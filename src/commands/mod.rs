pub mod components;
mod favorites;
mod random;
mod search;
mod settings;

use crate::state::Context;

/// JokeGen - random jokes, search, and favorites
#[poise::command(
    slash_command,
    subcommands(
        "random::random",
        "search::search",
        "search::more",
        "favorites::favorites",
        "settings::autoplay"
    )
)]
pub async fn jokes(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}
