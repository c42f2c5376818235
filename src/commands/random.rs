use crate::render::discord;
use crate::state::Context;
use tracing::{info, warn};

/// Fetch a random joke
#[poise::command(slash_command)]
pub async fn random(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    // Discord shows the deferred reply as the loading state
    ctx.defer_ephemeral().await?;

    let owner = ctx.author().id.get();
    ctx.data()
        .sessions
        .write()
        .await
        .get(owner)
        .begin_random();

    info!(user = %ctx.author().name, "random joke requested");
    let result = ctx.data().api.fetch_random().await;
    if let Err(e) = &result {
        warn!(user = %ctx.author().name, error = %e, "random joke failed");
    }

    let favorites = ctx.data().favorites.list(owner).await;
    // Overlapping requests each render on completion; the last one wins.
    let frame = ctx
        .data()
        .sessions
        .write()
        .await
        .get(owner)
        .show_random(result, &favorites);

    ctx.send(discord::reply(&frame)).await?;
    Ok(())
}
