use crate::state::Context;
use tracing::debug;

/// Play joke audio automatically
#[poise::command(slash_command)]
pub async fn autoplay(
    ctx: Context<'_>,
    #[description = "Embed a player for each joke's audio"] enabled: bool,
) -> Result<(), anyhow::Error> {
    let owner = ctx.author().id.get();
    ctx.data()
        .sessions
        .write()
        .await
        .get(owner)
        .autoplay = enabled;
    debug!(owner, enabled, "autoplay changed");

    ctx.send(
        poise::CreateReply::default()
            .content(if enabled { "Autoplay on." } else { "Autoplay off." })
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
