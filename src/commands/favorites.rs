use crate::render::discord;
use crate::state::Context;

/// Open your favorites
#[poise::command(slash_command)]
pub async fn favorites(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let owner = ctx.author().id.get();
    let list = ctx.data().favorites.list(owner).await;
    let frame = ctx
        .data()
        .sessions
        .write()
        .await
        .get(owner)
        .open_sidebar(&list);

    ctx.send(discord::reply(&frame)).await?;
    Ok(())
}
