use crate::render::discord;
use crate::state::Context;
use tracing::{info, warn};

/// Search jokes by term
#[poise::command(slash_command)]
pub async fn search(
    ctx: Context<'_>,
    #[description = "Search term"] term: String,
) -> Result<(), anyhow::Error> {
    let term = term.trim();
    if term.is_empty() {
        ctx.send(
            poise::CreateReply::default()
                .content("Enter a search term.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    ctx.defer_ephemeral().await?;

    let owner = ctx.author().id.get();
    ctx.data()
        .sessions
        .write()
        .await
        .get(owner)
        .begin_search();

    info!(user = %ctx.author().name, term, "search started");
    let result = ctx.data().api.fetch_search(term).await;
    match &result {
        Ok(jokes) => info!(term, count = jokes.len(), "search complete"),
        Err(e) => warn!(term, error = %e, "search failed"),
    }

    let favorites = ctx.data().favorites.list(owner).await;
    let frame = ctx
        .data()
        .sessions
        .write()
        .await
        .get(owner)
        .show_search(result, &favorites);

    ctx.send(discord::reply(&frame)).await?;
    Ok(())
}

/// Show the next batch of search results
#[poise::command(slash_command)]
pub async fn more(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let owner = ctx.author().id.get();
    let favorites = ctx.data().favorites.list(owner).await;
    let next = {
        let mut sessions = ctx.data().sessions.write().await;
        let session = sessions.get(owner);
        if session.screen.search_visible {
            Some(session.show_more(None, &favorites))
        } else {
            None
        }
    };

    let reply = match next {
        Some(Some((_, frame))) => discord::reply(&frame),
        Some(None) => poise::CreateReply::default()
            .content(discord::NO_MORE)
            .ephemeral(true),
        None => poise::CreateReply::default()
            .content("Search for jokes first with `/jokes search`.")
            .ephemeral(true),
    };
    ctx.send(reply).await?;
    Ok(())
}
