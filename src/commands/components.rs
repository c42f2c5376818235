use poise::serenity_prelude as serenity;
use tracing::debug;

use crate::render::discord::{self, Control, EXPIRED, NO_MORE};
use crate::state::AppState;

/// Routes button presses on joke views. Slash commands are handled by poise.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, AppState, anyhow::Error>,
    data: &AppState,
) -> Result<(), anyhow::Error> {
    if let serenity::FullEvent::InteractionCreate {
        interaction: serenity::Interaction::Component(component),
    } = event
    {
        handle_component(ctx, component, data).await?;
    }
    Ok(())
}

async fn handle_component(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &AppState,
) -> Result<(), anyhow::Error> {
    let Some(control) = Control::parse(&component.data.custom_id) else {
        return Ok(());
    };
    let owner = component.user.id.get();
    debug!(owner, frame = control.frame(), control = %control, "button pressed");

    match control {
        Control::Heart { frame, card } => {
            let target = data.sessions.write().await.get(owner).heart_target(frame, card);
            let updated = match target {
                Some(joke) => {
                    // Store I/O runs without the session lock.
                    let list = data.favorites.toggle(owner, &joke).await;
                    let favorited = data.favorites.is_favorited(owner, &joke).await;
                    data.sessions
                        .write()
                        .await
                        .get(owner)
                        .apply_heart(frame, card, &joke, &list, favorited)
                }
                None => None,
            };
            let response = match updated {
                Some(frame) => discord::update(&frame),
                None => discord::notice(EXPIRED),
            };
            component.create_response(ctx, response).await?;
        }
        Control::Open { frame, card } => {
            let favorites = data.favorites.list(owner).await;
            let opened = data
                .sessions
                .write()
                .await
                .get(owner)
                .open_favorite(frame, card, &favorites);
            let response = match opened {
                Some(frame) => discord::message(&frame),
                None => discord::notice(EXPIRED),
            };
            component.create_response(ctx, response).await?;
        }
        Control::More { frame } => {
            let favorites = data.favorites.list(owner).await;
            let next = data
                .sessions
                .write()
                .await
                .get(owner)
                .show_more(Some(frame), &favorites);
            match next {
                Some((Some(previous), batch)) => {
                    component
                        .create_response(ctx, discord::update(&previous))
                        .await?;
                    component
                        .create_followup(ctx, discord::followup(&batch))
                        .await?;
                }
                Some((None, batch)) => {
                    component
                        .create_response(ctx, discord::message(&batch))
                        .await?;
                }
                None => component.create_response(ctx, discord::notice(NO_MORE)).await?,
            }
        }
        Control::Close { .. } => {
            let was_open = data
                .sessions
                .write()
                .await
                .get(owner)
                .close_sidebar();
            debug!(owner, was_open, "sidebar closed");
            component.create_response(ctx, discord::closed()).await?;
        }
    }

    Ok(())
}
