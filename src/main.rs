mod api;
mod commands;
mod config;
mod cookies;
mod favorites;
mod joke;
mod render;
mod session;
mod state;

use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use tokio::sync::RwLock;
use tracing::{debug, error, info, Level};

use api::{JokeApi, API_BASE_URL};
use config::BotConfig;
use cookies::CookieJar;
use favorites::{CookieStore, Favorites};
use session::Sessions;
use state::AppState;

const SESSION_SWEEP_SECS: u64 = 5 * 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let config = BotConfig::from_env()?;

    // Init cookie jar
    let jar = CookieJar::open(&config.data_dir).await?;
    info!("Cookie jar initialized at {:?}", config.data_dir);

    let api = Arc::new(JokeApi::new()?);
    info!(base_url = API_BASE_URL, "Joke API client initialized");

    let sessions = Arc::new(RwLock::new(Sessions::default()));
    let sweeper = Arc::clone(&sessions);
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(SESSION_SWEEP_SECS));
        loop {
            tick.tick().await;
            let evicted = sweeper
                .write()
                .await
                .evict_idle(chrono::Utc::now().timestamp());
            if evicted > 0 {
                debug!(evicted, "dropped idle sessions");
            }
        }
    });

    let app_state = AppState {
        api,
        favorites: Arc::new(Favorites::new(CookieStore::new(jar))),
        sessions,
    };

    let guild_id = config.guild_id;
    let intents = serenity::GatewayIntents::GUILDS;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::jokes()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(commands::components::handle_event(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                let commands = &framework.options().commands;
                info!("Registering {} top-level command(s):", commands.len());
                for cmd in commands {
                    info!("  /{} ({} subcommands)", cmd.name, cmd.subcommands.len());
                    for sub in &cmd.subcommands {
                        info!("    /{} {}", cmd.name, sub.name);
                    }
                }

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        gid,
                    )
                    .await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(
                        ctx,
                        &framework.options().commands,
                    )
                    .await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting JokeGen Discord bot...");

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }

    Ok(())
}
