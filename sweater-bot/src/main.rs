mod discord_commands;
mod purge;

use std::sync::Arc;

use poise::{Framework, FrameworkOptions, serenity_prelude as serenity};
use sweater_bot::config::Config;
use sweater_bot::idle::IdleWatcher;
use sweater_bot::router;
use sweater_nhl::{NhlClient, RosterCache};
use tokio::time::MissedTickBehavior;

use crate::purge::ChannelPurge;

type Context<'a> = poise::Context<'a, crate::Data, crate::discord_commands::Error>;
type Error = crate::discord_commands::Error;

pub(crate) struct Data {
    pub(crate) roster: Arc<RosterCache>,
    pub(crate) stats: NhlClient,
    pub(crate) idle: IdleWatcher<ChannelPurge>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing for structured logging
    #[cfg(debug_assertions)]
    let log_level = tracing::Level::DEBUG;
    #[cfg(not(debug_assertions))]
    let log_level = tracing::Level::INFO;

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();
    tracing::info!("Starting sweater bot...");
    // Load configuration from environment variables or use defaults
    let config = Config::from_env();
    tracing::info!(
        "Configuration: team={}, refresh={}s, idle_timeout={}s, purge_limit={}, http_timeout={}s, prefix={}",
        config.team,
        config.refresh_interval.as_secs(),
        config.idle_timeout.as_secs(),
        config.purge_limit,
        config.http_timeout.as_secs(),
        config.command_prefix
    );

    let stats = NhlClient::new(config.http_timeout).expect("Error building NHL client");
    let roster = Arc::new(RosterCache::new(stats.clone(), config.team.clone()));

    // Periodic roster refresh. The first tick fires immediately and doubles
    // as the startup load; a failed fetch keeps the previous snapshot.
    let refresh_roster = Arc::clone(&roster);
    let refresh_interval = config.refresh_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            tracing::info!("Updating roster cache...");
            match refresh_roster.refresh().await {
                Ok(count) => tracing::info!(players = count, "roster cache updated"),
                Err(err) => {
                    tracing::warn!(error = %err, "roster refresh failed, keeping previous snapshot")
                }
            }
        }
    });

    // Reading plain message bodies needs the privileged message-content
    // intent on top of the defaults.
    let intents = serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let token = config
        .discord_token
        .expect("DISCORD_TOKEN environment variable is required");
    let idle_timeout = config.idle_timeout;
    let purge_limit = config.purge_limit;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![discord_commands::roster(), discord_commands::refresh()],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone()),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            pre_command: |ctx| {
                Box::pin(async move {
                    tracing::info!(
                        "Executing command '{}' by user '{}'",
                        ctx.command().name,
                        ctx.author().name
                    );
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    tracing::info!(
                        "Finished command '{}' by user '{}'",
                        ctx.command().name,
                        ctx.author().name
                    );
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let roster = Arc::clone(&roster);
            let stats = stats.clone();
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                let idle = IdleWatcher::new(
                    idle_timeout,
                    ChannelPurge::new(Arc::clone(&ctx.http), purge_limit),
                );
                Ok(Data {
                    roster,
                    stats,
                    idle,
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .expect("Error creating Discord client");
    if let Err(e) = client.start().await {
        tracing::error!("Discord client error: {:?}", e);
    }
}

/// Every non-bot message re-arms its channel's inactivity timer, and bodies
/// that are nothing but digits get a roster lookup. Prefix and slash
/// commands are dispatched by poise on its own pass over the same events,
/// so they keep working regardless of what happens here.
async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        // Skipping bot authors also keeps our own purge notice from
        // re-arming the timer it just expired.
        if new_message.author.bot {
            return Ok(());
        }
        data.idle.reset(new_message.channel_id.get()).await;
        if let Some(reply) =
            router::jersey_reply(&data.roster, &data.stats, &new_message.content).await
        {
            new_message.channel_id.say(&ctx.http, reply).await?;
        }
    }
    Ok(())
}
