use crate::Context;
use poise::CreateReply;
use poise::command;
use poise::serenity_prelude::CreateEmbed;

pub(crate) type Error = Box<dyn std::error::Error + Send + Sync>;

const EMBED_COLOR: u32 = 0xFCB514;

/// List the cached roster by jersey number
#[command(slash_command, prefix_command)]
pub async fn roster(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let entries = data.roster.entries().await;
    let embed = CreateEmbed::default()
        .title("Current roster")
        .color(EMBED_COLOR);
    let embed = if entries.is_empty() {
        embed.description("Roster cache is empty. Try `refresh` or wait for the next update.")
    } else {
        let list: String = entries
            .iter()
            .map(|(number, player)| format!("`#{number}` {} ({})", player.name, player.position))
            .collect::<Vec<_>>()
            .join("\n");
        embed.description(list)
    };
    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Re-fetch the roster cache right now
#[command(slash_command, prefix_command, required_permissions = "ADMINISTRATOR")]
pub async fn refresh(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    match data.roster.refresh().await {
        Ok(count) => {
            ctx.say(format!("Roster updated: {count} players cached."))
                .await?;
        }
        Err(err) => {
            tracing::warn!(error = %err, "manual roster refresh failed");
            ctx.say("Roster refresh failed. Still serving the previous snapshot.")
                .await?;
        }
    }
    Ok(())
}
