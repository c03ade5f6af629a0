use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, GetMessages};
use sweater_bot::idle::IdleAction;

pub(crate) const PURGE_NOTICE: &str = "Channel cleared after a period of inactivity.";

/// Inactivity cleanup: delete the channel's recent messages and leave a
/// notice behind.
pub(crate) struct ChannelPurge {
    http: Arc<serenity::Http>,
    limit: u8,
}

impl ChannelPurge {
    pub(crate) fn new(http: Arc<serenity::Http>, limit: u8) -> Self {
        Self { http, limit }
    }
}

impl IdleAction for ChannelPurge {
    async fn run(&self, channel_id: u64) -> anyhow::Result<()> {
        let channel = serenity::ChannelId::new(channel_id);
        let recent = channel
            .messages(&self.http, GetMessages::new().limit(self.limit))
            .await?;
        match recent.len() {
            0 => {}
            // Bulk delete needs at least two messages and rejects anything
            // older than two weeks; a lone straggler goes one at a time.
            1 => channel.delete_message(&self.http, recent[0].id).await?,
            _ => {
                let ids: Vec<serenity::MessageId> = recent.iter().map(|m| m.id).collect();
                channel.delete_messages(&self.http, ids).await?;
            }
        }
        channel.say(&self.http, PURGE_NOTICE).await?;
        Ok(())
    }
}
