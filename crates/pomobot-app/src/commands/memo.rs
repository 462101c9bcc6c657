//! The `!memo` command family: persistent key-value notes.

use std::sync::Arc;

use pomobot_gateway::{GatewayClient, MessagePayload};
use tracing::warn;

use crate::store::MemoStore;
use crate::text::{code_block, help_list};

use super::{reply, strip_command};

pub struct MemoService {
    store: Arc<MemoStore>,
    client: GatewayClient,
}

impl MemoService {
    pub fn new(store: Arc<MemoStore>, client: GatewayClient) -> Self {
        Self { store, client }
    }

    pub async fn handle(&self, msg: &MessagePayload) {
        let content = msg.content.as_str();
        if content.starts_with("!memo.get") {
            self.get(msg).await;
        } else if content.starts_with("!memo.set") {
            self.set(msg).await;
        } else if content.starts_with("!memo.remove") {
            self.remove(msg).await;
        } else if content.starts_with("!memo.list") {
            self.list(msg).await;
        } else if content.starts_with("!memo.help") || content.trim() == "!memo" {
            self.help(msg).await;
        }
    }

    async fn get(&self, msg: &MessagePayload) {
        let key = strip_command(&msg.content);
        let text = match self.store.get(key) {
            Some(value) if value.is_empty() => format!("**{key}**\nthe value is empty :ghost:"),
            Some(value) => format!("**{key}**\n{}", code_block("md", &value)),
            None => format!("**{key}** is not set :cry:"),
        };
        reply(&self.client, &msg.channel, &text).await;
    }

    async fn set(&self, msg: &MessagePayload) {
        let body = strip_command(&msg.content);
        let (key, value) = split_key_value(body);
        if key.is_empty() {
            reply(&self.client, &msg.channel, "Usage: `!memo.set <key> <value>`").await;
            return;
        }

        let text = match self.store.set(key, value) {
            Ok(()) if value.is_empty() => format!("Noted **{key}** :cat:"),
            Ok(()) => format!("Saved **{key}** :wink:\n{}", code_block("md", value)),
            Err(e) => {
                warn!(key, error = %e, "failed to save memo");
                "Saving the memo failed :cry: please try again".to_string()
            }
        };
        reply(&self.client, &msg.channel, &text).await;
    }

    async fn remove(&self, msg: &MessagePayload) {
        let key = strip_command(&msg.content);
        let text = match self.store.remove(key) {
            Ok(Some(value)) if value.is_empty() => format!("Removed **{key}** :wave:"),
            Ok(Some(value)) => {
                format!("Removed **{key}** :wave:\n{}", code_block("md", &value))
            }
            Ok(None) => format!("**{key}** is not set :cry:"),
            Err(e) => {
                warn!(key, error = %e, "failed to remove memo");
                "Removing the memo failed :cry: please try again".to_string()
            }
        };
        reply(&self.client, &msg.channel, &text).await;
    }

    async fn list(&self, msg: &MessagePayload) {
        let memos = self.store.list();
        let text = if memos.is_empty() {
            "No memos saved yet :cry:".to_string()
        } else {
            memos
                .iter()
                .map(|(key, value)| {
                    if value.is_empty() {
                        format!("# **{key}**")
                    } else {
                        format!("# **{key}**\n{}", code_block("md", value))
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        reply(&self.client, &msg.channel, &text).await;
    }

    async fn help(&self, msg: &MessagePayload) {
        let text = help_list(
            "The `!memo` command keeps key-value notes for the channel.",
            &[
                ("!memo.get hoge", "shows the value saved under `\"hoge\"`"),
                (
                    "!memo.set hoge foo",
                    "saves `\"foo\"` under `\"hoge\"` (markdown and newlines allowed)",
                ),
                ("!memo.remove hoge", "deletes the value saved under `\"hoge\"`"),
                ("!memo.list", "shows every saved memo"),
                ("!memo.help", "shows this help (alias: `!memo`)"),
            ],
        );
        reply(&self.client, &msg.channel, &text).await;
    }
}

/// Split a `!memo.set` body at the first whitespace: the first token is
/// the key, everything after it (which may span lines) is the value.
pub fn split_key_value(body: &str) -> (&str, &str) {
    match body.find(char::is_whitespace) {
        Some(idx) => (&body[..idx], body[idx..].trim()),
        None => (body, ""),
    }
}
