//! Mention responder: introduces the bot from its own README.

use std::path::PathBuf;

use pomobot_gateway::{GatewayClient, MessagePayload};
use tracing::warn;

use crate::text::code_block;

use super::reply;

pub struct MentionService {
    client: GatewayClient,
    readme_path: PathBuf,
}

impl MentionService {
    pub fn new(client: GatewayClient, readme_path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            readme_path: readme_path.into(),
        }
    }

    /// Reply to a mention with the README's introduction.
    pub async fn reply_to(&self, msg: &MessagePayload) {
        let md = match tokio::fs::read_to_string(&self.readme_path).await {
            Ok(md) => md,
            Err(e) => {
                warn!(path = %self.readme_path.display(), error = %e, "failed to read README");
                return;
            }
        };
        let text = render_introduction(&md);
        reply(&self.client, &msg.channel, &text).await;
    }
}

/// The README's opening section and feature list, wrapped in a markdown
/// code fence.
fn render_introduction(md: &str) -> String {
    let sections: Vec<String> = ["# pomobot", "## Features"]
        .iter()
        .filter_map(|heading| extract_section(md, heading))
        .collect();
    code_block("md", &format!("{}\n", sections.join("\n\n")))
}

/// Slice one markdown section: from the heading up to the next heading
/// line, trimmed.
fn extract_section(md: &str, heading: &str) -> Option<String> {
    let start = md.find(heading)?;
    let after = &md[start..];
    let end = after[heading.len()..]
        .find("\n#")
        .map(|rel| heading.len() + rel)
        .unwrap_or(after.len());
    Some(after[..end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "# pomobot\n\nA voice-channel pomodoro bot.\n\n\
        ## Features\n\n- pomodoro timer\n- memos\n\n## Setup\n\nIgnore this.\n";

    #[test]
    fn extract_section_stops_at_next_heading() {
        let section = extract_section(README, "## Features").unwrap();
        assert!(section.contains("- pomodoro timer"));
        assert!(!section.contains("Setup"));
    }

    #[test]
    fn extract_section_missing_heading_is_none() {
        assert!(extract_section(README, "## License").is_none());
    }

    #[test]
    fn introduction_joins_description_and_features() {
        let text = render_introduction(README);
        assert!(text.starts_with("```md\n"));
        assert!(text.contains("A voice-channel pomodoro bot."));
        assert!(text.contains("- memos"));
        assert!(!text.contains("Ignore this."));
    }
}
