//! The `!wiki` command: encyclopedia intro lookups via the MediaWiki
//! API.

use std::collections::HashMap;

use pomobot_common::LookupError;
use pomobot_gateway::{GatewayClient, MessagePayload};
use serde::Deserialize;
use tracing::warn;

use crate::text::{help_list, markdown_list};

use super::{reply, strip_command};

pub struct WikiService {
    http: reqwest::Client,
    api_host: String,
    client: GatewayClient,
}

/// Response of a `prop=extracts` query.
#[derive(Debug, Deserialize)]
struct WikiResponse {
    #[serde(default)]
    query: WikiQuery,
}

#[derive(Debug, Default, Deserialize)]
struct WikiQuery {
    #[serde(default)]
    pages: HashMap<String, WikiPage>,
}

#[derive(Debug, Clone, Deserialize)]
struct WikiPage {
    #[serde(default)]
    pageid: Option<u64>,
    title: String,
    #[serde(default)]
    extract: Option<String>,
}

impl WikiService {
    pub fn new(http: reqwest::Client, api_host: String, client: GatewayClient) -> Self {
        Self {
            http,
            api_host,
            client,
        }
    }

    pub async fn handle(&self, msg: &MessagePayload) {
        let content = msg.content.as_str();
        if content.starts_with("!wiki.help") || content.trim() == "!wiki" {
            self.help(msg).await;
        } else if content.starts_with("!wiki ") {
            self.summary(msg).await;
        }
    }

    async fn summary(&self, msg: &MessagePayload) {
        let term = strip_command(&msg.content);
        let text = match self.fetch_summary(term).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                format!("`{term}` was not found on the encyclopedia :smiling_face_with_tear:")
            }
            Err(e) => {
                warn!(term, error = %e, "encyclopedia lookup failed");
                "The lookup failed :smiling_face_with_tear: the encyclopedia server \
                 may be having trouble :pleading_face:"
                    .to_string()
            }
        };
        reply(&self.client, &msg.channel, &text).await;
    }

    /// Fetch the intro extract for a term. `Ok(None)` means the term has
    /// no article.
    async fn fetch_summary(&self, term: &str) -> Result<Option<String>, LookupError> {
        let url = format!("{}/w/api.php", self.api_host);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "json"),
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", ""),
                ("explaintext", ""),
                ("redirects", "1"),
                ("titles", term),
            ])
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(LookupError::Api(format!("HTTP {status}: {text}")));
        }

        let parsed: WikiResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        Ok(render_summary(&self.api_host, term, &parsed))
    }

    async fn help(&self, msg: &MessagePayload) {
        let text = help_list(
            "The `!wiki` command quotes the encyclopedia's summary of a term.",
            &[
                ("!wiki hoge", "fetches and quotes the summary of `\"hoge\"`"),
                ("!wiki.help", "shows this help (alias: `!wiki`)"),
            ],
        );
        reply(&self.client, &msg.channel, &text).await;
    }
}

/// Render the reply for a lookup: a source link header plus every page
/// that carried an extract. `None` when no page did.
fn render_summary(host: &str, term: &str, response: &WikiResponse) -> Option<String> {
    let mut pages: Vec<&WikiPage> = response.query.pages.values().collect();
    pages.sort_by(|a, b| a.title.cmp(&b.title));

    let items: Vec<(String, String)> = pages
        .iter()
        .filter_map(|page| {
            page.extract
                .as_ref()
                .map(|extract| (page.title.clone(), extract.clone()))
        })
        .collect();
    if items.is_empty() {
        return None;
    }

    let pageid = pages
        .iter()
        .find(|page| page.extract.is_some())
        .and_then(|page| page.pageid)
        .unwrap_or(0);
    let header = format!("<{host}/?curid={pageid}> `[{term}]`");
    Some(markdown_list(&header, &items))
}
