//! Wikipedia lookup: best-matching article title plus its summary.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::Tool;

const SEARCH_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
const SUMMARY_ENDPOINT: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

/// Search Wikipedia and return the summary of the top hit.
pub struct WikipediaSearch {
    client: reqwest::Client,
}

impl WikipediaSearch {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("react-agent/0.1 (search tool)")
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for WikipediaSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WikipediaSearch {
    async fn search(&self, query: &str) -> anyhow::Result<String> {
        let search: Value = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", "1"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(title) = top_title(&search) else {
            return Ok(format!("No Wikipedia results found for: {}", query));
        };

        let url = format!(
            "{}/{}",
            SUMMARY_ENDPOINT,
            urlencoding::encode(&title.replace(' ', "_"))
        );
        let summary: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(format_summary(&title, &summary))
    }
}

fn top_title(search: &Value) -> Option<String> {
    search["query"]["search"]
        .as_array()?
        .first()?
        .get("title")?
        .as_str()
        .map(str::to_string)
}

fn format_summary(title: &str, summary: &Value) -> String {
    match summary["extract"].as_str().map(str::trim) {
        Some(extract) if !extract.is_empty() => format!("{}: {}", title, extract),
        _ => format!("{}: (no summary available)", title),
    }
}
