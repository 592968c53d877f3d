//! Google web search through SerpAPI.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::Tool;

const SERP_ENDPOINT: &str = "https://serpapi.com/search.json";
const MAX_RESULTS: usize = 5;

/// Search Google via SerpAPI.
pub struct GoogleSearch {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GoogleSearch {
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { api_key, client }
    }
}

#[async_trait]
impl Tool for GoogleSearch {
    async fn search(&self, query: &str) -> anyhow::Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("SERP_API_KEY is not configured"))?;

        let response = self
            .client
            .get(SERP_ENDPOINT)
            .query(&[("engine", "google"), ("q", query), ("api_key", api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", status));
        }

        let body: Value = response.json().await?;
        if let Some(error) = body["error"].as_str() {
            return Err(anyhow::anyhow!("SerpAPI error: {}", error));
        }

        Ok(format_results(query, &body))
    }
}

fn format_results(query: &str, body: &Value) -> String {
    if let Some(answer) = answer_box(body) {
        return answer;
    }

    let results: Vec<String> = body["organic_results"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .take(MAX_RESULTS)
                .filter_map(|item| {
                    let title = item["title"].as_str()?;
                    let snippet = item["snippet"].as_str().unwrap_or("No snippet");
                    let link = item["link"].as_str().unwrap_or("");
                    Some(format!("{}\n{}\nURL: {}", title, snippet, link))
                })
                .collect()
        })
        .unwrap_or_default();

    if results.is_empty() {
        format!("No results found for: {}", query)
    } else {
        results.join("\n\n")
    }
}

fn answer_box(body: &Value) -> Option<String> {
    let answer_box = body.get("answer_box")?;
    ["answer", "snippet"]
        .iter()
        .find_map(|key| answer_box[*key].as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_answer_box_wins() {
        let body = json!({
            "answer_box": {"answer": "5 titles"},
            "organic_results": [{"title": "ignored", "snippet": "x", "link": "y"}]
        });
        assert_eq!(format_results("world cups brazil", &body), "5 titles");
    }

    #[test]
    fn test_organic_results_are_formatted() {
        let body = json!({
            "organic_results": [
                {"title": "Oldest tree", "snippet": "About 3,000 years", "link": "https://example.com/a"},
                {"title": "No snippet here", "link": "https://example.com/b"},
                {"snippet": "missing title is skipped"}
            ]
        });
        assert_eq!(
            format_results("oldest tree", &body),
            "Oldest tree\nAbout 3,000 years\nURL: https://example.com/a\n\nNo snippet here\nNo snippet\nURL: https://example.com/b"
        );
    }

    #[test]
    fn test_no_results_message() {
        assert_eq!(format_results("zzz", &json!({})), "No results found for: zzz");
    }

    #[tokio::test]
    async fn test_missing_key_is_an_error() {
        let tool = GoogleSearch::new(None);
        let err = tool.search("anything").await.unwrap_err();
        assert_eq!(err.to_string(), "SERP_API_KEY is not configured");
    }
}
