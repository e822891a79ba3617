use std::time::Duration;

use serde::Deserialize;
use tracing::{error, warn};

use super::{
    prompt::{user_prompt, NarrativePromptInput, SYSTEM_PROMPT},
    types::{
        chat_completion::{
            ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat,
        },
        narrative_error::NarrativeError,
        narrative_payload::{NarrativePayload, RawSuggestion},
    },
};
use crate::types::app_config::AppConfig;

const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f32 = 0.7;

#[derive(Clone)]
pub struct NarrativeServiceConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl NarrativeServiceConfig {
    /// Groq when its key is present, otherwise any OpenAI-compatible endpoint.
    pub fn from_app_config(config: &AppConfig) -> Option<Self> {
        if let Some(key) = &config.groq_key {
            return Some(NarrativeServiceConfig {
                api_key: key.clone(),
                base_url: config.hosts.groq.clone(),
                model: "llama-3.3-70b-versatile".to_string(),
            });
        }

        config.openai_key.as_ref().map(|key| NarrativeServiceConfig {
            api_key: key.clone(),
            base_url: config.hosts.openai.clone(),
            model: "gpt-4o-mini".to_string(),
        })
    }
}

#[derive(Clone)]
pub struct NarrativeService {
    config: NarrativeServiceConfig,
    client: reqwest::Client,
}

impl NarrativeService {
    pub fn new(config: NarrativeServiceConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub async fn generate(
        &self,
        input: &NarrativePromptInput<'_>,
    ) -> Result<Vec<RawSuggestion>, NarrativeError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt(input),
                },
            ],
            response_format: ResponseFormat {
                r#type: "json_object".to_string(),
            },
            temperature: TEMPERATURE,
        };

        let resp = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .timeout(GENERATION_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!("Text generation error {}: {}", status, body);
            return Err(NarrativeError::Upstream { status, body });
        }

        let content = resp
            .json::<ChatCompletionResponse>()
            .await?
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(NarrativeError::EmptyResponse)?;

        parse_suggestions(&content)
    }
}

/// Validates the generated JSON against the accepted shapes and keeps the
/// items that look like suggestions.
pub fn parse_suggestions(content: &str) -> Result<Vec<RawSuggestion>, NarrativeError> {
    let value: serde_json::Value = serde_json::from_str(content)?;

    let items = NarrativePayload::deserialize(value)
        .ok()
        .and_then(NarrativePayload::into_items)
        .ok_or(NarrativeError::UnrecognizedShape)?;

    let total = items.len();
    let suggestions: Vec<RawSuggestion> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<RawSuggestion>(item).ok())
        .filter(|s| s.name.as_deref().is_some_and(|n| !n.trim().is_empty()))
        .collect();

    if suggestions.len() < total {
        warn!(
            "Dropped {} malformed generated suggestions",
            total - suggestions.len()
        );
    }

    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::types::{category::Category, coordinate::Coordinate};

    #[test]
    fn accepts_every_known_shape() {
        let item = r#"{"name":"Luray Caverns","category":"Nature","location":"Luray, VA","description":"Caves."}"#;

        for content in [
            format!("[{}]", item),
            format!(r#"{{"suggestions":[{}]}}"#, item),
            format!(r#"{{"places":[{}]}}"#, item),
            format!(r#"{{"note":"hi","stops":[{}],"other":[]}}"#, item),
        ] {
            let parsed = parse_suggestions(&content).unwrap();
            assert_eq!(parsed.len(), 1, "{}", content);
            assert_eq!(parsed[0].name.as_deref(), Some("Luray Caverns"));
            assert_eq!(parsed[0].location.as_deref(), Some("Luray, VA"));
        }
    }

    #[test]
    fn drops_invalid_items_and_rejects_unknown_shapes() {
        let parsed =
            parse_suggestions(r#"[{"name":"A"},{"category":"Food"},"text",{"name":7},{"name":" "}]"#)
                .unwrap();
        assert_eq!(parsed.len(), 1);

        assert!(matches!(
            parse_suggestions(r#"{"answer":"none"}"#),
            Err(NarrativeError::UnrecognizedShape)
        ));
        assert!(matches!(
            parse_suggestions(r#""just text""#),
            Err(NarrativeError::UnrecognizedShape)
        ));
        assert!(matches!(
            parse_suggestions("not json"),
            Err(NarrativeError::InvalidJson(_))
        ));
    }

    #[test]
    fn prefers_groq_over_openai() {
        let mut config = AppConfig::with_host("http://mock");
        assert!(NarrativeServiceConfig::from_app_config(&config).is_none());

        config.openai_key = Some("openai".to_string());
        assert_eq!(
            NarrativeServiceConfig::from_app_config(&config).unwrap().model,
            "gpt-4o-mini"
        );

        config.groq_key = Some("groq".to_string());
        let chosen = NarrativeServiceConfig::from_app_config(&config).unwrap();
        assert_eq!(chosen.model, "llama-3.3-70b-versatile");
        assert_eq!(chosen.api_key, "groq");
    }

    #[tokio::test]
    async fn generate_posts_chat_completion() {
        let mut server = mockito::Server::new_async().await;
        let content = r#"{"suggestions":[{"name":"Great Falls Park","category":"Nature","location":"McLean, VA","description":"Waterfalls."}]}"#;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer secret")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "response_format": {"type": "json_object"},
                "temperature": 0.7
            })))
            .with_body(
                serde_json::json!({"choices": [{"message": {"content": content}}]}).to_string(),
            )
            .create_async()
            .await;

        let service = NarrativeService::new(
            NarrativeServiceConfig {
                api_key: "secret".to_string(),
                base_url: server.url(),
                model: "gpt-4o-mini".to_string(),
            },
            reqwest::Client::new(),
        );

        let subcategories = HashMap::new();
        let budgets = HashMap::new();
        let suggestions = service
            .generate(&NarrativePromptInput {
                start: "A",
                end: "B",
                route_sample: &[Coordinate::new(0.0, 0.0)],
                max_deviation_minutes: 30.0,
                categories: &[Category::Nature],
                subcategories: &subcategories,
                budgets: &budgets,
                count: 3,
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(suggestions[0].name.as_deref(), Some("Great Falls Park"));
    }

    #[tokio::test]
    async fn upstream_errors_are_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("invalid key")
            .create_async()
            .await;

        let service = NarrativeService::new(
            NarrativeServiceConfig {
                api_key: "bad".to_string(),
                base_url: server.url(),
                model: "m".to_string(),
            },
            reqwest::Client::new(),
        );

        let subcategories = HashMap::new();
        let budgets = HashMap::new();
        let err = service
            .generate(&NarrativePromptInput {
                start: "A",
                end: "B",
                route_sample: &[],
                max_deviation_minutes: 30.0,
                categories: &[],
                subcategories: &subcategories,
                budgets: &budgets,
                count: 3,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, NarrativeError::Upstream { status, .. } if status == 401));
    }
}
