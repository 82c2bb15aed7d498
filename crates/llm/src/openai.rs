use crate::client::{LlmClient, OfflineLlm};
use crate::error::{LlmError, Result};
use crate::shared::SharedResource;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.6;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ERROR_BODY_CHARS: usize = 512;

static HTTP_CLIENT: SharedResource<reqwest::Client> = SharedResource::new();

fn shared_http_client() -> Result<Arc<reqwest::Client>> {
    HTTP_CLIENT.get_or_try_init(|| {
        log::debug!("Building shared HTTP client for LLM backends");
        reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|err| LlmError::Config(format!("failed to build HTTP client: {err}")))
    })
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LlmMode {
    OpenAi,
    Offline,
}

impl LlmMode {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" | "http" => Ok(Self::OpenAi),
            "offline" | "stub" => Ok(Self::Offline),
            other => Err(LlmError::Config(format!(
                "Unsupported WORDPACK_LLM_MODE '{other}' (expected 'openai' or 'offline')"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Offline => "offline",
        }
    }
}

/// Backend selection and connection settings.
#[derive(Clone, Debug, PartialEq)]
pub struct LlmSettings {
    pub mode: LlmMode,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    /// Ask the backend for `response_format: json_object`.
    pub json_mode: bool,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            mode: LlmMode::OpenAi,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            json_mode: true,
        }
    }
}

impl LlmSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let mode = match non_empty("WORDPACK_LLM_MODE") {
            Some(raw) => LlmMode::parse(&raw)?,
            None => defaults.mode,
        };
        let temperature = match non_empty("WORDPACK_LLM_TEMPERATURE") {
            Some(raw) => raw.parse::<f32>().map_err(|_| {
                LlmError::Config(format!("WORDPACK_LLM_TEMPERATURE must be a number, got '{raw}'"))
            })?,
            None => defaults.temperature,
        };
        let json_mode = match non_empty("WORDPACK_LLM_JSON_MODE") {
            Some(raw) => !matches!(raw.to_ascii_lowercase().as_str(), "0" | "false" | "off"),
            None => defaults.json_mode,
        };

        let settings = Self {
            mode,
            base_url: non_empty("WORDPACK_LLM_BASE_URL").unwrap_or(defaults.base_url),
            model: non_empty("WORDPACK_LLM_MODEL").unwrap_or(defaults.model),
            api_key: non_empty("WORDPACK_LLM_API_KEY").or_else(|| non_empty("OPENAI_API_KEY")),
            temperature,
            json_mode,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(LlmError::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.mode == LlmMode::OpenAi {
            if self.model.is_empty() {
                return Err(LlmError::Config("model must not be empty".to_string()));
            }
            if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
                return Err(LlmError::Config(format!(
                    "base URL must start with http:// or https://, got '{}'",
                    self.base_url
                )));
            }
        }
        Ok(())
    }
}

/// Build the backend selected by `settings`.
pub fn build_client(settings: &LlmSettings) -> Result<Arc<dyn LlmClient>> {
    settings.validate()?;
    match settings.mode {
        LlmMode::Offline => {
            log::info!("LLM backend: offline (fallback content only)");
            Ok(Arc::new(OfflineLlm))
        }
        LlmMode::OpenAi => {
            log::info!(
                "LLM backend: OpenAI-compatible {} (model {})",
                settings.base_url,
                settings.model
            );
            Ok(Arc::new(OpenAiCompatibleClient::new(settings)?))
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for any `/chat/completions` endpoint speaking the OpenAI wire format.
pub struct OpenAiCompatibleClient {
    http: Arc<reqwest::Client>,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    json_mode: bool,
}

impl OpenAiCompatibleClient {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        Ok(Self {
            http: shared_http_client()?,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            temperature: settings.temperature,
            json_mode: settings.json_mode,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            response_format: self.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                code: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        extract_content(parsed)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn extract_content(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .find_map(|choice| choice.message.and_then(|m| m.content))
        .filter(|content| !content.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn settings_default_to_openai() {
        let settings = LlmSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.mode, LlmMode::OpenAi);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn settings_read_overrides_and_key_fallback() {
        let settings = LlmSettings::from_lookup(lookup(&[
            ("WORDPACK_LLM_MODE", " Offline "),
            ("WORDPACK_LLM_MODEL", "local-model"),
            ("OPENAI_API_KEY", "sk-test"),
            ("WORDPACK_LLM_TEMPERATURE", "0.2"),
            ("WORDPACK_LLM_JSON_MODE", "off"),
        ]))
        .unwrap();
        assert_eq!(settings.mode, LlmMode::Offline);
        assert_eq!(settings.model, "local-model");
        assert_eq!(settings.api_key.as_deref(), Some("sk-test"));
        assert!((settings.temperature - 0.2).abs() < f32::EPSILON);
        assert!(!settings.json_mode);
    }

    #[test]
    fn settings_reject_bad_values() {
        assert!(LlmSettings::from_lookup(lookup(&[("WORDPACK_LLM_MODE", "magic")])).is_err());
        assert!(LlmSettings::from_lookup(lookup(&[("WORDPACK_LLM_TEMPERATURE", "hot")])).is_err());
        assert!(LlmSettings::from_lookup(lookup(&[("WORDPACK_LLM_TEMPERATURE", "3.5")])).is_err());
        assert!(LlmSettings::from_lookup(lookup(&[("WORDPACK_LLM_BASE_URL", "ftp://x")])).is_err());
    }

    #[test]
    fn endpoint_joins_base_url() {
        let settings = LlmSettings {
            base_url: "http://localhost:11434/v1/".to_string(),
            ..LlmSettings::default()
        };
        let client = OpenAiCompatibleClient::new(&settings).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn extract_content_skips_empty_choices() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"{\"ok\":true}"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(parsed).unwrap(), "{\"ok\":true}");

        let empty: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert!(matches!(extract_content(empty), Err(LlmError::EmptyResponse)));
    }

    #[tokio::test]
    async fn offline_mode_builds_offline_client() {
        let settings = LlmSettings {
            mode: LlmMode::Offline,
            ..LlmSettings::default()
        };
        let client = build_client(&settings).unwrap();
        assert_eq!(client.name(), "offline");
        assert!(client.complete("x").await.is_err());
    }
}
