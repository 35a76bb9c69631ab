//! Groq chat-completions client.

use std::collections::BTreeMap;
use std::time::Duration;

use pw_store::SiteFile;
use serde_json::{Value, json};
use tracing::debug;
use ureq::Agent;

use crate::error::GeneratorError;
use crate::{ContentGenerator, PreviewSet};

/// Default chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default model selector.
pub const DEFAULT_MODEL: &str = "llama-3.1-70b";

/// Request timeout in seconds. Generation is slow; everything past this
/// bound is treated as a failed call.
const TIMEOUT: u64 = 60;

/// System prompt pinning the reply contract.
const SYSTEM_PROMPT: &str = "You are an expert web engineer modifying an existing website.\n\
Preserve unrelated functionality.\n\
Return JSON with keys: files (object mapping filename to full new content).\n\
Do not explain. No markdown.";

/// Content generator backed by an OpenAI-compatible chat-completions API.
pub struct GroqGenerator {
    agent: Agent,
    api_url: String,
    api_key: String,
    model: String,
}

impl GroqGenerator {
    /// Create a client. An empty `api_key` is allowed here; the missing
    /// credential surfaces as [`GeneratorError::Config`] per call.
    #[must_use]
    pub fn new(api_url: &str, api_key: &str, model: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_url: api_url.to_owned(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
        }
    }
}

impl ContentGenerator for GroqGenerator {
    fn generate(
        &self,
        prompt: &str,
        current: &BTreeMap<SiteFile, String>,
    ) -> Result<PreviewSet, GeneratorError> {
        if self.api_key.is_empty() {
            return Err(GeneratorError::Config(
                "generator.api_key is not set".to_owned(),
            ));
        }

        let payload = build_payload(&self.model, prompt, current)?;
        let payload_bytes = serde_json::to_vec(&payload)?;

        debug!(model = %self.model, "Calling content generator");

        let response = self
            .agent
            .post(&self.api_url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(GeneratorError::Http {
                status,
                body: error_body,
            });
        }

        let reply: Value = body_reader.read_json()?;
        let content = extract_content(&reply)?;
        parse_files(&content)
    }
}

/// Build the chat-completions request body.
fn build_payload(
    model: &str,
    prompt: &str,
    current: &BTreeMap<SiteFile, String>,
) -> Result<Value, GeneratorError> {
    let current_json = serde_json::to_string(current)?;
    Ok(json!({
        "model": model,
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": format!("CURRENT FILES:\n{current_json}")},
            {"role": "user", "content": format!("REQUEST:\n{prompt}")},
        ],
        "temperature": 0.2,
    }))
}

/// Pull the model's message text out of the chat-completions envelope.
fn extract_content(reply: &Value) -> Result<String, GeneratorError> {
    reply
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            GeneratorError::InvalidResponse("missing choices[0].message.content".to_owned())
        })
}

/// Validate the model reply against the files contract.
///
/// Unknown file names are dropped (the model may hallucinate paths);
/// any shape violation is an error, even when the transport succeeded.
fn parse_files(content: &str) -> Result<PreviewSet, GeneratorError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| GeneratorError::InvalidResponse(format!("reply is not JSON: {e}")))?;

    let files = value
        .get("files")
        .ok_or_else(|| GeneratorError::InvalidResponse("missing \"files\" key".to_owned()))?;
    let entries = files
        .as_object()
        .ok_or_else(|| GeneratorError::InvalidResponse("\"files\" is not an object".to_owned()))?;

    let mut staged = PreviewSet::new();
    for (name, content) in entries {
        let Some(text) = content.as_str() else {
            return Err(GeneratorError::InvalidResponse(format!(
                "content for {name:?} is not a string"
            )));
        };
        let Some(file) = SiteFile::from_name(name) else {
            debug!(name = %name, "Ignoring unknown file in generator reply");
            continue;
        };
        staged.insert(file, text.to_owned());
    }
    Ok(staged)
}
