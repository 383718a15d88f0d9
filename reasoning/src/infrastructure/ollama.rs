// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Ollama Question Client
//
// Anti-Corruption Layer between the ecosystem and an Ollama-compatible
// text-completion service. Availability is probed once at construction via the
// model-listing endpoint and cached for the life of the client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::LlmConfig;
use super::prompt::{extract_questions, QuestionPromptBuilder};
use crate::domain::{Issue, LLMError, Paradigm, QuestionProvider};

pub struct OllamaQuestionClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
    available: bool,
    prompts: QuestionPromptBuilder,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaQuestionClient {
    /// Build a client and probe the service once.
    ///
    /// Never fails: an unreachable service or an empty model list yields a
    /// client that reports itself unavailable.
    pub async fn connect(config: &LlmConfig) -> Self {
        let mut client = Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
            available: false,
            prompts: QuestionPromptBuilder::new(),
        };

        if !config.enabled {
            info!("LLM question generation disabled by configuration");
            return client;
        }

        let probe_timeout = Duration::from_secs(config.probe_timeout_secs);
        match client.list_models(probe_timeout).await {
            Ok(models) => match resolve_model(&client.model, &models) {
                Some(model) => {
                    if model != client.model {
                        warn!(
                            configured = %client.model,
                            substitute = %model,
                            "Configured model not found, using first available model"
                        );
                        client.model = model;
                    }
                    client.available = true;
                    info!(endpoint = %client.endpoint, model = %client.model, "LLM question client available");
                }
                None => {
                    warn!(endpoint = %client.endpoint, "LLM service lists no models, disabling LLM questions");
                }
            },
            Err(e) => {
                warn!(endpoint = %client.endpoint, error = %e, "LLM service unreachable, disabling LLM questions");
            }
        }

        client
    }

    /// Model used for generation, after any substitution at probe time.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn list_models(&self, probe_timeout: Duration) -> Result<Vec<String>, LLMError> {
        let url = format!("{}/api/tags", self.endpoint);

        let response = self
            .client
            .get(&url)
            .timeout(probe_timeout)
            .send()
            .await
            .map_err(|e| map_transport_error(e, probe_timeout))?;

        if !response.status().is_success() {
            return Err(LLMError::Network(format!("HTTP {}", response.status())));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| LLMError::Provider(format!("Failed to parse model list: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        let url = format!("{}/api/generate", self.endpoint);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.timeout))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(if status == reqwest::StatusCode::NOT_FOUND {
                LLMError::ModelNotFound(self.model.clone())
            } else {
                LLMError::Provider(format!("HTTP {}: {}", status, error_text))
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LLMError::Provider(format!("Failed to parse response: {}", e)))?;

        Ok(body.response)
    }
}

#[async_trait]
impl QuestionProvider for OllamaQuestionClient {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn generate_questions(
        &self,
        text: &str,
        issues: &[Issue],
        paradigm: Paradigm,
        max_questions: usize,
    ) -> Result<Vec<String>, LLMError> {
        if !self.available {
            return Err(LLMError::Unavailable);
        }

        let prompt = self
            .prompts
            .build(text, issues, paradigm, max_questions)
            .map_err(|e| LLMError::InvalidInput(e.to_string()))?;

        let raw = self.complete(&prompt).await?;
        let questions = extract_questions(&raw, max_questions);

        debug!(
            paradigm = %paradigm,
            model = %self.model,
            count = questions.len(),
            "Extracted LLM questions"
        );

        Ok(questions)
    }
}

/// Pick the model to use: the configured one if listed (with or without a
/// `:tag` suffix), otherwise the first listed model.
pub fn resolve_model(configured: &str, available: &[String]) -> Option<String> {
    let listed = available.iter().any(|name| {
        name == configured || name.split(':').next() == Some(configured)
    });

    if listed {
        Some(configured.to_string())
    } else {
        available.first().cloned()
    }
}

fn map_transport_error(e: reqwest::Error, timeout: Duration) -> LLMError {
    if e.is_timeout() {
        LLMError::Timeout(timeout.as_secs())
    } else {
        LLMError::Network(e.to_string())
    }
}
