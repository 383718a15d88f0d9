// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Infrastructure layer: LLM client, prompts, persistence and configuration

pub mod config;
pub mod ollama;
pub mod prompt;
pub mod state_store;

pub use config::{EcosystemConfig, LlmConfig};
pub use ollama::OllamaQuestionClient;
pub use prompt::{extract_questions, QuestionPromptBuilder};
pub use state_store::{EcosystemSnapshot, PartialState};
