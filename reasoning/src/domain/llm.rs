// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Llm
//!
//! Provides the LLM question port for the ecosystem.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Isolates the orchestrator from the language-model service

// Implementations live in infrastructure/. Every failure is returned as an
// `LLMError` so the orchestrator's template fallback is an explicit branch.

use async_trait::async_trait;

use super::issue::Issue;
use super::paradigm::Paradigm;

/// Source of LLM-generated clarification questions.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Availability as determined at construction. Not re-probed per call.
    fn is_available(&self) -> bool;

    /// Generate at most `max_questions` well-formed questions.
    async fn generate_questions(
        &self,
        text: &str,
        issues: &[Issue],
        paradigm: Paradigm,
        max_questions: usize,
    ) -> Result<Vec<String>, LLMError>;
}

/// Errors that can occur during LLM question generation
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("LLM service unavailable")]
    Unavailable,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Provider for deployments without a language model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopQuestionProvider;

#[async_trait]
impl QuestionProvider for NoopQuestionProvider {
    fn is_available(&self) -> bool {
        false
    }

    async fn generate_questions(
        &self,
        _text: &str,
        _issues: &[Issue],
        _paradigm: Paradigm,
        _max_questions: usize,
    ) -> Result<Vec<String>, LLMError> {
        Err(LLMError::Unavailable)
    }
}
