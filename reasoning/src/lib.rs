// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `socratic-reasoning` — Adaptive Multi-Paradigm Reasoning Ecosystem
//!
//! Generates Socratic clarification questions for a statement and the issues
//! detected in it, and learns from user feedback which reasoning paradigm
//! produces useful questions.
//!
//! ## Crate Layout
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | `Paradigm`, `ReasoningNode`, `TemplateBank`, classifier, ensemble sampling, `QuestionProvider` port |
//! | [`application`] | Application | `ReflectiveEcosystem` orchestrator |
//! | [`infrastructure`] | Infrastructure | Ollama question client, prompt builder, JSON state store, YAML config |
//!
//! ## Key Concepts
//!
//! - **Paradigm**: one of four reasoning styles used to frame questions.
//! - **Weight**: a paradigm's efficacy estimate in `[0.1, 1.0]`, updated by an
//!   exponential moving average of feedback.
//! - **Ensemble fallback**: when the LLM is unavailable or returns fewer than
//!   three questions, the primary paradigm's template questions are combined
//!   with a weight-sampled selection from other paradigms.
//! - **Global coherence**: share of helpful ratings among the last ten.
//!
//! ```ignore
//! let config = EcosystemConfig::load_or_default(None)?;
//! let ecosystem = ReflectiveEcosystem::from_config(&config).await?;
//! let _ = ecosystem.load_state(&config.state_path);
//!
//! let issues = vec![Issue::new("Everyone", "absolute_statement", 0.9)];
//! let questions = ecosystem.generate_questions("Everyone should own a dog", &issues, None, 5).await;
//! ecosystem.process_feedback(&questions[0], true, Some("socratic_questioning"));
//! ecosystem.save_state(&config.state_path)?;
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::ReflectiveEcosystem;
pub use domain::*;
pub use error::{ReasoningError, ReasoningResult};
pub use infrastructure::{EcosystemConfig, LlmConfig, OllamaQuestionClient};

/// Install a compact `tracing` subscriber for host applications.
///
/// `RUST_LOG` takes precedence over `level`. Fails if a global subscriber is
/// already set.
pub fn init_tracing(level: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}
