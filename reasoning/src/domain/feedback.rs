// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Feedback records, the tunable ecosystem policy and the coherence metric.

use serde::{Deserialize, Serialize};

/// One user rating of a generated question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub question: String,
    pub helpful: bool,
    /// Paradigm name as reported by the caller; `None` when unknown.
    pub paradigm: Option<String>,
}

/// Tunable constants of the generation and feedback protocol.
///
/// Defaults are the production values. Changing them is a product decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemPolicy {
    /// LLM output is trusted only when it yields at least this many questions.
    pub llm_trust_threshold: usize,
    /// Upper bound on complementary paradigms sampled for the ensemble.
    pub max_complementary: usize,
    /// Questions taken from each complementary paradigm.
    pub questions_per_complementary: usize,
    /// Feedback applied for a helpful rating.
    pub helpful_feedback: f64,
    /// Feedback applied for an unhelpful rating.
    pub unhelpful_feedback: f64,
    /// Multiplier applied when the rated question's paradigm is unknown.
    pub diffuse_damping: f64,
    /// Number of recent ratings averaged into global coherence.
    pub coherence_window: usize,
}

impl Default for EcosystemPolicy {
    fn default() -> Self {
        Self {
            llm_trust_threshold: 3,
            max_complementary: 2,
            questions_per_complementary: 2,
            helpful_feedback: 1.0,
            unhelpful_feedback: -0.5,
            diffuse_damping: 0.2,
            coherence_window: 10,
        }
    }
}

impl EcosystemPolicy {
    pub fn feedback_value(&self, helpful: bool) -> f64 {
        if helpful {
            self.helpful_feedback
        } else {
            self.unhelpful_feedback
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("helpful_feedback", self.helpful_feedback),
            ("unhelpful_feedback", self.unhelpful_feedback),
        ] {
            if !(-1.0..=1.0).contains(&value) {
                return Err(format!("{name} must lie in [-1, 1], got {value}"));
            }
        }
        if !(0.0..=1.0).contains(&self.diffuse_damping) {
            return Err(format!(
                "diffuse_damping must lie in [0, 1], got {}",
                self.diffuse_damping
            ));
        }
        if self.coherence_window == 0 {
            return Err("coherence_window must be at least 1".to_string());
        }
        if self.llm_trust_threshold == 0 {
            return Err("llm_trust_threshold must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Mean of `helpful` over the last `window` records, or 1.0 with no history.
pub fn coherence(history: &[FeedbackRecord], window: usize) -> f64 {
    let recent = &history[history.len().saturating_sub(window)..];
    if recent.is_empty() {
        return 1.0;
    }
    let helpful = recent.iter().filter(|r| r.helpful).count();
    helpful as f64 / recent.len() as f64
}
