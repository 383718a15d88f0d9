// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Reasoning Node
//!
//! One node per [`Paradigm`]. A node owns the paradigm's efficacy weight and
//! its feedback statistics, and turns detected issues into template questions.
//!
//! ## Weight
//!
//! The weight is an exponential moving average of feedback mapped onto
//! `[0, 1]`:
//!
//! ```text
//! weight = (1 - α) · weight + α · (1 + feedback) / 2      α = 0.2
//! ```
//!
//! clamped to `[MIN_WEIGHT, MAX_WEIGHT]`. The floor keeps every paradigm
//! selectable by the ensemble sampler.

use serde::{Deserialize, Serialize};

use super::issue::Issue;
use super::paradigm::Paradigm;
use super::templates::{fill, TemplateBank};

/// EMA learning rate for weight updates.
pub const EMA_ALPHA: f64 = 0.2;
pub const MIN_WEIGHT: f64 = 0.1;
pub const MAX_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningNode {
    pub paradigm: Paradigm,
    pub weight: f64,
    /// Every feedback value applied to this node, oldest first.
    pub feedback_history: Vec<f64>,
    pub questions_generated: u64,
    pub questions_rated: u64,
    pub positive_ratings: u64,
}

impl ReasoningNode {
    pub fn new(paradigm: Paradigm) -> Self {
        Self {
            paradigm,
            weight: MAX_WEIGHT,
            feedback_history: Vec::new(),
            questions_generated: 0,
            questions_rated: 0,
            positive_ratings: 0,
        }
    }

    /// Produce one question per (issue, template) pair, in issue-major order.
    ///
    /// Duplicates are kept; the orchestrator deduplicates the combined set.
    pub fn generate_questions(
        &mut self,
        _text: &str,
        issues: &[Issue],
        bank: &TemplateBank,
    ) -> Vec<String> {
        let templates = bank.templates_for(self.paradigm);

        let questions: Vec<String> = issues
            .iter()
            .flat_map(|issue| templates.iter().map(move |t| fill(t, &issue.term)))
            .collect();

        self.questions_generated += questions.len() as u64;
        questions
    }

    /// Apply one feedback value in `[-1, 1]`. Sole mutator of `weight`.
    pub fn update_weight(&mut self, feedback: f64) {
        debug_assert!(
            (-1.0..=1.0).contains(&feedback),
            "feedback out of range: {feedback}"
        );

        self.feedback_history.push(feedback);
        self.questions_rated += 1;
        if feedback > 0.0 {
            self.positive_ratings += 1;
        }

        let target = (1.0 + feedback) / 2.0;
        let updated = (1.0 - EMA_ALPHA) * self.weight + EMA_ALPHA * target;
        self.weight = updated.clamp(MIN_WEIGHT, MAX_WEIGHT);
    }

    /// Share of rated questions that were rated positively.
    pub fn effectiveness(&self) -> f64 {
        self.positive_ratings as f64 / self.questions_rated.max(1) as f64
    }

    pub fn average_feedback(&self) -> f64 {
        if self.feedback_history.is_empty() {
            0.0
        } else {
            self.feedback_history.iter().sum::<f64>() / self.feedback_history.len() as f64
        }
    }
}
