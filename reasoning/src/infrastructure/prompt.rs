// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Question Prompt Builder
//!
//! Renders the LLM prompt for question generation with Handlebars and parses
//! the model's raw text back into well-formed questions.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Statement + issues + paradigm instructions → LLM input,
//!   and LLM output → questions
//!
//! The prompt embeds the literal statement, a numbered list of the detected
//! issues with their confidences, one paradigm-specific instruction block and
//! a strict output-format directive.

use handlebars::Handlebars;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::{Issue, Paradigm};
use crate::error::{ReasoningError, ReasoningResult};

const QUESTION_PROMPT: &str = "You are a Socratic tutor helping a reader examine a statement.\n\
\n\
Statement:\n\
\"{{text}}\"\n\
\n\
Detected issues:\n\
{{#each issues}}{{number}}. '{{term}}' ({{issue_kind}}, confidence {{confidence}})\n{{/each}}\
\n\
{{instructions}}\n\
\n\
Write up to {{max_questions}} clarification questions.\n\
Output format rules:\n\
- Write exactly one question per line.\n\
- Do not number the questions or add bullets.\n\
- Do not add any commentary before or after the questions.\n\
- Every line must end with a question mark (?).\n";

static ORDINAL_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+[.)]|-)\s+").expect("ordinal marker regex is valid"));

/// Instruction block for each paradigm. Socratic questioning carries the
/// generic framing.
pub fn paradigm_instructions(paradigm: Paradigm) -> &'static str {
    match paradigm {
        Paradigm::ConceptualChaining => {
            "Focus on logical connections. Ask how the flagged terms link to the rest of the \
             argument, what they imply, and which unstated premises the reasoning depends on."
        }
        Paradigm::ChunkedSymbolism => {
            "Focus on quantities and symbols. Ask how the flagged terms could be measured, \
             expressed numerically, or broken into smaller steps that can each be verified."
        }
        Paradigm::ExpertLexicons => {
            "Focus on domain terminology. Ask how a specialist would define the flagged terms, \
             whether they are used in a technical or everyday sense, and which sources settle it."
        }
        Paradigm::SocraticQuestioning => {
            "Use classic Socratic questioning. Ask what the flagged terms mean, what evidence \
             supports them, what exceptions exist, and how someone who disagrees would see them."
        }
    }
}

#[derive(Serialize)]
struct PromptIssue<'a> {
    number: usize,
    term: &'a str,
    issue_kind: &'a str,
    confidence: String,
}

#[derive(Serialize)]
struct PromptContext<'a> {
    text: &'a str,
    issues: Vec<PromptIssue<'a>>,
    instructions: &'static str,
    max_questions: usize,
}

pub struct QuestionPromptBuilder {
    handlebars: Handlebars<'static>,
}

impl QuestionPromptBuilder {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // Prompts are plain text; HTML escaping would mangle quotes.
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    pub fn build(
        &self,
        text: &str,
        issues: &[Issue],
        paradigm: Paradigm,
        max_questions: usize,
    ) -> ReasoningResult<String> {
        let context = PromptContext {
            text,
            issues: issues
                .iter()
                .enumerate()
                .map(|(i, issue)| PromptIssue {
                    number: i + 1,
                    term: &issue.term,
                    issue_kind: &issue.issue_kind,
                    confidence: format!("{:.2}", issue.confidence),
                })
                .collect(),
            instructions: paradigm_instructions(paradigm),
            max_questions,
        };

        self.handlebars
            .render_template(QUESTION_PROMPT, &context)
            .map_err(|e| ReasoningError::Template(e.to_string()))
    }
}

impl Default for QuestionPromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract at most `max_questions` questions from raw model output.
///
/// Each line is trimmed and stripped of a leading `1.`, `1)` or `-` marker;
/// only non-empty lines ending with `?` are kept.
pub fn extract_questions(raw: &str, max_questions: usize) -> Vec<String> {
    raw.lines()
        .map(|line| ORDINAL_MARKER.replace(line.trim(), "").trim().to_string())
        .filter(|line| !line.is_empty() && line.ends_with('?'))
        .take(max_questions)
        .collect()
}
