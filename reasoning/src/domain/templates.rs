// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Question Template Bank
//!
//! Per-paradigm question templates with a `{term}` placeholder. The bank is
//! built once when the ecosystem is constructed: built-in templates first,
//! then any user-supplied overrides merged additively on top.
//!
//! Override files are JSON objects mapping a paradigm name (or `"generic"`)
//! to an array of template strings:
//!
//! ```json
//! { "socratic_questioning": ["Who decides what '{term}' covers?"] }
//! ```
//!
//! A missing or malformed override file is ignored.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use super::paradigm::Paradigm;

/// Placeholder substituted with an issue's term.
pub const TERM_PLACEHOLDER: &str = "{term}";

/// Key for the fallback set used by paradigms without templates.
pub const GENERIC_KEY: &str = "generic";

const CONCEPTUAL_CHAINING: &[&str] = &[
    "How does '{term}' connect to the rest of your argument?",
    "What follows logically if '{term}' is true?",
    "What would have to be true for '{term}' to hold?",
    "Which idea does '{term}' depend on?",
];

const CHUNKED_SYMBOLISM: &[&str] = &[
    "Can '{term}' be expressed as a measurable quantity?",
    "What numbers or data support '{term}'?",
    "How would you break '{term}' into smaller, verifiable steps?",
    "What is the unit or scale behind '{term}'?",
];

const EXPERT_LEXICONS: &[&str] = &[
    "How would an expert in the field define '{term}'?",
    "Is '{term}' used here in its technical or everyday sense?",
    "Which authoritative source defines '{term}' this way?",
    "What related technical terms help clarify '{term}'?",
];

const SOCRATIC_QUESTIONING: &[&str] = &[
    "What do you mean by '{term}'?",
    "What evidence supports the claim about '{term}'?",
    "Are there exceptions to '{term}'?",
    "How might someone who disagrees interpret '{term}'?",
];

const GENERIC: &[&str] = &[
    "Could you clarify what you mean by '{term}'?",
    "Why do you think '{term}' applies here?",
];

#[derive(Debug, Clone)]
pub struct TemplateBank {
    by_paradigm: HashMap<Paradigm, Vec<String>>,
    generic: Vec<String>,
}

impl TemplateBank {
    /// Bank with the built-in templates for every paradigm.
    pub fn builtin() -> Self {
        let by_paradigm = Paradigm::ALL
            .into_iter()
            .map(|p| (p, builtin_for(p).iter().map(|t| t.to_string()).collect()))
            .collect();

        Self {
            by_paradigm,
            generic: GENERIC.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Bank with only the generic fallback set.
    pub fn generic_only() -> Self {
        Self {
            by_paradigm: HashMap::new(),
            generic: GENERIC.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Built-in bank plus overrides read from `path`, if readable.
    pub fn with_overrides_file(path: impl AsRef<Path>) -> Self {
        let mut bank = Self::builtin();
        bank.merge_overrides_file(path);
        bank
    }

    pub fn merge_overrides_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No template overrides loaded");
                return;
            }
        };

        match serde_json::from_str::<HashMap<String, Vec<String>>>(&raw) {
            Ok(overrides) => {
                let added = self.merge_overrides(overrides);
                info!(path = %path.display(), added, "Merged question template overrides");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring malformed template overrides");
            }
        }
    }

    /// Append override templates to the bank. Returns how many were accepted.
    ///
    /// Templates must be non-empty and end with `?`; unknown keys are ignored.
    pub fn merge_overrides(&mut self, overrides: HashMap<String, Vec<String>>) -> usize {
        let mut added = 0;

        for (key, templates) in overrides {
            let target = if key == GENERIC_KEY {
                &mut self.generic
            } else {
                match key.parse::<Paradigm>() {
                    Ok(paradigm) => self.by_paradigm.entry(paradigm).or_default(),
                    Err(_) => {
                        debug!(key = %key, "Skipping overrides for unknown paradigm");
                        continue;
                    }
                }
            };

            for template in templates {
                let template = template.trim();
                if template.is_empty() || !template.ends_with('?') {
                    warn!(template = %template, "Skipping template that is not a question");
                    continue;
                }
                if !target.iter().any(|t| t == template) {
                    target.push(template.to_string());
                    added += 1;
                }
            }
        }

        added
    }

    /// Templates for `paradigm`, or the generic set if it has none.
    pub fn templates_for(&self, paradigm: Paradigm) -> &[String] {
        match self.by_paradigm.get(&paradigm) {
            Some(templates) if !templates.is_empty() => templates,
            _ => &self.generic,
        }
    }
}

impl Default for TemplateBank {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_for(paradigm: Paradigm) -> &'static [&'static str] {
    match paradigm {
        Paradigm::ConceptualChaining => CONCEPTUAL_CHAINING,
        Paradigm::ChunkedSymbolism => CHUNKED_SYMBOLISM,
        Paradigm::ExpertLexicons => EXPERT_LEXICONS,
        Paradigm::SocraticQuestioning => SOCRATIC_QUESTIONING,
    }
}

/// Substitute `term` into a template.
pub fn fill(template: &str, term: &str) -> String {
    template.replace(TERM_PLACEHOLDER, term)
}
