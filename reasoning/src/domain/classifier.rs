// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Paradigm Classifier
//!
//! Maps an input text (and optional caller context) to the paradigm used as
//! the primary source of questions. The default [`KeywordClassifier`] uses
//! case-insensitive substring heuristics and never fails.
//!
//! Decision order, first match wins:
//!
//! 1. quantitative keywords → `chunked_symbolism`
//! 2. technical keywords → `expert_lexicons`
//! 3. relational keywords → `conceptual_chaining`
//! 4. `context["domain"]` hint
//! 5. `socratic_questioning`

use std::collections::HashMap;

use super::paradigm::Paradigm;

/// Caller-supplied hints, e.g. `{"domain": "physics"}`.
pub type ClassificationContext = HashMap<String, String>;

pub trait ParadigmClassifier: Send + Sync {
    fn select_paradigm(&self, text: &str, context: Option<&ClassificationContext>) -> Paradigm;
}

const QUANTITATIVE_KEYWORDS: &[&str] = &[
    "equation", "formula", "calculate", "percent", "probability", "statistic",
    "average", "ratio", "integral", "derivative", "theorem", "variable",
    "number", "proportion", "%",
];

const TECHNICAL_KEYWORDS: &[&str] = &[
    "algorithm", "protocol", "diagnosis", "clinical", "symptom", "statute",
    "legal", "court", "molecule", "software", "database", "circuit",
    "engineering", "neural", "compiler",
];

const RELATIONAL_KEYWORDS: &[&str] = &[
    "because", "therefore", "implies", "leads to", "results in", "causes",
    "consequence", "relationship", "depends on", "hence", "concept",
];

const QUANTITATIVE_DOMAINS: &[&str] = &["math", "mathematics", "physics", "economics", "statistics"];

const TECHNICAL_DOMAINS: &[&str] = &[
    "medicine", "law", "engineering", "computer-science", "computer_science", "computer science",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn paradigm_for_domain(domain: &str) -> Paradigm {
        let domain = domain.trim().to_lowercase();
        if QUANTITATIVE_DOMAINS.contains(&domain.as_str()) {
            Paradigm::ChunkedSymbolism
        } else if TECHNICAL_DOMAINS.contains(&domain.as_str()) {
            Paradigm::ExpertLexicons
        } else {
            Paradigm::ConceptualChaining
        }
    }
}

impl ParadigmClassifier for KeywordClassifier {
    fn select_paradigm(&self, text: &str, context: Option<&ClassificationContext>) -> Paradigm {
        let lowered = text.to_lowercase();

        if contains_any(&lowered, QUANTITATIVE_KEYWORDS) {
            return Paradigm::ChunkedSymbolism;
        }
        if contains_any(&lowered, TECHNICAL_KEYWORDS) {
            return Paradigm::ExpertLexicons;
        }
        if contains_any(&lowered, RELATIONAL_KEYWORDS) {
            return Paradigm::ConceptualChaining;
        }

        match context.and_then(|c| c.get("domain")) {
            Some(domain) => Self::paradigm_for_domain(domain),
            None => Paradigm::SocraticQuestioning,
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
