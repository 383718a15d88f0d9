// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Reasoning Paradigms
//!
//! The closed set of reasoning styles used to frame clarification questions.
//! Paradigm identity is an enum so every per-paradigm table (templates,
//! LLM instructions, descriptions) is checked for exhaustiveness at compile
//! time.
//!
//! The declaration order is the canonical order: it drives `Ord`, iteration
//! over [`Paradigm::ALL`], and the deterministic fallback when weighted
//! sampling cannot be used.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paradigm {
    /// Follows logical links between ideas.
    ConceptualChaining,
    /// Breaks quantitative claims into symbols and steps.
    ChunkedSymbolism,
    /// Probes domain terminology.
    ExpertLexicons,
    /// Generic Socratic clarification. Default paradigm.
    SocraticQuestioning,
}

impl Paradigm {
    /// Every paradigm, in canonical order.
    pub const ALL: [Paradigm; 4] = [
        Paradigm::ConceptualChaining,
        Paradigm::ChunkedSymbolism,
        Paradigm::ExpertLexicons,
        Paradigm::SocraticQuestioning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Paradigm::ConceptualChaining => "conceptual_chaining",
            Paradigm::ChunkedSymbolism => "chunked_symbolism",
            Paradigm::ExpertLexicons => "expert_lexicons",
            Paradigm::SocraticQuestioning => "socratic_questioning",
        }
    }

    /// Human-readable summary, persisted alongside each node.
    pub fn description(&self) -> &'static str {
        match self {
            Paradigm::ConceptualChaining => {
                "Links concepts through cause, implication and relationship"
            }
            Paradigm::ChunkedSymbolism => {
                "Decomposes quantitative and symbolic claims into checkable parts"
            }
            Paradigm::ExpertLexicons => "Clarifies specialised, domain-specific terminology",
            Paradigm::SocraticQuestioning => {
                "Classic Socratic clarification of meaning, evidence and assumptions"
            }
        }
    }
}

impl fmt::Display for Paradigm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown paradigm: {0}")]
pub struct UnknownParadigm(pub String);

impl FromStr for Paradigm {
    type Err = UnknownParadigm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Paradigm::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| UnknownParadigm(s.to_string()))
    }
}
