// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

/// A detected property of an input statement, produced by an external
/// issue detector. `issue_kind` is an opaque label: unknown kinds are never
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub term: String,
    pub issue_kind: String,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Issue {
    pub fn new(term: impl Into<String>, issue_kind: impl Into<String>, confidence: f64) -> Self {
        Self {
            term: term.into(),
            issue_kind: issue_kind.into(),
            confidence,
        }
    }
}
