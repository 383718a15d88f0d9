// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Ecosystem State Store
//!
//! JSON persistence for the ecosystem: every node's weight and counters,
//! global coherence and the feedback history.
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": "2026-01-01T00:00:00Z",
//!   "nodes": {
//!     "socratic_questioning": {
//!       "paradigm": "socratic_questioning",
//!       "description": "...",
//!       "weight": 0.85,
//!       "questions_generated": 8,
//!       "questions_rated": 1,
//!       "positive_ratings": 0,
//!       "feedback_history": [-0.5]
//!     }
//!   },
//!   "global_coherence": 0.0,
//!   "question_history": [{"question": "...", "helpful": false, "paradigm": "socratic_questioning"}]
//! }
//! ```
//!
//! Loading is field-by-field: a document that parses as JSON but is missing
//! fields, or has fields of the wrong type, restores whatever is usable.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{FeedbackRecord, Paradigm, ReasoningNode, MAX_WEIGHT, MIN_WEIGHT};
use crate::error::{ReasoningError, ReasoningResult};

pub const STATE_VERSION: u32 = 1;

/// Consistent copy of the ecosystem's persistent state.
#[derive(Debug, Clone, PartialEq)]
pub struct EcosystemSnapshot {
    pub nodes: Vec<ReasoningNode>,
    pub global_coherence: f64,
    pub question_history: Vec<FeedbackRecord>,
}

#[derive(Serialize)]
struct PersistedNode<'a> {
    paradigm: Paradigm,
    description: &'static str,
    weight: f64,
    questions_generated: u64,
    questions_rated: u64,
    positive_ratings: u64,
    feedback_history: &'a [f64],
}

#[derive(Serialize)]
struct PersistedState<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    nodes: BTreeMap<Paradigm, PersistedNode<'a>>,
    global_coherence: f64,
    question_history: &'a [FeedbackRecord],
}

/// Fields recovered for one node. `None` means absent or unusable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub weight: Option<f64>,
    pub questions_generated: Option<u64>,
    pub questions_rated: Option<u64>,
    pub positive_ratings: Option<u64>,
    pub feedback_history: Option<Vec<f64>>,
}

impl NodePatch {
    /// Apply present fields, then restore node invariants: weight within
    /// bounds, `questions_rated == feedback_history.len()`, and
    /// `positive_ratings <= questions_rated`.
    pub fn apply_to(self, node: &mut ReasoningNode) {
        if let Some(weight) = self.weight.filter(|w| w.is_finite()) {
            node.weight = weight.clamp(MIN_WEIGHT, MAX_WEIGHT);
        }
        if let Some(history) = self.feedback_history {
            node.feedback_history = history;
        }
        if let Some(generated) = self.questions_generated {
            node.questions_generated = generated;
        }
        if let Some(positive) = self.positive_ratings {
            node.positive_ratings = positive;
        }

        let rated = node.feedback_history.len() as u64;
        if self.questions_rated.is_some_and(|r| r != rated) {
            debug!(paradigm = %node.paradigm, "Reconciling questions_rated with feedback history");
        }
        node.questions_rated = rated;
        node.positive_ratings = node.positive_ratings.min(rated);
    }
}

/// Everything recovered from a state file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialState {
    pub nodes: BTreeMap<Paradigm, NodePatch>,
    pub global_coherence: Option<f64>,
    pub question_history: Option<Vec<FeedbackRecord>>,
}

pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &EcosystemSnapshot) -> ReasoningResult<()> {
    let path = path.as_ref();

    let state = PersistedState {
        version: STATE_VERSION,
        saved_at: Utc::now(),
        nodes: snapshot
            .nodes
            .iter()
            .map(|node| {
                (
                    node.paradigm,
                    PersistedNode {
                        paradigm: node.paradigm,
                        description: node.paradigm.description(),
                        weight: node.weight,
                        questions_generated: node.questions_generated,
                        questions_rated: node.questions_rated,
                        positive_ratings: node.positive_ratings,
                        feedback_history: &node.feedback_history,
                    },
                )
            })
            .collect(),
        global_coherence: snapshot.global_coherence,
        question_history: &snapshot.question_history,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a state file.
///
/// Fails with [`ReasoningError::StateNotFound`] when the file is missing and
/// [`ReasoningError::Serialization`] when it is not a JSON object.
pub fn load_partial(path: impl AsRef<Path>) -> ReasoningResult<PartialState> {
    let path = path.as_ref();

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ReasoningError::StateNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let document: Value = serde_json::from_str(&raw)?;
    let root = document.as_object().ok_or_else(|| {
        <serde_json::Error as serde::de::Error>::custom("state document must be a JSON object")
    })?;

    Ok(PartialState {
        nodes: root
            .get("nodes")
            .and_then(Value::as_object)
            .map(parse_nodes)
            .unwrap_or_default(),
        global_coherence: field::<f64>(root, "global_coherence"),
        question_history: root
            .get("question_history")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| serde_json::from_value(e.clone()).ok())
                    .collect()
            }),
    })
}

fn parse_nodes(nodes: &Map<String, Value>) -> BTreeMap<Paradigm, NodePatch> {
    nodes
        .iter()
        .filter_map(|(key, value)| {
            let Ok(paradigm) = key.parse::<Paradigm>() else {
                debug!(key = %key, "Ignoring persisted node for unknown paradigm");
                return None;
            };
            let fields = value.as_object()?;
            Some((
                paradigm,
                NodePatch {
                    weight: field(fields, "weight"),
                    questions_generated: field(fields, "questions_generated"),
                    questions_rated: field(fields, "questions_rated"),
                    positive_ratings: field(fields, "positive_ratings"),
                    feedback_history: field(fields, "feedback_history"),
                },
            ))
        })
        .collect()
}

fn field<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Option<T> {
    object
        .get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}
