// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::BTreeMap;

use serde::Serialize;

use super::node::ReasoningNode;
use super::paradigm::Paradigm;

/// Read-only statistics for a single paradigm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParadigmPerformance {
    pub weight: f64,
    pub questions_generated: u64,
    pub questions_rated: u64,
    pub positive_ratings: u64,
    /// `positive_ratings / max(1, questions_rated)`
    pub effectiveness: f64,
    pub average_feedback: f64,
}

impl From<&ReasoningNode> for ParadigmPerformance {
    fn from(node: &ReasoningNode) -> Self {
        Self {
            weight: node.weight,
            questions_generated: node.questions_generated,
            questions_rated: node.questions_rated,
            positive_ratings: node.positive_ratings,
            effectiveness: node.effectiveness(),
            average_feedback: node.average_feedback(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub paradigms: BTreeMap<Paradigm, ParadigmPerformance>,
    pub total_questions_generated: u64,
    pub total_questions_rated: u64,
    pub total_positive_ratings: u64,
    /// Ratings recorded in the ecosystem history.
    pub total_feedback: usize,
    pub global_coherence: f64,
}

impl PerformanceReport {
    pub fn build<'a>(
        nodes: impl IntoIterator<Item = &'a ReasoningNode>,
        total_feedback: usize,
        global_coherence: f64,
    ) -> Self {
        let paradigms: BTreeMap<_, _> = nodes
            .into_iter()
            .map(|node| (node.paradigm, ParadigmPerformance::from(node)))
            .collect();

        Self {
            total_questions_generated: paradigms.values().map(|p| p.questions_generated).sum(),
            total_questions_rated: paradigms.values().map(|p| p.questions_rated).sum(),
            total_positive_ratings: paradigms.values().map(|p| p.positive_ratings).sum(),
            paradigms,
            total_feedback,
            global_coherence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals() {
        let mut a = ReasoningNode::new(Paradigm::ConceptualChaining);
        a.questions_generated = 4;
        a.update_weight(1.0);
        a.update_weight(-0.5);

        let mut b = ReasoningNode::new(Paradigm::ExpertLexicons);
        b.questions_generated = 6;
        b.update_weight(1.0);

        let report = PerformanceReport::build([&a, &b], 3, 0.5);

        assert_eq!(report.total_questions_generated, 10);
        assert_eq!(report.total_questions_rated, 3);
        assert_eq!(report.total_positive_ratings, 2);
        assert_eq!(report.global_coherence, 0.5);

        let chaining = &report.paradigms[&Paradigm::ConceptualChaining];
        assert_eq!(chaining.effectiveness, 0.5);
        assert_eq!(chaining.average_feedback, 0.25);
    }

    #[test]
    fn test_report_serializes_paradigm_names() {
        let node = ReasoningNode::new(Paradigm::SocraticQuestioning);
        let report = PerformanceReport::build([&node], 0, 1.0);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["paradigms"]["socratic_questioning"]["weight"].is_number());
    }
}
