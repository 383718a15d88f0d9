// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Integration tests for the reflective ecosystem.
//!
//! Covers the template-only generation path, persistence across ecosystem
//! instances (round-trip, missing, corrupt and partial files), reproducible
//! ensembles under a seeded RNG, and concurrent feedback through a shared
//! `Arc<ReflectiveEcosystem>`.

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use socratic_reasoning::{
    Issue, KeywordClassifier, NoopQuestionProvider, Paradigm, ReasoningError, ReflectiveEcosystem,
    TemplateBank,
};

fn seeded(seed: u64) -> ReflectiveEcosystem {
    ReflectiveEcosystem::new(
        TemplateBank::builtin(),
        Arc::new(KeywordClassifier::new()),
        Arc::new(NoopQuestionProvider),
    )
    .with_rng(StdRng::seed_from_u64(seed))
}

fn dog_issues() -> Vec<Issue> {
    vec![
        Issue::new("Everyone", "absolute_statement", 0.9),
        Issue::new("should", "normative_statement", 0.8),
    ]
}

#[tokio::test]
async fn test_dog_scenario_without_llm() {
    let eco = ReflectiveEcosystem::offline();
    let text = "Everyone should own a dog";

    let paradigm = eco.select_paradigm(text, None);
    assert_eq!(paradigm, Paradigm::SocraticQuestioning);

    let questions = eco.generate_questions(text, &dog_issues(), None, 5).await;

    assert!(!questions.is_empty());
    assert!(questions.len() <= 5);
    assert!(questions.iter().all(|q| !q.is_empty() && q.ends_with('?')));

    let bank = TemplateBank::builtin();
    let primary: HashSet<String> = bank
        .templates_for(paradigm)
        .iter()
        .flat_map(|t| ["Everyone", "should"].map(|term| t.replace("{term}", term)))
        .collect();
    assert!(questions.iter().any(|q| primary.contains(q)));
}

#[tokio::test]
async fn test_seeded_ensembles_are_reproducible() {
    let text = "Everyone should own a dog";
    let a = seeded(99).generate_questions(text, &dog_issues(), None, 20).await;
    let b = seeded(99).generate_questions(text, &dog_issues(), None, 20).await;

    let a: HashSet<_> = a.into_iter().collect();
    let b: HashSet<_> = b.into_iter().collect();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_persistence_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let original = seeded(5);
    original
        .generate_questions("The formula is wrong", &dog_issues(), None, 5)
        .await;
    original.process_feedback("What do you mean by 'Everyone'?", false, Some("socratic_questioning"));
    original.process_feedback("Can 'should' be measured?", true, Some("chunked_symbolism"));
    original.process_feedback("Why?", true, None);
    original.process_feedback("Who?", false, Some("not_a_paradigm"));
    original.save_state(&path).unwrap();

    let restored = ReflectiveEcosystem::offline();
    restored.load_state(&path).unwrap();

    assert_eq!(restored.snapshot(), original.snapshot());
    assert_eq!(restored.get_performance_report(), original.get_performance_report());
    assert_eq!(restored.global_coherence(), 0.5);
    assert_eq!(restored.history_len(), 4);
}

#[test]
fn test_random_feedback_weights_restore_bit_exact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let mut names: Vec<Option<&str>> = Paradigm::ALL.iter().map(|p| Some(p.as_str())).collect();
    names.push(None);
    names.push(Some("lateral_thinking"));

    for trial in 0..300u64 {
        let mut rng = StdRng::seed_from_u64(trial);
        let original = ReflectiveEcosystem::offline();
        for _ in 0..rng.random_range(1..40) {
            let name = names[rng.random_range(0..names.len())];
            original.process_feedback("Q?", rng.random_bool(0.5), name);
        }
        original.save_state(&path).unwrap();

        let restored = ReflectiveEcosystem::offline();
        restored.load_state(&path).unwrap();

        for paradigm in Paradigm::ALL {
            let saved = original.node_snapshot(paradigm).unwrap();
            let loaded = restored.node_snapshot(paradigm).unwrap();
            assert_eq!(
                saved.weight.to_bits(),
                loaded.weight.to_bits(),
                "trial {trial} {paradigm}: saved {} restored {}",
                saved.weight,
                loaded.weight
            );
            let saved_bits: Vec<u64> = saved.feedback_history.iter().map(|f| f.to_bits()).collect();
            let loaded_bits: Vec<u64> = loaded.feedback_history.iter().map(|f| f.to_bits()).collect();
            assert_eq!(saved_bits, loaded_bits);
        }
        assert_eq!(restored.snapshot(), original.snapshot());
    }
}

#[test]
fn test_load_missing_file_keeps_defaults() {
    let eco = ReflectiveEcosystem::offline();
    eco.process_feedback("Q?", false, Some("expert_lexicons"));
    let before = eco.snapshot();

    let err = eco.load_state("/nonexistent/dir/state.json").unwrap_err();
    assert!(matches!(err, ReasoningError::StateNotFound(_)));
    assert_eq!(eco.snapshot(), before);
}

#[test]
fn test_load_corrupt_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{\"nodes\": {\"expert_lexicons\": {\"weight\": 0.2").unwrap();

    let eco = ReflectiveEcosystem::offline();
    let before = eco.snapshot();

    assert!(eco.load_state(&path).is_err());
    assert_eq!(eco.snapshot(), before);
}

#[test]
fn test_load_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(
        &path,
        r#"{
            "nodes": {
                "expert_lexicons": {"weight": 0.4, "feedback_history": [-0.5, -0.5], "positive_ratings": 0},
                "conceptual_chaining": {"weight": 0.01}
            },
            "question_history": [
                {"question": "A?", "helpful": false, "paradigm": "expert_lexicons"},
                {"question": "B?", "helpful": true, "paradigm": null}
            ]
        }"#,
    )
    .unwrap();

    let eco = ReflectiveEcosystem::offline();
    eco.load_state(&path).unwrap();

    let expert = eco.node_snapshot(Paradigm::ExpertLexicons).unwrap();
    assert_eq!(expert.weight, 0.4);
    assert_eq!(expert.questions_rated, 2);
    assert_eq!(expert.questions_generated, 0);

    let weights = eco.weights();
    assert_eq!(weights[&Paradigm::ConceptualChaining], 0.1);
    assert_eq!(weights[&Paradigm::SocraticQuestioning], 1.0);

    assert_eq!(eco.history_len(), 2);
    assert_eq!(eco.global_coherence(), 0.5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_feedback_has_no_lost_updates() {
    let eco = Arc::new(ReflectiveEcosystem::offline());

    let mut handles = Vec::new();
    for worker in 0..8 {
        let eco = eco.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..25 {
                eco.process_feedback("Q?", (worker + i) % 2 == 0, Some("conceptual_chaining"));
                eco.generate_questions("text", &[Issue::new("x", "k", 0.5)], None, 5)
                    .await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let node = eco.node_snapshot(Paradigm::ConceptualChaining).unwrap();
    assert_eq!(node.questions_rated, 200);
    assert_eq!(node.feedback_history.len(), 200);
    assert_eq!(eco.history_len(), 200);
    assert!((0.1..=1.0).contains(&node.weight));
}
