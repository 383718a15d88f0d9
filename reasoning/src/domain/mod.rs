// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Reasoning Domain Layer
//!
//! Pure types and algorithms. The only I/O is the optional template override
//! file read by [`templates::TemplateBank`].
//!
//! | Module | Key Types |
//! |--------|-----------|
//! | [`paradigm`] | `Paradigm` |
//! | [`issue`] | `Issue` |
//! | [`node`] | `ReasoningNode` |
//! | [`templates`] | `TemplateBank` |
//! | [`classifier`] | `ParadigmClassifier`, `KeywordClassifier` |
//! | [`ensemble`] | weighted sampling, deduplication |
//! | [`feedback`] | `FeedbackRecord`, `EcosystemPolicy` |
//! | [`report`] | `PerformanceReport` |
//! | [`llm`] | `QuestionProvider`, `LLMError` |

pub mod classifier;
pub mod ensemble;
pub mod feedback;
pub mod issue;
pub mod llm;
pub mod node;
pub mod paradigm;
pub mod report;
pub mod templates;

pub use classifier::*;
pub use feedback::*;
pub use issue::*;
pub use llm::*;
pub use node::*;
pub use paradigm::*;
pub use report::*;
pub use templates::TemplateBank;
