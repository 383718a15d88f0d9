// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReasoningError {
    #[error("State file not found: {0}")]
    StateNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Prompt rendering failed: {0}")]
    Template(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ReasoningResult<T> = Result<T, ReasoningError>;
