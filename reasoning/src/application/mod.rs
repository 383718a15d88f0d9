// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Provides the ecosystem application service.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Orchestrates question generation, feedback and persistence

pub mod ecosystem;

pub use ecosystem::ReflectiveEcosystem;
