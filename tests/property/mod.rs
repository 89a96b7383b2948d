// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Kind inheritance, build/render agreement and the compute lifecycle.

mod compute_lifecycle;
mod metamodel_properties;
