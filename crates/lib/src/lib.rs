//! jargo-lib: Core types and logic for jargo
//!
//! This crate models a dependency-aware build pipeline for mixed
//! Groovy/Java projects:
//! - `unit` / `closure`: build nodes and transitive dependency resolution
//! - `compile` / `library`: two-stage compilation plans and composite
//!   library composition
//! - `testgen` / `rules`: test class-identity inference, runner-script
//!   generation, and the test composition rules built on top
//! - `manifest` / `dag` / `project`: the TOML declaration interface and
//!   whole-project resolution
//! - `execute`: a sequential fail-fast runner for the emitted plans

pub mod action;
pub mod closure;
pub mod compile;
pub mod config;
pub mod consts;
pub mod dag;
pub mod execute;
pub mod library;
pub mod manifest;
pub mod project;
pub mod rules;
pub mod source;
pub mod store;
pub mod testgen;
pub mod unit;
pub mod util;
