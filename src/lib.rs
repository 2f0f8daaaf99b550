//! Triage Assistant
//!
//! Symptom intake and preliminary triage for health workers in remote
//! areas, backed by the Anthropic API with a rule-based local engine as
//! fallback.
//!
//! # Features
//!
//! - Keyword knowledge base of cardiovascular, neurological and respiratory
//!   conditions
//! - Deterministic local scoring, question generation and refinement
//! - Optional AI analysis with lenient response parsing and automatic
//!   fallback to the local engine
//! - Intake wizard session and a Portuguese diagnostic report
//!
//! # Quick Start
//!
//! ```bash
//! echo '{"name":"Ana","age":34,"gender":"F","symptoms":"dor de cabeça e tontura"}' \
//!   | ANTHROPIC_API_KEY=sk-ant-xxx ./triage-assist analyze
//! ```
//!
//! # Architecture
//!
//! ```text
//!  stdin JSON   ┌─────────────┐      ┌─────────────────────┐
//! ─────────────▶│     cli     │─────▶│ DiagnosticAssistant │──────▶ Anthropic API
//!               └─────────────┘      └──────────┬──────────┘
//!  stdout ◀── report / analysis                 │ fallback
//!                                               ▼
//!                                    engine ◀── knowledge
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod anthropic;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod knowledge;
pub mod metrics;
pub mod model;
pub mod prompts;
pub mod report;
pub mod session;
pub mod traits;

#[cfg(test)]
mod test_utils;
