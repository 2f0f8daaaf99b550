//! Integration tests for the triage assistant.
//!
//! These tests verify end-to-end workflows including:
//! - The intake wizard driven by the assistant
//! - Recovery from completion failures
//! - The command-line pipeline

mod cli_pipeline;
mod fallback_recovery;
mod intake_workflow;
mod support;
