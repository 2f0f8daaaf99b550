//! AI-backed diagnostic assistant with local fallback.
//!
//! [`DiagnosticAssistant`] asks the completion API for an analysis and falls
//! back to the rule-based [`engine`] whenever the API is not configured,
//! unreachable, or returns something that cannot be parsed. Callers always
//! get an [`Analysis`]; failures are logged and counted, never returned.
//!
//! # Example
//!
//! ```
//! use triage_assist::anthropic::AnthropicClient;
//! use triage_assist::assistant::DiagnosticAssistant;
//! use triage_assist::model::{Gender, PatientData};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let assistant = DiagnosticAssistant::<AnthropicClient>::local_only();
//! let patient = PatientData::new("Maria", 45, Gender::Female, "aperto no peito e tontura");
//!
//! let analysis = assistant.analyze_symptoms(&patient).await;
//! assert!(!analysis.possible_conditions.is_empty());
//! assert_eq!(assistant.metrics().summary().local_invocations, 1);
//! # }
//! ```

mod parsing;

pub use parsing::{extract_json, merge_refinement, parse_analysis};

use tracing::{debug, warn};

use crate::engine;
use crate::error::AssistError;
use crate::metrics::{FallbackEvent, MetricEvent, MetricsCollector, Source, Timer};
use crate::model::{Analysis, Answer, PatientData};
use crate::prompts::{analysis_prompt, refinement_prompt, SYSTEM_PROMPT};
use crate::traits::{CompletionClient, CompletionConfig, Message};

/// Operation name recorded for [`DiagnosticAssistant::analyze_symptoms`].
pub const OP_ANALYZE: &str = "analyze";

/// Operation name recorded for [`DiagnosticAssistant::refine_diagnosis`].
pub const OP_REFINE: &str = "refine";

/// Output budget for one analysis response.
const MAX_RESPONSE_TOKENS: u32 = 4096;

/// Low temperature keeps probabilities stable between runs.
const TEMPERATURE: f32 = 0.3;

/// Diagnostic assistant.
///
/// Generic over the completion client so tests can substitute a mock.
pub struct DiagnosticAssistant<C: CompletionClient> {
    client: Option<C>,
    metrics: MetricsCollector,
}

impl<C: CompletionClient> std::fmt::Debug for DiagnosticAssistant<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticAssistant")
            .field("remote_enabled", &self.client.is_some())
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl<C: CompletionClient> DiagnosticAssistant<C> {
    /// Create an assistant that uses `client` before falling back.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::with_optional_client(Some(client))
    }

    /// Create an assistant that only uses the local engine.
    #[must_use]
    pub fn local_only() -> Self {
        Self::with_optional_client(None)
    }

    /// Create an assistant from an optional client.
    #[must_use]
    pub fn with_optional_client(client: Option<C>) -> Self {
        Self {
            client,
            metrics: MetricsCollector::new(),
        }
    }

    /// Whether a completion client is configured.
    #[must_use]
    pub const fn remote_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Invocation metrics.
    #[must_use]
    pub const fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Produce a preliminary analysis for the patient.
    pub async fn analyze_symptoms(&self, patient: &PatientData) -> Analysis {
        let Some(client) = &self.client else {
            return self.local(OP_ANALYZE, || engine::analyze(patient));
        };

        let timer = Timer::start();
        debug!(patient_id = %patient.id, "Requesting remote analysis");

        let result = Self::request(client, analysis_prompt(patient))
            .await
            .and_then(|value| parse_analysis(&value, &patient.symptoms));

        match result {
            Ok(analysis) => {
                self.record_remote(OP_ANALYZE, &timer, true);
                debug!(
                    conditions = analysis.possible_conditions.len(),
                    risk_level = analysis.risk_level.as_str(),
                    "Remote analysis parsed"
                );
                analysis
            }
            Err(error) => {
                self.record_remote(OP_ANALYZE, &timer, false);
                self.record_fallback(OP_ANALYZE, &error);
                self.local(OP_ANALYZE, || engine::analyze(patient))
            }
        }
    }

    /// Update `current` with the answers to its follow-up questions.
    ///
    /// When the remote path fails the prior analysis is returned unchanged.
    pub async fn refine_diagnosis(&self, answers: &[Answer], current: &Analysis) -> Analysis {
        let Some(client) = &self.client else {
            return self.local(OP_REFINE, || engine::refine(answers, current));
        };

        let timer = Timer::start();
        debug!(answers = answers.len(), "Requesting remote refinement");

        let result = Self::request(client, refinement_prompt(answers, current))
            .await
            .and_then(|value| merge_refinement(&value, current));

        match result {
            Ok(analysis) => {
                self.record_remote(OP_REFINE, &timer, true);
                analysis
            }
            Err(error) => {
                self.record_remote(OP_REFINE, &timer, false);
                self.record_fallback(OP_REFINE, &error);
                current.clone()
            }
        }
    }

    async fn request(client: &C, prompt: String) -> Result<serde_json::Value, AssistError> {
        let config = CompletionConfig::new()
            .with_max_tokens(MAX_RESPONSE_TOKENS)
            .with_temperature(TEMPERATURE)
            .with_system_prompt(SYSTEM_PROMPT);

        let response = client.complete(vec![Message::user(prompt)], config).await?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Completion received"
        );
        extract_json(&response.content)
    }

    fn local(&self, operation: &str, run: impl FnOnce() -> Analysis) -> Analysis {
        let timer = Timer::start();
        let analysis = run();
        self.metrics.record(MetricEvent::new(
            operation,
            Source::Local,
            timer.elapsed_ms(),
            true,
        ));
        analysis
    }

    fn record_remote(&self, operation: &str, timer: &Timer, success: bool) {
        self.metrics.record(MetricEvent::new(
            operation,
            Source::Remote,
            timer.elapsed_ms(),
            success,
        ));
    }

    fn record_fallback(&self, operation: &str, error: &AssistError) {
        warn!(operation, error = %error, "Remote path failed, using local result");
        self.metrics
            .record_fallback(FallbackEvent::new(operation, error.to_string()));
    }
}
