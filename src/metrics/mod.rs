//! Metrics collection.
//!
//! This module provides:
//! - Per-operation invocation counts and latency
//! - Success/failure rates
//! - Remote vs local source counts
//! - A bounded buffer of recent fallbacks
//!
//! # Example
//!
//! ```
//! use triage_assist::metrics::{MetricEvent, MetricsCollector, Source};
//!
//! let metrics = MetricsCollector::new();
//! metrics.record(MetricEvent::new("analyze", Source::Remote, 850, true));
//! metrics.record(MetricEvent::new("analyze", Source::Local, 2, true));
//! metrics.record(MetricEvent::new("refine", Source::Remote, 900, false));
//!
//! let summary = metrics.summary();
//! assert_eq!(summary.total_invocations, 3);
//! assert_eq!(summary.remote_invocations, 2);
//! assert!((summary.overall_success_rate - 0.666).abs() < 0.01);
//! assert!(summary.by_operation.contains_key("refine"));
//! ```

// Allow intentional numeric casts for metrics calculations
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;
use std::time::Instant;

/// Maximum number of events kept; the oldest are dropped first.
pub const MAX_EVENTS: usize = 10_000;

/// Maximum number of fallbacks kept for [`MetricsSummary::recent_fallbacks`].
pub const MAX_FALLBACKS: usize = 100;

/// Where an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The completion API.
    Remote,
    /// The rule-based engine.
    Local,
}

impl Source {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// A single metric event recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricEvent {
    /// Operation that was invoked (`analyze`, `refine`).
    pub operation: String,
    /// Which path produced the result.
    pub source: Source,
    /// Latency in milliseconds.
    pub latency_ms: u64,
    /// Whether the invocation succeeded.
    pub success: bool,
    /// Timestamp of the event (Unix epoch seconds).
    pub timestamp: u64,
}

impl MetricEvent {
    /// Create a new metric event.
    #[must_use]
    pub fn new(operation: impl Into<String>, source: Source, latency_ms: u64, success: bool) -> Self {
        Self {
            operation: operation.into(),
            source,
            latency_ms,
            success,
            timestamp: unix_now(),
        }
    }
}

/// Summary statistics for an operation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OperationSummary {
    /// Total invocations.
    pub total_invocations: u64,
    /// Successful invocations.
    pub successful: u64,
    /// Failed invocations.
    pub failed: u64,
    /// Average latency in milliseconds.
    pub avg_latency_ms: f64,
    /// Minimum latency in milliseconds.
    pub min_latency_ms: u64,
    /// Maximum latency in milliseconds.
    pub max_latency_ms: u64,
    /// Success rate (0.0-1.0).
    pub success_rate: f64,
}

/// Overall metrics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Total invocations across all operations.
    pub total_invocations: u64,
    /// Overall success rate; 1.0 when nothing was recorded.
    pub overall_success_rate: f64,
    /// Per-operation summaries.
    pub by_operation: HashMap<String, OperationSummary>,
    /// Invocations served by the completion API.
    pub remote_invocations: u64,
    /// Invocations served by the local engine.
    pub local_invocations: u64,
    /// Most recent fallbacks, oldest first.
    pub recent_fallbacks: Vec<FallbackEvent>,
}

/// The remote path failed and the local result was used instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackEvent {
    /// Operation that fell back.
    pub operation: String,
    /// Why the remote path failed.
    pub reason: String,
    /// Timestamp (Unix epoch seconds).
    pub timestamp: u64,
}

impl FallbackEvent {
    /// Create a new fallback event.
    #[must_use]
    pub fn new(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            reason: reason.into(),
            timestamp: unix_now(),
        }
    }
}

/// Thread-safe metrics collector.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    events: RwLock<VecDeque<MetricEvent>>,
    fallbacks: RwLock<VecDeque<FallbackEvent>>,
}

impl MetricsCollector {
    /// Create a new metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a metric event.
    pub fn record(&self, event: MetricEvent) {
        match self.events.write() {
            Ok(mut events) => {
                if events.len() == MAX_EVENTS {
                    events.pop_front();
                }
                events.push_back(event);
            }
            Err(poison_error) => {
                tracing::error!(
                    operation = %event.operation,
                    error = %poison_error,
                    "Failed to record metric event: RwLock poisoned"
                );
            }
        }
    }

    /// Record a fallback event.
    pub fn record_fallback(&self, fallback: FallbackEvent) {
        match self.fallbacks.write() {
            Ok(mut fallbacks) => {
                if fallbacks.len() == MAX_FALLBACKS {
                    fallbacks.pop_front();
                }
                fallbacks.push_back(fallback);
            }
            Err(poison_error) => {
                tracing::error!(
                    operation = %fallback.operation,
                    error = %poison_error,
                    "Failed to record fallback event: RwLock poisoned"
                );
            }
        }
    }

    /// Get summary statistics.
    #[must_use]
    pub fn summary(&self) -> MetricsSummary {
        let events: Vec<MetricEvent> = match self.events.read() {
            Ok(e) => e.iter().cloned().collect(),
            Err(poison_error) => {
                tracing::warn!(
                    error = %poison_error,
                    "Reading events from poisoned lock, using recovered data"
                );
                poison_error.into_inner().iter().cloned().collect()
            }
        };
        let recent_fallbacks = self.fallbacks();

        let mut grouped: HashMap<String, Vec<&MetricEvent>> = HashMap::new();
        for event in &events {
            grouped.entry(event.operation.clone()).or_default().push(event);
        }

        let by_operation = grouped
            .into_iter()
            .map(|(operation, op_events)| (operation, summarize(&op_events)))
            .collect();

        let total_invocations = events.len() as u64;
        let total_successful = events.iter().filter(|e| e.success).count() as u64;
        let overall_success_rate = if total_invocations > 0 {
            total_successful as f64 / total_invocations as f64
        } else {
            1.0
        };
        let remote_invocations = events
            .iter()
            .filter(|e| e.source == Source::Remote)
            .count() as u64;

        MetricsSummary {
            total_invocations,
            overall_success_rate,
            by_operation,
            remote_invocations,
            local_invocations: total_invocations - remote_invocations,
            recent_fallbacks,
        }
    }

    /// Get invocations for a specific operation.
    #[must_use]
    pub fn invocations_for(&self, operation: &str) -> Vec<MetricEvent> {
        self.events
            .read()
            .map(|events| {
                events
                    .iter()
                    .filter(|e| e.operation == operation)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get recent fallbacks, oldest first.
    #[must_use]
    pub fn fallbacks(&self) -> Vec<FallbackEvent> {
        self.fallbacks
            .read()
            .map(|f| f.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear all metrics.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
        if let Ok(mut fallbacks) = self.fallbacks.write() {
            fallbacks.clear();
        }
    }
}

fn summarize(events: &[&MetricEvent]) -> OperationSummary {
    let total = events.len() as u64;
    let successful = events.iter().filter(|e| e.success).count() as u64;
    let latencies: Vec<u64> = events.iter().map(|e| e.latency_ms).collect();
    let avg_latency_ms = if latencies.is_empty() {
        0.0
    } else {
        latencies.iter().sum::<u64>() as f64 / latencies.len() as f64
    };
    let success_rate = if total > 0 {
        successful as f64 / total as f64
    } else {
        0.0
    };

    OperationSummary {
        total_invocations: total,
        successful,
        failed: total - successful,
        avg_latency_ms,
        min_latency_ms: latencies.iter().copied().min().unwrap_or(0),
        max_latency_ms: latencies.iter().copied().max().unwrap_or(0),
        success_rate,
    }
}

/// Timer for measuring operation latency.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    #[must_use]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}
