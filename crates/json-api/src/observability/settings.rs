//! Request diagnostics chosen at startup.

use std::{sync::OnceLock, time::Duration};

use crate::config::observability::ObservabilityConfig;

static DIAGNOSTICS: OnceLock<RequestDiagnostics> = OnceLock::new();

#[derive(Debug, Clone, Copy)]
pub(super) struct RequestDiagnostics {
    pub(super) slow_request: Duration,
    /// Only honoured while spans are exported.
    pub(super) continue_remote_traces: bool,
}

impl Default for RequestDiagnostics {
    fn default() -> Self {
        Self {
            slow_request: Duration::from_secs(1),
            continue_remote_traces: false,
        }
    }
}

impl RequestDiagnostics {
    fn from_config(config: &ObservabilityConfig) -> Self {
        Self {
            slow_request: Duration::from_millis(config.slow_request_threshold_ms),
            continue_remote_traces: config.otel_enabled && config.otel_parent_propagation_enabled,
        }
    }
}

/// First call wins; later calls keep the installed settings.
pub(super) fn install(config: &ObservabilityConfig) {
    let _installed = DIAGNOSTICS.get_or_init(|| RequestDiagnostics::from_config(config));
}

pub(super) fn diagnostics() -> RequestDiagnostics {
    DIAGNOSTICS.get().copied().unwrap_or_default()
}
