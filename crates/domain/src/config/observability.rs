use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Observability
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Optional OTLP trace export on top of the JSON logs.
///
/// With no `otlp_endpoint` only the JSON log layer is installed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// OTLP gRPC endpoint, e.g. `http://localhost:4317`.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    #[serde(default = "d_service_name")]
    pub service_name: String,

    /// `TraceIdRatioBased` sampling ratio in `0.0..=1.0`.
    #[serde(default = "d_sample_rate")]
    pub sample_rate: f64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            service_name: d_service_name(),
            sample_rate: d_sample_rate(),
        }
    }
}

fn d_service_name() -> String {
    "assistant-bridge".into()
}

fn d_sample_rate() -> f64 {
    1.0
}
