//! Configuration for the Analysis Service

use pulse_core::config::{duration_env, parse_env};
use pulse_core::{PulseError, Result, ServiceConfig};
use pulse_stream::{AnalysisOptions, EmptyPolicy, FramePolicy};
use std::net::SocketAddr;
use std::time::Duration;

/// Analysis Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Service name, HTTP port and log level
    pub service: ServiceConfig,
    /// HTTP bind host
    pub host: String,
    /// Post-update feed to analyze
    pub feed_url: String,
    /// Longest time budget a request may ask for
    pub max_duration: Duration,
    /// Fail the request on a malformed frame, or skip it
    pub frame_policy: FramePolicy,
    pub empty_policy: EmptyPolicy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            service: ServiceConfig::from_env()?,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            feed_url: std::env::var("FEED_URL")
                .unwrap_or_else(|_| "https://stream.upfluence.co/stream".to_string()),
            max_duration: duration_env("MAX_ANALYSIS_DURATION", Duration::from_secs(300))?,
            frame_policy: parse_env("MALFORMED_FRAME_POLICY", FramePolicy::Abort)?,
            empty_policy: parse_env("EMPTY_RESULT_POLICY", EmptyPolicy::Zero)?,
        })
    }

    /// Get socket address for binding
    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.service.http_port)
            .parse()
            .map_err(|e| PulseError::Config(format!("Invalid bind address: {}", e)))
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            max_duration: Some(self.max_duration),
            frame_policy: self.frame_policy,
            empty_policy: self.empty_policy,
        }
    }
}
