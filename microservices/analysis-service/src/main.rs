//! Analysis Service
//!
//! Engagement analysis over the live post-update feed:
//! - `GET /analysis?duration=30s&dimension=likes` reads the feed for the
//!   requested time and returns the post count, the timestamp bounds and the
//!   integer average of the chosen metric
//! - Health, readiness and request statistics

mod config;
mod error;
mod handlers;
mod metrics;
mod routes;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use pulse_core::{
    DependencyStatus, HealthStatus, MicroserviceRuntime, PulseError, PulseService, ReadinessStatus,
};
use pulse_stream::{Analyzer, FeedSource, HttpFeed};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::info;

pub use config::Config;
pub use error::{Error, Result};

use metrics::ServiceMetrics;

const SERVICE_ID: &str = "analysis-service";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub metrics: Arc<ServiceMetrics>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: &Config, feed: Arc<dyn FeedSource>) -> Self {
        Self {
            analyzer: Arc::new(Analyzer::new(feed, config.analysis_options())),
            metrics: Arc::new(ServiceMetrics::new()),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: SERVICE_ID.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.uptime_secs(),
        }
    }

    /// The feed is opened per request; readiness reflects the last attempt.
    pub fn readiness(&self) -> ReadinessStatus {
        let feed = DependencyStatus {
            name: self.analyzer.feed_name().to_string(),
            available: self.metrics.feed_reachable(),
            latency_ms: None,
        };

        ReadinessStatus {
            ready: true,
            dependencies: vec![feed],
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pulse_telemetry::init(SERVICE_ID)?;

    info!("Starting Analysis Service");

    let config = Config::from_env()?;
    let feed = HttpFeed::new(config.feed_url.clone())?;
    info!(feed = %feed.url(), max_duration = ?config.max_duration, "Feed configured");

    let service = Arc::new(AnalysisService::new(config, Arc::new(feed)));
    MicroserviceRuntime::run(service).await?;

    Ok(())
}

pub struct AnalysisService {
    config: Config,
    state: AppState,
}

impl AnalysisService {
    pub fn new(config: Config, feed: Arc<dyn FeedSource>) -> Self {
        let state = AppState::new(&config, feed);
        Self { config, state }
    }
}

#[async_trait]
impl PulseService for AnalysisService {
    fn service_id(&self) -> &'static str {
        SERVICE_ID
    }

    async fn shutdown(&self) -> pulse_core::Result<()> {
        info!("Shutting down Analysis Service");
        self.state.metrics.log_totals();
        Ok(())
    }

    async fn start(&self) -> pulse_core::Result<()> {
        let bind_addr = self.config.bind_address()?;
        let app = routes::create_router(self.state.clone());

        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| PulseError::Config(format!("Cannot bind {}: {}", bind_addr, e)))?;
        info!("Analysis Service listening on {}", bind_addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| PulseError::Internal(format!("HTTP server: {}", e)))?;

        Ok(())
    }
}
