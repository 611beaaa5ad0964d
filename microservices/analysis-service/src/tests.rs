//! Unit tests for the Analysis Service

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures_util::stream;
    use pulse_core::{PulseError, ServiceConfig};
    use pulse_stream::{bounded, EmptyPolicy, FeedSource, FeedStream, FramePolicy};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::time::Instant;

    use crate::{routes, AppState, Config, Error};

    const SAMPLE: &str = concat!(
        ":ok\n\n",
        "data: {\"tweet\":{\"likes\":2,\"comments\":4,\"favorites\":1,\"retweets\":0,\"timestamp\":10}}\n\n",
        "data: {\"pin\":{\"likes\":5,\"comments\":0,\"timestamp\":30}}\n\n",
        "data: {\"tweet\":{\"likes\":9,\"comments\":2,\"favorites\":1,\"retweets\":3,\"timestamp\":20}}\n\n",
    );

    struct FixedFeed {
        body: &'static str,
    }

    #[async_trait]
    impl FeedSource for FixedFeed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn open(&self, deadline: Instant) -> pulse_core::Result<FeedStream> {
            Ok(bounded(stream::iter(vec![Ok(Bytes::from_static(self.body.as_bytes()))]), deadline))
        }
    }

    struct DownFeed;

    #[async_trait]
    impl FeedSource for DownFeed {
        fn name(&self) -> &str {
            "down"
        }

        async fn open(&self, _deadline: Instant) -> pulse_core::Result<FeedStream> {
            Err(PulseError::StreamUnavailable("dns error".into()))
        }
    }

    fn test_config() -> Config {
        Config {
            service: ServiceConfig {
                service_name: "analysis-service".to_string(),
                http_port: 0,
                log_level: "debug".to_string(),
            },
            host: "127.0.0.1".to_string(),
            feed_url: "http://feed.invalid/stream".to_string(),
            max_duration: Duration::from_secs(60),
            frame_policy: FramePolicy::Abort,
            empty_policy: EmptyPolicy::Zero,
        }
    }

    async fn spawn(feed: Arc<dyn FeedSource>) -> (SocketAddr, AppState) {
        let state = AppState::new(&test_config(), feed);
        let app = routes::create_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, state)
    }

    async fn get(addr: SocketAddr, path: &str) -> (u16, serde_json::Value) {
        let response = reqwest::get(format!("http://{}{}", addr, path)).await.unwrap();
        let status = response.status().as_u16();
        let body = response.json().await.unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_analysis_likes() {
        let (addr, state) = spawn(Arc::new(FixedFeed { body: SAMPLE })).await;

        let response = reqwest::get(format!("http://{}/analysis?duration=5s&dimension=likes", addr))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        assert_eq!(
            response.text().await.unwrap(),
            r#"{"total_posts":3,"mini_timestamp":10,"maxi_timestamp":30,"avg_likes":5}"#
        );

        assert_eq!(state.metrics.requests_total.get(), 1);
        assert_eq!(state.metrics.frames_decoded.get(), 3);
        assert_eq!(state.metrics.requests_in_flight.get(), 0);
    }

    #[tokio::test]
    async fn test_analysis_comments_shape() {
        let (addr, _) = spawn(Arc::new(FixedFeed { body: SAMPLE })).await;

        let (status, body) = get(addr, "/analysis?duration=1s&dimension=comments").await;
        assert_eq!(status, 200);
        assert_eq!(body["avg_comments"], 2);
        assert!(body.get("avg_likes").is_none());
    }

    #[tokio::test]
    async fn test_missing_parameter_is_bad_request() {
        let (addr, state) = spawn(Arc::new(FixedFeed { body: SAMPLE })).await;

        let (status, body) = get(addr, "/analysis?duration=5s").await;
        assert_eq!(status, 400);
        assert_eq!(body["code"], "MISSING_PARAMETER");
        assert_eq!(state.metrics.requests_failed.get(), 1);
    }

    #[tokio::test]
    async fn test_invalid_parameters_are_bad_request() {
        let (addr, _) = spawn(Arc::new(FixedFeed { body: SAMPLE })).await;

        let (status, body) = get(addr, "/analysis?duration=abc&dimension=likes").await;
        assert_eq!(status, 400);
        assert_eq!(body["code"], "INVALID_DURATION");

        let (status, body) = get(addr, "/analysis?duration=5s&dimension=shares").await;
        assert_eq!(status, 400);
        assert_eq!(body["code"], "INVALID_DIMENSION");

        let (status, _) = get(addr, "/analysis?duration=2m&dimension=likes").await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_malformed_feed_is_server_error() {
        let (addr, _) = spawn(Arc::new(FixedFeed { body: "data: {\"tweet\":\n\ndata: {}" })).await;

        let (status, body) = get(addr, "/analysis?duration=1s&dimension=likes").await;
        assert_eq!(status, 500);
        assert_eq!(body["code"], "MALFORMED_FRAME");
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_bad_gateway() {
        let (addr, state) = spawn(Arc::new(DownFeed)).await;

        let (status, body) = get(addr, "/analysis?duration=1s&dimension=retweets").await;
        assert_eq!(status, 502);
        assert_eq!(body["code"], "STREAM_UNAVAILABLE");

        let (_, ready) = get(addr, "/ready").await;
        assert_eq!(ready["dependencies"][0]["name"], "down");
        assert_eq!(ready["dependencies"][0]["available"], false);
        assert!(!state.metrics.feed_reachable());
    }

    #[tokio::test]
    async fn test_zero_duration_keeps_feed_unreachable() {
        let (addr, state) = spawn(Arc::new(DownFeed)).await;

        let (status, _) = get(addr, "/analysis?duration=1s&dimension=likes").await;
        assert_eq!(status, 502);

        let (status, _) = get(addr, "/analysis?duration=0&dimension=likes").await;
        assert_eq!(status, 200);

        let (_, ready) = get(addr, "/ready").await;
        assert_eq!(ready["dependencies"][0]["available"], false);
        assert!(!state.metrics.feed_reachable());
    }

    #[tokio::test]
    async fn test_failed_requests_count_towards_latency() {
        let (addr, state) = spawn(Arc::new(DownFeed)).await;

        get(addr, "/analysis?duration=1s&dimension=likes").await;
        get(addr, "/analysis?duration=abc&dimension=likes").await;

        assert_eq!(state.metrics.requests_failed.get(), 2);
        assert_eq!(state.metrics.request_latency_ms.count(), 2);
        assert_eq!(state.metrics.requests_in_flight.get(), 0);
    }

    #[tokio::test]
    async fn test_zero_duration_returns_empty_summary() {
        let (addr, _) = spawn(Arc::new(DownFeed)).await;

        let (status, body) = get(addr, "/analysis?duration=0s&dimension=favorites").await;
        assert_eq!(status, 200);
        assert_eq!(
            body,
            serde_json::json!({
                "total_posts": 0,
                "mini_timestamp": 0,
                "maxi_timestamp": 0,
                "avg_favorites": 0
            })
        );
    }

    #[tokio::test]
    async fn test_health_and_stats() {
        let (addr, _) = spawn(Arc::new(FixedFeed { body: SAMPLE })).await;

        let (status, health) = get(addr, "/health").await;
        assert_eq!(status, 200);
        assert_eq!(health["healthy"], true);
        assert_eq!(health["service_id"], "analysis-service");

        get(addr, "/analysis?duration=1s&dimension=likes").await;
        let (_, stats) = get(addr, "/stats").await;
        assert_eq!(stats["requests_total"], 1);
        assert_eq!(stats["frames_decoded"], 3);
        assert_eq!(stats["requests_in_flight"], 0);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (PulseError::MissingParameter(String::new()), 400),
            (PulseError::InvalidDuration(String::new()), 400),
            (PulseError::InvalidDimension(String::new()), 400),
            (PulseError::EmptyResult(String::new()), 422),
            (PulseError::StreamUnavailable(String::new()), 502),
            (PulseError::MalformedFrame(String::new()), 500),
            (PulseError::Internal(String::new()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(Error::from(err).status().as_u16(), status);
        }
    }

    #[test]
    fn test_config_bind_address() {
        let config = test_config();
        assert_eq!(config.bind_address().unwrap().to_string(), "127.0.0.1:0");

        let options = config.analysis_options();
        assert_eq!(options.max_duration, Some(Duration::from_secs(60)));
        assert_eq!(options.frame_policy, FramePolicy::Abort);
    }
}
