use super::*;
use findata_core::{DataOrigin, HealthCheckPolicy, HttpError, HttpErrorKind, HttpResponse};

mockall::mock! {
    Transport {}

    #[async_trait]
    impl HttpClient for Transport {
        async fn execute(
            &self,
            request: HttpRequest,
        ) -> std::result::Result<HttpResponse, HttpError>;
    }
}

fn config_with_key(key: Option<&str>) -> AdapterConfig {
    let builder = AdapterConfig::builder().health_check(HealthCheckPolicy::disabled());
    match key {
        Some(key) => builder.news_api_key(key),
        None => builder,
    }
    .build()
    .unwrap()
}

fn no_requests() -> Arc<dyn HttpClient> {
    let mut http = MockTransport::new();
    http.expect_execute().times(0);
    Arc::new(http)
}

const THREE_ARTICLES: &str = r#"{
    "status": "ok",
    "articles": [
        {"title": "Older record", "description": "Acme posts record sales",
         "content": null, "publishedAt": "2025-05-01T10:00:00Z"},
        {"title": "Newest", "description": "Acme faces lawsuit over $12.5 deal",
         "content": "", "publishedAt": "2025-05-03T10:00:00Z"},
        {"title": "Middle", "description": null,
         "content": "quiet day", "publishedAt": "2025-05-02T10:00:00Z"}
    ]
}"#;

#[tokio::test]
async fn test_without_key_serves_stub_without_io() {
    let adapter = NewsAdapter::with_transport(&config_with_key(None), no_requests())
        .await
        .unwrap();
    assert!(adapter.is_stub_mode());

    let result = adapter.run_chain("AAPL", 7).await;
    assert!(result.is_stub());
    assert_eq!(result.source(), DataOrigin::StubFallback);
    assert_eq!(result.stub_reason(), Some("No NEWSAPI_KEY configured"));

    let digest = result.data();
    assert_eq!(digest.article_count, 2);
    assert_eq!(digest.counts.positive, 1);
    assert_eq!(digest.counts.negative, 1);
    assert_eq!(digest.counts.mixed, 0);
    assert_eq!(digest.counts.neutral, 0);
}

#[tokio::test]
async fn test_health_check_without_key() {
    let config = AdapterConfig::builder()
        .health_check(HealthCheckPolicy::report_only())
        .build()
        .unwrap();
    let adapter = NewsAdapter::with_transport(&config, no_requests()).await.unwrap();

    let status = adapter.health_status();
    assert!(!status.healthy);
    assert!(status.message.contains("NEWSAPI_KEY"));
    assert!(status.stub_mode);
}

#[tokio::test]
async fn test_live_ingest_request_and_order() {
    let mut http = MockTransport::new();
    http.expect_execute()
        .withf(|req| {
            req.url == EVERYTHING_URL
                && req.headers.get("x-api-key").map(String::as_str) == Some("key")
                && req.query_param("q") == Some("AAPL")
                && req.query_param("language") == Some("en")
                && req.query_param("pageSize") == Some("50")
                && req.query_param("sortBy") == Some("publishedAt")
                && req.query_param("from").is_some_and(|d| d.len() == 10)
                && req.timeout == Duration::from_secs(20)
        })
        .times(1)
        .returning(|_| Ok(HttpResponse::ok_json(THREE_ARTICLES)));

    let adapter = NewsAdapter::with_transport(&config_with_key(Some("key")), Arc::new(http))
        .await
        .unwrap();
    let result = adapter.fetch_articles("$aapl", 7).await;

    assert!(!result.is_stub());
    let titles: Vec<&str> = result.data().iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Newest", "Middle", "Older record"]);
    assert_eq!(result.data()[1].description, "");
}

#[tokio::test]
async fn test_live_chain_digest() {
    let mut http = MockTransport::new();
    http.expect_execute()
        .returning(|_| Ok(HttpResponse::ok_json(THREE_ARTICLES)));

    let adapter = NewsAdapter::with_transport(&config_with_key(Some("key")), Arc::new(http))
        .await
        .unwrap();
    let result = adapter.run_chain("ACME", 3).await;

    assert!(!result.is_stub());
    let digest = result.data();
    assert_eq!(digest.article_count, 3);
    assert_eq!(digest.counts.total(), 3);
    assert_eq!(digest.samples[0].sentiment, Sentiment::Negative);
    assert_eq!(digest.samples[0].entities.money, vec!["$12.5"]);
    assert_eq!(digest.samples[1].sentiment, Sentiment::Neutral);
    assert_eq!(digest.samples[2].sentiment, Sentiment::Positive);
}

#[tokio::test]
async fn test_api_error_falls_back_to_stub_articles() {
    let mut http = MockTransport::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Err(HttpError::new(HttpErrorKind::Status(429), "Too Many Requests")));

    let adapter = NewsAdapter::with_transport(&config_with_key(Some("key")), Arc::new(http))
        .await
        .unwrap();
    let result = adapter.run_chain("AAPL", 7).await;

    assert!(result.is_stub());
    assert!(result.stub_reason().is_some_and(|r| r.contains("Too Many Requests")));
    assert_eq!(result.data().article_count, 2);
}

#[tokio::test]
async fn test_two_live_articles_are_flagged_stub() {
    let mut http = MockTransport::new();
    http.expect_execute().returning(|_| {
        Ok(HttpResponse::ok_json(
            r#"{"articles": [
                {"title": "a", "description": "beat", "content": "",
                 "publishedAt": "2025-05-02T00:00:00Z"},
                {"title": "b", "description": "flat", "content": "",
                 "publishedAt": "2025-05-01T00:00:00Z"}
            ]}"#,
        ))
    });

    let adapter = NewsAdapter::with_transport(&config_with_key(Some("key")), Arc::new(http))
        .await
        .unwrap();

    assert!(!adapter.fetch_articles("AAPL", 7).await.is_stub());
    let result = adapter.run_chain("AAPL", 7).await;
    assert!(result.is_stub());
    assert_eq!(result.stub_reason(), Some("Two articles ingested"));
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let mut http = MockTransport::new();
    http.expect_execute()
        .returning(|_| Ok(HttpResponse::ok_json("not json")));

    let adapter = NewsAdapter::with_transport(&config_with_key(Some("key")), Arc::new(http))
        .await
        .unwrap();
    let result = adapter.fetch_articles("AAPL", 7).await;
    assert!(result.is_stub());
    assert_eq!(result.data().len(), 2);
}

#[tokio::test]
async fn test_offline_drops_session() {
    let config = AdapterConfig::builder()
        .news_api_key("key")
        .offline(true)
        .health_check(HealthCheckPolicy::disabled())
        .build()
        .unwrap();
    let adapter = NewsAdapter::with_transport(&config, no_requests()).await.unwrap();

    assert!(adapter.is_stub_mode());
    let result = adapter.run_chain("AAPL", 7).await;
    assert!(result.is_stub());
    assert_eq!(result.stub_reason(), Some("Offline mode enabled"));
}

#[tokio::test]
async fn test_oversized_window_falls_back_to_stub() {
    let adapter = NewsAdapter::with_transport(&config_with_key(Some("key")), no_requests())
        .await
        .unwrap();

    let result = adapter.fetch_articles("AAPL", u32::MAX).await;
    assert!(result.is_stub());
    assert_eq!(result.data().len(), 2);
    assert!(result.stub_reason().is_some_and(|r| r.contains("out of range")));

    let chain = adapter.run_chain("AAPL", u32::MAX).await;
    assert!(chain.is_stub());
    assert_eq!(chain.data().article_count, 2);
}

#[tokio::test]
async fn test_health_probe_with_key() {
    let mut http = MockTransport::new();
    http.expect_execute()
        .withf(|req| {
            req.query_param("q") == Some("test") && req.timeout == Duration::from_secs(10)
        })
        .times(1)
        .returning(|_| Ok(HttpResponse::ok_json(r#"{"status":"ok","articles":[]}"#)));
    let config = AdapterConfig::builder()
        .news_api_key("key")
        .health_check(HealthCheckPolicy::strict())
        .build()
        .unwrap();

    let adapter = NewsAdapter::with_transport(&config, Arc::new(http)).await.unwrap();
    assert!(adapter.is_healthy());
    assert_eq!(adapter.health_status().message, "News API operational");
}

#[tokio::test]
#[ignore] // Requires network access and NEWSAPI_KEY
async fn test_run_chain_live() {
    let config = AdapterConfig::builder()
        .with_env_credentials()
        .health_check(HealthCheckPolicy::disabled())
        .build()
        .unwrap();
    let adapter = NewsAdapter::new(&config).await.unwrap();
    let result = adapter.run_chain("AAPL", DEFAULT_WINDOW_DAYS).await;
    assert_eq!(result.data().counts.total(), result.data().article_count);
}
