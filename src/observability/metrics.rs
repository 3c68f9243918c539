use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

/// Render every registered metric in the prometheus text format.
pub async fn render() -> String {
    let metrics = get_metrics().await;
    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer) {
        warn!(error = %e, "failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token cache
    pub token_cache_hits: IntCounter,
    pub token_cache_misses: IntCounter,
    pub token_cache_evictions: IntCounter,
    pub token_cache_write_failures: IntCounter,

    // Token endpoint
    pub auth_exchanges: IntCounterVec,
    pub auth_exchange_failures: IntCounterVec,

    // API
    pub api_requests: IntCounterVec,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("leaseweb_client".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            token_cache_hits: IntCounter::new("token_cache_hits_total", "Token requests served from the cache").unwrap(),
            token_cache_misses: IntCounter::new("token_cache_misses_total", "Token requests that required an exchange").unwrap(),
            token_cache_evictions: IntCounter::new("token_cache_evictions_total", "Expired cached tokens removed").unwrap(),
            token_cache_write_failures: IntCounter::new("token_cache_write_failures_total", "Failures persisting or removing cached tokens").unwrap(),

            auth_exchanges: IntCounterVec::new(Opts::new("auth_exchanges_total", "Token endpoint exchanges by grant"), &["grant"]).unwrap(),
            auth_exchange_failures: IntCounterVec::new(Opts::new("auth_exchange_failures_total", "Token endpoint failures by reason"), &["reason"]).unwrap(),

            api_requests: IntCounterVec::new(Opts::new("api_requests_total", "API requests by method and status"), &["method", "status"]).unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_misses.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_evictions.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_write_failures.clone())).unwrap();
        reg.register(Box::new(metrics.auth_exchanges.clone())).unwrap();
        reg.register(Box::new(metrics.auth_exchange_failures.clone())).unwrap();
        reg.register(Box::new(metrics.api_requests.clone())).unwrap();

        metrics
    }
}
