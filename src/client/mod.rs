pub mod api;
pub mod metrics_query;
pub mod pagination;

pub use api::{LeasewebClient, RequestBody};
pub use metrics_query::{MetricKind, MetricsFormat, MetricsPayload, MetricsQuery};
