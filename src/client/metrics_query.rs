use chrono::NaiveDate;
use http::Method;
use serde_json::{json, Value};

use crate::auth::endpoint::AuthEndpoint;
use crate::cache::store::TokenStore;
use crate::client::api::{parse_json_response, LeasewebClient};
use crate::errors::ApiError;
use crate::helpers::time::format_day_start;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Bandwidth,
    Datatraffic,
}

impl MetricKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            MetricKind::Bandwidth => "bandwidth",
            MetricKind::Datatraffic => "datatraffic",
        }
    }

    pub fn aggregation(&self) -> &'static str {
        match self {
            MetricKind::Bandwidth => "AVG",
            MetricKind::Datatraffic => "SUM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricsFormat {
    #[default]
    Json,
    Png,
}

impl MetricsFormat {
    pub fn accept(&self) -> &'static str {
        match self {
            MetricsFormat::Json => "application/json",
            MetricsFormat::Png => "image/png",
        }
    }
}

/// Daily metrics between two dates, both taken at midnight UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub format: MetricsFormat,
}

impl MetricsQuery {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from,
            to,
            format: MetricsFormat::default(),
        }
    }

    pub fn with_format(mut self, format: MetricsFormat) -> Self {
        self.format = format;
        self
    }

    pub fn to_query(&self, kind: MetricKind) -> Value {
        json!({
            "from": format_day_start(self.from),
            "to": format_day_start(self.to),
            "aggregation": kind.aggregation(),
            "granularity": "DAY",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricsPayload {
    Json(Value),
    Image(Vec<u8>),
}

impl<S, E> LeasewebClient<S, E>
where
    S: TokenStore,
    E: AuthEndpoint,
{
    pub async fn get_server_metrics(
        &self,
        server_id: &str,
        kind: MetricKind,
        query: &MetricsQuery,
    ) -> Result<MetricsPayload, ApiError> {
        let path = format!(
            "/bareMetals/v2/servers/{}/metrics/{}",
            urlencoding::encode(server_id),
            kind.path_segment()
        );
        let response = self
            .send(
                Method::GET,
                &path,
                Some(&query.to_query(kind)),
                None,
                query.format.accept(),
            )
            .await?;

        let url = response.url().to_string();
        let transport = |source| ApiError::Transport {
            method: Method::GET,
            url: url.to_owned(),
            source,
        };

        match query.format {
            MetricsFormat::Json => {
                let text = response.text().await.map_err(transport)?;
                parse_json_response(&url, &text).map(MetricsPayload::Json)
            }
            MetricsFormat::Png => {
                let bytes = response.bytes().await.map_err(transport)?;
                Ok(MetricsPayload::Image(bytes.to_vec()))
            }
        }
    }
}
