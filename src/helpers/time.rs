use chrono::{DateTime, Duration, NaiveDate, Utc};

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Absolute expiry for a token issued at `issued_at` with a lifetime of `expires_in_seconds`.
/// Negative lifetimes are clamped to zero, which makes the token expired on arrival.
/// Lifetimes past the representable range saturate at `DateTime::<Utc>::MAX_UTC`.
pub fn expires_at_from(issued_at: DateTime<Utc>, expires_in_seconds: i64) -> DateTime<Utc> {
    Duration::try_seconds(expires_in_seconds.max(0))
        .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Midnight UTC of the given day, rendered the way the metrics endpoints expect.
pub fn format_day_start(date: NaiveDate) -> String {
    date.format("%Y-%m-%dT00:00:00Z").to_string()
}
