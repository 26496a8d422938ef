//! Utility functions: input validation, sanitization, uptime, shutdown.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::info;

/// Characters stripped by [`sanitize_string`].
const DENYLIST: [char; 5] = ['<', '>', '&', '"', '\''];

/// Current UTC time as an ISO-8601 string with microsecond precision.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Check whether a payload is acceptable.
///
/// Only `null` and the empty object are rejected. Empty strings, empty
/// arrays, `false` and `0` are all accepted.
pub fn validate_input(data: &Value) -> bool {
    match data {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Strip `< > & " '` from a string value and trim surrounding whitespace.
///
/// Non-string values yield an empty string. This is a denylist filter, not
/// HTML escaping.
pub fn sanitize_string(input: &Value) -> String {
    match input {
        Value::String(s) => sanitize_str(s),
        _ => String::new(),
    }
}

/// [`sanitize_string`] for text already known to be a string.
pub fn sanitize_str(input: &str) -> String {
    input
        .chars()
        .filter(|c| !DENYLIST.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Render the time elapsed since `start_time` as `{d}d {h}h {m}m {s}s`.
pub fn calculate_uptime(start_time: DateTime<Utc>) -> String {
    format_uptime(Utc::now() - start_time)
}

/// Render a duration as `{d}d {h}h {m}m {s}s` using truncating division.
pub fn format_uptime(elapsed: chrono::Duration) -> String {
    let total = elapsed.num_seconds();
    let days = total / 86_400;
    let remainder = total % 86_400;
    let hours = remainder / 3_600;
    let minutes = (remainder % 3_600) / 60;
    let seconds = remainder % 60;

    format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
}

/// Resolve when the process receives Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
