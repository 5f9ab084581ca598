use chrono::Utc;

/// Append the current Unix time (with microseconds) to `prefix`, so that
/// accounts registered by consecutive runs never collide.
pub fn unique_username(prefix: &str) -> String {
    let now = Utc::now();
    format!(
        "{}{}.{:06}",
        prefix,
        now.timestamp(),
        now.timestamp_subsec_micros()
    )
}
