//! Uptime of the current run of a supervised process

/// Seconds since `start` while the process has not stopped (`stop == 0`), else 0.
///
/// Clock skew between `now` and `start` is passed through, so the result
/// may be negative.
pub fn uptime(start: i64, stop: i64, now: i64) -> i64 {
    if stop == 0 { now - start } else { 0 }
}
