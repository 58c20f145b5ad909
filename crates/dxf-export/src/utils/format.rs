use std::time::Duration;

/// Format a run time for humans: `42 seconds`, `3min 5sec`, `2hrs 0min 7sec`
pub fn readable_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{hours}hrs {minutes}min {seconds}sec")
    } else if minutes > 0 {
        format!("{minutes}min {seconds}sec")
    } else {
        format!("{seconds} seconds")
    }
}
