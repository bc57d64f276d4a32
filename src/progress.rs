use crate::summary::RunSummary;
use chrono::{DateTime, Local};

/// One formatted status line for the batch loop:
///
/// `[<completed>/<total> <pct>% <elapsed>/<estimated>] success rate: <r>% average score: <s>`
///
/// The completed count is zero-padded to the width of the total; the
/// estimate is elapsed time divided by the completed fraction, zero
/// until the first call lands.
pub fn status_line(summary: &RunSummary, planned: u64, now: DateTime<Local>) -> String {
    let completed = summary.completed();
    let width = planned.to_string().len();

    let elapsed = (now - summary.start_at).num_milliseconds().max(0) as f64 / 1000.0;
    let completed_rate = if planned == 0 {
        0.0
    } else {
        completed as f64 / planned as f64 * 100.0
    };
    let estimated = if completed == 0 {
        0.0
    } else {
        elapsed / completed as f64 * planned as f64
    };
    let success_rate = if completed == 0 {
        0.0
    } else {
        summary.success_count as f64 / completed as f64 * 100.0
    };
    let average_score = if summary.success_count == 0 {
        0.0
    } else {
        summary.success_total_score / summary.success_count as f64
    };

    format!(
        "[{completed:0width$}/{planned} {completed_rate:.2}% {}/{}] success rate: {success_rate:.1}% average score: {average_score:.2}",
        hms(elapsed),
        hms(estimated),
    )
}

/// Red single-line diagnostic shown to the operator on a failed call.
pub fn error_line(message: &str) -> String {
    format!("\x1b[31m{message}\x1b[39m")
}

fn hms(total_seconds: f64) -> String {
    let s = total_seconds.max(0.0);
    let hours = (s / 3600.0).floor() as u64;
    let minutes = ((s % 3600.0) / 60.0).floor() as u64;
    let seconds = (s % 60.0).floor() as u64;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
