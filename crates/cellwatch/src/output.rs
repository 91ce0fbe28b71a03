//! Status-line rendering for the reporting loop.

use owo_colors::OwoColorize;

use cellwatch_core::model::metrics::SIGNAL_ABSENT;
use cellwatch_core::{CycleReport, SubmissionStatus};

/// One line per cycle: signal summary plus submission status.
pub fn status_line(report: &CycleReport) -> String {
    let m = &report.metrics;

    let lte = if m.signal_strength_4g == SIGNAL_ABSENT {
        "4G --".dimmed().to_string()
    } else {
        format!("4G {} dBm", m.signal_strength_4g)
    };
    let nr = if m.signal_strength_5g == SIGNAL_ABSENT {
        "5G --".dimmed().to_string()
    } else {
        format!("5G {} dBm", m.signal_strength_5g)
    };

    let submission = match report.submission {
        SubmissionStatus::Sent => "sent".green().to_string(),
        SubmissionStatus::Failed => "failed".red().to_string(),
        SubmissionStatus::Skipped => "offline".yellow().to_string(),
    };

    format!(
        "cycle {:>4}  {}  {}  [{}]  {}",
        report.cycle, lte, nr, m.network_type, submission
    )
}
