pub mod dashboard;
pub mod quiz;
pub mod topic_detail;
pub mod topics;

// Ten-cell bar for a 0-100 percentage
pub(crate) fn progress_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 10.0).round()) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_bounds() {
        assert_eq!(progress_bar(0.0), "░░░░░░░░░░");
        assert_eq!(progress_bar(100.0), "██████████");
        assert_eq!(progress_bar(250.0), "██████████");
    }

    #[test]
    fn progress_bar_rounds() {
        assert_eq!(progress_bar(33.3), "███░░░░░░░");
    }
}
