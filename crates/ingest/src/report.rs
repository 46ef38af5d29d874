use chrono::{DateTime, Local, TimeDelta};

/// Summary of one run, owned by the orchestrator.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    /// Images uploaded and recorded during this run.
    pub uploaded: usize,
    /// Hits that were already recorded.
    pub skipped: usize,
    /// Categories whose search came back empty.
    pub empty_categories: usize,
    /// One entry per failed category, in processing order.
    pub errors: Vec<String>,
}

impl RunReport {
    pub fn new(started_at: DateTime<Local>) -> Self {
        Self {
            started_at,
            finished_at: None,
            uploaded: 0,
            skipped: 0,
            empty_categories: 0,
            errors: Vec::new(),
        }
    }

    pub fn record_error(&mut self, category: &str, error: &dyn std::fmt::Display) {
        self.errors.push(format!("Error with {category}: {error}"));
    }

    pub fn finish(&mut self, at: DateTime<Local>) {
        self.finished_at = Some(at);
    }

    pub fn duration(&self) -> TimeDelta {
        self.finished_at
            .map(|end| end - self.started_at)
            .unwrap_or_else(TimeDelta::zero)
    }
}

/// `H:MM:SS`, whole seconds only; negative spans render as zero.
pub fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_seconds().max(0);
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
