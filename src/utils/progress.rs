use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for a fixed-size batch (variants, PDF files).
/// Hidden when `enabled` is false so library callers and tests stay quiet.
pub struct ProgressTracker {
    progress_bar: Option<ProgressBar>,
    job_name: String,
}

impl ProgressTracker {
    pub fn new(total: u64, job_name: &str, enabled: bool) -> Self {
        let progress_bar = enabled.then(|| {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            pb.set_style(style);
            pb
        });
        Self {
            progress_bar,
            job_name: job_name.to_string(),
        }
    }

    pub fn hidden(job_name: &str) -> Self {
        Self::new(0, job_name, false)
    }

    pub fn update_message(&self, message: &str) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("{} [{}]", self.job_name, message));
        }
    }

    pub fn increment(&self, delta: u64) {
        if let Some(pb) = &self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Prints a line above the bar without tearing it.
    pub fn println(&self, line: &str) {
        match &self.progress_bar {
            Some(pb) => pb.println(line),
            None => log::info!("{}", line),
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("Complete [{}]", self.job_name));
            pb.finish();
        }
    }
}
