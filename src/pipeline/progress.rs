// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for export runs
// reference: uses indicatif for progress bars and tracks row counts

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct ExportStats {
    pub rows_written: usize,
    pub rows_enriched: usize,
    pub batches: usize,
    pub duration_secs: f64,
}

impl ExportStats {
    pub fn rows_per_second(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        self.rows_written as f64 / self.duration_secs
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    rows_written: AtomicUsize,
    rows_enriched: AtomicUsize,
    batches: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(total_rows: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();

        let main_bar = create_progress_bar(&multi_progress, total_rows as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            rows_written: AtomicUsize::new(0),
            rows_enriched: AtomicUsize::new(0),
            batches: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn inc_rows_written(&self, count: usize) {
        self.rows_written.fetch_add(count, Ordering::SeqCst);
        self.main_bar.inc(count as u64);
        self.update_detail_bar();
    }

    pub fn inc_rows_enriched(&self) {
        self.rows_enriched.fetch_add(1, Ordering::SeqCst);
    }

    pub fn inc_batches(&self) {
        self.batches.fetch_add(1, Ordering::SeqCst);
        self.update_detail_bar();
    }

    pub fn set_message(&self, message: String) {
        self.detail_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Export complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> ExportStats {
        ExportStats {
            rows_written: self.rows_written.load(Ordering::SeqCst),
            rows_enriched: self.rows_enriched.load(Ordering::SeqCst),
            batches: self.batches.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs_f64(),
        }
    }

    fn update_detail_bar(&self) {
        let batches = self.batches.load(Ordering::SeqCst);
        let enriched = self.rows_enriched.load(Ordering::SeqCst);

        let message = format!("Batches: {} | Enriched: {}", batches, enriched);

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({eta}) {msg}"
    } else {
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} rows ({eta}) {msg}"
    };

    match ProgressStyle::default_bar().template(template) {
        Ok(style) => bar.set_style(style.progress_chars(if colored { "█▓▒░" } else { "=>-" })),
        Err(e) => tracing::debug!("Falling back to default progress style: {}", e),
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
