use crate::report::{format_finding, format_progress};
use apiscout_scanner::{ProbeOutcome, ScanConfig, ScanProgress, ScanReport, Scanner, ShutdownListener};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

/// Options for configuring a scan operation
pub struct ScanOptions {
    pub config: ScanConfig,
    pub show_progress_bar: bool,
    pub shutdown: Option<ShutdownListener>,
}

/// Callback for human-readable progress and finding lines
pub type ScanMessageCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Callback for individual API-positive outcomes as they come in
pub type FindingCallback = Arc<dyn Fn(ProbeOutcome) + Send + Sync>;

fn emit(bar: &Option<Arc<ProgressBar>>, callback: &Option<ScanMessageCallback>, msg: String) {
    let Some(callback) = callback else {
        return;
    };
    match bar {
        Some(pb) => pb.suspend(|| callback(msg)),
        None => callback(msg),
    }
}

/// Execute a scan with the given options
/// Returns every API-positive outcome together with the run summary
pub async fn execute_scan(
    options: ScanOptions,
    message_callback: Option<ScanMessageCallback>,
    finding_callback: Option<FindingCallback>,
) -> Result<ScanReport, String> {
    let ScanOptions {
        config,
        show_progress_bar,
        shutdown,
    } = options;

    let total = config.target_count() as u64;

    let progress_bar = if show_progress_bar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| format!("Invalid progress template: {}", e))?
                .progress_chars("=>-"),
        );
        pb.set_message("probing");
        Some(Arc::new(pb))
    } else {
        None
    };

    let bar_clone = progress_bar.clone();
    let messages_clone = message_callback.clone();
    let on_progress = Arc::new(move |progress: ScanProgress| {
        emit(&bar_clone, &messages_clone, format_progress(progress));
    });

    let bar_clone = progress_bar.clone();
    let messages_clone = message_callback.clone();
    let on_result = Arc::new(move |outcome: &ProbeOutcome| {
        emit(&bar_clone, &messages_clone, format_finding(outcome));
        if let Some(ref cb) = finding_callback {
            cb(outcome.clone());
        }
    });

    let mut scanner = Scanner::new(config)
        .map_err(|e| e.to_string())?
        .with_progress_callback(on_progress)
        .with_result_callback(on_result);

    if let Some(ref pb) = progress_bar {
        let pb = pb.clone();
        scanner = scanner.with_completion_callback(Arc::new(move |progress: ScanProgress| {
            pb.set_position(progress.completed as u64)
        }));
    }

    if let Some(listener) = shutdown {
        scanner = scanner.with_shutdown(listener);
    }

    let result = scanner.run().await;

    if let Some(ref pb) = progress_bar {
        match &result {
            Ok(report) => {
                pb.set_position(report.summary.completed as u64);
                let verb = if report.summary.cancelled {
                    "Scan interrupted"
                } else {
                    "Scan complete"
                };
                pb.finish_with_message(format!(
                    "{}! {} APIs found",
                    verb, report.summary.apis_found
                ));
            }
            Err(_) => pb.abandon(),
        }
    }

    result.map_err(|e| format!("Scan failed: {}", e))
}
