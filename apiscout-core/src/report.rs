// Console rendering of scan plans, progress, findings and summaries

use crate::targets::estimated_minutes;
use apiscout_scanner::{ProbeOutcome, ScanProgress, ScanSummary};
use colored::Colorize;

fn divider() -> String {
    "=".repeat(60)
}

pub fn format_scan_plan(hosts: usize, paths: usize, workers: usize, delay_secs: f64) -> String {
    let targets = hosts * paths;
    let mut plan = String::new();
    plan.push_str(&format!("\n{}\n", "Scan Summary:".bold()));
    plan.push_str(&format!("  • Domains: {}\n", hosts));
    plan.push_str(&format!("  • Paths per domain: {}\n", paths));
    plan.push_str(&format!("  • Total targets: {}\n", targets));
    plan.push_str(&format!("  • Threads: {}\n", workers));
    plan.push_str(&format!("  • Delay: {}s per request\n", delay_secs));
    plan.push_str(&format!(
        "  • Estimated time: ~{:.1} minutes\n",
        estimated_minutes(targets, delay_secs, workers)
    ));
    plan
}

pub fn format_progress(progress: ScanProgress) -> String {
    format!(
        "[*] Progress: {}/{} ({:.1}%)",
        progress.completed,
        progress.total,
        progress.percent()
    )
    .blue()
    .to_string()
}

pub fn format_finding(outcome: &ProbeOutcome) -> String {
    let kind = outcome.kind.map(|k| k.label()).unwrap_or("Unknown");
    let cdn = if outcome.behind_cdn { " [CF]" } else { "" };
    format!("[+] API Found: {} - {}{}", outcome.url, kind, cdn)
        .green()
        .to_string()
}

pub fn format_summary(summary: &ScanSummary) -> String {
    let secs = summary.elapsed.as_secs_f64();
    let heading = if summary.cancelled {
        "  Scan Interrupted!"
    } else {
        "  Scan Complete!"
    };

    let mut report = String::new();
    report.push_str(&format!("\n{}\n", divider().cyan()));
    report.push_str(&format!("{}\n", heading.cyan()));
    report.push_str(&format!("{}\n", divider().cyan()));
    report.push_str(&format!("  • Time: {:.2} seconds ({:.1} minutes)\n", secs, secs / 60.0));
    if summary.cancelled {
        report.push_str(&format!(
            "  • Targets scanned: {} of {}\n",
            summary.completed, summary.total_targets
        ));
    } else {
        report.push_str(&format!("  • Targets scanned: {}\n", summary.total_targets));
    }
    report.push_str(&format!("  • APIs discovered: {}\n", summary.apis_found));
    report.push_str(&format!("  • Cloudflare detected: {}\n", summary.cdn_flagged));
    report.push_str(&format!("{}\n", divider().cyan()));
    report
}

pub fn format_discoveries(outcomes: &[ProbeOutcome]) -> String {
    let mut report = String::new();

    if outcomes.is_empty() {
        report.push_str(&format!("{}\n", "[!] No APIs found. Try:".yellow()));
        report.push_str("  • Check if domains are correct\n");
        report.push_str("  • Try adding more paths\n");
        report.push_str("  • Increase timeout\n");
        report.push_str("  • Check if you're getting blocked (429 errors)\n");
        return report;
    }

    report.push_str(&format!("{}\n", "Discovered APIs:".bold()));
    for outcome in outcomes {
        let kind = outcome.kind.map(|k| k.label()).unwrap_or("Unknown");
        let cdn = if outcome.behind_cdn { " [Cloudflare]" } else { "" };
        report.push_str(&format!(
            "  {} {} - {}{}\n",
            "►".green(),
            outcome.url,
            kind,
            cdn
        ));
    }
    report
}
