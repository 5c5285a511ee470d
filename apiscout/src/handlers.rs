use anyhow::Context;
use apiscout_core::paths::{DEFAULT_PATHS, default_paths, normalize_path, resolve_paths};
use apiscout_core::report::{format_discoveries, format_scan_plan, format_summary};
use apiscout_core::scan::{ScanMessageCallback, ScanOptions, execute_scan};
use apiscout_core::store::{PersistStats, ResultStore};
use apiscout_core::targets::{clean_origin, parse_entries};
use apiscout_scanner::config::{
    DEFAULT_DELAY_SECS, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS, delay_from_secs,
};
use apiscout_scanner::{ProbeOutcome, ScanConfig, shutdown};
use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::io::{self, BufRead, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INTERRUPTED: i32 = 130;
pub const DEFAULT_HOSTS_FILE: &str = "domains.txt";

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input closed before a value was entered")]
    Aborted,

    #[error("No domains provided")]
    NoTargets,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Load(String),
}

/// Everything a scan needs, whether it came from flags or the prompts
#[derive(Debug, Clone, PartialEq)]
pub struct ScanInputs {
    pub hosts: Vec<String>,
    pub paths: Vec<String>,
    pub workers: usize,
    pub delay_secs: f64,
    pub timeout_secs: u64,
}

impl Default for ScanInputs {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            paths: default_paths(),
            workers: DEFAULT_WORKERS,
            delay_secs: DEFAULT_DELAY_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ScanInputs {
    /// Turn the raw inputs into a validated scanner configuration
    pub fn into_config(self) -> Result<ScanConfig, String> {
        let delay = delay_from_secs(self.delay_secs).map_err(|e| e.to_string())?;
        let config = ScanConfig::new(self.hosts, self.paths)
            .with_workers(self.workers)
            .with_delay(delay)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

// Helper functions for loading target lists

pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Read a newline-delimited file, skipping blanks and `#` comments.
/// A missing file is reported and treated as empty.
pub fn load_entries_from_file(path: &Path) -> Result<Vec<String>, String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(parse_entries(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            eprintln!(
                "{}",
                format!("[!] File not found: {}", path.display()).red()
            );
            Ok(Vec::new())
        }
        Err(e) => Err(format!("Failed to read {}: {}", path.display(), e)),
    }
}

/// Clean raw host entries down to `host[:port]`, skipping the ones that don't parse
pub fn clean_hosts<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .filter_map(|entry| {
            let entry = entry.as_ref();
            let cleaned = clean_origin(entry);
            if cleaned.is_none() {
                eprintln!("⚠️  Skipping invalid host '{}'", entry);
            }
            cleaned
        })
        .collect()
}

pub fn load_hosts_from_file(path: &Path) -> Result<Vec<String>, String> {
    Ok(clean_hosts(load_entries_from_file(path)?))
}

pub fn load_paths_from_file(path: &Path) -> Result<Vec<String>, String> {
    Ok(load_entries_from_file(path)?
        .iter()
        .filter_map(|entry| normalize_path(entry))
        .collect())
}

// Interactive prompts

/// Line-oriented prompts over any reader/writer pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a plain line
    pub fn say(&mut self, msg: impl AsRef<str>) -> Result<(), InputError> {
        writeln!(self.output, "{}", msg.as_ref())?;
        Ok(())
    }

    // None on end of input
    fn read_line(&mut self) -> Result<Option<String>, InputError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn ask(&mut self, prompt: &str) -> Result<String, InputError> {
        write!(self.output, "{}", prompt.bright_cyan().bold())?;
        self.output.flush()?;
        self.read_line()?.ok_or(InputError::Aborted)
    }

    pub fn ask_or(&mut self, prompt: &str, default: &str) -> Result<String, InputError> {
        let answer = self.ask(prompt)?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    /// Ask until the answer parses. An empty answer takes the default.
    pub fn ask_parsed<T: FromStr>(&mut self, prompt: &str, default: T) -> Result<T, InputError> {
        loop {
            let answer = self.ask(prompt)?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(_) => self.say(format!("[!] Invalid value '{}', try again", answer))?,
            }
        }
    }

    pub fn ask_yes_no(&mut self, prompt: &str, default: bool) -> Result<bool, InputError> {
        let answer = self.ask(prompt)?.to_lowercase();
        Ok(match answer.as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }

    /// Collect entries until an empty line or end of input
    pub fn read_entries(&mut self) -> Result<Vec<String>, InputError> {
        let mut entries = Vec::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            match self.read_line()? {
                Some(line) if !line.is_empty() => entries.push(line),
                _ => break,
            }
        }
        Ok(entries)
    }
}

/// Walk the user through target, worker, delay and path selection
pub fn collect_interactive_inputs<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    defaults: &ScanInputs,
) -> Result<ScanInputs, InputError> {
    prompter.say(format!("\n{}", "How do you want to provide targets?".yellow()))?;
    prompter.say("  1. Enter domains manually")?;
    prompter.say(format!("  2. Load from file ({})", DEFAULT_HOSTS_FILE))?;

    let choice = prompter.ask("Choice (1/2): ")?;

    let hosts = if choice == "2" {
        let file = prompter.ask_or(
            &format!("File path (default: {}): ", DEFAULT_HOSTS_FILE),
            DEFAULT_HOSTS_FILE,
        )?;
        load_hosts_from_file(&expand_path(&file)).map_err(InputError::Load)?
    } else {
        prompter.say("\nEnter target domains (one per line, empty line to finish):")?;
        prompter.say("Example: api.example.com")?;
        clean_hosts(prompter.read_entries()?)
    };

    if hosts.is_empty() {
        return Err(InputError::NoTargets);
    }

    prompter.say(format!("\n{}", "Scan Configuration:".yellow()))?;
    let workers = prompter.ask_parsed(
        &format!(
            "Number of threads (default: {}, 5-10 recommended): ",
            defaults.workers
        ),
        defaults.workers,
    )?;
    let delay_secs = prompter.ask_parsed(
        &format!(
            "Delay between requests in seconds (default: {}, 0.5-2 recommended): ",
            defaults.delay_secs
        ),
        defaults.delay_secs,
    )?;

    let paths = if prompter.ask_yes_no("Use custom paths? (y/n, default: n): ", false)? {
        prompter.say("Enter custom paths (one per line, empty line to finish):")?;
        resolve_paths(&prompter.read_entries()?)
    } else {
        defaults.paths.clone()
    };

    Ok(ScanInputs {
        hosts,
        paths,
        workers,
        delay_secs,
        timeout_secs: defaults.timeout_secs,
    })
}

/// Inputs taken from flags alone. Hosts are left empty.
pub fn defaults_from_matches(sub_matches: &ArgMatches) -> Result<ScanInputs, String> {
    let mut inputs = ScanInputs::default();

    if let Some(file) = sub_matches.get_one::<String>("paths-file") {
        inputs.paths = resolve_paths(&load_paths_from_file(&expand_path(file))?);
    } else if let Some(paths) = sub_matches.get_many::<String>("path") {
        let custom: Vec<String> = paths.cloned().collect();
        inputs.paths = resolve_paths(&custom);
    }

    if let Some(workers) = sub_matches.get_one::<usize>("threads") {
        inputs.workers = *workers;
    }
    if let Some(delay) = sub_matches.get_one::<f64>("delay") {
        inputs.delay_secs = *delay;
    }
    if let Some(timeout) = sub_matches.get_one::<u64>("timeout") {
        inputs.timeout_secs = *timeout;
    }

    Ok(inputs)
}

/// Hosts from `--host` or `--hosts-file`. None means the user gave neither.
pub fn hosts_from_matches(sub_matches: &ArgMatches) -> Result<Option<Vec<String>>, String> {
    if let Some(file) = sub_matches.get_one::<String>("hosts-file") {
        return load_hosts_from_file(&expand_path(file)).map(Some);
    }
    Ok(sub_matches
        .get_many::<String>("host")
        .map(clean_hosts))
}

/// Append API-positive outcomes to the text report and merge them into the JSON companion
pub fn save_results(
    output: &Path,
    outcomes: &[ProbeOutcome],
) -> anyhow::Result<Option<(ResultStore, PersistStats)>> {
    if !outcomes.iter().any(|o| o.is_api) {
        return Ok(None);
    }
    let store = ResultStore::new(output);
    let stats = store.persist(outcomes).with_context(|| {
        format!(
            "Failed to save results to {} and {}",
            store.text_path().display(),
            store.json_path().display()
        )
    })?;
    Ok(Some((store, stats)))
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub async fn handle_scan(sub_matches: &ArgMatches, quiet: bool) -> i32 {
    init_tracing();

    let output = expand_path(
        sub_matches
            .get_one::<String>("output")
            .map(String::as_str)
            .unwrap_or(apiscout_core::store::DEFAULT_TEXT_OUTPUT),
    );
    let show_progress_bar = !sub_matches.get_flag("no-progress");

    if !quiet {
        println!(
            "{}",
            "[!] Only scan targets you are authorized to test!"
                .yellow()
                .bold()
        );
    }

    let defaults = match defaults_from_matches(sub_matches) {
        Ok(defaults) => defaults,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return EXIT_FAILURE;
        }
    };

    let inputs = match hosts_from_matches(sub_matches) {
        Ok(Some(hosts)) => ScanInputs { hosts, ..defaults },
        Ok(None) => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            match collect_interactive_inputs(&mut prompter, &defaults) {
                Ok(inputs) => inputs,
                Err(InputError::Aborted) => {
                    eprintln!("\n{}", "[!] Input closed, exiting".red());
                    return EXIT_FAILURE;
                }
                Err(e) => {
                    eprintln!("{}", format!("[!] {}. Exiting.", e).red());
                    return EXIT_FAILURE;
                }
            }
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return EXIT_FAILURE;
        }
    };

    if inputs.hosts.is_empty() {
        eprintln!("{}", "[!] No domains loaded. Exiting.".red());
        return EXIT_FAILURE;
    }

    let (hosts, paths, workers, delay_secs) = (
        inputs.hosts.len(),
        inputs.paths.len(),
        inputs.workers,
        inputs.delay_secs,
    );
    let config = match inputs.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return EXIT_FAILURE;
        }
    };

    if !quiet {
        print!("{}", format_scan_plan(hosts, paths, workers, delay_secs));
        println!("\n{}\n", "Starting scan... (This may take a while)".yellow());
    }
    info!(hosts, paths, workers, "Starting scan");

    let (trigger, listener) = shutdown::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, stopping workers");
            trigger.trigger();
        }
    });

    let message_callback: ScanMessageCallback = Arc::new(|msg: String| println!("{}", msg));
    let options = ScanOptions {
        config,
        show_progress_bar,
        shutdown: Some(listener),
    };

    let report = match execute_scan(options, Some(message_callback), None).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return EXIT_FAILURE;
        }
    };

    if report.summary.cancelled {
        println!(
            "\n{}",
            "[!] Scan interrupted by user, saving partial results".yellow()
        );
    }

    match save_results(&output, &report.outcomes) {
        Ok(Some((store, stats))) => println!(
            "\n{} Results saved to {} and {} ({} total entries)",
            "[+]".green(),
            store.text_path().display(),
            store.json_path().display(),
            stats.total_entries
        ),
        Ok(None) => {}
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            return EXIT_FAILURE;
        }
    }

    print!("{}", format_summary(&report.summary));
    print!("{}", format_discoveries(&report.outcomes));

    if report.summary.cancelled {
        EXIT_INTERRUPTED
    } else {
        0
    }
}

pub fn handle_paths() {
    println!("{}", "Built-in API paths:".bright_white().bold());
    for path in DEFAULT_PATHS {
        println!("  {}", path);
    }
    println!("\n{} paths", DEFAULT_PATHS.len());
}
