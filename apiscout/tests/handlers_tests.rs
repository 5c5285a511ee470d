use apiscout::commands::command_argument_builder;
use apiscout::handlers::*;
use std::io::{Cursor, Write};
use tempfile::{NamedTempFile, TempDir};

fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
    colored::control::set_override(false);
    Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

fn scan_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["apiscout", "scan"];
    argv.extend_from_slice(args);
    let matches = command_argument_builder()
        .try_get_matches_from(argv)
        .unwrap();
    matches.subcommand_matches("scan").unwrap().clone()
}

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn test_load_hosts_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "# in scope")?;
    writeln!(temp_file, "https://api.example.com/v1")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "  example.org:8443  ")?;
    writeln!(temp_file, "not a host!!")?;
    temp_file.flush()?;

    let hosts = load_hosts_from_file(temp_file.path())?;
    assert_eq!(hosts, vec!["api.example.com", "example.org:8443"]);
    Ok(())
}

#[test]
fn test_load_paths_from_file_normalizes() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "api/v9")?;
    writeln!(temp_file, "/internal")?;
    writeln!(temp_file, "# /skipped")?;
    temp_file.flush()?;

    let paths = load_paths_from_file(temp_file.path())?;
    assert_eq!(paths, vec!["/api/v9", "/internal"]);
    Ok(())
}

#[test]
fn test_missing_file_is_empty_not_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.txt");

    assert!(load_entries_from_file(&missing).unwrap().is_empty());
    assert!(load_hosts_from_file(&missing).unwrap().is_empty());
}

#[test]
fn test_unreadable_path_is_error() {
    // A directory can't be read as a file
    let temp_dir = TempDir::new().unwrap();
    assert!(load_entries_from_file(temp_dir.path()).is_err());
}

#[test]
fn test_clean_hosts_skips_invalid() {
    let hosts = clean_hosts(["http://a.example.com/", "", "b.example.com"]);
    assert_eq!(hosts, vec!["a.example.com", "b.example.com"]);
}

// ============================================================================
// Prompt Tests
// ============================================================================

#[test]
fn test_read_entries_stops_at_blank_line() {
    let mut p = prompter("one\ntwo\n\nthree\n");
    assert_eq!(p.read_entries().unwrap(), vec!["one", "two"]);
}

#[test]
fn test_read_entries_stops_at_eof() {
    let mut p = prompter("one\ntwo");
    assert_eq!(p.read_entries().unwrap(), vec!["one", "two"]);
}

#[test]
fn test_ask_eof_aborts() {
    let mut p = prompter("");
    assert!(matches!(p.ask("Choice: "), Err(InputError::Aborted)));
}

#[test]
fn test_ask_parsed_default_and_retry() {
    let mut p = prompter("\n");
    assert_eq!(p.ask_parsed("Threads: ", 5usize).unwrap(), 5);

    let mut p = prompter("lots\n-3\n12\n");
    assert_eq!(p.ask_parsed("Threads: ", 5usize).unwrap(), 12);

    let mut p = prompter("abc\n");
    assert!(matches!(p.ask_parsed("Delay: ", 1.0f64), Err(InputError::Aborted)));
}

#[test]
fn test_ask_yes_no() {
    assert!(prompter("y\n").ask_yes_no("? ", false).unwrap());
    assert!(prompter("YES\n").ask_yes_no("? ", false).unwrap());
    assert!(!prompter("n\n").ask_yes_no("? ", true).unwrap());
    assert!(prompter("\n").ask_yes_no("? ", true).unwrap());
}

// ============================================================================
// Interactive Flow Tests
// ============================================================================

#[test]
fn test_interactive_manual_entry_with_custom_paths() {
    let input = "1\napi.example.com\nhttps://www.example.com/x\n\n8\n0.5\ny\ninternal\n\n";
    let mut p = prompter(input);

    let inputs = collect_interactive_inputs(&mut p, &ScanInputs::default()).unwrap();
    assert_eq!(inputs.hosts, vec!["api.example.com", "www.example.com"]);
    assert_eq!(inputs.workers, 8);
    assert_eq!(inputs.delay_secs, 0.5);
    assert_eq!(inputs.paths, vec!["/internal"]);
}

#[test]
fn test_interactive_defaults() {
    let mut p = prompter("1\nexample.com\n\n\n\nn\n");

    let defaults = ScanInputs::default();
    let inputs = collect_interactive_inputs(&mut p, &defaults).unwrap();
    assert_eq!(inputs.hosts, vec!["example.com"]);
    assert_eq!(inputs.workers, defaults.workers);
    assert_eq!(inputs.delay_secs, defaults.delay_secs);
    assert_eq!(inputs.paths.len(), 34);
}

#[test]
fn test_interactive_custom_paths_empty_falls_back() {
    let mut p = prompter("1\nexample.com\n\n\n\ny\n\n");
    let inputs = collect_interactive_inputs(&mut p, &ScanInputs::default()).unwrap();
    assert_eq!(inputs.paths.len(), 34);
}

#[test]
fn test_interactive_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "a.example.com")?;
    writeln!(temp_file, "b.example.com")?;
    temp_file.flush()?;

    let input = format!("2\n{}\n3\n2\nn\n", temp_file.path().display());
    let mut p = prompter(&input);
    let inputs = collect_interactive_inputs(&mut p, &ScanInputs::default())?;
    assert_eq!(inputs.hosts, vec!["a.example.com", "b.example.com"]);
    assert_eq!(inputs.workers, 3);
    assert_eq!(inputs.delay_secs, 2.0);
    Ok(())
}

#[test]
fn test_interactive_no_hosts() {
    let mut p = prompter("1\n\n");
    assert!(matches!(
        collect_interactive_inputs(&mut p, &ScanInputs::default()),
        Err(InputError::NoTargets)
    ));
}

#[test]
fn test_interactive_eof_mid_config() {
    let mut p = prompter("1\nexample.com\n\n");
    assert!(matches!(
        collect_interactive_inputs(&mut p, &ScanInputs::default()),
        Err(InputError::Aborted)
    ));
}

// ============================================================================
// Flag Handling Tests
// ============================================================================

#[test]
fn test_flags_without_hosts_mean_interactive() {
    let matches = scan_matches(&[]);
    assert_eq!(hosts_from_matches(&matches).unwrap(), None);

    let defaults = defaults_from_matches(&matches).unwrap();
    assert_eq!(defaults, ScanInputs::default());
}

#[test]
fn test_flags_hosts_and_paths() {
    let matches = scan_matches(&[
        "-u", "https://api.example.com/", "-u", "example.org", "-p", "v2", "-t", "7", "-d",
        "0.25", "--timeout", "3",
    ]);

    assert_eq!(
        hosts_from_matches(&matches).unwrap(),
        Some(vec!["api.example.com".to_string(), "example.org".to_string()])
    );
    let inputs = defaults_from_matches(&matches).unwrap();
    assert_eq!(inputs.paths, vec!["/v2"]);
    assert_eq!(inputs.workers, 7);
    assert_eq!(inputs.delay_secs, 0.25);
    assert_eq!(inputs.timeout_secs, 3);
}

#[test]
fn test_flags_host_and_hosts_file_conflict() {
    let result = command_argument_builder().try_get_matches_from([
        "apiscout", "scan", "-u", "a.com", "-H", "hosts.txt",
    ]);
    assert!(result.is_err());
}

// ============================================================================
// Config and Persistence Tests
// ============================================================================

#[test]
fn test_into_config_rejects_negative_delay() {
    let inputs = ScanInputs {
        hosts: vec!["example.com".to_string()],
        delay_secs: -1.0,
        ..ScanInputs::default()
    };
    assert!(inputs.into_config().is_err());
}

#[test]
fn test_into_config_rejects_zero_workers() {
    let inputs = ScanInputs {
        hosts: vec!["example.com".to_string()],
        workers: 0,
        ..ScanInputs::default()
    };
    assert!(inputs.into_config().is_err());
}

#[test]
fn test_into_config_target_count() {
    let inputs = ScanInputs {
        hosts: vec!["a.com".to_string(), "b.com".to_string()],
        ..ScanInputs::default()
    };
    assert_eq!(inputs.into_config().unwrap().target_count(), 68);
}

#[test]
fn test_save_results_nothing_found_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("data/out.txt");

    assert!(save_results(&output, &[]).unwrap().is_none());
    assert!(!output.exists());
}
