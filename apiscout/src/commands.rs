use apiscout_core::store::DEFAULT_TEXT_OUTPUT;
use clap::{arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("apiscout")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("apiscout")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("scan")
                .about(
                    "Probe hosts across candidate paths and report which ones expose an API. \
                Prompts interactively when no hosts are given.",
                )
                .arg(
                    arg!(-u --"host" <HOST>)
                        .required(false)
                        .help("A host to scan (repeatable). Scheme and path are stripped.")
                        .action(clap::ArgAction::Append)
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of hosts ('#' lines are ignored)")
                        .conflicts_with("host"),
                )
                .arg(
                    arg!(-p --"path" <PATH>)
                        .required(false)
                        .help("A path to probe on every host (repeatable). Replaces the built-in catalog.")
                        .action(clap::ArgAction::Append)
                        .conflicts_with("paths-file"),
                )
                .arg(
                    arg!(-w --"paths-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of paths. Replaces the built-in catalog.")
                        .conflicts_with("path"),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async worker 'threads' in the worker pool.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5"),
                )
                .arg(
                    arg!(-d --"delay" <SECONDS>)
                        .required(false)
                        .help("Delay before each probe, in seconds")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("1.0"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Text report to append to. A merged .json file is written next to it.")
                        .default_value(DEFAULT_TEXT_OUTPUT),
                )
                .arg(
                    arg!(--"no-progress")
                        .required(false)
                        .help("Disable the progress bar")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(command!("paths").about("Print the built-in catalog of API paths"))
}
