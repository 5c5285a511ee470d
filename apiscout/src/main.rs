use apiscout::commands::command_argument_builder;
use apiscout::handlers::{handle_paths, handle_scan};
use apiscout_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        // No subcommand provided, just show the banner
        None => {}
        Some(("scan", primary_command)) => {
            let code = handle_scan(primary_command, quiet).await;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Some(("paths", _)) => handle_paths(),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
