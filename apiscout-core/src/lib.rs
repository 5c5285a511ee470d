pub mod paths;
pub mod report;
pub mod scan;
pub mod store;
pub mod targets;

use colored::Colorize;

pub fn print_banner() {
    let rule = "v".repeat(60);
    println!();
    println!("{}", rule.cyan());
    println!("{}", "  apiscout - API Discovery Scanner".cyan().bold());
    println!(
        "{}",
        format!("  v{}", env!("CARGO_PKG_VERSION")).cyan()
    );
    println!("{}", rule.cyan());
    println!();
}
