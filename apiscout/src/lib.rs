pub mod commands;

// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    ScanInputs, clean_hosts, collect_interactive_inputs, load_entries_from_file,
    load_hosts_from_file, load_paths_from_file,
};
