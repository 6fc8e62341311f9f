use crate::utils::config::{csv_header_line, SCHEMA_VERSION};

/// Display the CSV column header
pub fn display_header() {
    println!("{}", csv_header_line());
}

/// Display version information
pub fn display_version() {
    println!("Alloc Inspector v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Stack vs heap allocation statistics for native executables.");
}
