//! Build script for avrio-demo
//!
//! Checks that the embedded demo.toml is valid TOML, so a broken default
//! config fails the build instead of the first run.

use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=demo.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let path = Path::new("demo.toml");
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => panic!("cannot read {}: {}", path.display(), e),
    };

    let table: toml::Table = match content.parse() {
        Ok(table) => table,
        Err(e) => panic!("demo.toml is not valid TOML:\n{}", e),
    };

    for section in ["scheduler", "jobs"] {
        if !table.contains_key(section) {
            panic!("demo.toml is missing the [{}] section", section);
        }
    }
}
