// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("debprune")
        .version(env!("CARGO_PKG_VERSION"))
        .author("debprune Contributors")
        .about("Delete all but the newest versions of each package in a directory of .deb archives")
        .allow_negative_numbers(true)
        .arg(
            Arg::new("directory")
                .required(true)
                .help("Directory containing the .deb archives"),
        )
        .arg(
            Arg::new("keep")
                .required(true)
                .help("Number of newest versions to keep per package (0 deletes everything)"),
        )
        .arg(
            Arg::new("dry_run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Show what would be deleted without deleting anything"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Report format"),
        )
        .arg(
            Arg::new("reader")
                .long("reader")
                .value_parser(["native", "dpkg-deb"])
                .default_value("native")
                .help("How package name and version are read from each archive"),
        )
        .arg(
            Arg::new("compare_with")
                .long("compare-with")
                .value_parser(["native", "dpkg"])
                .default_value("native")
                .help("How versions are compared"),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of archives to read in parallel (default: one per CPU)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log debug output to stderr"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("debprune.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
