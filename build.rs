// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("aurum")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Aurum Contributors")
        .about("AUR helper with dependency resolution and conflict checking")
        .subcommand_required(false)
        .subcommand(
            Command::new("resolve")
                .about("Resolve targets against the repositories and the AUR and print the build plan")
                .arg(Arg::new("targets").required(true).num_args(1..).help("Packages or dependency expressions"))
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("PATH")
                        .help("Path to a JSON configuration file"),
                )
                .arg(
                    Arg::new("no_confirm")
                        .long("no-confirm")
                        .action(clap::ArgAction::SetTrue)
                        .help("Never prompt; fail when interaction would be required"),
                )
                .arg(
                    Arg::new("ask")
                        .long("ask")
                        .action(clap::ArgAction::SetTrue)
                        .help("Defer conflict confirmation to the package manager"),
                )
                .arg(
                    Arg::new("bottom_up")
                        .long("bottom-up")
                        .action(clap::ArgAction::SetTrue)
                        .help("Print plans bottom-up"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

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

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("aurum.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
