// src/db/pacman.rs

//! Query the pacman databases through the `pacman` command-line tool
//!
//! The local database is loaded up front with `pacman -Qi` and served from
//! memory; sync-repository lookups go through `pacman -Si` on demand.

use crate::db::InstalledPackage;
use crate::error::{Error, Result};
use crate::package::BinaryPackage;
use std::process::Command;
use tracing::debug;

fn run_pacman(args: &[&str]) -> Result<std::process::Output> {
    Command::new("pacman")
        .args(args)
        .output()
        .map_err(|e| Error::Pacman(format!("failed to run pacman: {}. Is pacman installed?", e)))
}

/// Load every installed package with its dependency metadata
pub fn load_installed() -> Result<Vec<InstalledPackage>> {
    debug!("querying installed packages");

    let output = run_pacman(&["-Qi"])?;
    if !output.status.success() {
        return Err(Error::Pacman(format!(
            "pacman -Qi failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let packages: Vec<InstalledPackage> = parse_info_blocks(&text)
        .into_iter()
        .map(|block| InstalledPackage {
            name: block.field("Name"),
            version: block.field("Version"),
            depends: block.list("Depends On"),
            provides: block.list("Provides"),
            conflicts: block.list("Conflicts With"),
        })
        .collect();

    debug!("loaded {} installed packages", packages.len());
    Ok(packages)
}

/// Look up a package by name in the enabled sync repositories
///
/// Returns `None` when no repository carries the name.
pub fn sync_package(name: &str) -> Result<Option<BinaryPackage>> {
    debug!("querying sync repositories for {}", name);

    let output = run_pacman(&["-Si", name])?;
    if !output.status.success() {
        return Ok(None);
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let pkg = parse_info_blocks(&text).into_iter().next().map(|block| BinaryPackage {
        name: block.field("Name"),
        version: block.field("Version"),
        repository: block.field("Repository"),
        depends: block.list("Depends On"),
        provides: block.list("Provides"),
        conflicts: block.list("Conflicts With"),
        installed_size: parse_size(&block.field("Installed Size")).unwrap_or(0),
    });

    Ok(pkg)
}

/// Check if pacman is available on this system
pub fn is_pacman_available() -> bool {
    Command::new("pacman")
        .args(["--version"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// One `Key : Value` block of pacman -Qi/-Si output
struct InfoBlock {
    fields: Vec<(String, String)>,
}

impl InfoBlock {
    fn field(&self, key: &str) -> String {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    fn list(&self, key: &str) -> Vec<String> {
        parse_list(&self.field(key))
    }
}

/// Split pacman info output into per-package blocks
///
/// Blocks are separated by blank lines. Values wrapped by pacman onto
/// continuation lines (leading whitespace) are folded back into the
/// preceding field.
fn parse_info_blocks(text: &str) -> Vec<InfoBlock> {
    let mut blocks = Vec::new();
    let mut fields: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !fields.is_empty() {
                blocks.push(InfoBlock {
                    fields: std::mem::take(&mut fields),
                });
            }
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            if let Some((_, value)) = fields.last_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            fields.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    if !fields.is_empty() {
        blocks.push(InfoBlock { fields });
    }

    blocks
}

/// Parse a whitespace-separated value list, treating "None" as empty
fn parse_list(value: &str) -> Vec<String> {
    if value == "None" {
        return Vec::new();
    }

    value.split_whitespace().map(|s| s.to_string()).collect()
}

/// Parse pacman size string (e.g., "1.5 MiB") to bytes
fn parse_size(s: &str) -> Option<i64> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != 2 {
        return None;
    }

    let num: f64 = parts[0].parse().ok()?;
    let multiplier = match parts[1] {
        "B" => 1.0,
        "KiB" => 1024.0,
        "MiB" => 1024.0 * 1024.0,
        "GiB" => 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };

    Some((num * multiplier) as i64)
}
