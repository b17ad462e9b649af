// src/resolver/conflict.rs

//! Conflict detection across the chosen set and the installed system
//!
//! Three conflict classes are computed: inner (between chosen packages),
//! forward (a chosen package displaces an installed one), and reverse (an
//! installed package declares a conflict a chosen one satisfies). Forward
//! and reverse land in one map, inner in another; the two maps are filled
//! by two concurrent tasks and merged once both have finished.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::package::Pkg;
use crate::pool::DepPool;
use crate::version::DepExpr;
use std::collections::{BTreeMap, BTreeSet};
use std::thread;
use tracing::debug;

/// Package name to the set of packages installing it will displace
///
/// Ordered containers keep merging and printing deterministic.
pub type ConflictMap = BTreeMap<String, BTreeSet<String>>;

fn add_conflict(conflicts: &mut ConflictMap, name: &str, pkg: String) {
    conflicts.entry(name.to_string()).or_default().insert(pkg);
}

/// Spell out why a package collides when its name alone would not show it
fn annotate(name: &str, conflict: &str) -> String {
    if name == conflict {
        name.to_string()
    } else {
        format!("{} ({})", name, conflict)
    }
}

impl DepPool<'_> {
    fn chosen_packages(&self) -> impl Iterator<Item = Pkg<'_>> {
        self.source_packages()
            .map(Pkg::Source)
            .chain(self.binary_packages().map(Pkg::Binary))
    }

    fn check_inner_conflict(&self, name: &str, conflict: &str, conflicts: &mut ConflictMap) {
        let expr = DepExpr::parse(conflict);

        for pkg in self.chosen_packages() {
            if pkg.name() == name {
                continue;
            }
            if pkg.satisfies(&expr) {
                add_conflict(conflicts, name, pkg.name().to_string());
            }
        }
    }

    fn check_inner_conflicts(&self) -> ConflictMap {
        let mut conflicts = ConflictMap::new();

        for pkg in self.chosen_packages() {
            for conflict in pkg.conflicts() {
                self.check_inner_conflict(pkg.name(), conflict, &mut conflicts);
            }
        }

        conflicts
    }

    fn check_forward_conflict(&self, name: &str, conflict: &str, conflicts: &mut ConflictMap) {
        let expr = DepExpr::parse(conflict);

        for installed in self.local().packages() {
            if installed.name == name || self.has_package(&installed.name) {
                continue;
            }
            if installed.satisfies(&expr) {
                add_conflict(conflicts, name, annotate(&installed.name, conflict));
            }
        }
    }

    fn check_forward_conflicts(&self, conflicts: &mut ConflictMap) {
        for pkg in self.chosen_packages() {
            for conflict in pkg.conflicts() {
                self.check_forward_conflict(pkg.name(), conflict, conflicts);
            }
        }
    }

    fn check_reverse_conflict(&self, installed: &str, conflict: &str, conflicts: &mut ConflictMap) {
        let expr = DepExpr::parse(conflict);

        for pkg in self.chosen_packages() {
            if pkg.name() == installed {
                continue;
            }
            if pkg.satisfies(&expr) {
                add_conflict(conflicts, installed, annotate(pkg.name(), conflict));
            }
        }
    }

    fn check_reverse_conflicts(&self, conflicts: &mut ConflictMap) {
        for installed in self.local().packages() {
            if self.has_package(&installed.name) {
                continue;
            }
            for conflict in &installed.conflicts {
                self.check_reverse_conflict(&installed.name, conflict, conflicts);
            }
        }
    }

    /// Detect every conflict installing the chosen set would cause
    ///
    /// Returns the merged flat map of package names needing confirmation.
    /// With conflicts present and neither interaction nor the ask flag
    /// available, fails with [`Error::ConflictsRequireInteraction`].
    pub fn check_conflicts(&self, config: &Config) -> Result<ConflictMap> {
        debug!("checking for conflicts");

        // The two tasks write to disjoint maps, so no locking is needed;
        // the scope joins both before the merge reads them.
        let (mut conflicts, inner) = thread::scope(|scope| {
            let outer_task = scope.spawn(|| {
                let mut outer = ConflictMap::new();
                self.check_forward_conflicts(&mut outer);
                self.check_reverse_conflicts(&mut outer);
                outer
            });
            let inner_task = scope.spawn(|| self.check_inner_conflicts());

            (
                outer_task.join().expect("conflict task panicked"),
                inner_task.join().expect("inner conflict task panicked"),
            )
        });

        if !inner.is_empty() {
            println!();
            println!("Inner conflicts found:");
            for (name, pkgs) in &inner {
                let list: Vec<&str> = pkgs.iter().map(String::as_str).collect();
                println!("    {}: {}", name, list.join(", "));
            }
        }

        if !conflicts.is_empty() {
            println!();
            println!("Package conflicts found:");
            for (name, pkgs) in &conflicts {
                let list: Vec<&str> = pkgs.iter().map(String::as_str).collect();
                println!("    Installing {} will remove: {}", name, list.join(", "));
            }
        }

        // Flatten the inner map into the result: install logic downstream
        // only needs the set of names to confirm, not who displaces whom.
        for (name, pkgs) in inner {
            conflicts.insert(name, BTreeSet::new());
            for pkg in pkgs {
                conflicts.insert(pkg, BTreeSet::new());
            }
        }

        if !conflicts.is_empty() && !config.use_ask {
            if config.no_confirm {
                return Err(Error::ConflictsRequireInteraction);
            }

            eprintln!();
            eprintln!("Conflicting packages will have to be confirmed manually");
            eprintln!();
        }

        Ok(conflicts)
    }
}
