// src/resolver/order.rs

//! Build-order serialisation
//!
//! Linearises the resolved set into a topological order (dependencies
//! before dependents) and partitions it into runtime and make-time
//! buckets. A package is runtime when it is reachable from a target
//! through runtime edges alone; make- and check-dependency edges taint
//! everything below them as make-time.

use crate::config::{Config, SortMode};
use crate::package::{BinaryPackage, PackageBase, SourcePackage};
use crate::pool::DepPool;
use crate::version::DepExpr;
use std::collections::HashSet;

/// The serialised install plan
#[derive(Debug, Clone, Default)]
pub struct DepOrder {
    /// Chosen repository packages, dependencies first
    pub repo: Vec<BinaryPackage>,
    /// Chosen AUR package-bases, dependencies first
    pub bases: Vec<PackageBase>,
    /// Names reachable from the targets via runtime edges only
    pub runtime: HashSet<String>,
}

impl DepOrder {
    /// Serialise the pool into install order starting from its targets
    ///
    /// Each package is ordered exactly once; the classification from its
    /// first visit wins.
    pub fn compute(pool: &DepPool) -> DepOrder {
        let mut order = DepOrder::default();
        let mut seen = HashSet::new();

        for target in pool.targets() {
            let expr = DepExpr::parse(target);
            if let Some(pkg) = pool.find_satisfier_source(&expr) {
                order.visit_source(pool, pkg, true, &mut seen);
            } else if let Some(pkg) = pool.find_satisfier_binary(&expr) {
                order.visit_binary(pool, pkg, true, &mut seen);
            }
        }

        order
    }

    fn visit_source(
        &mut self,
        pool: &DepPool,
        pkg: &SourcePackage,
        runtime: bool,
        seen: &mut HashSet<String>,
    ) {
        if !seen.insert(pkg.name.clone()) {
            return;
        }
        if runtime {
            self.runtime.insert(pkg.name.clone());
        }

        let groups = [
            (&pkg.depends, true),
            (&pkg.make_depends, false),
            (&pkg.check_depends, false),
        ];
        for (deps, runtime_edge) in groups {
            for dep in deps {
                let expr = DepExpr::parse(dep);
                if let Some(child) = pool.find_satisfier_source(&expr) {
                    self.visit_source(pool, child, runtime && runtime_edge, seen);
                } else if let Some(child) = pool.find_satisfier_binary(&expr) {
                    self.visit_binary(pool, child, runtime && runtime_edge, seen);
                }
            }
        }

        self.push_source(pkg.clone());
    }

    fn visit_binary(
        &mut self,
        pool: &DepPool,
        pkg: &BinaryPackage,
        runtime: bool,
        seen: &mut HashSet<String>,
    ) {
        if !seen.insert(pkg.name.clone()) {
            return;
        }
        if runtime {
            self.runtime.insert(pkg.name.clone());
        }

        for dep in &pkg.depends {
            let expr = DepExpr::parse(dep);
            if let Some(child) = pool.find_satisfier_binary(&expr) {
                self.visit_binary(pool, child, runtime, seen);
            }
        }

        self.repo.push(pkg.clone());
    }

    /// Append a source package, grouping it under its package-base
    fn push_source(&mut self, pkg: SourcePackage) {
        if let Some(base) = self
            .bases
            .iter_mut()
            .find(|base| base.pkgbase() == pkg.package_base)
        {
            base.push(pkg);
        } else {
            self.bases.push(PackageBase::new(pkg));
        }
    }

    /// Write the four-bucket plan to stdout
    ///
    /// Empty buckets are suppressed. A split package-base straddling both
    /// buckets lists only the member names belonging to each.
    pub fn print(&self, config: &Config) {
        let mut repo = Vec::new();
        let mut repo_make = Vec::new();
        for pkg in &self.repo {
            let entry = format!("{}-{}", pkg.name, pkg.version);
            if self.runtime.contains(&pkg.name) {
                repo.push((entry, 1));
            } else {
                repo_make.push((entry, 1));
            }
        }

        let mut aur = Vec::new();
        let mut aur_make = Vec::new();
        for base in &self.bases {
            let label = format!("{}-{}", base.pkgbase(), base.version());

            if base.is_split() {
                let (rt, mk): (Vec<&SourcePackage>, Vec<&SourcePackage>) = base
                    .packages()
                    .iter()
                    .partition(|pkg| self.runtime.contains(&pkg.name));

                if !rt.is_empty() {
                    aur.push((format!("{} ({})", label, join_names(&rt)), rt.len()));
                }
                if !mk.is_empty() {
                    aur_make.push((format!("{} ({})", label, join_names(&mk)), mk.len()));
                }
            } else if self.runtime.contains(&base.packages()[0].name) {
                aur.push((label, 1));
            } else {
                aur_make.push((label, 1));
            }
        }

        if config.sort_mode == SortMode::BottomUp {
            repo.reverse();
            repo_make.reverse();
            aur.reverse();
            aur_make.reverse();
        }

        print_bucket("Repo", &repo);
        print_bucket("Repo Make", &repo_make);
        print_bucket("Aur", &aur);
        print_bucket("Aur Make", &aur_make);
    }
}

fn join_names(packages: &[&SourcePackage]) -> String {
    let names: Vec<&str> = packages.iter().map(|pkg| pkg.name.as_str()).collect();
    names.join(" ")
}

fn print_bucket(name: &str, entries: &[(String, usize)]) {
    let count: usize = entries.iter().map(|(_, n)| n).sum();
    if count < 1 {
        return;
    }

    let mut line = format!("[{}: {}]", name, count);
    for (entry, _) in entries {
        line.push_str("  ");
        line.push_str(entry);
    }
    println!("{}", line);
}
