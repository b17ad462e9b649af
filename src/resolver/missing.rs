// src/resolver/missing.rs

//! Missing-dependency detection
//!
//! A depth-first walk from the targets through the pool and the local
//! database, recording every unsatisfiable leaf together with the chain
//! of packages that pulled it in.

use crate::db::LocalDb;
use crate::error::{Error, Result};
use crate::pool::DepPool;
use crate::version::DepExpr;
use std::collections::{HashMap, HashSet};

/// Outcome of a missing-dependency walk
///
/// `good` caches expressions already proved satisfiable. `missing` maps an
/// unsatisfiable expression to the ancestor chains that reached it, each
/// chain ending at a target. An expression never appears in both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingReport {
    pub good: HashSet<String>,
    pub missing: HashMap<String, Vec<Vec<String>>>,
}

impl MissingReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

impl DepPool<'_> {
    /// Verify that every transitive dependency of the targets is
    /// satisfiable
    ///
    /// On failure the full report is printed (every missing leaf with
    /// every distinct chain, not just the first) and returned inside
    /// [`Error::MissingDependencies`].
    pub fn check_missing(&self) -> Result<()> {
        let mut report = MissingReport::default();
        self.check_missing_into(&mut report);

        if report.is_complete() {
            return Ok(());
        }

        println!("error: Could not find all required packages:");
        let mut leaves: Vec<(&String, &Vec<Vec<String>>)> = report.missing.iter().collect();
        leaves.sort_by(|a, b| a.0.cmp(b.0));
        for (dep, chains) in leaves {
            for chain in chains {
                if chain.is_empty() {
                    println!("    {} (Target)", dep);
                } else {
                    println!("    {} (Wanted by: {})", dep, chain.join(" -> "));
                }
            }
        }

        Err(Error::MissingDependencies { report })
    }

    /// Run the walk, reusing any expressions `report` already proved
    ///
    /// Passing a report from a previous walk over an unchanged pool makes
    /// the whole pass a cache lookup.
    pub fn check_missing_into(&self, report: &mut MissingReport) {
        for target in self.targets() {
            self.walk_missing(target, &[], report);
        }
    }

    fn walk_missing(&self, dep: &str, stack: &[String], report: &mut MissingReport) {
        if report.good.contains(dep) {
            return;
        }

        if let Some(chains) = report.missing.get_mut(dep) {
            // same leaf, new reason: keep one record per distinct chain
            if !chains.iter().any(|chain| chain == stack) {
                chains.push(stack.to_vec());
            }
            return;
        }

        let expr = DepExpr::parse(dep);

        if let Some(pkg) = self.find_satisfier_source(&expr) {
            report.good.insert(dep.to_string());

            let mut child_stack = stack.to_vec();
            child_stack.push(pkg.name.clone());

            for child in pkg.all_depends() {
                if self.local().find_satisfier(&DepExpr::parse(child)).is_some() {
                    report.good.insert(child.clone());
                    continue;
                }
                self.walk_missing(child, &child_stack, report);
            }
            return;
        }

        if let Some(pkg) = self.find_satisfier_binary(&expr) {
            report.good.insert(dep.to_string());

            let mut child_stack = stack.to_vec();
            child_stack.push(pkg.name.clone());

            // make/check deps of a prebuilt package are irrelevant
            for child in &pkg.depends {
                if self.local().find_satisfier(&DepExpr::parse(child)).is_some() {
                    report.good.insert(child.clone());
                    continue;
                }
                self.walk_missing(child, &child_stack, report);
            }
            return;
        }

        // a target may be satisfied by an installed package alone
        if self.local().find_satisfier(&expr).is_some() {
            report.good.insert(dep.to_string());
            return;
        }

        report.missing.insert(dep.to_string(), vec![stack.to_vec()]);
    }
}
