// src/pool/mod.rs

//! Indexed store of candidate packages discovered so far
//!
//! Discovery fills the pool from the sync repositories and the AUR; after
//! that the resolution passes only read it. Lookups scan in insertion
//! order so tie-breaks are reproducible; repositories are registered in
//! priority order, so insertion order also encodes repository priority.

use crate::db::LocalDb;
use crate::package::{BinaryPackage, SourcePackage};
use crate::version::DepExpr;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Candidate packages for the current invocation
///
/// Invariant: a name is keyed in at most one of the two maps, at most once.
pub struct DepPool<'db> {
    source: HashMap<String, SourcePackage>,
    source_order: Vec<String>,
    binary: HashMap<String, BinaryPackage>,
    binary_order: Vec<String>,
    targets: Vec<String>,
    local: &'db dyn LocalDb,
}

impl<'db> DepPool<'db> {
    pub fn new(local: &'db dyn LocalDb) -> Self {
        Self {
            source: HashMap::new(),
            source_order: Vec::new(),
            binary: HashMap::new(),
            binary_order: Vec::new(),
            targets: Vec::new(),
            local,
        }
    }

    /// Record a raw target expression as submitted by the user
    pub fn add_target(&mut self, expr: impl Into<String>) {
        self.targets.push(expr.into());
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn local(&self) -> &'db dyn LocalDb {
        self.local
    }

    /// Add a package discovered in the AUR
    ///
    /// A name already present in either map is left untouched.
    pub fn register_source(&mut self, pkg: SourcePackage) {
        if self.has_package(&pkg.name) {
            debug!("{} already pooled, skipping", pkg.name);
            return;
        }
        self.source_order.push(pkg.name.clone());
        self.source.insert(pkg.name.clone(), pkg);
    }

    /// Add a package discovered in a binary repository
    pub fn register_binary(&mut self, pkg: BinaryPackage) {
        if self.has_package(&pkg.name) {
            debug!("{} already pooled, skipping", pkg.name);
            return;
        }
        self.binary_order.push(pkg.name.clone());
        self.binary.insert(pkg.name.clone(), pkg);
    }

    /// Whether `name` is keyed in either map
    ///
    /// Used to decide that a collision with an installed package does not
    /// matter because the install is already replacing it.
    pub fn has_package(&self, name: &str) -> bool {
        self.source.contains_key(name) || self.binary.contains_key(name)
    }

    pub fn source(&self, name: &str) -> Option<&SourcePackage> {
        self.source.get(name)
    }

    pub fn binary(&self, name: &str) -> Option<&BinaryPackage> {
        self.binary.get(name)
    }

    /// Pooled AUR packages in insertion order
    pub fn source_packages(&self) -> impl Iterator<Item = &SourcePackage> {
        self.source_order.iter().filter_map(|name| self.source.get(name))
    }

    /// Pooled repository packages in insertion order
    pub fn binary_packages(&self) -> impl Iterator<Item = &BinaryPackage> {
        self.binary_order.iter().filter_map(|name| self.binary.get(name))
    }

    /// First pooled AUR package satisfying `expr`
    pub fn find_satisfier_source(&self, expr: &DepExpr) -> Option<&SourcePackage> {
        self.source_packages().find(|pkg| pkg.satisfies(expr))
    }

    /// First pooled repository package satisfying `expr`
    pub fn find_satisfier_binary(&self, expr: &DepExpr) -> Option<&BinaryPackage> {
        self.binary_packages().find(|pkg| pkg.satisfies(expr))
    }

    /// All pooled AUR packages satisfying `expr`, ordered by popularity
    /// descending and then name
    pub fn find_providers_source(&self, expr: &DepExpr) -> Vec<&SourcePackage> {
        let mut providers: Vec<&SourcePackage> =
            self.source_packages().filter(|pkg| pkg.satisfies(expr)).collect();
        providers.sort_by(|a, b| {
            b.popularity
                .partial_cmp(&a.popularity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        providers
    }
}
