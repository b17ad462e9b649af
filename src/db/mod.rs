// src/db/mod.rs

//! Read-only view of the installed-package database
//!
//! The resolution core never mutates the local database; it only needs to
//! iterate installed packages and resolve "find a satisfier for E" against
//! them. [`LocalDb`] is that narrow interface. [`MemoryDb`] is the plain
//! in-memory implementation, fed either from fixtures or from
//! [`pacman::load_installed`].

pub mod pacman;

use crate::version::{provider_satisfies, DepExpr};

/// An installed package as reported by the local database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
    pub depends: Vec<String>,
    pub provides: Vec<String>,
    pub conflicts: Vec<String>,
}

impl InstalledPackage {
    /// Whether this package (by name or provides) satisfies `expr`
    pub fn satisfies(&self, expr: &DepExpr) -> bool {
        provider_satisfies(expr, &self.name, &self.version, &self.provides)
    }
}

/// Read-only access to the installed packages
///
/// `Sync` is required because conflict detection reads the database from
/// two threads at once.
pub trait LocalDb: Sync {
    /// All installed packages, in database order
    fn packages(&self) -> &[InstalledPackage];

    /// Look up an installed package by exact name
    fn pkg(&self, name: &str) -> Option<&InstalledPackage> {
        self.packages().iter().find(|p| p.name == name)
    }

    /// Find the first installed package satisfying `expr`
    fn find_satisfier(&self, expr: &DepExpr) -> Option<&InstalledPackage> {
        self.packages().iter().find(|p| p.satisfies(expr))
    }
}

/// In-memory [`LocalDb`]
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    packages: Vec<InstalledPackage>,
}

impl MemoryDb {
    pub fn new(packages: Vec<InstalledPackage>) -> Self {
        Self { packages }
    }
}

impl LocalDb for MemoryDb {
    fn packages(&self) -> &[InstalledPackage] {
        &self.packages
    }
}
