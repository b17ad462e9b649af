// src/package/mod.rs

//! Package representations for the two discovery origins
//!
//! Targets and dependencies resolve either to a prebuilt package in a
//! binary repository or to a build recipe in the AUR. Both origins are
//! carried through resolution behind the [`Pkg`] union so the evaluator
//! and conflict detection can treat them uniformly.

use crate::version::{provider_satisfies, DepExpr};
use std::fmt;

/// A package from the AUR (built from source)
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePackage {
    pub name: String,
    pub package_base: String,
    pub version: String,
    pub description: Option<String>,
    pub depends: Vec<String>,
    pub make_depends: Vec<String>,
    pub check_depends: Vec<String>,
    pub provides: Vec<String>,
    pub conflicts: Vec<String>,
    pub maintainer: Option<String>,
    pub votes: u64,
    pub popularity: f64,
    pub out_of_date: Option<i64>,
}

impl SourcePackage {
    /// Whether this package (by name or provides) satisfies `expr`
    pub fn satisfies(&self, expr: &DepExpr) -> bool {
        provider_satisfies(expr, &self.name, &self.version, &self.provides)
    }

    /// All dependency expressions needed to build and run this package
    pub fn all_depends(&self) -> impl Iterator<Item = &String> {
        self.depends
            .iter()
            .chain(self.make_depends.iter())
            .chain(self.check_depends.iter())
    }
}

/// A prebuilt package from a binary repository
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryPackage {
    pub name: String,
    pub version: String,
    pub repository: String,
    pub depends: Vec<String>,
    pub provides: Vec<String>,
    pub conflicts: Vec<String>,
    pub installed_size: i64,
}

impl BinaryPackage {
    /// Whether this package (by name or provides) satisfies `expr`
    pub fn satisfies(&self, expr: &DepExpr) -> bool {
        provider_satisfies(expr, &self.name, &self.version, &self.provides)
    }
}

/// A package of either origin
#[derive(Debug, Clone, Copy)]
pub enum Pkg<'a> {
    Source(&'a SourcePackage),
    Binary(&'a BinaryPackage),
}

impl<'a> Pkg<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Pkg::Source(pkg) => &pkg.name,
            Pkg::Binary(pkg) => &pkg.name,
        }
    }

    pub fn version(&self) -> &'a str {
        match self {
            Pkg::Source(pkg) => &pkg.version,
            Pkg::Binary(pkg) => &pkg.version,
        }
    }

    pub fn provides(&self) -> &'a [String] {
        match self {
            Pkg::Source(pkg) => &pkg.provides,
            Pkg::Binary(pkg) => &pkg.provides,
        }
    }

    pub fn depends(&self) -> &'a [String] {
        match self {
            Pkg::Source(pkg) => &pkg.depends,
            Pkg::Binary(pkg) => &pkg.depends,
        }
    }

    pub fn conflicts(&self) -> &'a [String] {
        match self {
            Pkg::Source(pkg) => &pkg.conflicts,
            Pkg::Binary(pkg) => &pkg.conflicts,
        }
    }

    pub fn satisfies(&self, expr: &DepExpr) -> bool {
        match self {
            Pkg::Source(pkg) => pkg.satisfies(expr),
            Pkg::Binary(pkg) => pkg.satisfies(expr),
        }
    }
}

/// Source packages built from one shared recipe
///
/// One AUR tree may produce multiple named split packages; they are
/// grouped under the package-base that builds them. The sequence is
/// ordered and never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageBase {
    packages: Vec<SourcePackage>,
}

impl PackageBase {
    pub fn new(pkg: SourcePackage) -> Self {
        Self {
            packages: vec![pkg],
        }
    }

    /// Add a split package sharing this base
    pub fn push(&mut self, pkg: SourcePackage) {
        debug_assert_eq!(pkg.package_base, self.pkgbase());
        self.packages.push(pkg);
    }

    pub fn pkgbase(&self) -> &str {
        &self.packages[0].package_base
    }

    pub fn version(&self) -> &str {
        &self.packages[0].version
    }

    pub fn packages(&self) -> &[SourcePackage] {
        &self.packages
    }

    /// Whether the base name alone is ambiguous and the split-package
    /// names must be spelled out
    pub fn is_split(&self) -> bool {
        self.packages.len() > 1 || self.packages[0].name != self.pkgbase()
    }
}

impl fmt::Display for PackageBase {
    /// Prints `base` for a plain package, `base (p1 p2 …)` for a split one
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pkgbase())?;
        if self.is_split() {
            let names: Vec<&str> = self.packages.iter().map(|p| p.name.as_str()).collect();
            write!(f, " ({})", names.join(" "))?;
        }
        Ok(())
    }
}
