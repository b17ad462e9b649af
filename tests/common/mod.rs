// tests/common/mod.rs

//! Shared test fixtures for integration tests.

use aurum::db::InstalledPackage;
use aurum::{BinaryPackage, SourcePackage};

pub fn source(name: &str, version: &str) -> SourcePackage {
    SourcePackage {
        name: name.to_string(),
        package_base: name.to_string(),
        version: version.to_string(),
        description: None,
        depends: Vec::new(),
        make_depends: Vec::new(),
        check_depends: Vec::new(),
        provides: Vec::new(),
        conflicts: Vec::new(),
        maintainer: None,
        votes: 0,
        popularity: 0.0,
        out_of_date: None,
    }
}

pub fn binary(name: &str, version: &str, repository: &str) -> BinaryPackage {
    BinaryPackage {
        name: name.to_string(),
        version: version.to_string(),
        repository: repository.to_string(),
        depends: Vec::new(),
        provides: Vec::new(),
        conflicts: Vec::new(),
        installed_size: 0,
    }
}

pub fn installed(name: &str, version: &str) -> InstalledPackage {
    InstalledPackage {
        name: name.to_string(),
        version: version.to_string(),
        depends: Vec::new(),
        provides: Vec::new(),
        conflicts: Vec::new(),
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
