// src/resolver/mod.rs

//! Dependency resolution and conflict detection
//!
//! This module holds the three passes run over a populated [`DepPool`]:
//! the missing-dependency walk, conflict detection, and build-order
//! serialisation, plus the interactive provider menu.
//!
//! [`DepPool`]: crate::pool::DepPool

mod conflict;
mod missing;
mod order;
mod provider;

pub use conflict::ConflictMap;
pub use missing::MissingReport;
pub use order::DepOrder;
pub use provider::provider_menu;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::{InstalledPackage, LocalDb, MemoryDb};
    use crate::error::Error;
    use crate::package::{BinaryPackage, SourcePackage};
    use crate::pool::DepPool;
    use crate::version::DepExpr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn source(name: &str, version: &str) -> SourcePackage {
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

    fn binary(name: &str, version: &str) -> BinaryPackage {
        BinaryPackage {
            name: name.to_string(),
            version: version.to_string(),
            repository: "extra".to_string(),
            depends: Vec::new(),
            provides: Vec::new(),
            conflicts: Vec::new(),
            installed_size: 0,
        }
    }

    fn installed(name: &str, version: &str) -> InstalledPackage {
        InstalledPackage {
            name: name.to_string(),
            version: version.to_string(),
            depends: Vec::new(),
            provides: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Wraps a MemoryDb and counts satisfier lookups
    struct CountingDb {
        inner: MemoryDb,
        queries: AtomicUsize,
    }

    impl CountingDb {
        fn new(packages: Vec<InstalledPackage>) -> Self {
            Self {
                inner: MemoryDb::new(packages),
                queries: AtomicUsize::new(0),
            }
        }

        fn query_count(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    impl LocalDb for CountingDb {
        fn packages(&self) -> &[InstalledPackage] {
            self.inner.packages()
        }

        fn find_satisfier(&self, expr: &DepExpr) -> Option<&InstalledPackage> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.find_satisfier(expr)
        }
    }

    #[test]
    fn test_resolvable_source_target() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut foo = source("foo", "1.0");
        foo.depends = strings(&["bar>=1"]);
        pool.register_source(foo);
        pool.register_source(source("bar", "2.0"));
        pool.add_target("foo");

        assert!(pool.check_missing().is_ok());

        let mut report = MissingReport::default();
        pool.check_missing_into(&mut report);
        assert!(report.good.contains("foo"));
        assert!(report.good.contains("bar>=1"));
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_missing_leaf_records_chain() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut foo = source("foo", "1.0");
        foo.depends = strings(&["bar>=5"]);
        pool.register_source(foo);
        pool.add_target("foo");

        match pool.check_missing() {
            Err(Error::MissingDependencies { report }) => {
                assert_eq!(report.missing.len(), 1);
                assert_eq!(
                    report.missing["bar>=5"],
                    vec![vec!["foo".to_string()]]
                );
            }
            other => panic!("expected MissingDependencies, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_unresolvable_target_has_empty_chain() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);
        pool.add_target("ghost");

        match pool.check_missing() {
            Err(Error::MissingDependencies { report }) => {
                assert_eq!(report.missing["ghost"], vec![Vec::<String>::new()]);
            }
            other => panic!("expected MissingDependencies, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_distinct_chains_per_leaf() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut a = source("a", "1.0");
        a.depends = strings(&["b", "c"]);
        let mut b = source("b", "1.0");
        b.depends = strings(&["ghost"]);
        let mut c = source("c", "1.0");
        c.depends = strings(&["ghost"]);
        pool.register_source(a);
        pool.register_source(b);
        pool.register_source(c);
        pool.add_target("a");

        match pool.check_missing() {
            Err(Error::MissingDependencies { report }) => {
                let chains = &report.missing["ghost"];
                assert_eq!(chains.len(), 2);
                assert!(chains.contains(&strings(&["a", "b"])));
                assert!(chains.contains(&strings(&["a", "c"])));
            }
            other => panic!("expected MissingDependencies, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_good_and_missing_disjoint() {
        let db = MemoryDb::new(vec![installed("local-only", "1.0")]);
        let mut pool = DepPool::new(&db);

        let mut a = source("a", "1.0");
        a.depends = strings(&["local-only", "ghost"]);
        pool.register_source(a);
        pool.add_target("a");
        pool.add_target("ghost");

        let mut report = MissingReport::default();
        pool.check_missing_into(&mut report);

        for key in report.missing.keys() {
            assert!(!report.good.contains(key));
        }
        assert!(report.good.contains("local-only"));
    }

    #[test]
    fn test_cycle_terminates_without_missing() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut a = source("a", "1.0");
        a.depends = strings(&["b"]);
        let mut b = source("b", "1.0");
        b.depends = strings(&["a"]);
        pool.register_source(a);
        pool.register_source(b);
        pool.add_target("a");

        assert!(pool.check_missing().is_ok());
    }

    #[test]
    fn test_installed_target_not_in_pool_is_good() {
        let db = MemoryDb::new(vec![installed("vim", "9.1-1")]);
        let pool = {
            let mut pool = DepPool::new(&db);
            pool.add_target("vim");
            pool
        };

        let mut report = MissingReport::default();
        pool.check_missing_into(&mut report);
        assert!(report.good.contains("vim"));
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_binary_walk_ignores_make_deps() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        // a binary package carries runtime deps only; nothing else to pull
        let mut bin = binary("tool", "1.0");
        bin.depends = strings(&["runtime-dep"]);
        pool.register_binary(bin);
        pool.register_binary(binary("runtime-dep", "1.0"));
        pool.add_target("tool");

        assert!(pool.check_missing().is_ok());
    }

    #[test]
    fn test_check_missing_idempotent() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut foo = source("foo", "1.0");
        foo.depends = strings(&["bar>=5"]);
        pool.register_source(foo);
        pool.add_target("foo");

        let mut first = MissingReport::default();
        pool.check_missing_into(&mut first);
        let mut second = first.clone();
        pool.check_missing_into(&mut second);

        assert_eq!(first, second);
    }

    #[test]
    fn test_reused_report_skips_local_queries() {
        let db = CountingDb::new(vec![installed("glibc", "2.39-1")]);
        let mut pool = DepPool::new(&db);

        let mut foo = source("foo", "1.0");
        foo.depends = strings(&["glibc", "bar"]);
        pool.register_source(foo);
        pool.register_source(source("bar", "1.0"));
        pool.add_target("foo");

        let mut report = MissingReport::default();
        pool.check_missing_into(&mut report);
        let after_first = db.query_count();
        assert!(after_first > 0);

        pool.check_missing_into(&mut report);
        assert_eq!(db.query_count(), after_first);
    }

    #[test]
    fn test_inner_conflict_merged_keys() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut a = source("a", "1.0");
        a.conflicts = strings(&["b"]);
        pool.register_source(a);
        pool.register_source(source("b", "1.0"));
        pool.add_target("a");
        pool.add_target("b");

        let merged = pool.check_conflicts(&Config::default()).unwrap();
        assert!(merged.contains_key("a"));
        assert!(merged.contains_key("b"));
        assert!(merged["a"].is_empty());
        assert!(merged["b"].is_empty());
    }

    #[test]
    fn test_forward_conflict_annotated() {
        let mut bar = installed("bar", "1.0");
        bar.provides = strings(&["libfoo"]);
        let db = MemoryDb::new(vec![bar]);
        let mut pool = DepPool::new(&db);

        let mut a = source("a", "1.0");
        a.conflicts = strings(&["libfoo"]);
        pool.register_source(a);
        pool.add_target("a");

        let merged = pool.check_conflicts(&Config::default()).unwrap();
        assert!(merged["a"].contains("bar (libfoo)"));
    }

    #[test]
    fn test_forward_conflict_skips_replaced_packages() {
        let db = MemoryDb::new(vec![installed("old-tool", "1.0")]);
        let mut pool = DepPool::new(&db);

        // old-tool is being replaced by the chosen set, so displacing the
        // installed copy is not a conflict
        let mut a = source("a", "1.0");
        a.conflicts = strings(&["old-tool<2"]);
        pool.register_source(a);
        pool.register_source(source("old-tool", "2.0"));
        pool.add_target("a");

        let merged = pool.check_conflicts(&Config::default()).unwrap();
        assert!(!merged.contains_key("a"));
    }

    #[test]
    fn test_reverse_conflict_recorded_under_installed() {
        let mut x = installed("x", "1.0");
        x.conflicts = strings(&["y"]);
        let db = MemoryDb::new(vec![x]);
        let mut pool = DepPool::new(&db);

        pool.register_source(source("y", "1.0"));
        pool.add_target("y");

        let merged = pool.check_conflicts(&Config::default()).unwrap();
        assert!(merged["x"].contains("y"));
    }

    #[test]
    fn test_no_self_conflict() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut a = source("a", "2.0");
        a.conflicts = strings(&["a<2.0", "a"]);
        pool.register_source(a);
        pool.add_target("a");

        let merged = pool.check_conflicts(&Config::default()).unwrap();
        for (name, pkgs) in &merged {
            assert!(!pkgs.contains(name));
        }
    }

    #[test]
    fn test_conflicts_deterministic() {
        let mut x = installed("x", "1.0");
        x.conflicts = strings(&["y"]);
        let db = MemoryDb::new(vec![x, installed("z", "1.0")]);
        let mut pool = DepPool::new(&db);

        let mut y = source("y", "1.0");
        y.conflicts = strings(&["z"]);
        pool.register_source(y);
        pool.add_target("y");

        let first = pool.check_conflicts(&Config::default()).unwrap();
        let second = pool.check_conflicts(&Config::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_inner_merge_is_noop() {
        let db = MemoryDb::new(vec![installed("bar", "1.0")]);
        let mut pool = DepPool::new(&db);

        // forward conflict only; the inner map stays empty
        let mut a = source("a", "1.0");
        a.conflicts = strings(&["bar"]);
        pool.register_source(a);
        pool.add_target("a");

        let merged = pool.check_conflicts(&Config::default()).unwrap();
        assert_eq!(merged.len(), 1);
        assert!(merged["a"].contains("bar"));
    }

    #[test]
    fn test_noconfirm_with_conflicts_fails() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut a = source("a", "1.0");
        a.conflicts = strings(&["b"]);
        pool.register_source(a);
        pool.register_source(source("b", "1.0"));
        pool.add_target("a");
        pool.add_target("b");

        let config = Config {
            no_confirm: true,
            ..Config::default()
        };
        match pool.check_conflicts(&config) {
            Err(Error::ConflictsRequireInteraction) => {}
            other => panic!("expected ConflictsRequireInteraction, got {:?}", other),
        }
    }

    #[test]
    fn test_ask_mode_accepts_conflicts() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut a = source("a", "1.0");
        a.conflicts = strings(&["b"]);
        pool.register_source(a);
        pool.register_source(source("b", "1.0"));
        pool.add_target("a");
        pool.add_target("b");

        let config = Config {
            no_confirm: true,
            use_ask: true,
            ..Config::default()
        };
        assert!(pool.check_conflicts(&config).is_ok());
    }

    #[test]
    fn test_no_conflicts_clean_pool() {
        let db = MemoryDb::new(vec![installed("glibc", "2.39-1")]);
        let mut pool = DepPool::new(&db);

        pool.register_source(source("a", "1.0"));
        pool.add_target("a");

        let merged = pool.check_conflicts(&Config::default()).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_order_dependencies_first() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut app = source("app", "1.0");
        app.depends = strings(&["lib"]);
        pool.register_source(app);
        pool.register_source(source("lib", "1.0"));
        pool.add_target("app");

        let order = DepOrder::compute(&pool);
        let names: Vec<&str> = order.bases.iter().map(|b| b.pkgbase()).collect();
        assert_eq!(names, vec!["lib", "app"]);
        assert!(order.runtime.contains("app"));
        assert!(order.runtime.contains("lib"));
    }

    #[test]
    fn test_order_make_deps_not_runtime() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut app = source("app", "1.0");
        app.depends = strings(&["lib"]);
        app.make_depends = strings(&["builder"]);
        let mut builder = source("builder", "1.0");
        builder.depends = strings(&["build-lib"]);
        pool.register_source(app);
        pool.register_source(source("lib", "1.0"));
        pool.register_source(builder);
        pool.register_binary(binary("build-lib", "1.0"));
        pool.add_target("app");

        let order = DepOrder::compute(&pool);
        assert!(order.runtime.contains("app"));
        assert!(order.runtime.contains("lib"));
        // everything below a make edge is make-time
        assert!(!order.runtime.contains("builder"));
        assert!(!order.runtime.contains("build-lib"));
        assert_eq!(order.repo.len(), 1);
    }

    #[test]
    fn test_order_groups_split_packages() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut cli = source("tool-cli", "1.0");
        cli.package_base = "tool".to_string();
        let mut gui = source("tool-gui", "1.0");
        gui.package_base = "tool".to_string();

        let mut app = source("app", "1.0");
        app.depends = strings(&["tool-cli"]);
        app.make_depends = strings(&["tool-gui"]);
        pool.register_source(app);
        pool.register_source(cli);
        pool.register_source(gui);
        pool.add_target("app");

        let order = DepOrder::compute(&pool);
        assert_eq!(order.bases.len(), 2);
        assert_eq!(order.bases[0].pkgbase(), "tool");
        assert_eq!(order.bases[0].packages().len(), 2);
        assert!(order.runtime.contains("tool-cli"));
        assert!(!order.runtime.contains("tool-gui"));
    }

    #[test]
    fn test_order_each_package_once() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut a = source("a", "1.0");
        a.depends = strings(&["shared"]);
        let mut b = source("b", "1.0");
        b.depends = strings(&["shared"]);
        pool.register_source(a);
        pool.register_source(b);
        pool.register_source(source("shared", "1.0"));
        pool.add_target("a");
        pool.add_target("b");

        let order = DepOrder::compute(&pool);
        let names: Vec<&str> = order.bases.iter().map(|base| base.pkgbase()).collect();
        assert_eq!(names, vec!["shared", "a", "b"]);
    }

    #[test]
    fn test_order_print_smoke() {
        let db = MemoryDb::default();
        let mut pool = DepPool::new(&db);

        let mut app = source("app", "1.0");
        app.make_depends = strings(&["builder"]);
        pool.register_source(app);
        pool.register_source(source("builder", "1.0"));
        pool.register_binary(binary("lib", "2.0"));
        pool.add_target("app");
        pool.add_target("lib");

        let order = DepOrder::compute(&pool);
        order.print(&Config::default());
        order.print(&Config {
            sort_mode: crate::config::SortMode::BottomUp,
            ..Config::default()
        });
    }
}
