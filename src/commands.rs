// src/commands.rs

//! Host-side commands gluing discovery to the resolution core
//!
//! Discovery walks the targets breadth-first, filling the DepPool from the
//! sync repositories first and the AUR second, then hands the populated
//! pool to the core passes.

use anyhow::{Context, Result};
use aurum::aur::AurClient;
use aurum::db::{pacman, LocalDb, MemoryDb};
use aurum::resolver::provider_menu;
use aurum::{Config, DepExpr, DepOrder, DepPool};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info};

/// Resolve the targets and print the build plan
pub fn cmd_resolve(targets: &[String], config: &Config) -> Result<()> {
    let installed =
        pacman::load_installed().context("failed to read the local package database")?;
    let local = MemoryDb::new(installed);
    let aur = AurClient::new(&config.aur_url).context("failed to set up the AUR client")?;

    let mut pool = DepPool::new(&local);
    discover(&mut pool, &aur, targets, config)?;

    pool.check_missing()?;
    pool.check_conflicts(config)?;

    let order = DepOrder::compute(&pool);
    order.print(config);
    Ok(())
}

/// Populate the pool with every package the targets can pull in
///
/// Expressions nothing can satisfy are left unregistered on purpose; the
/// missing walk reports them all in one pass afterwards.
fn discover(
    pool: &mut DepPool,
    aur: &AurClient,
    targets: &[String],
    config: &Config,
) -> Result<()> {
    let mut queue: VecDeque<String> = targets.iter().cloned().collect();
    let mut visited: HashSet<String> = HashSet::new();

    for target in targets {
        pool.add_target(target.clone());
    }

    while let Some(dep) = queue.pop_front() {
        if !visited.insert(dep.clone()) {
            continue;
        }

        let expr = DepExpr::parse(&dep);
        if pool.find_satisfier_source(&expr).is_some()
            || pool.find_satisfier_binary(&expr).is_some()
        {
            continue;
        }
        if pool.local().find_satisfier(&expr).is_some() {
            debug!("{} already installed", dep);
            continue;
        }

        // binary repositories win over the AUR for anything they carry
        if let Some(pkg) = pacman::sync_package(&expr.name)? {
            if pkg.satisfies(&expr) {
                debug!("{} found in {}", pkg.name, pkg.repository);
                queue.extend(pkg.depends.iter().cloned());
                pool.register_binary(pkg);
                continue;
            }
        }

        let mut candidates: Vec<_> = aur
            .info(&[expr.name.as_str()])?
            .into_iter()
            .filter(|pkg| pkg.satisfies(&expr))
            .collect();

        if candidates.is_empty() {
            // the name may be virtual; ask the AUR who provides it
            let providers = aur.providers_for(&expr.name)?;
            candidates = aur
                .info(&providers)?
                .into_iter()
                .filter(|pkg| pkg.satisfies(&expr))
                .collect();
        }

        match candidates.len() {
            0 => debug!("no candidate for {}", dep),
            1 => {
                let pkg = candidates.remove(0);
                info!("{} found in the AUR", pkg.name);
                queue.extend(pkg.all_depends().cloned());
                pool.register_source(pkg);
            }
            _ => {
                candidates.sort_by(|a, b| {
                    b.popularity
                        .partial_cmp(&a.popularity)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.name.cmp(&b.name))
                });
                let refs: Vec<&aurum::SourcePackage> = candidates.iter().collect();
                if let Some(pkg) = provider_menu(&dep, &refs, config) {
                    let pkg = pkg.clone();
                    info!("{} selected for {}", pkg.name, dep);
                    queue.extend(pkg.all_depends().cloned());
                    pool.register_source(pkg);
                }
            }
        }
    }

    Ok(())
}
