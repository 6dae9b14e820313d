// src/commands/lock.rs

//! Checksum lock command

use super::load_registry;
use anyhow::{Context, Result, bail};
use pantry::lock::ChecksumLock;
use pantry::Config;

/// Record every recipe's checksums, or only check them
///
/// Either way a checksum that differs from the recorded one fails the
/// command; when recording, the lock file is then left unchanged.
pub fn cmd_lock(config: &Config, check_only: bool) -> Result<()> {
    let registry = load_registry(config)?;
    let path = &config.lock_file;
    let mut lock = ChecksumLock::load_or_new(path)
        .with_context(|| format!("Failed to load lock file {}", path.display()))?;

    let mut changed = Vec::new();
    let mut added = 0;

    for recipe in registry.iter() {
        let result = if check_only {
            lock.check(recipe.as_ref()).map(|()| 0)
        } else {
            lock.record(recipe.as_ref())
        };

        match result {
            Ok(n) => added += n,
            Err(e) if e.is_integrity() => {
                println!("[FAIL] {}", e);
                changed.push(recipe.name().to_string());
            }
            Err(e) => return Err(e.into()),
        }
    }

    if !changed.is_empty() {
        bail!(
            "Published checksums changed for: {}",
            changed.join(", ")
        );
    }

    if check_only {
        println!("[OK] {} locked checksum(s) unchanged", lock.len());
        return Ok(());
    }

    if added > 0 {
        lock.save(path)
            .with_context(|| format!("Failed to write lock file {}", path.display()))?;
    }
    println!(
        "[COMPLETE] {} new checksum(s) recorded, {} total in {}",
        added,
        lock.len(),
        path.display()
    );
    Ok(())
}
