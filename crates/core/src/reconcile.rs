//! Out-of-band cleanup of assets no record references.
//!
//! Orphans come from cleanup steps that failed after the primary operation
//! succeeded, or from a crash between staging an upload and linking it.
//! Assets younger than the grace period are left alone: they may belong to a
//! request that is still between those two steps.

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::asset::{AssetStore, Locator};
use crate::error::ContentResult;
use crate::record::ContentKind;
use crate::repository::ContentRepository;
use crate::upload::filename;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOptions {
    pub grace: Duration,
    pub dry_run: bool,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(3600),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub scanned: usize,
    pub referenced: usize,
    pub too_recent: usize,
    pub orphaned: Vec<Locator>,
    pub removed: usize,
    pub failed: usize,
    /// Linked locators whose prefix differs from what the store issues now.
    pub foreign_locators: usize,
    pub dry_run: bool,
}

pub async fn sweep_orphans(
    repository: &dyn ContentRepository,
    store: &dyn AssetStore,
    options: SweepOptions,
) -> ContentResult<SweepReport> {
    // Match by asset name, not by full locator: records keep the locator
    // they were created with even if the store's prefix changes later.
    let mut linked = HashSet::new();
    let mut foreign = 0;
    for kind in ContentKind::image_bearing() {
        for record in repository.find_all(kind).await? {
            let Some(image) = record.image() else {
                continue;
            };
            let Some(name) = image.asset_name() else {
                continue;
            };
            if store.locator_for(name) != *image {
                foreign += 1;
            }
            linked.insert(name.to_string());
        }
    }
    if foreign > 0 {
        tracing::warn!(
            foreign,
            "records reference images under a different locator prefix than the store issues"
        );
    }

    let grace = chrono::Duration::from_std(options.grace).unwrap_or(chrono::Duration::MAX);
    let cutoff = Utc::now().checked_sub_signed(grace);

    let mut report = SweepReport {
        foreign_locators: foreign,
        dry_run: options.dry_run,
        ..SweepReport::default()
    };

    for asset in store.list().await? {
        report.scanned += 1;
        if linked.contains(&asset.name) {
            report.referenced += 1;
            continue;
        }
        // Names without an embedded timestamp were not generated here; treat as old.
        let recent = match (filename::timestamp_of(&asset.name), cutoff) {
            (Some(created), Some(cutoff)) => created > cutoff,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if recent {
            report.too_recent += 1;
            continue;
        }

        if !options.dry_run {
            match store.delete(&asset.locator).await {
                Ok(()) => report.removed += 1,
                Err(err) => {
                    tracing::warn!(locator = %asset.locator, error = %err, "orphan removal failed");
                    report.failed += 1;
                }
            }
        }
        report.orphaned.push(asset.locator);
    }

    tracing::info!(
        scanned = report.scanned,
        orphaned = report.orphaned.len(),
        removed = report.removed,
        dry_run = report.dry_run,
        "orphan sweep finished"
    );
    Ok(report)
}
