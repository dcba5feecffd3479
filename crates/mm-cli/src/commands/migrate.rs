//! Migrate command implementation

use anyhow::Result;
use mm_migrate::Migrator;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common;

/// Execute the migrate command
///
/// A run that completes with per-card skips still exits 0; the summary
/// lists every skip so the operator can reconcile by hand. Only fatal
/// configuration/creation errors exit non-zero.
pub fn execute(args: &MigrateArgs, _global: &GlobalArgs) -> Result<()> {
    let config = common::load_config(&args.configuration)?;

    println!(
        "Migrating collection {} from {} to {}",
        config.source_collection_id, config.source.base_url, config.destination.base_url
    );

    let source = common::connect(&config.source)?;
    let dest = common::connect(&config.destination)?;

    let migrator = Migrator::new(&source, &dest, config.destination.database_id);
    let report = migrator.run(&config.source_collection_id)?;

    print!("{}", report.summary());
    if report.has_skips() {
        eprintln!("Some cards were skipped; see the summary above.");
    }
    Ok(())
}
