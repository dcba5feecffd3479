//! Flush command implementation
//!
//! Deletes every card on the destination instance, typically to reset a
//! half-populated destination before re-running a migration. Reports only
//! unless `--yes` is passed.

use anyhow::Result;

use crate::cli::{FlushArgs, GlobalArgs};
use crate::commands::common;

/// Execute the flush command
pub fn execute(args: &FlushArgs, _global: &GlobalArgs) -> Result<()> {
    let config = common::load_config(&args.configuration)?;
    let client = common::connect(&config.destination)?;

    let cards = client.cards()?;
    if !args.yes {
        println!(
            "Would delete {} card(s) from {}; re-run with --yes to proceed.",
            cards.len(),
            config.destination.base_url
        );
        return Ok(());
    }

    let mut deleted = 0;
    for card in &cards {
        match client.delete_card(card.id) {
            Ok(()) => deleted += 1,
            Err(err) => eprintln!("Failed to delete {}: {err}", card.display_name()),
        }
    }
    println!("Deleted {deleted} of {} card(s)", cards.len());
    Ok(())
}
