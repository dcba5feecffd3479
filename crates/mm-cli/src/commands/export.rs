//! Export command implementation
//!
//! Dumps every native-SQL card on the source instance into
//! `<out>/<collection>/<card>.sql`. Structured (non-native) cards have no
//! SQL text to save and are skipped.

use anyhow::{Context, Result};
use mm_core::model::Card;
use std::collections::HashMap;
use std::fs;

use crate::cli::{ExportArgs, GlobalArgs};
use crate::commands::common;

/// Execute the export command
pub fn execute(args: &ExportArgs, _global: &GlobalArgs) -> Result<()> {
    let config = common::load_config(&args.configuration)?;
    let client = common::connect(&config.source)?;

    let collection_names: HashMap<u64, String> = client
        .collections()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut saved = 0;
    for card in client.cards()? {
        let Some(sql) = native_sql(&card) else {
            log::debug!("{} has no native query, skipping", card.display_name());
            continue;
        };

        let folder = card
            .collection_id
            .and_then(|id| collection_names.get(&id))
            .map(|name| slugify(name))
            .unwrap_or_else(|| "default".to_string());
        let dir = args.out.join(folder);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let path = dir.join(format!("{}.sql", slugify(card.display_name())));
        fs::write(&path, sql).with_context(|| format!("Failed to write {}", path.display()))?;
        saved += 1;
    }

    println!("Saved {saved} queries under {}", args.out.display());
    Ok(())
}

/// The SQL text of a native-query card, if it is one
fn native_sql(card: &Card) -> Option<&str> {
    card.dataset_query
        .as_ref()?
        .extra
        .get("native")?
        .get("query")?
        .as_str()
}

/// Filesystem-safe name: lowercase, alphanumeric runs joined by dashes
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("question");
    }
    slug
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
