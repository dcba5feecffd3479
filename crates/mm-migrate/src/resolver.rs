//! Query reference resolver
//!
//! Walks a query body depth-first and rewrites every embedded
//! `["field", id, options]` / `["metric", id, options]` reference so the id
//! points at the destination instance's object of the same name. Field
//! references may carry a foreign-key indirection in their options
//! (`"source-field"`), which is resolved independently of the primary id.
//!
//! Only concrete integer ids are translated; a reference whose id slot holds
//! a symbolic placeholder is left untouched. Clauses nest clauses, so the
//! walk continues into a sequence's elements whether or not its tag matched.

use crate::catalog::CatalogCache;
use crate::error::MigrateResult;
use mm_api::{DestinationApi, SourceReader};
use mm_core::model::{Field, Table};
use mm_core::query::QueryNode;
use serde_json::Value;

/// Reference positions within a tagged sequence: `[tag, id, options]`
const ID_SLOT: usize = 1;
const OPTIONS_SLOT: usize = 2;

/// Everything a resolution needs, passed explicitly instead of captured
/// from enclosing scope: the source reader, the destination reader/writer,
/// the run-scoped catalog cache, and the destination warehouse database id.
pub struct ResolveContext<'a> {
    pub source: &'a dyn SourceReader,
    pub dest: &'a dyn DestinationApi,
    pub catalog: &'a mut CatalogCache,
    pub database_id: u64,
}

/// Rewrite every reference in `node` in place
pub fn resolve_query(ctx: &mut ResolveContext<'_>, node: &mut QueryNode) -> MigrateResult<()> {
    match node {
        QueryNode::Mapping(entries) => {
            for (_, value) in entries.iter_mut() {
                resolve_query(ctx, value)?;
            }
        }
        QueryNode::Sequence(items) => {
            rewrite_reference(ctx, items)?;
            for item in items.iter_mut() {
                resolve_query(ctx, item)?;
            }
        }
        QueryNode::Literal(_) => {}
    }
    Ok(())
}

fn rewrite_reference(ctx: &mut ResolveContext<'_>, items: &mut [QueryNode]) -> MigrateResult<()> {
    let Some(tag) = items.first().and_then(QueryNode::as_str) else {
        return Ok(());
    };

    match tag {
        "field" => {
            let Some(source_field_id) = items.get(ID_SLOT).and_then(QueryNode::as_id) else {
                return Ok(());
            };
            let source_field = ctx.source.field(source_field_id)?;
            let dest_table = destination_table_for(ctx, source_field.table_id)?;
            let dest_field_id = ctx
                .catalog
                .resolve_field(ctx.dest, dest_table.id, &source_field.name)?;
            items[ID_SLOT].set_id(dest_field_id);
            propagate_field_metadata(ctx, source_field, dest_field_id)?;

            if let Some(options) = items.get_mut(OPTIONS_SLOT) {
                if let Some(fk) = options.get_mut("source-field") {
                    if let Some(fk_source_id) = fk.as_id() {
                        let fk_dest_id = destination_field_id(ctx, fk_source_id)?;
                        fk.set_id(fk_dest_id);
                    }
                }
            }
        }
        "metric" => {
            let Some(source_metric_id) = items.get(ID_SLOT).and_then(QueryNode::as_id) else {
                return Ok(());
            };
            let metric = ctx.source.metric(source_metric_id)?;
            let dest_table = destination_table_for(ctx, metric.definition.source_table)?;
            let dest_metric_id = ctx
                .catalog
                .resolve_metric(ctx.dest, dest_table.id, &metric.name)?;
            items[ID_SLOT].set_id(dest_metric_id);
        }
        _ => {}
    }
    Ok(())
}

/// Destination table equivalent of a source table, matched by
/// `(name, schema, destination database id)`
pub fn destination_table_for(
    ctx: &mut ResolveContext<'_>,
    source_table_id: u64,
) -> MigrateResult<Table> {
    let source_table = ctx.source.table(source_table_id)?;
    ctx.catalog.resolve_table(
        ctx.dest,
        &source_table.name,
        &source_table.schema,
        ctx.database_id,
    )
}

/// Destination field equivalent of a source field, matched by name within
/// the source field's table translated across instances
pub fn destination_field_id(
    ctx: &mut ResolveContext<'_>,
    source_field_id: u64,
) -> MigrateResult<u64> {
    let source_field = ctx.source.field(source_field_id)?;
    let dest_table = destination_table_for(ctx, source_field.table_id)?;
    ctx.catalog
        .resolve_field(ctx.dest, dest_table.id, &source_field.name)
}

/// Write the source field's metadata onto the destination field so the
/// destination foreign-key graph mirrors the source. `fk_target_field_id`
/// is itself a cross-instance reference and is re-resolved first.
fn propagate_field_metadata(
    ctx: &mut ResolveContext<'_>,
    source_field: Field,
    dest_field_id: u64,
) -> MigrateResult<()> {
    let mut field = source_field;
    field.id = dest_field_id;
    if let Some(fk_target) = field.fk_target_field_id {
        field.fk_target_field_id = Some(destination_field_id(ctx, fk_target)?);
    }

    let mut patch = serde_json::to_value(&field)?;
    if let Value::Object(map) = &mut patch {
        // the destination assigns its own owning table
        map.remove("table_id");
    }
    ctx.dest.update_field(dest_field_id, &patch)?;
    Ok(())
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
