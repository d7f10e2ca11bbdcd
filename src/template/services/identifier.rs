//! Identifier assignment run inside a template unit of work.

use crate::template::{
    domain::{TaskIdPrefix, TaskIdentifier, TaskTemplate},
    ports::{TemplateRepositoryResult, TemplateTransaction},
};
use tracing::{debug, info};

/// Assigns a task identifier to `template` unless it already carries one.
///
/// The prefix is derived from the template's current planner and sector, and
/// the sequence number is allocated on `transaction`, so the counter increment
/// commits or rolls back together with whatever else the unit of work writes.
///
/// A template that already carries an identifier keeps it. When that
/// identifier follows the `{prefix}-{number}` layout, the prefix's counter is
/// raised to cover it so the allocator never hands the same number out again.
///
/// Returns the newly assigned identifier, or `None` when the template already
/// had one.
///
/// # Errors
///
/// Returns the allocation error reported by the transaction.
pub fn assign_task_identifier(
    transaction: &mut dyn TemplateTransaction,
    template: &mut TaskTemplate,
) -> TemplateRepositoryResult<Option<TaskIdentifier>> {
    if let Some(supplied) = template.task_id() {
        reserve_supplied(transaction, supplied)?;
        return Ok(None);
    }

    let prefix = template.id_prefix();
    let number = transaction.allocate_sequence(&prefix)?;
    debug!(%prefix, number = number.value(), "allocated sequence number");

    let task_id = TaskIdentifier::compose(&prefix, number);
    if !template.assign_task_id(task_id.clone()) {
        return Ok(None);
    }
    info!(template_id = %template.id(), %task_id, "assigned task identifier");
    Ok(Some(task_id))
}

fn reserve_supplied(
    transaction: &mut dyn TemplateTransaction,
    supplied: &TaskIdentifier,
) -> TemplateRepositoryResult<()> {
    let Some(prefix) = supplied.prefix().and_then(|raw| TaskIdPrefix::new(raw).ok()) else {
        return Ok(());
    };
    let Some(number) = supplied.sequence_number() else {
        return Ok(());
    };
    transaction.reserve_sequence(&prefix, number)?;
    debug!(%prefix, number = number.value(), "reserved supplied sequence number");
    Ok(())
}
