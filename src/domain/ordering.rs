//! Pure transformations over the ordered ticket sequence.
//!
//! The global sequence is the only ordering there is: the order of a column
//! is the order in which its tickets appear in the sequence. Every helper here
//! returns a new sequence and leaves its input alone, so the same code serves
//! the storage backends, the drag preview and the drop commit.

use crate::domain::board::{group_by_status, GroupedTickets};
use crate::domain::ticket::{Ticket, TicketId, TicketStatus};
use crate::error::{Result, TriageError};
use std::collections::{HashMap, HashSet};

/// Collects the ids of a sequence, in order
pub fn ids_of(tickets: &[Ticket]) -> Vec<TicketId> {
    tickets.iter().map(|t| t.id.clone()).collect()
}

/// Position of `id` within the column of `status`
pub fn column_position(tickets: &[Ticket], status: TicketStatus, id: &TicketId) -> Option<usize> {
    tickets
        .iter()
        .filter(|t| t.status == status)
        .position(|t| &t.id == id)
}

/// Reorders `tickets` to follow `ids`.
///
/// Ids with no matching ticket are dropped, as are tickets whose id is not
/// listed. A repeated id only keeps its first occurrence.
pub fn reorder_by_ids(tickets: &[Ticket], ids: &[TicketId]) -> Vec<Ticket> {
    let by_id: HashMap<&TicketId, &Ticket> = tickets.iter().map(|t| (&t.id, t)).collect();
    let mut seen = HashSet::with_capacity(ids.len());

    ids.iter()
        .filter(|id| seen.insert(*id))
        .filter_map(|id| by_id.get(id).map(|t| (*t).clone()))
        .collect()
}

/// Places `ticket` into the column named by its own status at `index`.
///
/// Any existing record with the same id is removed first. The index is
/// clamped to the column bounds. The result is assembled column by column in
/// canonical order, other columns keeping their relative order.
pub fn insert_into_column(tickets: &[Ticket], ticket: Ticket, index: usize) -> Vec<Ticket> {
    let remaining: Vec<Ticket> = tickets
        .iter()
        .filter(|t| t.id != ticket.id)
        .cloned()
        .collect();

    let mut columns: GroupedTickets = group_by_status(&remaining);
    let target = columns.get_mut(ticket.status);
    let index = index.min(target.len());
    target.insert(index, ticket);

    columns.into_sequence()
}

/// Changes the status of ticket `id` and splices it into the target column.
pub fn move_to_column(
    tickets: &[Ticket],
    id: &TicketId,
    status: TicketStatus,
    target_index: usize,
) -> Result<Vec<Ticket>> {
    let ticket = tickets
        .iter()
        .find(|t| &t.id == id)
        .ok_or_else(|| TriageError::TicketNotFound(id.to_string()))?;

    Ok(insert_into_column(
        tickets,
        ticket.with_status(status),
        target_index,
    ))
}

/// Moves ticket `id` to `destination` within its own column.
///
/// `destination` is a position among the column's other tickets, the same
/// insertion index a cross-column drop uses; values past the end append.
/// Returns `None` when the ticket is unknown or would not move.
pub fn move_within_column(
    tickets: &[Ticket],
    id: &TicketId,
    destination: usize,
) -> Option<Vec<Ticket>> {
    let status = tickets.iter().find(|t| &t.id == id)?.status;
    let mut columns = group_by_status(tickets);
    let column = columns.get_mut(status);

    let from = column.iter().position(|t| &t.id == id)?;
    let ticket = column.remove(from);
    let to = destination.min(column.len());
    if from == to {
        return None;
    }

    column.insert(to, ticket);
    Some(columns.into_sequence())
}
