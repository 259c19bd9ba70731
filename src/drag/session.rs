use crate::{
    domain::{ordering, Ticket, TicketId, TicketStatus},
    drag::{DragOutcome, DragOverEffect, DropTarget, SessionId},
};
use std::collections::HashMap;
use tracing::{debug, trace};

/// State of one in-progress drag gesture.
///
/// The snapshot taken at start is the rollback point and the only source of
/// the dragged ticket's original status and position; provisional sequences
/// are derived from it, never from each other.
#[derive(Debug, Clone)]
pub struct DragSession {
    id: SessionId,
    original: Ticket,
    snapshot: Vec<Ticket>,
    /// Column each card is currently rendered in
    rendered_columns: HashMap<TicketId, TicketStatus>,
    target_column: Option<TicketStatus>,
    target_index: Option<usize>,
    provisional: Option<Vec<Ticket>>,
}

/// What a drop should do, decided without touching any state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPlan {
    /// Reinstall the snapshot; no persistence
    Restore {
        snapshot: Vec<Ticket>,
        outcome: DragOutcome,
    },
    /// Install the reordered sequence and save its id order
    Reorder { tickets: Vec<Ticket> },
    /// Same-column drop that lands where the ticket already was
    KeepOrder { snapshot: Vec<Ticket> },
    /// Relabel `original` with `status` and ask the backend to move it
    Move {
        original: Ticket,
        status: TicketStatus,
        index: usize,
    },
    /// Locked ticket over a foreign column; nothing changes
    Reject,
}

impl DropPlan {
    pub fn outcome(&self) -> DragOutcome {
        match self {
            Self::Restore { outcome, .. } => *outcome,
            Self::Reorder { .. } | Self::KeepOrder { .. } => DragOutcome::CommittedReorder,
            Self::Move { .. } => DragOutcome::CommittedMove,
            Self::Reject => DragOutcome::RejectedLocked,
        }
    }
}

impl DragSession {
    /// Starts a session for `dragged` over a copy of the current sequence.
    ///
    /// Returns `None` when the ticket is not part of the sequence.
    pub fn start(snapshot: Vec<Ticket>, dragged: &TicketId) -> Option<Self> {
        let original = snapshot.iter().find(|t| &t.id == dragged)?.clone();
        let rendered_columns = snapshot.iter().map(|t| (t.id.clone(), t.status)).collect();
        let id = SessionId::new();

        debug!(session = %id, ticket = %original.id, status = original.status.as_str(), "Drag started");

        Some(Self {
            id,
            original,
            snapshot,
            rendered_columns,
            target_column: None,
            target_index: None,
            provisional: None,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn dragged(&self) -> &TicketId {
        &self.original.id
    }

    /// The dragged ticket as it was at drag start
    pub fn original(&self) -> &Ticket {
        &self.original
    }

    pub fn original_status(&self) -> TicketStatus {
        self.original.status
    }

    pub fn snapshot(&self) -> &[Ticket] {
        &self.snapshot
    }

    pub fn target_column(&self) -> Option<TicketStatus> {
        self.target_column
    }

    pub fn target_index(&self) -> Option<usize> {
        self.target_index
    }

    /// Last provisional sequence handed out for rendering
    pub fn provisional(&self) -> Option<&[Ticket]> {
        self.provisional.as_deref()
    }

    fn is_self(&self, target: &DropTarget) -> bool {
        matches!(target, DropTarget::Ticket { id, .. } if id == &self.original.id)
    }

    /// Resolves a hover target to the column it belongs to.
    ///
    /// Cards resolve to the column they are rendered in, falling back to
    /// their snapshot status.
    fn resolve_column(&self, target: &DropTarget) -> Option<TicketStatus> {
        match target {
            DropTarget::Column(status) => Some(*status),
            DropTarget::Ticket { id, .. } => self.rendered_columns.get(id).copied().or_else(|| {
                self.snapshot
                    .iter()
                    .find(|t| &t.id == id)
                    .map(|t| t.status)
            }),
        }
    }

    /// Snapshot tickets of `status`, without the dragged one
    fn column_without_dragged(&self, status: TicketStatus) -> Vec<&Ticket> {
        self.snapshot
            .iter()
            .filter(|t| t.status == status && t.id != self.original.id)
            .collect()
    }

    /// Insertion index within `column` (dragged ticket excluded)
    fn insertion_index(&self, target: &DropTarget, column: TicketStatus) -> usize {
        let items = self.column_without_dragged(column);
        match target {
            DropTarget::Column(_) => items.len(),
            DropTarget::Ticket { id, below } => items
                .iter()
                .position(|t| &t.id == id)
                .map(|index| index + usize::from(*below))
                .unwrap_or(items.len()),
        }
    }

    fn clear_target(&mut self) {
        self.target_column = None;
        self.target_index = None;
    }

    /// Handles a hover event.
    ///
    /// Only a cross-column hover of a pending ticket produces a new sequence,
    /// and only when the target column or index differs from the last one.
    pub fn drag_over(&mut self, target: Option<&DropTarget>) -> DragOverEffect {
        let Some(target) = target else {
            self.clear_target();
            return DragOverEffect::TargetLost;
        };

        if self.is_self(target) {
            return DragOverEffect::Ignored;
        }

        let Some(column) = self.resolve_column(target) else {
            trace!(session = %self.id, "Hover target outside every column");
            self.clear_target();
            return DragOverEffect::TargetLost;
        };

        let home = self.original.status;
        if column == home {
            return DragOverEffect::SameColumn;
        }
        if !home.can_move_to(&column) {
            return DragOverEffect::Locked;
        }

        let index = self.insertion_index(target, column);
        if self.target_column == Some(column) && self.target_index == Some(index) {
            return DragOverEffect::Unchanged;
        }

        self.target_column = Some(column);
        self.target_index = Some(index);

        let preview = ordering::insert_into_column(
            &self.snapshot,
            self.original.with_status(column),
            index,
        );
        self.rendered_columns.insert(self.original.id.clone(), column);
        self.provisional = Some(preview.clone());

        debug!(
            session = %self.id,
            column = column.as_str(),
            index,
            "Provisional move"
        );
        DragOverEffect::Preview(preview)
    }

    /// Decides what a drop over `target` does, consuming the session.
    pub fn finish(self, target: Option<&DropTarget>) -> DropPlan {
        let Some(target) = target else {
            return self.restore(DragOutcome::CancelledNoTarget);
        };

        let Some(column) = self.resolve_column(target) else {
            return self.restore(DragOutcome::CancelledNoTarget);
        };

        let home = self.original.status;

        if column == home {
            if self.target_column.is_some_and(|last| last != home) {
                return self.restore(DragOutcome::CancelledIllegalReturn);
            }
            if self.is_self(target) {
                return DropPlan::KeepOrder {
                    snapshot: self.snapshot,
                };
            }

            let destination = self.insertion_index(target, home);
            return match ordering::move_within_column(&self.snapshot, &self.original.id, destination)
            {
                Some(tickets) => DropPlan::Reorder { tickets },
                None => DropPlan::KeepOrder {
                    snapshot: self.snapshot,
                },
            };
        }

        if !home.can_move_to(&column) {
            debug!(session = %self.id, column = column.as_str(), "Locked ticket dropped on foreign column");
            return DropPlan::Reject;
        }

        if self.target_column != Some(column) {
            return self.restore(DragOutcome::CancelledNoTarget);
        }

        let index = self
            .target_index
            .unwrap_or_else(|| self.insertion_index(target, column));

        DropPlan::Move {
            original: self.original,
            status: column,
            index,
        }
    }

    /// Ends the session and hands back the snapshot
    pub fn cancel(self) -> Vec<Ticket> {
        self.snapshot
    }

    fn restore(self, outcome: DragOutcome) -> DropPlan {
        DropPlan::Restore {
            snapshot: self.snapshot,
            outcome,
        }
    }
}
