//! Drag-and-drop engine for the ticket board.
//!
//! A gesture is reported as discrete events: start, zero or more hovers,
//! then exactly one drop or cancel. [`DragSession`] turns those events into
//! provisional sequences for rendering and, on drop, into a [`DropPlan`].
//! Executing the plan against the store and the persistence backend is the
//! job of [`crate::Dashboard`]; the asynchronous tail of a committed drop is
//! carried by [`PendingCommit`].
//!
//! # Rules
//!
//! - Any ticket may be reordered within its own column.
//! - Only a ticket whose status at drag start was `pending_approval` may
//!   change column. For the others a foreign column behaves as if the pointer
//!   never left home.
//! - Every cancellation restores the sequence captured at drag start.

pub mod commit;
pub mod session;

pub use commit::{CommitResult, PendingCommit, RequestFence, RequestToken};
pub use session::{DragSession, DropPlan};

use crate::domain::{TicketId, TicketStatus};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Identifies one drag gesture in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the pointer is currently over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A column's empty area
    Column(TicketStatus),
    /// A card; `below` is set once the pointer passes the card's midpoint
    Ticket { id: TicketId, below: bool },
}

impl DropTarget {
    pub fn ticket(id: impl Into<TicketId>) -> Self {
        Self::Ticket {
            id: id.into(),
            below: false,
        }
    }

    pub fn ticket_below(id: impl Into<TicketId>) -> Self {
        Self::Ticket {
            id: id.into(),
            below: true,
        }
    }

    /// Interprets a raw hover identifier, which is either a column's status
    /// identifier or a ticket id.
    pub fn from_hover_id(hover_id: &str, below: bool) -> Self {
        match TicketStatus::from_str(hover_id) {
            Ok(status) => Self::Column(status),
            Err(_) => Self::Ticket {
                id: TicketId::new(hover_id),
                below,
            },
        }
    }
}

/// How a drag gesture ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragOutcome {
    /// Reordered within the home column (possibly to the same place)
    CommittedReorder,
    /// Moved a pending ticket to another column
    CommittedMove,
    /// Released outside any column, cancelled explicitly, or released over a
    /// column the drag never settled into
    CancelledNoTarget,
    /// Released at home after visiting another column
    CancelledIllegalReturn,
    /// A locked ticket released over a foreign column
    RejectedLocked,
}

impl DragOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::CommittedReorder | Self::CommittedMove)
    }
}

impl fmt::Display for DragOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CommittedReorder => "committed-reorder",
            Self::CommittedMove => "committed-move",
            Self::CancelledNoTarget => "cancelled-no-target",
            Self::CancelledIllegalReturn => "cancelled-illegal-return",
            Self::RejectedLocked => "rejected-locked",
        };
        f.write_str(name)
    }
}

/// Result of one hover event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOverEffect {
    /// Nothing to do: no session, drag disabled, or hovering the dragged card
    Ignored,
    /// No column could be resolved; the cached target was cleared
    TargetLost,
    /// A locked ticket over a foreign column
    Locked,
    /// Hovering inside the home column; the sequence is left alone
    SameColumn,
    /// Same target column and index as the previous hover
    Unchanged,
    /// A new provisional sequence to render
    Preview(Vec<crate::domain::Ticket>),
}

/// What [`crate::Dashboard::drag_end`] did synchronously, plus the
/// persistence work still to run
#[derive(Debug)]
pub struct DropResolution {
    pub outcome: DragOutcome,
    pub commit: Option<PendingCommit>,
}
