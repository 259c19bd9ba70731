use crate::{
    domain::{Ticket, TicketId, TicketStatus},
    drag::SessionId,
    error::TriageError,
    storage::Storage,
};
use std::fmt;
use tracing::{debug, error, warn};

/// Monotonic tag on every asynchronous persistence call.
///
/// A result is only applied when no result with a newer token has been
/// applied before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Decides which persistence results may still be applied.
///
/// A full-sequence install (load, refresh, completed move) replaces every
/// ticket, so it is dropped once any newer result has landed. A single-ticket
/// update only loses to a newer full-sequence install.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFence {
    latest: Option<RequestToken>,
    latest_sequence: Option<RequestToken>,
}

impl RequestFence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a full-sequence result; false when it is stale
    pub fn accept_sequence(&mut self, token: RequestToken) -> bool {
        if self.latest.is_some_and(|latest| latest > token) {
            debug!(%token, "Discarding stale ticket list");
            return false;
        }
        self.latest = Some(token);
        self.latest_sequence = Some(token);
        true
    }

    /// Records a single-ticket result; false when a newer list replaced it
    pub fn accept_ticket(&mut self, token: RequestToken) -> bool {
        if self.latest_sequence.is_some_and(|latest| latest > token) {
            debug!(%token, "Discarding stale ticket update");
            return false;
        }
        self.latest = self.latest.max(Some(token));
        true
    }
}

/// Persistence still owed by a committed drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingCommit {
    /// Save the global order after a same-column reorder
    SaveOrder {
        token: RequestToken,
        session: SessionId,
        ids: Vec<TicketId>,
    },
    /// Move a ticket to another column; `original` is the compensation
    MoveTicket {
        token: RequestToken,
        session: SessionId,
        original: Ticket,
        status: TicketStatus,
        index: usize,
    },
}

/// Outcome of running a [`PendingCommit`]
#[derive(Debug)]
pub enum CommitResult {
    Saved {
        token: RequestToken,
    },
    /// The local order stays as it is
    SaveFailed {
        token: RequestToken,
        error: TriageError,
    },
    /// The backend's sequence becomes canonical
    Moved {
        token: RequestToken,
        tickets: Vec<Ticket>,
        moved: Option<Ticket>,
    },
    /// Only the moved ticket is reverted to `original`
    MoveFailed {
        token: RequestToken,
        original: Ticket,
        error: TriageError,
    },
}

impl CommitResult {
    pub fn token(&self) -> RequestToken {
        match self {
            Self::Saved { token }
            | Self::SaveFailed { token, .. }
            | Self::Moved { token, .. }
            | Self::MoveFailed { token, .. } => *token,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved { .. } | Self::Moved { .. })
    }
}

impl PendingCommit {
    pub fn token(&self) -> RequestToken {
        match self {
            Self::SaveOrder { token, .. } | Self::MoveTicket { token, .. } => *token,
        }
    }

    /// Runs the persistence call. Errors are logged and returned as values.
    pub async fn execute(self, storage: &dyn Storage) -> CommitResult {
        match self {
            Self::SaveOrder {
                token,
                session,
                ids,
            } => match storage.reorder_tickets(&ids).await {
                Ok(_) => {
                    debug!(%session, %token, "Ticket order saved");
                    CommitResult::Saved { token }
                }
                Err(e) => {
                    warn!(%session, %token, "Failed to save ticket order: {e}");
                    CommitResult::SaveFailed { token, error: e }
                }
            },
            Self::MoveTicket {
                token,
                session,
                original,
                status,
                index,
            } => match storage
                .move_ticket_to_column(&original.id, status, index)
                .await
            {
                Ok(tickets) => {
                    debug!(%session, %token, ticket = %original.id, "Ticket moved");
                    let moved = tickets.iter().find(|t| t.id == original.id).cloned();
                    CommitResult::Moved {
                        token,
                        tickets,
                        moved,
                    }
                }
                Err(e) => {
                    error!(%session, %token, ticket = %original.id, "Failed to move ticket: {e}");
                    CommitResult::MoveFailed {
                        token,
                        original,
                        error: e,
                    }
                }
            },
        }
    }
}
