use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Unique identifier for a ticket (e.g., TKT-001)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Creates a TicketId from any non-empty string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TicketId {
    type Err = crate::error::TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::error::TriageError::InvalidTicketId(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TicketId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a ticket; each status is one column on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    AiResolved,
    PendingApproval,
    Escalated,
}

impl TicketStatus {
    /// Canonical column order, left to right
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::AiResolved,
        TicketStatus::PendingApproval,
        TicketStatus::Escalated,
    ];

    /// Wire/column identifier (`ai_resolved`, `pending_approval`, `escalated`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiResolved => "ai_resolved",
            Self::PendingApproval => "pending_approval",
            Self::Escalated => "escalated",
        }
    }

    /// Only tickets awaiting approval may leave their column.
    pub fn allows_cross_column_moves(&self) -> bool {
        matches!(self, Self::PendingApproval)
    }

    /// Checks if a ticket currently in `self` may be dropped into `target`
    pub fn can_move_to(&self, target: &TicketStatus) -> bool {
        self == target || self.allows_cross_column_moves()
    }

    /// Column position in the canonical order
    pub fn column_index(&self) -> usize {
        match self {
            Self::AiResolved => 0,
            Self::PendingApproval => 1,
            Self::Escalated => 2,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AiResolved => write!(f, "AI Resolved"),
            Self::PendingApproval => write!(f, "Pending Approval"),
            Self::Escalated => write!(f, "Escalated"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = crate::error::TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ai_resolved" => Ok(Self::AiResolved),
            "pending_approval" => Ok(Self::PendingApproval),
            "escalated" => Ok(Self::Escalated),
            _ => Err(crate::error::TriageError::InvalidStatus(s.to_string())),
        }
    }
}

/// A support ticket answered by the AI agent.
///
/// Tickets are value records: changing the status produces a new record
/// with the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub customer_name: String,
    pub issue: String,
    pub ai_response: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(
        id: TicketId,
        customer_name: impl Into<String>,
        issue: impl Into<String>,
        ai_response: impl Into<String>,
        status: TicketStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_name: customer_name.into(),
            issue: issue.into(),
            ai_response: ai_response.into(),
            status,
            created_at,
        }
    }

    /// Returns a copy of this ticket relabeled with `status`
    pub fn with_status(&self, status: TicketStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
