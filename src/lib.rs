//! # Triage Core
//!
//! Board logic for an AI support-ticket triage dashboard.
//!
//! Tickets are grouped into three status columns. Cards can be reordered
//! within a column by drag and drop, and tickets awaiting approval can be
//! dragged into another column, which changes their status. Every drop is
//! applied optimistically and then persisted through a [`Storage`] backend.

pub mod config;
pub mod dashboard;
pub mod domain;
pub mod drag;
pub mod error;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::{BackendConfig, TriageConfig};
pub use dashboard::Dashboard;
pub use domain::{
    board::{BoardConfig, Column},
    ticket::{Ticket, TicketId, TicketStatus},
};
pub use drag::{DragOutcome, DropTarget};
pub use error::{Result, TriageError};
pub use storage::Storage;
pub use store::TicketStore;
