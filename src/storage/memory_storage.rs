//! In-process storage backend.
//!
//! Holds the ticket list behind a mutex, the way a development mock API keeps
//! its state in memory. Nothing survives the process.

use crate::{
    domain::{ordering, seed, Ticket, TicketId, TicketStatus},
    error::Result,
    storage::{set_status, Storage},
};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory storage implementation
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tickets: Mutex<Vec<Ticket>>,
}

impl MemoryStorage {
    /// Creates an empty store; the demo dataset is seeded on first read
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `tickets`
    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: Mutex::new(tickets),
        }
    }

    fn seeded(tickets: &mut Vec<Ticket>) {
        if tickets.is_empty() {
            debug!("Seeding in-memory storage with demo tickets");
            *tickets = seed::demo_tickets(Utc::now());
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_tickets(&self) -> Result<Vec<Ticket>> {
        let mut tickets = self.tickets.lock().await;
        Self::seeded(&mut tickets);
        Ok(tickets.clone())
    }

    async fn update_ticket_status(&self, id: &TicketId, status: TicketStatus) -> Result<Ticket> {
        let mut tickets = self.tickets.lock().await;
        Self::seeded(&mut tickets);
        set_status(&mut tickets, id, status)
    }

    async fn reorder_tickets(&self, ids: &[TicketId]) -> Result<Vec<Ticket>> {
        let mut tickets = self.tickets.lock().await;
        Self::seeded(&mut tickets);
        *tickets = ordering::reorder_by_ids(&tickets, ids);
        Ok(tickets.clone())
    }

    async fn move_ticket_to_column(
        &self,
        id: &TicketId,
        status: TicketStatus,
        target_index: usize,
    ) -> Result<Vec<Ticket>> {
        let mut tickets = self.tickets.lock().await;
        Self::seeded(&mut tickets);
        *tickets = ordering::move_to_column(&tickets, id, status, target_index)?;
        Ok(tickets.clone())
    }

    async fn refresh_tickets(&self) -> Result<Vec<Ticket>> {
        let mut tickets = self.tickets.lock().await;
        *tickets = seed::demo_tickets(Utc::now());
        Ok(tickets.clone())
    }
}
