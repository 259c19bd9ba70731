use crate::{
    domain::{ordering, seed, Ticket, TicketId, TicketStatus},
    error::Result,
    storage::{decode_tickets, set_status, Storage, TICKETS_KEY},
};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::{debug, error};

/// File-based storage implementation
///
/// A small local key-value store: each key is one JSON document under the
/// project's `.triage` directory. The ticket list lives under
/// [`TICKETS_KEY`].
pub struct FileStorage {
    root_path: PathBuf,
    // Serializes read-modify-write cycles against the same file.
    write_lock: Mutex<()>,
}

impl FileStorage {
    const TRIAGE_DIR: &'static str = ".triage";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::TRIAGE_DIR),
            write_lock: Mutex::new(()),
        }
    }

    fn key_file(&self, key: &str) -> PathBuf {
        self.root_path.join(format!("{key}.json"))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    async fn read_tickets(&self) -> Result<Option<Vec<Ticket>>> {
        let file_path = self.key_file(TICKETS_KEY);
        if !file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path).await?;
        match decode_tickets(&contents) {
            Ok(tickets) if tickets.is_empty() => Ok(None),
            Ok(tickets) => Ok(Some(tickets)),
            Err(e) => {
                error!("Error reading tickets from {}: {e}", file_path.display());
                Ok(None)
            }
        }
    }

    async fn write_tickets(&self, tickets: &[Ticket]) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        let json = serde_json::to_string_pretty(tickets)?;
        fs::write(self.key_file(TICKETS_KEY), json).await?;
        Ok(())
    }

    /// Reads the stored list, seeding the demo dataset when nothing usable is stored
    async fn load_or_seed(&self) -> Result<Vec<Ticket>> {
        if let Some(tickets) = self.read_tickets().await? {
            return Ok(tickets);
        }

        debug!("Seeding {} with demo tickets", self.root_path.display());
        let tickets = seed::demo_tickets(Utc::now());
        self.write_tickets(&tickets).await?;
        Ok(tickets)
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get_tickets(&self) -> Result<Vec<Ticket>> {
        let _guard = self.write_lock.lock().await;
        self.load_or_seed().await
    }

    async fn update_ticket_status(&self, id: &TicketId, status: TicketStatus) -> Result<Ticket> {
        let _guard = self.write_lock.lock().await;
        let mut tickets = self.load_or_seed().await?;

        let updated = set_status(&mut tickets, id, status)?;
        self.write_tickets(&tickets).await?;
        Ok(updated)
    }

    async fn reorder_tickets(&self, ids: &[TicketId]) -> Result<Vec<Ticket>> {
        let _guard = self.write_lock.lock().await;
        let tickets = self.load_or_seed().await?;

        let reordered = ordering::reorder_by_ids(&tickets, ids);
        self.write_tickets(&reordered).await?;
        Ok(reordered)
    }

    async fn move_ticket_to_column(
        &self,
        id: &TicketId,
        status: TicketStatus,
        target_index: usize,
    ) -> Result<Vec<Ticket>> {
        let _guard = self.write_lock.lock().await;
        let tickets = self.load_or_seed().await?;

        let moved = ordering::move_to_column(&tickets, id, status, target_index)?;
        self.write_tickets(&moved).await?;
        Ok(moved)
    }

    async fn refresh_tickets(&self) -> Result<Vec<Ticket>> {
        let _guard = self.write_lock.lock().await;
        let tickets = seed::demo_tickets(Utc::now());
        self.write_tickets(&tickets).await?;
        Ok(tickets)
    }
}
