//! Board state for one dashboard: the ticket store, the open detail view,
//! the filter, the viewport and at most one drag session.
//!
//! Drag events are applied synchronously. The persistence calls that follow a
//! committed drop are returned as [`PendingCommit`]s so callers can run them
//! off the event path and hand the [`CommitResult`] back to
//! [`Dashboard::apply_commit`]; [`Dashboard::finish_drag`] does all of it in
//! one call.

use crate::{
    config::TriageConfig,
    domain::{
        board::render_columns, filter_tickets, group_by_status, is_active_query, ordering,
        BoardConfig, ColumnView, GroupedTickets, Ticket, TicketId, TicketStatus,
    },
    drag::{
        CommitResult, DragOutcome, DragOverEffect, DragSession, DropPlan, DropResolution,
        DropTarget, PendingCommit, RequestFence, RequestToken,
    },
    error::{Result, TriageError},
    storage::Storage,
    store::TicketStore,
};
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct Dashboard {
    config: BoardConfig,
    storage: Arc<dyn Storage>,
    store: TicketStore,
    selected: Option<Ticket>,
    filter: String,
    viewport_width: Option<u32>,
    session: Option<DragSession>,
    next_token: u64,
    fence: RequestFence,
}

impl Dashboard {
    pub fn new(storage: Arc<dyn Storage>, config: BoardConfig) -> Self {
        Self {
            config,
            storage,
            store: TicketStore::new(),
            selected: None,
            filter: String::new(),
            viewport_width: None,
            session: None,
            next_token: 0,
            fence: RequestFence::new(),
        }
    }

    /// Builds a dashboard over the backend named in `config`
    pub fn from_config(config: &TriageConfig) -> Result<Self> {
        Ok(Self::new(config.open_storage()?, config.board.clone()))
    }

    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.storage)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn store(&self) -> &TicketStore {
        &self.store
    }

    pub fn tickets(&self) -> &[Ticket] {
        self.store.get_all()
    }

    pub fn columns(&self) -> GroupedTickets {
        self.store.columns()
    }

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken::new(self.next_token)
    }

    fn mirror_selected(&mut self, ticket: &Ticket) {
        if let Some(selected) = &mut self.selected {
            if selected.id == ticket.id {
                *selected = ticket.clone();
            }
        }
    }

    // ---------------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------------

    /// Replaces the board with the backend's ticket list
    pub async fn load(&mut self) -> Result<()> {
        let token = self.issue_token();
        match self
            .store
            .load(self.storage.as_ref(), &mut self.fence, token)
            .await
        {
            Ok(installed) => {
                if installed {
                    info!(count = self.store.len(), "Tickets loaded");
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to load tickets: {e}");
                Err(e)
            }
        }
    }

    /// Asks the backend to reseed its data and installs the result
    pub async fn refresh(&mut self) -> Result<()> {
        let token = self.issue_token();
        match self
            .store
            .refresh(self.storage.as_ref(), &mut self.fence, token)
            .await
        {
            Ok(installed) => {
                if installed {
                    info!(count = self.store.len(), "Tickets refreshed");
                    if let Some(id) = self.selected.as_ref().map(|t| t.id.clone()) {
                        self.selected = self.store.get(&id).cloned();
                    }
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to refresh tickets: {e}");
                Err(e)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Detail view and approval
    // ---------------------------------------------------------------------

    /// Opens the detail view for `id`; false when the ticket is unknown
    pub fn open_detail(&mut self, id: &TicketId) -> bool {
        self.selected = self.store.get(id).cloned();
        self.selected.is_some()
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Ticket> {
        self.selected.as_ref()
    }

    /// Approves or escalates a ticket through the backend.
    ///
    /// Locked tickets cannot change status. On failure local state is left
    /// untouched.
    pub async fn set_ticket_status(&mut self, id: &TicketId, status: TicketStatus) -> Result<Ticket> {
        let current = self
            .store
            .get(id)
            .ok_or_else(|| TriageError::TicketNotFound(id.to_string()))?;
        if !current.status.can_move_to(&status) {
            return Err(TriageError::InvalidTransition {
                from: current.status.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }

        let token = self.issue_token();
        match self.storage.update_ticket_status(id, status).await {
            Ok(updated) => {
                if self.fence.accept_ticket(token) {
                    self.store.replace_one(updated.clone());
                    self.mirror_selected(&updated);
                }
                info!(ticket = %id, status = status.as_str(), "Ticket status updated");
                Ok(updated)
            }
            Err(e) => {
                error!(ticket = %id, "Failed to update ticket status: {e}");
                Err(e)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Filtering and viewport
    // ---------------------------------------------------------------------

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn visible_tickets(&self) -> Vec<Ticket> {
        filter_tickets(self.store.get_all(), &self.filter)
    }

    pub fn visible_columns(&self) -> GroupedTickets {
        group_by_status(&self.visible_tickets())
    }

    pub fn set_viewport_width(&mut self, width_px: u32) {
        self.viewport_width = Some(width_px);
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport_width
            .is_some_and(|width| self.config.is_mobile_width(width))
    }

    /// Drag is off while a filter is typed or on mobile viewports
    pub fn drag_enabled(&self) -> bool {
        !is_active_query(&self.filter) && !self.is_mobile()
    }

    /// Render model of the visible board
    pub fn render(&self) -> Vec<ColumnView> {
        render_columns(&self.config, &self.visible_columns(), self.drag_enabled())
    }

    // ---------------------------------------------------------------------
    // Drag and drop
    // ---------------------------------------------------------------------

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Starts dragging `id`. Refused while drag is disabled, while another
    /// drag is active, or for an unknown ticket.
    pub fn drag_start(&mut self, id: &TicketId) -> bool {
        if !self.drag_enabled() {
            debug!(ticket = %id, "Drag refused: filtering or mobile viewport");
            return false;
        }
        if self.session.is_some() {
            debug!(ticket = %id, "Drag refused: another drag is active");
            return false;
        }

        self.session = DragSession::start(self.store.get_all().to_vec(), id);
        self.session.is_some()
    }

    /// Applies a hover event, installing any provisional sequence it yields
    pub fn drag_over(&mut self, target: Option<&DropTarget>) -> DragOverEffect {
        if !self.drag_enabled() {
            return DragOverEffect::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return DragOverEffect::Ignored;
        };

        let effect = session.drag_over(target);
        if let DragOverEffect::Preview(preview) = &effect {
            let ids = ordering::ids_of(preview);
            self.store.reorder(&ids, Some(preview.clone()));
        }
        effect
    }

    /// Drops the dragged ticket over `target`.
    ///
    /// All local changes happen before this returns; the returned commit, if
    /// any, still has to be executed. Returns `None` when no drag is active.
    pub fn drag_end(&mut self, target: Option<&DropTarget>) -> Option<DropResolution> {
        let session = self.session.take()?;
        let session_id = session.id();

        if !self.drag_enabled() {
            self.store.install(session.cancel());
            info!(session = %session_id, outcome = %DragOutcome::CancelledNoTarget, "Drag ended while disabled");
            return Some(DropResolution {
                outcome: DragOutcome::CancelledNoTarget,
                commit: None,
            });
        }

        let plan = session.finish(target);
        let outcome = plan.outcome();

        let commit = match plan {
            DropPlan::Restore { snapshot, .. } => {
                self.store.install(snapshot);
                None
            }
            DropPlan::KeepOrder { snapshot } => {
                if self.store.get_all() != snapshot.as_slice() {
                    self.store.install(snapshot);
                }
                None
            }
            DropPlan::Reject => None,
            DropPlan::Reorder { tickets } => {
                let ids = ordering::ids_of(&tickets);
                self.store.install(tickets);
                Some(PendingCommit::SaveOrder {
                    token: self.issue_token(),
                    session: session_id,
                    ids,
                })
            }
            DropPlan::Move {
                original,
                status,
                index,
            } => {
                let optimistic = original.with_status(status);
                self.store.replace_one(optimistic.clone());
                self.mirror_selected(&optimistic);
                Some(PendingCommit::MoveTicket {
                    token: self.issue_token(),
                    session: session_id,
                    original,
                    status,
                    index,
                })
            }
        };

        info!(session = %session_id, %outcome, "Drag ended");
        Some(DropResolution { outcome, commit })
    }

    /// Cancels the active drag, restoring the board as it was at drag start
    pub fn drag_cancel(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                let session_id = session.id();
                self.store.install(session.cancel());
                info!(session = %session_id, outcome = %DragOutcome::CancelledNoTarget, "Drag cancelled");
                true
            }
            None => false,
        }
    }

    /// Folds the result of a [`PendingCommit`] back into the board.
    ///
    /// Returns false when the result was discarded as stale.
    pub fn apply_commit(&mut self, result: CommitResult) -> bool {
        match result {
            CommitResult::Saved { .. } | CommitResult::SaveFailed { .. } => true,
            CommitResult::Moved {
                token,
                tickets,
                moved,
            } => {
                if !self.store.install_fenced(tickets, &mut self.fence, token) {
                    return false;
                }
                if let Some(moved) = moved {
                    self.mirror_selected(&moved);
                }
                true
            }
            CommitResult::MoveFailed {
                token, original, ..
            } => {
                // Only a newer full list supersedes the revert
                if !self.fence.accept_ticket(token) {
                    return false;
                }
                self.store.replace_one(original.clone());
                self.mirror_selected(&original);
                true
            }
        }
    }

    /// Drops, runs the persistence call and applies its result
    pub async fn finish_drag(&mut self, target: Option<&DropTarget>) -> Option<DragOutcome> {
        let DropResolution { outcome, commit } = self.drag_end(target)?;

        if let Some(commit) = commit {
            let storage = self.storage();
            let result = commit.execute(storage.as_ref()).await;
            self.apply_commit(result);
        }

        Some(outcome)
    }
}
