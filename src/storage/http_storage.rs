//! Remote storage backend talking to the ticket REST API.
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list | `GET /tickets` |
//! | update status | `PATCH /tickets/{id}` with `{"status"}` |
//! | reorder | `POST /tickets/reorder` with `{"ticketIds"}` |
//! | move | `POST /tickets/{id}/move` with `{"status", "targetIndex"}` |
//! | refresh | `POST /tickets/refresh`, answered with `{"message", "tickets"}` |

use crate::{
    domain::{Ticket, TicketId, TicketStatus},
    error::{Result, TriageError},
    storage::Storage,
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct StatusBody {
    status: TicketStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReorderBody<'a> {
    ticket_ids: &'a [TicketId],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveBody {
    status: TicketStatus,
    target_index: usize,
}

#[derive(Deserialize)]
struct RefreshResponse {
    tickets: Vec<Ticket>,
}

/// HTTP client for a remote ticket API
pub struct HttpStorage {
    client: Client,
    base_url: Url,
}

impl HttpStorage {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(TriageError::ConfigError("HTTP base URL is empty".to_string()));
        }
        let base_url = Url::parse(&base_url)
            .map_err(|e| TriageError::ConfigError(format!("invalid HTTP base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TriageError::ConfigError(format!(
                "{base_url} cannot be used as an HTTP base URL"
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Appends `segments` to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TriageError::ConfigError(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Maps non-success responses onto crate errors
    async fn check(response: Response, ticket: Option<&TicketId>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        debug!("Request to {url} failed with {status}: {body}");

        match (status, ticket) {
            (StatusCode::NOT_FOUND, Some(id)) => Err(TriageError::TicketNotFound(id.to_string())),
            _ => Err(TriageError::Http(format!("{url} returned {status}"))),
        }
    }
}

#[async_trait]
impl Storage for HttpStorage {
    async fn get_tickets(&self) -> Result<Vec<Ticket>> {
        let response = self.client.get(self.endpoint(&["tickets"])?).send().await?;
        let response = Self::check(response, None).await?;
        Ok(response.json().await?)
    }

    async fn update_ticket_status(&self, id: &TicketId, status: TicketStatus) -> Result<Ticket> {
        let response = self
            .client
            .patch(self.endpoint(&["tickets", id.as_str()])?)
            .json(&StatusBody { status })
            .send()
            .await?;
        let response = Self::check(response, Some(id)).await?;
        Ok(response.json().await?)
    }

    async fn reorder_tickets(&self, ids: &[TicketId]) -> Result<Vec<Ticket>> {
        let response = self
            .client
            .post(self.endpoint(&["tickets", "reorder"])?)
            .json(&ReorderBody { ticket_ids: ids })
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        Ok(response.json().await?)
    }

    async fn move_ticket_to_column(
        &self,
        id: &TicketId,
        status: TicketStatus,
        target_index: usize,
    ) -> Result<Vec<Ticket>> {
        let response = self
            .client
            .post(self.endpoint(&["tickets", id.as_str(), "move"])?)
            .json(&MoveBody {
                status,
                target_index,
            })
            .send()
            .await?;
        let response = Self::check(response, Some(id)).await?;
        Ok(response.json().await?)
    }

    async fn refresh_tickets(&self) -> Result<Vec<Ticket>> {
        let response = self.client.post(self.endpoint(&["tickets", "refresh"])?).send().await?;
        let response = Self::check(response, None).await?;
        let body: RefreshResponse = response.json().await?;
        Ok(body.tickets)
    }
}
