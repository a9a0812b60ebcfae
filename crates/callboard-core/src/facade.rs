//! Data access facade over the call-center REST API.
//!
//! Reads never fail: on any error, or in offline mode, they return a
//! documented placeholder wrapped in `Fetched::Placeholder`. Mutations have
//! no fallback and surface `RequestFailed` to the caller.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use callboard_types::{
    DeskError, Fetched, Result,
    call::CallSession,
    config::{encode_segment, BackendConfig},
    ticket::{NewTicket, Ticket},
};
use crate::ports::{HttpPort, HttpRequest, HttpResponse};

const ACTIVE_CALLS_PATH: &str = "/api/calls/active";
const TICKETS_PATH: &str = "/api/tickets";

pub struct DeskApi {
    http: Rc<dyn HttpPort>,
    backend: BackendConfig,
}

impl DeskApi {
    pub fn new(http: Rc<dyn HttpPort>, backend: BackendConfig) -> Self {
        Self { http, backend }
    }

    pub fn backend(&self) -> &BackendConfig {
        &self.backend
    }

    // ─── Reads ───────────────────────────────────────────────

    /// Active calls; empty list on failure.
    pub async fn list_active_calls(&self) -> Fetched<Vec<CallSession>> {
        self.read("list active calls", ACTIVE_CALLS_PATH, |b: CallsBody| Some(b.calls), Vec::new)
            .await
    }

    pub async fn get_call(&self, call_id: &str) -> Fetched<CallSession> {
        self.read(
            "fetch call",
            &format!("/api/calls/{}", encode_segment(call_id)),
            |b: CallBody| b.call,
            || CallSession::placeholder(call_id),
        )
        .await
    }

    /// All tickets; empty list on failure.
    pub async fn list_tickets(&self) -> Fetched<Vec<Ticket>> {
        self.read("list tickets", TICKETS_PATH, |b: TicketsBody| Some(b.tickets), Vec::new)
            .await
    }

    pub async fn get_ticket(&self, ticket_id: &str) -> Fetched<Ticket> {
        self.read(
            "fetch ticket",
            &format!("{}/{}", TICKETS_PATH, encode_segment(ticket_id)),
            |b: TicketBody| b.ticket,
            || Ticket::placeholder(ticket_id),
        )
        .await
    }

    // ─── Mutations ───────────────────────────────────────────

    pub async fn close_ticket(&self, ticket_id: &str, resolution: &str) -> Result<()> {
        self.ensure_online("close ticket")?;
        let url = self.backend.endpoint(&format!(
            "{}/{}/close",
            TICKETS_PATH,
            encode_segment(ticket_id)
        ));
        let body = serde_json::to_string(&CloseBody { resolution })?;

        let response = self.request(HttpRequest::post(url, body)).await.map_err(|e| {
            log::error!("Failed to close ticket {}: {}", ticket_id, e);
            e
        })?;

        let status = serde_json::from_str::<StatusBody>(&response.body)
            .ok()
            .and_then(|b| b.status);
        log::info!(
            "Ticket {} closed (status: {})",
            ticket_id,
            status.as_deref().unwrap_or("none")
        );
        Ok(())
    }

    /// Open a ticket for a call; returns the new ticket id.
    pub async fn create_ticket(&self, new: &NewTicket) -> Result<String> {
        self.ensure_online("create ticket")?;
        let url = self.backend.endpoint(TICKETS_PATH);
        let body = serde_json::to_string(new)?;

        let response = self.request(HttpRequest::post(url, body)).await.map_err(|e| {
            log::error!("Failed to create ticket for call {}: {}", new.call_id, e);
            e
        })?;

        let created: CreatedBody = serde_json::from_str(&response.body).unwrap_or_default();
        match (created.status.as_deref(), created.ticket_id) {
            (Some("success"), Some(ticket_id)) if !ticket_id.is_empty() => {
                log::info!("Created ticket {} for call {}", ticket_id, new.call_id);
                Ok(ticket_id)
            }
            _ => {
                log::error!("Unexpected ticket creation response: {}", response.body);
                Err(DeskError::request_failed(response.status, "invalid response format"))
            }
        }
    }

    // ─── Plumbing ────────────────────────────────────────────

    async fn read<B, T>(
        &self,
        operation: &str,
        path: &str,
        extract: impl FnOnce(B) -> Option<T>,
        fallback: impl FnOnce() -> T,
    ) -> Fetched<T>
    where
        B: DeserializeOwned,
    {
        if self.backend.offline {
            log::info!("Offline mode, returning placeholder data for {}", operation);
            return Fetched::Placeholder(fallback());
        }

        let result = self.get_json::<B>(path).await.and_then(|body| {
            extract(body).ok_or_else(|| DeskError::Parse(format!("{} response is empty", path)))
        });

        match result {
            Ok(value) => Fetched::Live(value),
            Err(e) => {
                log::warn!("Failed to {}: {}. Returning placeholder data", operation, e);
                Fetched::Placeholder(fallback())
            }
        }
    }

    async fn get_json<B: DeserializeOwned>(&self, path: &str) -> Result<B> {
        let response = self.request(HttpRequest::get(self.backend.endpoint(path))).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn request(&self, req: HttpRequest) -> Result<HttpResponse> {
        let response = self.http.send(req).await?;
        if !response.is_success() {
            return Err(DeskError::request_failed(response.status, response.status_text));
        }
        Ok(response)
    }

    fn ensure_online(&self, operation: &str) -> Result<()> {
        if self.backend.offline {
            return Err(DeskError::network(format!(
                "cannot {} while offline",
                operation
            )));
        }
        Ok(())
    }
}

// ─── API bodies ──────────────────────────────────────────────

#[derive(Deserialize)]
struct CallsBody {
    #[serde(default)]
    calls: Vec<CallSession>,
}

#[derive(Deserialize)]
struct CallBody {
    call: Option<CallSession>,
}

#[derive(Deserialize)]
struct TicketsBody {
    #[serde(default)]
    tickets: Vec<Ticket>,
}

#[derive(Deserialize)]
struct TicketBody {
    ticket: Option<Ticket>,
}

#[derive(Serialize)]
struct CloseBody<'a> {
    resolution: &'a str,
}

#[derive(Deserialize)]
struct StatusBody {
    status: Option<String>,
}

#[derive(Deserialize, Default)]
struct CreatedBody {
    status: Option<String>,
    ticket_id: Option<String>,
}
