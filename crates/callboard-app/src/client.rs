use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use callboard_core::event_bus::EventBus;
use callboard_core::facade::DeskApi;
use callboard_core::poller::CallPoller;
use callboard_core::ports::{HttpPort, SleepPort, SocketPort, TimerPort};
use callboard_core::stream::StreamClient;
use callboard_core::supervisor::ReconnectSupervisor;
use callboard_platform::{BrowserSocket, BrowserTimers, FetchHttp};
use callboard_types::{
    config::{BackendConfig, DeskConfig},
    event::DeskEvent,
    ticket::NewTicket,
};
use callboard_view::{CallListView, TicketListView};

use crate::interop::{error_to_js, fetched_to_js, now, parse_filter, to_js};
use crate::watch::{CallPoll, CallWatch, TicketDesk};

/// Handle the page holds for the lifetime of the dashboard
#[wasm_bindgen]
pub struct DeskClient {
    config: DeskConfig,
    api: Rc<DeskApi>,
    supervisor: Rc<ReconnectSupervisor>,
    poller: Rc<CallPoller>,
    event_bus: EventBus,
}

#[derive(Serialize)]
struct ListBody<'a, T> {
    placeholder: bool,
    items: Vec<&'a T>,
}

#[wasm_bindgen]
impl DeskClient {
    /// `api_base` and `offline` override the values baked in at build time.
    #[wasm_bindgen(constructor)]
    pub fn new(api_base: Option<String>, offline: Option<bool>) -> Result<DeskClient, JsValue> {
        let mut config = DeskConfig::from_build_env();
        if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
            config.backend = BackendConfig {
                offline: config.backend.offline,
                ..BackendConfig::new(base.trim())
            };
        }
        if let Some(offline) = offline {
            config.backend.offline = offline;
        }
        config.validate().map_err(|e| error_to_js(&e))?;
        Ok(Self::with_config(config))
    }

    #[wasm_bindgen(getter, js_name = apiBase)]
    pub fn api_base(&self) -> String {
        self.config.backend.api_base.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn offline(&self) -> bool {
        self.config.backend.offline
    }

    // ─── Reads ───────────────────────────────────────────────

    /// Resolves to `{ placeholder, items }` after filtering.
    #[wasm_bindgen(js_name = activeCalls)]
    pub fn active_calls(&self, query: Option<String>, date: Option<String>) -> js_sys::Promise {
        let api = self.api.clone();
        future_to_promise(async move {
            let mut view = CallListView::new();
            view.filter = parse_filter(query, date, None).map_err(|e| error_to_js(&e))?;
            view.load(api.list_active_calls().await);
            to_js(&ListBody {
                placeholder: view.placeholder,
                items: view.visible(),
            })
        })
    }

    pub fn tickets(
        &self,
        query: Option<String>,
        date: Option<String>,
        status: Option<String>,
    ) -> js_sys::Promise {
        let api = self.api.clone();
        future_to_promise(async move {
            let mut view = TicketListView::new();
            view.filter = parse_filter(query, date, status).map_err(|e| error_to_js(&e))?;
            view.load(api.list_tickets().await);
            to_js(&ListBody {
                placeholder: view.placeholder,
                items: view.visible(),
            })
        })
    }

    /// Resolves to `{ placeholder, data }`.
    pub fn call(&self, call_id: String) -> js_sys::Promise {
        let api = self.api.clone();
        future_to_promise(async move { fetched_to_js(&api.get_call(&call_id).await) })
    }

    pub fn ticket(&self, ticket_id: String) -> js_sys::Promise {
        let api = self.api.clone();
        future_to_promise(async move { fetched_to_js(&api.get_ticket(&ticket_id).await) })
    }

    // ─── Mutations ───────────────────────────────────────────

    /// Resolves to the close timestamp, rejects with `{ message, notice, status }`.
    #[wasm_bindgen(js_name = closeTicket)]
    pub fn close_ticket(&self, ticket_id: String, resolution: String) -> js_sys::Promise {
        let api = self.api.clone();
        let bus = self.event_bus.clone();
        future_to_promise(async move {
            match api.close_ticket(&ticket_id, &resolution).await {
                Ok(()) => {
                    let closed_at = now();
                    bus.emit(DeskEvent::TicketClosed {
                        ticket_id,
                        closed_at: closed_at.clone(),
                    });
                    Ok(JsValue::from_str(&closed_at))
                }
                Err(e) => {
                    bus.emit(DeskEvent::RequestFailed {
                        operation: "close ticket".to_string(),
                        notice: e.notice(),
                    });
                    Err(error_to_js(&e))
                }
            }
        })
    }

    /// Resolves to the new ticket id.
    #[wasm_bindgen(js_name = createTicket)]
    pub fn create_ticket(
        &self,
        call_id: String,
        agent_id: String,
        caller_number: String,
    ) -> js_sys::Promise {
        let api = self.api.clone();
        let bus = self.event_bus.clone();
        future_to_promise(async move {
            let new = NewTicket {
                call_id,
                agent_id,
                caller_number,
            };
            match api.create_ticket(&new).await {
                Ok(ticket_id) => {
                    bus.emit(DeskEvent::TicketCreated {
                        call_id: new.call_id,
                        ticket_id: ticket_id.clone(),
                    });
                    Ok(JsValue::from_str(&ticket_id))
                }
                Err(e) => {
                    bus.emit(DeskEvent::RequestFailed {
                        operation: "create ticket".to_string(),
                        notice: e.notice(),
                    });
                    Err(error_to_js(&e))
                }
            }
        })
    }

    // ─── Live views ──────────────────────────────────────────

    /// Fetches the call, then follows it over the supervised stream.
    /// `on_change` receives the whole call view after every change.
    #[wasm_bindgen(js_name = watchCall)]
    pub fn watch_call(&self, call_id: String, on_change: js_sys::Function) -> CallWatch {
        CallWatch::start(
            call_id,
            self.api.clone(),
            self.supervisor.clone(),
            self.event_bus.clone(),
            on_change,
        )
    }

    /// Same as `watchCall` but re-fetches on an interval instead of streaming.
    #[wasm_bindgen(js_name = pollCall)]
    pub fn poll_call(&self, call_id: String, on_change: js_sys::Function) -> CallPoll {
        CallPoll::start(call_id, self.poller.clone(), self.event_bus.clone(), on_change)
    }

    #[wasm_bindgen(js_name = openTicket)]
    pub fn open_ticket(&self, ticket_id: String, on_change: js_sys::Function) -> TicketDesk {
        TicketDesk::start(ticket_id, self.api.clone(), self.event_bus.clone(), on_change)
    }

    /// Everything published on the bus since the last drain.
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<JsValue, JsValue> {
        to_js(&self.event_bus.drain())
    }
}

impl DeskClient {
    fn with_config(config: DeskConfig) -> Self {
        log::info!(
            "Dashboard backend {} (offline: {})",
            config.backend.api_base,
            config.backend.offline
        );
        let http: Rc<dyn HttpPort> = Rc::new(FetchHttp::new());
        let socket: Rc<dyn SocketPort> = Rc::new(BrowserSocket::new());
        let browser_timers = Rc::new(BrowserTimers::new());
        let timers: Rc<dyn TimerPort> = browser_timers.clone();
        let sleeper: Rc<dyn SleepPort> = browser_timers;

        let api = Rc::new(DeskApi::new(http, config.backend.clone()));
        let client = Rc::new(StreamClient::new(socket, config.backend.clone()));
        let supervisor = Rc::new(ReconnectSupervisor::new(client, timers, config.stream.clone()));
        let poller = Rc::new(CallPoller::new(api.clone(), sleeper, &config.poll));

        Self {
            config,
            api,
            supervisor,
            poller,
            event_bus: EventBus::new(),
        }
    }
}
