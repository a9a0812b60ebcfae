//! Long-lived handles returned to the page.
//!
//! Each one owns a view state object and pushes a fresh snapshot of it to a
//! JS callback after every change. Freeing the handle on the JS side drops
//! it here, which stops the underlying stream or poll loop.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use callboard_core::event_bus::EventBus;
use callboard_core::facade::DeskApi;
use callboard_core::poller::{CallPoller, PollStop};
use callboard_core::stream::UpdateHandler;
use callboard_core::supervisor::{ReconnectSupervisor, StreamEventHandler, Subscription};
use callboard_types::{DeskError, event::DeskEvent};
use callboard_view::{CallView, TicketView};

use crate::interop::{error_to_js, now, to_js};

/// Hands the current view to the page. No borrow is held during the call.
fn notify<T: Serialize>(view: &RefCell<T>, on_change: &js_sys::Function) {
    let snapshot = match to_js(&*view.borrow()) {
        Ok(value) => value,
        Err(e) => {
            log::error!("Failed to serialize view state: {:?}", e);
            return;
        }
    };
    if let Err(e) = on_change.call1(&JsValue::NULL, &snapshot) {
        log::error!("View callback threw: {:?}", e);
    }
}

// ─── Streamed call ───────────────────────────────────────────

#[wasm_bindgen]
pub struct CallWatch {
    call_id: String,
    view: Rc<RefCell<CallView>>,
    api: Rc<DeskApi>,
    supervisor: Rc<ReconnectSupervisor>,
    event_bus: EventBus,
    on_change: js_sys::Function,
    subscription: RefCell<Option<Subscription>>,
}

impl CallWatch {
    pub(crate) fn start(
        call_id: String,
        api: Rc<DeskApi>,
        supervisor: Rc<ReconnectSupervisor>,
        event_bus: EventBus,
        on_change: js_sys::Function,
    ) -> Self {
        let view = Rc::new(RefCell::new(CallView::new(call_id.clone())));

        {
            let api = api.clone();
            let view = Rc::downgrade(&view);
            let on_change = on_change.clone();
            let call_id = call_id.clone();
            spawn_local(async move {
                let fetched = api.get_call(&call_id).await;
                if let Some(view) = view.upgrade() {
                    view.borrow_mut().load(fetched);
                    notify(&view, &on_change);
                }
            });
        }

        let watch = Self {
            call_id,
            view,
            api,
            supervisor,
            event_bus,
            on_change,
            subscription: RefCell::new(None),
        };
        watch.subscribe();
        watch
    }

    fn subscribe(&self) {
        let view = Rc::downgrade(&self.view);
        let bus = self.event_bus.clone();
        let on_change = self.on_change.clone();
        let call_id = self.call_id.clone();
        let on_event: StreamEventHandler = Rc::new(move |event| {
            let event = event.into_desk_event(&call_id);
            bus.emit(event.clone());
            if let Some(view) = view.upgrade() {
                view.borrow_mut().apply(&event);
                notify(&view, &on_change);
            }
        });
        let subscription = self.supervisor.supervise(&self.call_id, on_event);
        // Replacing the old subscription drops it, which cancels it.
        self.subscription.replace(Some(subscription));
    }
}

#[wasm_bindgen]
impl CallWatch {
    #[wasm_bindgen(getter, js_name = callId)]
    pub fn call_id(&self) -> String {
        self.call_id.clone()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&*self.view.borrow())
    }

    /// Stops live updates. The last known state stays readable.
    pub fn cancel(&self) {
        let subscription = self.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }

    /// Starts a new supervised stream after the previous one gave up.
    /// Returns `false` when there is nothing to retry. The page callback
    /// runs before this returns and may call back into the handle.
    pub fn retry(&self) -> bool {
        if !self.view.borrow().can_retry() {
            return false;
        }
        self.view.borrow_mut().reset_for_retry();
        notify(&self.view, &self.on_change);
        self.subscribe();
        true
    }

    /// "Convert to ticket". Resolves to the new ticket id.
    #[wasm_bindgen(js_name = createTicket)]
    pub fn create_ticket(&self) -> js_sys::Promise {
        let request = self.view.borrow_mut().begin_create_ticket();
        let api = self.api.clone();
        let bus = self.event_bus.clone();
        let view = self.view.clone();
        let on_change = self.on_change.clone();
        future_to_promise(async move {
            let Some(new) = request else {
                return Err(error_to_js(&DeskError::Config(
                    "this call cannot be converted to a ticket right now".to_string(),
                )));
            };
            notify(&view, &on_change);
            let result = api.create_ticket(&new).await;
            view.borrow_mut().finish_create_ticket(&result);
            notify(&view, &on_change);
            match result {
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
}

// ─── Polled call ─────────────────────────────────────────────

#[wasm_bindgen]
pub struct CallPoll {
    view: Rc<RefCell<CallView>>,
    stop: PollStop,
    staleness_ms: u32,
}

impl CallPoll {
    pub(crate) fn start(
        call_id: String,
        poller: Rc<CallPoller>,
        event_bus: EventBus,
        on_change: js_sys::Function,
    ) -> Self {
        let view = Rc::new(RefCell::new(CallView::new(call_id.clone())));
        let stop = PollStop::new();
        let staleness_ms = poller.staleness_ms();

        let on_update: UpdateHandler = {
            let view = Rc::downgrade(&view);
            let bus = event_bus.clone();
            let on_change = on_change.clone();
            Rc::new(move |update| {
                let event = DeskEvent::CallUpdate(update);
                bus.emit(event.clone());
                if let Some(view) = view.upgrade() {
                    view.borrow_mut().apply(&event);
                    notify(&view, &on_change);
                }
            })
        };

        {
            let view = Rc::downgrade(&view);
            let stop = stop.clone();
            spawn_local(async move {
                let delivered = poller.run(&call_id, on_update, stop.clone()).await;
                log::debug!("Polling for call {} finished after {} snapshots", call_id, delivered);
                if stop.is_stopped() {
                    return;
                }
                let event = DeskEvent::StreamEnded { call_id };
                event_bus.emit(event.clone());
                if let Some(view) = view.upgrade() {
                    view.borrow_mut().apply(&event);
                    notify(&view, &on_change);
                }
            });
        }

        Self {
            view,
            stop,
            staleness_ms,
        }
    }
}

#[wasm_bindgen]
impl CallPoll {
    /// Worst-case age of the displayed data.
    #[wasm_bindgen(getter, js_name = stalenessMs)]
    pub fn staleness_ms(&self) -> u32 {
        self.staleness_ms
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&*self.view.borrow())
    }

    pub fn cancel(&self) {
        self.stop.stop();
    }
}

impl Drop for CallPoll {
    fn drop(&mut self) {
        self.stop.stop();
    }
}

// ─── Ticket detail ───────────────────────────────────────────

#[wasm_bindgen]
pub struct TicketDesk {
    view: Rc<RefCell<TicketView>>,
    api: Rc<DeskApi>,
    event_bus: EventBus,
    on_change: js_sys::Function,
}

impl TicketDesk {
    pub(crate) fn start(
        ticket_id: String,
        api: Rc<DeskApi>,
        event_bus: EventBus,
        on_change: js_sys::Function,
    ) -> Self {
        let view = Rc::new(RefCell::new(TicketView::new(ticket_id.clone())));
        {
            let api = api.clone();
            let view = Rc::downgrade(&view);
            let on_change = on_change.clone();
            spawn_local(async move {
                let fetched = api.get_ticket(&ticket_id).await;
                if let Some(view) = view.upgrade() {
                    view.borrow_mut().load(fetched);
                    notify(&view, &on_change);
                }
            });
        }
        Self {
            view,
            api,
            event_bus,
            on_change,
        }
    }
}

#[wasm_bindgen]
impl TicketDesk {
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&*self.view.borrow())
    }

    /// Submits the close dialog. A failure leaves the ticket as it was and
    /// the dialog open for another attempt.
    pub fn close(&self, resolution: String) -> js_sys::Promise {
        let (ticket_id, resolution) = {
            let mut view = self.view.borrow_mut();
            let ticket_id = view.ticket_id.clone();
            (ticket_id, view.begin_close(resolution))
        };
        let api = self.api.clone();
        let bus = self.event_bus.clone();
        let view = self.view.clone();
        let on_change = self.on_change.clone();
        future_to_promise(async move {
            let Some(resolution) = resolution else {
                return Err(error_to_js(&DeskError::Config(format!(
                    "ticket {} cannot be closed right now",
                    ticket_id
                ))));
            };
            notify(&view, &on_change);
            let result = api.close_ticket(&ticket_id, &resolution).await;
            let closed_at = now();
            view.borrow_mut().finish_close(&result, &closed_at);
            notify(&view, &on_change);
            match result {
                Ok(()) => {
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
}
