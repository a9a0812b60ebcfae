//! Stream client — one live-update connection per call.
//!
//! Frames are parsed into `StreamEnvelope`s. Malformed frames are logged and
//! dropped; unknown tags are dropped quietly; transcript updates go to the
//! caller's handler untouched. Retrying is the supervisor's job, not ours.

use std::rc::Rc;

use callboard_types::{
    Result,
    config::BackendConfig,
    stream::{StreamEnvelope, TranscriptUpdate},
};
use crate::ports::{FrameHandler, SocketConnection, SocketPort};

pub type UpdateHandler = Rc<dyn Fn(TranscriptUpdate)>;

pub struct StreamClient {
    socket: Rc<dyn SocketPort>,
    backend: BackendConfig,
}

impl StreamClient {
    pub fn new(socket: Rc<dyn SocketPort>, backend: BackendConfig) -> Self {
        Self { socket, backend }
    }

    pub fn url_for(&self, call_id: &str) -> String {
        self.backend.stream_url(call_id)
    }

    pub fn open(&self, call_id: &str, on_update: UpdateHandler) -> Result<StreamHandle> {
        let url = self.url_for(call_id);
        log::info!("Connecting to live updates at {}", url);

        let cid = call_id.to_string();
        let on_frame: FrameHandler = Rc::new(move |text: String| {
            if let Some(update) = decode_frame(&cid, &text) {
                on_update(update);
            }
        });

        let conn = self.socket.connect(&url, on_frame)?;
        Ok(StreamHandle {
            call_id: call_id.to_string(),
            conn: Some(conn),
        })
    }
}

/// Returns the update carried by a frame, or `None` for frames to ignore.
pub fn decode_frame(call_id: &str, text: &str) -> Option<TranscriptUpdate> {
    match StreamEnvelope::parse(text) {
        Ok(StreamEnvelope::TranscriptUpdate(update)) => Some(update),
        Ok(StreamEnvelope::Unknown) => {
            log::debug!("Ignoring non-transcript frame for call {}", call_id);
            None
        }
        Err(e) => {
            log::warn!("Dropping malformed frame for call {}: {}", call_id, e);
            None
        }
    }
}

/// An open live-update connection. Closing is idempotent, and dropping the
/// handle closes it.
pub struct StreamHandle {
    call_id: String,
    conn: Option<Box<dyn SocketConnection>>,
}

impl StreamHandle {
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn is_open(&self) -> bool {
        self.conn.as_ref().is_some_and(|c| c.is_open())
    }

    pub fn close(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            conn.close();
            log::info!("Live updates closed for call {}", self.call_id);
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.close();
    }
}
