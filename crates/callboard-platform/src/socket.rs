//! WebSocket adapter via gloo-net.
//!
//! Each connection gets a `spawn_local` pump that reads frames and hands
//! text to the frame handler until the server closes, an error occurs, or
//! the owning `BrowserConnection` signals stop.

use futures::channel::oneshot;
use futures::future::{self, Either};
use futures::StreamExt;
use gloo_net::websocket::{futures::WebSocket, Message};

use callboard_core::ports::{FrameHandler, SocketConnection, SocketPort};
use callboard_types::{DeskError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSocket;

impl BrowserSocket {
    pub fn new() -> Self {
        Self
    }
}

impl SocketPort for BrowserSocket {
    fn connect(&self, url: &str, on_frame: FrameHandler) -> Result<Box<dyn SocketConnection>> {
        let ws = WebSocket::open(url)
            .map_err(|e| DeskError::Socket(format!("{}: {}", url, e)))?;
        let (stop_tx, stop_rx) = oneshot::channel();
        wasm_bindgen_futures::spawn_local(pump(ws, on_frame, stop_rx, url.to_string()));
        Ok(Box::new(BrowserConnection {
            stop: Some(stop_tx),
        }))
    }
}

async fn pump(
    mut ws: WebSocket,
    on_frame: FrameHandler,
    mut stop: oneshot::Receiver<()>,
    url: String,
) {
    loop {
        match future::select(ws.next(), &mut stop).await {
            Either::Left((Some(Ok(Message::Text(text))), _)) => on_frame(text),
            Either::Left((Some(Ok(Message::Bytes(bytes))), _)) => match String::from_utf8(bytes) {
                Ok(text) => on_frame(text),
                Err(_) => log::warn!("Dropping non-UTF-8 binary frame from {}", url),
            },
            Either::Left((Some(Err(e)), _)) => {
                log::error!("WebSocket error on {}: {}", url, e);
                break;
            }
            Either::Left((None, _)) => {
                log::info!("WebSocket closed by server: {}", url);
                break;
            }
            // Stop requested, or the connection handle was dropped.
            Either::Right(_) => break,
        }
    }

    if let Err(e) = ws.close(None, None) {
        log::debug!("WebSocket close on {} reported: {}", url, e);
    }
}

pub struct BrowserConnection {
    stop: Option<oneshot::Sender<()>>,
}

impl SocketConnection for BrowserConnection {
    fn close(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }

    fn is_open(&self) -> bool {
        self.stop.as_ref().is_some_and(|s| !s.is_canceled())
    }
}

impl Drop for BrowserConnection {
    fn drop(&mut self) {
        self.close();
    }
}
