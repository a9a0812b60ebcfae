//! HTTP adapter over browser `fetch()` via gloo-net.

use async_trait::async_trait;
use gloo_net::http::Request;

use callboard_core::ports::{HttpMethod, HttpPort, HttpRequest, HttpResponse};
use callboard_types::{DeskError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttp;

impl FetchHttp {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl HttpPort for FetchHttp {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse> {
        let builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
        }
        .header("Content-Type", "application/json")
        .header("Accept", "application/json");

        let sent = match req.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| DeskError::network(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        };

        let response = sent.map_err(|e| {
            log::debug!("fetch {} failed: {}", req.url, e);
            DeskError::network(e.to_string())
        })?;

        let status = response.status();
        let status_text = response.status_text();
        let body = response.text().await.unwrap_or_else(|e| {
            log::warn!("Could not read body of {}: {}", req.url, e);
            String::new()
        });

        Ok(HttpResponse {
            status,
            status_text,
            body,
        })
    }
}
