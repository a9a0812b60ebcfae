//! JSON bridging between Rust values and the page.

use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::JsValue;

use callboard_core::filter::ListFilter;
use callboard_types::{DeskError, Fetched, ticket::TicketStatus};

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value).map_err(|e| error_to_js(&DeskError::from(e)))?;
    js_sys::JSON::parse(&text)
}

#[derive(Serialize)]
struct FetchedBody<'a, T> {
    placeholder: bool,
    data: &'a T,
}

/// `{ placeholder, data }` so the page can badge fallback content.
pub(crate) fn fetched_to_js<T: Serialize>(fetched: &Fetched<T>) -> Result<JsValue, JsValue> {
    to_js(&FetchedBody {
        placeholder: fetched.is_placeholder(),
        data: fetched.value(),
    })
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    notice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

/// Rejection value for failed promises.
pub(crate) fn error_to_js(error: &DeskError) -> JsValue {
    let body = ErrorBody {
        message: error.to_string(),
        notice: error.notice(),
        status: error.status(),
    };
    serde_json::to_string(&body)
        .ok()
        .and_then(|text| js_sys::JSON::parse(&text).ok())
        .unwrap_or_else(|| JsValue::from_str(&body.notice))
}

pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Builds a list filter from optional page inputs. Dates are `YYYY-MM-DD`.
pub(crate) fn parse_filter(
    query: Option<String>,
    date: Option<String>,
    status: Option<String>,
) -> Result<ListFilter, DeskError> {
    let on_date = match date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => Some(
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|e| DeskError::Parse(format!("invalid date '{}': {}", d, e)))?,
        ),
        None => None,
    };
    let status = match status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Some(
            serde_json::from_value::<TicketStatus>(serde_json::Value::String(s.to_lowercase()))
                .map_err(|_| DeskError::Parse(format!("unknown ticket status '{}'", s)))?,
        ),
        None => None,
    };
    Ok(ListFilter {
        query: query.unwrap_or_default(),
        on_date,
        status,
    })
}
