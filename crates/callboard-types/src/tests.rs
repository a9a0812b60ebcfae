#[cfg(test)]
mod tests {
    use crate::{DeskError, Fetched};
    use crate::call::*;
    use crate::ticket::*;
    use crate::stream::*;
    use crate::event::*;
    use crate::config::*;

    // ─── Call Tests ──────────────────────────────────────────

    #[test]
    fn test_call_session_deserialize_minimal() {
        let json = r#"{
            "call_id": "C1",
            "agent_id": "A7",
            "start_time": "2025-03-01T10:00:00Z",
            "caller_number": "+15550100",
            "last_activity": "2025-03-01T10:02:00Z",
            "duration": 120,
            "is_active": true
        }"#;
        let call: CallSession = serde_json::from_str(json).unwrap();
        assert_eq!(call.call_id, "C1");
        assert_eq!(call.duration, 120);
        assert!(call.is_active);
        assert!(call.transcript().is_empty());
        assert!(call.suggestions().is_empty());
        assert!(!call.has_ticket());
    }

    #[test]
    fn test_call_session_fractional_duration() {
        let json = r#"{"call_id": "C1", "duration": 65.4, "is_active": true}"#;
        let call: CallSession = serde_json::from_str(json).unwrap();
        assert_eq!(call.duration, 65);
        assert_eq!(call.formatted_duration(), "1:05");
        assert!(call.caller_number.is_empty());
        assert!(call.start_time.is_empty());

        let json = r#"{"call_id": "C2", "duration": -3, "is_active": false}"#;
        let call: CallSession = serde_json::from_str(json).unwrap();
        assert_eq!(call.duration, 0);

        let json = r#"{"call_id": "C3", "duration": null, "is_active": false}"#;
        let call: CallSession = serde_json::from_str(json).unwrap();
        assert_eq!(call.duration, 0);
    }

    #[test]
    fn test_ticket_tolerates_missing_detail_fields() {
        let json = r#"{"ticket_id": "T-1", "status": "pending"}"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.status, TicketStatus::Pending);
        assert!(ticket.caller_number.is_empty());
        assert!(ticket.created_at.is_empty());
    }

    #[test]
    fn test_call_session_skips_absent_optionals() {
        let call = CallSession::placeholder("C9");
        let json = serde_json::to_value(&call).unwrap();
        assert!(json.get("summary").is_none());
        assert!(json.get("transcript").is_none());
        assert_eq!(json["caller_number"], "unknown");
    }

    #[test]
    fn test_placeholder_call() {
        let call = CallSession::placeholder("C9");
        assert_eq!(call.call_id, "C9");
        assert_eq!(call.agent_id, UNKNOWN);
        assert_eq!(call.duration, 0);
        assert!(!call.is_active);
    }

    #[test]
    fn test_has_ticket_ignores_empty_id() {
        let mut call = CallSession::placeholder("C1");
        call.ticket_id = Some(String::new());
        assert!(!call.has_ticket());
        call.ticket_id = Some("T-1".to_string());
        assert!(call.has_ticket());
    }

    #[test]
    fn test_speaker_aliases() {
        let entry: TranscriptEntry =
            serde_json::from_str(r#"{"role":"customer","content":"hello"}"#).unwrap();
        assert_eq!(entry.role, Speaker::Caller);
        assert!(entry.time.is_none());

        let entry: TranscriptEntry =
            serde_json::from_str(r#"{"role":"bot","content":"..."}"#).unwrap();
        assert_eq!(entry.role, Speaker::Unknown);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(61), "1:01");
        assert_eq!(format_duration(3600), "60:00");
    }

    // ─── Ticket Tests ────────────────────────────────────────

    fn open_ticket() -> Ticket {
        serde_json::from_str(
            r#"{
                "ticket_id": "T-1234",
                "call_id": "C1",
                "agent_id": "A7",
                "caller_number": "+15550100",
                "status": "open",
                "created_at": "2025-03-01T10:00:00Z",
                "updated_at": "2025-03-01T10:00:00Z"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ticket_status_serde() {
        let ticket = open_ticket();
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.closed_at.is_none());
        let json = serde_json::to_value(TicketStatus::Pending).unwrap();
        assert_eq!(json, "pending");
    }

    #[test]
    fn test_ticket_status_closed_is_terminal() {
        assert!(TicketStatus::Open.can_transition_to(TicketStatus::Closed));
        assert!(TicketStatus::Pending.can_transition_to(TicketStatus::Open));
        assert!(!TicketStatus::Closed.can_transition_to(TicketStatus::Open));
        assert!(!TicketStatus::Closed.can_transition_to(TicketStatus::Pending));
    }

    #[test]
    fn test_mark_closed_sets_closed_at() {
        let mut ticket = open_ticket();
        ticket.mark_closed("2025-03-01T11:00:00Z").unwrap();
        assert!(ticket.is_closed());
        assert_eq!(ticket.closed_at.as_deref(), Some("2025-03-01T11:00:00Z"));
        assert_eq!(ticket.updated_at, "2025-03-01T11:00:00Z");
    }

    #[test]
    fn test_mark_closed_twice_fails() {
        let mut ticket = open_ticket();
        ticket.mark_closed("2025-03-01T11:00:00Z").unwrap();
        let err = ticket.mark_closed("2025-03-01T12:00:00Z").unwrap_err();
        assert!(matches!(err, DeskError::InvalidTransition { .. }));
        assert_eq!(ticket.closed_at.as_deref(), Some("2025-03-01T11:00:00Z"));
    }

    #[test]
    fn test_placeholder_ticket_is_not_closed() {
        let ticket = Ticket::placeholder("T-9");
        assert_eq!(ticket.status, TicketStatus::Pending);
        assert!(ticket.closed_at.is_none());
    }

    // ─── Stream Envelope Tests ───────────────────────────────

    #[test]
    fn test_envelope_transcript_update() {
        let frame = r#"{"type":"transcript_update","call_id":"C1",
            "transcript":[{"role":"agent","content":"hi"}],"is_active":true}"#;
        match StreamEnvelope::parse(frame).unwrap() {
            StreamEnvelope::TranscriptUpdate(update) => {
                assert_eq!(update.call_id, "C1");
                assert_eq!(update.transcript.len(), 1);
                assert_eq!(update.transcript[0].role, Speaker::Agent);
                assert!(update.is_active);
                assert!(update.summary.is_none());
            }
            other => panic!("unexpected envelope {:?}", other),
        }
    }

    #[test]
    fn test_envelope_unknown_tag() {
        let frame = r#"{"type":"heartbeat","call_id":"C1","seq":4}"#;
        assert_eq!(StreamEnvelope::parse(frame).unwrap(), StreamEnvelope::Unknown);
    }

    #[test]
    fn test_envelope_malformed() {
        assert!(matches!(
            StreamEnvelope::parse("{not json"),
            Err(DeskError::Parse(_))
        ));
        assert!(StreamEnvelope::parse(r#"{"call_id":"C1"}"#).is_err());
    }

    #[test]
    fn test_update_from_snapshot() {
        let mut call = CallSession::placeholder("C1");
        call.is_active = true;
        call.last_activity = "2025-03-01T10:02:00Z".to_string();
        call.transcript = Some(vec![TranscriptEntry::new(Speaker::Caller, "help")]);
        let update = TranscriptUpdate::from_snapshot(&call);
        assert_eq!(update.call_id, "C1");
        assert!(update.is_active);
        assert_eq!(update.transcript.len(), 1);
        assert_eq!(update.last_updated.as_deref(), Some("2025-03-01T10:02:00Z"));
        assert!(update.start_time.is_none());
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_default_config() {
        let config = DeskConfig::default();
        assert_eq!(config.backend.api_base, DEFAULT_API_BASE);
        assert!(!config.backend.offline);
        assert_eq!(config.stream.idle_timeout_ms, 5_000);
        assert_eq!(config.stream.max_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stream_url() {
        let backend = BackendConfig::new("http://localhost:8081/");
        assert_eq!(backend.stream_url("C1"), "ws://localhost:8081/frontend-ws/C1");
        let backend = BackendConfig::new("https://desk.example.com");
        assert_eq!(backend.stream_url("C1"), "wss://desk.example.com/frontend-ws/C1");
    }

    #[test]
    fn test_stream_url_encodes_call_id() {
        let backend = BackendConfig::default();
        assert_eq!(
            backend.stream_url("a/b?c#d"),
            "ws://localhost:8081/frontend-ws/a%2Fb%3Fc%23d"
        );
        assert_eq!(encode_segment("T-12_3.x~"), "T-12_3.x~");
        assert_eq!(encode_segment("caller 1"), "caller%201");
    }

    #[test]
    fn test_endpoint() {
        let backend = BackendConfig::new("http://localhost:8081/");
        assert_eq!(backend.endpoint("/api/tickets"), "http://localhost:8081/api/tickets");
    }

    #[test]
    fn test_config_validation() {
        let mut config = DeskConfig::default();
        config.backend.api_base = "localhost:8081".to_string();
        assert!(matches!(config.validate(), Err(DeskError::Config(_))));

        let mut config = DeskConfig::default();
        config.stream.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = DeskConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: DeskConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_request_failed_display() {
        let err = DeskError::request_failed(500, "Internal Server Error");
        assert_eq!(err.to_string(), "Request failed: 500 Internal Server Error");
        assert_eq!(err.status(), Some(500));

        let err = DeskError::network("connection refused");
        assert_eq!(err.to_string(), "Request failed: no response connection refused");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_stream_unavailable_notice() {
        let err = DeskError::StreamUnavailable {
            call_id: "C1".to_string(),
            attempts: 3,
        };
        assert!(err.notice().starts_with("Unable to load call data"));
    }

    #[test]
    fn test_from_serde_error() {
        let err: DeskError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, DeskError::Parse(_)));
    }

    // ─── Event & Fetched Tests ───────────────────────────────

    #[test]
    fn test_event_call_id() {
        let event = DeskEvent::CallUpdate(TranscriptUpdate::new("C1", true));
        assert_eq!(event.call_id(), Some("C1"));
        let event = DeskEvent::TicketClosed {
            ticket_id: "T-1".to_string(),
            closed_at: String::new(),
        };
        assert_eq!(event.call_id(), None);
    }

    #[test]
    fn test_fetched_marker() {
        let live = Fetched::Live(vec![1, 2]);
        let fallback: Fetched<Vec<i32>> = Fetched::Placeholder(Vec::new());
        assert!(!live.is_placeholder());
        assert!(fallback.is_placeholder());
        assert_eq!(live.map(|v| v.len()).into_inner(), 2);
        assert!(fallback.value().is_empty());
    }
}
