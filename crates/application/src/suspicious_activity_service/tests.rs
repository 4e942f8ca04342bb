use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use finguard_core::AppResult;
use finguard_domain::{SecurityEventType, Severity, ThreatCategory, ThreatSignature};

use crate::clock::ManualClock;
use crate::security_event_service::{SecurityEventReceiver, security_event_channel};

use super::{SuspiciousActivityConfig, SuspiciousActivityService};

fn detector() -> AppResult<(SuspiciousActivityService, Arc<ManualClock>, SecurityEventReceiver)> {
    let start = Utc
        .with_ymd_and_hms(2026, 10, 19, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    let clock = Arc::new(ManualClock::new(start));
    let (publisher, receiver) = security_event_channel();
    let service = SuspiciousActivityService::new(
        SuspiciousActivityConfig::default(),
        clock.clone(),
        publisher,
    )?;
    Ok((service, clock, receiver))
}

fn drain(receiver: &mut SecurityEventReceiver) -> Vec<(SecurityEventType, Severity)> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push((event.event_type, event.severity));
    }
    events
}

#[test]
fn every_signature_category_is_detected_once() -> AppResult<()> {
    let payloads = [
        ("javascript_uri", "<a href=\"JavaScript:alert(1)\">"),
        ("script_tag", "<SCRIPT>alert(1)</SCRIPT>"),
        ("eval_call", "eval (atob('x'))"),
        ("union_select", "1 UNION SELECT password FROM users"),
        ("drop_table", "x'; DROP TABLE transactions; --"),
        ("delete_from", "delete from accounts"),
        ("insert_into", "Insert Into admins values (1)"),
        ("update_set", "UPDATE users SET role = 'admin'"),
        ("update_set", "update set balance=0"),
        ("update_set", "x'; UPDATE SET role='admin'"),
        ("proto_token", "{\"__proto__\": {\"admin\": true}}"),
        ("constructor_token", "a.constructor.prototype"),
    ];

    for (expected, payload) in payloads {
        let (service, _clock, _events) = detector()?;
        assert_eq!(
            service.scan(payload).map(|signature| signature.name),
            Some(expected),
            "payload {payload:?}"
        );
        assert!(service.detect_bypass_attempt(payload, "user-1", "transaction_form"));
        assert_eq!(
            service.suspicion_record("user-1").map(|record| record.count),
            Some(1)
        );
    }

    Ok(())
}

#[test]
fn benign_text_leaves_no_record() -> AppResult<()> {
    let (service, _clock, mut events) = detector()?;

    for input in [
        "Grocery shopping at SuperMart",
        "Update budget settings for October",
        "Update budget settings",
        "Please update the settlement date",
        "Selected union dues",
        "Evaluation fee",
    ] {
        assert!(!service.detect_bypass_attempt(input, "user-2", "transaction_form"));
    }

    assert!(service.suspicion_record("user-2").is_none());
    assert!(drain(&mut events).is_empty());
    Ok(())
}

#[test]
fn repeated_benign_input_never_blocks() -> AppResult<()> {
    let (service, _clock, _events) = detector()?;

    for _ in 0..100 {
        service.detect_bypass_attempt("Monthly rent", "user-3", "transaction_form");
    }

    assert!(!service.is_user_blocked("user-3"));
    assert_eq!(service.security_metrics(Some("user-3")).total_suspicious_activities, 0);
    Ok(())
}

#[test]
fn script_payload_counts_one_activity() -> AppResult<()> {
    let (service, _clock, _events) = detector()?;

    assert!(service.detect_bypass_attempt("<script>alert(1)</script>", "user-7", "signup_form"));
    assert_eq!(
        service
            .security_metrics(Some("user-7"))
            .total_suspicious_activities,
        1
    );
    Ok(())
}

#[test]
fn three_hits_within_an_hour_block_the_user() -> AppResult<()> {
    let (service, clock, mut events) = detector()?;

    assert!(service.detect_bypass_attempt("<script>", "user-8", "form"));
    clock.advance(Duration::minutes(20));
    assert!(service.detect_bypass_attempt("drop table x", "user-8", "form"));
    assert!(!service.is_user_blocked("user-8"));
    clock.advance(Duration::minutes(20));
    assert!(service.detect_bypass_attempt("__proto__", "user-8", "form"));
    assert!(service.is_user_blocked("user-8"));

    // Detection keeps working after the block and the block is sticky.
    clock.advance(Duration::hours(5));
    assert!(service.detect_bypass_attempt("eval(1)", "user-8", "form"));
    assert!(service.is_user_blocked("user-8"));

    let emitted = drain(&mut events);
    assert_eq!(
        emitted,
        vec![
            (SecurityEventType::SuspiciousActivity, Severity::High),
            (SecurityEventType::SuspiciousActivity, Severity::High),
            (SecurityEventType::SuspiciousActivity, Severity::High),
            (SecurityEventType::BypassAttempt, Severity::Critical),
            (SecurityEventType::SuspiciousActivity, Severity::High),
        ]
    );
    Ok(())
}

#[test]
fn hits_spread_beyond_the_window_do_not_block() -> AppResult<()> {
    let (service, clock, _events) = detector()?;

    service.detect_bypass_attempt("<script>", "user-9", "form");
    clock.advance(Duration::minutes(40));
    service.detect_bypass_attempt("<script>", "user-9", "form");
    clock.advance(Duration::minutes(40));
    service.detect_bypass_attempt("<script>", "user-9", "form");

    // First hit fell out of the trailing hour.
    assert!(!service.is_user_blocked("user-9"));
    assert_eq!(
        service.suspicion_record("user-9").map(|record| record.hits_in_window()),
        Some(2)
    );

    clock.advance(Duration::minutes(10));
    service.detect_bypass_attempt("<script>", "user-9", "form");
    assert!(service.is_user_blocked("user-9"));
    Ok(())
}

#[test]
fn suspicion_event_never_carries_the_payload() -> AppResult<()> {
    let (service, _clock, mut events) = detector()?;
    let payload = "<script>steal(document.cookie)</script>";

    service.detect_bypass_attempt(payload, "user-10", "notes_field");

    let event = events.try_recv().ok();
    let serialized = event
        .as_ref()
        .and_then(|event| serde_json::to_string(event).ok())
        .unwrap_or_default();
    assert!(!serialized.is_empty());
    assert!(!serialized.contains("steal"));
    assert!(serialized.contains("[REDACTED]"));
    assert_eq!(
        event.and_then(|event| event.context),
        Some("notes_field".to_owned())
    );
    Ok(())
}

#[test]
fn unknown_user_is_not_blocked() -> AppResult<()> {
    let (service, _clock, _events) = detector()?;
    assert!(!service.is_user_blocked("nobody"));
    Ok(())
}

#[test]
fn metrics_aggregate_across_users() -> AppResult<()> {
    let (service, clock, _events) = detector()?;

    for _ in 0..3 {
        service.detect_bypass_attempt("<script>", "user-a", "form");
    }
    service.detect_bypass_attempt("1 union select 2", "user-b", "form");
    clock.advance(Duration::hours(25));
    service.detect_bypass_attempt("drop table t", "user-c", "form");

    let metrics = service.security_metrics(None);
    assert_eq!(metrics.total_suspicious_activities, 5);
    assert_eq!(metrics.blocked_users, 1);
    assert_eq!(metrics.recent_attempts, 1);
    assert_eq!(
        metrics.top_threats.first().map(|threat| (threat.signature.as_str(), threat.count)),
        Some(("script_tag", 3))
    );
    assert_eq!(metrics.top_threats.len(), 3);

    let single = service.security_metrics(Some("user-b"));
    assert_eq!(single.total_suspicious_activities, 1);
    assert_eq!(single.blocked_users, 0);
    assert_eq!(single.recent_attempts, 0);
    Ok(())
}

#[test]
fn reset_user_clears_block_and_emits_config_change() -> AppResult<()> {
    let (service, _clock, mut events) = detector()?;

    for _ in 0..3 {
        service.detect_bypass_attempt("<script>", "user-11", "form");
    }
    assert!(service.is_user_blocked("user-11"));
    drain(&mut events);

    assert!(service.reset_user("user-11", "admin-1"));
    assert!(!service.is_user_blocked("user-11"));
    assert!(!service.reset_user("user-11", "admin-1"));
    assert_eq!(
        drain(&mut events),
        vec![(SecurityEventType::ConfigChange, Severity::Low)]
    );
    Ok(())
}

#[test]
fn custom_signature_table_is_honoured() -> AppResult<()> {
    let start = Utc::now();
    let (publisher, _receiver) = security_event_channel();
    let signatures = [ThreatSignature {
        name: "template_expression",
        category: ThreatCategory::ScriptInjection,
        pattern: r"\{\{.*\}\}",
    }];
    let service = SuspiciousActivityService::with_signatures(
        &signatures,
        SuspiciousActivityConfig::default(),
        Arc::new(ManualClock::new(start)),
        publisher,
    )?;

    assert!(service.detect_bypass_attempt("{{7*7}}", "user-12", "form"));
    assert!(!service.detect_bypass_attempt("<script>", "user-12", "form"));
    Ok(())
}

#[test]
fn invalid_signature_or_config_fails_construction() {
    let (publisher, _receiver) = security_event_channel();
    let signatures = [ThreatSignature {
        name: "broken",
        category: ThreatCategory::SqlInjection,
        pattern: "(unclosed",
    }];
    let result = SuspiciousActivityService::with_signatures(
        &signatures,
        SuspiciousActivityConfig::default(),
        Arc::new(ManualClock::new(Utc::now())),
        publisher.clone(),
    );
    assert!(result.is_err());

    let config = SuspiciousActivityConfig {
        block_threshold: 0,
        ..SuspiciousActivityConfig::default()
    };
    let result =
        SuspiciousActivityService::new(config, Arc::new(ManualClock::new(Utc::now())), publisher);
    assert!(result.is_err());
}

#[test]
fn oversized_windows_are_rejected() {
    let oversized_block = SuspiciousActivityConfig {
        block_window: Duration::days(366),
        ..SuspiciousActivityConfig::default()
    };
    assert!(oversized_block.validate().is_err());

    let oversized_recent = SuspiciousActivityConfig {
        recent_window: Duration::weeks(1_000),
        ..SuspiciousActivityConfig::default()
    };
    assert!(oversized_recent.validate().is_err());

    let one_year = SuspiciousActivityConfig {
        block_window: Duration::days(365),
        ..SuspiciousActivityConfig::default()
    };
    assert!(one_year.validate().is_ok());
}
