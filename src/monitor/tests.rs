#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use chrono::{NaiveDate, NaiveDateTime};

    use crate::error::{Result, ServmonError};
    use crate::monitor::ledger::AlertLedger;
    use crate::monitor::notifier::{
        escape_markdown, truncate_status, TelegramNotifier, MAX_STATUS_LENGTH,
    };
    use crate::monitor::scheduler::{next_check_delay, HealthMonitor};
    use crate::monitor::{AlertSink, StatusSource};
    use crate::systemd::ServiceStatus;

    fn day(d: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn ledger_alerts_once_per_day() {
        let ledger = AlertLedger::new(6);

        assert!(ledger.should_alert_at("svc", day(18, 10, 0)));
        ledger.mark_alerted_at("svc", day(18, 10, 0));
        assert!(!ledger.should_alert_at("svc", day(18, 23, 0)));

        // Before the reset hour the next morning it is still the same alert day.
        assert!(!ledger.should_alert_at("svc", day(19, 5, 59)));

        // Past the reset hour a new window opens.
        assert!(ledger.should_alert_at("svc", day(19, 6, 0)));
    }

    #[test]
    fn ledger_tracks_services_independently() {
        let ledger = AlertLedger::new(6);

        ledger.mark_alerted_at("projects_a.service", day(18, 10, 0));
        assert!(!ledger.should_alert_at("projects_a.service", day(18, 11, 0)));
        assert!(ledger.should_alert_at("projects_b.service", day(18, 11, 0)));
    }

    #[test]
    fn ledger_claim_checks_and_marks_atomically() {
        let ledger = AlertLedger::new(6);

        assert!(ledger.claim_at("svc", day(18, 12, 0)));
        assert!(!ledger.claim_at("svc", day(18, 13, 0)));
        assert!(ledger.claim_at("svc", day(19, 7, 0)));
    }

    #[test]
    fn concurrent_claims_admit_exactly_one() {
        let ledger = Arc::new(AlertLedger::new(6));
        let now = day(18, 12, 0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || ledger.claim_at("svc", now))
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn markdown_escaping() {
        assert_eq!(escape_markdown("a*b`c[d]"), "a\\*b\\`c\\[d]");
        assert_eq!(escape_markdown("plain text"), "plain text");
    }

    #[test]
    fn truncation_keeps_the_tail() {
        assert_eq!(truncate_status("short"), "short");

        let long = format!("{}THE END", "x".repeat(MAX_STATUS_LENGTH));
        let truncated = truncate_status(&long);
        assert!(truncated.starts_with("(truncated)...\n"));
        assert!(truncated.ends_with("THE END"));
        assert_eq!(
            truncated.chars().count(),
            MAX_STATUS_LENGTH + "(truncated)...\n".chars().count()
        );
    }

    #[test]
    fn alert_message_format() {
        let raw = "Active: failed (result: exit-code)\nError: Service failed to start\n";
        let status =
            ServiceStatus::from_raw("projects_web.service", raw.to_string(), "projects_");
        let message = TelegramNotifier::format_alert(&status);

        assert!(message.contains("*Service:* `projects_web.service`"));
        assert!(message.contains("*Last Error:* `Service failed to start`"));
        assert!(message.contains("*Is Active:* `false`"));
        assert!(message.contains("*Is Failed:* `true`"));
        assert!(message.contains("*Uptime:* `N/A`"));
        assert!(message.contains("*Full Status:*"));
    }

    #[test]
    fn next_tick_lands_on_the_hour() {
        let mid_hour = NaiveDate::from_ymd_opt(2024, 3, 18)
            .unwrap()
            .and_hms_opt(10, 15, 30)
            .unwrap();
        assert_eq!(next_check_delay(mid_hour), Duration::from_secs(44 * 60 + 30));

        let on_the_hour = NaiveDate::from_ymd_opt(2024, 3, 18)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(next_check_delay(on_the_hour), Duration::from_secs(3600));
    }

    const RUNNING: &str =
        "Active: active (running) since Mon 2024-03-18 10:00:00 UTC; 4 days ago\n";
    const FAILED: &str = "Active: failed (result: exit-code)\nError: Service failed to start\n";

    #[derive(Clone, Default)]
    struct FakeSource {
        names: Vec<String>,
        raw: HashMap<String, String>,
        fail_enumeration: bool,
        fail_status_for: Option<String>,
    }

    impl StatusSource for FakeSource {
        async fn service_names(&self) -> Result<Vec<String>> {
            if self.fail_enumeration {
                return Err(ServmonError::Enumeration("unit query failed".to_string()).into());
            }
            Ok(self.names.clone())
        }

        async fn status_of(&self, service: &str) -> Result<ServiceStatus> {
            if self.fail_status_for.as_deref() == Some(service) {
                return Err(ServmonError::Status {
                    service: service.to_string(),
                    message: "status query failed".to_string(),
                }
                .into());
            }
            let raw = self.raw.get(service).cloned().unwrap_or_default();
            Ok(ServiceStatus::from_raw(service, raw, "projects_"))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        delivered: Arc<Mutex<Vec<String>>>,
    }

    impl AlertSink for RecordingSink {
        async fn deliver(&self, status: &ServiceStatus) {
            self.delivered.lock().unwrap().push(status.name.clone());
        }
    }

    fn fleet() -> FakeSource {
        FakeSource {
            names: vec![
                "projects_a.service".to_string(),
                "projects_b.service".to_string(),
            ],
            raw: HashMap::from([
                ("projects_a.service".to_string(), RUNNING.to_string()),
                ("projects_b.service".to_string(), FAILED.to_string()),
            ]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn sweep_alerts_only_failed_services() {
        let sink = RecordingSink::default();
        let delivered = Arc::clone(&sink.delivered);
        let monitor = HealthMonitor::new(fleet(), sink, Arc::new(AlertLedger::new(6)));

        monitor.run_check().await;
        assert_eq!(
            *delivered.lock().unwrap(),
            vec!["projects_b.service".to_string()]
        );

        // A second sweep in the same alert window stays quiet.
        monitor.run_check().await;
        assert_eq!(delivered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sweep_skips_cycle_when_enumeration_fails() {
        let sink = RecordingSink::default();
        let delivered = Arc::clone(&sink.delivered);
        let source = FakeSource {
            fail_enumeration: true,
            ..fleet()
        };
        let monitor = HealthMonitor::new(source, sink, Arc::new(AlertLedger::new(6)));

        monitor.run_check().await;
        assert!(delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sweep_isolates_per_service_failures() {
        let sink = RecordingSink::default();
        let delivered = Arc::clone(&sink.delivered);
        let source = FakeSource {
            fail_status_for: Some("projects_a.service".to_string()),
            ..fleet()
        };
        let monitor = HealthMonitor::new(source, sink, Arc::new(AlertLedger::new(6)));

        monitor.run_check().await;
        assert_eq!(
            *delivered.lock().unwrap(),
            vec!["projects_b.service".to_string()]
        );
    }

    #[tokio::test]
    async fn monitor_handle_shuts_down_cleanly() {
        let monitor = HealthMonitor::new(
            fleet(),
            RecordingSink::default(),
            Arc::new(AlertLedger::new(6)),
        );

        let handle = monitor.spawn();
        handle.shutdown().await;
    }
}
