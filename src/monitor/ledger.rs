// Once-per-day alert deduplication

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Days, Local, NaiveDateTime, Timelike};

/// Tracks which services have already been alerted within the current
/// alert day.
///
/// The alert day does not start at midnight: a check before `reset_hour`
/// still belongs to the previous day's window, so a failure alerted late in
/// the evening is not re-alerted just after midnight. State lives for the
/// lifetime of the process; a restart resets it, which can produce one
/// duplicate alert within the same day.
#[derive(Debug)]
pub struct AlertLedger {
    reset_hour: u32,
    alerted: Mutex<HashMap<String, NaiveDateTime>>,
}

impl AlertLedger {
    /// Create an empty ledger whose day boundary sits at `reset_hour` local time
    pub fn new(reset_hour: u32) -> Self {
        Self {
            reset_hour: reset_hour.min(23),
            alerted: Mutex::new(HashMap::new()),
        }
    }

    /// Start of the alert window containing `now`.
    fn window_start(&self, now: NaiveDateTime) -> NaiveDateTime {
        if now.hour() < self.reset_hour {
            // Still the previous day's window.
            (now.date() - Days::new(1)).and_hms_opt(0, 0, 0).unwrap()
        } else {
            now.date().and_hms_opt(self.reset_hour, 0, 0).unwrap()
        }
    }

    /// True iff no alert has been recorded for `service` in the current window
    pub fn should_alert(&self, service: &str) -> bool {
        self.should_alert_at(service, Local::now().naive_local())
    }

    pub fn should_alert_at(&self, service: &str, now: NaiveDateTime) -> bool {
        let alerted = self.alerted.lock().unwrap();
        let window = self.window_start(now);
        match alerted.get(service) {
            Some(last) => *last < window,
            None => true,
        }
    }

    /// Record that an alert went out for `service` just now
    pub fn mark_alerted(&self, service: &str) {
        self.mark_alerted_at(service, Local::now().naive_local());
    }

    pub fn mark_alerted_at(&self, service: &str, now: NaiveDateTime) {
        self.alerted
            .lock()
            .unwrap()
            .insert(service.to_string(), now);
    }

    /// Atomic should-alert plus mark-alerted under a single lock acquisition.
    ///
    /// Two concurrent failure detections for the same service cannot both
    /// win the check; exactly one caller sees `true` per window.
    pub fn claim(&self, service: &str) -> bool {
        self.claim_at(service, Local::now().naive_local())
    }

    pub fn claim_at(&self, service: &str, now: NaiveDateTime) -> bool {
        let mut alerted = self.alerted.lock().unwrap();
        let window = self.window_start(now);
        let due = match alerted.get(service) {
            Some(last) => *last < window,
            None => true,
        };
        if due {
            alerted.insert(service.to_string(), now);
        }
        due
    }
}
