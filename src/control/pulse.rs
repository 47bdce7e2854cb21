//! Fixed-length heating pulse timer.
//!
//! While a pulse is in flight the heater is on.  It ends exactly when
//! `now - started >= duration`; nothing else shortens or extends it.

#[derive(Debug, Clone, Copy)]
pub struct HeatPulse {
    duration_ms: u64,
    started_ms: Option<u64>,
}

impl HeatPulse {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            started_ms: None,
        }
    }

    pub fn start(&mut self, now_ms: u64) {
        self.started_ms = Some(now_ms);
    }

    pub fn cancel(&mut self) {
        self.started_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.started_ms.is_some()
    }

    pub fn started_ms(&self) -> Option<u64> {
        self.started_ms
    }

    /// Clear the pulse if its duration has elapsed.  Returns `true` on
    /// the cycle the pulse ends.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        match self.started_ms {
            Some(start) if now_ms.saturating_sub(start) >= self.duration_ms => {
                self.started_ms = None;
                true
            }
            _ => false,
        }
    }
}
