use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct StatusToast {
    pub message: String,
    pub created_at: Instant,
}

impl StatusToast {
    pub fn new(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: Instant, duration: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= duration
    }
}

/// Which chat-screen widget receives typed keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Search,
    Composer,
}

/// Progress through the mocked sign-in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStep {
    Phone,
    SendingOtp,
    Otp,
    Verifying,
    Verified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Country,
    Phone,
}

/// Deferred sign-in work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthJob {
    OtpSent,
    OtpChecked { accepted: bool },
    EnterDashboard,
}
