use crate::app::{App, AppMode, AuthField, AuthJob, AuthState, AuthStep, Focus};
use crate::services::validation::{self, FieldError};
use crate::storage::Session;
use std::time::Instant;

/// The only code the mocked verifier accepts
pub const MOCK_OTP: &str = "123456";

impl App {
    pub fn toggle_auth_field(&mut self) {
        if self.auth.step != AuthStep::Phone {
            return;
        }
        self.auth.field = match self.auth.field {
            AuthField::Country => AuthField::Phone,
            AuthField::Phone => AuthField::Country,
        };
    }

    pub fn next_country(&mut self) {
        let count = self.auth.countries.len();
        if count == 0 {
            return;
        }
        self.auth.country = Some(self.auth.country.map_or(0, |index| (index + 1) % count));
        self.auth.error = None;
    }

    pub fn previous_country(&mut self) {
        let count = self.auth.countries.len();
        if count == 0 {
            return;
        }
        self.auth.country = Some(match self.auth.country {
            Some(0) | None => count - 1,
            Some(index) => index - 1,
        });
        self.auth.error = None;
    }

    pub fn add_auth_char(&mut self, character: char) {
        match self.auth.step {
            AuthStep::Phone => {
                if self.auth.field == AuthField::Phone {
                    self.auth.phone.add_char(character);
                    self.auth.error = None;
                }
            }
            AuthStep::Otp => {
                if validation::accepts_otp_char(self.auth.otp.content(), character) {
                    self.auth.otp.add_char(character);
                }
            }
            AuthStep::SendingOtp | AuthStep::Verifying | AuthStep::Verified => {}
        }
    }

    pub fn remove_auth_char(&mut self) {
        match self.auth.step {
            AuthStep::Phone => {
                if self.auth.field == AuthField::Phone {
                    self.auth.phone.remove_char();
                }
            }
            AuthStep::Otp => self.auth.otp.remove_char(),
            AuthStep::SendingOtp | AuthStep::Verifying | AuthStep::Verified => {}
        }
    }

    /// Validates the phone form and starts the simulated OTP send
    pub fn submit_phone(&mut self, now: Instant) {
        if self.auth.step != AuthStep::Phone {
            return;
        }
        let country = self
            .auth
            .selected_country()
            .map(|country| country.code.clone())
            .unwrap_or_default();
        let checked = validation::validate_country(&country)
            .and_then(|()| validation::validate_phone(self.auth.phone.content()));
        if let Err(error) = checked {
            self.set_auth_error(error);
            return;
        }
        self.auth.error = None;
        self.auth.step = AuthStep::SendingOtp;
        let delay = self.config.auth.otp_delay();
        self.auth_jobs.schedule(now, delay, None, AuthJob::OtpSent);
        tracing::info!(country = %country, "sending mock OTP");
    }

    pub fn submit_otp(&mut self, now: Instant) {
        if self.auth.step != AuthStep::Otp {
            return;
        }
        let accepted = self.auth.otp.content() == MOCK_OTP;
        self.auth.step = AuthStep::Verifying;
        let delay = self.config.auth.otp_delay();
        self.auth_jobs
            .schedule(now, delay, None, AuthJob::OtpChecked { accepted });
    }

    /// Returns from the OTP step to edit the phone number
    pub fn back_to_phone(&mut self) {
        if self.auth.step == AuthStep::Otp {
            self.auth.step = AuthStep::Phone;
            self.auth.otp.clear();
        }
    }

    pub(crate) fn handle_auth_job(&mut self, job: AuthJob, now: Instant) {
        match job {
            AuthJob::OtpSent => {
                self.auth.step = AuthStep::Otp;
                self.auth.otp.clear();
                self.show_status_toast("OTP sent!");
            }
            AuthJob::OtpChecked { accepted: true } => {
                self.auth.step = AuthStep::Verified;
                self.show_status_toast("OTP verified! Logging in...");
                self.save_session();
                let delay = self.config.auth.otp_delay();
                self.auth_jobs
                    .schedule(now, delay, None, AuthJob::EnterDashboard);
            }
            AuthJob::OtpChecked { accepted: false } => {
                self.auth.step = AuthStep::Otp;
                self.auth.otp.clear();
                self.show_status_toast("Invalid OTP, please try again.");
            }
            AuthJob::EnterDashboard => self.enter_dashboard(),
        }
    }

    pub(crate) fn enter_dashboard(&mut self) {
        self.mode = AppMode::Chat;
        self.focus = Focus::Sidebar;
        self.room_index = 0;
        if let Some(room) = self.rooms.first().map(|room| room.id.clone()) {
            self.select_room(&room);
        }
    }

    /// Signs out: forgets the session and returns to the phone form
    pub fn logout(&mut self) {
        if let Some((storage, runtime)) = self.storage_with_runtime()
            && let Err(error) = runtime.block_on(storage.clear_session())
        {
            tracing::warn!(%error, "could not clear session");
        }
        let countries = std::mem::take(&mut self.auth.countries);
        self.auth = AuthState::new(countries);
        self.auth_jobs.clear();
        self.mode = AppMode::Auth;
        self.show_status_toast("SIGNED OUT");
        tracing::info!("signed out");
    }

    fn set_auth_error(&mut self, error: FieldError) {
        self.auth.field = match error {
            FieldError::CountryRequired => AuthField::Country,
            FieldError::PhoneTooShort
            | FieldError::PhoneTooLong
            | FieldError::PhoneNotDigits
            | FieldError::TitleTooShort
            | FieldError::TitleTooLong => AuthField::Phone,
        };
        self.auth.error = Some(error);
    }

    fn save_session(&self) {
        let Some(country) = self.auth.selected_country() else {
            return;
        };
        let session = Session {
            country: country.code.clone(),
            phone: format!("{}{}", country.dial_code, self.auth.phone.content()),
            signed_in_at: chrono::Utc::now().to_rfc3339(),
        };
        if let Some((storage, runtime)) = self.storage_with_runtime()
            && let Err(error) = runtime.block_on(storage.save_session(&session))
        {
            tracing::warn!(%error, "could not save session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app;
    use std::time::Duration;

    const DELAY: Duration = Duration::from_millis(1000);

    fn typed(app: &mut App, text: &str) {
        for character in text.chars() {
            app.add_auth_char(character);
        }
    }

    #[test]
    fn test_phone_form_reports_first_failing_rule() {
        let mut app = app();
        let now = Instant::now();

        app.submit_phone(now);
        assert_eq!(app.auth.error, Some(FieldError::CountryRequired));
        assert_eq!(app.auth.field, AuthField::Country);

        app.next_country();
        app.toggle_auth_field();
        typed(&mut app, "12345");
        app.submit_phone(now);
        assert_eq!(app.auth.error, Some(FieldError::PhoneTooShort));
        assert_eq!(app.auth.step, AuthStep::Phone);
        assert!(app.auth_jobs.is_empty());
    }

    #[test]
    fn test_full_sign_in_flow() {
        let mut app = app();
        let now = Instant::now();
        app.next_country();
        app.toggle_auth_field();
        typed(&mut app, "9876543210");
        app.submit_phone(now);
        assert_eq!(app.auth.step, AuthStep::SendingOtp);

        app.tick(now + DELAY / 2);
        assert_eq!(app.auth.step, AuthStep::SendingOtp);
        app.tick(now + DELAY);
        assert_eq!(app.auth.step, AuthStep::Otp);
        assert_eq!(app.status_toast_message(), Some("OTP sent!"));

        typed(&mut app, "12x3456789");
        assert_eq!(app.auth.otp.content(), MOCK_OTP);
        let sent = now + DELAY;
        app.submit_otp(sent);
        app.tick(sent + DELAY);
        assert_eq!(app.auth.step, AuthStep::Verified);
        assert_eq!(app.status_toast_message(), Some("OTP verified! Logging in..."));
        assert_eq!(app.mode, AppMode::Auth);

        app.tick(sent + DELAY * 2);
        assert_eq!(app.mode, AppMode::Chat);
    }

    #[test]
    fn test_wrong_code_returns_to_otp_entry() {
        let mut app = app();
        let now = Instant::now();
        app.next_country();
        app.toggle_auth_field();
        typed(&mut app, "5551234");
        app.submit_phone(now);
        app.tick(now + DELAY);

        typed(&mut app, "000000");
        app.submit_otp(now + DELAY);
        app.tick(now + DELAY * 2);
        assert_eq!(app.auth.step, AuthStep::Otp);
        assert!(app.auth.otp.is_empty());
        assert_eq!(app.status_toast_message(), Some("Invalid OTP, please try again."));
        assert_eq!(app.mode, AppMode::Auth);
    }

    #[test]
    fn test_country_picker_wraps() {
        let mut app = app();
        app.previous_country();
        let last = app.auth.countries.len() - 1;
        assert_eq!(app.auth.country, Some(last));
        app.next_country();
        assert_eq!(app.auth.country, Some(0));
    }
}
