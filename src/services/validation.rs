//! Form field rules for sign-in and chatroom creation

use thiserror::Error;

pub const PHONE_MIN_DIGITS: usize = 7;
pub const PHONE_MAX_DIGITS: usize = 15;
pub const OTP_LENGTH: usize = 6;
pub const TITLE_MIN_CHARS: usize = 2;
pub const TITLE_MAX_CHARS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Country is required")]
    CountryRequired,
    #[error("Phone must be at least 7 digits")]
    PhoneTooShort,
    #[error("Phone can't exceed 15 digits")]
    PhoneTooLong,
    #[error("Phone must be digits only")]
    PhoneNotDigits,
    #[error("Chatroom title must be at least 2 characters")]
    TitleTooShort,
    #[error("Chatroom title must be at most 32 characters")]
    TitleTooLong,
}

pub fn validate_country(code: &str) -> Result<(), FieldError> {
    if code.is_empty() {
        return Err(FieldError::CountryRequired);
    }
    Ok(())
}

/// Length is checked before the digit rule, so "12ab" reports too short
pub fn validate_phone(phone: &str) -> Result<(), FieldError> {
    let length = phone.chars().count();
    if length < PHONE_MIN_DIGITS {
        return Err(FieldError::PhoneTooShort);
    }
    if length > PHONE_MAX_DIGITS {
        return Err(FieldError::PhoneTooLong);
    }
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::PhoneNotDigits);
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), FieldError> {
    let length = title.chars().count();
    if length < TITLE_MIN_CHARS {
        return Err(FieldError::TitleTooShort);
    }
    if length > TITLE_MAX_CHARS {
        return Err(FieldError::TitleTooLong);
    }
    Ok(())
}

/// Whether `c` may be typed into the OTP field currently holding `current`
#[must_use]
pub fn accepts_otp_char(current: &str, c: char) -> bool {
    c.is_ascii_digit() && current.chars().count() < OTP_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_is_required() {
        assert_eq!(validate_country(""), Err(FieldError::CountryRequired));
        assert_eq!(validate_country("IN"), Ok(()));
    }

    #[test]
    fn test_phone_rules_in_order() {
        assert_eq!(validate_phone("123456"), Err(FieldError::PhoneTooShort));
        assert_eq!(validate_phone("1234567"), Ok(()));
        assert_eq!(validate_phone("123456789012345"), Ok(()));
        assert_eq!(validate_phone("1234567890123456"), Err(FieldError::PhoneTooLong));
        assert_eq!(validate_phone("12345ab"), Err(FieldError::PhoneNotDigits));
        assert_eq!(validate_phone("12ab"), Err(FieldError::PhoneTooShort));
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        assert_eq!(FieldError::PhoneTooLong.to_string(), "Phone can't exceed 15 digits");
        assert_eq!(
            FieldError::TitleTooShort.to_string(),
            "Chatroom title must be at least 2 characters"
        );
    }

    #[test]
    fn test_title_length_bounds() {
        assert_eq!(validate_title("a"), Err(FieldError::TitleTooShort));
        assert_eq!(validate_title("ab"), Ok(()));
        assert_eq!(validate_title(&"x".repeat(32)), Ok(()));
        assert_eq!(validate_title(&"x".repeat(33)), Err(FieldError::TitleTooLong));
        // counted in characters, not bytes
        assert_eq!(validate_title("日本"), Ok(()));
    }

    #[test]
    fn test_otp_accepts_six_digits_only() {
        assert!(accepts_otp_char("", '1'));
        assert!(!accepts_otp_char("", 'a'));
        assert!(accepts_otp_char("12345", '6'));
        assert!(!accepts_otp_char("123456", '7'));
    }
}
