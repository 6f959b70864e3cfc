//! Field rules applied to a draft before any network activity.
//!
//! Every rule is evaluated independently, so a single pass reports every
//! offending field at once. Nothing here touches I/O.

use once_cell::sync::Lazy;
use regex::Regex;
use vitrine_model::{ProfileDraft, ProfileField, ValidationErrors};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+(?:[A-Za-z]{2,63}|xn--[A-Za-z0-9-]{1,59})$",
    )
    .expect("email regex should compile")
});

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;

/// Validate a draft, returning one message per failing field.
///
/// `phone`, `addressLine` and `addressType` are accepted as-is.
pub fn validate(draft: &ProfileDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for field in ProfileField::ALL {
        if let Some(message) = validate_field(field, draft.field(field)) {
            errors.insert(field, message);
        }
    }
    errors
}

/// Check a single field value against its rule.
pub fn validate_field(field: ProfileField, value: &str) -> Option<&'static str> {
    match field {
        ProfileField::Name => (!is_letters_and_spaces(value))
            .then_some("Name must contain only letters"),
        ProfileField::Email => {
            (!is_email(value)).then_some("Invalid email address")
        }
        ProfileField::Zip => (!is_digits(value))
            .then_some("Zip code must contain only numbers"),
        ProfileField::State => (!is_letters_and_spaces(value))
            .then_some("State must contain only letters"),
        ProfileField::Country => (!is_letters_and_spaces(value))
            .then_some("Country must contain only letters"),
        ProfileField::City => (!is_letters_and_spaces(value))
            .then_some("City must contain only letters"),
        ProfileField::Phone
        | ProfileField::AddressLine
        | ProfileField::AddressType => None,
    }
}

/// At least one letter, and nothing but ASCII letters once whitespace is
/// removed.
fn is_letters_and_spaces(value: &str) -> bool {
    let mut letters = value.chars().filter(|c| !c.is_whitespace()).peekable();
    letters.peek().is_some() && letters.all(|c| c.is_ascii_alphabetic())
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn is_email(value: &str) -> bool {
    if value.len() > MAX_EMAIL_LEN {
        return false;
    }
    match value.rsplit_once('@') {
        Some((local, _)) if local.len() <= MAX_LOCAL_PART_LEN => {
            EMAIL_REGEX.is_match(value)
        }
        _ => false,
    }
}
