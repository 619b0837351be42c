use std::fmt;

use serde::Serialize;
use validator::{ValidateEmail, ValidateUrl};

use crate::types::{CandidateInput, InteractionInput};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_YEARS_OF_EXPERIENCE: i64 = 70;
const MAX_USERNAME_LEN: usize = 50;
const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field-level validation failures, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// Ok when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !is_blank(v))
}

fn check_required(errors: &mut ValidationErrors, field: &'static str, label: &str, value: &str) {
    if is_blank(value) {
        errors.add(field, format!("{label} is required"));
    }
}

fn check_email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if is_blank(value) {
        errors.add(field, "Email is required");
    } else if !value.validate_email() {
        errors.add(field, format!("'{value}' is not a valid email address"));
    }
}

/// Phone numbers may contain spaces, dashes, parentheses and a leading plus;
/// what remains must be 7 to 15 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
        .collect();
    digits.chars().all(|c| c.is_ascii_digit())
        && (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len())
}

/// Only absolute http(s) URLs are accepted.
pub fn is_valid_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://")) && url.validate_url()
}

fn check_url(errors: &mut ValidationErrors, field: &'static str, label: &str, value: Option<&String>) {
    if let Some(url) = non_blank(value) {
        if !is_valid_url(url) {
            errors.add(
                field,
                format!("{label}: Invalid URL format. Must start with http:// or https://"),
            );
        }
    }
}

pub fn validate_candidate(input: &CandidateInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_required(&mut errors, "first_name", "First name", &input.first_name);
    check_required(&mut errors, "last_name", "Last name", &input.last_name);
    check_email(&mut errors, "email", &input.email);

    if let Some(phone) = non_blank(input.phone.as_ref()) {
        if !is_valid_phone(phone) {
            errors.add("phone", "Invalid phone number format");
        }
    }

    check_url(&mut errors, "linkedin_url", "LinkedIn URL", input.linkedin_url.as_ref());
    check_url(&mut errors, "resume_url", "Resume URL", input.resume_url.as_ref());

    if let Some(years) = input.years_of_experience {
        if years < 0 {
            errors.add("years_of_experience", "Years of experience must be at least 0");
        } else if years > MAX_YEARS_OF_EXPERIENCE {
            errors.add(
                "years_of_experience",
                format!("Years of experience must be at most {MAX_YEARS_OF_EXPERIENCE}"),
            );
        }
    }

    errors.into_result()
}

pub fn validate_password(password: &str) -> Result<(), ValidationErrors> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationErrors::single(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        ));
    }
    Ok(())
}

pub fn validate_new_user(
    username: &str,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_required(&mut errors, "username", "Username", username);
    if username.len() > MAX_USERNAME_LEN {
        errors.add(
            "username",
            format!("Username cannot exceed {MAX_USERNAME_LEN} characters"),
        );
    }
    if username.contains(char::is_whitespace) {
        errors.add("username", "Username cannot contain whitespace");
    }
    check_required(&mut errors, "full_name", "Full name", full_name);
    check_email(&mut errors, "email", email);
    if let Err(e) = validate_password(password) {
        errors.0.extend(e.0);
    }

    errors.into_result()
}

pub fn validate_profile(full_name: &str, email: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_required(&mut errors, "full_name", "Full name", full_name);
    check_email(&mut errors, "email", email);
    errors.into_result()
}

pub fn validate_interaction(input: &InteractionInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(duration) = input.duration {
        if duration < 0 {
            errors.add("duration", "Duration must be at least 0 minutes");
        }
    }
    errors.into_result()
}
