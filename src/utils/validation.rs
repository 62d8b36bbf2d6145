use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::config::CONFIG;
use crate::models::BookingDraft;
use crate::utils::time::slot_hour;

/// Validate a person's name: required, at least 2 characters, letters and
/// spaces only.
pub fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    if name.len() < 2 {
        return Err("Name must be at least 2 characters long".to_string());
    }

    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z\s]+$").expect("Failed to compile name regex"));

    if !regex.is_match(name) {
        return Err("Name should only contain letters".to_string());
    }
    Ok(())
}

/// Validate an email address against the usual `local@domain.tld` shape.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(())
}

/// Validate a phone number: exactly 10 digits after stripping separators
/// and an optional leading country-code `+` prefix.
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.trim().is_empty() {
        return Err("Phone number is required".to_string());
    }

    let stripped = phone.trim_start_matches('+');
    let digits: String = stripped.chars().filter(|c| c.is_ascii_digit()).collect();
    let separators_only = stripped
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-' || c == '.');

    if !separators_only || digits.len() != 10 {
        return Err("Please enter a valid 10-digit phone number".to_string());
    }
    Ok(())
}

/// Validate free-form message/feedback text: required, at least 10 chars.
pub fn validate_message(message: &str) -> Result<(), String> {
    let message = message.trim();
    if message.is_empty() {
        return Err("Message is required".to_string());
    }
    if message.len() < 10 {
        return Err("Message must be at least 10 characters long".to_string());
    }
    Ok(())
}

pub fn validate_service(service: &str) -> Result<(), String> {
    if service.trim().is_empty() {
        return Err("Please select a service".to_string());
    }
    Ok(())
}

/// Validate an appointment date (YYYY-MM-DD): today or later.
pub fn validate_date(date: &str) -> Result<(), String> {
    validate_date_at(date, Local::now().date_naive())
}

fn validate_date_at(date: &str, today: NaiveDate) -> Result<(), String> {
    if date.trim().is_empty() {
        return Err("Date is required".to_string());
    }
    let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| "Please enter a valid date (YYYY-MM-DD)".to_string())?;
    if parsed < today {
        return Err("Please select a future date".to_string());
    }
    Ok(())
}

/// Validate an appointment time: required, within opening hours.
pub fn validate_time(time: &str) -> Result<(), String> {
    if time.trim().is_empty() {
        return Err("Time is required".to_string());
    }
    let hour = slot_hour(time).ok_or_else(|| "Please enter a valid time".to_string())?;
    let booking = &CONFIG.booking_config;
    if hour < booking.opening_hour || hour > booking.closing_hour {
        return Err("Please select a time between 9 AM and 5 PM".to_string());
    }
    Ok(())
}

/// Validate a vehicle year: integer between 1886 and the current year.
pub fn validate_vehicle_year(year: &str) -> Result<(), String> {
    validate_vehicle_year_at(year, Local::now().year())
}

fn validate_vehicle_year_at(year: &str, current_year: i32) -> Result<(), String> {
    if year.trim().is_empty() {
        return Err("Vehicle year is required".to_string());
    }
    let parsed: i32 = year
        .trim()
        .parse()
        .map_err(|_| "Vehicle year must be a number".to_string())?;
    let min = CONFIG.booking_config.min_vehicle_year;
    if parsed < min || parsed > current_year {
        return Err(format!("Vehicle year must be between {} and {}", min, current_year));
    }
    Ok(())
}

/// Validate a password: required, at least 6 characters.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if password.len() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }
    Ok(())
}

pub fn validate_required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }
    Ok(())
}

/// Field name → human-readable message. A form may submit only when the
/// map is empty for all required fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: HashMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.errors.insert(field.to_string(), message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

/// Full per-submit validation pass over a booking draft. All failing
/// fields are surfaced at once.
pub fn validate_booking_draft(draft: &BookingDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.check("customerName", validate_name(&draft.customer_name));
    errors.check("email", validate_email(&draft.email));
    errors.check("phoneNumber", validate_phone(&draft.phone_number));
    errors.check("service", validate_service(&draft.service));
    errors.check("date", validate_date(&draft.date));
    errors.check("time", validate_time(&draft.time));
    errors.check("vehicleDetails.make", validate_required(&draft.vehicle_details.make, "Vehicle make"));
    errors.check("vehicleDetails.model", validate_required(&draft.vehicle_details.model, "Vehicle model"));
    errors.check("vehicleDetails.year", validate_vehicle_year(&draft.vehicle_details.year));
    errors.check(
        "vehicleDetails.registrationNumber",
        validate_required(&draft.vehicle_details.registration_number, "Registration number"),
    );
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn name_rejects_short_and_non_letters() {
        assert!(validate_name("Jo Smith").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("J").is_err());
        assert!(validate_name("R2D2").is_err());
    }

    #[test]
    fn email_requires_local_domain_tld() {
        assert!(validate_email("sam@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("sam@example").is_err());
        assert!(validate_email("not an email").is_err());
    }

    #[test]
    fn phone_requires_ten_digits() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+1 987-654-3210").is_err()); // 11 digits with prefix
        assert!(validate_phone("+98 765 43210").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("98765432101").is_err());
        assert!(validate_phone("abcdefghij").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn message_requires_ten_chars() {
        assert!(validate_message("Brakes squeal at low speed").is_ok());
        assert!(validate_message("too short").is_err());
        assert!(validate_message("").is_err());
    }

    #[test]
    fn date_accepts_today_rejects_yesterday() {
        let today = Local::now().date_naive();
        let yesterday = today - Duration::days(1);
        assert!(validate_date(&today.format("%Y-%m-%d").to_string()).is_ok());
        assert!(validate_date(&yesterday.format("%Y-%m-%d").to_string()).is_err());
        assert!(validate_date("").is_err());
        assert!(validate_date("not-a-date").is_err());
    }

    #[test]
    fn date_comparison_truncates_time_of_day() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert!(validate_date_at("2026-03-14", today).is_ok());
        assert!(validate_date_at("2026-03-15", today).is_ok());
        assert!(validate_date_at("2026-03-13", today).is_err());
    }

    #[test]
    fn time_enforces_opening_hours() {
        assert!(validate_time("9:00 AM").is_ok());
        assert!(validate_time("5:00 PM").is_ok());
        assert!(validate_time("14:30").is_ok());
        assert!(validate_time("8:00 AM").is_err());
        assert!(validate_time("6:00 PM").is_err());
        assert!(validate_time("").is_err());
        assert!(validate_time("noonish").is_err());
    }

    #[test]
    fn password_requires_six_chars() {
        assert!(validate_password("hunter2!").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn vehicle_year_bounds_are_inclusive() {
        let current = Local::now().year();
        assert!(validate_vehicle_year("1886").is_ok());
        assert!(validate_vehicle_year(&current.to_string()).is_ok());
        assert!(validate_vehicle_year("1885").is_err());
        assert!(validate_vehicle_year(&(current + 1).to_string()).is_err());
        assert!(validate_vehicle_year("soon").is_err());
        assert!(validate_vehicle_year("").is_err());
    }

    #[test]
    fn vehicle_year_at_fixed_year() {
        assert!(validate_vehicle_year_at("2020", 2026).is_ok());
        assert!(validate_vehicle_year_at("2027", 2026).is_err());
    }

    #[test]
    fn draft_validation_surfaces_all_failures_at_once() {
        let draft = BookingDraft::default();
        let errors = validate_booking_draft(&draft);
        assert!(!errors.is_empty());
        assert!(errors.get("customerName").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("vehicleDetails.year").is_some());
        assert!(errors.len() >= 8);
    }
}
