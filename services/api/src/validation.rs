//! Input validation utilities

use chrono::{Datelike, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::models::CreateListingRequest;

/// Earliest accepted year of manufacture.
pub const MIN_YEAR_OF_MANUFACTURE: i32 = 1900;

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 64 {
        return Err("Name must be at most 64 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate the shape of a new listing: required text fields present and a
/// plausible year of manufacture.
pub fn validate_listing(listing: &CreateListingRequest) -> Result<(), String> {
    fn require(value: &str, field: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err(format!("{field} is required"));
        }
        Ok(())
    }

    require(&listing.title, "title")?;
    require(&listing.location, "location")?;
    require(&listing.make, "make")?;
    require(&listing.model, "model")?;
    require(&listing.vehicle_type, "vehicle_type")?;
    require(&listing.fuel_or_power, "fuel_or_power")?;

    let max_year = Utc::now().year() + 1;
    if listing.year_of_manufacture < MIN_YEAR_OF_MANUFACTURE
        || listing.year_of_manufacture > max_year
    {
        return Err(format!(
            "year_of_manufacture must be between {MIN_YEAR_OF_MANUFACTURE} and {max_year}"
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, PriceType};

    fn tractor() -> CreateListingRequest {
        CreateListingRequest {
            title: "John Deere 5075E Tractor".to_string(),
            price: Some(32_500),
            price_type: PriceType::Negotiable,
            condition: Condition::Used,
            location: "Springfield, MO".to_string(),
            picture: None,
            description: None,
            make: "John Deere".to_string(),
            model: "5075E".to_string(),
            vehicle_type: "Utility Tractor".to_string(),
            year_of_manufacture: 2018,
            fuel_or_power: "Diesel".to_string(),
            weight: Some(5075.0),
        }
    }

    #[test]
    fn accepts_a_complete_listing() {
        assert!(validate_listing(&tractor()).is_ok());
    }

    #[test]
    fn rejects_blank_required_fields() {
        let mut listing = tractor();
        listing.make = "  ".to_string();
        assert!(validate_listing(&listing).is_err());
    }

    #[test]
    fn rejects_implausible_years() {
        let mut listing = tractor();
        listing.year_of_manufacture = 1850;
        assert!(validate_listing(&listing).is_err());

        listing.year_of_manufacture = 3000;
        assert!(validate_listing(&listing).is_err());
    }

    #[test]
    fn password_rule_is_length_only() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(validate_email("sarah.smith@greenvalley.org").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }
}
