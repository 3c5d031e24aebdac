use std::collections::HashSet;

use crate::controllers::poll_controllers::models::CreatePollRequest;

/// Outcome of checking raw caller input. Never an error itself: callers
/// decide whether to reject based on `is_valid`, and `errors` lists one
/// message per violated rule.
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

pub fn validate_create_poll(data: &CreatePollRequest) -> ValidationResult {
    let mut errors = Vec::new();

    if data.title.trim().is_empty() {
        errors.push("Poll title is required".to_string());
    } else if data.title.chars().count() > 200 {
        errors.push("Poll title must be less than 200 characters".to_string());
    }

    if let Some(description) = &data.description {
        if description.chars().count() > 1000 {
            errors.push("Poll description must be less than 1000 characters".to_string());
        }
    }

    if data.options.len() < 2 {
        errors.push("At least 2 options are required".to_string());
    } else if data.options.len() > 10 {
        errors.push("Maximum 10 options allowed".to_string());
    } else {
        let valid_options: Vec<&str> = data
            .options
            .iter()
            .map(|option| option.trim())
            .filter(|option| !option.is_empty())
            .collect();

        if valid_options.len() < 2 {
            errors.push("At least 2 valid options are required".to_string());
        }

        for (index, option) in valid_options.iter().enumerate() {
            if option.chars().count() > 200 {
                errors.push(format!(
                    "Option {} must be less than 200 characters",
                    index + 1
                ));
            }
        }

        let mut seen = HashSet::new();
        let all_unique = valid_options
            .iter()
            .all(|option| seen.insert(option.to_lowercase()));
        if !all_unique {
            errors.push("Duplicate options are not allowed".to_string());
        }
    }

    if let Some(days) = data.expiration_days.as_deref() {
        if days != "never" && !is_valid_expiration(days) {
            errors.push("Expiration days must be between 1 and 365".to_string());
        }
    }

    ValidationResult::from_errors(errors)
}

fn is_valid_expiration(value: &str) -> bool {
    value
        .trim()
        .parse::<i64>()
        .map(|days| (1..=365).contains(&days))
        .unwrap_or(false)
}

pub fn validate_poll_id(poll_id: &str) -> ValidationResult {
    let mut errors = Vec::new();
    if poll_id.trim().is_empty() {
        errors.push("Poll ID is required".to_string());
    }
    ValidationResult::from_errors(errors)
}

pub fn validate_option_id(option_id: &str) -> ValidationResult {
    let mut errors = Vec::new();
    if option_id.trim().is_empty() {
        errors.push("Option ID is required".to_string());
    }
    ValidationResult::from_errors(errors)
}

/// Both identifiers checked together so the caller gets every violation
/// in one pass, poll errors first.
pub fn validate_vote(poll_id: &str, option_id: &str) -> ValidationResult {
    let mut errors = validate_poll_id(poll_id).errors;
    errors.extend(validate_option_id(option_id).errors);
    ValidationResult::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, options: &[&str]) -> CreatePollRequest {
        CreatePollRequest {
            title: title.to_string(),
            description: None,
            options: options.iter().map(|o| o.to_string()).collect(),
            is_public: true,
            allow_multiple_votes: false,
            expiration_days: None,
        }
    }

    #[test]
    fn accepts_a_minimal_valid_poll() {
        let result = validate_create_poll(&request("Lunch?", &["Pizza", "Salad"]));
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn rejects_blank_title() {
        let result = validate_create_poll(&request("   ", &["A", "B"]));
        assert!(!result.is_valid);
        assert!(result.errors.contains(&"Poll title is required".to_string()));
    }

    #[test]
    fn rejects_overlong_title() {
        let title = "x".repeat(201);
        let result = validate_create_poll(&request(&title, &["A", "B"]));
        assert!(result
            .errors
            .contains(&"Poll title must be less than 200 characters".to_string()));
    }

    #[test]
    fn rejects_overlong_description() {
        let mut data = request("Lunch?", &["A", "B"]);
        data.description = Some("y".repeat(1001));
        let result = validate_create_poll(&data);
        assert!(result
            .errors
            .contains(&"Poll description must be less than 1000 characters".to_string()));
    }

    #[test]
    fn rejects_too_few_options() {
        let result = validate_create_poll(&request("Lunch?", &["Pizza"]));
        assert!(result
            .errors
            .contains(&"At least 2 options are required".to_string()));
    }

    #[test]
    fn rejects_more_than_ten_options() {
        let options: Vec<String> = (0..11).map(|i| format!("Option {i}")).collect();
        let refs: Vec<&str> = options.iter().map(String::as_str).collect();
        let result = validate_create_poll(&request("Lunch?", &refs));
        assert!(result
            .errors
            .contains(&"Maximum 10 options allowed".to_string()));
    }

    #[test]
    fn blank_options_do_not_count() {
        let result = validate_create_poll(&request("Lunch?", &["Pizza", "   "]));
        assert!(result
            .errors
            .contains(&"At least 2 valid options are required".to_string()));
    }

    #[test]
    fn rejects_overlong_option_with_its_position() {
        let long = "z".repeat(201);
        let result = validate_create_poll(&request("Lunch?", &["Pizza", &long]));
        assert!(result
            .errors
            .contains(&"Option 2 must be less than 200 characters".to_string()));
    }

    #[test]
    fn rejects_case_insensitive_duplicates_after_trimming() {
        let result = validate_create_poll(&request("Lunch?", &["Pizza", " pizza "]));
        assert!(!result.is_valid);
        assert!(result
            .errors
            .contains(&"Duplicate options are not allowed".to_string()));
    }

    #[test]
    fn expiration_never_is_accepted() {
        let mut data = request("Lunch?", &["A", "B"]);
        data.expiration_days = Some("never".to_string());
        assert!(validate_create_poll(&data).is_valid);
    }

    #[test]
    fn expiration_bounds_are_enforced() {
        for bad in ["0", "366", "-3", "soon", "7.5"] {
            let mut data = request("Lunch?", &["A", "B"]);
            data.expiration_days = Some(bad.to_string());
            let result = validate_create_poll(&data);
            assert!(
                result
                    .errors
                    .contains(&"Expiration days must be between 1 and 365".to_string()),
                "expected rejection for {bad:?}"
            );
        }

        for good in ["1", "7", "365"] {
            let mut data = request("Lunch?", &["A", "B"]);
            data.expiration_days = Some(good.to_string());
            assert!(validate_create_poll(&data).is_valid, "expected {good:?} to pass");
        }
    }

    #[test]
    fn collects_every_violation_in_one_pass() {
        let mut data = request("", &["Pizza"]);
        data.expiration_days = Some("500".to_string());
        let result = validate_create_poll(&data);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn vote_validation_composes_both_ids() {
        let result = validate_vote("  ", "");
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Poll ID is required".to_string(), "Option ID is required".to_string()]
        );

        assert!(validate_vote("abc", "def").is_valid);
    }
}
