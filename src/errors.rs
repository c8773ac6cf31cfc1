// ABOUTME: Unified error handling re-exported from the cooks-core crate
// ABOUTME: Adds the bridge from validator failures to validation error codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use cooks_core::errors::*;

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Run derive-based validation and convert failures into an `AppError`
///
/// Failures that are all numeric range violations report `ValueOutOfRange`;
/// anything else reports `InvalidInput`.
///
/// # Errors
///
/// Returns a validation error naming every failing field
pub fn validate_input<T: Validate>(input: &T) -> AppResult<()> {
    input.validate().map_err(|errors| {
        let mut codes = Vec::new();
        collect_codes(&errors, &mut codes);
        let code = if !codes.is_empty() && codes.iter().all(|c| c == "range") {
            ErrorCode::ValueOutOfRange
        } else {
            ErrorCode::InvalidInput
        };
        AppError::new(code, describe_validation_errors(&errors))
    })
}

/// Gather validator codes from every field, including nested lists
fn collect_codes(errors: &ValidationErrors, codes: &mut Vec<String>) {
    for kind in errors.errors().values() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                codes.extend(field_errors.iter().map(|e| e.code.to_string()));
            }
            ValidationErrorsKind::Struct(nested) => collect_codes(nested, codes),
            ValidationErrorsKind::List(entries) => {
                for nested in entries.values() {
                    collect_codes(nested, codes);
                }
            }
        }
    }
}

/// Render validation failures as `field: problem` pairs sorted by field
fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut problems: Vec<String> = errors
        .errors()
        .iter()
        .map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let reasons: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map_or_else(|| e.code.to_string(), ToString::to_string)
                    })
                    .collect();
                format!("{field}: {}", reasons.join(", "))
            }
            ValidationErrorsKind::Struct(_) | ValidationErrorsKind::List(_) => {
                format!("{field}: invalid entries")
            }
        })
        .collect();
    problems.sort();
    format!("Invalid input - {}", problems.join("; "))
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 5))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_validation_failures_become_invalid_input() {
        let sample = Sample {
            name: "far too long".to_owned(),
            email: "nope".to_owned(),
        };
        let error = validate_input(&sample).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidInput);
        assert!(error.message.contains("email: email"));
        assert!(error.message.contains("name: length"));
    }

    #[derive(Validate)]
    struct Portion {
        #[validate(range(min = 0))]
        grams: i64,
    }

    #[derive(Validate)]
    struct Plate {
        #[validate(nested)]
        portions: Vec<Portion>,
    }

    #[test]
    fn test_range_failures_become_value_out_of_range() {
        let plate = Plate {
            portions: vec![Portion { grams: 10 }, Portion { grams: -5 }],
        };
        let error = validate_input(&plate).unwrap_err();
        assert_eq!(error.code, ErrorCode::ValueOutOfRange);
        assert_eq!(error.code.http_status(), 400);
    }
}
