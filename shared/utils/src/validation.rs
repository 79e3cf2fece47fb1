use crate::error::{AnalyzerError, AnalyzerResult};
use validator::{Validate, ValidationErrors};

/// Validate a request body, reporting the first failing field.
pub fn validate_request<T: Validate>(request: &T) -> AnalyzerResult<()> {
    match request.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let field = errors
                .field_errors()
                .keys()
                .next()
                .map(|field| field.to_string())
                .unwrap_or_else(|| "request".to_string());
            Err(AnalyzerError::validation(field, format_validation_errors(&errors)))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            if let Some(message) = &error.message {
                messages.push(message.to_string());
                continue;
            }

            let message = match error.code.as_ref() {
                "length" => format!("Invalid length for field '{}'", field),
                "required" => format!("Field '{}' is required", field),
                _ => format!("Validation failed for field '{}': {}", field, error.code),
            };
            messages.push(message);
        }
    }

    messages.join(", ")
}
