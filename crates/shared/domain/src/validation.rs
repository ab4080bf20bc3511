//! Input validation on top of the `validator` derive.

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::{DomainError, DomainResult};

/// Validate an input DTO, folding every field message into one error.
pub fn validate<T: Validate>(input: &T) -> DomainResult<()> {
    input
        .validate()
        .map_err(|e| DomainError::validation(format_validation_errors(&e)))
}

/// Format validation errors (including nested structs) into a user-friendly string
fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);
    messages.sort();
    messages.join(", ")
}

fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, out);
                }
            }
        }
    }
}
