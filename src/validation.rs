//! Validation aggregation.
//! Generic declarative checks (the `validator` derive on each resource) run
//! first, re-ordered into field-declaration order, then resource-specific
//! business rules append their findings. Problems are always collected into a
//! list, never raised; the caller decides whether any entries mean rejection.

use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{FieldError, FieldErrorList};
use crate::policy::Policy;
use crate::secret::Secret;
use crate::user::User;

impl User {
    const FIELD_ORDER: &'static [&'static str] = &["nickname", "password", "email"];

    /// Validates a user for creation: generic field checks, then password
    /// strength appended after them.
    pub fn validate(&self) -> FieldErrorList {
        let mut all = collect(Validate::validate(self), Self::FIELD_ORDER);
        if let Err(reason) = is_valid_password(&self.password) {
            all.push(FieldError::invalid("password", reason));
        }
        all
    }

    /// Like `validate`, but skips the password-strength rule: updates carry
    /// the stored hash, never a candidate plaintext.
    pub fn validate_update(&self) -> FieldErrorList {
        collect(Validate::validate(self), Self::FIELD_ORDER)
    }
}

impl Policy {
    /// Validates a policy object; generic pass only, and `Policy` currently
    /// declares no field constraints.
    pub fn validate(&self) -> FieldErrorList {
        collect(Validate::validate(self), &[])
    }
}

impl Secret {
    const FIELD_ORDER: &'static [&'static str] = &["description"];

    /// Validates a secret object; generic pass only.
    pub fn validate(&self) -> FieldErrorList {
        collect(Validate::validate(self), Self::FIELD_ORDER)
    }
}

/// Password strength rule for user creation: 8-16 characters, at least one
/// letter and one digit, no whitespace. Returns the failing reason.
pub fn is_valid_password(candidate: &str) -> Result<(), &'static str> {
    let n = candidate.chars().count();
    if n < 8 {
        return Err("password must be at least 8 characters");
    }
    if n > 16 {
        return Err("password must be at most 16 characters");
    }
    if candidate.chars().any(char::is_whitespace) {
        return Err("password must not contain whitespace");
    }
    if !candidate.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err("password must contain a letter");
    }
    if !candidate.chars().any(|c| c.is_ascii_digit()) {
        return Err("password must contain a digit");
    }
    Ok(())
}

/// Flatten a `validator` outcome into field-declaration order. The crate hands
/// back an unordered map, so the entity's declared order drives the walk.
fn collect(outcome: Result<(), ValidationErrors>, field_order: &[&str]) -> FieldErrorList {
    let mut list = FieldErrorList::new();
    let Err(errs) = outcome else {
        return list;
    };
    let by_field = errs.field_errors();
    for field in field_order {
        if let Some(entries) = by_field.get(*field) {
            for e in entries.iter() {
                list.push(from_validation_error(field, e));
            }
        }
    }
    list
}

fn from_validation_error(field: &str, e: &ValidationError) -> FieldError {
    match e.code.as_ref() {
        "length" => {
            let len = e.params.get("value").and_then(|v| v.as_str()).map(|s| s.chars().count() as u64);
            let min = e.params.get("min").and_then(|v| v.as_u64());
            let max = e.params.get("max").and_then(|v| v.as_u64());
            match (len, min, max) {
                (Some(0), Some(_), _) => FieldError::required(field, "may not be empty"),
                (Some(l), _, Some(mx)) if l > mx => {
                    FieldError::too_long(field, format!("may not be longer than {mx} characters"))
                }
                (Some(l), Some(mn), _) if l < mn => {
                    FieldError::invalid(field, format!("may not be shorter than {mn} characters"))
                }
                _ => FieldError::invalid(field, "length out of range"),
            }
        }
        "email" => FieldError::invalid(field, "must be a valid email address"),
        "required" => FieldError::required(field, "is required"),
        code => FieldError::invalid(field, format!("failed `{code}` constraint")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_strength_table() {
        assert!(is_valid_password("abc1").is_err()); // too short
        assert!(is_valid_password("a1b2c3d4e5f6g7h8i9").is_err()); // too long
        assert!(is_valid_password("abcdefgh").is_err()); // no digit
        assert!(is_valid_password("12345678").is_err()); // no letter
        assert!(is_valid_password("abcd 1234").is_err()); // whitespace
        assert!(is_valid_password("abcd1234").is_ok());
    }

    #[test]
    fn collect_orders_by_declaration() {
        let user = User {
            nickname: String::new(),
            password: String::new(),
            email: "not-an-email".into(),
            ..Default::default()
        };
        let errs = user.validate_update();
        let fields: Vec<&str> = errs.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["nickname", "password", "email"]);
    }

    #[test]
    fn empty_outcome_is_an_empty_list() {
        let secret = Secret { username: "ada".into(), description: "ci token".into(), ..Default::default() };
        assert!(secret.validate().is_empty());
    }
}
