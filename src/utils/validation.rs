use crate::utils::error::{RegistrarError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(RegistrarError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(RegistrarError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u32, min_value: u32) -> Result<()> {
    if value < min_value {
        return Err(RegistrarError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistrarError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(RegistrarError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 檢查 id 是否重複，回報第一個重複的 id
pub fn validate_unique_ids<'a>(field_name: &str, ids: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(RegistrarError::ConfigValidationError {
                field: field_name.to_string(),
                message: format!("Duplicate id '{}'", id),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("registration.credit_ceiling", 18, 1).is_ok());
        assert!(validate_positive_number("registration.credit_ceiling", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("registration.recommended_min_credits", 12, 0, 18).is_ok());
        assert!(validate_range("registration.recommended_min_credits", 19, 0, 18).is_err());
    }

    #[test]
    fn test_validate_unique_ids() {
        assert!(validate_unique_ids("courses", ["1", "2", "comp-1"]).is_ok());

        let err = validate_unique_ids("courses", ["1", "2", "1"]).unwrap_err();
        assert!(err.to_string().contains("Duplicate id '1'"));
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("courses.code", "CS3010").is_ok());
        assert!(validate_non_empty_string("courses.code", "   ").is_err());
    }
}
