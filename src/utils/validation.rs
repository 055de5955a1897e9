use crate::utils::error::{Result, TaggerError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 設備位址只允許 host 或 host:port，不可帶 scheme 或路徑
pub fn validate_device_address(field_name: &str, address: &str) -> Result<()> {
    if address.trim().is_empty() {
        return Err(TaggerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: "Device address cannot be empty".to_string(),
        });
    }

    if address.contains("://") || address.contains('/') {
        return Err(TaggerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: "Expected host or host:port without scheme or path".to_string(),
        });
    }

    match Url::parse(&format!("https://{}/", address)) {
        Ok(url) if url.host_str().is_some() => Ok(()),
        Ok(_) => Err(TaggerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: "Missing host".to_string(),
        }),
        Err(e) => Err(TaggerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: format!("Invalid address format: {}", e),
        }),
    }
}

pub fn validate_scheme(field_name: &str, scheme: &str) -> Result<()> {
    match scheme {
        "http" | "https" => Ok(()),
        other => Err(TaggerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: other.to_string(),
            reason: format!("Unsupported URL scheme: {}", other),
        }),
    }
}

/// xpath 直接放進查詢字串，不可含會切斷參數的字元
pub fn validate_xpath(field_name: &str, xpath: &str) -> Result<()> {
    if !xpath.starts_with('/') {
        return Err(TaggerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: xpath.to_string(),
            reason: "XPath must be absolute".to_string(),
        });
    }

    if let Some(c) = xpath
        .chars()
        .find(|c| matches!(c, '&' | '#' | '+' | '%') || c.is_whitespace())
    {
        return Err(TaggerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: xpath.to_string(),
            reason: format!("Character {:?} is not allowed in a query parameter", c),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(TaggerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| TaggerError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TaggerError::InvalidConfigValueError {
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
        return Err(TaggerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
