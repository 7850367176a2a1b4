use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{DashboardError, Result};

lazy_static! {
    // 0x followed by 40 hexadecimal characters
    static ref EVM_ADDRESS_REGEX: Regex = Regex::new(r"^0x[a-fA-F0-9]{40}$").unwrap();
}

pub fn is_valid_evm_address(address: &str) -> bool {
    EVM_ADDRESS_REGEX.is_match(address)
}

/// `address` URL parameter of the allocation checker. Blank or malformed
/// values collapse to `None` without an error.
pub fn address_from_param(param: Option<&str>) -> Option<String> {
    let trimmed = param?.trim();
    if trimmed.is_empty() || !is_valid_evm_address(trimmed) {
        return None;
    }
    Some(trimmed.to_string())
}

/// Manually entered address. Blank input is not an error (`Ok(None)`);
/// malformed input yields the specific reason.
pub fn parse_address_input(input: &str) -> Result<Option<String>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if !trimmed.starts_with("0x") {
        return Err(DashboardError::InvalidAddress(
            "Address must start with '0x'".to_string(),
        ));
    }

    if trimmed.len() != 42 {
        return Err(DashboardError::InvalidAddress(
            "Address must be 42 characters long (0x + 40 hex chars)".to_string(),
        ));
    }

    if !is_valid_evm_address(trimmed) {
        return Err(DashboardError::InvalidAddress(
            "Address must contain only valid hexadecimal characters".to_string(),
        ));
    }

    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "0xd421ba69d5Cc6f89D95c528217Def05ed440657E";

    #[test]
    fn test_valid_address() {
        assert!(is_valid_evm_address(VALID));
        assert!(is_valid_evm_address(&VALID.to_lowercase()));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_evm_address(""));
        assert!(!is_valid_evm_address("0x"));
        assert!(!is_valid_evm_address(&VALID[2..]));
        assert!(!is_valid_evm_address(&format!("{}0", VALID)));
        assert!(!is_valid_evm_address("0xZZ21ba69d5Cc6f89D95c528217Def05ed440657E"));
        assert!(!is_valid_evm_address(&format!(" {}", VALID)));
        assert!(!is_valid_evm_address(&VALID.replace("0x", "0X")));
    }

    #[test]
    fn test_param_collapses_silently() {
        assert_eq!(address_from_param(None), None);
        assert_eq!(address_from_param(Some("   ")), None);
        assert_eq!(address_from_param(Some("0x123")), None);
        assert_eq!(
            address_from_param(Some(&format!("  {}  ", VALID))),
            Some(VALID.to_string())
        );
    }

    #[test]
    fn test_input_messages() {
        assert_eq!(parse_address_input("").unwrap(), None);

        let err = parse_address_input("d421ba69d5Cc6f89D95c528217Def05ed440657E").unwrap_err();
        assert_eq!(err.to_string(), "Address must start with '0x'");

        let err = parse_address_input("0x1234").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Address must be 42 characters long (0x + 40 hex chars)"
        );

        let err = parse_address_input("0xg421ba69d5Cc6f89D95c528217Def05ed440657E").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Address must contain only valid hexadecimal characters"
        );

        assert_eq!(parse_address_input(VALID).unwrap(), Some(VALID.to_string()));
    }
}
