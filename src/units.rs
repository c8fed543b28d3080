//! Conversions between native base-unit amounts and human-decimal strings
//!
//! Pure helpers over `ethers::utils`; no state, no I/O.

use ethers::{
    types::U256,
    utils::{format_ether, format_units, parse_ether, parse_units, ParseUnits},
};

use crate::errors::ScriptError;

/// Parse a decimal ether amount (e.g. `"1.5"`) into wei
pub fn parse_eth(amount: &str) -> Result<U256, ScriptError> {
    parse_ether(amount).map_err(|e| ScriptError::Conversion(e.to_string()))
}

/// Format a wei amount as a decimal ether string
pub fn format_eth(wei: U256) -> String {
    format_ether(wei)
}

/// Parse a decimal amount with the given number of decimals into base units
pub fn parse_token_units(amount: &str, decimals: u32) -> Result<U256, ScriptError> {
    let parsed =
        parse_units(amount, decimals).map_err(|e| ScriptError::Conversion(e.to_string()))?;
    Ok(match parsed {
        ParseUnits::U256(value) => value,
        ParseUnits::I256(value) => value.into_raw(),
    })
}

/// Format a base-unit amount as a decimal string with the given number of decimals
pub fn format_token_units(amount: U256, decimals: u32) -> Result<String, ScriptError> {
    format_units(amount, decimals).map_err(|e| ScriptError::Conversion(e.to_string()))
}

#[cfg(test)]
mod tests {
    use ethers::types::U256;

    use super::{format_eth, format_token_units, parse_eth, parse_token_units};

    #[test]
    fn ether_amounts_round_trip() {
        let wei = parse_eth("1.5").unwrap();
        assert_eq!(wei, U256::from(1_500_000_000_000_000_000u128));
        assert_eq!(format_eth(wei), "1.500000000000000000");
    }

    #[test]
    fn token_units_respect_decimals() {
        let base = parse_token_units("2.5", 6).unwrap();
        assert_eq!(base, U256::from(2_500_000u64));
        assert_eq!(format_token_units(base, 6).unwrap(), "2.500000");
    }

    #[test]
    fn garbage_amounts_are_rejected() {
        assert!(parse_eth("one point five").is_err());
        assert!(parse_token_units("", 18).is_err());
    }
}
