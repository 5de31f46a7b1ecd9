//! Fixed-length name strings and ether amount formatting
//!
//! Proposal names travel as 32-byte zero-padded strings, the same shape the
//! ballot contract surface exposes. Amounts are wei denominated `u128`
//! values with 18 decimals.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wei per whole ether (18 decimals).
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// A fixed-length, zero-padded UTF-8 string, as stored in proposal names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bytes32(pub [u8; 32]);

/// Encode a string into a zero-padded 32-byte value. The encoded form must
/// leave at least one trailing zero byte, so the source string is limited to
/// 31 bytes.
impl FromStr for Bytes32 {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() > 31 {
            return Err(LedgerError::InvalidBytes32(format!(
                "string must be at most 31 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 32];
        out[..bytes.len()].copy_from_slice(bytes);
        Ok(Bytes32(out))
    }
}

impl Bytes32 {
    /// Decode back to a string, trimming the zero padding.
    pub fn parse(&self) -> Result<String, LedgerError> {
        let end = self
            .0
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.0.len());
        // Everything after the first zero byte must also be zero
        if self.0[end..].iter().any(|&b| b != 0) {
            return Err(LedgerError::InvalidBytes32(
                "padding contains non-zero bytes".to_string(),
            ));
        }
        String::from_utf8(self.0[..end].to_vec())
            .map_err(|e| LedgerError::InvalidBytes32(format!("invalid UTF-8: {}", e)))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.parse() {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "0x{}", hex::encode(self.0)),
        }
    }
}

/// Encode a list of proposal names.
pub fn names_to_bytes32(names: &[String]) -> Result<Vec<Bytes32>, LedgerError> {
    names.iter().map(|n| n.parse()).collect()
}

/// Parse a decimal ether amount ("10", "0.01") into wei.
pub fn parse_ether(amount: &str) -> Result<u128, LedgerError> {
    let mut parts = amount.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let frac = parts.next().unwrap_or("");

    if whole.is_empty() && frac.is_empty() {
        return Err(LedgerError::InvalidAmount(amount.to_string()));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(LedgerError::InvalidAmount(amount.to_string()));
    }
    if frac.len() > 18 {
        return Err(LedgerError::InvalidAmount(format!(
            "{} has more than 18 decimal places",
            amount
        )));
    }

    let whole_wei = if whole.is_empty() {
        0u128
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| LedgerError::InvalidAmount(amount.to_string()))?
            .checked_mul(WEI_PER_ETHER)
            .ok_or_else(|| LedgerError::InvalidAmount(amount.to_string()))?
    };

    let frac_wei = if frac.is_empty() {
        0u128
    } else {
        let scale = 10u128.pow((18 - frac.len()) as u32);
        frac.parse::<u128>()
            .map_err(|_| LedgerError::InvalidAmount(amount.to_string()))?
            * scale
    };

    whole_wei
        .checked_add(frac_wei)
        .ok_or_else(|| LedgerError::InvalidAmount(amount.to_string()))
}

/// Format a wei amount as a decimal ether string, trimming trailing zeros.
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let frac = wei % WEI_PER_ETHER;
    if frac == 0 {
        return format!("{}", whole);
    }
    let frac_str = format!("{:018}", frac);
    format!("{}.{}", whole, frac_str.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes32_round_trip() {
        let name: Bytes32 = "Proposal 1".parse().unwrap();
        assert_eq!(name.parse().unwrap(), "Proposal 1");
        assert_eq!(name.to_string(), "Proposal 1");
        // Padding is zeros
        assert!(name.as_bytes()[10..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_bytes32_rejects_long_strings() {
        let exactly_31 = "a".repeat(31);
        assert!(exactly_31.parse::<Bytes32>().is_ok());

        let too_long = "a".repeat(32);
        let err = too_long.parse::<Bytes32>().unwrap_err();
        assert!(err.to_string().contains("at most 31 bytes"));
    }

    #[test]
    fn test_bytes32_rejects_dirty_padding() {
        let mut raw = [0u8; 32];
        raw[0] = b'a';
        raw[31] = 1;
        assert!(Bytes32(raw).parse().is_err());
    }

    #[test]
    fn test_parse_ether() {
        assert_eq!(parse_ether("1").unwrap(), WEI_PER_ETHER);
        assert_eq!(parse_ether("10").unwrap(), 10 * WEI_PER_ETHER);
        assert_eq!(parse_ether("0.01").unwrap(), WEI_PER_ETHER / 100);
        assert_eq!(parse_ether("0.000000000000000001").unwrap(), 1);
        assert_eq!(parse_ether("2.5").unwrap(), 5 * WEI_PER_ETHER / 2);
    }

    #[test]
    fn test_parse_ether_invalid() {
        assert!(parse_ether("").is_err());
        assert!(parse_ether("abc").is_err());
        assert!(parse_ether("1.0000000000000000001").is_err());
        assert!(parse_ether("-1").is_err());
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(WEI_PER_ETHER), "1");
        assert_eq!(format_ether(WEI_PER_ETHER / 100), "0.01");
        assert_eq!(format_ether(0), "0");
        assert_eq!(format_ether(5 * WEI_PER_ETHER / 2), "2.5");
    }

    #[test]
    fn test_format_parse_round_trip() {
        for amount in ["0.01", "10", "1234.56789"] {
            let wei = parse_ether(amount).unwrap();
            assert_eq!(format_ether(wei), amount);
        }
    }
}
