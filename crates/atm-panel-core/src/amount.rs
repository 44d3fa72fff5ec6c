//! Conversion between user-entered decimal amounts and contract base units.

use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::{I256, U256};
use atm_api_types::Action;

use crate::error::AmountError;

/// A strictly positive amount in base units that also fits a signed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount(U256);

impl Amount {
    /// Parse a human decimal such as `"1.5"` into base units of a currency
    /// with `decimals` fractional digits.
    pub fn parse(input: &str, decimals: u8) -> Result<Self, AmountError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(AmountError::Empty);
        }
        if text.starts_with('-') {
            return Err(AmountError::NotPositive);
        }

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
            return Err(AmountError::Malformed(text.to_owned()));
        }
        if fraction.len() > usize::from(decimals) {
            return Err(AmountError::TooPrecise { decimals });
        }

        let whole = if whole.is_empty() { "0" } else { whole };
        let canonical = if fraction.is_empty() {
            whole.to_owned()
        } else {
            format!("{whole}.{fraction}")
        };
        let value = parse_units(&canonical, decimals)
            .map_err(|_| AmountError::Malformed(text.to_owned()))?
            .get_absolute();
        if value.is_zero() {
            return Err(AmountError::NotPositive);
        }
        if value > I256::MAX.into_raw() {
            return Err(AmountError::OutOfRange);
        }
        Ok(Self(value))
    }

    pub fn base_units(self) -> U256 {
        self.0
    }

    /// Signed value as logged: deposits positive, withdrawals negative.
    pub fn signed_for(self, action: Action) -> I256 {
        let value = I256::from_raw(self.0);
        match action {
            Action::Deposit => value,
            Action::Withdraw => -value,
        }
    }
}

/// Render base units as a decimal string without trailing fractional zeros.
pub fn format_amount(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let Ok(mut text) = format_units(value, decimals) else {
        return value.to_string();
    };
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').len();
        text.truncate(trimmed);
        if text.ends_with('.') {
            text.push('0');
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETHER: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn parses_fractional_ether() {
        let amount = Amount::parse(" 1.5 ", 18).expect("valid");
        assert_eq!(amount.base_units(), U256::from(ETHER + ETHER / 2));

        let amount = Amount::parse(".25", 18).expect("valid");
        assert_eq!(amount.base_units(), U256::from(ETHER / 4));

        let amount = Amount::parse("3", 18).expect("valid");
        assert_eq!(amount.base_units(), U256::from(3 * ETHER));
    }

    #[test]
    fn rejects_non_positive_and_malformed_input() {
        assert_eq!(Amount::parse("", 18), Err(AmountError::Empty));
        assert_eq!(Amount::parse("   ", 18), Err(AmountError::Empty));
        assert_eq!(Amount::parse("0", 18), Err(AmountError::NotPositive));
        assert_eq!(Amount::parse("0.000", 18), Err(AmountError::NotPositive));
        assert_eq!(Amount::parse("-2", 18), Err(AmountError::NotPositive));
        assert!(matches!(Amount::parse("abc", 18), Err(AmountError::Malformed(_))));
        assert!(matches!(Amount::parse("1e5", 18), Err(AmountError::Malformed(_))));
        assert!(matches!(Amount::parse("1.2.3", 18), Err(AmountError::Malformed(_))));
        assert!(matches!(Amount::parse(".", 18), Err(AmountError::Malformed(_))));
    }

    #[test]
    fn rejects_precision_finer_than_base_unit() {
        assert_eq!(
            Amount::parse("0.1234567", 6),
            Err(AmountError::TooPrecise { decimals: 6 })
        );
        assert!(Amount::parse("0.123456", 6).is_ok());
    }

    #[test]
    fn rejects_amounts_beyond_signed_range() {
        // 10^77 base units fits U256 but not the signed log entry
        let huge = format!("1{}", "0".repeat(59));
        assert_eq!(Amount::parse(&huge, 18), Err(AmountError::OutOfRange));

        let overflowing = format!("1{}", "0".repeat(79));
        assert!(matches!(Amount::parse(&overflowing, 18), Err(AmountError::Malformed(_))));
    }

    #[test]
    fn withdraw_is_signed_negative() {
        let amount = Amount::parse("0.5", 18).expect("valid");
        let deposit = amount.signed_for(Action::Deposit);
        let withdraw = amount.signed_for(Action::Withdraw);

        assert!(deposit.is_positive());
        assert!(withdraw.is_negative());
        assert_eq!(withdraw.unsigned_abs(), amount.base_units());
    }

    #[test]
    fn formats_without_trailing_zeros() {
        assert_eq!(format_amount(U256::from(ETHER + ETHER / 2), 18), "1.5");
        assert_eq!(format_amount(U256::from(2 * ETHER), 18), "2.0");
        assert_eq!(format_amount(U256::ZERO, 18), "0.0");
        assert_eq!(format_amount(U256::from(1u64), 18), "0.000000000000000001");
        assert_eq!(format_amount(U256::from(5u64), 0), "5");
        assert_eq!(format_amount(U256::from(1_250u64), 3), "1.25");
    }
}
