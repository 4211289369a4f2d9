//! Decimal money helpers
//!
//! All amounts are `BigDecimal`; nothing here goes through floating point.

use bigdecimal::BigDecimal;

/// Zero amount
pub fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

/// `amount x percent / 100`
pub fn percent_of(amount: &BigDecimal, percent: &BigDecimal) -> BigDecimal {
    (amount * percent) / BigDecimal::from(100)
}

/// Largest integer not greater than `amount`
pub fn floor(amount: &BigDecimal) -> BigDecimal {
    // with_scale drops digits, which truncates toward zero
    let truncated = amount.with_scale(0);
    if &truncated > amount {
        truncated - BigDecimal::from(1)
    } else {
        truncated
    }
}

/// Round to the nearest whole currency unit, ties toward positive infinity.
///
/// This is `floor(amount + 0.5)`, so `2.5 -> 3` and `-2.5 -> -2`.
pub fn round_half_up(amount: &BigDecimal) -> BigDecimal {
    let half = BigDecimal::from(1) / BigDecimal::from(2);
    floor(&(amount + half))
}

/// Returns `amount`, or zero when it is negative
pub fn non_negative(amount: BigDecimal) -> BigDecimal {
    if amount < zero() {
        zero()
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(&dec("1149.5")), dec("1150"));
        assert_eq!(round_half_up(&dec("1149.49")), dec("1149"));
        assert_eq!(round_half_up(&dec("2.5")), dec("3"));
        assert_eq!(round_half_up(&dec("-2.5")), dec("-2"));
        assert_eq!(round_half_up(&dec("-2.51")), dec("-3"));
        assert_eq!(round_half_up(&dec("7")), dec("7"));
    }

    #[test]
    fn test_floor() {
        assert_eq!(floor(&dec("3.99")), dec("3"));
        assert_eq!(floor(&dec("-0.01")), dec("-1"));
        assert_eq!(floor(&dec("-4")), dec("-4"));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(&dec("1000"), &dec("18")), dec("180"));
        assert_eq!(percent_of(&dec("999"), &dec("2.5")), dec("24.975"));
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(dec("-10")), zero());
        assert_eq!(non_negative(dec("10")), dec("10"));
    }
}
