//! Type-safe price representation using decimal arithmetic.
//!
//! Two display styles are used by the storefront:
//!
//! - [`Price::display_grouped`] - catalog cards, thousands grouped and trailing
//!   zeros dropped (`$4,500`, `$149.99`)
//! - [`Price::display_fixed`] - cart lines and totals, always two decimal places
//!   and no grouping (`$4500.00`)

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Maximum fraction digits kept by grouped display.
const GROUPED_MAX_FRACTION_DIGITS: u32 = 3;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency.
    #[must_use]
    pub fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Format with thousands grouping, e.g. `$4,500` or `$1,200.5`.
    ///
    /// At most three fraction digits are kept and trailing zeros are dropped.
    #[must_use]
    pub fn display_grouped(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(
                GROUPED_MAX_FRACTION_DIGITS,
                RoundingStrategy::MidpointAwayFromZero,
            )
            .normalize();
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = rounded.abs().to_string();
        let symbol = self.currency_code.symbol();

        match digits.split_once('.') {
            Some((whole, fraction)) => {
                format!("{sign}{symbol}{}.{fraction}", group_thousands(whole))
            }
            None => format!("{sign}{symbol}{}", group_thousands(&digits)),
        }
    }

    /// Format with exactly two decimal places, e.g. `$25.00`.
    #[must_use]
    pub fn display_fixed(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{rounded:.2}", self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_fixed())
    }
}

/// Insert a comma between every group of three digits, counted from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// The three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(amount: i64, scale: u32) -> Price {
        Price::usd(Decimal::new(amount, scale))
    }

    #[test]
    fn test_display_grouped_drops_trailing_zeros() {
        assert_eq!(usd(450_000, 2).display_grouped(), "$4,500");
        assert_eq!(usd(14_999, 2).display_grouped(), "$149.99");
        assert_eq!(usd(120_050, 2).display_grouped(), "$1,200.5");
    }

    #[test]
    fn test_display_grouped_large_amounts() {
        assert_eq!(usd(1_234_567, 0).display_grouped(), "$1,234,567");
        assert_eq!(usd(100_000, 0).display_grouped(), "$100,000");
        assert_eq!(usd(0, 0).display_grouped(), "$0");
    }

    #[test]
    fn test_display_grouped_rounds_to_three_places() {
        assert_eq!(usd(12_345, 4).display_grouped(), "$1.235");
    }

    #[test]
    fn test_display_fixed() {
        assert_eq!(usd(2500, 2).display_fixed(), "$25.00");
        assert_eq!(usd(450_000, 2).display_fixed(), "$4500.00");
        assert_eq!(usd(5, 3).display_fixed(), "$0.01");
        assert_eq!(usd(0, 0).to_string(), "$0.00");
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::USD);
        assert_eq!(CurrencyCode::EUR.symbol(), "€");
        assert_eq!(CurrencyCode::GBP.code(), "GBP");
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::GBP);
        assert_eq!(price.display_fixed(), "£19.99");
    }
}
