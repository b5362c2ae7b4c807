//! Currency Formatting
//!
//! Maps a numeric amount and an optional currency code to a display string.
//! When no code is given the currency configured in the [`PreferenceStore`]
//! is used.
//!
//! | code | symbol | grouping locale |
//! |------|--------|-----------------|
//! | PHP  | ₱      | en-PH |
//! | USD  | $      | en-US |
//! | EUR  | €      | de-DE |
//! | GBP  | £      | en-GB |
//! | JPY  | ¥      | ja-JP |
//! | CAD  | C$     | en-CA |
//!
//! Unknown codes render with the USD pairing.

use crate::preferences::PreferenceStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed USD to PHP rate used by [`usd_to_php`]
///
/// This is a static approximation carried over from early pricing sheets. It is
/// not a live exchange rate and must not be used for settlement.
pub const LEGACY_USD_TO_PHP_RATE: f64 = 56.0;

/// Maximum fraction digits rendered, matching `toLocaleString` defaults
const MAX_FRACTION_DIGITS: usize = 3;

/// Fraction digits expanded before rounding; enough to see every binary tie exactly
const EXPANSION_DIGITS: usize = 30;

/// Supported display currencies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    USD,
    PHP,
    EUR,
    GBP,
    JPY,
    CAD,
}

/// Number grouping conventions of a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub tag: &'static str,
    pub group: char,
    pub decimal: char,
}

const EN_US: Locale = Locale {
    tag: "en-US",
    group: ',',
    decimal: '.',
};

impl Currency {
    /// Get all currencies in selector order
    pub fn all() -> &'static [Currency] {
        &[
            Currency::USD,
            Currency::PHP,
            Currency::EUR,
            Currency::GBP,
            Currency::JPY,
            Currency::CAD,
        ]
    }

    /// Look up a currency by ISO code, ignoring case and surrounding whitespace
    pub fn from_code(code: &str) -> Option<Currency> {
        let code = code.trim();
        Currency::all()
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::PHP => "PHP",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::PHP => "₱",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
        }
    }

    /// Human readable name for selectors
    pub fn name(&self) -> &'static str {
        match self {
            Currency::USD => "US Dollar",
            Currency::PHP => "Philippine Peso",
            Currency::EUR => "Euro",
            Currency::GBP => "British Pound",
            Currency::JPY => "Japanese Yen",
            Currency::CAD => "Canadian Dollar",
        }
    }

    pub fn locale(&self) -> Locale {
        match self {
            Currency::USD => EN_US,
            Currency::PHP => Locale {
                tag: "en-PH",
                ..EN_US
            },
            Currency::EUR => Locale {
                tag: "de-DE",
                group: '.',
                decimal: ',',
            },
            Currency::GBP => Locale {
                tag: "en-GB",
                ..EN_US
            },
            Currency::JPY => Locale {
                tag: "ja-JP",
                ..EN_US
            },
            Currency::CAD => Locale {
                tag: "en-CA",
                ..EN_US
            },
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| format!("Unsupported currency: {}", s))
    }
}

/// Format `value` in `currency`, or in the stored preference when `currency` is `None`
///
/// Unsupported codes fall back silently to USD formatting.
pub fn format_currency(value: f64, currency: Option<&str>, prefs: &PreferenceStore) -> String {
    let currency = match currency {
        Some(code) => Currency::from_code(code).unwrap_or_else(|| {
            tracing::debug!("Unknown currency code {:?}, formatting as USD", code);
            Currency::USD
        }),
        None => prefs.currency(),
    };
    format_amount(value, currency)
}

/// Format `value` with the symbol and grouping of `currency`
pub fn format_amount(value: f64, currency: Currency) -> String {
    format!("{}{}", currency.symbol(), localize_number(value, currency.locale()))
}

/// Legacy fixed-rate conversion from US dollars to Philippine pesos
///
/// See [`LEGACY_USD_TO_PHP_RATE`]; the result is an approximation only.
pub fn usd_to_php(amount_usd: f64) -> f64 {
    amount_usd * LEGACY_USD_TO_PHP_RATE
}

/// Render a number with up to three fraction digits and locale grouping
///
/// Ties round away from zero, and a negative value that rounds to zero keeps
/// its sign (`-0`), as `toLocaleString` does.
pub fn localize_number(value: f64, locale: Locale) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let (int_part, frac_part) = round_half_away(value.abs());
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(int_part.len() + frac.len() + 4);
    if value.is_sign_negative() {
        out.push('-');
    }
    out.push_str(&group_digits(&int_part, locale.group));
    if !frac.is_empty() {
        out.push(locale.decimal);
        out.push_str(frac);
    }
    out
}

/// Round a non-negative finite value to [`MAX_FRACTION_DIGITS`] places, ties away from zero
///
/// Works on the decimal expansion so ties that are exact in binary (`1.0625`)
/// are not resolved to the even digit.
fn round_half_away(abs: f64) -> (String, String) {
    let expanded = format!("{:.*}", EXPANSION_DIGITS, abs);
    let (int_part, frac_part) = expanded.split_once('.').unwrap_or((expanded.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(MAX_FRACTION_DIGITS))
        .collect();
    let round_up = matches!(frac_part.as_bytes().get(MAX_FRACTION_DIGITS), Some(d) if *d >= b'5');

    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - MAX_FRACTION_DIGITS;
    let frac = digits.split_off(split);
    (
        String::from_utf8_lossy(&digits).into_owned(),
        String::from_utf8_lossy(&frac).into_owned(),
    )
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::PreferenceUpdate;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn empty_prefs() -> PreferenceStore {
        PreferenceStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_symbol_locale_table() {
        assert_eq!(format_amount(1234.0, Currency::PHP), "₱1,234");
        assert_eq!(format_amount(1234.0, Currency::USD), "$1,234");
        assert_eq!(format_amount(1234.5, Currency::EUR), "€1.234,5");
        assert_eq!(format_amount(1234.0, Currency::GBP), "£1,234");
        assert_eq!(format_amount(1234.0, Currency::JPY), "¥1,234");
        assert_eq!(format_amount(1234.0, Currency::CAD), "C$1,234");
    }

    #[test]
    fn test_default_currency_without_preference() {
        let prefs = empty_prefs();
        assert_eq!(format_currency(1234.0, None, &prefs), "$1,234");
        assert_eq!(
            format_currency(1234.0, None, &prefs),
            format_currency(1234.0, Some("USD"), &prefs)
        );
    }

    #[test]
    fn test_currency_resolved_from_preferences() {
        let prefs = empty_prefs();
        prefs.set(PreferenceUpdate::Currency(Currency::PHP)).unwrap();
        assert_eq!(format_currency(2500.75, None, &prefs), "₱2,500.75");
        // Explicit code wins over the preference
        assert_eq!(format_currency(2500.75, Some("GBP"), &prefs), "£2,500.75");
    }

    #[test]
    fn test_corrupt_preferences_format_as_usd() {
        let storage = Arc::new(MemoryStore::new());
        storage.set_item("system-preferences", "{{{").unwrap();
        let prefs = PreferenceStore::new(storage);
        assert_eq!(format_currency(10.0, None, &prefs), "$10");
    }

    #[test]
    fn test_unknown_code_falls_back_to_usd() {
        let prefs = empty_prefs();
        assert_eq!(format_currency(1234.0, Some("XYZ"), &prefs), "$1,234");
        assert_eq!(format_currency(1234.0, Some(""), &prefs), "$1,234");
        assert_eq!(format_currency(99.0, Some("eur"), &prefs), "€99");
    }

    #[test]
    fn test_number_localization() {
        assert_eq!(localize_number(0.0, EN_US), "0");
        assert_eq!(localize_number(999.0, EN_US), "999");
        assert_eq!(localize_number(1_000_000.0, EN_US), "1,000,000");
        assert_eq!(localize_number(12.3456, EN_US), "12.346");
        assert_eq!(localize_number(0.1, EN_US), "0.1");
        assert_eq!(localize_number(-5.0, EN_US), "-5");
        assert_eq!(localize_number(-0.0001, EN_US), "-0");
        assert_eq!(localize_number(999.9996, EN_US), "1,000");
        assert_eq!(localize_number(f64::NAN, EN_US), "NaN");
        assert_eq!(localize_number(f64::NEG_INFINITY, EN_US), "-∞");
        assert_eq!(
            localize_number(1234567.891, Currency::EUR.locale()),
            "1.234.567,891"
        );
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_amount(1.0625, Currency::USD), "$1.063");
        assert_eq!(format_amount(0.0625, Currency::USD), "$0.063");
        assert_eq!(format_amount(2.5, Currency::USD), "$2.5");
        assert_eq!(format_amount(-1.0625, Currency::USD), "$-1.063");
        assert_eq!(format_amount(0.0004, Currency::EUR), "€0");
    }

    #[test]
    fn test_negative_amount_keeps_sign_on_number() {
        assert_eq!(format_amount(-1234.0, Currency::USD), "$-1,234");
    }

    #[test]
    fn test_legacy_conversion() {
        assert_eq!(usd_to_php(1.0), 56.0);
        assert_eq!(usd_to_php(2.5), 140.0);
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("PHP".parse::<Currency>().unwrap(), Currency::PHP);
        assert_eq!(Currency::from_code(" cad "), Some(Currency::CAD));
        assert!("BTC".parse::<Currency>().is_err());
        assert_eq!(Currency::default(), Currency::USD);
    }
}
