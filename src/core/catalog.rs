//! Currency reference data

use super::error::CatalogError;
use std::collections::BTreeMap;
use std::fmt::Display;

/// A currency code that is known to the catalog it was looked up in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered (base, quote) pair. Displays as `BASE/QUOTE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub name: String,
    pub symbol: String,
}

/// Immutable code → {name, symbol} table, validated once at construction.
#[derive(Debug, Clone)]
pub struct CurrencyCatalog {
    entries: BTreeMap<String, CurrencyInfo>,
}

// Currencies published by the Frankfurter API.
const BUILTIN: &[(&str, &str, &str)] = &[
    ("AUD", "Australian Dollar", "A$"),
    ("BGN", "Bulgarian Lev", "лв"),
    ("BRL", "Brazilian Real", "R$"),
    ("CAD", "Canadian Dollar", "C$"),
    ("CHF", "Swiss Franc", "CHF"),
    ("CNY", "Chinese Renminbi Yuan", "¥"),
    ("CZK", "Czech Koruna", "Kč"),
    ("DKK", "Danish Krone", "kr"),
    ("EUR", "Euro", "€"),
    ("GBP", "British Pound", "£"),
    ("HKD", "Hong Kong Dollar", "HK$"),
    ("HUF", "Hungarian Forint", "Ft"),
    ("IDR", "Indonesian Rupiah", "Rp"),
    ("ILS", "Israeli New Sheqel", "₪"),
    ("INR", "Indian Rupee", "₹"),
    ("ISK", "Icelandic Króna", "kr"),
    ("JPY", "Japanese Yen", "¥"),
    ("KRW", "South Korean Won", "₩"),
    ("MXN", "Mexican Peso", "Mex$"),
    ("MYR", "Malaysian Ringgit", "RM"),
    ("NOK", "Norwegian Krone", "kr"),
    ("NZD", "New Zealand Dollar", "NZ$"),
    ("PHP", "Philippine Peso", "₱"),
    ("PLN", "Polish Złoty", "zł"),
    ("RON", "Romanian Leu", "lei"),
    ("SEK", "Swedish Krona", "kr"),
    ("SGD", "Singapore Dollar", "S$"),
    ("THB", "Thai Baht", "฿"),
    ("TRY", "Turkish Lira", "₺"),
    ("USD", "United States Dollar", "$"),
    ("ZAR", "South African Rand", "R"),
];

fn is_valid_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

impl CurrencyCatalog {
    /// Builds a catalog, rejecting malformed or repeated codes.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (code, name, symbol) in entries {
            let code = code.into();
            if !is_valid_code(&code) {
                return Err(CatalogError::InvalidCode(code));
            }
            if map.contains_key(&code) {
                return Err(CatalogError::DuplicateCode(code));
            }
            let info = CurrencyInfo {
                name: name.into(),
                symbol: symbol.into(),
            };
            map.insert(code, info);
        }
        Ok(Self { entries: map })
    }

    /// The Frankfurter currencies, validated like any other table.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN.iter().copied()).expect("built-in currency table is valid")
    }

    /// Resolves user or config text to a code, failing fast on unknown input.
    pub fn code(&self, raw: &str) -> Result<CurrencyCode, CatalogError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if self.entries.contains_key(&normalized) {
            Ok(CurrencyCode(normalized))
        } else {
            Err(CatalogError::UnknownCurrency(raw.trim().to_string()))
        }
    }

    pub fn info(&self, code: &CurrencyCode) -> Result<&CurrencyInfo, CatalogError> {
        self.entries
            .get(code.as_str())
            .ok_or_else(|| CatalogError::UnknownCurrency(code.to_string()))
    }

    /// Entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, &CurrencyInfo)> {
        self.entries
            .iter()
            .map(|(code, info)| (CurrencyCode(code.clone()), info))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
