use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Country Fact
///
/// One country as reported by the country source, before any merge.
///
/// The upstream feed omits fields for some territories (Antarctica has no
/// capital, a handful of islands have no currencies), so every field except
/// `name` falls back to its default instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CountryFact {
    pub name: String,
    #[serde(default)]
    pub capital: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub currencies: Vec<CurrencyFact>,
}

/// A currency entry of a fact. Only the code matters here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrencyFact {
    #[serde(default)]
    pub code: Option<String>,
}

impl CountryFact {
    /// Code of the first listed currency. Later entries are ignored.
    ///
    /// `None` both when the list is empty and when the first entry has no code.
    pub fn primary_currency(&self) -> Option<&str> {
        self.currencies.first().and_then(|c| c.code.as_deref())
    }
}

/// # Country Record
///
/// The canonical stored entity. `name` is the natural key and is unique under
/// case-insensitive comparison. `exchange_rate` is never set without
/// `currency_code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub capital: String,
    pub region: String,
    pub population: u64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: f64,
    pub flag_url: String,
    pub last_refreshed_at: DateTime<Utc>,
}

impl CountryRecord {
    /// An empty record for a name seen for the first time.
    pub fn new(name: impl Into<String>, refreshed_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            capital: String::new(),
            region: String::new(),
            population: 0,
            currency_code: None,
            exchange_rate: None,
            estimated_gdp: 0.0,
            flag_url: String::new(),
            last_refreshed_at: refreshed_at,
        }
    }

    /// Case-insensitive identity check against another name.
    pub fn same_name(&self, other: &str) -> bool {
        name_key(&self.name) == name_key(other)
    }
}

/// Normalised lookup key for a country name.
///
/// The only case folding used for identity. The in-batch merge, `MemoryStore`
/// and the `name_key` column of `PgStore` all compare this value, so every
/// backend agrees on non-ASCII names too.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}
