//! Ticker alias resolution.
//!
//! Merges alias candidates from the dynamic generator, the user's alias file,
//! and the built-in regional defaults into one [`AliasSet`]. The ticker symbol
//! itself is always the last candidate, so it is always a member.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Built-in aliases for tickers whose coverage is mostly regional.
pub const REGIONAL_DEFAULT_ALIASES: &[(&str, &[&str])] = &[
    ("YPF", &["YPF", "Yacimientos Petrolíferos Fiscales"]),
    ("PAM", &["Pampa Energía", "Pampa Energia", "Pampa Holding"]),
];

/// One user-supplied alias entry: a bare string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasValue {
    Single(String),
    Multiple(Vec<String>),
}

impl AliasValue {
    /// The alias strings in declaration order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            AliasValue::Single(s) => vec![s.as_str()],
            AliasValue::Multiple(v) => v.iter().map(String::as_str).collect(),
        }
    }

    /// Append more aliases, promoting a single value to a list.
    pub fn extend(&mut self, more: impl IntoIterator<Item = String>) {
        let mut merged = match std::mem::replace(self, AliasValue::Multiple(Vec::new())) {
            AliasValue::Single(s) => vec![s],
            AliasValue::Multiple(v) => v,
        };
        merged.extend(more);
        *self = AliasValue::Multiple(merged);
    }
}

/// User alias configuration keyed by upper-cased ticker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAliases(HashMap<String, AliasValue>);

impl UserAliases {
    #[must_use]
    pub fn get(&self, ticker: &str) -> Option<&AliasValue> {
        self.0.get(ticker)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert or replace the entry for `ticker`.
    pub fn insert(&mut self, ticker: &str, value: AliasValue) {
        self.0.insert(normalize_key(ticker), value);
    }

    /// Merge extra aliases after any existing entries for the same ticker.
    pub fn merge_extra(&mut self, extra: HashMap<String, Vec<String>>) {
        for (ticker, values) in extra {
            match self.0.get_mut(&normalize_key(&ticker)) {
                Some(existing) => existing.extend(values),
                None => self.insert(&ticker, AliasValue::Multiple(values)),
            }
        }
    }

    /// Flatten to plain lists, as consumed by alias generators.
    #[must_use]
    pub fn to_lists(&self) -> HashMap<String, Vec<String>> {
        self.0
            .iter()
            .map(|(k, v)| {
                (
                    k.clone(),
                    v.values().into_iter().map(str::to_string).collect(),
                )
            })
            .collect()
    }

    /// Parse the JSON alias document.
    ///
    /// Entries whose value is neither a string nor a list of strings are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the document is not an object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut aliases = Self::default();
        for (ticker, value) in raw {
            match serde_json::from_value::<AliasValue>(value) {
                Ok(v) => aliases.insert(&ticker, v),
                Err(e) => {
                    tracing::warn!(ticker = %ticker, error = %e, "skipping malformed alias entry");
                }
            }
        }
        Ok(aliases)
    }
}

fn normalize_key(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// Load the user alias file.
///
/// A missing file or malformed content yields an empty mapping; neither is an error.
#[must_use]
pub fn load_user_aliases(path: &Path) -> UserAliases {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no user alias file");
            return UserAliases::default();
        }
    };
    match UserAliases::from_json(&content) {
        Ok(aliases) => aliases,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed alias file");
            UserAliases::default()
        }
    }
}

/// Parse the compact extra-alias syntax: `"MSFT:Azure|Windows;AAPL:iPhone|Mac"`.
#[must_use]
pub fn parse_extra_aliases(expr: &str) -> HashMap<String, Vec<String>> {
    let mut result = HashMap::new();
    for block in expr.split(';') {
        let Some((ticker, values)) = block.split_once(':') else {
            continue;
        };
        let ticker = ticker.trim().to_uppercase();
        let aliases: Vec<String> = values
            .split('|')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        if !ticker.is_empty() && !aliases.is_empty() {
            result.insert(ticker, aliases);
        }
    }
    result
}

/// Deduplicate case-insensitively on the trimmed value, keeping first-seen order.
///
/// Empty and whitespace-only entries are dropped; survivors are trimmed.
pub fn dedupe_keep_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let trimmed = item.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Resolved search terms per ticker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AliasSet(HashMap<String, Vec<String>>);

impl AliasSet {
    /// Aliases for `ticker`, empty when the ticker was not resolved.
    #[must_use]
    pub fn get(&self, ticker: &str) -> &[String] {
        self.0.get(ticker).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn contains_ticker(&self, ticker: &str) -> bool {
        self.0.contains_key(ticker)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Vec<String>)> for AliasSet {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn regional_defaults(ticker: &str) -> &'static [&'static str] {
    REGIONAL_DEFAULT_ALIASES
        .iter()
        .find(|(t, _)| *t == ticker)
        .map(|&(_, aliases)| aliases)
        .unwrap_or_default()
}

/// Merge alias sources for every ticker.
///
/// Candidate order is dynamic, user, regional default, then the ticker
/// symbol. The first occurrence of a case-insensitive duplicate wins.
#[must_use]
pub fn merge_aliases(
    tickers: &[String],
    user: &UserAliases,
    dynamic: &HashMap<String, Vec<String>>,
) -> AliasSet {
    tickers
        .iter()
        .map(|ticker| {
            let mut combo: Vec<&str> = Vec::new();
            if let Some(dyn_aliases) = dynamic.get(ticker) {
                combo.extend(dyn_aliases.iter().map(String::as_str));
            }
            if let Some(user_value) = user.get(ticker) {
                combo.extend(user_value.values());
            }
            combo.extend(regional_defaults(ticker));
            combo.push(ticker.as_str());
            (ticker.clone(), dedupe_keep_order(combo))
        })
        .collect()
}
