use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.news_backend, "lexicon");
    assert_eq!(cfg.news_days, 7);
    assert_eq!(cfg.aliases_path.to_str(), Some("./aliases.json"));
    assert!(cfg.regional_fallback);
    assert_eq!(cfg.regional_max_items, 50);
    assert_eq!(cfg.region, RegionConfig::default());
    assert_eq!(cfg.http_timeout_secs, 15);
    assert_eq!(cfg.user_agent, "pnp/0.1 (portfolio-news)");
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_secs, 1);
}

#[test]
fn default_region_edition_joins_country_and_language() {
    assert_eq!(RegionConfig::default().edition(), "AR:es-419");
}

#[test]
fn news_days_override() {
    let mut map = HashMap::new();
    map.insert("PNP_NEWS_DAYS", "14");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.news_days, 14);
}

#[test]
fn news_days_invalid() {
    let mut map = HashMap::new();
    map.insert("PNP_NEWS_DAYS", "a week");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PNP_NEWS_DAYS"),
        "expected InvalidEnvVar(PNP_NEWS_DAYS), got: {result:?}"
    );
}

#[test]
fn regional_fallback_accepts_numeric_flag() {
    let mut map = HashMap::new();
    map.insert("PNP_REGIONAL_FALLBACK", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.regional_fallback);
}

#[test]
fn regional_fallback_invalid() {
    let mut map = HashMap::new();
    map.insert("PNP_REGIONAL_FALLBACK", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PNP_REGIONAL_FALLBACK"),
        "expected InvalidEnvVar(PNP_REGIONAL_FALLBACK), got: {result:?}"
    );
}

#[test]
fn region_overrides() {
    let mut map = HashMap::new();
    map.insert("PNP_REGION_LANGUAGE", "pt-BR");
    map.insert("PNP_REGION_COUNTRY", "BR");
    map.insert("PNP_REGION_CLAUSE", "(Brasil OR .br)");
    map.insert("PNP_REGION_SOURCE_LABEL", "Google News BR");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.region.edition(), "BR:pt-BR");
    assert_eq!(cfg.region.restriction_clause, "(Brasil OR .br)");
    assert_eq!(cfg.region.default_source_label, "Google News BR");
}

#[test]
fn http_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("PNP_HTTP_TIMEOUT_SECS", "-3");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PNP_HTTP_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PNP_HTTP_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn retry_settings_override() {
    let mut map = HashMap::new();
    map.insert("PNP_MAX_RETRIES", "0");
    map.insert("PNP_RETRY_BACKOFF_BASE_SECS", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.retry_backoff_base_secs, 3);
}
