//! Tests for the type-safe configuration builder and environment loading

use std::collections::HashMap;
use std::time::Duration;

use kodegen_tools_factcheck::config::env::{
    ENV_FETCH_CONCURRENCY, ENV_FETCH_TIMEOUT_SECS, ENV_GEMINI_API_KEY, ENV_GEMINI_MODEL,
    ENV_QUERY_DELAY_MS, ENV_SEARCH_API_KEY, ENV_SEARCH_ENGINE_ID,
};
use kodegen_tools_factcheck::config::{
    ConfigError, DEFAULT_GEMINI_BASE_URL, DEFAULT_LANGUAGE_RESTRICT, DEFAULT_SEARCH_BASE_URL,
    FactCheckConfig, PipelineSettings,
};
use kodegen_tools_factcheck::content_fetcher::ContentFetcher;
use kodegen_tools_factcheck::web_search::GoogleSearchClient;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_builder_requires_api_key() {
    // This should not compile if uncommented - the API key is mandatory
    // let config = FactCheckConfig::builder().build();

    let config = FactCheckConfig::builder()
        .gemini_api_key("gemini-key")
        .build()
        .unwrap();
    assert_eq!(config.gemini_api_key(), "gemini-key");
}

#[test]
fn test_builder_optional_fields_have_defaults() {
    let config = FactCheckConfig::builder()
        .gemini_api_key("gemini-key")
        .build()
        .unwrap();

    assert_eq!(config.gemini_model(), "gemini-2.0-flash");
    assert_eq!(config.gemini_base_url(), DEFAULT_GEMINI_BASE_URL);
    assert_eq!(config.search_base_url(), DEFAULT_SEARCH_BASE_URL);
    assert_eq!(config.language_restrict(), Some(DEFAULT_LANGUAGE_RESTRICT));
    assert!(!config.search_enabled());
    assert_eq!(config.fetch_timeout(), Duration::from_secs(20));
    assert_eq!(config.fetch_attempts(), 1);
    assert_eq!(config.fetch_concurrency(), 5);
    assert_eq!(config.backoff_base(), Duration::from_secs(2));
    assert_eq!(config.query_delay(), Duration::from_millis(500));
    assert_eq!(config.settings(), &PipelineSettings::default());
}

#[test]
fn test_default_pipeline_settings() {
    let settings = PipelineSettings::default();
    assert_eq!(settings.first_max_queries, 3);
    assert_eq!(settings.first_fetch_top, 5);
    assert_eq!(settings.second_max_queries, 5);
    assert_eq!(settings.text_max_queries, 4);
    assert_eq!(settings.text_fetch_top, 8);
    assert!(settings.deep_analysis_enabled);
}

#[test]
fn test_builder_with_all_optional_fields() {
    let settings = PipelineSettings {
        first_fetch_top: 2,
        deep_analysis_enabled: false,
        ..PipelineSettings::default()
    };
    let config = FactCheckConfig::builder()
        .search_credentials("search-key", "engine-id")
        .gemini_api_key("gemini-key")
        .gemini_model("gemini-1.5-pro")
        .gemini_base_url("http://127.0.0.1:9000")
        .judgment_timeout_secs(30)
        .temperature(0.0)
        .search_base_url("http://127.0.0.1:9001")
        .language_restrict(None)
        .fetch_timeout_secs(7)
        .fetch_attempts(3)
        .fetch_concurrency(2)
        .backoff_base_ms(100)
        .query_delay_ms(0)
        .settings(settings.clone())
        .build()
        .unwrap();

    assert!(config.search_enabled());
    let credentials = config.search_credentials().unwrap();
    assert_eq!(credentials.api_key, "search-key");
    assert_eq!(credentials.engine_id, "engine-id");
    assert_eq!(config.gemini_model(), "gemini-1.5-pro");
    assert_eq!(config.judgment_timeout(), Duration::from_secs(30));
    assert_eq!(config.language_restrict(), None);
    assert_eq!(config.fetch_timeout(), Duration::from_secs(7));
    assert_eq!(config.fetch_attempts(), 3);
    assert_eq!(config.backoff_base(), Duration::from_millis(100));
    assert_eq!(config.query_delay(), Duration::ZERO);
    assert_eq!(config.settings(), &settings);
}

#[test]
fn test_build_rejects_invalid_values() {
    let blank_key = FactCheckConfig::builder().gemini_api_key("   ").build();
    assert_eq!(blank_key.unwrap_err(), ConfigError::EmptyApiKey);

    let zero_attempts = FactCheckConfig::builder()
        .gemini_api_key("k")
        .fetch_attempts(0)
        .build();
    assert_eq!(
        zero_attempts.unwrap_err(),
        ConfigError::Zero {
            field: "fetch_attempts"
        }
    );

    let zero_concurrency = FactCheckConfig::builder()
        .gemini_api_key("k")
        .fetch_concurrency(0)
        .build();
    assert!(matches!(zero_concurrency, Err(ConfigError::Zero { .. })));
}

#[test]
fn test_half_configured_search_is_disabled() {
    let config = FactCheckConfig::builder()
        .gemini_api_key("k")
        .search_credentials("search-key", "")
        .build()
        .unwrap();
    assert!(!config.search_enabled());
    assert!(GoogleSearchClient::from_config(&config).unwrap().is_none());
}

#[test]
fn test_from_lookup_reads_every_variable() {
    let config = FactCheckConfig::from_lookup(lookup(&[
        (ENV_GEMINI_API_KEY, " gemini-key "),
        (ENV_GEMINI_MODEL, "gemini-1.5-flash"),
        (ENV_SEARCH_API_KEY, "search-key"),
        (ENV_SEARCH_ENGINE_ID, "engine-id"),
        (ENV_FETCH_TIMEOUT_SECS, "12"),
        (ENV_FETCH_CONCURRENCY, "3"),
        (ENV_QUERY_DELAY_MS, "250"),
    ]))
    .unwrap();

    assert_eq!(config.gemini_api_key(), "gemini-key");
    assert_eq!(config.gemini_model(), "gemini-1.5-flash");
    assert!(config.search_enabled());
    assert_eq!(config.fetch_timeout(), Duration::from_secs(12));
    assert_eq!(config.fetch_concurrency(), 3);
    assert_eq!(config.query_delay(), Duration::from_millis(250));
}

#[test]
fn test_from_lookup_without_api_key_fails() {
    let err = FactCheckConfig::from_lookup(lookup(&[(ENV_SEARCH_API_KEY, "search-key")])).unwrap_err();
    assert!(err.to_string().contains(ENV_GEMINI_API_KEY));
}

#[test]
fn test_from_lookup_rejects_unparsable_numbers() {
    let result = FactCheckConfig::from_lookup(lookup(&[
        (ENV_GEMINI_API_KEY, "k"),
        (ENV_FETCH_CONCURRENCY, "many"),
    ]));
    assert!(result.is_err());
}

#[test]
fn test_search_needs_both_variables() {
    let config = FactCheckConfig::from_lookup(lookup(&[
        (ENV_GEMINI_API_KEY, "k"),
        (ENV_SEARCH_API_KEY, "search-key"),
    ]))
    .unwrap();
    assert!(!config.search_enabled());
}

#[test]
fn test_api_key_is_never_serialized() {
    let config = FactCheckConfig::builder()
        .gemini_api_key("secret-gemini-key")
        .build()
        .unwrap();
    let json = serde_json::to_string(&config).unwrap();
    assert!(!json.contains("secret-gemini-key"));
}

#[test]
fn test_fetcher_follows_config() {
    let config = FactCheckConfig::builder()
        .gemini_api_key("k")
        .fetch_timeout_secs(9)
        .fetch_attempts(2)
        .build()
        .unwrap();
    let fetcher = ContentFetcher::from_config(&config).unwrap();
    assert_eq!(fetcher.timeout(), Duration::from_secs(9));
    assert_eq!(fetcher.max_attempts(), 2);
}

#[test]
fn test_debug_output_hides_secrets() {
    let config = FactCheckConfig::builder()
        .search_credentials("secret-search-key", "engine-id")
        .gemini_api_key("secret-gemini-key")
        .build()
        .unwrap();

    let printed = format!("{config:?}");
    assert!(!printed.contains("secret-search-key"));
    assert!(!printed.contains("secret-gemini-key"));
    assert!(printed.contains("engine-id"));

    let client = GoogleSearchClient::from_config(&config).unwrap().unwrap();
    assert!(!format!("{client:?}").contains("secret-search-key"));
}
