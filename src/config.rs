use crate::constants::*;
use std::env;
use std::time::Duration;

/// Outbound HTTP policy shared by the geocoding and routing clients.
///
/// Transient failures (timeouts, connection errors, HTTP 429 and 5xx) are
/// retried up to `max_retries` times with exponential backoff starting at
/// `base_backoff`. `max_retries = 0` fails on the first error.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_backoff: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_HTTP_MAX_RETRIES,
            base_backoff: Duration::from_millis(DEFAULT_HTTP_RETRY_BACKOFF_MS),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS),
        }
    }
}

impl RetryPolicy {
    /// No retries, used where a single attempt is wanted (tests, CLI dry runs).
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Backoff before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: usize) -> Duration {
        self.base_backoff * 2_u32.saturating_pow(attempt.saturating_sub(1) as u32)
    }

    pub fn from_env() -> Result<Self, String> {
        let timeout_secs: u64 = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECONDS.to_string())
            .parse()
            .map_err(|_| "Invalid HTTP_TIMEOUT_SECS")?;

        if timeout_secs == 0 {
            return Err("HTTP_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            max_retries: env::var("HTTP_MAX_RETRIES")
                .unwrap_or_else(|_| DEFAULT_HTTP_MAX_RETRIES.to_string())
                .parse()
                .map_err(|_| "Invalid HTTP_MAX_RETRIES")?,
            base_backoff: Duration::from_millis(
                env::var("HTTP_RETRY_BACKOFF_MS")
                    .unwrap_or_else(|_| DEFAULT_HTTP_RETRY_BACKOFF_MS.to_string())
                    .parse()
                    .map_err(|_| "Invalid HTTP_RETRY_BACKOFF_MS")?,
            ),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub geocoder_base_url: String,
    pub router_base_url: String,
    pub navigation_base_url: String,
    pub user_agent: String,
    pub retry: RetryPolicy,
    pub geocode_cache_ttl: u64,
    pub geocode_cache_max_entries: u64,
    /// Number of most recent loops returned when the caller gives no limit
    pub visible_loops: usize,
    /// Fixed seed for bearing selection; random per process when unset
    pub bearing_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: 3000,
            geocoder_base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
            router_base_url: DEFAULT_ROUTER_BASE_URL.to_string(),
            navigation_base_url: DEFAULT_NAVIGATION_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
            geocode_cache_ttl: DEFAULT_GEOCODE_CACHE_TTL_SECONDS,
            geocode_cache_max_entries: DEFAULT_GEOCODE_CACHE_MAX_ENTRIES,
            visible_loops: DEFAULT_VISIBLE_LOOPS,
            bearing_seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let visible_loops: usize = env::var("HISTORY_VISIBLE_LOOPS")
            .unwrap_or_else(|_| DEFAULT_VISIBLE_LOOPS.to_string())
            .parse()
            .map_err(|_| "Invalid HISTORY_VISIBLE_LOOPS")?;

        if visible_loops == 0 {
            return Err("HISTORY_VISIBLE_LOOPS must be at least 1".to_string());
        }

        let bearing_seed = match env::var("LOOP_BEARING_SEED") {
            Ok(seed) => Some(seed.parse().map_err(|_| "Invalid LOOP_BEARING_SEED")?),
            Err(_) => None,
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            geocoder_base_url: env::var("GEOCODER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEOCODER_BASE_URL.to_string()),
            router_base_url: env::var("ROUTER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ROUTER_BASE_URL.to_string()),
            navigation_base_url: env::var("NAVIGATION_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_NAVIGATION_BASE_URL.to_string()),
            user_agent: env::var("HTTP_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            retry: RetryPolicy::from_env()?,
            geocode_cache_ttl: env::var("GEOCODE_CACHE_TTL")
                .unwrap_or_else(|_| DEFAULT_GEOCODE_CACHE_TTL_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid GEOCODE_CACHE_TTL")?,
            geocode_cache_max_entries: env::var("GEOCODE_CACHE_MAX_ENTRIES")
                .unwrap_or_else(|_| DEFAULT_GEOCODE_CACHE_MAX_ENTRIES.to_string())
                .parse()
                .map_err(|_| "Invalid GEOCODE_CACHE_MAX_ENTRIES")?,
            visible_loops,
            bearing_seed,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
