//! Stable application-wide constants.
//!
//! Values here are algorithm coefficients, structural invariants, and default
//! fallbacks for env-var-based configuration. Runtime knobs live in
//! [`Config`](crate::config::Config).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- External service defaults ---

/// Nominatim-compatible geocoding endpoint.
pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";
/// OSRM-compatible routing endpoint. The foot profile is appended per request.
pub const DEFAULT_ROUTER_BASE_URL: &str = "https://router.project-osrm.org/route/v1";
/// Multi-stop walking directions deep link.
pub const DEFAULT_NAVIGATION_BASE_URL: &str = "https://www.google.com/maps/dir/";
/// Nominatim's usage policy rejects requests without an identifying agent.
pub const DEFAULT_USER_AGENT: &str = "easyloop/0.1";

// --- Outbound HTTP policy defaults ---

pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_HTTP_MAX_RETRIES: usize = 2;
pub const DEFAULT_HTTP_RETRY_BACKOFF_MS: u64 = 500;

// --- Geocode cache defaults ---

/// Geocoding results for an address rarely move: 24 hours.
pub const DEFAULT_GEOCODE_CACHE_TTL_SECONDS: u64 = 86_400;
pub const DEFAULT_GEOCODE_CACHE_MAX_ENTRIES: u64 = 1_000;
/// Reverse lookups are keyed on coordinates rounded to this many decimals (~1m).
pub const REVERSE_CACHE_KEY_DECIMALS: u32 = 5;

// --- Loop generation ---

/// Flat-earth approximation: kilometers per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;
/// Assumed walking pace used for duration targets and duration estimates.
pub const WALKING_SPEED_KMH: f64 = 5.0;
/// Minutes per kilometer at [`WALKING_SPEED_KMH`].
pub const MINUTES_PER_KM: f64 = 60.0 / WALKING_SPEED_KMH;
/// Kilometers covered per minute at [`WALKING_SPEED_KMH`].
pub const WALKING_SPEED_KM_PER_MIN: f64 = WALKING_SPEED_KMH / 60.0;

/// Display colors cyclically assigned by history position.
pub const LOOP_PALETTE: [&str; 5] = ["#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4"];

/// Number of most recent loops shown on the map by default.
pub const DEFAULT_VISIBLE_LOOPS: usize = 6;

// --- Navigation export ---

/// The path is sampled every `len / NAVIGATION_SAMPLE_DIVISOR` points.
pub const NAVIGATION_SAMPLE_DIVISOR: usize = 10;
