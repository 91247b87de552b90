use std::env;

use checkout_engine::order_objects::TotalPolicy;
use cko_common::{parse_boolean_flag, Secret, DEFAULT_CURRENCY_SYMBOL};
use discord_tools::DiscordConfig;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::errors::ServerError;

const DEFAULT_CKO_HOST: &str = "127.0.0.1";
const DEFAULT_CKO_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/checkout.db";
const DEFAULT_STORE_NAME: &str = "Checkout Store";
/// Secrets shorter than this are accepted, but are easy to brute-force
const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// When true, order totals are recomputed from the items and mismatched totals are rejected.
    pub strict_totals: bool,
    pub store: StoreConfig,
    pub discord: DiscordConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CKO_HOST.to_string(),
            port: DEFAULT_CKO_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            strict_totals: false,
            store: StoreConfig::default(),
            discord: DiscordConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("CKO_HOST").ok().unwrap_or_else(|| DEFAULT_CKO_HOST.into());
        let port = env::var("CKO_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for CKO_PORT. {e} Using the default, {DEFAULT_CKO_PORT}, instead."
                    );
                    DEFAULT_CKO_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_CKO_PORT);
        let database_url = env::var("CKO_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ CKO_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let strict_totals = parse_boolean_flag(env::var("CKO_STRICT_TOTALS").ok(), false);
        if !strict_totals {
            info!("🪛️ Order totals are trusted as submitted. Set CKO_STRICT_TOTALS=1 to recompute them from the items.");
        }
        let store = StoreConfig::from_env_or_default();
        let discord = DiscordConfig::new_from_env_or_default();
        Self { host, port, database_url, auth, strict_totals, store, discord }
    }

    pub fn total_policy(&self) -> TotalPolicy {
        TotalPolicy::from_strict_flag(self.strict_totals)
    }
}

//-------------------------------------------------  StoreConfig  ------------------------------------------------------
/// How the store presents itself in notifications.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub name: String,
    pub currency_symbol: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { name: DEFAULT_STORE_NAME.to_string(), currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string() }
    }
}

impl StoreConfig {
    pub fn from_env_or_default() -> Self {
        let name = env::var("CKO_STORE_NAME").ok().filter(|s| !s.trim().is_empty()).unwrap_or_else(|| {
            info!("🪛️ CKO_STORE_NAME is not set. Using '{DEFAULT_STORE_NAME}'.");
            DEFAULT_STORE_NAME.to_string()
        });
        let currency_symbol = env::var("CKO_CURRENCY_SYMBOL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string());
        Self { name, currency_symbol }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The shared secret that bearer tokens are signed with (HS256).
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. No token issued \
             elsewhere will be accepted. DO NOT operate in production like this. 🚨️🚨️🚨️"
        );
        let secret = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect::<String>();
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn new<S: Into<String>>(secret: S) -> Self {
        Self { jwt_secret: Secret::new(secret.into()) }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("CKO_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [CKO_JWT_SECRET]")))?;
        if secret.trim().is_empty() {
            return Err(ServerError::ConfigurationError("CKO_JWT_SECRET is empty".to_string()));
        }
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            warn!("🪛️ CKO_JWT_SECRET is shorter than {MIN_JWT_SECRET_LENGTH} characters. Consider a longer secret.");
        }
        Ok(Self::new(secret))
    }
}
