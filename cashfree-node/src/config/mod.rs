use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use service_core::config::{self as core_config, HttpConfig};
use service_core::error::AppError;
use std::fs;

pub const DEFAULT_API_VERSION: &str = "2023-08-01";

const SANDBOX_PAYOUT_BASE_URL: &str = "https://payout-gamma.cashfree.com";
const PRODUCTION_PAYOUT_BASE_URL: &str = "https://payout-api.cashfree.com";
const SANDBOX_PG_BASE_URL: &str = "https://sandbox.cashfree.com/pg";
const PRODUCTION_PG_BASE_URL: &str = "https://api.cashfree.com/pg";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    pub fn payout_base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_PAYOUT_BASE_URL,
            Environment::Production => PRODUCTION_PAYOUT_BASE_URL,
        }
    }

    pub fn payment_gateway_base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_PG_BASE_URL,
            Environment::Production => PRODUCTION_PG_BASE_URL,
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" | "test" => Ok(Environment::Sandbox),
            "production" | "prod" | "live" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Credentials for the signed payout token exchange.
#[derive(Clone, Debug)]
pub struct PayoutCredentials {
    pub client_id: String,
    pub client_secret: Secret<String>,
    /// PEM-encoded RSA public key issued by Cashfree for payout signing.
    pub public_key: Secret<String>,
    pub environment: Environment,
}

/// How payout calls obtain their bearer token. One mode per deployment.
#[derive(Clone, Debug)]
pub enum PayoutAuth {
    PreIssuedToken {
        token: Secret<String>,
        environment: Environment,
    },
    SignedExchange(PayoutCredentials),
}

impl PayoutAuth {
    pub fn environment(&self) -> Environment {
        match self {
            PayoutAuth::PreIssuedToken { environment, .. } => *environment,
            PayoutAuth::SignedExchange(credentials) => credentials.environment,
        }
    }
}

/// Credentials for the payment gateway (orders, links, refunds).
#[derive(Clone, Debug)]
pub struct PaymentCredentials {
    pub app_id: String,
    pub secret_key: Secret<String>,
    pub api_version: String,
    pub environment: Environment,
}

#[derive(Clone, Debug)]
pub struct TokenCacheConfig {
    pub enabled: bool,
    /// Lifetime assumed for a token when the authorize response omits its expiry.
    pub ttl_secs: u64,
}

impl Default for TokenCacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_secs: 300,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NodeConfig {
    pub payout: Option<PayoutAuth>,
    pub payments: Option<PaymentCredentials>,
    pub http: HttpConfig,
    pub token_cache: TokenCacheConfig,
    pub service_name: String,
    pub log_level: String,
}

impl NodeConfig {
    /// Build the configuration from `CASHFREE_*` environment variables.
    ///
    /// HTTP timeouts are read through the layered loader under the
    /// `CASHFREE_HTTP` prefix, e.g. `CASHFREE_HTTP__REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, AppError> {
        let http: HttpConfig = core_config::load("CASHFREE_HTTP")?;
        Self::from_lookup(core_config::get_optional_env, http)
    }

    pub fn from_lookup<F>(lookup: F, http: HttpConfig) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment: Environment = match lookup("CASHFREE_ENVIRONMENT") {
            Some(raw) => raw
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            None => Environment::default(),
        };

        let payout = payout_auth_from_lookup(&lookup, environment)?;

        let payments = lookup("CASHFREE_APP_ID").map(|app_id| PaymentCredentials {
            app_id,
            secret_key: Secret::new(lookup("CASHFREE_SECRET_KEY").unwrap_or_default()),
            api_version: lookup("CASHFREE_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            environment,
        });

        let token_cache = TokenCacheConfig {
            enabled: parse_lookup(&lookup, "CASHFREE_TOKEN_CACHE_ENABLED", false)?,
            ttl_secs: parse_lookup(&lookup, "CASHFREE_TOKEN_CACHE_TTL_SECS", 300)?,
        };

        let config = NodeConfig {
            payout,
            payments,
            http,
            token_cache,
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| "cashfree-node".to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.http.request_timeout_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "CASHFREE_HTTP__REQUEST_TIMEOUT_SECS must be greater than 0"
            )));
        }

        if self.token_cache.enabled && self.token_cache.ttl_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "CASHFREE_TOKEN_CACHE_TTL_SECS must be positive when the token cache is enabled"
            )));
        }

        if let Some(payments) = &self.payments {
            if payments.secret_key.expose_secret().trim().is_empty() {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "CASHFREE_SECRET_KEY is required when CASHFREE_APP_ID is set"
                )));
            }
        }

        Ok(())
    }
}

fn payout_auth_from_lookup<F>(
    lookup: &F,
    environment: Environment,
) -> Result<Option<PayoutAuth>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let token = lookup("CASHFREE_PAYOUT_TOKEN");
    let client_id = lookup("CASHFREE_PAYOUT_CLIENT_ID");

    match (token, client_id) {
        (Some(_), Some(_)) => Err(AppError::ConfigError(anyhow::anyhow!(
            "CASHFREE_PAYOUT_TOKEN and CASHFREE_PAYOUT_CLIENT_ID are mutually exclusive; \
             configure either a pre-issued token or a signed exchange"
        ))),
        (Some(token), None) => Ok(Some(PayoutAuth::PreIssuedToken {
            token: Secret::new(token),
            environment,
        })),
        (None, Some(client_id)) => {
            let public_key = match lookup("CASHFREE_PAYOUT_PUBLIC_KEY") {
                Some(pem) => pem,
                None => match lookup("CASHFREE_PAYOUT_PUBLIC_KEY_PATH") {
                    Some(path) => fs::read_to_string(&path).map_err(|e| {
                        AppError::ConfigError(anyhow::anyhow!(
                            "Failed to read payout public key from {}: {}",
                            path,
                            e
                        ))
                    })?,
                    None => String::new(),
                },
            };

            Ok(Some(PayoutAuth::SignedExchange(PayoutCredentials {
                client_id,
                client_secret: Secret::new(
                    lookup("CASHFREE_PAYOUT_CLIENT_SECRET").unwrap_or_default(),
                ),
                public_key: Secret::new(public_key),
                environment,
            })))
        }
        (None, None) => Ok(None),
    }
}

fn parse_lookup<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value: {}", key, e))
        }),
        None => Ok(default),
    }
}
