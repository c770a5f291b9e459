use crate::ordering::pricing::RushPolicy;
use rust_decimal::Decimal;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Sales tax applied to quotes and orders unless configured otherwise (8.75%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(875, 0, 0, false, 4);
/// Deliveries requested sooner than this many hours out are rush orders.
pub const DEFAULT_RUSH_THRESHOLD_HOURS: i64 = 72;
/// Upper bound accepted for `PRICING_RUSH_THRESHOLD_HOURS` (one year).
pub const MAX_RUSH_THRESHOLD_HOURS: i64 = 24 * 365;
/// Rush surcharge as a fraction of the subtotal (25%).
pub const DEFAULT_RUSH_SURCHARGE_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub pricing: PricingConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let tax_rate = decimal_var("PRICING_TAX_RATE", DEFAULT_TAX_RATE)?;
        let rush_threshold_hours = match env::var("PRICING_RUSH_THRESHOLD_HOURS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|hours| (0..=MAX_RUSH_THRESHOLD_HOURS).contains(hours))
                .ok_or(ConfigError::InvalidRushThreshold)?,
            Err(_) => DEFAULT_RUSH_THRESHOLD_HOURS,
        };
        let rush_surcharge_rate =
            decimal_var("PRICING_RUSH_SURCHARGE_RATE", DEFAULT_RUSH_SURCHARGE_RATE)?;

        let csv_path = env::var("CATALOG_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            pricing: PricingConfig {
                tax_rate,
                rush_threshold_hours,
                rush_surcharge_rate,
            },
            catalog: CatalogConfig { csv_path },
        })
    }
}

fn decimal_var(name: &'static str, default: Decimal) -> Result<Decimal, ConfigError> {
    match env::var(name) {
        Ok(raw) => Decimal::from_str(raw.trim()).map_err(|_| ConfigError::InvalidDecimal { name }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Caller-side pricing constants handed to the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    pub tax_rate: Decimal,
    pub rush_threshold_hours: i64,
    pub rush_surcharge_rate: Decimal,
}

impl PricingConfig {
    pub fn rush_policy(&self) -> RushPolicy {
        RushPolicy::new(self.rush_threshold_hours, self.rush_surcharge_rate)
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            rush_threshold_hours: DEFAULT_RUSH_THRESHOLD_HOURS,
            rush_surcharge_rate: DEFAULT_RUSH_SURCHARGE_RATE,
        }
    }
}

/// Where menu templates come from; the built-in catalog when unset.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub csv_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDecimal { name: &'static str },
    InvalidRushThreshold,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDecimal { name } => {
                write!(f, "{name} must be a decimal number such as 0.0875")
            }
            ConfigError::InvalidRushThreshold => write!(
                f,
                "PRICING_RUSH_THRESHOLD_HOURS must be a whole number of hours between 0 and {}",
                MAX_RUSH_THRESHOLD_HOURS
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidDecimal { .. }
            | ConfigError::InvalidRushThreshold => None,
        }
    }
}
