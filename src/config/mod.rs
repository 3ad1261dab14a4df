use config::{ConfigError, Environment};
use serde::Deserialize;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub limits: LimitsConfig,
    pub pricing: PricingConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub rust_log: String,
    /// JSON-файл с начальными данными
    pub seed_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            rust_log: "theatre_engine=info".to_string(),
            seed_path: None,
        }
    }
}

// Емкости реестров. Превышение - явная ошибка CapacityExceeded, а не рост.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub max_venues: usize,
    /// Ряды обозначаются буквами, поэтому не больше 26
    pub max_rows: usize,
    pub max_cols: usize,
    pub max_shows: usize,
    /// Число слотов хеш-таблицы броней
    pub booking_capacity: usize,
    pub concession_capacity: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_venues: 10,
            max_rows: 26,
            max_cols: 50,
            max_shows: 200,
            booking_capacity: 1024,
            concession_capacity: 64,
        }
    }
}

// Правило цены билета: базовая цена сеанса + сбор
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingConfig {
    pub booking_fee: f64,
}

impl PricingConfig {
    pub fn ticket_price(&self, base_price: f64) -> f64 {
        base_price + self.booking_fee
    }
}

impl Config {
    /// Значения по умолчанию, поверх них переменные окружения
    /// `THEATRE_<SECTION>__<KEY>`, например `THEATRE_LIMITS__MAX_VENUES=8`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let config: Config = config::Config::builder()
            .set_default("app.environment", defaults.app.environment)?
            .set_default("app.rust_log", defaults.app.rust_log)?
            .set_default("limits.max_venues", defaults.limits.max_venues as u64)?
            .set_default("limits.max_rows", defaults.limits.max_rows as u64)?
            .set_default("limits.max_cols", defaults.limits.max_cols as u64)?
            .set_default("limits.max_shows", defaults.limits.max_shows as u64)?
            .set_default("limits.booking_capacity", defaults.limits.booking_capacity as u64)?
            .set_default("limits.concession_capacity", defaults.limits.concession_capacity as u64)?
            .set_default("pricing.booking_fee", defaults.pricing.booking_fee)?
            .add_source(
                Environment::with_prefix("THEATRE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        let capacities = [
            ("max_venues", limits.max_venues),
            ("max_rows", limits.max_rows),
            ("max_cols", limits.max_cols),
            ("max_shows", limits.max_shows),
            ("booking_capacity", limits.booking_capacity),
            ("concession_capacity", limits.concession_capacity),
        ];
        if let Some((name, _)) = capacities.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Message(format!("limits.{} must be greater than zero", name)));
        }
        if limits.max_rows > 26 {
            return Err(ConfigError::Message("limits.max_rows must not exceed 26".to_string()));
        }
        if !self.pricing.booking_fee.is_finite() || self.pricing.booking_fee < 0.0 {
            return Err(ConfigError::Message("pricing.booking_fee must be a non-negative number".to_string()));
        }
        Ok(())
    }
}
