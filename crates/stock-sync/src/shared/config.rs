use anyhow::Context;
use contracts::enums::MarketplaceType;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub feed: FeedConfig,
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetConfig>,
}

/// Откуда брать остатки поставщика
#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    /// Адрес zip-архива с выгрузкой
    pub url: String,

    /// Имя файла внутри архива; если не задано, берётся первый файл с расширением `extension`
    #[serde(default)]
    pub entry: Option<String>,

    #[serde(default = "default_extension")]
    pub extension: String,

    /// Сколько строк шапки пропустить до строки заголовков
    #[serde(default = "default_header_row")]
    pub header_row: usize,

    /// Разделитель колонок для текстовой выгрузки (.csv)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

/// Подключение к кабинету продавца на маркетплейсе
#[derive(Debug, Deserialize, Clone)]
pub struct TargetConfig {
    /// Имя для логов и фильтра `--target`
    pub name: String,
    pub marketplace: MarketplaceType,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Api-Key (Ozon) или OAuth-токен (Яндекс)
    pub api_key: String,

    /// Client-Id (Ozon) или ID кампании (Яндекс)
    pub account_id: String,

    /// Склад продавца; обязателен для Яндекса, для Ozon не задаётся
    #[serde(default)]
    pub warehouse_id: Option<String>,

    #[serde(default)]
    pub stock_chunk_size: Option<usize>,

    #[serde(default)]
    pub price_chunk_size: Option<usize>,

    #[serde(default)]
    pub page_size: Option<usize>,

    #[serde(default = "default_true")]
    pub sync_prices: bool,

    /// Переопределение адреса API (песочница, тесты)
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_extension() -> String {
    "xls".to_string()
}

fn default_header_row() -> usize {
    17
}

fn default_delimiter() -> char {
    ';'
}

impl TargetConfig {
    /// Размер пакета остатков: из конфигурации или лимит API маркетплейса
    pub fn stock_chunk_size(&self) -> usize {
        self.stock_chunk_size.unwrap_or(match self.marketplace {
            MarketplaceType::Ozon => 100,
            MarketplaceType::YandexMarket => 2000,
        })
    }

    pub fn price_chunk_size(&self) -> usize {
        self.price_chunk_size.unwrap_or(match self.marketplace {
            MarketplaceType::Ozon => 1000,
            MarketplaceType::YandexMarket => 500,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(match self.marketplace {
            MarketplaceType::Ozon => 1000,
            MarketplaceType::YandexMarket => 200,
        })
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!("Target '{}': api_key is empty", self.name);
        }
        if self.account_id.trim().is_empty() {
            anyhow::bail!("Target '{}': account_id is empty", self.name);
        }
        if self.marketplace == MarketplaceType::Ozon && self.warehouse_id.is_some() {
            anyhow::bail!(
                "Target '{}': warehouse_id is not supported for Ozon stock import",
                self.name
            );
        }
        if self.marketplace == MarketplaceType::YandexMarket
            && self
                .warehouse_id
                .as_deref()
                .map_or(true, |w| w.trim().is_empty())
        {
            anyhow::bail!(
                "Target '{}': warehouse_id is required for Yandex Market",
                self.name
            );
        }
        for (field, value) in [
            ("stock_chunk_size", self.stock_chunk_size()),
            ("price_chunk_size", self.price_chunk_size()),
            ("page_size", self.page_size()),
        ] {
            if value == 0 {
                anyhow::bail!("Target '{}': {} must be greater than zero", self.name, field);
            }
        }
        Ok(())
    }
}

/// Default configuration embedded in the binary
///
/// Секреты и идентификаторы кабинетов берутся из переменных окружения.
const DEFAULT_CONFIG: &str = r#"
[feed]
url = "https://timeworld.ru/upload/files/ostatki.zip"
extension = "xls"
header_row = 17
delimiter = ";"

[[target]]
name = "ozon"
marketplace = "ozon"
api_key = "$SELLER_TOKEN"
account_id = "$CLIENT_ID"
stock_chunk_size = 100
price_chunk_size = 1000

[[target]]
name = "yandex-fbs"
marketplace = "yandex_market"
api_key = "$MARKET_TOKEN"
account_id = "$FBS_ID"
warehouse_id = "$WAREHOUSE_FBS_ID"
stock_chunk_size = 2000
price_chunk_size = 500

[[target]]
name = "yandex-dbs"
marketplace = "yandex_market"
api_key = "$MARKET_TOKEN"
account_id = "$DBS_ID"
warehouse_id = "$WAREHOUSE_DBS_ID"
stock_chunk_size = 2000
price_chunk_size = 500
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Explicit path (`--config`)
/// 2. Next to the executable
/// 3. Falls back to embedded default config
///
/// Непустой `only` оставляет включёнными только перечисленные подключения.
pub fn load_config(explicit: Option<&Path>, only: &[String]) -> anyhow::Result<Config> {
    let contents = match explicit {
        Some(path) => {
            tracing::info!("Loading config from: {}", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read config {}", path.display()))?
        }
        None => match config_next_to_exe() {
            Some(path) => {
                tracing::info!("Loading config from: {}", path.display());
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Cannot read config {}", path.display()))?
            }
            None => {
                tracing::info!("Using default embedded configuration");
                DEFAULT_CONFIG.to_string()
            }
        },
    };

    parse_selected(&contents, only, |name| std::env::var(name).ok())
}

fn config_next_to_exe() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let config_path = exe_path.parent()?.join("config.toml");
    if config_path.exists() {
        Some(config_path)
    } else {
        tracing::warn!("config.toml not found at: {}", config_path.display());
        None
    }
}

/// Разобрать TOML, подставить `$VAR` из окружения и проверить подключения
///
/// Переменные подставляются только для включённых подключений: выключенное
/// подключение может ссылаться на незаданные переменные.
pub fn parse_config(
    contents: &str,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    parse_selected(contents, &[], env)
}

fn parse_selected(
    contents: &str,
    only: &[String],
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let mut config: Config = toml::from_str(contents).context("Invalid config.toml")?;

    if !only.is_empty() {
        if let Some(unknown) = only
            .iter()
            .find(|name| !config.targets.iter().any(|t| &t.name == *name))
        {
            anyhow::bail!("Unknown target '{}'", unknown);
        }
        for target in config.targets.iter_mut() {
            target.enabled = target.enabled && only.contains(&target.name);
        }
    }

    config.feed.url = resolve_env(&config.feed.url, &env)?;

    for target in config.targets.iter_mut().filter(|t| t.enabled) {
        target.api_key = resolve_env(&target.api_key, &env)
            .with_context(|| format!("Target '{}': api_key", target.name))?;
        target.account_id = resolve_env(&target.account_id, &env)
            .with_context(|| format!("Target '{}': account_id", target.name))?;
        if let Some(warehouse_id) = &target.warehouse_id {
            target.warehouse_id = Some(
                resolve_env(warehouse_id, &env)
                    .with_context(|| format!("Target '{}': warehouse_id", target.name))?,
            );
        }
        target.validate()?;
    }

    Ok(config)
}

fn resolve_env(value: &str, env: &impl Fn(&str) -> Option<String>) -> anyhow::Result<String> {
    match value.strip_prefix('$') {
        Some(name) => env(name)
            .ok_or_else(|| anyhow::anyhow!("Environment variable {} is not set", name)),
        None => Ok(value.to_string()),
    }
}
