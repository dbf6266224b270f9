use crate::core::render::OutputFormat;
use crate::domain::model::Item;
use crate::utils::error::{BasketError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_LIMIT: f64 = 1050.0;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;
pub const MAX_SETTLE_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasketConfig {
    #[serde(default)]
    pub basket: BasketSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketSection {
    #[serde(default = "default_limit")]
    pub limit: f64,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_limit() -> f64 {
    DEFAULT_LIMIT
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

impl Default for BasketSection {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

impl BasketConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BasketError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BASKET_LIMIT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BasketError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl Validate for BasketConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_amount("basket.limit", self.basket.limit)?;
        validation::validate_settle_delay(
            "basket.settle_delay_ms",
            Duration::from_millis(self.basket.settle_delay_ms),
        )?;
        for (position, item) in self.items.iter().enumerate() {
            validation::validate_purchase_item(position, item)?;
        }
        Ok(())
    }
}
