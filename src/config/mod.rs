pub mod purchase_csv;
pub mod toml_config;

use crate::core::render::OutputFormat;
use crate::domain::model::Item;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::BasketConfig;

#[cfg(feature = "cli")]
use clap::Parser;

/// 內建的購買清單，未指定輸入檔時使用
pub fn default_purchase() -> Result<Vec<Item>> {
    [
        ("Laptop", 1500.0),
        ("Mouse", 25.0),
        ("Keyboard", 100.0),
        ("HDMI cable", 10.0),
        ("Bag", 50.0),
        ("Mouse pad", 5.0),
    ]
    .into_iter()
    .map(|(name, price)| Item::new(name, price))
    .collect()
}

/// Fully resolved settings for one checkout run.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub items: Vec<Item>,
    pub limit: f64,
    pub settle_delay: Duration,
    pub format: OutputFormat,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "async-basket")]
#[command(about = "Feed a purchase list into a capped basket and print the settled report")]
pub struct CliConfig {
    #[arg(long, help = "Basket limit (default 1050)")]
    pub limit: Option<f64>,

    #[arg(long, help = "Settlement delay in milliseconds (default 1000)")]
    pub delay_ms: Option<u64>,

    #[arg(long, help = "Purchase list CSV with a name,price header")]
    pub input: Option<String>,

    #[arg(long, help = "TOML config file")]
    pub config: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併設定來源: CLI 參數優先，其次為 TOML 檔案，最後是預設值
    pub fn resolve(&self) -> Result<CheckoutSettings> {
        let file_config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading config from {}", path);
                let config = BasketConfig::from_file(path)?;
                config.validate()?;
                config
            }
            None => BasketConfig::default(),
        };

        let items = match &self.input {
            Some(path) => purchase_csv::load_purchase_csv(path)?,
            None if !file_config.items.is_empty() => file_config.items,
            None => default_purchase()?,
        };

        let settings = CheckoutSettings {
            items,
            limit: self.limit.unwrap_or(file_config.basket.limit),
            settle_delay: Duration::from_millis(
                self.delay_ms.unwrap_or(file_config.basket.settle_delay_ms),
            ),
            format: self.format.unwrap_or(file_config.output.format),
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(limit) = self.limit {
            validation::validate_amount("limit", limit)?;
        }
        if let Some(delay_ms) = self.delay_ms {
            validation::validate_settle_delay("delay_ms", Duration::from_millis(delay_ms))?;
        }
        if let Some(input) = &self.input {
            validation::validate_input_file("input", input, "csv")?;
        }
        if let Some(config) = &self.config {
            validation::validate_input_file("config", config, "toml")?;
        }
        Ok(())
    }
}

impl Validate for CheckoutSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_amount("limit", self.limit)?;
        validation::validate_settle_delay("settle_delay_ms", self.settle_delay)?;
        for (position, item) in self.items.iter().enumerate() {
            validation::validate_purchase_item(position, item)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli() -> CliConfig {
        CliConfig::parse_from(["async-basket"])
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = cli().resolve().unwrap();
        assert_eq!(settings.limit, 1050.0);
        assert_eq!(settings.settle_delay, Duration::from_millis(1000));
        assert_eq!(settings.format, OutputFormat::Table);
        assert_eq!(settings.items, default_purchase().unwrap());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[basket]\nlimit = 10\nsettle_delay_ms = 5\n\n[output]\nformat = \"json\"\n\n[[items]]\nname = \"Bag\"\nprice = 50"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = CliConfig::parse_from(["async-basket", "--config", &path, "--limit", "75"]);
        assert!(config.validate().is_ok());
        let settings = config.resolve().unwrap();

        assert_eq!(settings.limit, 75.0);
        assert_eq!(settings.settle_delay, Duration::from_millis(5));
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.items.len(), 1);
        assert_eq!(settings.items[0].name(), "Bag");
    }

    #[test]
    fn test_input_csv_takes_precedence() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "name,price\nCable,3").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let settings = CliConfig::parse_from(["async-basket", "--input", &path])
            .resolve()
            .unwrap();
        assert_eq!(settings.items.len(), 1);
        assert_eq!(settings.items[0].price(), 3.0);
    }

    #[test]
    fn test_validate_rejects_bad_flags() {
        let config = CliConfig::parse_from(["async-basket", "--limit=-3"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["async-basket", "--input", "purchase.txt"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["async-basket", "--delay-ms", "120000"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settings_validation_reports_field() {
        let settings = CheckoutSettings {
            items: vec![Item::new("Mouse", 25.0).unwrap()],
            limit: 1050.0,
            settle_delay: Duration::from_secs(61),
            format: OutputFormat::Table,
        };

        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("settle_delay_ms"));
    }

    #[test]
    fn test_format_flag() {
        let config = CliConfig::parse_from(["async-basket", "--format", "json"]);
        assert_eq!(config.format, Some(OutputFormat::Json));
    }
}
