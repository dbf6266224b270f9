use anyhow::Result;
use async_basket::config::purchase_csv::load_purchase_csv;
use async_basket::config::toml_config::BasketConfig;
use async_basket::domain::ports::ReportSink;
use async_basket::utils::validation::Validate;
use async_basket::{checkout, BasketError, OutputFormat, Report};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

#[derive(Default)]
struct CapturingSink {
    lines: Mutex<Vec<String>>,
}

impl ReportSink for CapturingSink {
    fn admitted(&self, total: f64) -> async_basket::Result<()> {
        self.lines.lock().unwrap().push(total.to_string());
        Ok(())
    }

    fn settled(&self, report: &Report) -> async_basket::Result<()> {
        let rendered = async_basket::core::render::render(report, OutputFormat::Table)?;
        self.lines.lock().unwrap().push(rendered);
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_csv_purchase_list_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_path = temp_dir.path().join("purchase.csv");
    std::fs::write(
        &csv_path,
        "name,price\nLaptop,1500\nMouse,25\nKeyboard,100\nHDMI cable,10\nBag,50\nMouse pad,5\n",
    )?;

    let items = load_purchase_csv(&csv_path)?;
    let sink = Arc::new(CapturingSink::default());
    let report = checkout(items, 1050.0, Duration::from_secs(1), sink.clone()).await?;

    assert_eq!(report.total(), 190.0);

    let lines = sink.lines.lock().unwrap();
    assert_eq!(&lines[..5], &["25", "125", "135", "185", "190"]);
    assert_eq!(lines.len(), 6);
    assert!(lines[5].starts_with("Mouse "));
    assert!(lines[5].ends_with("Total                    190"));
    assert!(!lines[5].contains("Laptop"));
    Ok(())
}

#[test]
fn test_malformed_csv_is_rejected_before_checkout() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_path = temp_dir.path().join("broken.csv");
    std::fs::write(&csv_path, "name,price\nMouse,25\nKeyboard,\n")?;

    let result = load_purchase_csv(&csv_path);
    assert!(matches!(result, Err(BasketError::CsvError(_))));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_toml_config_drives_checkout() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("basket.toml");
    std::fs::write(
        &config_path,
        r#"
[basket]
limit = 130
settle_delay_ms = 200

[output]
format = "json"

[[items]]
name = "Keyboard"
price = 100

[[items]]
name = "Laptop"
price = 1500

[[items]]
name = "Mouse"
price = 25
"#,
    )?;

    let config = BasketConfig::from_file(&config_path)?;
    config.validate()?;
    assert_eq!(config.output.format, OutputFormat::Json);

    let sink = Arc::new(CapturingSink::default());
    let report = checkout(
        config.items.clone(),
        config.basket.limit,
        Duration::from_millis(config.basket.settle_delay_ms),
        sink,
    )
    .await?;

    let names: Vec<&str> = report.items().iter().map(|item| item.name()).collect();
    assert_eq!(names, vec!["Keyboard", "Mouse"]);
    assert_eq!(report.total(), 125.0);
    Ok(())
}
