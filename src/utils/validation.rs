use crate::config::toml_config::MAX_SETTLE_DELAY_MS;
use crate::domain::model::Item;
use crate::utils::error::{BasketError, Result};
use std::path::Path;
use std::time::Duration;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> BasketError {
    BasketError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 金額類數值: 必須是有限且不小於 0 的數字
pub fn validate_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, value, "Value must be a finite number >= 0"));
    }
    Ok(())
}

/// 結算延遲不可超過 `MAX_SETTLE_DELAY_MS`
pub fn validate_settle_delay(field: &str, delay: Duration) -> Result<()> {
    let millis = delay.as_millis();
    if millis > u128::from(MAX_SETTLE_DELAY_MS) {
        return Err(invalid(
            field,
            millis,
            format!("Settle delay must not exceed {} ms", MAX_SETTLE_DELAY_MS),
        ));
    }
    Ok(())
}

/// Checks an input file argument before it is opened: non-empty, no NUL,
/// and carrying the expected extension (case-insensitive).
pub fn validate_input_file(field: &str, path: &str, extension: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path.escape_default(), "Path contains a NUL byte"));
    }

    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(found) if found.eq_ignore_ascii_case(extension) => Ok(()),
        Some(found) => Err(invalid(
            field,
            path,
            format!("Expected a .{} file, got .{}", extension, found),
        )),
        None => Err(invalid(field, path, format!("Expected a .{} file", extension))),
    }
}

/// 購物清單中的單一商品，`position` 從 0 起算，只用於錯誤訊息
pub fn validate_purchase_item(position: usize, item: &Item) -> Result<()> {
    let field = format!("items[{}]", position);
    if item.name().trim().is_empty() {
        return Err(invalid(&field, item.name(), "Item name cannot be blank"));
    }
    validate_amount(&format!("{}.price", field), item.price())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("basket.limit", 1050.0).is_ok());
        assert!(validate_amount("basket.limit", 0.0).is_ok());
        assert!(validate_amount("basket.limit", -0.5).is_err());
        assert!(validate_amount("basket.limit", f64::NAN).is_err());
        assert!(validate_amount("basket.limit", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_settle_delay() {
        assert!(validate_settle_delay("delay_ms", Duration::ZERO).is_ok());
        assert!(validate_settle_delay("delay_ms", Duration::from_millis(MAX_SETTLE_DELAY_MS)).is_ok());

        let err = validate_settle_delay("delay_ms", Duration::from_millis(MAX_SETTLE_DELAY_MS + 1))
            .unwrap_err();
        match err {
            BasketError::InvalidConfigValueError { field, value, .. } => {
                assert_eq!(field, "delay_ms");
                assert_eq!(value, "60001");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_validate_input_file() {
        assert!(validate_input_file("input", "./data/purchase.csv", "csv").is_ok());
        assert!(validate_input_file("input", "PURCHASE.CSV", "csv").is_ok());
        assert!(validate_input_file("input", "purchase.txt", "csv").is_err());
        assert!(validate_input_file("input", "purchase", "csv").is_err());
        assert!(validate_input_file("config", "  ", "toml").is_err());
        assert!(validate_input_file("config", "bad\0basket.toml", "toml").is_err());
    }

    #[test]
    fn test_validate_purchase_item_names_position() {
        let item = Item::new("Mouse", 25.0).unwrap();
        assert!(validate_purchase_item(0, &item).is_ok());

        let err = validate_purchase_item(3, &Item::total(-1.0)).unwrap_err();
        assert!(err.to_string().contains("items[3].price"));
    }
}
