use crate::domain::model::Item;
use crate::utils::error::Result;
use std::io::Read;
use std::path::Path;

/// 讀取 `name,price` 格式的購買清單
///
/// Any malformed row fails the whole load; partially parsed lists are never
/// returned.
pub fn parse_purchase_csv<R: Read>(reader: R) -> Result<Vec<Item>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let items = csv_reader
        .deserialize::<Item>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    tracing::debug!("Parsed {} items from purchase list", items.len());
    Ok(items)
}

pub fn load_purchase_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Item>> {
    tracing::debug!("Loading purchase list from {}", path.as_ref().display());
    let file = std::fs::File::open(path)?;
    parse_purchase_csv(file)
}
