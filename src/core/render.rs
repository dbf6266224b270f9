use crate::domain::model::{Report, TOTAL_LINE_NAME};
use crate::domain::ports::ReportSink;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

const NAME_WIDTH: usize = 18;
const PRICE_WIDTH: usize = 10;
const SHARE_WIDTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// 以固定寬度輸出報表，商品列附上佔上限的百分比
pub fn render_table(report: &Report) -> String {
    let mut lines = Vec::with_capacity(report.lines().len());

    for item in report.items() {
        let mut row = format!(
            "{:<name$}{:>price$}",
            item.name(),
            item.price(),
            name = NAME_WIDTH,
            price = PRICE_WIDTH
        );
        if report.limit() > 0.0 {
            let share = (item.price() * 100.0 / report.limit()).round();
            row.push_str(&format!("{:>width$}", format!("{}%", share), width = SHARE_WIDTH));
        }
        lines.push(row);
    }

    lines.push(format!(
        "{:<name$}{:>price$}",
        TOTAL_LINE_NAME,
        report.total(),
        name = NAME_WIDTH,
        price = PRICE_WIDTH
    ));

    lines.join("\n")
}

pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(report)),
        OutputFormat::Json => render_json(report),
    }
}

/// Writes one line per admission and the rendered report to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink {
    format: OutputFormat,
}

impl StdoutSink {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl ReportSink for StdoutSink {
    fn admitted(&self, total: f64) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", total)?;
        Ok(())
    }

    fn settled(&self, report: &Report) -> Result<()> {
        let rendered = render(report, self.format)?;
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", rendered)?;
        Ok(())
    }
}
