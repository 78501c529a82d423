//! Terminal rendering of the collected records: plain text blocks,
//! bordered tables, or a JSON array. Pure string building, no I/O.

use crate::{
    record::HostRecord,
    units,
};
use comfy_table::{
    presets,
    Attribute,
    Cell,
    ContentArrangement,
    Table,
};
use console::style;
use eyre::Result;

/// How the record list is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Table,
    Json,
}

/// Highlight color, configured per invocation and threaded through the
/// presenter rather than held in process-global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Green,
    Red,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Theme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "green" => Some(Self::Green),
            "red" => Some(Self::Red),
            "yellow" => Some(Self::Yellow),
            "blue" => Some(Self::Blue),
            "magenta" => Some(Self::Magenta),
            "cyan" => Some(Self::Cyan),
            "white" => Some(Self::White),
            _ => None,
        }
    }

    fn console_color(self) -> console::Color {
        match self {
            Self::Green => console::Color::Green,
            Self::Red => console::Color::Red,
            Self::Yellow => console::Color::Yellow,
            Self::Blue => console::Color::Blue,
            Self::Magenta => console::Color::Magenta,
            Self::Cyan => console::Color::Cyan,
            Self::White => console::Color::White,
        }
    }

    fn table_color(self) -> comfy_table::Color {
        match self {
            Self::Green => comfy_table::Color::Green,
            Self::Red => comfy_table::Color::Red,
            Self::Yellow => comfy_table::Color::Yellow,
            Self::Blue => comfy_table::Color::Blue,
            Self::Magenta => comfy_table::Color::Magenta,
            Self::Cyan => comfy_table::Color::Cyan,
            Self::White => comfy_table::Color::White,
        }
    }
}

pub struct Presenter {
    mode: OutputMode,
    theme: Theme,
}

impl Presenter {
    pub fn new(mode: OutputMode, theme: Theme) -> Self {
        Self { mode, theme }
    }

    /// Sort records by hostname and render them in the selected mode.
    pub fn render(&self, records: &mut [HostRecord]) -> Result<String> {
        records.sort_by(|a, b| a.hostname.cmp(&b.hostname));

        let output = match self.mode {
            OutputMode::Json => serde_json::to_string_pretty(&records)?,
            OutputMode::Text => records
                .iter()
                .map(|record| self.text_block(record))
                .collect::<Vec<_>>()
                .join("\n\n"),
            OutputMode::Table => records
                .iter()
                .map(|record| self.table_block(record).to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        };
        Ok(output)
    }

    fn text_block(&self, record: &HostRecord) -> String {
        let mut lines = Vec::new();
        lines.push(
            style(record.hostname.as_str())
                .fg(self.theme.console_color())
                .bold()
                .to_string(),
        );
        if record.is_stale {
            let warning = format!(
                "Last Updated: {}",
                units::local_timestamp(record.last_updated_epoch)
            );
            lines.push(style(warning).yellow().to_string());
        }
        lines.push(format!(
            "Distro: {} {}",
            record.distribution, record.distribution_version
        ));
        lines.push(format!("Uptime: {}", units::uptime(record.uptime_seconds)));
        if let Some(updates) = record.package_updates_available {
            lines.push(format!("Updates available: {updates}"));
        }
        lines.push(format!("CPU: {}", record.cpu_type));
        lines.push(format!(
            "CPU Usage: {:.1}% Load: {:.2}",
            record.cpu_usage_percent, record.load
        ));
        lines.push(format!(
            "Memory: {} / {} ({:.1} %)",
            units::human_size(record.memory_used_bytes as f64),
            units::human_size(record.memory_total_bytes as f64),
            record.memory_used_percent
        ));
        lines.push(format!(
            "Disk: {} / {} ({:.1} %)",
            units::human_size(record.disk_used_bytes as f64),
            units::human_size(record.disk_total_bytes as f64),
            record.disk_used_percent
        ));
        lines.push(format!(
            "Network In: {} Out: {}",
            units::bit_rate(record.network_rx_bits_per_sec),
            units::bit_rate(record.network_tx_bits_per_sec)
        ));
        lines.join("\n")
    }

    fn table_block(&self, record: &HostRecord) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![Cell::new(&record.hostname)
                .add_attribute(Attribute::Bold)
                .fg(self.theme.table_color())]);

        table.add_row(vec![
            Cell::new("Distro").add_attribute(Attribute::Bold),
            Cell::new(format!(
                "{} {}",
                record.distribution, record.distribution_version
            )),
        ]);
        table.add_row(vec![
            Cell::new("Uptime").add_attribute(Attribute::Bold),
            Cell::new(units::uptime(record.uptime_seconds)),
        ]);
        if let Some(updates) = record.package_updates_available {
            table.add_row(vec![
                Cell::new("Updates").add_attribute(Attribute::Bold),
                Cell::new(updates),
            ]);
        }
        table.add_row(vec![
            Cell::new("CPU").add_attribute(Attribute::Bold),
            Cell::new(&record.cpu_type),
        ]);
        table.add_row(vec![
            Cell::new("CPU Usage").add_attribute(Attribute::Bold),
            Cell::new(format!(
                "{:.1}% Load: {:.2}",
                record.cpu_usage_percent, record.load
            )),
        ]);
        table.add_row(vec![
            Cell::new("Memory").add_attribute(Attribute::Bold),
            Cell::new(format!(
                "{} / {} ({:.1} %)",
                units::human_size(record.memory_used_bytes as f64),
                units::human_size(record.memory_total_bytes as f64),
                record.memory_used_percent
            )),
        ]);
        table.add_row(vec![
            Cell::new("Disk").add_attribute(Attribute::Bold),
            Cell::new(format!(
                "{} / {} ({:.1} %)",
                units::human_size(record.disk_used_bytes as f64),
                units::human_size(record.disk_total_bytes as f64),
                record.disk_used_percent
            )),
        ]);
        table.add_row(vec![
            Cell::new("Network").add_attribute(Attribute::Bold),
            Cell::new(format!(
                "In: {} Out: {}",
                units::bit_rate(record.network_rx_bits_per_sec),
                units::bit_rate(record.network_tx_bits_per_sec)
            )),
        ]);

        table
    }
}
