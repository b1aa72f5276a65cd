//! Human-readable rendering of classified station data.
//!
//! The status header is a single line meant for a status bar, e.g.
//! `:deciduous_tree: 21.5 °C \ :house: 18 °C`. Detail blocks list every
//! reading of every module, each block terminated by [`SEPARATOR`].

use std::io::{self, Write};

use chrono::{DateTime, Utc};

use crate::{
    classify::Classified,
    model::{MeasureValue, Module, ModuleType},
};

pub const TREE_ICON: &str = ":deciduous_tree:";
pub const HOUSE_ICON: &str = ":house:";
pub const NOT_AVAILABLE: &str = "N/A";
pub const SEPARATOR: &str = "---";

const TEMPERATURE_KEY: &str = "Temperature";
const CELSIUS: &str = " °C";

/// Render a temperature reading, `None` for representations that aren't one.
pub fn format_temperature(value: &MeasureValue) -> Option<String> {
    match value {
        MeasureValue::Text(s) => Some(format!("{s}{CELSIUS}")),
        MeasureValue::F32(v) => Some(format!("{v:.1}{CELSIUS}")),
        MeasureValue::F64(v) => Some(format!("{v:.1}{CELSIUS}")),
        MeasureValue::I32(v) => Some(format!("{v}{CELSIUS}")),
        MeasureValue::I64(v) => Some(format!("{v}{CELSIUS}")),
        MeasureValue::Unsupported => None,
    }
}

/// The module's current temperature, if it reports one.
pub fn temperature(module: &Module) -> Option<String> {
    module.measurement(TEMPERATURE_KEY).and_then(format_temperature)
}

fn temperature_or_na(module: Option<&Module>) -> String {
    module
        .and_then(temperature)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// One-line summary: first outdoor module, then the main module when present.
pub fn status_header(classified: &Classified<'_>) -> String {
    let mut head = format!(
        "{TREE_ICON} {} \\ ",
        temperature_or_na(classified.primary_outdoor())
    );

    if let Some(main) = classified.main {
        head.push_str(HOUSE_ICON);
        head.push(' ');
        head.push_str(&temperature_or_na(Some(main)));
    }

    head
}

pub fn display_type(module_type: &ModuleType) -> &'static str {
    match module_type {
        ModuleType::Main => ":grey_exclamation: Main",
        ModuleType::Outdoor => ":deciduous_tree: Outdoor",
        ModuleType::Indoor => ":house: Indoor",
        ModuleType::Unknown(_) => ":grey_question: Unknown",
    }
}

/// Write the detail block of a single module.
pub fn write_module<W: Write>(
    out: &mut W,
    module: &Module,
    now: DateTime<Utc>,
) -> io::Result<()> {
    writeln!(
        out,
        "Module : {} ({})",
        module.name,
        display_type(&module.module_type)
    )?;

    if module.last_measure().is_none() {
        writeln!(
            out,
            "Skipping {}, no measurement data available.",
            module.name
        )?;
        return writeln!(out, "{SEPARATOR}");
    }

    let current = now.timestamp();

    let (ts, info) = module.info();
    for (name, value) in &info {
        write_reading(out, name, value, ts.map(|ts| current - ts))?;
    }

    let (ts, data) = module.data();
    for (name, value) in data {
        write_reading(out, name, value, ts.map(|ts| current - ts))?;
    }

    writeln!(out, "{SEPARATOR}")
}

fn write_reading<W: Write>(
    out: &mut W,
    name: &str,
    value: &MeasureValue,
    age_secs: Option<i64>,
) -> io::Result<()> {
    match age_secs {
        Some(age) => writeln!(out, "{name} : {value} (updated {age}s ago)"),
        None => writeln!(out, "{name} : {value}"),
    }
}

/// Write detail blocks for main, outdoor and indoor modules, in that order.
pub fn write_details<W: Write>(
    out: &mut W,
    classified: &Classified<'_>,
    now: DateTime<Utc>,
) -> io::Result<()> {
    match classified.main {
        Some(main) => write_module(out, main, now)?,
        None => {
            writeln!(out, "No main module, no measurement data available.")?;
            writeln!(out, "{SEPARATOR}")?;
        }
    }

    for module in classified.outdoor.iter().chain(&classified.indoor) {
        write_module(out, module, now)?;
    }

    Ok(())
}
