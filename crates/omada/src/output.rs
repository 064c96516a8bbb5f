//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Green when `good`, red otherwise.
pub fn status(label: &str, good: bool, color: bool) -> String {
    match (color, good) {
        (false, _) => label.to_owned(),
        (true, true) => label.green().to_string(),
        (true, false) => label.red().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

// ── Value formatting ─────────────────────────────────────────────────

/// `Some` as text, `None` as `-`.
pub fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

/// Seconds as a compact human duration (`2days 5h 30m 10s`).
pub fn duration_secs(secs: Option<u64>) -> String {
    secs.map_or_else(
        || "-".into(),
        |s| humantime::format_duration(std::time::Duration::from_secs(s)).to_string(),
    )
}

/// A byte counter in binary units.
pub fn bytes(count: i64) -> String {
    u64::try_from(count).map_or_else(|_| "-".into(), |n| bytesize::ByteSize::b(n).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_optional_values() {
        assert_eq!(opt(None::<i64>), "-");
        assert_eq!(opt(Some(5)), "5");
        assert_eq!(duration_secs(None), "-");
        assert_eq!(duration_secs(Some(3_661)), "1h 1m 1s");
        assert_eq!(bytes(-1), "-");
    }

    #[test]
    fn plain_output_lists_ids() {
        #[derive(serde::Serialize)]
        struct Item {
            id: &'static str,
        }
        #[derive(Tabled)]
        struct Row {
            id: String,
        }

        let items = [Item { id: "a" }, Item { id: "b" }];
        let out = render_list(
            &OutputFormat::Plain,
            &items,
            |i| Row { id: i.id.into() },
            |i| i.id.into(),
        );
        assert_eq!(out, "a\nb");

        let json = render_list(
            &OutputFormat::JsonCompact,
            &items,
            |i| Row { id: i.id.into() },
            |i| i.id.into(),
        );
        assert_eq!(json, r#"[{"id":"a"},{"id":"b"}]"#);
    }
}
