use ctree_status::{ReadinessClass, RowLabel, TreeRow};
use owo_colors::Style;

// Re-export OutputFormat for convenience
pub use crate::types::OutputFormat;

const HEADERS: [&str; 6] =
    ["NAME", "READY", "SEVERITY", "REASON", "SINCE", "MESSAGE"];
const COLUMN_SEPARATOR: &str = "  ";
const DELETED_TAG: &str = "!! DELETED !!";

/// Output formatting interface
pub trait Formatter {
    fn format(&self, rows: &[TreeRow]) -> anyhow::Result<String>;
}

pub struct JsonFormatter;
pub struct YamlFormatter;
pub struct TableFormatter {
    pub color: bool,
}

impl Formatter for JsonFormatter {
    fn format(&self, rows: &[TreeRow]) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(rows)?)
    }
}

impl Formatter for YamlFormatter {
    fn format(&self, rows: &[TreeRow]) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(rows)?)
    }
}

/// A table cell: the text used for alignment and the text printed.
struct Cell {
    plain: String,
    styled: String,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        let plain = text.into();
        Self {
            styled: plain.clone(),
            plain,
        }
    }

    // counts chars, so wide (CJK, emoji) names shift later columns
    fn width(&self) -> usize {
        self.plain.chars().count()
    }
}

struct Palette {
    enabled: bool,
}

impl Palette {
    fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            style.style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn cell(&self, style: Style, text: &str) -> Cell {
        Cell {
            plain: text.to_string(),
            styled: self.paint(style, text),
        }
    }
}

fn class_style(class: ReadinessClass) -> Style {
    match class {
        ReadinessClass::Ok => Style::new().green(),
        ReadinessClass::Error => Style::new().red(),
        ReadinessClass::Warning => Style::new().yellow(),
        ReadinessClass::Neutral => Style::new().white(),
        ReadinessClass::Unknown => Style::new().bright_black(),
    }
}

impl TableFormatter {
    fn name_cell(&self, palette: &Palette, row: &TreeRow) -> Cell {
        let gray = Style::new().bright_black();
        let prefix = row.prefix.render();
        let mut plain = prefix.clone();
        let mut styled = palette.paint(gray, &prefix);

        if row.deleted {
            plain.push_str(DELETED_TAG);
            plain.push(' ');
            styled.push_str(&palette.paint(Style::new().red(), DELETED_TAG));
            styled.push(' ');
        }

        plain.push_str(&row.label.plain());
        match &row.label {
            RowLabel::Object {
                kind,
                name,
                meta_name,
            } => match meta_name {
                // the Kind/Name part of a meta-named row is dimmed as a whole
                Some(meta) => styled.push_str(&format!(
                    "{meta} - {}",
                    palette.paint(gray, &format!("{kind}/{name}"))
                )),
                None => styled.push_str(&format!(
                    "{kind}/{}",
                    palette.paint(Style::new().bold(), name)
                )),
            },
            RowLabel::Group { label, .. } => {
                let bold_white = Style::new().white().bold();
                styled.push_str(&palette.paint(bold_white, label))
            }
            RowLabel::Virtual { name } => styled.push_str(name),
            RowLabel::Condition { condition_type } => {
                let cyan = Style::new().cyan();
                styled.push_str(&palette.paint(cyan, condition_type))
            }
        }
        Cell { plain, styled }
    }

    fn cells(&self, palette: &Palette, row: &TreeRow) -> [Cell; 6] {
        let status_style = class_style(row.class);
        let message = if matches!(row.label, RowLabel::Group { .. }) {
            palette.cell(Style::new().bright_black(), &row.message)
        } else {
            Cell::plain(row.message.clone())
        };
        [
            self.name_cell(palette, row),
            palette.cell(status_style, &row.status),
            palette.cell(status_style, &row.severity),
            palette.cell(status_style, &row.reason),
            Cell::plain(row.age.clone()),
            message,
        ]
    }
}

impl Formatter for TableFormatter {
    fn format(&self, rows: &[TreeRow]) -> anyhow::Result<String> {
        let palette = Palette {
            enabled: self.color,
        };
        let mut table: Vec<[Cell; 6]> = Vec::with_capacity(rows.len() + 1);
        table.push(HEADERS.map(Cell::plain));
        table.extend(rows.iter().map(|row| self.cells(&palette, row)));

        let mut widths = [0usize; 6];
        for line in &table {
            for (w, cell) in widths.iter_mut().zip(line) {
                *w = (*w).max(cell.width());
            }
        }

        let mut out = String::new();
        for line in &table {
            let mut text = String::new();
            for (i, cell) in line.iter().enumerate() {
                if i > 0 {
                    text.push_str(COLUMN_SEPARATOR);
                }
                text.push_str(&cell.styled);
                if i + 1 < line.len() {
                    text.push_str(&" ".repeat(widths[i] - cell.width()));
                }
            }
            out.push_str(text.trim_end());
            out.push('\n');
        }
        Ok(out)
    }
}

/// Get formatter for the specified output format
pub fn get_formatter(format: &OutputFormat, color: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Yaml => Box::new(YamlFormatter),
        OutputFormat::Table => Box::new(TableFormatter { color }),
    }
}

/// Format and print rows in the specified format
pub fn print_output(
    rows: &[TreeRow],
    format: &OutputFormat,
    color: bool,
) -> anyhow::Result<()> {
    let formatter = get_formatter(format, color);
    let output = formatter.format(rows)?;
    print!("{}", output);
    Ok(())
}
