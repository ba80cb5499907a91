use super::RenderedRow;
use crate::config::RenderConfig;
use crate::error::{ReportError, ReportResult};
use crate::extract::{value_text, ColumnValue, DIAGRAM_COLUMN};
use crate::spec::{OutputFormat, ResolvedSpec};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ColumnConstraint, ContentArrangement, Table, Width};
use std::fmt::Write;

/// Everything a text writer needs
pub struct TextContext<'a> {
    pub resolved: &'a ResolvedSpec,
    pub rows: &'a [RenderedRow],
    pub config: &'a RenderConfig,
    pub entity_type: &'a str,
}

impl TextContext<'_> {
    fn text(&self, column: &ColumnValue) -> String {
        value_text(column.value.as_ref(), &self.config.sentinel)
    }

    fn headings(&self) -> Vec<String> {
        match self.rows.first() {
            Some(row) => row.columns.iter().map(|c| c.label.clone()).collect(),
            None => self
                .resolved
                .columns()
                .iter()
                .map(|c| c.heading().to_string())
                .collect(),
        }
    }
}

pub fn render_text(format: OutputFormat, context: &TextContext<'_>) -> ReportResult<String> {
    match format {
        OutputFormat::Table => table(context),
        OutputFormat::Form => form(context),
        OutputFormat::Report => report(context),
        OutputFormat::Md => markdown(context),
        OutputFormat::List => list(context),
        OutputFormat::Mermaid => mermaid(context),
        OutputFormat::Html => html(context),
        OutputFormat::Json | OutputFormat::Dict => Err(ReportError::UnknownOutputFormat(format!(
            "{} is not a text format",
            format
        ))),
    }
}

/// Box-drawn table, one row per element
pub fn table(context: &TextContext<'_>) -> ReportResult<String> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(context.config.table_width);
    table.set_header(context.headings());

    for row in context.rows {
        table.add_row(row.columns.iter().map(|c| context.text(c)).collect::<Vec<_>>());
    }

    for (index, column) in context.resolved.columns().iter().enumerate() {
        if let (Some(width), Some(table_column)) = (column.width, table.column_mut(index)) {
            let width = u16::try_from(width).unwrap_or(u16::MAX);
            table_column.set_constraint(ColumnConstraint::UpperBoundary(Width::Fixed(width)));
        }
    }

    Ok(format!("{}\n", table))
}

/// Editable markdown form per element, separated by rules
pub fn form(context: &TextContext<'_>) -> ReportResult<String> {
    let mut output = String::new();
    for row in context.rows {
        writeln!(&mut output, "# Update {}", context.entity_type)?;
        writeln!(&mut output)?;
        for column in &row.columns {
            writeln!(&mut output, "## {}", column.label)?;
            writeln!(&mut output, "{}", context.text(column))?;
            writeln!(&mut output)?;
        }
        writeln!(&mut output, "___")?;
        writeln!(&mut output)?;
    }
    Ok(output)
}

/// Narrative report: one heading for the whole render, a section per element
pub fn report(context: &TextContext<'_>) -> ReportResult<String> {
    let spec = context.resolved.spec();
    let mut output = String::new();

    writeln!(&mut output, "# {}", spec.report_heading())?;
    writeln!(&mut output)?;
    if let Some(description) = &spec.description {
        writeln!(&mut output, "{}", description)?;
        writeln!(&mut output)?;
    }

    for row in context.rows {
        writeln!(&mut output, "## {}", row.title)?;
        writeln!(&mut output)?;
        for column in &row.columns {
            writeln!(&mut output, "### {}", column.label)?;
            writeln!(&mut output, "{}", context.text(column))?;
            writeln!(&mut output)?;
        }
        writeln!(&mut output, "---")?;
        writeln!(&mut output)?;
    }
    Ok(output)
}

/// Markdown document per element
pub fn markdown(context: &TextContext<'_>) -> ReportResult<String> {
    let mut output = String::new();
    for row in context.rows {
        let type_name = row.type_name.as_deref().unwrap_or(context.entity_type);
        writeln!(&mut output, "# {}: {}", type_name, row.title)?;
        writeln!(&mut output)?;
        for column in &row.columns {
            writeln!(&mut output, "## {}", column.label)?;
            writeln!(&mut output, "{}", context.text(column))?;
            writeln!(&mut output)?;
        }
    }
    Ok(output)
}

/// Markdown table; cells are kept on one line
pub fn list(context: &TextContext<'_>) -> ReportResult<String> {
    let mut output = String::new();
    let headings = context.headings();

    writeln!(&mut output, "# {}", context.resolved.spec().report_heading())?;
    writeln!(&mut output)?;
    writeln!(&mut output, "| {} |", headings.join(" | "))?;
    writeln!(
        &mut output,
        "|{}",
        headings.iter().map(|_| "---|").collect::<String>()
    )?;

    for row in context.rows {
        let cells: Vec<String> = row
            .columns
            .iter()
            .map(|c| list_cell(&context.text(c), &context.config.list_newline))
            .collect();
        writeln!(&mut output, "| {} |", cells.join(" | "))?;
    }
    Ok(output)
}

fn list_cell(text: &str, newline: &str) -> String {
    text.trim_end()
        .replace('|', "\\|")
        .replace("\r\n", newline)
        .replace('\n', newline)
}

/// Only the diagrams, one fenced block per element that has one
pub fn mermaid(context: &TextContext<'_>) -> ReportResult<String> {
    let mut output = String::new();
    for row in context.rows {
        let diagram = row.diagram.clone().or_else(|| {
            row.columns
                .get(DIAGRAM_COLUMN)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        });
        let Some(diagram) = diagram.filter(|d| !d.trim().is_empty()) else {
            tracing::debug!("No diagram for element {:?}", row.guid);
            continue;
        };

        writeln!(&mut output, "## {}", row.title)?;
        writeln!(&mut output)?;
        let diagram = diagram.trim();
        if diagram.starts_with("```") {
            writeln!(&mut output, "{}", diagram)?;
        } else {
            writeln!(&mut output, "```mermaid")?;
            writeln!(&mut output, "{}", diagram)?;
            writeln!(&mut output, "```")?;
        }
        writeln!(&mut output)?;
    }
    Ok(output)
}

/// Minimal standalone HTML document with an escaped table
pub fn html(context: &TextContext<'_>) -> ReportResult<String> {
    let heading = escape_html(&context.resolved.spec().report_heading());
    let mut output = String::new();

    writeln!(&mut output, "<!DOCTYPE html>")?;
    writeln!(&mut output, "<html>")?;
    writeln!(&mut output, "<head><meta charset=\"utf-8\"><title>{}</title></head>", heading)?;
    writeln!(&mut output, "<body>")?;
    writeln!(&mut output, "<h1>{}</h1>", heading)?;
    writeln!(&mut output, "<table>")?;
    writeln!(&mut output, "<thead><tr>")?;
    for heading in context.headings() {
        writeln!(&mut output, "<th>{}</th>", escape_html(&heading))?;
    }
    writeln!(&mut output, "</tr></thead>")?;
    writeln!(&mut output, "<tbody>")?;
    for row in context.rows {
        writeln!(&mut output, "<tr>")?;
        for column in &row.columns {
            let cell = escape_html(&context.text(column)).replace('\n', "<br>");
            writeln!(&mut output, "<td>{}</td>", cell)?;
        }
        writeln!(&mut output, "</tr>")?;
    }
    writeln!(&mut output, "</tbody>")?;
    writeln!(&mut output, "</table>")?;
    writeln!(&mut output, "</body>")?;
    writeln!(&mut output, "</html>")?;
    Ok(output)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ColumnValues;
    use crate::spec::{Column, FormatSpec, FormatVariant, SpecRegistry};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixture() -> (ResolvedSpec, Vec<RenderedRow>) {
        let mut registry = SpecRegistry::new();
        registry.register(
            FormatSpec::new("Default", "Referenceable")
                .with_heading("Catalog Elements")
                .with_variant(FormatVariant::new(&["ALL"]).with_columns([
                    Column::labeled("display_name", "Name"),
                    Column::new("description"),
                ])),
        );
        let resolved = registry
            .resolve(None, None, None, OutputFormat::Table)
            .unwrap();

        let mut columns = ColumnValues::from_template(resolved.columns());
        columns.set("display_name", json!("Orders | 2024"));
        columns.set("description", json!("line one\nline <two>"));
        let row = RenderedRow {
            guid: Some("g1".to_string()),
            type_name: Some("Asset".to_string()),
            title: "Orders | 2024".to_string(),
            diagram: Some("flowchart LR\n  a --> b".to_string()),
            columns,
        };
        (resolved, vec![row])
    }

    fn render(format: OutputFormat) -> String {
        let (resolved, rows) = fixture();
        let config = RenderConfig::default();
        let context = TextContext {
            resolved: &resolved,
            rows: &rows,
            config: &config,
            entity_type: "Asset",
        };
        render_text(format, &context).unwrap()
    }

    #[test]
    fn test_table_uses_labels() {
        let output = render(OutputFormat::Table);
        assert!(output.contains("Name"));
        assert!(output.contains("description"));
        assert!(output.contains("Orders | 2024"));
        assert!(output.contains('╭'));
    }

    #[test]
    fn test_form_layout() {
        let output = render(OutputFormat::Form);
        assert!(output.starts_with("# Update Asset\n\n## Name\nOrders | 2024\n\n## description\n"));
        assert!(output.contains("\n___\n"));
    }

    #[test]
    fn test_report_headings() {
        let output = render(OutputFormat::Report);
        assert!(output.starts_with("# Catalog Elements\n\n## Orders | 2024\n\n### Name\n"));
    }

    #[test]
    fn test_markdown_title_uses_type() {
        assert!(render(OutputFormat::Md).starts_with("# Asset: Orders | 2024\n"));
    }

    #[test]
    fn test_list_escapes_cells() {
        let output = render(OutputFormat::List);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[2], "| Name | description |");
        assert_eq!(lines[3], "|---|---|");
        assert_eq!(lines[4], "| Orders \\| 2024 | line one<br>line <two> |");
    }

    #[test]
    fn test_mermaid_fences_once() {
        let output = render(OutputFormat::Mermaid);
        assert_eq!(output.matches("```mermaid").count(), 1);
        assert!(output.contains("flowchart LR"));
    }

    #[test]
    fn test_html_escapes() {
        let output = render(OutputFormat::Html);
        assert!(output.contains("<th>Name</th>"));
        assert!(output.contains("<td>line one<br>line &lt;two&gt;</td>"));
    }

    #[test]
    fn test_structured_formats_rejected() {
        let (resolved, rows) = fixture();
        let config = RenderConfig::default();
        let context = TextContext {
            resolved: &resolved,
            rows: &rows,
            config: &config,
            entity_type: "Asset",
        };
        assert!(render_text(OutputFormat::Dict, &context).is_err());
    }
}
