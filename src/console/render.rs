use crate::imports::*;

use serde::Serialize;

/*
    Types:
    * CardRow - Label/value line of a record card
    * Table - Header plus rows, padded to column width before rendering

    All layouts are tera templates compiled once.
*/

const CARD_TEMPLATE: &str = "\
== {{ title }} ==
{% for row in rows %}{{ row.label }} : {{ row.value }}
{% endfor %}";

const TABLE_TEMPLATE: &str = "\
{{ title }}
{{ header | join(sep=\"  \") }}
{{ rule }}
{% for row in rows %}{{ row | join(sep=\"  \") }}
{% endfor %}{% if rows | length == 0 %}(nothing to show)
{% endif %}";

const INTRO_TEMPLATE: &str = "\
{{ name }} v{{ version }}
Your personal assistant for contacts and notes.
Type `help` to see the available commands{% if default_command %}, or press Enter for `{{ default_command }}`{% endif %}.";

static TEMPLATES: LazyLock<tera::Tera> = LazyLock::new(|| {
    let mut tera = tera::Tera::default();
    tera.add_raw_templates(vec![
        ("card", CARD_TEMPLATE),
        ("table", TABLE_TEMPLATE),
        ("intro", INTRO_TEMPLATE),
    ])
    .expect("built-in console templates must compile");
    tera
});

#[derive(Debug, Clone, Serialize)]
pub struct CardRow {
    pub label: String,
    pub value: String,
}

impl CardRow {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    title: String,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>, header: &[&str]) -> Self {
        Self {
            title: title.into(),
            header: header.iter().map(|cell| cell.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(|cell| cell.chars().count()).collect();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                let width = cell.chars().count();
                match widths.get_mut(index) {
                    Some(current) => *current = (*current).max(width),
                    None => widths.push(width),
                }
            }
        }
        widths
    }

    pub fn render(&self) -> Result<String> {
        let widths = self.widths();
        let pad = |cells: &[String]| -> Vec<String> {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect()
        };
        let rule = "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1));

        let mut context = tera::Context::new();
        context.insert("title", &self.title);
        context.insert("header", &pad(&self.header));
        context.insert("rule", &rule);
        context.insert(
            "rows",
            &self.rows.iter().map(|row| pad(row)).collect::<Vec<_>>(),
        );
        let rendered = TEMPLATES
            .render("table", &context)
            .context("failed to render table")?;
        Ok(rendered.trim_end().to_string())
    }
}

pub fn render_card(title: &str, rows: &[CardRow]) -> Result<String> {
    let mut context = tera::Context::new();
    context.insert("title", title);
    context.insert("rows", rows);
    let rendered = TEMPLATES
        .render("card", &context)
        .context("failed to render card")?;
    Ok(rendered.trim_end().to_string())
}

pub fn render_intro(default_command: Option<&str>) -> Result<String> {
    let mut context = tera::Context::new();
    context.insert("name", "assistant");
    context.insert("version", env!("CARGO_PKG_VERSION"));
    context.insert("default_command", &default_command);
    TEMPLATES
        .render("intro", &context)
        .context("failed to render intro")
}
