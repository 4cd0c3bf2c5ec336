// Table renderer: turns an ordered listing into the table body the page shows.
//
// Rules
// - The whole body is rebuilt from every listing; nothing is patched in place.
// - An empty listing renders exactly one placeholder row.
// - Cached date/time strings on a record win over values derived from
//   created_at. Instants chrono cannot represent render as `N/A`.
// - Every piece of record text is HTML escaped.

use crate::modules::attendance::core::record::AttendanceRecord;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::fmt::Write;

pub const PLACEHOLDER_TEXT: &str = "No records found";
pub const MISSING_VALUE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFormat {
    date_format: String,
    time_format: String,
    offset: FixedOffset,
}

impl DisplayFormat {
    pub fn new(
        date_format: impl Into<String>,
        time_format: impl Into<String>,
        offset: FixedOffset,
    ) -> Result<Self, String> {
        let date_format = date_format.into();
        let time_format = time_format.into();
        for format in [&date_format, &time_format] {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(format!("invalid strftime pattern '{format}'"));
            }
        }
        Ok(Self {
            date_format,
            time_format,
            offset,
        })
    }

    fn format(&self, millis: i64, pattern: &str) -> String {
        let Some(instant) = DateTime::from_timestamp_millis(millis) else {
            return MISSING_VALUE.to_string();
        };
        let mut out = String::new();
        match write!(out, "{}", instant.with_timezone(&self.offset).format(pattern)) {
            Ok(()) => out,
            Err(_) => MISSING_VALUE.to_string(),
        }
    }

    pub fn date(&self, millis: i64) -> String {
        self.format(millis, &self.date_format)
    }

    pub fn time(&self, millis: i64) -> String {
        self.format(millis, &self.time_format)
    }
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self {
            date_format: "%d/%m/%Y".into(),
            time_format: "%H:%M:%S".into(),
            offset: Utc.fix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub name: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    /// Logged out: nothing is shown.
    Cleared,
    Loading,
    Placeholder,
    Rows(Vec<RowView>),
    Failed(String),
}

impl TableBody {
    pub fn rows(&self) -> &[RowView] {
        match self {
            TableBody::Rows(rows) => rows,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRenderer {
    pub format: DisplayFormat,
    pub deletable: bool,
}

impl TableRenderer {
    pub fn new(format: DisplayFormat, deletable: bool) -> Self {
        Self { format, deletable }
    }

    pub fn columns(&self) -> usize {
        if self.deletable { 4 } else { 3 }
    }

    pub fn render(&self, records: &[AttendanceRecord]) -> TableBody {
        if records.is_empty() {
            return TableBody::Placeholder;
        }
        TableBody::Rows(
            records
                .iter()
                .map(|record| RowView {
                    id: record.id.clone(),
                    name: record.display_name.clone(),
                    date: record
                        .date
                        .clone()
                        .unwrap_or_else(|| self.format.date(record.created_at)),
                    time: record
                        .time
                        .clone()
                        .unwrap_or_else(|| self.format.time(record.created_at)),
                })
                .collect(),
        )
    }

    /// `<tr>` rows for the table body.
    pub fn body_html(&self, body: &TableBody) -> String {
        let columns = self.columns();
        match body {
            TableBody::Cleared => String::new(),
            TableBody::Loading => format!(
                r#"<tr class="loading"><td colspan="{columns}" style="text-align:center;">Loading...</td></tr>"#
            ),
            TableBody::Placeholder => format!(
                r#"<tr class="placeholder"><td colspan="{columns}" style="text-align:center;">{PLACEHOLDER_TEXT}</td></tr>"#
            ),
            TableBody::Failed(message) => format!(
                r#"<tr class="error"><td colspan="{columns}" style="color:red; text-align:center;">{}</td></tr>"#,
                escape_html(message)
            ),
            TableBody::Rows(rows) => {
                let mut html = String::new();
                for row in rows {
                    html.push_str("<tr>");
                    for cell in [&row.name, &row.date, &row.time] {
                        html.push_str("<td>");
                        html.push_str(&escape_html(cell));
                        html.push_str("</td>");
                    }
                    if self.deletable {
                        html.push_str(&format!(
                            r#"<td><a class="delete" href="/records/{}/delete">Delete</a></td>"#,
                            escape_html(&row.id)
                        ));
                    }
                    html.push_str("</tr>");
                }
                html
            }
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut html = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '&' => html.push_str("&amp;"),
            '"' => html.push_str("&quot;"),
            '\'' => html.push_str("&#39;"),
            _ => html.push(ch),
        }
    }
    html
}
