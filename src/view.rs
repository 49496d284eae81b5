//! Table rendering
//!
//! The view is rebuilt from the full record list on every call. User text
//! only enters a `RowView` through `escape_html`, so any markup produced
//! from it is inert.

use std::fmt::Write;

use crate::record::{RecordKey, StudentRecord};

/// Text of the row shown when there are no records
pub const EMPTY_PLACEHOLDER: &str = "No students registered yet. Start by adding a new student!";

/// Escape text for use in HTML content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// One table row, fields already escaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// 1-based row number
    pub serial: usize,
    pub key: RecordKey,
    pub name: String,
    pub id: String,
    pub email: String,
    pub contact: String,
}

/// Rendered table contents plus record count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub rows: Vec<RowView>,
    pub count: usize,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Table body markup (`<tr>` elements)
    pub fn to_html(&self) -> String {
        if self.rows.is_empty() {
            return format!("<tr class=\"no-records\"><td colspan=\"6\">{EMPTY_PLACEHOLDER}</td></tr>");
        }

        let mut html = String::new();
        for row in &self.rows {
            // Writing to a String cannot fail
            let _ = write!(
                html,
                "<tr>\
                 <td>{serial}</td>\
                 <td>{name}</td>\
                 <td>{id}</td>\
                 <td>{email}</td>\
                 <td>{contact}</td>\
                 <td>\
                 <button type=\"button\" class=\"btn btn-edit\" data-action=\"edit\" data-key=\"{key}\" aria-label=\"Edit student {name}\">Edit</button> \
                 <button type=\"button\" class=\"btn btn-delete\" data-action=\"delete\" data-key=\"{key}\" aria-label=\"Delete student {name}\">Delete</button>\
                 </td>\
                 </tr>",
                serial = row.serial,
                name = row.name,
                id = row.id,
                email = row.email,
                contact = row.contact,
                key = row.key,
            );
        }
        html
    }
}

/// Build the table view from records in store order
pub fn render_table<'a>(records: impl IntoIterator<Item = (RecordKey, &'a StudentRecord)>) -> TableView {
    let rows: Vec<RowView> = records
        .into_iter()
        .enumerate()
        .map(|(index, (key, record))| RowView {
            serial: index + 1,
            key,
            name: escape_html(&record.name),
            id: escape_html(&record.id),
            email: escape_html(&record.email),
            contact: escape_html(&record.contact),
        })
        .collect();
    let count = rows.len();
    TableView { rows, count }
}
