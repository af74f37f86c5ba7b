// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Staging file names, matching the names the extractor gives documents.

use grimoire_store_db::Document;

fn is_kept(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{0410}'..='\u{044F}').contains(&c)
}

/// Replace every character outside `[a-zA-Z0-9А-я]` by one `_` per UTF-16 unit.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if is_kept(c) {
            out.push(c);
        } else {
            out.extend(std::iter::repeat_n('_', c.len_utf16()));
        }
    }
    out
}

/// `<prefix>_<sanitized name>_<id>.json`, or `<id>.json` for unnamed documents.
pub fn document_filename(doc: &Document, document_type: &str) -> String {
    let name = match doc.name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return format!("{}.json", doc.id),
    };
    let prefix = match document_type {
        "actors" | "items" => doc
            .kind
            .as_deref()
            .filter(|kind| !kind.is_empty())
            .unwrap_or(document_type),
        _ => document_type,
    };
    format!("{prefix}_{}_{}.json", sanitize(name), doc.id)
}
