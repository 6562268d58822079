//! HTML rendering of catalog entries.
//!
//! Every value interpolated into markup passes through [`html_escape`].

pub mod page;

pub use page::{render_page, CSS};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::{DocumentItem, ViewMode, NO_DATE};

/// Label on the "open" action.
const OPEN_LABEL: &str = "Buka";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Render `items` in the given layout. An empty slice renders nothing.
pub fn render(items: &[&DocumentItem], view_mode: ViewMode) -> String {
    items
        .iter()
        .map(|item| match view_mode {
            ViewMode::Grid => card(item),
            ViewMode::List => row(item),
        })
        .collect()
}

fn card(item: &DocumentItem) -> String {
    let description = if item.description.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="desc">{}</div>"#, html_escape(&item.description))
    };

    let preview = item
        .preview_url
        .as_deref()
        .map(resolve_url)
        .filter(|url| !url.is_empty())
        .map(|url| {
            format!(
                r#"<iframe class="preview" src="{}" loading="lazy"></iframe>"#,
                html_escape(&url)
            )
        })
        .unwrap_or_default();

    let date = item
        .updated_at
        .as_deref()
        .map(|d| format!(r#"<span class="small">🗓️ {}</span>"#, html_escape(&format_date(d))))
        .unwrap_or_default();

    format!(
        r#"
    <article class="card">
        <div class="card-top"><span class="file-icon">📄</span>{tag}</div>
        <h3 class="title">{title}</h3>
        {description}
        {preview}
        <div class="card-bottom">{date}{open}</div>
    </article>"#,
        tag = category_tag(item),
        title = html_escape(&item.title),
        description = description,
        preview = preview,
        date = date,
        open = open_link(item),
    )
}

fn row(item: &DocumentItem) -> String {
    let description = if item.description.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="desc">{}</div>"#, html_escape(&item.description))
    };

    let date = item
        .updated_at
        .as_deref()
        .map(|d| format!(r#"<span class="small">🗓️ {}</span>"#, html_escape(&format_date(d))))
        .unwrap_or_default();

    format!(
        r#"
    <article class="card row">
        <div class="row-body">
            <h3 class="title">{title}</h3>
            {description}
            <div class="row-meta">{tag}{date}</div>
        </div>
        {open}
    </article>"#,
        title = html_escape(&item.title),
        description = description,
        tag = category_tag(item),
        date = date,
        open = open_link(item),
    )
}

fn category_tag(item: &DocumentItem) -> String {
    format!(r#"<span class="tag">🏷️ {}</span>"#, html_escape(&item.category))
}

fn open_link(item: &DocumentItem) -> String {
    match item.open_url().map(resolve_url) {
        Some(url) if !url.is_empty() => format!(
            r#"<a class="btn primary" href="{}" target="_blank" rel="noopener">{}</a>"#,
            html_escape(&url),
            OPEN_LABEL
        ),
        _ => String::new(),
    }
}

/// Escape text for use in HTML content or a quoted attribute.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Resolve a manifest link against the page root.
///
/// `http(s)://` URLs pass through; anything else loses its leading slashes.
pub fn resolve_url(url: &str) -> String {
    if crate::catalog::loader::is_http_url(url) {
        url.to_string()
    } else {
        url.trim_start_matches('/').to_string()
    }
}

/// Format a manifest timestamp as e.g. `1 Jan 2024, 07.30` (UTC).
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` or a bare date.
/// Anything else yields [`NO_DATE`].
pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw.trim()) {
        Some(dt) => {
            use chrono::{Datelike, Timelike};
            format!(
                "{} {} {}, {:02}.{:02}",
                dt.day(),
                MONTHS[dt.month0() as usize],
                dt.year(),
                dt.hour(),
                dt.minute()
            )
        }
        None => NO_DATE.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unescape(s: &str) -> String {
        s.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#039;", "'")
            .replace("&amp;", "&")
    }

    #[test]
    fn test_html_escape_all_special_characters() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_html_escape_round_trips() {
        let original = r#"<script>alert("x & 'y'")</script> &amp;"#;
        assert_eq!(unescape(&html_escape(original)), original);
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(resolve_url("https://cdn.example.com/a.pdf"), "https://cdn.example.com/a.pdf");
        assert_eq!(resolve_url("HTTP://example.com/a.pdf"), "HTTP://example.com/a.pdf");
        assert_eq!(resolve_url("///pdf/a.pdf"), "pdf/a.pdf");
        assert_eq!(resolve_url("pdf/a.pdf"), "pdf/a.pdf");
        assert_eq!(resolve_url(""), "");
    }

    #[test]
    fn test_grid_card_escapes_fields() {
        let item = DocumentItem::new("<b>Tax</b>", "/pdf/a.pdf?x=1&y=\"2\"")
            .with_description("Q1 & Q2")
            .with_category("Fin<ance>");
        let html = render(&[&item], ViewMode::Grid);

        assert!(html.contains("&lt;b&gt;Tax&lt;/b&gt;"));
        assert!(html.contains("Q1 &amp; Q2"));
        assert!(html.contains("Fin&lt;ance&gt;"));
        assert!(html.contains(r#"href="pdf/a.pdf?x=1&amp;y=&quot;2&quot;""#));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_grid_card_embeds_preview() {
        let item = DocumentItem::new("A", "pdf/a.pdf").with_preview("/preview/a.html");
        let html = render(&[&item], ViewMode::Grid);
        assert!(html.contains(r#"<iframe class="preview" src="preview/a.html""#));
        assert!(html.contains(r#"class="card""#));
    }

    #[test]
    fn test_list_row_has_no_preview() {
        let item = DocumentItem::new("A", "pdf/a.pdf").with_preview("preview/a.html");
        let html = render(&[&item], ViewMode::List);
        assert!(html.contains(r#"class="card row""#));
        assert!(!html.contains("<iframe"));
        assert!(html.contains(r#"href="pdf/a.pdf""#));
    }

    #[test]
    fn test_open_link_omitted_without_url() {
        let item = DocumentItem::new("A", "");
        assert!(!render(&[&item], ViewMode::Grid).contains("<a "));
        assert!(!render(&[&item], ViewMode::List).contains("<a "));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[], ViewMode::Grid), "");
        assert_eq!(render(&[], ViewMode::List), "");
    }

    #[test]
    fn test_render_keeps_order() {
        let a = DocumentItem::new("First", "a.pdf");
        let b = DocumentItem::new("Second", "b.pdf");
        let html = render(&[&a, &b], ViewMode::List);
        assert!(html.find("First").unwrap() < html.find("Second").unwrap());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-01T00:00:00Z"), "1 Jan 2024, 00.00");
        assert_eq!(format_date("2024-08-17T10:05:00+07:00"), "17 Agu 2024, 03.05");
        assert_eq!(format_date("2023-12-25"), "25 Des 2023, 00.00");
        assert_eq!(format_date("2024-05-02T09:30:00"), "2 Mei 2024, 09.30");
        assert_eq!(format_date("kemarin"), "-");
        assert_eq!(format_date(""), "-");
    }

    #[test]
    fn test_item_date_rendered_when_present() {
        let item = DocumentItem::new("A", "a.pdf").with_updated_at("2024-03-05");
        assert!(render(&[&item], ViewMode::Grid).contains("5 Mar 2024, 00.00"));
    }
}
