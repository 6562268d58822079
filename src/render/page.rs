//! Full catalog page.
//!
//! Element ids are stable: `list`, `empty`, `count`, `updatedAt`, `year`,
//! `search`, `category`, `toggleView`, `toggleTheme`.

use super::html_escape;
use crate::catalog::CatalogView;
use crate::models::{ALL_CATEGORIES, ALL_CATEGORIES_LABEL};

const LOADING_TEXT: &str = "Loading…";

/// Render a complete HTML document for `view`.
pub fn render_page(view: &CatalogView) -> String {
    let list_content = if view.loading {
        LOADING_TEXT.to_string()
    } else if let Some(error) = &view.error {
        error_panel(error)
    } else {
        view.items_html.clone()
    };

    let empty_class = if view.empty { "empty" } else { "empty hidden" };

    format!(
        r#"<!DOCTYPE html>
<html lang="id" data-theme="{theme}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Dokumen PDF</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body class="{theme}">
    <header id="main-header">
        <form id="filters" method="get" action="/">
            <input id="search" name="q" type="search" placeholder="Cari dokumen…" value="{query}">
            <select id="category" name="category" onchange="this.form.submit()">
                {options}
            </select>
        </form>
        <form method="post" action="/toggle/view">
            {hidden}
            <button id="toggleView" type="submit" title="{view_mode}">{view_icon}</button>
        </form>
        <form method="post" action="/toggle/theme">
            {hidden}
            <button id="toggleTheme" type="submit" title="{theme}">{theme_icon}</button>
        </form>
    </header>
    <main>
        <div class="meta">
            <span id="count">{count}</span>
            <span>Diperbarui: <span id="updatedAt">{updated}</span></span>
        </div>
        <div id="list" class="{view_mode}">{list}</div>
        <div id="empty" class="{empty_class}">
            <div class="empty-title">Tidak ada dokumen</div>
            <div class="empty-sub">Coba kata kunci atau kategori lain.</div>
        </div>
    </main>
    <footer>&copy; <span id="year">{year}</span></footer>
</body>
</html>"#,
        theme = view.theme.as_str(),
        query = html_escape(&view.query),
        options = category_options(view),
        hidden = hidden_filters(view),
        view_mode = view.view_mode.as_str(),
        view_icon = view.view_mode.icon(),
        theme_icon = view.theme.icon(),
        count = view.count_label(),
        updated = html_escape(&view.updated_label),
        list = list_content,
        empty_class = empty_class,
        year = view.year,
    )
}

fn category_options(view: &CatalogView) -> String {
    view.categories
        .iter()
        .map(|category| {
            let label = if category == ALL_CATEGORIES {
                ALL_CATEGORIES_LABEL
            } else {
                category.as_str()
            };
            let selected = if *category == view.category { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                html_escape(category),
                selected,
                html_escape(label)
            )
        })
        .collect()
}

/// Carry the current filters through the toggle forms.
fn hidden_filters(view: &CatalogView) -> String {
    format!(
        r#"<input type="hidden" name="q" value="{}"><input type="hidden" name="category" value="{}">"#,
        html_escape(&view.query),
        html_escape(&view.category)
    )
}

fn error_panel(message: &str) -> String {
    format!(
        r#"<div class="empty-card">
            <div class="empty-title">Gagal memuat data</div>
            <div class="empty-sub">Pastikan file <b>data/pdfs.json</b> ada di repo dan bisa diakses.</div>
            <div class="small">{}</div>
        </div>"#,
        html_escape(message)
    )
}

/// Stylesheet served at `/static/style.css`.
pub const CSS: &str = r#"
:root {
    --bg: #0b0b0f;
    --card: #16161d;
    --text: #e4e4e7;
    --text-muted: #a1a1aa;
    --border: #27272a;
    --accent: #6366f1;
}
html[data-theme="light"] {
    --bg: #fafafa;
    --card: #fff;
    --text: #18181b;
    --text-muted: #52525b;
    --border: #e4e4e7;
}
* { box-sizing: border-box; }
body {
    margin: 0;
    font-family: system-ui, -apple-system, sans-serif;
    background: var(--bg);
    color: var(--text);
}
header {
    display: flex;
    gap: 8px;
    padding: 12px 16px;
    border-bottom: 1px solid var(--border);
}
header form { display: flex; gap: 8px; }
#filters { flex: 1; }
#search { flex: 1; }
input, select, button {
    padding: 6px 10px;
    border: 1px solid var(--border);
    border-radius: 8px;
    background: var(--card);
    color: var(--text);
}
main { padding: 16px; }
.meta {
    display: flex;
    justify-content: space-between;
    color: var(--text-muted);
    font-size: 13px;
    margin-bottom: 12px;
}
#list.grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(260px, 1fr));
    gap: 12px;
}
#list.list { display: flex; flex-direction: column; gap: 8px; }
.card {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 12px;
    padding: 14px;
}
.card.row { display: flex; gap: 12px; align-items: flex-start; }
.row-body { flex: 1; }
.card-top, .card-bottom, .row-meta {
    display: flex;
    justify-content: space-between;
    align-items: center;
    gap: 8px;
}
.title { margin: 8px 0 6px; font-size: 16px; }
.desc { color: var(--text-muted); font-size: 13px; line-height: 1.4; }
.tag, .small { color: var(--text-muted); font-size: 12px; }
.preview { width: 100%; height: 220px; border: 0; margin-top: 10px; }
.btn.primary {
    display: inline-block;
    padding: 6px 12px;
    border-radius: 8px;
    background: var(--accent);
    color: #fff;
    text-decoration: none;
}
.empty, .empty-card { padding: 18px; text-align: center; }
.empty-title { font-weight: 600; }
.empty-sub { color: var(--text-muted); font-size: 13px; }
.hidden { display: none; }
footer { padding: 16px; color: var(--text-muted); font-size: 12px; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Theme, ViewMode};

    fn view() -> CatalogView {
        CatalogView {
            theme: Theme::Dark,
            view_mode: ViewMode::Grid,
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
            categories: vec![ALL_CATEGORIES.to_string(), "Finance".to_string()],
            count: 1,
            items_html: r#"<article class="card">x</article>"#.to_string(),
            empty: false,
            loading: false,
            error: None,
            updated_label: "1 Jan 2024, 00.00".to_string(),
            year: 2024,
        }
    }

    #[test]
    fn test_page_exposes_element_ids() {
        let html = render_page(&view());
        for id in [
            "list",
            "empty",
            "count",
            "updatedAt",
            "year",
            "search",
            "category",
            "toggleView",
            "toggleTheme",
        ] {
            assert!(html.contains(&format!(r#"id="{}""#, id)), "missing #{}", id);
        }
    }

    #[test]
    fn test_page_shows_count_and_options() {
        let html = render_page(&view());
        assert!(html.contains(r#"<span id="count">1 dokumen</span>"#));
        assert!(html.contains(r#"<option value="all" selected>Semua Kategori</option>"#));
        assert!(html.contains(r#"<option value="Finance">Finance</option>"#));
        assert!(html.contains(r#"class="empty hidden""#));
        assert!(html.contains(r#"data-theme="dark""#));
        assert!(html.contains("🌙"));
    }

    #[test]
    fn test_page_escapes_query() {
        let mut v = view();
        v.query = r#""><script>"#.to_string();
        let html = render_page(&v);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_error_panel_replaces_list() {
        let mut v = view();
        v.error = Some("HTTP 404".to_string());
        v.items_html.clear();
        v.count = 0;
        v.empty = true;
        let html = render_page(&v);
        assert!(html.contains("Gagal memuat data"));
        assert!(html.contains("data/pdfs.json"));
        assert!(html.contains(r#"<div id="empty" class="empty">"#));
        assert!(html.contains("0 dokumen"));
    }

    #[test]
    fn test_loading_state() {
        let mut v = view();
        v.loading = true;
        assert!(render_page(&v).contains(LOADING_TEXT));
    }

    #[test]
    fn test_list_layout_class() {
        let mut v = view();
        v.view_mode = ViewMode::List;
        let html = render_page(&v);
        assert!(html.contains(r#"<div id="list" class="list">"#));
        assert!(html.contains("☰"));
    }
}
