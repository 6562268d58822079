//! HTTP request handlers.

use axum::extract::{Form, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect};
use serde::Deserialize;

use super::AppState;
use crate::catalog::CatalogView;
use crate::models::ALL_CATEGORIES;
use crate::render::{render_page, CSS};

/// Search query and category, from the query string or a toggle form.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub q: Option<String>,
    pub category: Option<String>,
}

impl CatalogParams {
    /// Page URL carrying these filters.
    fn back_url(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(q) = self.q.as_deref().filter(|q| !q.trim().is_empty()) {
            pairs.push(format!("q={}", urlencoding::encode(q)));
        }
        if let Some(category) = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
        {
            pairs.push(format!("category={}", urlencoding::encode(category)));
        }

        if pairs.is_empty() {
            "/".to_string()
        } else {
            format!("/?{}", pairs.join("&"))
        }
    }
}

/// Catalog page: one load cycle, then filter and render.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> impl IntoResponse {
    let mut controller = state.controller.lock().await;

    controller.set_query(params.q.unwrap_or_default());
    controller.set_category(params.category.unwrap_or_default());
    controller.load(&mut |_: &CatalogView| {}).await;

    Html(render_page(&controller.view()))
}

pub async fn toggle_theme(
    State(state): State<AppState>,
    Form(params): Form<CatalogParams>,
) -> impl IntoResponse {
    state.controller.lock().await.toggle_theme();
    Redirect::to(&params.back_url())
}

pub async fn toggle_view(
    State(state): State<AppState>,
    Form(params): Form<CatalogParams>,
) -> impl IntoResponse {
    state.controller.lock().await.toggle_view();
    Redirect::to(&params.back_url())
}

pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], CSS)
}

pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_url_encodes_filters() {
        let params = CatalogParams {
            q: Some("laporan pajak".to_string()),
            category: Some("Keuangan & Pajak".to_string()),
        };
        assert_eq!(
            params.back_url(),
            "/?q=laporan%20pajak&category=Keuangan%20%26%20Pajak"
        );
    }

    #[test]
    fn test_back_url_drops_defaults() {
        let params = CatalogParams {
            q: Some("  ".to_string()),
            category: Some("all".to_string()),
        };
        assert_eq!(params.back_url(), "/");
        assert_eq!(CatalogParams::default().back_url(), "/");
    }
}
