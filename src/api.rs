//! HTTP surface for the console's catalog screens

use std::sync::Arc;
use axum::{extract::{Query, State}, http::StatusCode, response::{IntoResponse, Response}, routing::{get, post}, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::catalog::CatalogService;
use crate::domain::aggregates::{Category, Product, Selection};
use crate::domain::events::CatalogEvent;
use crate::domain::filter::{CategoryFilter, NameSelection, ProductQuery, Resolved};
use crate::domain::value_objects::{CategoryId, Level};
use crate::CatalogError;

#[derive(Clone)] pub struct AppState { pub catalog: Arc<CatalogService> }

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/categories/levels", get(list_levels))
        .route("/api/v1/categories/children", get(list_children))
        .route("/api/v1/selection", post(apply_selection))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/catalog/refresh", post(refresh_catalog))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidLevel(_) => StatusCode::BAD_REQUEST,
            Self::Http(_) | Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

async fn health(State(s): State<AppState>) -> impl IntoResponse {
    let snapshot = s.catalog.snapshot();
    Json(serde_json::json!({
        "status": "healthy", "service": "catalog-admin",
        "catalogToken": snapshot.token, "fetchedAt": snapshot.fetched_at
    }))
}

async fn list_levels(State(s): State<AppState>) -> Response {
    let snapshot = s.catalog.snapshot();
    Json(snapshot.hierarchy.level_sets()).into_response()
}

#[derive(Debug, Deserialize)] pub struct ChildrenParams { pub level: u8, pub parent: Option<String> }

async fn list_children(State(s): State<AppState>, Query(p): Query<ChildrenParams>) -> Result<Response, CatalogError> {
    let level = Level::try_from(p.level)?;
    let parent = p.parent.map(CategoryId::from);
    let snapshot = s.catalog.snapshot();
    Ok(Json(snapshot.hierarchy.children_at(level, parent.as_ref())).into_response())
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectionAction {
    Select { level: Level, id: CategoryId },
    Clear { level: Level },
    Reset,
}

#[derive(Debug, Deserialize)] pub struct SelectionRequest { #[serde(default)] pub selection: Selection, pub action: SelectionAction }

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeOptions<'a> { pub level1: Vec<&'a Category>, pub level2: Vec<&'a Category>, pub level3: Vec<&'a Category>, pub level4: Vec<&'a Category> }

#[derive(Debug, Serialize)]
pub struct SelectionResponse<'a> { pub accepted: bool, pub selection: Selection, pub options: CascadeOptions<'a> }

async fn apply_selection(State(s): State<AppState>, Json(r): Json<SelectionRequest>) -> Response {
    let mut selection = r.selection;
    let accepted = match r.action {
        SelectionAction::Select { level, id } => selection.select(level, Some(id)),
        SelectionAction::Clear { level } => { selection.clear_level(level); true }
        SelectionAction::Reset => { selection.reset(); true }
    };
    for event in selection.take_events() {
        tracing::debug!(?event, "selection transition");
    }
    let snapshot = s.catalog.snapshot();
    let [level1, level2, level3, level4] = snapshot.hierarchy.options(&selection);
    let options = CascadeOptions { level1, level2, level3, level4 };
    Json(SelectionResponse { accepted, selection, options }).into_response()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductParams {
    pub page: Option<u32>, pub per_page: Option<u32>, pub search: Option<String>,
    pub category_id: Option<String>, pub sub_cat_id: Option<String>, pub third_sub_cat_id: Option<String>, pub fourth_sub_cat_id: Option<String>,
    pub category: Option<String>, pub sub_category: Option<String>, pub third_category: Option<String>, pub fourth_category: Option<String>,
}

impl ProductParams {
    /// Each level's id filters on its own; a gap above does not drop the ids below it.
    fn id_filter(&self) -> CategoryFilter {
        let ids = [&self.category_id, &self.sub_cat_id, &self.third_sub_cat_id, &self.fourth_sub_cat_id]
            .map(|id| id.as_deref().map(str::trim).map(CategoryId::from));
        CategoryFilter::from_ids(ids)
    }

    fn name_selection(&self) -> NameSelection {
        NameSelection {
            category: self.category.clone(), sub_category: self.sub_category.clone(),
            third_category: self.third_category.clone(), fourth_category: self.fourth_category.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductRow<'a> {
    #[serde(flatten)]
    pub product: &'a Product,
    pub path: Vec<&'a str>,
}

#[derive(Debug, Serialize)] pub struct PaginatedResponse<T> { pub data: Vec<T>, pub total: usize, pub page: u32 }

async fn list_products(State(s): State<AppState>, Query(p): Query<ProductParams>) -> Response {
    let page = p.page.unwrap_or(1).max(1);
    let per_page = p.per_page.unwrap_or(20).clamp(1, 100);
    let snapshot = s.catalog.snapshot();
    let hierarchy = &snapshot.hierarchy;
    let names = p.name_selection();
    let categories = if names.is_empty() {
        p.id_filter()
    } else {
        match names.resolve(hierarchy) {
            Resolved::Filter(categories) => categories,
            Resolved::NoMatch { level, name } => {
                tracing::debug!(%level, %name, "category name not found, no products match");
                return Json(PaginatedResponse::<ProductRow> { data: vec![], total: 0, page }).into_response();
            }
        }
    };
    let query = ProductQuery::new(categories).with_search(p.search.as_deref().unwrap_or_default());
    let matched = query.apply(&snapshot.products, hierarchy);
    let total = matched.len();
    let data = matched
        .into_iter()
        .skip(((page - 1) as usize).saturating_mul(per_page as usize))
        .take(per_page as usize)
        .map(|product| {
            let deepest = Level::ALL.into_iter().rev().find_map(|l| product.category_key(l));
            let path = deepest.map(|id| hierarchy.path(id).into_iter().map(|c| c.name.as_str()).collect()).unwrap_or_default();
            ProductRow { product, path }
        })
        .collect();
    Json(PaginatedResponse { data, total, page }).into_response()
}

async fn refresh_catalog(State(s): State<AppState>) -> Result<Json<serde_json::Value>, CatalogError> {
    let body = match s.catalog.refresh().await? {
        CatalogEvent::Installed { token, categories, excluded, products } => {
            serde_json::json!({ "status": "installed", "token": token, "categories": categories, "excluded": excluded, "products": products })
        }
        CatalogEvent::Discarded { token, current } => serde_json::json!({ "status": "discarded", "token": token, "current": current }),
    };
    Ok(Json(body))
}
