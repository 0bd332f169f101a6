//! In-process catalog API used by the client tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub(crate) const TOTAL_PRODUCTS: u64 = 40;
pub(crate) const DEPARTMENT_PRODUCTS: u64 = 25;
/// Category whose listing stalls long enough to trip short client timeouts.
pub(crate) const SLOW_CATEGORY: &str = "slow";
pub(crate) const SLOW_DELAY: Duration = Duration::from_millis(500);
/// Department whose header loads but whose product page returns 500.
pub(crate) const BROKEN_DEPARTMENT: i64 = 66;
pub(crate) const MISSING_ID: i64 = 404;

#[derive(Clone, Default)]
pub(crate) struct FixtureCounters {
    pub slow_started: Arc<AtomicUsize>,
    pub slow_completed: Arc<AtomicUsize>,
}

impl FixtureCounters {
    pub fn slow_started(&self) -> usize {
        self.slow_started.load(Ordering::SeqCst)
    }
}

pub(crate) struct CatalogFixture {
    pub base_url: String,
    pub counters: FixtureCounters,
}

type Params = Query<HashMap<String, String>>;

fn paging(params: &HashMap<String, String>) -> (u64, u64) {
    let page = params
        .get("page")
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);
    let size = params
        .get("size")
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(20)
        .max(1);
    (page, size)
}

fn products_page(page: u64, size: u64, total: u64) -> (Vec<Value>, u64) {
    let start = page * size;
    let end = (start + size).min(total);
    let products = (start..end)
        .map(|id| json!({ "id": id + 1, "name": format!("Product {}", id + 1), "retailPrice": 19.99 }))
        .collect();
    (products, total.div_ceil(size))
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": "Request failed", "message": message })),
    )
        .into_response()
}

async fn list_products(Query(params): Params) -> Json<Value> {
    let (page, size) = paging(&params);
    let (products, total_pages) = products_page(page, size, TOTAL_PRODUCTS);
    Json(json!({
        "products": products,
        "totalPages": total_pages,
        "totalItems": TOTAL_PRODUCTS,
    }))
}

async fn search_products(Query(params): Params) -> Json<Value> {
    let name = params.get("name").cloned().unwrap_or_default();
    Json(json!({
        "products": [{ "id": 900, "name": format!("{name} match") }],
        "totalPages": 1,
        "totalItems": 1,
    }))
}

async fn product(Path(id): Path<i64>) -> Response {
    if id == MISSING_ID {
        return error_body(StatusCode::NOT_FOUND, "product not found");
    }
    Json(json!({ "id": id, "name": format!("Product {id}"), "retailPrice": 42.5, "cost": 20.0 }))
        .into_response()
}

async fn by_category(
    State(counters): State<FixtureCounters>,
    Path(category): Path<String>,
) -> Json<Value> {
    if category == SLOW_CATEGORY {
        counters.slow_started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(SLOW_DELAY).await;
        counters.slow_completed.fetch_add(1, Ordering::SeqCst);
    }
    Json(json!({
        "products": [{ "id": 1, "category": category }],
        "totalPages": 1,
        "totalItems": 1,
    }))
}

async fn by_brand(Path(brand): Path<String>) -> Json<Value> {
    Json(json!({
        "products": [{ "id": 2, "brand": brand }],
        "totalPages": 1,
        "totalItems": 1,
    }))
}

async fn by_department_name(Path(name): Path<String>, Query(params): Params) -> Json<Value> {
    let (page, size) = paging(&params);
    let (products, total_pages) = products_page(page, size, 3);
    Json(json!({
        "products": products,
        "department": name,
        "totalPages": total_pages,
        "totalItems": 3,
    }))
}

async fn departments() -> Json<Value> {
    Json(json!({
        "departments": [
            { "id": 1, "name": "Women", "description": "Apparel", "productCount": 10 },
            { "id": 2, "name": "Men", "description": "Apparel", "productCount": 8 },
        ]
    }))
}

fn department_name(id: i64) -> String {
    match id {
        1 => "Women".to_string(),
        2 => "Men".to_string(),
        BROKEN_DEPARTMENT => "Broken".to_string(),
        other => format!("Department {other}"),
    }
}

async fn department(Path(id): Path<i64>) -> Response {
    if id == MISSING_ID {
        return error_body(StatusCode::NOT_FOUND, "department not found");
    }
    Json(json!({ "id": id, "name": department_name(id), "description": "Department" }))
        .into_response()
}

async fn department_by_name(Path(name): Path<String>) -> Json<Value> {
    Json(json!({ "id": 5, "name": name }))
}

async fn department_products(Path(id): Path<i64>, Query(params): Params) -> Response {
    match id {
        MISSING_ID => return error_body(StatusCode::NOT_FOUND, "department not found"),
        BROKEN_DEPARTMENT => {
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred")
        }
        _ => {}
    }
    let (page, size) = paging(&params);
    let (products, total_pages) = products_page(page, size, DEPARTMENT_PRODUCTS);
    Json(json!({
        "department": department_name(id),
        "products": products,
        "totalElements": DEPARTMENT_PRODUCTS,
        "totalPages": total_pages,
        "currentPage": page,
    }))
    .into_response()
}

async fn broken_body() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        "{\"products\": [",
    )
        .into_response()
}

pub(crate) async fn spawn_catalog_server() -> CatalogFixture {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let counters = FixtureCounters::default();

    let app = Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/search", get(search_products))
        .route("/api/products/:id", get(product))
        .route("/api/products/category/:category", get(by_category))
        .route("/api/products/brand/:brand", get(by_brand))
        .route(
            "/api/products/department/name/:name",
            get(by_department_name),
        )
        .route("/api/departments", get(departments))
        .route("/api/departments/:id", get(department))
        .route("/api/departments/name/:name", get(department_by_name))
        .route("/api/departments/:id/products", get(department_products))
        .route("/api/broken", get(broken_body))
        .with_state(counters.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    CatalogFixture {
        base_url: format!("http://{addr}/api"),
        counters,
    }
}

/// An address nothing is listening on.
pub(crate) async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}/api")
}
