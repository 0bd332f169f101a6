use super::*;
use shared::{domain::SearchTerm, error::ErrorKind};

use crate::test_support::{
    spawn_catalog_server, BROKEN_DEPARTMENT, DEPARTMENT_PRODUCTS, MISSING_ID, TOTAL_PRODUCTS,
};

fn size(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).expect("non-zero")
}

async fn api() -> CatalogApi {
    let fixture = spawn_catalog_server().await;
    CatalogApi::new(FetchClient::new(fixture.base_url))
}

#[tokio::test]
async fn all_products_normalizes_page() {
    let api = api().await;
    let page = api.all_products(3, size(12)).await.expect("page");
    assert_eq!(page.page_index, 3);
    assert_eq!(page.total_pages, 4);
    assert_eq!(page.total_items, TOTAL_PRODUCTS);
    assert_eq!(page.items.len(), 4);
    assert_eq!(page.items[0].id, 37);
    assert!(page.context.is_none());
}

#[tokio::test]
async fn department_products_read_total_elements() {
    let api = api().await;
    let page = api
        .products_by_department(DepartmentId(2), 0, size(12))
        .await
        .expect("page");
    assert_eq!(page.total_items, DEPARTMENT_PRODUCTS);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 12);
}

#[tokio::test]
async fn department_page_attaches_header() {
    let api = api().await;
    let page = api
        .department_page(DepartmentId(2), 1, size(12))
        .await
        .expect("page");
    assert_eq!(page.context.as_ref().and_then(Item::name), Some("Men"));
    assert_eq!(page.page_index, 1);
}

#[tokio::test]
async fn department_page_fails_when_products_fail() {
    let api = api().await;
    let err = api
        .department_page(DepartmentId(BROKEN_DEPARTMENT), 0, size(12))
        .await
        .expect_err("partial failure");
    assert_eq!(err, FetchError::HttpStatus(500));
}

#[tokio::test]
async fn search_term_survives_encoding() {
    let api = api().await;
    let page = api
        .search_products("red shoes & socks", 0, size(12))
        .await
        .expect("search");
    assert_eq!(page.items[0].name(), Some("red shoes & socks match"));
}

#[tokio::test]
async fn category_and_brand_segments_survive_encoding() {
    let api = api().await;
    let by_category = api
        .products_by_category("Tops & Tees", 0, size(12))
        .await
        .expect("category");
    assert_eq!(by_category.items[0].text("category"), Some("Tops & Tees"));

    let by_brand = api
        .products_by_brand("Levi's", 0, size(12))
        .await
        .expect("brand");
    assert_eq!(by_brand.items[0].text("brand"), Some("Levi's"));
}

#[tokio::test]
async fn lookups_by_name() {
    let api = api().await;
    let department = api.department_by_name("Home Goods").await.expect("dept");
    assert_eq!(department.name(), Some("Home Goods"));

    let page = api
        .products_by_department_name("Home Goods", 0, size(2))
        .await
        .expect("products");
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn departments_listing_is_one_page() {
    let api = api().await;
    let page = api.departments().await.expect("departments");
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.total_items, 2);
    assert_eq!(page.items[1].name(), Some("Men"));
    assert_eq!(
        page.items[0].field("productCount"),
        Some(&serde_json::json!(10))
    );
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let api = api().await;
    let err = api.product(ProductId(MISSING_ID)).await.expect_err("404");
    assert!(err.is_not_found());

    let found = api.product(ProductId(7)).await.expect("product");
    assert_eq!(found.id, 7);
    assert_eq!(found.field("retailPrice"), Some(&serde_json::json!(42.5)));
}

#[tokio::test]
async fn page_source_dispatches_on_resource() {
    let api = api().await;
    let request = PageRequest::new(
        Resource::ProductSearch(SearchTerm::parse("  boots ").expect("term")),
        0,
        size(12),
    );
    let page = api.load_page(&request).await.expect("search page");
    assert_eq!(page.items[0].name(), Some("boots match"));

    let departments = api
        .load_page(&PageRequest::new(Resource::Departments, 0, size(12)))
        .await
        .expect("departments");
    assert_eq!(departments.items.len(), 2);
}

#[tokio::test]
async fn record_source_surfaces_status() {
    let api = api().await;
    let err = api
        .load_record(&RecordTarget::Department(DepartmentId(MISSING_ID)))
        .await
        .expect_err("missing");
    assert_eq!(err.kind(), ErrorKind::HttpStatus);
}
