//! Typed wrappers over the catalog REST endpoints.

use std::num::NonZeroU32;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{DepartmentId, Item, PageRequest, PageResult, ProductId, Resource},
    error::FetchError,
    protocol::{DepartmentListEnvelope, PageEnvelope},
};

use crate::{
    detail::{RecordSource, RecordTarget},
    fetch::{FetchClient, QueryParams},
    listing::PageSource,
};

#[derive(Debug, Clone)]
pub struct CatalogApi {
    fetch: FetchClient,
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, FetchError> {
    Ok(serde_json::from_value(value)?)
}

impl CatalogApi {
    pub fn new(fetch: FetchClient) -> Self {
        Self { fetch }
    }

    async fn page(
        &self,
        path: &[&str],
        query: QueryParams,
        page: u32,
    ) -> Result<PageResult, FetchError> {
        let envelope: PageEnvelope = decode(self.fetch.get(path, &query).await?)?;
        Ok(envelope.into_page(page))
    }

    pub async fn all_products(&self, page: u32, size: NonZeroU32) -> Result<PageResult, FetchError> {
        self.page(&["products"], QueryParams::page(page, size), page)
            .await
    }

    pub async fn product(&self, id: ProductId) -> Result<Item, FetchError> {
        let id = id.to_string();
        decode(self.fetch.get(&["products", id.as_str()], &QueryParams::new()).await?)
    }

    pub async fn search_products(
        &self,
        name: &str,
        page: u32,
        size: NonZeroU32,
    ) -> Result<PageResult, FetchError> {
        let query = QueryParams::new()
            .with("name", name)
            .with("page", page)
            .with("size", size);
        self.page(&["products", "search"], query, page).await
    }

    pub async fn products_by_category(
        &self,
        category: &str,
        page: u32,
        size: NonZeroU32,
    ) -> Result<PageResult, FetchError> {
        self.page(
            &["products", "category", category],
            QueryParams::page(page, size),
            page,
        )
        .await
    }

    pub async fn products_by_brand(
        &self,
        brand: &str,
        page: u32,
        size: NonZeroU32,
    ) -> Result<PageResult, FetchError> {
        self.page(
            &["products", "brand", brand],
            QueryParams::page(page, size),
            page,
        )
        .await
    }

    pub async fn departments(&self) -> Result<PageResult, FetchError> {
        let envelope: DepartmentListEnvelope =
            decode(self.fetch.get(&["departments"], &QueryParams::new()).await?)?;
        Ok(envelope.into_page())
    }

    pub async fn department(&self, id: DepartmentId) -> Result<Item, FetchError> {
        let id = id.to_string();
        decode(
            self.fetch
                .get(&["departments", id.as_str()], &QueryParams::new())
                .await?,
        )
    }

    pub async fn department_by_name(&self, name: &str) -> Result<Item, FetchError> {
        decode(
            self.fetch
                .get(&["departments", "name", name], &QueryParams::new())
                .await?,
        )
    }

    /// This endpoint reports its count as `totalElements`; the envelope
    /// normalizes it into `total_items`.
    pub async fn products_by_department(
        &self,
        id: DepartmentId,
        page: u32,
        size: NonZeroU32,
    ) -> Result<PageResult, FetchError> {
        let id = id.to_string();
        self.page(
            &["departments", id.as_str(), "products"],
            QueryParams::page(page, size),
            page,
        )
        .await
    }

    pub async fn products_by_department_name(
        &self,
        name: &str,
        page: u32,
        size: NonZeroU32,
    ) -> Result<PageResult, FetchError> {
        self.page(
            &["products", "department", "name", name],
            QueryParams::page(page, size),
            page,
        )
        .await
    }

    /// Department header and product page are fetched together; the view
    /// fails as a whole if either call fails.
    pub async fn department_page(
        &self,
        id: DepartmentId,
        page: u32,
        size: NonZeroU32,
    ) -> Result<PageResult, FetchError> {
        let (department, mut result) = tokio::try_join!(
            self.department(id),
            self.products_by_department(id, page, size)
        )?;
        result.context = Some(department);
        Ok(result)
    }
}

#[async_trait]
impl PageSource for CatalogApi {
    async fn load_page(&self, request: &PageRequest) -> Result<PageResult, FetchError> {
        let page = request.page_index;
        let size = request.page_size;
        match &request.resource {
            Resource::AllProducts => self.all_products(page, size).await,
            Resource::ProductsByDepartment(id) => self.department_page(*id, page, size).await,
            Resource::ProductSearch(term) => self.search_products(term.as_str(), page, size).await,
            Resource::ProductsByCategory(category) => {
                self.products_by_category(category, page, size).await
            }
            Resource::ProductsByBrand(brand) => self.products_by_brand(brand, page, size).await,
            Resource::Departments => self.departments().await,
        }
    }
}

#[async_trait]
impl RecordSource for CatalogApi {
    async fn load_record(&self, target: &RecordTarget) -> Result<Item, FetchError> {
        match target {
            RecordTarget::Product(id) => self.product(*id).await,
            RecordTarget::Department(id) => self.department(*id).await,
            RecordTarget::DepartmentByName(name) => self.department_by_name(name).await,
        }
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
