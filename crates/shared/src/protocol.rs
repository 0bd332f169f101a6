//! Response envelopes of the catalog REST API.

use serde::{Deserialize, Serialize};

use crate::domain::{Item, PageResult};

/// Paged listing envelope.
///
/// Product endpoints report the item count as `totalItems`; the department
/// products endpoint reports it as `totalElements`, and Spring's raw `Page`
/// serialization uses `content` for the records. Both spellings are accepted
/// and normalized into `total_items`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    #[serde(default, alias = "content")]
    pub products: Vec<Item>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default, alias = "totalElements")]
    pub total_items: u64,
}

impl PageEnvelope {
    pub fn into_page(self, page_index: u32) -> PageResult {
        PageResult {
            items: self.products,
            page_index,
            total_pages: self.total_pages,
            total_items: self.total_items,
            context: None,
        }
    }
}

/// `GET /departments` is not paginated; it is normalized into one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentListEnvelope {
    #[serde(default)]
    pub departments: Vec<Item>,
}

impl DepartmentListEnvelope {
    pub fn into_page(self) -> PageResult {
        let total_items = self.departments.len() as u64;
        let total_pages = u32::from(!self.departments.is_empty());
        PageResult {
            items: self.departments,
            page_index: 0,
            total_pages,
            total_items,
            context: None,
        }
    }
}

/// Error body produced by the backend's exception handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn product_envelope_reads_total_items() {
        let envelope: PageEnvelope = serde_json::from_value(json!({
            "products": [{"id": 1, "name": "Socks"}],
            "totalPages": 4,
            "totalItems": 37
        }))
        .expect("envelope");
        let page = envelope.into_page(2);
        assert_eq!(page.total_items, 37);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.page_index, 2);
        assert_eq!(page.items[0].name(), Some("Socks"));
    }

    #[test]
    fn department_envelope_reads_total_elements() {
        let envelope: PageEnvelope = serde_json::from_value(json!({
            "department": "Men",
            "products": [],
            "totalElements": 12,
            "totalPages": 1,
            "currentPage": 0
        }))
        .expect("envelope");
        assert_eq!(envelope.total_items, 12);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let envelope: PageEnvelope = serde_json::from_value(json!({})).expect("envelope");
        let page = envelope.into_page(0);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.total_items, 0);
    }

    #[test]
    fn department_list_is_a_single_page() {
        let envelope: DepartmentListEnvelope = serde_json::from_value(json!({
            "departments": [
                {"id": 1, "name": "Women", "productCount": 10},
                {"id": 2, "name": "Men", "productCount": 8}
            ]
        }))
        .expect("envelope");
        let page = envelope.into_page();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 2);
        assert_eq!(
            page.items[0].field("productCount"),
            Some(&serde_json::json!(10))
        );

        let empty = DepartmentListEnvelope::default().into_page();
        assert_eq!(empty.total_pages, 0);
    }
}
