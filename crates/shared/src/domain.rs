use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ProductId);
id_newtype!(DepartmentId);

/// A product or department record. Only `id` is interpreted; every other
/// field is carried through untouched for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }
}

/// A trimmed, non-empty free-text search term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Returns `None` when the input is empty after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    AllProducts,
    ProductsByDepartment(DepartmentId),
    ProductSearch(SearchTerm),
    ProductsByCategory(String),
    ProductsByBrand(String),
    Departments,
}

impl Resource {
    pub fn is_search(&self) -> bool {
        matches!(self, Resource::ProductSearch(_))
    }

    pub fn is_product_listing(&self) -> bool {
        !matches!(self, Resource::Departments)
    }

    pub fn search_term(&self) -> Option<&SearchTerm> {
        match self {
            Resource::ProductSearch(term) => Some(term),
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::AllProducts => f.write_str("all products"),
            Resource::ProductsByDepartment(id) => write!(f, "department {id} products"),
            Resource::ProductSearch(term) => write!(f, "search \"{term}\""),
            Resource::ProductsByCategory(category) => write!(f, "category \"{category}\""),
            Resource::ProductsByBrand(brand) => write!(f, "brand \"{brand}\""),
            Resource::Departments => f.write_str("departments"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub resource: Resource,
    pub page_index: u32,
    pub page_size: NonZeroU32,
}

impl PageRequest {
    pub fn new(resource: Resource, page_index: u32, page_size: NonZeroU32) -> Self {
        Self {
            resource,
            page_index,
            page_size,
        }
    }
}

/// One normalized page of a listing.
///
/// `context` holds the record that owns the listing when the view has one
/// (the department header of a department product listing).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageResult {
    pub items: Vec<Item>,
    pub page_index: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub context: Option<Item>,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
