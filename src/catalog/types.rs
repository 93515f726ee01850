use serde::{Deserialize, Serialize};

/// One book as held by a catalog replica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    pub title: String,
    pub topic: String,
    pub price: f64,
    pub quantity: u32,
}

/// Entry of a `/search/{topic}` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: u64,
    pub title: String,
}

/// Body of an `/info/{id}` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInfo {
    pub title: String,
    pub quantity: u32,
    pub price: f64,
}

impl From<&CatalogItem> for BookSummary {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
        }
    }
}

impl From<&CatalogItem> for BookInfo {
    fn from(item: &CatalogItem) -> Self {
        Self {
            title: item.title.clone(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// A committed write: the `{old, new}` change and the topic whose cached search
/// results it made stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed<T> {
    pub change: crate::protocol::Change<T>,
    pub topic: String,
}
