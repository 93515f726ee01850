use super::types::{BookInfo, BookSummary, CatalogItem, Committed};
use crate::error::{ShopError, ShopResult};
use crate::protocol::Change;
use crate::replication::types::Mutation;

use dashmap::DashMap;
use std::path::Path;

/// In-memory catalog of one replica.
///
/// Each write runs while holding the item's map entry, so concurrent writes to the
/// same book are serialized and never observe a half-applied change.
pub struct CatalogStore {
    books: DashMap<u64, CatalogItem>,
}

impl CatalogStore {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let books = DashMap::new();
        for item in items {
            books.insert(item.id, item);
        }
        Self { books }
    }

    /// Store seeded with the stock book list.
    pub fn with_default_books() -> Self {
        Self::new(default_books())
    }

    /// Loads a seed file holding a JSON array of `CatalogItem`s.
    pub fn from_json_file(path: &Path) -> ShopResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ShopError::InvalidConfig(format!("cannot read catalog {}: {}", path.display(), e))
        })?;
        let items: Vec<CatalogItem> = serde_json::from_str(&raw).map_err(|e| {
            ShopError::InvalidConfig(format!("invalid catalog {}: {}", path.display(), e))
        })?;

        tracing::info!("Loaded {} books from {}", items.len(), path.display());
        Ok(Self::new(items))
    }

    /// Books whose topic matches `topic`, case-insensitively, ordered by id.
    pub fn search(&self, topic: &str) -> ShopResult<Vec<BookSummary>> {
        let wanted = topic.to_lowercase();
        let mut results: Vec<BookSummary> = self
            .books
            .iter()
            .filter(|entry| entry.value().topic.to_lowercase() == wanted)
            .map(|entry| BookSummary::from(entry.value()))
            .collect();

        if results.is_empty() {
            return Err(ShopError::NotFound(format!(
                "No books found for topic '{}'",
                topic
            )));
        }

        results.sort_by_key(|book| book.id);
        Ok(results)
    }

    pub fn get(&self, book_id: u64) -> ShopResult<BookInfo> {
        self.books
            .get(&book_id)
            .map(|entry| BookInfo::from(entry.value()))
            .ok_or_else(book_not_found)
    }

    #[cfg(test)]
    pub(crate) fn item(&self, book_id: u64) -> Option<CatalogItem> {
        self.books.get(&book_id).map(|entry| entry.value().clone())
    }

    /// Takes one unit out of stock.
    pub fn decrement(&self, book_id: u64) -> ShopResult<Committed<u32>> {
        let mut entry = self.books.get_mut(&book_id).ok_or_else(book_not_found)?;
        let book = entry.value_mut();

        if book.quantity == 0 {
            return Err(ShopError::BusinessRule("Out of stock".to_string()));
        }

        let old = book.quantity;
        book.quantity -= 1;

        Ok(Committed {
            change: Change {
                old,
                new: book.quantity,
            },
            topic: book.topic.clone(),
        })
    }

    pub fn set_price(&self, book_id: u64, price: f64) -> ShopResult<Committed<f64>> {
        if !price.is_finite() || price <= 0.0 {
            return Err(ShopError::Validation(
                "Price must be greater than 0".to_string(),
            ));
        }

        let mut entry = self.books.get_mut(&book_id).ok_or_else(book_not_found)?;
        let book = entry.value_mut();
        let old = book.price;
        book.price = price;

        Ok(Committed {
            change: Change { old, new: price },
            topic: book.topic.clone(),
        })
    }

    /// Adds `quantity_change` (possibly negative) to the stock.
    pub fn adjust_stock(&self, book_id: u64, quantity_change: i64) -> ShopResult<Committed<u32>> {
        let mut entry = self.books.get_mut(&book_id).ok_or_else(book_not_found)?;
        let book = entry.value_mut();

        let target = i64::from(book.quantity) + quantity_change;
        if target < 0 {
            return Err(ShopError::BusinessRule(format!(
                "Cannot reduce stock below 0. Current: {}, Requested change: {}",
                book.quantity, quantity_change
            )));
        }
        let new = u32::try_from(target).map_err(|_| {
            ShopError::Validation(format!("Stock cannot exceed {}", u32::MAX))
        })?;

        let old = book.quantity;
        book.quantity = new;

        Ok(Committed {
            change: Change { old, new },
            topic: book.topic.clone(),
        })
    }

    /// Replays a write computed by the primary. No business rule is re-checked.
    pub fn apply_replicated(&self, book_id: u64, mutation: &Mutation) -> ShopResult<()> {
        let mut entry = self.books.get_mut(&book_id).ok_or_else(book_not_found)?;
        let book = entry.value_mut();

        match mutation {
            Mutation::Decrement { quantity } => book.quantity = *quantity,
            Mutation::SetPrice { price } => book.price = *price,
            Mutation::AdjustStock { quantity_change } => {
                let target = i64::from(book.quantity) + quantity_change;
                let clamped = target.clamp(0, i64::from(u32::MAX));
                if clamped != target {
                    tracing::warn!(
                        "Replicated stock change {} for book {} clamped to {} (replica diverged)",
                        quantity_change,
                        book_id,
                        clamped
                    );
                }
                book.quantity = clamped as u32;
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

fn book_not_found() -> ShopError {
    ShopError::NotFound("Book not found".to_string())
}

fn book(id: u64, title: &str, topic: &str, price: f64, quantity: u32) -> CatalogItem {
    CatalogItem {
        id,
        title: title.to_string(),
        topic: topic.to_string(),
        price,
        quantity,
    }
}

/// The stock list every replica boots with unless a seed file is given.
pub fn default_books() -> Vec<CatalogItem> {
    vec![
        book(1, "How to get a good grade in DOS in 40 minutes a day", "distributed systems", 25.0, 10),
        book(2, "RPCs for Noobs", "distributed systems", 30.0, 8),
        book(3, "Xen and the Art of Surviving Undergraduate School", "undergraduate school", 20.0, 12),
        book(4, "Cooking for the Impatient Undergrad", "undergraduate school", 15.0, 15),
        book(5, "How to finish Project 3 on time", "project management", 35.0, 5),
        book(6, "Why theory classes are so hard", "education", 40.0, 7),
        book(7, "Spring in the Pioneer Valley", "nature", 22.5, 9),
    ]
}
