//! Replication Network Protocol
//!
//! Endpoints and DTOs exchanged between a primary, its secondary and the gateway.
//! Wire shapes are loose (every field optional) so that a missing field is reported
//! as a validation failure instead of a generic decode error; the conversion into
//! typed descriptors happens once, here.

use super::types::{
    Mutation, MutationDescriptor, OP_DECREMENT, OP_UPDATE_PRICE, OP_UPDATE_STOCK,
};
use crate::error::ShopError;
use crate::orders::types::Order;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

// --- API Endpoints ---

/// Secondary endpoint receiving propagated writes.
pub const ENDPOINT_SYNC: &str = "sync";
/// Gateway endpoint receiving invalidation broadcasts.
pub const ENDPOINT_INVALIDATE: &str = "invalidate-cache";

// --- Data Transfer Objects ---

/// Catalog write propagated from the primary: `{op_id?, operation, book_id, data}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_id: Option<String>,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub book_id: Option<u64>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DecrementData {
    quantity: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct PriceData {
    price: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct StockData {
    quantity_change: i64,
}

impl From<&MutationDescriptor> for SyncRequest {
    fn from(descriptor: &MutationDescriptor) -> Self {
        let data = match &descriptor.mutation {
            Mutation::Decrement { quantity } => serde_json::json!({ "quantity": quantity }),
            Mutation::SetPrice { price } => serde_json::json!({ "price": price }),
            Mutation::AdjustStock { quantity_change } => {
                serde_json::json!({ "quantity_change": quantity_change })
            }
        };

        Self {
            op_id: descriptor.op_id.clone(),
            operation: Some(descriptor.mutation.operation().to_string()),
            book_id: Some(descriptor.book_id),
            data: Some(data),
        }
    }
}

impl TryFrom<SyncRequest> for MutationDescriptor {
    type Error = ShopError;

    fn try_from(req: SyncRequest) -> Result<Self, Self::Error> {
        let (Some(operation), Some(book_id), Some(data)) = (req.operation, req.book_id, req.data)
        else {
            return Err(ShopError::Validation("Missing required fields".to_string()));
        };

        let mutation = match operation.as_str() {
            OP_DECREMENT => {
                let d: DecrementData = decode_data(&operation, data)?;
                Mutation::Decrement {
                    quantity: d.quantity,
                }
            }
            OP_UPDATE_PRICE => {
                let d: PriceData = decode_data(&operation, data)?;
                Mutation::SetPrice { price: d.price }
            }
            OP_UPDATE_STOCK => {
                let d: StockData = decode_data(&operation, data)?;
                Mutation::AdjustStock {
                    quantity_change: d.quantity_change,
                }
            }
            _ => return Err(ShopError::UnrecognizedSyncOperation(operation)),
        };

        Ok(MutationDescriptor {
            op_id: req.op_id,
            book_id,
            mutation,
        })
    }
}

fn decode_data<T: DeserializeOwned>(operation: &str, data: serde_json::Value) -> Result<T, ShopError> {
    serde_json::from_value(data).map_err(|e| {
        ShopError::Validation(format!("Invalid data for operation '{}': {}", operation, e))
    })
}

/// Order propagated from the order primary: `{order}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSyncRequest {
    #[serde(default)]
    pub order: Option<Order>,
}

/// Invalidation broadcast: `{book_id, topics[]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvalidateRequest {
    #[serde(default)]
    pub book_id: Option<u64>,
    #[serde(default)]
    pub topics: Vec<String>,
}
