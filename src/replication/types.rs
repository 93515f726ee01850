use serde::{Deserialize, Serialize};

/// Which half of a replicated pair a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Primary,
    Secondary,
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRole::Primary => write!(f, "primary"),
            NodeRole::Secondary => write!(f, "secondary"),
        }
    }
}

/// The effect of one committed catalog write, as replayed on the secondary.
///
/// `Decrement` carries the resulting quantity and `SetPrice` the new price (assignments);
/// `AdjustStock` carries the delta.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Decrement { quantity: u32 },
    SetPrice { price: f64 },
    AdjustStock { quantity_change: i64 },
}

impl Mutation {
    /// Wire name of the operation kind.
    pub fn operation(&self) -> &'static str {
        match self {
            Mutation::Decrement { .. } => OP_DECREMENT,
            Mutation::SetPrice { .. } => OP_UPDATE_PRICE,
            Mutation::AdjustStock { .. } => OP_UPDATE_STOCK,
        }
    }
}

pub const OP_DECREMENT: &str = "decrement";
pub const OP_UPDATE_PRICE: &str = "update_price";
pub const OP_UPDATE_STOCK: &str = "update_stock";

/// A catalog write addressed to one book.
///
/// `op_id` is generated once at the primary and reused by every retry, letting the
/// secondary recognise redelivery.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationDescriptor {
    pub op_id: Option<String>,
    pub book_id: u64,
    pub mutation: Mutation,
}

impl MutationDescriptor {
    pub fn new(book_id: u64, mutation: Mutation) -> Self {
        Self {
            op_id: Some(uuid::Uuid::new_v4().to_string()),
            book_id,
            mutation,
        }
    }
}

/// Result of applying a propagated write on the secondary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied,
    /// Already applied earlier; acknowledged without touching the store.
    Duplicate,
}
