use serde::{Deserialize, Serialize};

/// A funding resource belonging to a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub nome: String,
}
