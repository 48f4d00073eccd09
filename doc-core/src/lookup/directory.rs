use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Resource, Supplier};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Record not found")]
    NotFound,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Read-only view of the server's supplier and resource tables.
#[async_trait]
pub trait DocumentDirectory: Send + Sync {
    /// Finds a supplier by digits-only CPF/CNPJ.
    async fn find_supplier(&self, cnpj_cpf: &str) -> Result<Supplier, LookupError>;

    /// Lists the funding resources of a department.
    async fn resources_for_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<Resource>, LookupError>;
}
