use serde::{Deserialize, Serialize};

/// A supplier record as returned by the directory lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub nome: String,
    /// Digits-only CPF or CNPJ. Older server versions omit it.
    #[serde(default)]
    pub cnpj_cpf: Option<String>,
}
