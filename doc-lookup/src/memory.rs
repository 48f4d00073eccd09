//! In-memory directory seeded from CSV files.
//!
//! ## Files
//!
//! | File               | Columns                    |
//! |--------------------|----------------------------|
//! | `fornecedores.csv` | `id,nome,cnpj_cpf`         |
//! | `recursos.csv`     | `secretaria_id,id,nome`    |
//!
//! Either file may be missing, in which case that table is empty. CPF/CNPJ
//! values may be punctuated; they are stored digits-only, and rows with an
//! invalid CPF/CNPJ are skipped.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use doc_core::lookup::{DirectoryFactory, DocumentDirectory, LookupConfig, LookupError};
use doc_core::tax_id::{self, TaxId};
use doc_core::{Resource, Supplier};

pub const SUPPLIERS_FILE: &str = "fornecedores.csv";
pub const RESOURCES_FILE: &str = "recursos.csv";

#[derive(Debug, Deserialize)]
struct SupplierRow {
    id: i64,
    nome: String,
    cnpj_cpf: String,
}

#[derive(Debug, Deserialize)]
struct ResourceRow {
    secretaria_id: i64,
    id: i64,
    nome: String,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    suppliers: HashMap<String, Supplier>,
    resources: HashMap<i64, Vec<Resource>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_supplier(
        mut self,
        supplier: Supplier,
    ) -> Self {
        let key = supplier
            .cnpj_cpf
            .as_deref()
            .map(tax_id::digits)
            .unwrap_or_default();
        self.suppliers.insert(key, supplier);
        self
    }

    pub fn with_resource(
        mut self,
        department_id: i64,
        resource: Resource,
    ) -> Self {
        self.resources.entry(department_id).or_default().push(resource);
        self
    }

    pub fn supplier_count(&self) -> usize {
        self.suppliers.len()
    }

    /// Reads suppliers from CSV. Rows whose CPF/CNPJ fails validation are
    /// skipped.
    pub fn load_suppliers<R: Read>(
        mut self,
        reader: R,
    ) -> Result<Self, LookupError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        for row in csv_reader.deserialize() {
            let row: SupplierRow = row.map_err(csv_error)?;
            let parsed = match TaxId::parse(&row.cnpj_cpf) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(id = row.id, cnpj_cpf = %row.cnpj_cpf, error = %e, "skipping supplier");
                    continue;
                }
            };
            self = self.with_supplier(Supplier {
                id: row.id,
                nome: row.nome,
                cnpj_cpf: Some(parsed.digits().to_string()),
            });
        }
        Ok(self)
    }

    /// Reads department resources from CSV.
    pub fn load_resources<R: Read>(
        mut self,
        reader: R,
    ) -> Result<Self, LookupError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        for row in csv_reader.deserialize() {
            let row: ResourceRow = row.map_err(csv_error)?;
            self = self.with_resource(
                row.secretaria_id,
                Resource {
                    id: row.id,
                    nome: row.nome,
                },
            );
        }
        Ok(self)
    }

    /// Loads whichever of the two CSV files exist under `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, LookupError> {
        let mut directory = Self::new();

        let suppliers = dir.join(SUPPLIERS_FILE);
        if suppliers.is_file() {
            directory = directory.load_suppliers(open(&suppliers)?)?;
        }
        let resources = dir.join(RESOURCES_FILE);
        if resources.is_file() {
            directory = directory.load_resources(open(&resources)?)?;
        }

        info!(
            dir = %dir.display(),
            suppliers = directory.suppliers.len(),
            departments = directory.resources.len(),
            "memory directory loaded"
        );
        Ok(directory)
    }
}

fn open(path: &Path) -> Result<std::fs::File, LookupError> {
    std::fs::File::open(path).map_err(|e| {
        LookupError::Configuration(format!("cannot open '{}': {e}", path.display()))
    })
}

fn csv_error(err: csv::Error) -> LookupError {
    LookupError::Configuration(format!("CSV parse error: {err}"))
}

#[async_trait]
impl DocumentDirectory for MemoryDirectory {
    async fn find_supplier(&self, cnpj_cpf: &str) -> Result<Supplier, LookupError> {
        let key = tax_id::digits(cnpj_cpf);
        debug!(%key, "memory supplier lookup");
        self.suppliers.get(&key).cloned().ok_or(LookupError::NotFound)
    }

    async fn resources_for_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<Resource>, LookupError> {
        Ok(self.resources.get(&department_id).cloned().unwrap_or_default())
    }
}

/// [`DirectoryFactory`] for the `"memory"` backend. `connection` is a data
/// directory; an empty string gives an empty directory.
pub struct MemoryDirectoryFactory;

#[async_trait]
impl DirectoryFactory for MemoryDirectoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        config: &LookupConfig,
    ) -> Result<Box<dyn DocumentDirectory>, LookupError> {
        let connection = config.connection.trim();
        if connection.is_empty() {
            return Ok(Box::new(MemoryDirectory::new()));
        }

        let dir = Path::new(connection);
        if !dir.is_dir() {
            return Err(LookupError::Configuration(format!(
                "memory backend expects a directory, got '{connection}'"
            )));
        }
        Ok(Box::new(MemoryDirectory::from_dir(dir)?))
    }
}
