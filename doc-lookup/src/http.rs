use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use doc_core::lookup::{DirectoryFactory, DocumentDirectory, LookupConfig, LookupError};
use doc_core::{Resource, Supplier};

const SUPPLIER_PATH: &str = "/documentos/api/buscar-fornecedor/";
const RESOURCES_PATH: &str = "/documentos/api/recursos-por-secretaria";

/// The supplier endpoint answers 200 either way; a miss carries `error`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SupplierResponse {
    Found(Supplier),
    Missing { error: String },
}

#[derive(Debug, Deserialize)]
struct ResourcesResponse {
    #[serde(default)]
    recursos: Vec<Resource>,
}

/// [`DocumentDirectory`] backed by the application's JSON endpoints.
pub struct HttpDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDirectory {
    pub fn new(
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(LookupError::Configuration(format!(
                "base URL must start with http:// or https://, got '{base_url}'"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Configuration(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_body(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<String, LookupError> {
        let resp = request
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(%status, "lookup endpoint returned an error status");
            return Err(LookupError::Network(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl DocumentDirectory for HttpDirectory {
    async fn find_supplier(&self, cnpj_cpf: &str) -> Result<Supplier, LookupError> {
        let url = format!("{}{SUPPLIER_PATH}", self.base_url);
        debug!(%url, cnpj_cpf, "fetching supplier");

        let body = self
            .get_body(self.client.get(&url).query(&[("cnpj_cpf", cnpj_cpf)]))
            .await?;

        match serde_json::from_str::<SupplierResponse>(&body)
            .map_err(|e| LookupError::Decode(e.to_string()))?
        {
            SupplierResponse::Found(supplier) => Ok(supplier),
            SupplierResponse::Missing { error } => {
                debug!(%error, "server reported supplier missing");
                Err(LookupError::NotFound)
            }
        }
    }

    async fn resources_for_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<Resource>, LookupError> {
        let url = format!("{}{RESOURCES_PATH}/{department_id}/", self.base_url);
        debug!(%url, "fetching resources");

        let body = self.get_body(self.client.get(&url)).await?;
        let parsed: ResourcesResponse =
            serde_json::from_str(&body).map_err(|e| LookupError::Decode(e.to_string()))?;
        Ok(parsed.recursos)
    }
}

/// [`DirectoryFactory`] for the `"http"` backend. `connection` is the base
/// URL of the application, e.g. `http://localhost:8000`.
pub struct HttpDirectoryFactory;

#[async_trait]
impl DirectoryFactory for HttpDirectoryFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    async fn create(
        &self,
        config: &LookupConfig,
    ) -> Result<Box<dyn DocumentDirectory>, LookupError> {
        let directory =
            HttpDirectory::new(&config.connection, Duration::from_secs(config.timeout_secs))?;
        Ok(Box::new(directory))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn backend_name_is_http() {
        assert_eq!(HttpDirectoryFactory.backend_name(), "http");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let dir = HttpDirectory::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(dir.base_url(), "http://localhost:8000");
    }

    #[test]
    fn non_http_url_is_rejected() {
        let err = HttpDirectory::new("localhost:8000", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, LookupError::Configuration(_)));
    }

    #[test]
    fn supplier_response_distinguishes_found_and_missing() {
        let found: SupplierResponse =
            serde_json::from_str(r#"{"id": 3, "nome": "ACME", "cnpj_cpf": "11222333000181"}"#)
                .unwrap();
        assert!(matches!(found, SupplierResponse::Found(Supplier { id: 3, .. })));

        let missing: SupplierResponse =
            serde_json::from_str(r#"{"error": "Fornecedor não encontrado"}"#).unwrap();
        assert!(matches!(missing, SupplierResponse::Missing { .. }));
    }

    #[test]
    fn resources_response_defaults_to_empty() {
        let parsed: ResourcesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.recursos.is_empty());
    }
}
