//! Supplier lookup driven by the CPF/CNPJ field.
//!
//! Typing masks the field; leaving it decides between a lookup, clearing an
//! incomplete id, or resetting the supplier display. Responses are applied
//! only while their ticket is current, so a slow answer for an earlier id
//! cannot overwrite the supplier chosen by a later one.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::directory::{DocumentDirectory, LookupError};
use super::sequencer::{LookupSequencer, LookupTicket};
use crate::models::Supplier;
use crate::tax_id::{self, CPF_LEN};

pub const SUPPLIER_PLACEHOLDER: &str = "Será preenchido pelo CPF/CNPJ";
pub const SUPPLIER_NOT_FOUND: &str = "Fornecedor não encontrado";
pub const SUPPLIER_LOOKUP_FAILED: &str = "Erro ao buscar fornecedor";

/// Supplier as shown on the form: the hidden id and the visible name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierField {
    pub id: Option<i64>,
    pub display: String,
}

impl Default for SupplierField {
    fn default() -> Self {
        Self {
            id: None,
            display: SUPPLIER_PLACEHOLDER.to_string(),
        }
    }
}

/// What leaving the CPF/CNPJ field asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlurAction {
    /// Query the directory for `digits`; apply the answer with `ticket`.
    Lookup { ticket: LookupTicket, digits: String },
    /// The id was incomplete and the field has been cleared.
    Cleared,
    /// The field is empty; the supplier display went back to its placeholder.
    Reset,
}

#[derive(Debug, Clone, Default)]
pub struct SupplierLookup {
    input: String,
    field: SupplierField,
    sequencer: LookupSequencer,
}

impl SupplierLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn field(&self) -> &SupplierField {
        &self.field
    }

    /// Replaces the field text, applying the CPF/CNPJ mask.
    pub fn on_input(
        &mut self,
        raw: &str,
    ) -> &str {
        self.input = tax_id::mask(raw);
        self.sequencer.invalidate();
        &self.input
    }

    pub fn on_blur(&mut self) -> BlurAction {
        let digits = tax_id::digits(&self.input);
        if digits.len() >= CPF_LEN {
            let ticket = self.sequencer.issue();
            debug!(ticket = ticket.value(), %digits, "supplier lookup issued");
            BlurAction::Lookup { ticket, digits }
        } else if !digits.is_empty() {
            self.sequencer.invalidate();
            self.input.clear();
            BlurAction::Cleared
        } else {
            self.sequencer.invalidate();
            self.field = SupplierField::default();
            BlurAction::Reset
        }
    }

    /// Applies a lookup response. Returns `false` when the ticket is stale
    /// and the response was dropped.
    pub fn resolve(
        &mut self,
        ticket: LookupTicket,
        result: Result<Supplier, LookupError>,
    ) -> bool {
        if !self.sequencer.is_current(ticket) {
            debug!(ticket = ticket.value(), "discarding stale supplier response");
            return false;
        }

        match result {
            Ok(supplier) => {
                info!(id = supplier.id, nome = %supplier.nome, "supplier found");
                self.field = SupplierField {
                    id: Some(supplier.id),
                    display: supplier.nome,
                };
            }
            Err(LookupError::NotFound) => {
                info!("supplier not found");
                self.field = SupplierField {
                    id: None,
                    display: SUPPLIER_NOT_FOUND.to_string(),
                };
            }
            Err(e) => {
                error!(error = %e, "supplier lookup failed");
                self.field.display = SUPPLIER_LOOKUP_FAILED.to_string();
            }
        }
        true
    }

    /// Blur handler followed by an immediate lookup.
    pub async fn blur_and_lookup(
        &mut self,
        directory: &dyn DocumentDirectory,
    ) -> BlurAction {
        let action = self.on_blur();
        if let BlurAction::Lookup { ticket, digits } = &action {
            let result = directory.find_supplier(digits).await;
            self.resolve(*ticket, result);
        }
        action
    }
}
