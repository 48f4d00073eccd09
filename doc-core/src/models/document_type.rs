use serde::{Deserialize, Serialize};

use super::DiscountMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Nota Fiscal
    Invoice,
    /// Nota Fiscal de Serviço
    ServiceInvoice,
    /// Nota Fiscal de Serviço Avulsa
    StandaloneServiceInvoice,
    /// Fatura
    Bill,
    /// Recibo
    Receipt,
}

impl DocumentType {
    pub fn all() -> &'static [DocumentType] {
        &[
            Self::Invoice,
            Self::ServiceInvoice,
            Self::StandaloneServiceInvoice,
            Self::Bill,
            Self::Receipt,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "NF",
            Self::ServiceInvoice => "NFS",
            Self::StandaloneServiceInvoice => "NFSA",
            Self::Bill => "FAT",
            Self::Receipt => "REC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NF" => Some(Self::Invoice),
            "NFS" => Some(Self::ServiceInvoice),
            "NFSA" => Some(Self::StandaloneServiceInvoice),
            "FAT" => Some(Self::Bill),
            "REC" => Some(Self::Receipt),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Invoice => "Nota Fiscal",
            Self::ServiceInvoice => "Nota Fiscal de Serviço",
            Self::StandaloneServiceInvoice => "Nota Fiscal de Serviço Avulsa",
            Self::Bill => "Fatura",
            Self::Receipt => "Recibo",
        }
    }

    /// Discount modes the user may pick for this document type.
    pub fn legal_discount_modes(&self) -> &'static [DiscountMode] {
        match self {
            Self::Invoice | Self::Bill => &[DiscountMode::None],
            Self::ServiceInvoice | Self::StandaloneServiceInvoice | Self::Receipt => {
                DiscountMode::all()
            }
        }
    }

    pub fn allows(
        &self,
        mode: DiscountMode,
    ) -> bool {
        self.legal_discount_modes().contains(&mode)
    }

    /// Whether the discount-mode selector is offered at all.
    pub fn shows_discount_selector(&self) -> bool {
        self.legal_discount_modes().len() > 1
    }

    /// Receipts have no separate document number; it mirrors the internal one.
    pub fn mirrors_internal_number(&self) -> bool {
        matches!(self, Self::Receipt)
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
