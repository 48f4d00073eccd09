use serde::{Deserialize, Serialize};

/// Which withholding deductions apply to a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscountMode {
    #[default]
    None,
    Iss,
    Irrf,
    IssIrrf,
}

impl DiscountMode {
    pub fn all() -> &'static [DiscountMode] {
        &[Self::None, Self::Iss, Self::Irrf, Self::IssIrrf]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Iss => "ISS",
            Self::Irrf => "IRRF",
            Self::IssIrrf => "ISS_IRRF",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NONE" => Some(Self::None),
            "ISS" => Some(Self::Iss),
            "IRRF" => Some(Self::Irrf),
            "ISS_IRRF" => Some(Self::IssIrrf),
            _ => None,
        }
    }

    pub fn includes_iss(&self) -> bool {
        matches!(self, Self::Iss | Self::IssIrrf)
    }

    pub fn includes_irrf(&self) -> bool {
        matches!(self, Self::Irrf | Self::IssIrrf)
    }

    /// Infers the mode from amounts already present on a saved document.
    pub fn infer(
        iss_present: bool,
        irrf_present: bool,
    ) -> Self {
        match (iss_present, irrf_present) {
            (true, true) => Self::IssIrrf,
            (true, false) => Self::Iss,
            (false, true) => Self::Irrf,
            (false, false) => Self::None,
        }
    }
}

impl std::fmt::Display for DiscountMode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
