use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PEN",
            Self::Paid => "PAG",
            Self::Overdue => "ATR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PEN" => Some(Self::Pending),
            "PAG" => Some(Self::Paid),
            "ATR" => Some(Self::Overdue),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
