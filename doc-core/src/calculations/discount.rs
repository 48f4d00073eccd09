//! Discount rule engine for document forms.
//!
//! The engine decides which withholding deductions (ISS, IRRF) a document
//! may carry, which amount fields are editable, and derives the net amount.
//! It is a synchronous reducer over [`DiscountState`]:
//!
//! ```text
//! (state, event) --reduce--> state'  --project--> DiscountProjection
//! ```
//!
//! # Field table
//!
//! | mode       | ISS section | IRRF section | ISS input      | IRRF input     |
//! |------------|-------------|--------------|----------------|----------------|
//! | `NONE`     | hidden      | hidden       | disabled, 0,00 | disabled, 0,00 |
//! | `ISS`      | shown       | hidden       | enabled        | disabled, 0,00 |
//! | `IRRF`     | hidden      | shown        | disabled, 0,00 | enabled        |
//! | `ISS_IRRF` | shown       | shown        | enabled        | enabled        |
//!
//! Disabled inputs are zeroed inside the same transition that disables
//! them, so a stale deduction can never reach the net amount.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use doc_core::calculations::{AmountField, DiscountEvent, DiscountState, reduce};
//! use doc_core::DiscountMode;
//!
//! let state = DiscountState::default();
//! let state = reduce(&state, &DiscountEvent::DocumentTypeChanged("NFS".into())).unwrap();
//! let state = reduce(&state, &DiscountEvent::DiscountModeSelected(DiscountMode::IssIrrf)).unwrap();
//! let state = reduce(&state, &DiscountEvent::amount(AmountField::Gross, "1.500,00")).unwrap();
//! let state = reduce(&state, &DiscountEvent::amount(AmountField::Iss, "100,00")).unwrap();
//! let state = reduce(&state, &DiscountEvent::amount(AmountField::Irrf, "50,00")).unwrap();
//!
//! assert_eq!(state.net(), dec!(1350.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::amount::{canonical, is_valid_amount, parse_amount, round_half_up};
use crate::models::{DiscountMode, DocumentType};

/// Errors produced by an engine transition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The selected mode is not offered for the current document type.
    #[error("discount mode {mode} is not allowed for document type {document_type}")]
    IllegalMode {
        mode: DiscountMode,
        document_type: DocumentType,
    },
}

/// The three user-editable monetary inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmountField {
    Gross,
    Iss,
    Irrf,
}

impl AmountField {
    pub fn all() -> &'static [AmountField] {
        &[Self::Gross, Self::Iss, Self::Irrf]
    }

    /// Form field id of the visible input.
    pub fn field_id(&self) -> &'static str {
        match self {
            Self::Gross => "valor_bruto",
            Self::Iss => "valor_iss",
            Self::Irrf => "valor_irrf",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "valor_bruto" | "gross" => Some(Self::Gross),
            "valor_iss" | "iss" => Some(Self::Iss),
            "valor_irrf" | "irrf" => Some(Self::Irrf),
            _ => None,
        }
    }
}

/// Gross amount and the two deductions, each rounded to two places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amounts {
    pub gross: Decimal,
    pub iss: Decimal,
    pub irrf: Decimal,
}

impl Amounts {
    pub fn get(
        &self,
        field: AmountField,
    ) -> Decimal {
        match field {
            AmountField::Gross => self.gross,
            AmountField::Iss => self.iss,
            AmountField::Irrf => self.irrf,
        }
    }

    fn set(
        &mut self,
        field: AmountField,
        value: Decimal,
    ) {
        let mut value = round_half_up(value);
        if !is_valid_amount(value) {
            warn!(field = field.field_id(), %value, "amount out of range; using zero");
            value = Decimal::ZERO;
        }
        match field {
            AmountField::Gross => self.gross = value,
            AmountField::Iss => self.iss = value,
            AmountField::Irrf => self.irrf = value,
        }
    }
}

/// `gross - iss - irrf`. Not floored at zero.
///
/// Amounts built through the engine stay within [`MAX_AMOUNT`], so the
/// subtraction cannot overflow; hand-built out-of-range amounts that do
/// overflow give zero.
///
/// [`MAX_AMOUNT`]: crate::calculations::amount::MAX_AMOUNT
pub fn recompute_net(amounts: &Amounts) -> Decimal {
    match amounts
        .gross
        .checked_sub(amounts.iss)
        .and_then(|v| v.checked_sub(amounts.irrf))
    {
        Some(net) => round_half_up(net),
        None => {
            warn!(?amounts, "net amount overflowed; using zero");
            Decimal::ZERO
        }
    }
}

/// Inputs that drive the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountEvent {
    /// Raw value of the document-type select. Unknown values are ignored.
    DocumentTypeChanged(String),
    DiscountModeSelected(DiscountMode),
    /// Free text committed to an amount field (on blur).
    AmountEntered { field: AmountField, text: String },
}

impl DiscountEvent {
    pub fn amount(
        field: AmountField,
        text: impl Into<String>,
    ) -> Self {
        Self::AmountEntered {
            field,
            text: text.into(),
        }
    }
}

/// Engine state for one form instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountState {
    /// `None` until the user (or a saved document) picks a type.
    pub document_type: Option<DocumentType>,
    pub mode: DiscountMode,
    pub amounts: Amounts,
}

impl DiscountState {
    /// Builds the state for a saved document.
    ///
    /// The mode is inferred from which deductions are non-zero, then
    /// narrowed to what the document type allows.
    pub fn hydrate(
        document_type: Option<DocumentType>,
        amounts: Amounts,
    ) -> Self {
        let mut amounts = amounts;
        for field in AmountField::all() {
            let value = amounts.get(*field);
            amounts.set(*field, value);
        }

        let inferred = DiscountMode::infer(
            amounts.iss > Decimal::ZERO,
            amounts.irrf > Decimal::ZERO,
        );
        let mode = match document_type {
            Some(ty) if !ty.allows(inferred) => {
                debug!(
                    document_type = %ty,
                    inferred = %inferred,
                    "saved deductions not allowed for document type; resetting"
                );
                DiscountMode::None
            }
            _ => inferred,
        };

        let mut state = Self {
            document_type,
            mode,
            amounts,
        };
        state.zero_disabled_fields();
        state
    }

    /// Modes the selector currently offers.
    pub fn legal_modes(&self) -> &'static [DiscountMode] {
        self.document_type
            .map_or(DiscountMode::all(), |ty| ty.legal_discount_modes())
    }

    pub fn is_enabled(
        &self,
        field: AmountField,
    ) -> bool {
        match field {
            AmountField::Gross => true,
            AmountField::Iss => self.mode.includes_iss(),
            AmountField::Irrf => self.mode.includes_irrf(),
        }
    }

    pub fn net(&self) -> Decimal {
        recompute_net(&self.amounts)
    }

    fn zero_disabled_fields(&mut self) {
        for field in [AmountField::Iss, AmountField::Irrf] {
            if !self.is_enabled(field) {
                self.amounts.set(field, Decimal::ZERO);
            }
        }
    }

    fn enter_mode(
        &mut self,
        mode: DiscountMode,
    ) {
        self.mode = mode;
        self.zero_disabled_fields();
    }
}

/// Applies one event and returns the next state.
///
/// The input state is left untouched, so a rejected transition needs no
/// rollback.
pub fn reduce(
    state: &DiscountState,
    event: &DiscountEvent,
) -> Result<DiscountState, TransitionError> {
    let mut next = state.clone();

    match event {
        DiscountEvent::DocumentTypeChanged(raw) => {
            let Some(ty) = DocumentType::parse(raw.trim()) else {
                debug!(value = %raw, "ignoring unknown document type");
                return Ok(next);
            };
            next.document_type = Some(ty);
            let mode = if ty.allows(next.mode) {
                next.mode
            } else {
                DiscountMode::None
            };
            next.enter_mode(mode);
        }
        DiscountEvent::DiscountModeSelected(mode) => {
            if let Some(ty) = next.document_type {
                if !ty.allows(*mode) {
                    return Err(TransitionError::IllegalMode {
                        mode: *mode,
                        document_type: ty,
                    });
                }
            }
            next.enter_mode(*mode);
        }
        DiscountEvent::AmountEntered { field, text } => {
            if !next.is_enabled(*field) {
                debug!(field = field.field_id(), "ignoring edit of disabled field");
                return Ok(next);
            }
            let value = parse_amount(text).unwrap_or_else(|e| {
                warn!(field = field.field_id(), input = %text, "{e}; using zero");
                Decimal::ZERO
            });
            next.amounts.set(*field, value);
        }
    }

    Ok(next)
}

/// Visibility and enablement of one deduction section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionView {
    pub visible: bool,
    pub enabled: bool,
}

/// Canonical values written to the hidden submission fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenFields {
    pub valor_documento: String,
    pub valor_iss: String,
    pub valor_irrf: String,
    pub valor_liquido: String,
}

/// Everything the form needs to render the discount block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountProjection {
    pub selector_visible: bool,
    pub legal_modes: Vec<DiscountMode>,
    pub mode: DiscountMode,
    pub gross_enabled: bool,
    pub iss: SectionView,
    pub irrf: SectionView,
    pub amounts: Amounts,
    pub net: Decimal,
    pub hidden: HiddenFields,
}

/// Pure projection of a state onto the form.
pub fn project(state: &DiscountState) -> DiscountProjection {
    let net = state.net();
    let section = |field| {
        let on = state.is_enabled(field);
        SectionView {
            visible: on,
            enabled: on,
        }
    };

    DiscountProjection {
        selector_visible: state
            .document_type
            .is_none_or(|ty| ty.shows_discount_selector()),
        legal_modes: state.legal_modes().to_vec(),
        mode: state.mode,
        gross_enabled: state.is_enabled(AmountField::Gross),
        iss: section(AmountField::Iss),
        irrf: section(AmountField::Irrf),
        amounts: state.amounts,
        net,
        hidden: HiddenFields {
            valor_documento: canonical(state.amounts.gross),
            valor_iss: canonical(state.amounts.iss),
            valor_irrf: canonical(state.amounts.irrf),
            valor_liquido: canonical(net),
        },
    }
}
