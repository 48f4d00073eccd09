//! Form session: owns the engine state plus the per-field presentation
//! details (focus, status) that sit around it.
//!
//! All reads and writes of the form go through [`FormSession::dispatch`]
//! and [`FormSession::projection`]; every dispatch recomputes the net amount
//! synchronously before returning.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculations::amount::{edit_text, format_amount};
use crate::calculations::discount::{
    AmountField, Amounts, DiscountEvent, DiscountProjection, DiscountState, HiddenFields,
    TransitionError, project, reduce,
};
use crate::models::{DiscountMode, DocumentStatus, DocumentType};

/// How the session was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    Create,
    Edit,
}

/// Values of a saved document, used to open an edit session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InitialValues {
    pub document_type: Option<DocumentType>,
    pub status: Option<DocumentStatus>,
    pub gross: Decimal,
    pub iss: Decimal,
    pub irrf: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    DocumentTypeChanged(String),
    DiscountModeSelected(DiscountMode),
    AmountFocused(AmountField),
    AmountBlurred { field: AmountField, text: String },
    Submit,
}

/// Values handed to the server when the form is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSubmission {
    pub document_type: Option<DocumentType>,
    pub discount_mode: DiscountMode,
    pub status: DocumentStatus,
    pub gross: Decimal,
    pub iss: Decimal,
    pub irrf: Decimal,
    pub net: Decimal,
    pub net_is_negative: bool,
    pub hidden: HiddenFields,
}

/// Rendered state of the whole form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormProjection {
    pub session_mode: SessionMode,
    pub document_type: Option<DocumentType>,
    pub status: DocumentStatus,
    pub document_number_visible: bool,
    pub focused: Option<AmountField>,
    pub discount: DiscountProjection,
    pub gross_text: String,
    pub iss_text: String,
    pub irrf_text: String,
    pub net_text: String,
    pub net_is_negative: bool,
}

impl FormProjection {
    pub fn text(
        &self,
        field: AmountField,
    ) -> &str {
        match field {
            AmountField::Gross => &self.gross_text,
            AmountField::Iss => &self.iss_text,
            AmountField::Irrf => &self.irrf_text,
        }
    }
}

fn on_off(b: bool) -> &'static str {
    if b { "shown" } else { "hidden" }
}

impl fmt::Display for FormProjection {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.document_type {
            Some(ty) => writeln!(f, "Document type:  {ty} ({})", ty.label())?,
            None => writeln!(f, "Document type:  -")?,
        }
        writeln!(f, "Status:         {}", self.status)?;
        writeln!(f, "Discount mode:  {}", self.discount.mode)?;
        writeln!(f, "Mode selector:  {}", on_off(self.discount.selector_visible))?;
        writeln!(f, "ISS section:    {}", on_off(self.discount.iss.visible))?;
        writeln!(f, "IRRF section:   {}", on_off(self.discount.irrf.visible))?;
        writeln!(f, "Doc number:     {}", on_off(self.document_number_visible))?;
        writeln!(f, "Gross:          {}", self.gross_text)?;
        writeln!(f, "ISS:            {}", self.iss_text)?;
        writeln!(f, "IRRF:           {}", self.irrf_text)?;
        writeln!(f, "Net:            {}", self.net_text)?;
        let h = &self.discount.hidden;
        writeln!(
            f,
            "Hidden:         {}/{}/{}/{}",
            h.valor_documento, h.valor_iss, h.valor_irrf, h.valor_liquido
        )
    }
}

#[derive(Debug, Clone)]
pub struct FormSession {
    mode: SessionMode,
    state: DiscountState,
    status: DocumentStatus,
    focused: Option<AmountField>,
}

impl FormSession {
    /// New document: all amounts zero, status pending.
    pub fn create() -> Self {
        info!("opening document form in create mode");
        Self {
            mode: SessionMode::Create,
            state: DiscountState::default(),
            status: DocumentStatus::Pending,
            focused: None,
        }
    }

    /// Existing document: amounts are hydrated and the discount mode is
    /// inferred from them.
    pub fn edit(initial: InitialValues) -> Self {
        let state = DiscountState::hydrate(
            initial.document_type,
            Amounts {
                gross: initial.gross,
                iss: initial.iss,
                irrf: initial.irrf,
            },
        );
        info!(mode = %state.mode, net = %state.net(), "opening document form in edit mode");
        Self {
            mode: SessionMode::Edit,
            state,
            status: initial.status.unwrap_or_default(),
            focused: None,
        }
    }

    pub fn state(&self) -> &DiscountState {
        &self.state
    }

    pub fn session_mode(&self) -> SessionMode {
        self.mode
    }

    /// Applies one form event. Returns the submission payload on
    /// [`FormEvent::Submit`].
    ///
    /// A rejected transition leaves the session unchanged.
    pub fn dispatch(
        &mut self,
        event: FormEvent,
    ) -> Result<Option<DocumentSubmission>, TransitionError> {
        let engine_event = match event {
            FormEvent::DocumentTypeChanged(raw) => DiscountEvent::DocumentTypeChanged(raw),
            FormEvent::DiscountModeSelected(mode) => DiscountEvent::DiscountModeSelected(mode),
            FormEvent::AmountFocused(field) => {
                self.focused = Some(field);
                return Ok(None);
            }
            FormEvent::AmountBlurred { field, text } => {
                if self.focused == Some(field) {
                    self.focused = None;
                }
                DiscountEvent::AmountEntered { field, text }
            }
            FormEvent::Submit => return Ok(Some(self.submission())),
        };

        match reduce(&self.state, &engine_event) {
            Ok(next) => {
                self.state = next;
                debug!(net = %self.state.net(), mode = %self.state.mode, "form recomputed");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "rejected form event");
                Err(e)
            }
        }
    }

    pub fn submission(&self) -> DocumentSubmission {
        let view = project(&self.state);
        let net_is_negative = view.net < Decimal::ZERO;
        if net_is_negative {
            warn!(net = %view.net, "submitting document with negative net amount");
        }
        DocumentSubmission {
            document_type: self.state.document_type,
            discount_mode: self.state.mode,
            status: self.status,
            gross: view.amounts.gross,
            iss: view.amounts.iss,
            irrf: view.amounts.irrf,
            net: view.net,
            net_is_negative,
            hidden: view.hidden,
        }
    }

    pub fn projection(&self) -> FormProjection {
        let discount = project(&self.state);
        let text = |field: AmountField| {
            let value = discount.amounts.get(field);
            if self.focused == Some(field) && self.state.is_enabled(field) {
                edit_text(value)
            } else {
                format_amount(value)
            }
        };

        FormProjection {
            session_mode: self.mode,
            document_type: self.state.document_type,
            status: self.status,
            document_number_visible: !self
                .state
                .document_type
                .is_some_and(|ty| ty.mirrors_internal_number()),
            focused: self.focused,
            gross_text: text(AmountField::Gross),
            iss_text: text(AmountField::Iss),
            irrf_text: text(AmountField::Irrf),
            net_text: format_amount(discount.net),
            net_is_negative: discount.net < Decimal::ZERO,
            discount,
        }
    }
}
