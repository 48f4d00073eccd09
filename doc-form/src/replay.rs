use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use doc_core::DocumentDirectory;
use doc_core::form::{DocumentSubmission, FormProjection, FormSession};
use doc_core::lookup::{ResourceOptions, SupplierField, SupplierLookup, load_resource_options};

use crate::script::ScriptStep;

/// Final state of the form after a script has been replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayOutcome {
    pub projection: FormProjection,
    pub supplier: SupplierField,
    pub resources: ResourceOptions,
    /// Payload of the last `submit` step, if the script had one.
    pub submission: Option<DocumentSubmission>,
    /// Steps the session refused (illegal discount modes).
    pub rejected: usize,
}

impl fmt::Display for ReplayOutcome {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.projection)?;
        match self.supplier.id {
            Some(id) => writeln!(f, "Supplier:       {} (#{id})", self.supplier.display)?,
            None => writeln!(f, "Supplier:       {}", self.supplier.display)?,
        }

        let labels: Vec<&str> = self
            .resources
            .options
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        writeln!(f, "Resources:      {}", labels.join(" | "))?;
        if let Some(selected) = &self.resources.selected {
            writeln!(f, "Resource:       {selected}")?;
        }
        if self.rejected > 0 {
            writeln!(f, "Rejected steps: {}", self.rejected)?;
        }

        match &self.submission {
            Some(s) => {
                write!(f, "Submitted:      net {}", s.net)?;
                if s.net_is_negative {
                    write!(f, " (negative)")?;
                }
                writeln!(f)
            }
            None => writeln!(f, "Submitted:      no"),
        }
    }
}

/// Applies `steps` in order. Rejected transitions are counted and skipped;
/// lookup failures end up in the supplier and resource fields.
pub async fn replay(
    mut session: FormSession,
    steps: &[ScriptStep],
    directory: &dyn DocumentDirectory,
) -> ReplayOutcome {
    let mut supplier = SupplierLookup::new();
    let mut resources = ResourceOptions::empty();
    let mut submission = None;
    let mut rejected = 0;

    for (idx, step) in steps.iter().enumerate() {
        debug!(step = idx + 1, ?step, "replaying");
        match step {
            ScriptStep::Form(event) => match session.dispatch(event.clone()) {
                Ok(Some(payload)) => submission = Some(payload),
                Ok(None) => {}
                Err(e) => {
                    warn!(step = idx + 1, error = %e, "step rejected");
                    rejected += 1;
                }
            },
            ScriptStep::Supplier(text) => {
                supplier.on_input(text);
                supplier.blur_and_lookup(directory).await;
            }
            ScriptStep::Department(id) => {
                resources = load_resource_options(directory, *id, None).await;
            }
        }
    }

    info!(steps = steps.len(), rejected, "script replayed");
    ReplayOutcome {
        projection: session.projection(),
        supplier: supplier.field().clone(),
        resources,
        submission,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use doc_core::calculations::AmountField;
    use doc_core::lookup::supplier::{SUPPLIER_NOT_FOUND, SUPPLIER_PLACEHOLDER};
    use doc_core::{DiscountMode, FormEvent, Resource, Supplier};
    use doc_lookup::MemoryDirectory;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn directory() -> MemoryDirectory {
        MemoryDirectory::new()
            .with_supplier(Supplier {
                id: 7,
                nome: "Papelaria Central".into(),
                cnpj_cpf: Some("11222333000181".into()),
            })
            .with_resource(
                1,
                Resource {
                    id: 10,
                    nome: "FUNDEB".into(),
                },
            )
    }

    fn blur(
        field: AmountField,
        text: &str,
    ) -> ScriptStep {
        ScriptStep::Form(FormEvent::AmountBlurred {
            field,
            text: text.into(),
        })
    }

    #[tokio::test]
    async fn applies_form_steps_and_submits() {
        let steps = vec![
            ScriptStep::Form(FormEvent::DocumentTypeChanged("NFS".into())),
            ScriptStep::Form(FormEvent::DiscountModeSelected(DiscountMode::IssIrrf)),
            blur(AmountField::Gross, "1.500,00"),
            blur(AmountField::Iss, "100,00"),
            blur(AmountField::Irrf, "50,00"),
            ScriptStep::Form(FormEvent::Submit),
        ];

        let outcome = replay(FormSession::create(), &steps, &directory()).await;

        assert_eq!(outcome.projection.net_text, "1.350,00");
        assert_eq!(outcome.rejected, 0);
        let submission = outcome.submission.unwrap();
        assert_eq!(submission.net, dec!(1350.00));
        assert_eq!(submission.hidden.valor_liquido, "1350.00");
    }

    #[tokio::test]
    async fn illegal_mode_is_counted_not_fatal() {
        let steps = vec![
            ScriptStep::Form(FormEvent::DocumentTypeChanged("FAT".into())),
            ScriptStep::Form(FormEvent::DiscountModeSelected(DiscountMode::Iss)),
            blur(AmountField::Gross, "200,00"),
        ];

        let outcome = replay(FormSession::create(), &steps, &directory()).await;

        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.projection.discount.mode, DiscountMode::None);
        assert_eq!(outcome.projection.net_text, "200,00");
        assert!(outcome.submission.is_none());
    }

    #[tokio::test]
    async fn supplier_and_resources_are_resolved() {
        let steps = vec![
            ScriptStep::Supplier("11222333000181".into()),
            ScriptStep::Department(Some(1)),
        ];

        let outcome = replay(FormSession::create(), &steps, &directory()).await;

        assert_eq!(outcome.supplier.id, Some(7));
        assert_eq!(outcome.supplier.display, "Papelaria Central");
        // A lone resource is preselected.
        assert_eq!(outcome.resources.selected.as_deref(), Some("10"));
    }

    #[tokio::test]
    async fn later_supplier_input_wins() {
        let steps = vec![
            ScriptStep::Supplier("11222333000181".into()),
            ScriptStep::Supplier("52998224725".into()),
        ];

        let outcome = replay(FormSession::create(), &steps, &directory()).await;

        assert_eq!(outcome.supplier.id, None);
        assert_eq!(outcome.supplier.display, SUPPLIER_NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_script_leaves_defaults() {
        let outcome = replay(FormSession::create(), &[], &directory()).await;

        assert_eq!(outcome.supplier.display, SUPPLIER_PLACEHOLDER);
        assert_eq!(outcome.resources, ResourceOptions::empty());
        assert_eq!(outcome.projection.net_text, "0,00");
        assert!(outcome.to_string().contains("Submitted:      no"));
    }
}
