use std::path::PathBuf;

use doc_core::form::{FormSession, InitialValues};
use doc_core::{DiscountMode, DocumentStatus, DocumentType};
use doc_form::{FormConfig, build_registry, load_script, replay};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn memory_config() -> FormConfig {
    let toml = format!(
        "[api]\nbackend = \"memory\"\nconnection = '{}'\n",
        fixture("data").display()
    );
    FormConfig::from_toml_str(&toml).expect("valid config")
}

#[tokio::test]
async fn sample_script_against_memory_backend() {
    let config = memory_config();
    let directory = build_registry()
        .create(&config.api)
        .await
        .expect("memory backend");
    let steps = load_script(&fixture("sample_script.csv")).expect("script parses");

    let outcome = replay(FormSession::create(), &steps, &*directory).await;

    assert_eq!(outcome.rejected, 0);
    assert_eq!(outcome.projection.gross_text, "1.500,00");
    assert_eq!(outcome.projection.net_text, "1.350,00");

    assert_eq!(outcome.supplier.id, Some(7));
    assert_eq!(outcome.supplier.display, "Papelaria Central");

    let labels: Vec<_> = outcome
        .resources
        .options
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(labels, vec!["---------", "FUNDEB", "PNAE"]);
    assert_eq!(outcome.resources.selected, None);

    let submission = outcome.submission.expect("script submits");
    assert_eq!(submission.discount_mode, DiscountMode::IssIrrf);
    assert_eq!(submission.net, dec!(1350.00));
    assert_eq!(submission.hidden.valor_documento, "1500.00");
    assert_eq!(submission.hidden.valor_iss, "100.00");
    assert_eq!(submission.hidden.valor_irrf, "50.00");
    assert_eq!(submission.hidden.valor_liquido, "1350.00");
}

#[tokio::test]
async fn edit_session_switches_deduction() {
    let config = memory_config();
    let directory = build_registry().create(&config.api).await.unwrap();
    let steps = load_script(&fixture("edit_receipt.csv")).unwrap();

    let session = FormSession::edit(InitialValues {
        document_type: Some(DocumentType::Receipt),
        status: Some(DocumentStatus::Paid),
        gross: dec!(1000.00),
        iss: dec!(0),
        irrf: dec!(75.00),
    });
    assert_eq!(session.state().mode, DiscountMode::Irrf);

    let outcome = replay(session, &steps, &*directory).await;
    let submission = outcome.submission.unwrap();

    assert_eq!(submission.discount_mode, DiscountMode::Iss);
    assert_eq!(submission.status, DocumentStatus::Paid);
    assert_eq!(submission.irrf, dec!(0));
    assert_eq!(submission.net, dec!(500.00));
    assert!(!outcome.projection.document_number_visible);
}

#[tokio::test]
async fn outcome_renders_as_text_and_json() {
    let config = memory_config();
    let directory = build_registry().create(&config.api).await.unwrap();
    let steps = load_script(&fixture("sample_script.csv")).unwrap();

    let outcome = replay(FormSession::create(), &steps, &*directory).await;

    let text = outcome.to_string();
    assert!(text.contains("Net:            1.350,00"), "{text}");
    assert!(text.contains("Supplier:       Papelaria Central (#7)"), "{text}");

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["submission"]["hidden"]["valor_liquido"], "1350.00");
}

#[test]
fn missing_script_is_an_io_error() {
    let err = load_script(&fixture("nope.csv")).unwrap_err();
    assert!(err.to_string().contains("nope.csv"));
}
