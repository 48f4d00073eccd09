//! CSV event scripts replayed through a form session.
//!
//! ## CSV Format
//!
//! Three columns, matched by header name. Unused cells are left empty.
//!
//! | `event`      | `target`                            | `value`                          |
//! |--------------|-------------------------------------|----------------------------------|
//! | `type`       |                                     | document type code, e.g. `NFS`   |
//! | `mode`       |                                     | `NONE`, `ISS`, `IRRF`, `ISS_IRRF`|
//! | `focus`      | `valor_bruto`, `valor_iss`, `valor_irrf` (or `gross`, `iss`, `irrf`) | |
//! | `blur`       | same as `focus`                     | typed text, e.g. `"1.500,00"`    |
//! | `supplier`   |                                     | typed CPF/CNPJ; blurs and looks up |
//! | `department` |                                     | department id, empty clears it   |
//! | `submit`     |                                     |                                  |
//!
//! Amounts containing a comma must be quoted.
//!
//! ### Example
//!
//! ```csv
//! event,target,value
//! type,,NFS
//! mode,,ISS_IRRF
//! blur,valor_bruto,"1.500,00"
//! blur,valor_iss,"100,00"
//! submit,,
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use doc_core::DiscountMode;
use doc_core::FormEvent;
use doc_core::calculations::AmountField;

#[derive(Debug, Deserialize)]
struct ScriptRow {
    event: String,
    target: String,
    value: String,
}

/// One replayable step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Form(FormEvent),
    /// Types into the CPF/CNPJ field, then leaves it.
    Supplier(String),
    Department(Option<i64>),
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("cannot read script '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("unknown event '{event}' on row {row}")]
    UnknownEvent { event: String, row: usize },

    #[error("unknown amount field '{field}' on row {row}")]
    UnknownField { field: String, row: usize },

    #[error("unknown discount mode '{mode}' on row {row}")]
    UnknownMode { mode: String, row: usize },

    #[error("invalid department id '{value}' on row {row}")]
    InvalidDepartment { value: String, row: usize },
}

fn field(
    target: String,
    row: usize,
) -> Result<AmountField, ScriptError> {
    AmountField::parse(&target).ok_or(ScriptError::UnknownField { field: target, row })
}

fn convert_row(
    row: ScriptRow,
    row_number: usize,
) -> Result<ScriptStep, ScriptError> {
    let step = match row.event.to_ascii_lowercase().as_str() {
        "type" => ScriptStep::Form(FormEvent::DocumentTypeChanged(row.value)),
        "mode" => {
            let mode = DiscountMode::parse(&row.value).ok_or(ScriptError::UnknownMode {
                mode: row.value,
                row: row_number,
            })?;
            ScriptStep::Form(FormEvent::DiscountModeSelected(mode))
        }
        "focus" => ScriptStep::Form(FormEvent::AmountFocused(field(row.target, row_number)?)),
        "blur" => ScriptStep::Form(FormEvent::AmountBlurred {
            field: field(row.target, row_number)?,
            text: row.value,
        }),
        "supplier" => ScriptStep::Supplier(row.value),
        "department" if row.value.is_empty() => ScriptStep::Department(None),
        "department" => {
            let id = row
                .value
                .parse::<i64>()
                .map_err(|_| ScriptError::InvalidDepartment {
                    value: row.value.clone(),
                    row: row_number,
                })?;
            ScriptStep::Department(Some(id))
        }
        "submit" => ScriptStep::Form(FormEvent::Submit),
        _ => {
            return Err(ScriptError::UnknownEvent {
                event: row.event,
                row: row_number,
            });
        }
    };
    Ok(step)
}

/// Parses a script. Steps are returned in file order.
pub fn parse_script<R: Read>(reader: R) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    reader
        .deserialize::<ScriptRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect()
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>, ScriptError> {
    let file = std::fs::File::open(path).map_err(|source| ScriptError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_script(file)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SCENARIO_A: &str = "\
event,target,value
type,,NFS
mode,,ISS_IRRF
focus,valor_bruto,
blur,valor_bruto,\"1.500,00\"
blur,iss,\"100,00\"
blur,irrf,\"50,00\"
submit,,
";

    #[test]
    fn parses_steps_in_order() {
        let steps = parse_script(SCENARIO_A.as_bytes()).unwrap();

        assert_eq!(
            steps,
            vec![
                ScriptStep::Form(FormEvent::DocumentTypeChanged("NFS".into())),
                ScriptStep::Form(FormEvent::DiscountModeSelected(DiscountMode::IssIrrf)),
                ScriptStep::Form(FormEvent::AmountFocused(AmountField::Gross)),
                ScriptStep::Form(FormEvent::AmountBlurred {
                    field: AmountField::Gross,
                    text: "1.500,00".into(),
                }),
                ScriptStep::Form(FormEvent::AmountBlurred {
                    field: AmountField::Iss,
                    text: "100,00".into(),
                }),
                ScriptStep::Form(FormEvent::AmountBlurred {
                    field: AmountField::Irrf,
                    text: "50,00".into(),
                }),
                ScriptStep::Form(FormEvent::Submit),
            ]
        );
    }

    #[test]
    fn supplier_and_department_steps() {
        let steps = parse_script(
            "event,target,value\nsupplier,,11.222.333/0001-81\ndepartment,,3\ndepartment,,\n"
                .as_bytes(),
        )
        .unwrap();

        assert_eq!(
            steps,
            vec![
                ScriptStep::Supplier("11.222.333/0001-81".into()),
                ScriptStep::Department(Some(3)),
                ScriptStep::Department(None),
            ]
        );
    }

    #[test]
    fn unknown_event_reports_row() {
        let err = parse_script("event,target,value\ntype,,NF\nclick,,\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ScriptError::UnknownEvent { ref event, row: 2 } if event == "click"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = parse_script("event,target,value\nblur,valor_pis,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ScriptError::UnknownField { row: 1, .. }));
    }

    #[test]
    fn lowercase_mode_is_rejected() {
        let err = parse_script("event,target,value\nmode,,iss\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ScriptError::UnknownMode { row: 1, .. }));
    }

    #[test]
    fn non_numeric_department_is_rejected() {
        let err = parse_script("event,target,value\ndepartment,,saude\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidDepartment { row: 1, .. }));
    }

    #[test]
    fn unquoted_comma_amount_breaks_column_count() {
        let err = parse_script("event,target,value\nblur,valor_iss,100,00\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }
}
