//! Options for the resource dropdown that depends on the selected department.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::directory::DocumentDirectory;
use crate::models::Resource;

pub const EMPTY_OPTION_LABEL: &str = "---------";
pub const NO_RESOURCES_LABEL: &str = "Nenhum recurso para esta secretaria";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

impl ResourceOption {
    fn placeholder(label: &str) -> Self {
        Self {
            value: String::new(),
            label: label.to_string(),
            disabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOptions {
    pub options: Vec<ResourceOption>,
    /// Value of the selected option, if any.
    pub selected: Option<String>,
}

impl ResourceOptions {
    /// Only the blank option; used before a department is chosen or when
    /// loading fails.
    pub fn empty() -> Self {
        Self {
            options: vec![ResourceOption::placeholder(EMPTY_OPTION_LABEL)],
            selected: None,
        }
    }

    /// Builds the option list for a department's resources.
    ///
    /// The saved resource wins when it is in the list; otherwise a lone
    /// resource is selected automatically.
    pub fn build(
        resources: &[Resource],
        initial: Option<&str>,
    ) -> Self {
        let mut out = Self::empty();
        out.options.extend(resources.iter().map(|r| ResourceOption {
            value: r.id.to_string(),
            label: r.nome.clone(),
            disabled: false,
        }));

        if resources.is_empty() {
            out.options.push(ResourceOption {
                disabled: true,
                ..ResourceOption::placeholder(NO_RESOURCES_LABEL)
            });
        }

        out.selected = match initial.filter(|v| !v.is_empty()) {
            Some(value) => resources
                .iter()
                .any(|r| r.id.to_string() == value)
                .then(|| value.to_string()),
            None if resources.len() == 1 => Some(resources[0].id.to_string()),
            None => None,
        };
        out
    }
}

/// Fetches and builds the options for `department_id`.
///
/// No department means no request. Failures are logged and yield the empty
/// list so the rest of the form keeps working.
pub async fn load_resource_options(
    directory: &dyn DocumentDirectory,
    department_id: Option<i64>,
    initial: Option<&str>,
) -> ResourceOptions {
    let Some(id) = department_id else {
        return ResourceOptions::empty();
    };

    match directory.resources_for_department(id).await {
        Ok(resources) => {
            debug!(department_id = id, count = resources.len(), "resources loaded");
            ResourceOptions::build(&resources, initial)
        }
        Err(e) => {
            error!(department_id = id, error = %e, "failed to load resources");
            ResourceOptions::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::lookup::LookupError;
    use crate::models::Supplier;

    fn resource(
        id: i64,
        nome: &str,
    ) -> Resource {
        Resource {
            id,
            nome: nome.to_string(),
        }
    }

    struct Departments;

    #[async_trait]
    impl DocumentDirectory for Departments {
        async fn find_supplier(&self, _cnpj_cpf: &str) -> Result<Supplier, LookupError> {
            Err(LookupError::NotFound)
        }
        async fn resources_for_department(
            &self,
            department_id: i64,
        ) -> Result<Vec<Resource>, LookupError> {
            match department_id {
                1 => Ok(vec![resource(10, "FUNDEB"), resource(11, "PNAE")]),
                2 => Ok(vec![resource(20, "FMAS")]),
                3 => Ok(Vec::new()),
                _ => Err(LookupError::Network("connection refused".into())),
            }
        }
    }

    #[test]
    fn empty_has_only_blank_option() {
        let opts = ResourceOptions::empty();
        assert_eq!(opts.options.len(), 1);
        assert_eq!(opts.options[0].label, EMPTY_OPTION_LABEL);
        assert_eq!(opts.selected, None);
    }

    #[test]
    fn build_lists_resources_after_blank() {
        let opts = ResourceOptions::build(&[resource(10, "FUNDEB"), resource(11, "PNAE")], None);

        let labels: Vec<_> = opts.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec![EMPTY_OPTION_LABEL, "FUNDEB", "PNAE"]);
        assert_eq!(opts.selected, None);
    }

    #[test]
    fn build_marks_empty_department() {
        let opts = ResourceOptions::build(&[], None);

        assert_eq!(opts.options.len(), 2);
        assert_eq!(opts.options[1].label, NO_RESOURCES_LABEL);
        assert!(opts.options[1].disabled);
    }

    #[test]
    fn single_resource_is_selected_automatically() {
        let opts = ResourceOptions::build(&[resource(20, "FMAS")], None);
        assert_eq!(opts.selected.as_deref(), Some("20"));
    }

    #[test]
    fn saved_resource_takes_precedence() {
        let opts = ResourceOptions::build(
            &[resource(10, "FUNDEB"), resource(11, "PNAE")],
            Some("11"),
        );
        assert_eq!(opts.selected.as_deref(), Some("11"));
    }

    #[test]
    fn saved_resource_missing_from_list_selects_nothing() {
        let opts = ResourceOptions::build(&[resource(20, "FMAS")], Some("99"));
        assert_eq!(opts.selected, None);
    }

    #[tokio::test]
    async fn load_without_department_skips_request() {
        let opts = load_resource_options(&Departments, None, None).await;
        assert_eq!(opts, ResourceOptions::empty());
    }

    #[tokio::test]
    async fn load_failure_falls_back_to_empty() {
        let opts = load_resource_options(&Departments, Some(404), None).await;
        assert_eq!(opts, ResourceOptions::empty());
    }

    #[tokio::test]
    async fn load_builds_options() {
        let opts = load_resource_options(&Departments, Some(2), None).await;
        assert_eq!(opts.options.len(), 2);
        assert_eq!(opts.selected.as_deref(), Some("20"));
    }
}
