//! Document template catalog.
//!
//! The catalog is fixed once built: the two built-in templates plus, when
//! configured, YAML templates read from a directory at startup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::render::{placeholder, render_content, DocumentVariable, RenderedDocument};
use crate::error::{FanisiError, FanisiResult};

/// Id of the built-in lease agreement template.
pub const LEASE_AGREEMENT_ID: &str = "lease-agreement";

/// Id of the built-in ROF 6 completion report template.
pub const COMPLETION_REPORT_ID: &str = "rof6-template";

/// A named document skeleton with `{{key}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTemplate {
    /// Catalog id
    pub id: String,

    /// Display name
    pub name: String,

    /// Body containing `{{key}}` placeholders
    pub content: String,

    /// Declared placeholder keys, in form order
    #[serde(default)]
    pub variables: Vec<String>,
}

impl DocumentTemplate {
    /// Create a template.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
        variables: Vec<String>,
    ) -> Self {
        Self { id: id.into(), name: name.into(), content: content.into(), variables }
    }

    /// Declared variables that have no binding in `bindings`.
    pub fn unbound_variables(&self, bindings: &[DocumentVariable]) -> Vec<String> {
        self.variables.iter().filter(|v| !bindings.iter().any(|b| &b.key == *v)).cloned().collect()
    }

    /// Empty binding for every declared variable.
    pub fn blank_bindings(&self) -> Vec<DocumentVariable> {
        self.variables.iter().map(|key| DocumentVariable::new(key.clone(), String::new())).collect()
    }
}

/// Fixed set of templates keyed by id.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<DocumentTemplate>,
}

impl TemplateCatalog {
    /// Catalog with no templates.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the lease agreement and the ROF 6 completion report.
    pub fn builtin() -> Self {
        Self::empty().with_template(lease_agreement()).with_template(completion_report())
    }

    /// Add a template, replacing any template with the same id.
    pub fn with_template(mut self, template: DocumentTemplate) -> Self {
        if let Some(existing) = self.templates.iter_mut().find(|t| t.id == template.id) {
            tracing::warn!(id = %template.id, "Replacing template with duplicate id");
            *existing = template;
        } else {
            self.templates.push(template);
        }
        self
    }

    /// Merge every `*.yaml` / `*.yml` template in `dir`.
    ///
    /// Files are read in name order so replacements are deterministic.
    pub fn load_dir(mut self, dir: &Path) -> FanisiResult<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().and_then(|e| e.to_str()).is_some_and(|e| e == "yaml" || e == "yml")
            })
            .collect();
        paths.sort();

        for path in paths {
            let content = std::fs::read_to_string(&path)?;
            let template: DocumentTemplate = serde_yaml::from_str(&content)
                .map_err(|e| FanisiError::TemplateParse(format!("{}: {e}", path.display())))?;
            tracing::debug!(id = %template.id, path = %path.display(), "Loaded template");
            self = self.with_template(template);
        }

        Ok(self)
    }

    /// Look up a template by id.
    pub fn get(&self, id: &str) -> FanisiResult<&DocumentTemplate> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| FanisiError::TemplateNotFound(id.to_string()))
    }

    /// Whether a template with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.templates.iter().any(|t| t.id == id)
    }

    /// All templates in catalog order.
    pub fn templates(&self) -> &[DocumentTemplate] {
        &self.templates
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog has no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render a template with the given bindings.
    pub fn render(&self, template_id: &str, bindings: &[DocumentVariable]) -> FanisiResult<String> {
        let template = self.get(template_id)?;
        tracing::debug!(template = template_id, bindings = bindings.len(), "Rendering template");
        Ok(render_content(&template.content, bindings))
    }

    /// Render and report which declared variables were left unsubstituted.
    pub fn render_document(
        &self,
        template_id: &str,
        bindings: &[DocumentVariable],
    ) -> FanisiResult<RenderedDocument> {
        let template = self.get(template_id)?;
        let content = render_content(&template.content, bindings);
        let missing = template
            .variables
            .iter()
            .filter(|key| content.contains(&placeholder(key)))
            .cloned()
            .collect();

        Ok(RenderedDocument { template_id: template.id.clone(), content, missing })
    }
}

fn lease_agreement() -> DocumentTemplate {
    DocumentTemplate::new(
        LEASE_AGREEMENT_ID,
        "Lease Agreement",
        LEASE_AGREEMENT_CONTENT,
        [
            "current_date",
            "landlord_name",
            "landlord_address",
            "site_location",
            "title_number",
            "land_area",
            "commencement_date",
            "lease_term",
            "monthly_rent",
            "escalation_rate",
            "deposit",
            "site_code",
            "file_ref",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    )
}

fn completion_report() -> DocumentTemplate {
    DocumentTemplate::new(
        COMPLETION_REPORT_ID,
        "ROF 6 Template",
        COMPLETION_REPORT_CONTENT,
        [
            "site_code",
            "site_location",
            "file_ref",
            "current_date",
            "landlord_name",
            "lease_type",
            "total_fees",
            "vat_amount",
            "total_amount",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    )
}

const LEASE_AGREEMENT_CONTENT: &str = r#"
LEASE AGREEMENT

THIS LEASE AGREEMENT is made this {{current_date}} between {{landlord_name}} of {{landlord_address}} (the "Landlord") and SAFARICOM PLC of Safaricom House, Waiyaki Way, Westlands, P.O. Box 66827-00800, Nairobi (the "Tenant").

PREMISES: The premises located at {{site_location}}, Title Number {{title_number}}, measuring approximately {{land_area}}.

TERM: This lease shall commence on {{commencement_date}} for a period of {{lease_term}} years.

RENT: The monthly rent shall be KES {{monthly_rent}}, payable in advance on the first day of each month, subject to annual escalation of {{escalation_rate}}% per annum.

DEPOSIT: A security deposit of KES {{deposit}} shall be paid upon execution of this agreement.

Site Code: {{site_code}}
File Reference: {{file_ref}}

IN WITNESS WHEREOF, the parties have executed this agreement on the date first written above.

Landlord: _________________    Tenant: _________________
{{landlord_name}}             SAFARICOM PLC
"#;

const COMPLETION_REPORT_CONTENT: &str = r#"
REQUEST FOR OPINION FORM 6 (ROF 6)
COMPLETION REPORT

Site Code: {{site_code}}
Location: {{site_location}}
File Reference: {{file_ref}}
Date: {{current_date}}

To: In-House Counsel
From: External Counsel

RE: {{landlord_name}} - {{site_location}}

We confirm that we have completed the above instruction and attach the following documents:

1. Original executed {{lease_type}}
2. Certified copy of Title Deed
3. Consent to Lease (if applicable)
4. Registration Certificate

The documents have been duly executed, stamped and registered where applicable.

Total Professional Fees: KES {{total_fees}}
VAT (16%): KES {{vat_amount}}
Total Amount Due: KES {{total_amount}}

Yours faithfully,
External Counsel
"#;
