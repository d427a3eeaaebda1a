//! Application state and the ROF 5 submission flow.
//!
//! `App` ties the template catalog, the workflow store, the suggestion
//! provider and the export sink together under one configuration.

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::access::UserDirectory;
use crate::core::{Clock, Config, IdGenerator, RandomIdGenerator, SystemClock};
use crate::error::FanisiResult;
use crate::intake::{FieldLookup, Rof5Form};
use crate::suggest::{RuleBasedProvider, Suggestion, SuggestionProvider, WorkflowSuggestion};
use crate::template::{
    DirectoryExporter, DocumentSink, DocumentVariable, ExportedDocument, RenderedDocument,
    TemplateCatalog,
};
use crate::workflow::{
    AuditUser, CreateMode, Instruction, InstructionUpdate, Priority, WorkflowStore,
};

/// Result of a ROF 5 submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    /// The instruction as stored after generation
    pub instruction: Instruction,

    /// Rendered documents, one per template
    pub rendered: Vec<RenderedDocument>,

    /// Documents handed to the sink
    pub documents: Vec<ExportedDocument>,
}

impl SubmissionOutcome {
    /// Whether every rendered document had all its variables bound.
    pub fn is_complete(&self) -> bool {
        self.rendered.iter().all(RenderedDocument::is_complete)
    }
}

/// Priority and deadline assessment of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub priority: Priority,
    pub deadline: chrono::NaiveDate,
}

/// Main application state.
pub struct App {
    /// Loaded configuration
    pub config: Config,

    /// Template catalog, built-ins plus any configured extras
    pub catalog: TemplateCatalog,

    /// Instruction store
    pub store: WorkflowStore,

    /// Known users
    pub users: UserDirectory,

    provider: Box<dyn SuggestionProvider>,
    sink: Arc<dyn DocumentSink>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("templates", &self.catalog.len())
            .field("store", &self.store)
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl App {
    /// Create an app from configuration, writing documents to the configured
    /// output directory.
    pub fn new(config: Config) -> FanisiResult<Self> {
        let sink = Arc::new(DirectoryExporter::new(config.export.output_dir.clone()));
        Self::with_parts(
            config,
            Arc::new(RandomIdGenerator::new()),
            Arc::new(SystemClock),
            sink,
        )
    }

    /// Create an app with explicit id source, clock and sink.
    pub fn with_parts(
        config: Config,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn DocumentSink>,
    ) -> FanisiResult<Self> {
        let mut catalog = TemplateCatalog::builtin();
        if let Some(dir) = &config.templates.extra_dir {
            catalog = catalog.load_dir(dir)?;
        }

        let store = WorkflowStore::new(ids, clock)
            .with_id_prefix(config.workflow.id_prefix.clone())
            .with_default_priority(config.workflow.default_priority);

        tracing::debug!(templates = catalog.len(), "App initialized");

        Ok(Self {
            config,
            catalog,
            store,
            users: UserDirectory::mock(),
            provider: Box::new(RuleBasedProvider::new()),
            sink,
        })
    }

    /// Replace the suggestion provider.
    pub fn with_provider(mut self, provider: Box<dyn SuggestionProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// The active suggestion provider.
    pub fn provider(&self) -> &dyn SuggestionProvider {
        self.provider.as_ref()
    }

    /// Templates generated for a form: its lease type when that names a
    /// catalog template, else the configured default.
    pub fn templates_for(&self, form: &Rof5Form) -> Vec<String> {
        let lease_type = form.lease_type.trim();
        if self.catalog.contains(lease_type) {
            vec![lease_type.to_string()]
        } else {
            vec![self.config.workflow.default_template.clone()]
        }
    }

    /// Submit a ROF 5 form: create the instruction, generate its documents
    /// and export them.
    pub async fn submit(
        &mut self,
        form: Rof5Form,
        mode: CreateMode,
        cancel: &CancellationToken,
    ) -> FanisiResult<SubmissionOutcome> {
        let template_ids = self.templates_for(&form);
        for id in &template_ids {
            self.catalog.get(id)?;
        }

        let smart_priority = (self.config.workflow.smart_priority
            && self.config.suggestions.enabled
            && form.requested_priority().is_none())
        .then(|| self.provider.smart_priority(&form));

        let instruction = self.store.create_instruction(form, mode)?;
        let id = instruction.id.clone();

        if let Some(priority) = smart_priority.filter(|p| *p != instruction.priority) {
            let update =
                InstructionUpdate { priority: Some(priority), ..InstructionUpdate::default() };
            self.store.update_instruction(&id, update, AuditUser::Assistant)?;
        }

        self.store.attach_generated_documents(&id, &template_ids, cancel).await?;

        let today = self.store.clock().today();
        let instruction = self.store.get(&id)?.clone();
        let bindings = instruction.form_data.document_bindings(today);

        let mut rendered = Vec::with_capacity(template_ids.len());
        let mut documents = Vec::with_capacity(template_ids.len());
        for template_id in &template_ids {
            let (document, exported) =
                self.render_and_export(&instruction, template_id, &bindings)?;
            rendered.push(document);
            documents.push(exported);
        }

        Ok(SubmissionOutcome { instruction, rendered, documents })
    }

    /// Re-render a template from an instruction's retained form data.
    pub fn regenerate(&self, id: &str, template_id: &str) -> FanisiResult<ExportedDocument> {
        let instruction = self.store.get(id)?;
        let bindings = instruction.form_data.document_bindings(self.store.clock().today());
        let (_, exported) = self.render_and_export(instruction, template_id, &bindings)?;
        Ok(exported)
    }

    fn render_and_export(
        &self,
        instruction: &Instruction,
        template_id: &str,
        bindings: &[DocumentVariable],
    ) -> FanisiResult<(RenderedDocument, ExportedDocument)> {
        let document = self.catalog.render_document(template_id, bindings)?;
        if !document.is_complete() {
            tracing::warn!(
                id = %instruction.id,
                template = template_id,
                missing = %document.missing.join(", "),
                "Document has unbound placeholders"
            );
        }

        let filename = format!(
            "{}-{}.{}",
            file_stem(instruction),
            template_id,
            self.config.export.extension
        );
        let exported = self.sink.save(&document.content, &filename)?;
        Ok((document, exported))
    }

    /// Form suggestions for a field, or nothing when suggestions are disabled.
    pub fn form_suggestions(&self, form: &dyn FieldLookup, field: &str) -> Vec<Suggestion> {
        if !self.config.suggestions.enabled {
            return Vec::new();
        }
        self.provider.form_suggestions(form, field)
    }

    /// Next-step suggestions for an instruction.
    pub fn workflow_suggestions(&self, id: &str) -> FanisiResult<Vec<WorkflowSuggestion>> {
        let instruction = self.store.get(id)?;
        if !self.config.suggestions.enabled {
            return Ok(Vec::new());
        }
        Ok(self.provider.workflow_suggestions(instruction))
    }

    /// Priority and deadline the rules give a form.
    ///
    /// An urgency level on the form wins over the computed priority.
    pub fn assess(&self, form: &Rof5Form) -> Assessment {
        let priority =
            form.requested_priority().unwrap_or_else(|| self.provider.smart_priority(form));
        let deadline = self.provider.smart_deadline(form, priority, self.store.clock().today());
        Assessment { priority, deadline }
    }
}

fn file_stem(instruction: &Instruction) -> &str {
    let site = instruction.site_code.trim();
    if site.is_empty() {
        instruction.id.as_str()
    } else {
        site
    }
}
