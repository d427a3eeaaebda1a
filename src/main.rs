//! Fanisi - property-leasing instruction workflow from the terminal.
//!
//! Renders lease documents from ROF 5 intake forms, runs the submission
//! flow and answers rule-based suggestion queries.

#![allow(clippy::single_match_else)]

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fanisi::core::Config;
use fanisi::intake::{FieldLookup, FIELD_NAMES};
use fanisi::suggest::{auto_fill, priority_score};
use fanisi::template::DocumentVariable;
use fanisi::{App, CreateMode, Role, Rof5Form};

/// Property-leasing instruction workflow
#[derive(Parser)]
#[command(name = "fanisi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to .fanisi.toml, then the user config)
    #[arg(short, long, global = true, env = "FANISI_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List document templates
    Templates {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Render a template
    Render {
        /// Template id
        template: String,

        /// ROF 5 form file (JSON or YAML) to take bindings from
        #[arg(long)]
        form: Option<PathBuf>,

        /// Binding overrides (key=value)
        #[arg(long)]
        var: Vec<String>,

        /// Fill unbound variables from suggestions
        #[arg(long)]
        auto_fill: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Submit a ROF 5 form and generate its documents
    Submit {
        /// ROF 5 form file (JSON or YAML)
        form: PathBuf,

        /// Skip required-field validation
        #[arg(long)]
        quick: bool,

        /// Directory to write documents to
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Suggest values for a form field
    Suggest {
        /// Field name (camelCase or template key)
        field: String,

        /// ROF 5 form file (JSON or YAML)
        #[arg(long)]
        form: Option<PathBuf>,

        /// Extra field values (key=value)
        #[arg(long)]
        var: Vec<String>,
    },

    /// Show the priority and deadline the rules give a form
    Assess {
        /// ROF 5 form file (JSON or YAML)
        form: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List roles, permissions and the demo users
    Roles,

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Write the current configuration to the config file
        #[arg(long, conflicts_with = "path")]
        init: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    match cli.command {
        Commands::Templates { format } => {
            cmd_templates(cli.config.as_deref(), &format)?;
        }
        Commands::Render { template, form, var, auto_fill, out } => {
            cmd_render(
                cli.config.as_deref(),
                &template,
                form.as_deref(),
                &var,
                auto_fill,
                out.as_deref(),
            )?;
        }
        Commands::Submit { form, quick, out_dir, format } => {
            cmd_submit(cli.config.as_deref(), &form, quick, out_dir, &format)?;
        }
        Commands::Suggest { field, form, var } => {
            cmd_suggest(cli.config.as_deref(), &field, form.as_deref(), &var)?;
        }
        Commands::Assess { form, format } => {
            cmd_assess(cli.config.as_deref(), &form, &format)?;
        }
        Commands::Roles => {
            cmd_roles();
        }
        Commands::Config { path, init } => {
            cmd_config(cli.config.as_deref(), path, init)?;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path),
        None => Config::load(),
    }
}

fn load_app(path: Option<&Path>) -> Result<App> {
    let config = load_config(path)?;
    App::new(config).context("Failed to initialize")
}

/// Read a form from JSON, or YAML when the extension says so.
fn read_form(path: &Path) -> Result<Rof5Form> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read form {}", path.display()))?;

    let is_yaml =
        path.extension().and_then(|e| e.to_str()).is_some_and(|e| e == "yaml" || e == "yml");
    let form = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse form {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse form {}", path.display()))?
    };
    Ok(form)
}

fn parse_var(var: &str) -> Result<(String, String)> {
    let (key, value) = var
        .split_once('=')
        .with_context(|| format!("Invalid variable '{var}', expected key=value"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

/// Replace the binding for `key` in place, or append one.
fn set_binding(bindings: &mut Vec<DocumentVariable>, key: String, value: String) {
    match bindings.iter_mut().find(|b| b.key == key) {
        Some(binding) => binding.value = value,
        None => bindings.push(DocumentVariable::new(key, value)),
    }
}

/// List templates.
fn cmd_templates(config: Option<&Path>, format: &str) -> Result<()> {
    let app = load_app(config)?;
    let templates = app.catalog.templates();

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(templates)?;
            println!("{json}");
        }
        _ => {
            for template in templates {
                println!(
                    "{} - {} ({} variables)",
                    template.id,
                    template.name,
                    template.variables.len()
                );
            }
            println!("\nTotal: {} templates", templates.len());
        }
    }

    Ok(())
}

/// Render a template to stdout or a file.
fn cmd_render(
    config: Option<&Path>,
    template_id: &str,
    form: Option<&Path>,
    vars: &[String],
    fill: bool,
    out: Option<&Path>,
) -> Result<()> {
    let app = load_app(config)?;
    let template = app.catalog.get(template_id)?;

    let today = app.store.clock().today();
    let mut bindings = match form {
        Some(path) => read_form(path)?.document_bindings(today),
        None => Vec::new(),
    };
    for var in vars {
        let (key, value) = parse_var(var)?;
        set_binding(&mut bindings, key, value);
    }

    if fill {
        for key in template.unbound_variables(&bindings) {
            bindings.push(DocumentVariable::new(key, String::new()));
        }
        let filled = auto_fill(app.provider(), &mut bindings);
        if !filled.is_empty() {
            eprintln!("Auto-filled: {}", filled.join(", "));
        }
        bindings.retain(|b| !b.value.is_empty());
    }

    let document = app.catalog.render_document(template_id, &bindings)?;
    if !document.is_complete() {
        eprintln!("Unbound: {}", document.missing.join(", "));
    }

    match out {
        Some(path) => {
            std::fs::write(path, &document.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", document.content),
    }

    Ok(())
}

/// Run the submission flow for one form.
fn cmd_submit(
    config: Option<&Path>,
    form_path: &Path,
    quick: bool,
    out_dir: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(dir) = out_dir {
        config.export.output_dir = dir;
    }
    let form = read_form(form_path)?;
    let mode = if quick { CreateMode::Quick } else { CreateMode::Validated };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut app = App::new(config)?;

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        let outcome = app.submit(form, mode, &cancel).await?;
        let suggestions = app.workflow_suggestions(&outcome.instruction.id)?;

        match format {
            "json" => {
                let json = serde_json::json!({
                    "instruction": outcome.instruction,
                    "documents": outcome.documents,
                    "missing": outcome
                        .rendered
                        .iter()
                        .map(|d| (d.template_id.clone(), d.missing.clone()))
                        .collect::<HashMap<_, _>>(),
                    "suggestions": suggestions,
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            _ => {
                let instruction = &outcome.instruction;
                println!(
                    "Instruction {} created ({}, {}%, priority {})",
                    instruction.id,
                    instruction.stage.title(),
                    instruction.progress,
                    instruction.priority
                );
                println!("\nDocuments:");
                for doc in &outcome.documents {
                    let location =
                        doc.path.as_ref().map_or(doc.filename.clone(), |p| p.display().to_string());
                    println!("  {location}");
                }
                for doc in outcome.rendered.iter().filter(|d| !d.is_complete()) {
                    println!("  {} unbound: {}", doc.template_id, doc.missing.join(", "));
                }
                if !suggestions.is_empty() {
                    println!("\nSuggested next steps:");
                    for s in &suggestions {
                        println!(
                            "  - {} ({}, ~{} days): {}",
                            s.action, s.priority, s.estimated_days, s.reason
                        );
                    }
                }
            }
        }

        Ok(())
    })
}

/// Show suggestions for one field.
fn cmd_suggest(
    config: Option<&Path>,
    field: &str,
    form: Option<&Path>,
    vars: &[String],
) -> Result<()> {
    let app = load_app(config)?;

    let mut values: HashMap<String, String> = HashMap::new();
    if let Some(path) = form {
        let form = read_form(path)?;
        for name in FIELD_NAMES {
            if let Some(value) = form.filled(name) {
                values.insert(name.to_string(), value.to_string());
            }
        }
    }
    for var in vars {
        let (key, value) = parse_var(var)?;
        values.insert(key, value);
    }

    let suggestions = app.form_suggestions(&values, field);
    if suggestions.is_empty() {
        println!("No suggestions for {field}");
        return Ok(());
    }

    for s in &suggestions {
        println!("{:<12} {:>3.0}%  {}", s.value, s.confidence * 100.0, s.reason);
    }

    Ok(())
}

/// Show the computed priority and deadline for a form.
fn cmd_assess(config: Option<&Path>, form_path: &Path, format: &str) -> Result<()> {
    let app = load_app(config)?;
    let form = read_form(form_path)?;
    let assessment = app.assess(&form);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&assessment)?),
        _ => {
            println!("Priority: {} (score {})", assessment.priority, priority_score(&form));
            println!("Deadline: {}", assessment.deadline);
        }
    }

    Ok(())
}

/// List roles and users.
fn cmd_roles() {
    for role in Role::ALL {
        println!("{} - {}", role.code(), role.department());
        let permissions: Vec<_> = role.permissions().iter().map(|p| p.as_str()).collect();
        println!("  {}", permissions.join(", "));
    }

    println!("\nUsers:");
    for user in fanisi::UserDirectory::mock().users() {
        println!("  {} {} <{}> ({})", user.id, user.name, user.email, user.role);
    }
}

/// Show or initialize configuration.
fn cmd_config(config: Option<&Path>, show_path: bool, init: bool) -> Result<()> {
    let target = config.map(Path::to_path_buf).or_else(Config::config_path);

    if show_path {
        if let Some(path) = target {
            println!("{}", path.display());
        }
        return Ok(());
    }

    if init {
        let path = target.context("Could not determine config directory")?;
        if path.exists() {
            anyhow::bail!("Config already exists at {}", path.display());
        }
        Config::load()?.save_to(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = load_config(config)?;
    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "fanisi", &mut io::stdout());
}
