use clap::{Parser, Subcommand};
use elm_symbols::config::{ConfigLayer, WorkspaceSettings, resolve_settings};
use elm_symbols::diagnostics::{LogNotifier, project_root};
use elm_symbols::lsp::{to_completion_item, to_diagnostic};
use elm_symbols::{ElmSymbolsError, Workspace};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Symbol resolution and completion for Elm projects
#[derive(Parser)]
#[command(name = "elm-symbols")]
#[command(version)]
#[command(about = "Symbol resolution and completion for Elm projects")]
struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Settings as camelCase JSON, applied over the user and project config
    #[arg(long, global = true, value_name = "JSON")]
    settings: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List completion candidates visible in a file
    Complete {
        file: PathBuf,

        /// Project root (default: nearest directory with elm.json)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Print LSP completion items as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show what a module exposes
    Exposing {
        module: String,

        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Run the Elm compiler on a file and print LSP diagnostics as JSON
    Diagnose {
        file: PathBuf,

        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    if let Err(e) = run(cli.command, cli.settings.as_deref()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    overrides: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Complete { file, root, json } => {
            let root = root.unwrap_or_else(|| default_root(&file));
            let workspace = Workspace::open(&root, settings_for(&root, overrides)?)?;
            let candidates = workspace.complete_file(&file)?;
            if json {
                let items: Vec<_> = candidates.into_iter().map(to_completion_item).collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for candidate in candidates {
                    println!("{}\t{:?}", candidate.label, candidate.kind);
                }
            }
        }
        Commands::Exposing { module, root } => {
            let workspace = Workspace::open(&root, settings_for(&root, overrides)?)?;
            if workspace.forest().uri_for_module(&module).is_none() {
                return Err(ElmSymbolsError::document_not_found(module).into());
            }
            let table = workspace.forest().get_exposing_by_module_name(&module);
            for symbol in &table {
                let constructors = symbol.constructor_names().collect::<Vec<_>>();
                if constructors.is_empty() {
                    println!("{}\t{:?}", symbol.name, symbol.kind);
                } else {
                    println!(
                        "{}({})\t{:?}",
                        symbol.name,
                        constructors.join(", "),
                        symbol.kind
                    );
                }
            }
        }
        Commands::Diagnose { file, root } => {
            let root = root.unwrap_or_else(|| default_root(&file));
            let settings = settings_for(&root, overrides)?;
            let diagnostics = elm_symbols::CompilerDiagnostics::new(
                settings.compiler,
                Arc::new(LogNotifier),
            );
            let issues = diagnostics.check(&file).await?;
            let converted: Vec<_> = issues.iter().map(to_diagnostic).collect();
            println!("{}", serde_json::to_string_pretty(&converted)?);
        }
    }
    Ok(())
}

fn default_root(file: &Path) -> PathBuf {
    std::path::absolute(file)
        .ok()
        .and_then(|file| project_root(&file))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve settings for `root`. Files that fail to load are skipped with a
/// warning, but rejected `--settings` JSON stops the command.
fn settings_for(root: &Path, overrides: Option<&str>) -> Result<WorkspaceSettings, ElmSymbolsError> {
    let resolved = resolve_settings(Some(root), overrides);
    for note in &resolved.notes {
        note.log();
    }
    if let Some(rejected) = resolved
        .notes
        .iter()
        .find(|note| note.layer == ConfigLayer::CommandLine && note.is_warning())
    {
        return Err(ElmSymbolsError::config(rejected.message.clone()));
    }
    Ok(resolved.settings)
}
