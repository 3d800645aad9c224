//! Command-line interface for doctree

/// Clap argument definitions
mod args;

/// Document command handlers
mod document;

/// Topic command handlers
mod topic;

use clap::Parser;
use std::path::{Path, PathBuf};

use doctree_core::fs::{FileSystem, RealFileSystem};
use doctree_core::manager::DocumentManager;
use doctree_core::storage::{self, IndentStyle, JsonStorage, ProjectStorage, XmlStorage};
use doctree_core::{toc, validate};

pub use args::Cli;
use args::{Commands, StorageFormat};

/// Type alias for the manager over the CLI's filesystem and runtime-selected
/// storage backend.
pub type CliManager = DocumentManager<RealFileSystem, ProjectStorage<RealFileSystem>>;

/// Main entry point for the CLI
pub fn run_cli() {
    env_logger::init();
    let cli = Cli::parse();

    let dir = cli
        .dir
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let indent = if cli.tabs {
        IndentStyle::Tabs
    } else {
        IndentStyle::Spaces(cli.indent)
    };

    let success = match cli.command {
        Commands::Init { format } => handle_init(&dir, format, indent),

        Commands::List => with_manager(&dir, indent, |manager| {
            handle_list(manager);
            true
        }),

        Commands::Tree { id } => with_manager(&dir, indent, |manager| handle_tree(manager, &id)),

        Commands::Doc { command } => with_manager(&dir, indent, |manager| {
            document::handle_doc_command(command, manager)
        }),

        Commands::Topic { command } => with_manager(&dir, indent, |manager| {
            topic::handle_topic_command(command, manager)
        }),

        Commands::StartPage { id, file_name } => with_manager(&dir, indent, |manager| {
            topic::handle_start_page(manager, &id, &file_name)
        }),

        Commands::Status => with_manager(&dir, indent, |manager| handle_status(manager)),
    };

    if !success {
        std::process::exit(1);
    }
}

/// Detect the project in `dir`, load it, and run `f` against the manager.
/// Returns false when the project cannot be opened.
fn with_manager<F>(dir: &Path, indent: IndentStyle, f: F) -> bool
where
    F: FnOnce(&mut CliManager) -> bool,
{
    log::debug!("Opening project in {}", dir.display());
    let storage = match storage::detect_project(RealFileSystem, dir, indent) {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("✗ {}", e);
            eprintln!("  Run 'doctree init' to create a project here");
            return false;
        }
    };

    match DocumentManager::load(RealFileSystem, storage) {
        Ok(mut manager) => f(&mut manager),
        Err(e) => {
            eprintln!("✗ Error loading project: {}", e);
            false
        }
    }
}

/// Handle the init command
/// Returns true on success, false on error
fn handle_init(dir: &Path, format: StorageFormat, indent: IndentStyle) -> bool {
    let fs = RealFileSystem;

    if fs.exists(&dir.join(storage::JSON_CONFIG_FILE))
        || fs.exists(&dir.join(storage::XML_INDEX_FILE))
    {
        let err = doctree_core::error::DoctreeError::ProjectAlreadyExists(dir.to_path_buf());
        eprintln!("✗ {}", err);
        return false;
    }

    let storage: ProjectStorage<RealFileSystem> = match format {
        StorageFormat::Json => ProjectStorage::Json(JsonStorage::new(
            fs,
            dir.join(storage::JSON_CONFIG_FILE),
            indent,
        )),
        StorageFormat::Xml => ProjectStorage::Xml(XmlStorage::new(
            fs,
            dir.join(storage::XML_INDEX_FILE),
            indent,
        )),
    };

    // Load-or-initialize writes the default configuration
    match DocumentManager::load(RealFileSystem, storage) {
        Ok(manager) => {
            println!("✓ Initialized doctree project");
            println!("  Topics directory: {}", manager.topics_dir().display());
            true
        }
        Err(e) => {
            eprintln!("✗ Error initializing project: {}", e);
            false
        }
    }
}

fn handle_list(manager: &CliManager) {
    let documents = manager.documents();
    if documents.is_empty() {
        println!("No documents yet. Add one with 'doctree doc add <id> <name>'");
        return;
    }
    for doc in documents {
        let start = doc.start_page.as_deref().unwrap_or("-");
        println!(
            "{}  {} ({} topics, start page: {})",
            doc.id,
            doc.name,
            doc.topic_count(),
            start
        );
    }
}

fn handle_tree(manager: &CliManager, id: &str) -> bool {
    match manager.document(id) {
        Some(doc) => {
            println!("{} ({})", doc.name, doc.id);
            print!("{}", toc::render_tree(&doc.topics));
            true
        }
        None => {
            eprintln!("✗ Document '{}' not found", id);
            false
        }
    }
}

fn handle_status(manager: &CliManager) -> bool {
    for topic in manager.topics_on_disk() {
        println!("[{}] {} ({})", topic.document_id, topic.title, topic.file_name);
    }

    let report = validate::validate(manager.fs_ref(), manager.config(), &manager.topics_dir());
    if report.is_clean() {
        println!("✓ Project is consistent");
        return true;
    }

    for finding in &report.findings {
        match finding {
            validate::Finding::DuplicateTopic {
                document_id,
                file_name,
            } => println!("✗ [{}] duplicate topic '{}'", document_id, file_name),
            validate::Finding::MissingFile {
                document_id, path, ..
            } => println!("✗ [{}] missing file {}", document_id, path.display()),
            validate::Finding::DanglingStartPage {
                document_id,
                start_page,
            } => println!(
                "✗ [{}] start page '{}' is not in the tree",
                document_id, start_page
            ),
            validate::Finding::OrphanFile { path } => {
                println!("✗ orphan file {}", path.display())
            }
        }
    }
    false
}
