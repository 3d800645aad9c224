//! Document command handlers

use doctree_core::model::Document;
use doctree_core::toc::{self, TopicNode};

use crate::cli::args::DocCommands;
use crate::cli::CliManager;

pub fn handle_doc_command(command: DocCommands, manager: &mut CliManager) -> bool {
    match command {
        DocCommands::Add { id, name, topic } => handle_add(manager, &id, &name, topic),
        DocCommands::Rename { id, name } => handle_rename(manager, &id, &name),
        DocCommands::Remove { id } => handle_remove(manager, &id),
    }
}

fn handle_add(manager: &mut CliManager, id: &str, name: &str, topic: Option<String>) -> bool {
    let mut doc = Document::new(id, name);
    if let Some(title) = topic {
        let file_name = toc::format_title_as_file_name(&title);
        doc.topics.push(TopicNode::new(file_name, title));
    }

    match manager.create_document(doc) {
        Ok(true) => {
            println!("✓ Added document '{}'", id);
            if let Some(doc) = manager.document(id) {
                if let Some(start) = &doc.start_page {
                    println!("  Start page: {}", start);
                }
            }
            true
        }
        Ok(false) => {
            eprintln!("✗ Could not add document '{}'", id);
            false
        }
        Err(e) => {
            eprintln!("✗ Error adding document: {}", e);
            false
        }
    }
}

fn handle_rename(manager: &mut CliManager, id: &str, name: &str) -> bool {
    match manager.rename_document(id, name) {
        Ok(true) => {
            println!("✓ Renamed document '{}' to \"{}\"", id, name);
            true
        }
        Ok(false) => {
            eprintln!("✗ Document '{}' not found", id);
            false
        }
        Err(e) => {
            eprintln!("✗ Error renaming document: {}", e);
            false
        }
    }
}

fn handle_remove(manager: &mut CliManager, id: &str) -> bool {
    match manager.remove_document(id) {
        Ok(true) => {
            println!("✓ Removed document '{}' and its topic files", id);
            true
        }
        Ok(false) => {
            eprintln!("✗ Document '{}' not found", id);
            false
        }
        Err(e) => {
            eprintln!("✗ Error removing document: {}", e);
            false
        }
    }
}
