//! Topic command handlers

use doctree_core::toc::{self, TopicNode};

use crate::cli::args::TopicCommands;
use crate::cli::CliManager;

pub fn handle_topic_command(command: TopicCommands, manager: &mut CliManager) -> bool {
    match command {
        TopicCommands::Add { id, title } => handle_add(manager, &id, None, &title),
        TopicCommands::AddChild { id, parent, title } => {
            handle_add(manager, &id, Some(&parent), &title)
        }
        TopicCommands::AddSibling { id, sibling, title } => {
            handle_add_sibling(manager, &id, &sibling, &title)
        }
        TopicCommands::Rename {
            id,
            file_name,
            title,
            new_file_name,
        } => handle_rename(manager, &id, &file_name, &title, new_file_name.as_deref()),
        TopicCommands::Move { id, source, target } => handle_move(manager, &id, &source, &target),
        TopicCommands::Delete { id, file_name } => handle_delete(manager, &id, &file_name),
    }
}

fn new_topic(title: &str) -> TopicNode {
    TopicNode::new(toc::format_title_as_file_name(title), title)
}

fn handle_add(manager: &mut CliManager, id: &str, parent: Option<&str>, title: &str) -> bool {
    let node = new_topic(title);
    let file_name = node.file_name.clone();
    match manager.add_child_topic(id, parent, node) {
        Ok(true) => {
            println!("✓ Added topic '{}' ({})", title, file_name);
            true
        }
        Ok(false) => {
            eprintln!("✗ Could not add topic '{}'", title);
            false
        }
        Err(e) => {
            eprintln!("✗ Error adding topic: {}", e);
            false
        }
    }
}

fn handle_add_sibling(manager: &mut CliManager, id: &str, sibling: &str, title: &str) -> bool {
    let node = new_topic(title);
    let file_name = node.file_name.clone();
    match manager.add_sibling_topic(id, sibling, node) {
        Ok(true) => {
            println!("✓ Added topic '{}' ({})", title, file_name);
            true
        }
        Ok(false) => {
            eprintln!("✗ Could not add topic '{}'", title);
            false
        }
        Err(e) => {
            eprintln!("✗ Error adding topic: {}", e);
            false
        }
    }
}

fn handle_rename(
    manager: &mut CliManager,
    id: &str,
    file_name: &str,
    title: &str,
    new_file_name: Option<&str>,
) -> bool {
    match manager.rename_topic(id, file_name, title, new_file_name) {
        Ok(true) => {
            println!("✓ Renamed topic '{}'", file_name);
            true
        }
        Ok(false) => {
            eprintln!("✗ Could not rename topic '{}'", file_name);
            false
        }
        Err(e) => {
            eprintln!("✗ Error renaming topic: {}", e);
            false
        }
    }
}

fn handle_move(manager: &mut CliManager, id: &str, source: &str, target: &str) -> bool {
    match manager.move_topic(id, source, target) {
        Ok(true) => {
            println!("✓ Moved '{}' under '{}'", source, target);
            true
        }
        Ok(false) => {
            eprintln!("✗ Could not move '{}' under '{}'", source, target);
            false
        }
        Err(e) => {
            eprintln!("✗ Error moving topic: {}", e);
            false
        }
    }
}

fn handle_delete(manager: &mut CliManager, id: &str, file_name: &str) -> bool {
    match manager.delete_topic(id, file_name) {
        Ok(true) => {
            println!("✓ Deleted topic '{}' and its descendants", file_name);
            true
        }
        Ok(false) => {
            eprintln!("✗ Could not delete topic '{}'", file_name);
            false
        }
        Err(e) => {
            eprintln!("✗ Error deleting topic: {}", e);
            false
        }
    }
}

pub fn handle_start_page(manager: &mut CliManager, id: &str, file_name: &str) -> bool {
    match manager.set_start_page(id, file_name) {
        Ok(true) => {
            println!("✓ Start page of '{}' is now '{}'", id, file_name);
            true
        }
        Ok(false) => {
            eprintln!("✗ Could not set start page to '{}'", file_name);
            false
        }
        Err(e) => {
            eprintln!("✗ Error setting start page: {}", e);
            false
        }
    }
}
