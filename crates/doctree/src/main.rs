/// CLI module - command-line interface for doctree
mod cli;

fn main() {
    cli::run_cli();
}
