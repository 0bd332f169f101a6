//! Interactive listing session driven by line commands on stdin.

use std::io::Write as _;

use client_core::ListingController;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render;

const HELP: &str = "commands: n (next page), p (previous page), g N (go to page N), \
s TERM (search), c (clear search), r (retry), q (quit)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Prev,
    Goto(u32),
    Search(String),
    Clear,
    Retry,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match head {
        "n" | "next" => Ok(BrowseCommand::Next),
        "p" | "prev" => Ok(BrowseCommand::Prev),
        "g" | "goto" => rest
            .parse::<u32>()
            .ok()
            .filter(|page| *page > 0)
            .map(BrowseCommand::Goto)
            .ok_or_else(|| format!("expected a page number, got {rest:?}")),
        "s" | "search" => Ok(BrowseCommand::Search(rest.to_string())),
        "c" | "clear" => Ok(BrowseCommand::Clear),
        "r" | "retry" => Ok(BrowseCommand::Retry),
        "h" | "help" | "?" => Ok(BrowseCommand::Help),
        "q" | "quit" | "exit" => Ok(BrowseCommand::Quit),
        "" => Err(HELP.to_string()),
        other => Err(format!("unknown command {other:?}; {HELP}")),
    }
}

enum Flow {
    Continue,
    Quit,
}

fn apply(listing: &mut ListingController, command: BrowseCommand) -> Flow {
    debug!(?command, "browse command");
    match command {
        BrowseCommand::Quit => return Flow::Quit,
        BrowseCommand::Help => println!("{HELP}"),
        BrowseCommand::Next => match listing.next_page() {
            Some(page) => listing.set_page(page),
            None => println!("Already on the last page."),
        },
        BrowseCommand::Prev => match listing.prev_page() {
            Some(page) => listing.set_page(page),
            None => println!("Already on the first page."),
        },
        BrowseCommand::Goto(page) => {
            let total = listing.known_total_pages().unwrap_or(0);
            if total > 0 && page > total {
                println!("Page {page} is out of range (1-{total}).");
            } else {
                listing.set_page(page - 1);
            }
        }
        BrowseCommand::Search(term) => listing.submit_search(&term),
        BrowseCommand::Clear => listing.clear_search(),
        BrowseCommand::Retry => {
            if !listing.retry() {
                println!("Nothing to retry.");
            }
        }
    }
    Flow::Continue
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Runs the session until `q` or end of input. Commands typed while a page
/// is still loading supersede it.
pub async fn run(mut listing: ListingController) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");
    listing.mount();
    print!("{}", render::listing(&listing));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(command) => {
                        if let Flow::Quit = apply(&mut listing, command) {
                            break;
                        }
                        if listing.is_loading() {
                            println!("Loading...");
                        } else {
                            print!("{}", render::listing(&listing));
                            prompt();
                        }
                    }
                    Err(message) => {
                        println!("{message}");
                        prompt();
                    }
                }
            }
            _ = async { listing.settle().await; }, if listing.is_loading() => {
                print!("{}", render::listing(&listing));
                prompt();
            }
        }
    }

    listing.unmount();
    Ok(())
}
