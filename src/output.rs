use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

use crate::error::Result;
use crate::model::{Alternative, LinkState, Record};

const PREFIX: &str = "update-alternatives";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
}

/// Progress line on stdout.
pub fn info(msg: &str) {
    println!("{PREFIX}: {msg}");
}

/// Advisory condition; the operation continues.
pub fn warn(msg: &str) {
    eprintln!("{} {PREFIX}: {msg}", "Warn:".yellow().bold());
}

/// Failure the operator must see; whether it aborts is up to the caller.
pub fn error(msg: &str) {
    eprintln!("{} {PREFIX}: {msg}", "Error:".red().bold());
}

/// Everything `--display` reports about a name.
#[derive(Debug, Serialize)]
pub struct Display<'a> {
    pub name: &'a str,
    pub link: &'a str,
    pub link_state: &'a LinkState,
    pub best: Option<&'a Alternative>,
    pub alternatives: &'a [Alternative],
}

impl<'a> Display<'a> {
    pub fn new(
        name: &'a str,
        record: &'a Record,
        best: Option<&'a Alternative>,
        link_state: &'a LinkState,
    ) -> Self {
        Self {
            name,
            link: &record.link,
            link_state,
            best,
            alternatives: &record.alternatives,
        }
    }
}

pub fn print_display(display: &Display<'_>, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(display)?),
        Format::Pretty => {
            println!("{} - {}", display.name.bold(), display.link);
            println!("  link currently {}", display.link_state);
            match display.best {
                Some(best) => println!(
                    "  best: {} (priority {})",
                    best.target.green(),
                    best.priority
                ),
                None => println!("  best: none"),
            }
            for alt in display.alternatives {
                let marker = if display.best == Some(alt) { "*" } else { " " };
                println!("  {marker} {:>6}  {}", alt.priority, alt.target);
            }
        }
    }
    Ok(())
}
