//! Standalone schema-creation tool.
//!
//! # Responsibility
//! - Open and migrate an empty MoneyManager schema at a destination path.
//! - Keep exit codes script-friendly: 0 on success, 1 otherwise.

use moneymanager_core::{DatabaseFactory, FileDriverFactory, Location};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let mut args = std::env::args_os().skip(1);
    let path = match (args.next(), args.next()) {
        (Some(path), None) => PathBuf::from(path),
        _ => {
            eprintln!("usage: moneymanager_schema <destination-path>");
            return ExitCode::FAILURE;
        }
    };

    let factory = DatabaseFactory::new(Arc::new(FileDriverFactory::new()));
    match factory.open(&Location::File(path.clone())) {
        Ok(database) => {
            database.close();
            println!("schema ready at {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to create schema at {}: {err}", path.display());
            ExitCode::FAILURE
        }
    }
}
