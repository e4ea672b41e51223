//! Loader smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to run the bulk loader against the
//!   three bundled files and report the result, independently of the
//!   hosting application.

use std::fs::File;
use std::process::ExitCode;
use trailguide_core::{core_version, load_dataset, open_db_in_memory, SqliteResourceRouter};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [descriptions, routes, wildlife] = args.as_slice() else {
        eprintln!("usage: trailguide_cli <descriptions.csv> <routes.json> <wildlife.csv>");
        eprintln!("trailguide_core version={}", core_version());
        return ExitCode::FAILURE;
    };

    match run(descriptions, routes, wildlife) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("load failed: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(descriptions: &str, routes: &str, wildlife: &str) -> Result<(), String> {
    let conn = open_db_in_memory().map_err(|err| err.to_string())?;
    let router = SqliteResourceRouter::new(&conn);

    let summary = load_dataset(
        &router,
        open(descriptions)?,
        open(routes)?,
        open(wildlife)?,
    )
    .map_err(|err| err.to_string())?;

    println!(
        "loaded descriptions={} routes={} wildlife={} route_links={} skipped_rows={} skipped_links={}",
        summary.descriptions,
        summary.routes,
        summary.wildlife,
        summary.route_links,
        summary.skipped_rows,
        summary.skipped_links
    );
    Ok(())
}

fn open(path: &str) -> Result<File, String> {
    File::open(path).map_err(|err| format!("cannot open `{path}`: {err}"))
}
