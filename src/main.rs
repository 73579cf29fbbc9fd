//! telcotag CLI - find Telco case bugzillas missing the `Telco` whiteboard tag.

use clap::Parser;
use std::io;
use std::process;
use std::time::Instant;
use tracing::info;

use telcotag::bugzilla::RestBugzilla;
use telcotag::cli::Cli;
use telcotag::commands;
use telcotag::config::{OutputFormat, Settings};
use telcotag::logging;
use telcotag::portal::PortalClient;

fn main() {
    let cli = Cli::parse();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    logging::init();

    let start = Instant::now();
    let result = run(cli);

    if let Err(e) = result {
        match format {
            OutputFormat::Human => eprintln!("Error: {}", e),
            OutputFormat::Json => {
                eprintln!("{}", serde_json::json!({ "error": e.to_string() }))
            }
        }
        process::exit(1);
    }

    info!("done in {:.3} seconds", start.elapsed().as_secs_f64());
}

fn run(cli: Cli) -> Result<(), telcotag::Error> {
    let settings = Settings::from_cli(cli)?;
    let portal = PortalClient::new(settings.endpoints.clone());
    let tracker = RestBugzilla::new(&settings.endpoints.bugzilla_base_url, &settings.bz_key);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = commands::run(&settings, &portal, &tracker, &mut out)?;

    info!(
        cases = summary.cases,
        untagged = summary.untagged_bugs.len(),
        tagged = summary.tagged,
        "run complete"
    );
    Ok(())
}
