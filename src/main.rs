//! drs-config CLI
//!
//! Loads the layered configuration (default document, optional user
//! document, site/include layers) and prints resolved settings and
//! project data reference syntax entries.

use anyhow::{Context, Result, bail};
use clap::Parser;
use drs_config::cli::{Cli, Command};
use drs_config::schema::PROJECT_KEYS;
use drs_config::service::{ConfigPaths, ConfigService};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to initialize logging")?;

    let mut paths = ConfigPaths::discover();
    if let Some(path) = cli.default_config {
        paths.default_file = path;
    }
    // An explicitly requested user file must exist.
    let strict_user = cli.user_config.is_some();
    if let Some(path) = cli.user_config {
        paths.user_file = Some(path);
    }

    let service = if strict_user {
        ConfigService::init_strict(paths)
    } else {
        ConfigService::init(paths)
    }
    .context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Show {
        pattern: None,
        json: false,
    }) {
        Command::Show { pattern, json } => {
            let config = match pattern {
                Some(pattern) => service.config().find_all(&pattern)?,
                None => service.config().clone(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("{config}");
            }
        }

        Command::Get { key } => match service.get(&key) {
            Some(value) => println!("{value}"),
            None => bail!("no such configuration key `{key}`"),
        },

        Command::Projects { name } => {
            let keys: Vec<&str> = match &name {
                Some(name) => vec![name.as_str()],
                None => PROJECT_KEYS.to_vec(),
            };
            for key in keys {
                let Some(project) = service.project(key) else {
                    if name.is_some() {
                        bail!("no project data for `{key}`");
                    }
                    continue;
                };
                println!("{}:", project.name());
                println!("  output_file: {}", project.output_file());
                for record in project.data() {
                    println!("  - rootpath: {}", record.rootpath().display());
                    println!("    input_dir: {}", record.input_dir());
                    println!("    input_file: {}", record.input_file());
                }
            }
        }

        Command::Validate => {
            println!("configuration OK ({} keys)", service.config().len());
        }
    }

    Ok(())
}
