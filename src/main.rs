use anyhow::{bail, Context, Result};
use paralympics_db::{
    cli::{Cli, Commands, EventAction, RegionAction},
    config::Config,
    db::{events, regions},
    schema::table_names,
    startup::{open_store, seed},
};
use serde::Serialize;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paralympics_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse_args();

    if let Commands::ListTables = cli.command {
        println!("Available tables:\n");
        for name in table_names() {
            println!("  {}", name);
        }
        return Ok(());
    }

    let config = Config::load(cli.instance_dir)?;

    match cli.command {
        Commands::Init => {
            let config = config.with_overrides(cli.database, None, None);
            let db = open_store(&config).context("Failed to initialise database")?;
            println!("Database ready at {}", db.location());
        }

        Commands::Seed { regions, events } => {
            let start = Instant::now();
            let config = config.with_overrides(cli.database, regions, events);

            let (db, report) = seed(&config).context("Failed to seed database")?;

            println!("{}", report);
            println!(
                "\nSeeded {} in {:.1}s",
                db.location(),
                start.elapsed().as_secs_f64()
            );
            if !report.is_clean() {
                bail!("{} table(s) failed to load", report.errors().count());
            }
        }

        Commands::Regions { action } => {
            let config = config.with_overrides(cli.database, None, None);
            let db = open_store(&config)?;
            let conn = db.connection();
            match action {
                RegionAction::List => print_json(&regions::list(conn)?)?,
                RegionAction::Get(key) => match regions::get(conn, &key.noc)? {
                    Some(region) => print_json(&region)?,
                    None => bail!("No region with NOC {}", key.noc),
                },
            }
        }

        Commands::Events { action } => {
            let config = config.with_overrides(cli.database, None, None);
            let db = open_store(&config)?;
            let conn = db.connection();
            match action {
                EventAction::List { noc: None } => print_json(&events::list(conn)?)?,
                EventAction::List { noc: Some(noc) } => {
                    print_json(&events::list_by_noc(conn, &noc)?)?
                }
                EventAction::Get { id } => match events::get(conn, id)? {
                    Some(event) => print_json(&event)?,
                    None => bail!("No event with id {}", id),
                },
            }
        }

        Commands::ListTables => {}
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialise JSON")?;
    println!("{}", json);
    Ok(())
}
