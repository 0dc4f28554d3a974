use crate::config::AppConfig;
use crate::db::MongoStore;
use crate::seed::seed_sample_data;
use clap::Command;

pub fn cli() -> Command {
    Command::new("busline").subcommand(
        Command::new("seed")
            .about("Seed sample routes and trips unless trips already exist"),
    )
}

pub async fn handle_cli() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("seed", _)) => {
            let store = create_store().await?;
            let today = chrono::Local::now().date_naive();

            match seed_sample_data(&store, today).await {
                Ok(outcome) => println!("{}", outcome.message()),
                Err(e) => {
                    eprintln!("Failed to seed sample data: {}", e);
                    std::process::exit(1);
                }
            }
        }
        _ => {
            cli().print_help()?;
        }
    }

    Ok(())
}

async fn create_store() -> Result<MongoStore, Box<dyn std::error::Error>> {
    use std::env;

    let database_url = env::var("DATABASE_URL")
        .or_else(|_| env::var("MONGODB_URL"))
        .map_err(|_| "DATABASE_URL or MONGODB_URL must be set")?;

    let config = AppConfig::from_figment(&rocket::Config::figment())?;

    Ok(MongoStore::connect(&database_url, config.database).await?)
}
