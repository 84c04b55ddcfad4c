#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::{Context, Result};
use clap::Parser;
use fitstore::cli::{Cli, Cmd, ExerciseAction, UserAction};
use fitstore::dlog;
use fitstore::ingest::{self, IngestSummary};
use fitstore::service::Services;
use fitstore::store::{GatewayClient, GatewayConfig, Store};
use fitstore::types::{CaloriesData, GpsData, HeartRateData};
use fitstore::utils;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let config = GatewayConfig {
        base_url: cli.gateway_url,
        timeout: cli.timeout_secs.map(Duration::from_secs),
    };
    let client = GatewayClient::new(&config).context("Creating gateway HTTP client")?;
    dlog!(
        "mode=gateway url={} timeout={:?}",
        client.base_url(),
        config.timeout
    );

    let store: Arc<dyn Store> = Arc::new(client);
    let reachable = store.ping();
    if reachable {
        tracing::info!(url = %config.base_url, "connected to store gateway");
    } else {
        tracing::warn!(url = %config.base_url, "could not reach store gateway");
    }

    let services = Services::new(&store);

    match cli.cmd {
        Cmd::Ping => {
            if !reachable {
                anyhow::bail!("Store gateway at {} is unreachable", config.base_url);
            }
            println!("reachable");
            Ok(())
        }
        Cmd::Gps { action } => match action {
            ExerciseAction::Save { file } => {
                save_file(&file, |d: &GpsData| services.gps.save(d))
            }
            ExerciseAction::Get { exercise_id } => {
                print_json(&services.gps.get_by_exercise_id(&exercise_id)?)
            }
        },
        Cmd::HeartRate { action } => match action {
            ExerciseAction::Save { file } => {
                save_file(&file, |d: &HeartRateData| services.heart_rate.save(d))
            }
            ExerciseAction::Get { exercise_id } => {
                print_json(&services.heart_rate.get_by_exercise_id(&exercise_id)?)
            }
        },
        Cmd::Calories { action } => match action {
            UserAction::Save { file } => {
                save_file(&file, |d: &CaloriesData| services.calories.save(d))
            }
            UserAction::Get { user_id } => print_json(&services.calories.get_by_user_id(&user_id)?),
        },
    }
}

fn save_file<T: serde::de::DeserializeOwned>(
    file: &Path,
    save: impl Fn(&T) -> Result<(), fitstore::error::ServiceError>,
) -> Result<()> {
    let IngestSummary { saved, rejected } = ingest::ingest(file, save)?;
    println!("saved={saved} rejected={rejected}");
    if rejected > 0 {
        anyhow::bail!("{rejected} item(s) in {} failed validation", file.display());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
