mod args;

use args::{Cli, Command};
use clap::Parser;
use r2_explorer::{
    format_size, ActionEvent, ActionHandle, ActionRunner, KeyTree, ObjectStoreClient, R2Config,
    R2Error, R2Result, StorageUsageReport,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> R2Result<R2Config> {
    match path {
        Some(path) => R2Config::from_file(path),
        None => R2Config::from_env(),
    }
}

async fn run(cli: Cli) -> R2Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let client = Arc::new(ObjectStoreClient::new(&config)?);

    match cli.command {
        Command::Buckets => {
            for name in client.list_bucket_names().await? {
                println!("{}", name);
            }
        }
        Command::Ls { bucket, flat } => {
            let objects = client.list_objects(&bucket).await?;
            if flat {
                for object in &objects {
                    println!("{}\t{}", format_size(object.size), object.key);
                }
            } else {
                print_tree(&KeyTree::build(&objects));
            }
        }
        Command::Url { bucket, key } => {
            println!("{}", client.generate_presigned_url(&bucket, &key).await?);
        }
        Command::Rm { bucket, key } => {
            let (runner, events) = ActionRunner::new(client);
            let handle = runner.delete(&bucket, &key);
            drop(runner);
            finish(handle, events).await?;
        }
        Command::Get {
            bucket,
            key,
            destination,
        } => {
            let destination = match destination {
                Some(path) => path,
                None => default_destination(&key)?,
            };
            let (runner, events) = ActionRunner::new(client);
            let handle = runner.download(&bucket, &key, destination);
            drop(runner);
            finish(handle, events).await?;
        }
        Command::Put { bucket, file, key } => {
            let key = match key {
                Some(key) => key,
                None => file
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .ok_or_else(|| {
                        R2Error::Io(std::io::Error::new(
                            std::io::ErrorKind::InvalidInput,
                            format!("{} has no file name", file.display()),
                        ))
                    })?,
            };
            let (runner, events) = ActionRunner::new(client);
            let handle = runner.upload(&bucket, &key, file);
            drop(runner);
            finish(handle, events).await?;
        }
        Command::Usage { json } => {
            let report = client.compute_storage_usage().await?;
            if json {
                let out = UsageOutput {
                    buckets: &report,
                    total_bytes: report.total_bytes(),
                    total_mb: report.total_megabytes(),
                };
                let json = serde_json::to_string(&out).map_err(|e| R2Error::Io(e.into()))?;
                println!("{}", json);
            } else {
                for (bucket, bytes) in report.iter() {
                    println!("{:<40} {}", bucket, format_size(bytes));
                }
                println!("{:.2} MB", report.total_megabytes());
            }
        }
    }

    Ok(())
}

/// `usage --json` payload; buckets stay in listing order
#[derive(Serialize)]
struct UsageOutput<'a> {
    buckets: &'a StorageUsageReport,
    total_bytes: u64,
    total_mb: f64,
}

/// Print status events until the action reports back, then return its result.
async fn finish<T>(
    handle: ActionHandle<T>,
    mut events: UnboundedReceiver<ActionEvent>,
) -> R2Result<T> {
    while let Some(event) = events.recv().await {
        match &event.error {
            Some(err) => println!("{} {}: {} ({})", event.kind, event.target, event.status, err),
            None => println!("{} {}: {}", event.kind, event.target, event.status),
        }
    }
    handle.join().await
}

fn default_destination(key: &str) -> R2Result<PathBuf> {
    key.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| {
            R2Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("cannot derive a file name from key {:?}", key),
            ))
        })
}

fn print_tree(tree: &KeyTree) {
    println!("{:<60} {:>12}  {}", "Name", "Size", "Last Modified");
    for entry in tree.entries() {
        let name = format!("{}{}", "  ".repeat(entry.depth), entry.node.segment);
        println!(
            "{:<60} {:>12}  {}",
            name,
            entry.node.display_size.as_deref().unwrap_or(""),
            entry.node.last_modified.as_deref().unwrap_or("")
        );
    }
}
