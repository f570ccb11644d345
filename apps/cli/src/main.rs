//! filesharer CLI entry point.
//!
//! `filesharer <file-path>` uploads one file in concurrent chunks and
//! prints the shareable link on success.

mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use filesharer_api_client::{DEFAULT_TIMEOUT, build_http_client};
use filesharer_uploader::{FileDescriptor, RemoteUploadApi, UploadEvent, UploadOrchestrator};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging. User-facing output goes to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let Some(file_path) = std::env::args().nth(1) else {
        eprintln!("usage: filesharer <file-path>");
        std::process::exit(2);
    };
    let file_path = PathBuf::from(file_path);

    let config = config::Config::load(Path::new("appsettings.json"))?;
    tracing::info!(
        base_url = %config.base_url,
        concurrent_uploads = config.concurrent_uploads,
        "configuration loaded"
    );

    let file = FileDescriptor::from_path(&file_path)?;
    println!("Preparing: {}", file.name);
    println!("Size: {:.2} MB", file.size as f64 / (1024.0 * 1024.0));

    let http = build_http_client(&config.api_key, DEFAULT_TIMEOUT)?;
    let api = Arc::new(RemoteUploadApi::new(http, &config.base_url));
    let mut orchestrator =
        UploadOrchestrator::new(api, config.concurrent_uploads, config.expiry.as_str());

    let printer = orchestrator.take_events().map(|mut events| {
        tokio::spawn(async move {
            let mut transmit_started: Option<Instant> = None;
            while let Some(event) = events.recv().await {
                match event {
                    UploadEvent::Hashing => println!("Calculating file hash..."),
                    UploadEvent::Hashed { digest } => println!("Hash: {digest}"),
                    UploadEvent::SessionStarted {
                        upload_id,
                        total_chunks,
                        ..
                    } => {
                        println!("Session started. Upload ID: {upload_id}, chunks: {total_chunks}");
                        transmit_started = Some(Instant::now());
                    }
                    UploadEvent::ChunkCompleted { completed, total } => {
                        let percentage = completed as f64 / total as f64 * 100.0;
                        println!("Chunk {completed}/{total} ({percentage:.2}%) uploaded.");
                    }
                    UploadEvent::Finalizing => {
                        if let Some(started) = transmit_started {
                            println!(
                                "All chunks uploaded in {:.2} seconds.",
                                started.elapsed().as_secs_f64()
                            );
                        }
                        println!("Finalizing upload...");
                    }
                    UploadEvent::Completed { .. } => {}
                }
            }
        })
    });

    let result = orchestrator.upload(&file_path).await?;
    drop(orchestrator);
    if let Some(printer) = printer {
        let _ = printer.await;
    }

    println!();
    println!("--- UPLOAD SUCCESSFUL ---");
    println!("File name: {}", result.file_name);
    println!("Download link: {}", result.link);
    println!("Will be deleted on: {}", result.delete_date);
    println!("-------------------------");

    Ok(())
}
