/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use aws_sdk_s3::error::DisplayErrorContext;
use clap::Parser;
use tokio::fs;

use s3pull::error::Error;
use s3pull::location::Location;
use s3pull::progress::{ProgressListener, TransferProgressBar};
use s3pull::types::{AbortHandle, ConcurrencySetting, TransferKind};
use s3pull::{Client, Config};

#[derive(Debug, Clone, Parser)]
#[command(name = "s3pull")]
#[command(about = "Download a single object or every object under a prefix from S3-compatible storage.")]
struct Args {
    /// Storage URL, e.g. s3://bucket-name/folder/ or
    /// https://bucket-name.s3.region.amazonaws.com/folder/
    #[arg(required = true)]
    location: String,

    /// Shared config profile to resolve credentials from
    #[arg(long, short = 'p')]
    profile: Option<String>,

    /// Access key ID, paired with --secret-key
    #[arg(long, requires = "secret_key")]
    access_key: Option<String>,

    /// Secret access key, paired with --access-key
    #[arg(long, requires = "access_key")]
    secret_key: Option<String>,

    /// Region to use instead of resolving one from the environment
    #[arg(long, short = 'r')]
    region: Option<String>,

    /// Local output directory
    #[arg(long, short = 'o', default_value = ".")]
    output_dir: PathBuf,

    /// Maximum number of concurrent downloads
    #[arg(long, short = 'w', default_value_t = 5)]
    max_workers: usize,

    /// Send unsigned requests, for public buckets
    #[arg(long, short = 'a', default_value_t = false, action = clap::ArgAction::SetTrue)]
    anonymous: bool,

    /// Recreate the full remote key path under the output directory
    #[arg(long, short = 'k', default_value_t = false, action = clap::ArgAction::SetTrue)]
    keep_structure: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("s3pull: {}", DisplayErrorContext(err));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<bool, Error> {
    let location = Location::parse(&args.location)?;

    if args.profile.is_some() && args.access_key.is_some() {
        tracing::warn!("both a profile and access keys were provided, the access keys take precedence");
    }

    let mut loader = Config::loader()
        .anonymous(args.anonymous)
        .concurrency(ConcurrencySetting::Explicit(args.max_workers));
    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        loader = loader.credentials(access_key, secret_key);
    }
    if let Some(profile) = &args.profile {
        loader = loader.profile(profile);
    }
    if let Some(region) = &args.region {
        loader = loader.region(region);
    }

    let client = Client::new(loader.load().await);

    fs::create_dir_all(&args.output_dir).await?;

    match client.transfer_kind(&location).await? {
        TransferKind::Object => download_object(&args, &client, &location).await,
        TransferKind::Prefix => download_prefix(&args, &client, &location).await,
    }
}

/// Spawn a task that flips the abort handle on the first interrupt. The
/// handler does nothing else; every loop in the engine notices the flag on
/// its own.
fn abort_on_interrupt(abort_handle: AbortHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping new transfers");
            abort_handle.abort();
        }
    });
}

async fn download_object(args: &Args, client: &Client, location: &Location) -> Result<bool, Error> {
    println!(
        "downloading s3://{}/{} to {}",
        location.bucket(),
        location.key(),
        args.output_dir.display()
    );

    let progress = Arc::new(TransferProgressBar::bytes(location.key()));

    let handle = client
        .download()
        .bucket(location.bucket())
        .key(location.key())
        .destination(&args.output_dir)
        .keep_structure(args.keep_structure)
        .set_progress_listener(Some(progress.clone() as Arc<dyn ProgressListener>))
        .send()
        .await?;

    abort_on_interrupt(handle.abort_handle());

    match handle.join().await {
        Ok(output) if output.is_cancelled() => {
            println!(
                "interrupted: downloaded 0/1 objects ({} bytes) to {}",
                output.bytes_transferred(),
                args.output_dir.display()
            );
            Ok(false)
        }
        Ok(output) => {
            println!(
                "downloaded 1/1 objects ({} bytes) to {}",
                output.bytes_transferred(),
                args.output_dir.display()
            );
            Ok(true)
        }
        Err(err) => {
            eprintln!("s3pull: {}", DisplayErrorContext(err));
            println!("downloaded 0/1 objects to {}", args.output_dir.display());
            Ok(false)
        }
    }
}

async fn download_prefix(args: &Args, client: &Client, location: &Location) -> Result<bool, Error> {
    println!(
        "downloading s3://{}/{} to {}",
        location.bucket(),
        location.key(),
        args.output_dir.display()
    );
    if args.keep_structure {
        println!("keeping the full directory structure");
    } else {
        println!("downloading only the files under the given prefix");
    }

    let progress = Arc::new(TransferProgressBar::files("downloading"));

    let handle = client
        .download_objects()
        .bucket(location.bucket())
        .key_prefix(location.key())
        .destination(&args.output_dir)
        .keep_structure(args.keep_structure)
        .set_progress_listener(Some(progress.clone() as Arc<dyn ProgressListener>))
        .send()
        .await?;

    abort_on_interrupt(handle.abort_handle());

    let output = match handle.join().await {
        Ok(output) => output,
        Err(err) => {
            eprintln!("s3pull: {}", DisplayErrorContext(err));
            println!(
                "downloaded {} files to {} before the failure",
                progress.position(),
                args.output_dir.display()
            );
            return Ok(false);
        }
    };

    for failure in output.failed_transfers() {
        eprintln!("s3pull: failed to download {:?}: {}", failure.key(), failure.error());
    }

    if output.is_cancelled() {
        println!(
            "interrupted: downloaded {}/{} files to {}",
            output.objects_downloaded(),
            output.objects_total(),
            args.output_dir.display()
        );
    } else {
        println!(
            "downloaded {}/{} files to {}",
            output.objects_downloaded(),
            output.objects_total(),
            args.output_dir.display()
        );
    }

    Ok(output.succeeded())
}
