/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;

mod input;
/// Input type for downloading multiple objects from Amazon S3
pub use input::{DownloadObjectsInput, DownloadObjectsInputBuilder};
mod output;
/// Output type for downloading multiple objects from Amazon S3
pub use output::{DownloadObjectsOutput, DownloadObjectsOutputBuilder};

mod handle;
pub use handle::DownloadObjectsHandle;

mod list_objects;
mod worker;

use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::progress::{NullProgress, ProgressListener};
use crate::types::FailedDownload;

use super::{validate_target_is_dir, TransferContext};

/// Operation struct for downloading multiple objects from Amazon S3
#[derive(Clone, Default, Debug)]
pub(crate) struct DownloadObjects;

impl DownloadObjects {
    /// Execute a single `DownloadObjects` transfer operation
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: DownloadObjectsInput,
    ) -> Result<DownloadObjectsHandle, crate::error::Error> {
        let destination = input.destination().expect("destination set");
        validate_target_is_dir(destination).await?;

        let concurrency = handle.num_workers();
        let ctx = DownloadObjectsContext::new(handle, input);

        // spawn all work into the same JoinSet. The lister counts the prefix
        // first, then re-enumerates and feeds jobs into a bounded channel
        // that the workers drain.
        let mut tasks = JoinSet::new();
        let (work_tx, work_rx) = async_channel::bounded(concurrency);

        tasks.spawn(worker::discover_objects(ctx.clone(), work_tx));

        for i in 0..concurrency {
            let worker = worker::download_objects(ctx.clone(), work_rx.clone())
                .instrument(tracing::debug_span!("object-downloader", worker = i));
            tasks.spawn(worker);
        }

        let handle = DownloadObjectsHandle { tasks, ctx };
        Ok(handle)
    }
}

/// DownloadObjects operation specific state
#[derive(Debug)]
pub(crate) struct DownloadObjectsState {
    input: DownloadObjectsInput,
    failed_downloads: Mutex<Vec<FailedDownload>>,
    successful_downloads: AtomicU64,
    total_bytes_transferred: AtomicU64,
    objects_total: AtomicU64,
    cancel_tx: watch::Sender<bool>,
    cancel_rx: watch::Receiver<bool>,
}

impl DownloadObjectsState {
    fn progress(&self) -> &dyn ProgressListener {
        match self.input.progress_listener() {
            Some(listener) => listener.as_ref(),
            None => &NullProgress,
        }
    }
}

pub(crate) type DownloadObjectsContext = TransferContext<DownloadObjectsState>;

impl DownloadObjectsContext {
    pub(crate) fn new(handle: Arc<crate::client::Handle>, input: DownloadObjectsInput) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let state = Arc::new(DownloadObjectsState {
            input,
            failed_downloads: Mutex::new(Vec::new()),
            successful_downloads: AtomicU64::default(),
            total_bytes_transferred: AtomicU64::default(),
            objects_total: AtomicU64::default(),
            cancel_tx,
            cancel_rx,
        });
        TransferContext { handle, state }
    }
}
