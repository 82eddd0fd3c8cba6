/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;

mod input;
/// Input type for downloading a single object from Amazon S3
pub use input::{DownloadInput, DownloadInputBuilder};
mod output;
/// Output type for downloading a single object from Amazon S3
pub use output::{DownloadOutput, DownloadOutputBuilder};

mod handle;
pub use handle::DownloadHandle;

mod worker;

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::progress::{NullProgress, ProgressListener};

use super::{validate_target_is_dir, TransferContext};

/// Operation struct for downloading a single object from Amazon S3
#[derive(Clone, Default, Debug)]
pub(crate) struct Download;

impl Download {
    /// Execute a single `Download` transfer operation
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: DownloadInput,
    ) -> Result<DownloadHandle, crate::error::Error> {
        let destination = input.destination().expect("destination set");
        validate_target_is_dir(destination).await?;

        let ctx = DownloadContext::new(handle, input);

        let mut tasks = JoinSet::new();
        tasks.spawn(
            worker::download_object(ctx.clone())
                .instrument(tracing::debug_span!("object-download")),
        );

        Ok(DownloadHandle { tasks, ctx })
    }
}

/// Download operation specific state
#[derive(Debug)]
pub(crate) struct DownloadState {
    input: DownloadInput,
    bytes_transferred: AtomicU64,
    cancel_tx: watch::Sender<bool>,
    cancel_rx: watch::Receiver<bool>,
}

impl DownloadState {
    fn progress(&self) -> &dyn ProgressListener {
        match self.input.progress_listener() {
            Some(listener) => listener.as_ref(),
            None => &NullProgress,
        }
    }
}

pub(crate) type DownloadContext = TransferContext<DownloadState>;

impl DownloadContext {
    pub(crate) fn new(handle: Arc<crate::client::Handle>, input: DownloadInput) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let state = Arc::new(DownloadState {
            input,
            bytes_transferred: AtomicU64::default(),
            cancel_tx,
            cancel_rx,
        });
        TransferContext { handle, state }
    }
}
