/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::atomic::Ordering;

use tokio::task;

use crate::error::ErrorKind;
use crate::types::AbortHandle;

use super::{DownloadContext, DownloadOutput};

/// Handle for the `Download` transfer operation
#[derive(Debug)]
#[non_exhaustive]
pub struct DownloadHandle {
    /// All child tasks spawned for this download
    pub(crate) tasks: task::JoinSet<Result<(), crate::error::Error>>,
    /// The context used to drive the download to completion
    pub(crate) ctx: DownloadContext,
}

impl DownloadHandle {
    /// An [`AbortHandle`] that cancels this transfer cooperatively.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            cancel_tx: self.ctx.state.cancel_tx.clone(),
        }
    }

    /// Consume the handle and wait for the download to complete.
    ///
    /// Cancellation is reported through the output rather than as an error;
    /// a transfer failure propagates as `Err`.
    #[tracing::instrument(skip_all, level = "debug", name = "download-join")]
    pub async fn join(mut self) -> Result<DownloadOutput, crate::error::Error> {
        let mut fatal: Option<crate::error::Error> = None;

        while let Some(join_result) = self.tasks.join_next().await {
            match join_result? {
                Ok(()) => {}
                Err(err) if err.kind() == &ErrorKind::OperationCancelled => {}
                Err(err) => {
                    fatal.get_or_insert(err);
                }
            }
        }

        let state = &self.ctx.state;
        state.progress().finish();

        if let Some(err) = fatal {
            return Err(err);
        }

        let output = DownloadOutput::builder()
            .bytes_transferred(state.bytes_transferred.load(Ordering::SeqCst))
            .cancelled(*state.cancel_rx.borrow())
            .build();

        Ok(output)
    }
}
