/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::mem;
use std::sync::atomic::Ordering;

use tokio::task;

use crate::error::ErrorKind;
use crate::types::AbortHandle;

use super::{DownloadObjectsContext, DownloadObjectsOutput};

/// Handle for `DownloadObjects` transfer operation
#[derive(Debug)]
#[non_exhaustive]
pub struct DownloadObjectsHandle {
    /// All child tasks spawned for this download
    pub(crate) tasks: task::JoinSet<Result<(), crate::error::Error>>,
    /// The context used to drive the downloads to completion
    pub(crate) ctx: DownloadObjectsContext,
}

impl DownloadObjectsHandle {
    /// An [`AbortHandle`] that cancels this operation cooperatively.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            cancel_tx: self.ctx.state.cancel_tx.clone(),
        }
    }

    /// Consume the handle and wait for the download transfer to complete.
    ///
    /// Every spawned task is drained before this returns: cancelled workers
    /// stop pulling new jobs but jobs already streaming run to their own
    /// next cancellation check, and a fatal enumeration error is surfaced
    /// only after in-flight transfers have settled. Cancellation itself is
    /// not an error; the output reports it along with whatever counts
    /// accumulated.
    #[tracing::instrument(skip_all, level = "debug", name = "download-objects-join")]
    pub async fn join(mut self) -> Result<DownloadObjectsOutput, crate::error::Error> {
        let mut fatal: Option<crate::error::Error> = None;

        // join all tasks
        while let Some(join_result) = self.tasks.join_next().await {
            match join_result? {
                Ok(()) => {}
                Err(err) if err.kind() == &ErrorKind::OperationCancelled => {}
                Err(err) => {
                    // dropping the JoinSet would abort transfers mid-write;
                    // remember the error and keep draining instead
                    fatal.get_or_insert(err);
                }
            }
        }

        let state = &self.ctx.state;
        state.progress().finish();

        if let Some(err) = fatal {
            return Err(err);
        }

        let failed_downloads = mem::take(&mut *state.failed_downloads.lock().unwrap());
        let output = DownloadObjectsOutput::builder()
            .objects_downloaded(state.successful_downloads.load(Ordering::SeqCst))
            .objects_total(state.objects_total.load(Ordering::SeqCst))
            .set_failed_transfers(failed_downloads)
            .cancelled(*state.cancel_rx.borrow())
            .total_bytes_transferred(state.total_bytes_transferred.load(Ordering::SeqCst))
            .build();

        Ok(output)
    }
}
