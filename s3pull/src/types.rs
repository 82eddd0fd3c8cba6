/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use tokio::sync::watch;

/// What a resolved location refers to in the store.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransferKind {
    /// The key names exactly one downloadable object
    Object,

    /// The key is a prefix enumerated for a folder-style download
    Prefix,
}

/// The concurrency settings to use for a prefix download.
#[derive(Debug, Clone, Default)]
pub enum ConcurrencySetting {
    /// Use the crate default number of workers.
    #[default]
    Auto,

    /// Explicitly configured number of workers.
    Explicit(usize),
}

/// Detailed information about a failed object download
#[non_exhaustive]
#[derive(Debug)]
pub struct FailedDownload {
    /// The key of the object that failed to download
    pub(crate) key: String,

    /// The error encountered downloading the object
    pub(crate) error: crate::error::Error,
}

impl FailedDownload {
    /// The key of the object that failed to download
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The error encountered downloading the object
    pub fn error(&self) -> &crate::error::Error {
        &self.error
    }
}

/// Requests cancellation of an in-flight operation.
///
/// Obtained from an operation handle. Aborting is cooperative: loops stop
/// before starting new pages, jobs, or chunks; a transfer already streaming
/// finishes its current chunk first. Calling [`abort`](AbortHandle::abort)
/// more than once is a no-op.
#[derive(Debug, Clone)]
pub struct AbortHandle {
    pub(crate) cancel_tx: watch::Sender<bool>,
}

impl AbortHandle {
    /// Signal every loop and worker of the owning operation to stop.
    pub fn abort(&self) {
        // send only fails when all receivers are gone, i.e. the operation
        // already finished and there is nothing left to cancel
        let _ = self.cancel_tx.send(true);
    }
}
