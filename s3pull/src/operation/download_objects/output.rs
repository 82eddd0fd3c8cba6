/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::FailedDownload;

/// Output type for downloading multiple objects
#[non_exhaustive]
#[derive(Debug)]
pub struct DownloadObjectsOutput {
    /// The number of objects that were successfully downloaded
    pub objects_downloaded: u64,

    /// The number of downloadable objects counted before dispatch began.
    ///
    /// Advisory: the actual enumerated set may drift from this count when
    /// the bucket changes between the counting and dispatch passes, and the
    /// count itself is partial when the run was cancelled mid-enumeration.
    pub objects_total: u64,

    /// A list of failed object transfers
    pub failed_transfers: Vec<FailedDownload>,

    /// Whether the operation was cancelled before running to completion
    pub cancelled: bool,

    /// Total number of bytes transferred
    pub total_bytes_transferred: u64,
}

impl DownloadObjectsOutput {
    /// Creates a new builder-style object to manufacture [`DownloadObjectsOutput`](crate::operation::download_objects::DownloadObjectsOutput).
    pub fn builder() -> DownloadObjectsOutputBuilder {
        DownloadObjectsOutputBuilder::default()
    }

    /// The number of objects that were successfully downloaded
    pub fn objects_downloaded(&self) -> u64 {
        self.objects_downloaded
    }

    /// The number of downloadable objects counted before dispatch began
    pub fn objects_total(&self) -> u64 {
        self.objects_total
    }

    /// A slice of failed object transfers
    pub fn failed_transfers(&self) -> &[FailedDownload] {
        &self.failed_transfers
    }

    /// Whether the operation was cancelled before running to completion
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// The number of bytes successfully transferred (downloaded)
    pub fn total_bytes_transferred(&self) -> u64 {
        self.total_bytes_transferred
    }

    /// Whether every enumerated object downloaded without interruption
    pub fn succeeded(&self) -> bool {
        !self.cancelled && self.failed_transfers.is_empty()
    }
}

/// A builder for [`DownloadObjectsOutput`](crate::operation::download_objects::DownloadObjectsOutput).
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct DownloadObjectsOutputBuilder {
    pub(crate) objects_downloaded: u64,
    pub(crate) objects_total: u64,
    pub(crate) failed_transfers: Vec<FailedDownload>,
    pub(crate) cancelled: bool,
    pub(crate) total_bytes_transferred: u64,
}

impl DownloadObjectsOutputBuilder {
    /// The number of objects that were successfully downloaded
    pub fn objects_downloaded(mut self, input: u64) -> Self {
        self.objects_downloaded = input;
        self
    }

    /// The number of downloadable objects counted before dispatch began
    pub fn objects_total(mut self, input: u64) -> Self {
        self.objects_total = input;
        self
    }

    /// Append a failed transfer.
    ///
    /// To override the contents of this collection use
    /// [`set_failed_transfers`](Self::set_failed_transfers)
    pub fn failed_transfers(mut self, input: FailedDownload) -> Self {
        self.failed_transfers.push(input);
        self
    }

    /// A list of failed object transfers
    pub fn set_failed_transfers(mut self, input: Vec<FailedDownload>) -> Self {
        self.failed_transfers = input;
        self
    }

    /// Whether the operation was cancelled before running to completion
    pub fn cancelled(mut self, input: bool) -> Self {
        self.cancelled = input;
        self
    }

    /// The number of bytes successfully transferred (downloaded)
    pub fn total_bytes_transferred(mut self, input: u64) -> Self {
        self.total_bytes_transferred = input;
        self
    }

    /// Consume the builder and return the output
    pub fn build(self) -> DownloadObjectsOutput {
        DownloadObjectsOutput {
            objects_downloaded: self.objects_downloaded,
            objects_total: self.objects_total,
            failed_transfers: self.failed_transfers,
            cancelled: self.cancelled,
            total_bytes_transferred: self.total_bytes_transferred,
        }
    }
}
