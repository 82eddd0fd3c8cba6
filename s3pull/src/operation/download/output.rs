/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Output type for downloading a single object
#[non_exhaustive]
#[derive(Debug)]
pub struct DownloadOutput {
    /// Total number of bytes written to the local file
    pub bytes_transferred: u64,

    /// Whether the transfer was cancelled before running to completion
    pub cancelled: bool,
}

impl DownloadOutput {
    /// Creates a new builder-style object to manufacture [`DownloadOutput`](crate::operation::download::DownloadOutput).
    pub fn builder() -> DownloadOutputBuilder {
        DownloadOutputBuilder::default()
    }

    /// The number of bytes written to the local file
    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }

    /// Whether the transfer was cancelled before running to completion
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Whether the transfer fully completed without interruption
    pub fn succeeded(&self) -> bool {
        !self.cancelled
    }
}

/// A builder for [`DownloadOutput`](crate::operation::download::DownloadOutput).
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct DownloadOutputBuilder {
    pub(crate) bytes_transferred: u64,
    pub(crate) cancelled: bool,
}

impl DownloadOutputBuilder {
    /// The number of bytes written to the local file
    pub fn bytes_transferred(mut self, input: u64) -> Self {
        self.bytes_transferred = input;
        self
    }

    /// Whether the transfer was cancelled before running to completion
    pub fn cancelled(mut self, input: bool) -> Self {
        self.cancelled = input;
        self
    }

    /// Consume the builder and return the output
    pub fn build(self) -> DownloadOutput {
        DownloadOutput {
            bytes_transferred: self.bytes_transferred,
            cancelled: self.cancelled,
        }
    }
}
