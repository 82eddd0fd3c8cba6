/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::progress::ProgressListener;
use aws_smithy_types::error::operation::BuildError;

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Input type for downloading a single object
#[non_exhaustive]
#[derive(Clone)]
pub struct DownloadInput {
    /// The bucket name containing the object.
    pub bucket: Option<String>,

    /// The key of the object to download.
    pub key: Option<String>,

    /// The destination directory the file is written into
    pub destination: Option<PathBuf>,

    /// Recreate the full remote key under the destination instead of using
    /// only the final path segment
    pub keep_structure: bool,

    /// Listener notified of the object size and of each chunk written
    pub progress_listener: Option<Arc<dyn ProgressListener>>,
}

impl DownloadInput {
    /// Creates a new builder-style object to manufacture [`DownloadInput`](crate::operation::download::DownloadInput).
    pub fn builder() -> DownloadInputBuilder {
        DownloadInputBuilder::default()
    }

    /// The bucket name containing the object.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The key of the object to download.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The destination directory the file is written into
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Whether the full remote key is recreated under the destination
    pub fn keep_structure(&self) -> bool {
        self.keep_structure
    }

    /// Listener notified of the object size and of each chunk written
    pub fn progress_listener(&self) -> Option<&Arc<dyn ProgressListener>> {
        self.progress_listener.as_ref()
    }
}

impl fmt::Debug for DownloadInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = f.debug_struct("DownloadInput");
        formatter.field("bucket", &self.bucket);
        formatter.field("key", &self.key);
        formatter.field("destination", &self.destination);
        formatter.field("keep_structure", &self.keep_structure);
        formatter.field("progress_listener", &self.progress_listener.is_some());
        formatter.finish()
    }
}

/// A builder for [`DownloadInput`](crate::operation::download::DownloadInput).
#[non_exhaustive]
#[derive(Clone, Default)]
pub struct DownloadInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) destination: Option<PathBuf>,
    pub(crate) keep_structure: bool,
    pub(crate) progress_listener: Option<Arc<dyn ProgressListener>>,
}

impl DownloadInputBuilder {
    /// Set the bucket name containing the object to download.
    ///
    /// NOTE: A bucket name is required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// Set the bucket name containing the object to download.
    ///
    /// NOTE: A bucket name is required.
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.bucket = input;
        self
    }

    /// The bucket name containing the object.
    pub fn get_bucket(&self) -> &Option<String> {
        &self.bucket
    }

    /// Set the key of the object to download.
    ///
    /// NOTE: A key is required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// Set the key of the object to download.
    ///
    /// NOTE: A key is required.
    pub fn set_key(mut self, input: Option<String>) -> Self {
        self.key = input;
        self
    }

    /// The key of the object to download.
    pub fn get_key(&self) -> &Option<String> {
        &self.key
    }

    /// Set the destination directory the file is written into
    ///
    /// NOTE: A destination directory is required.
    pub fn destination(mut self, input: impl Into<PathBuf>) -> Self {
        self.destination = Some(input.into());
        self
    }

    /// Set the destination directory the file is written into
    ///
    /// NOTE: A destination directory is required.
    pub fn set_destination(mut self, input: Option<PathBuf>) -> Self {
        self.destination = input;
        self
    }

    /// The destination directory the file is written into
    pub fn get_destination(&self) -> &Option<PathBuf> {
        &self.destination
    }

    /// Recreate the full remote key under the destination instead of using
    /// only the final path segment
    pub fn keep_structure(mut self, input: bool) -> Self {
        self.keep_structure = input;
        self
    }

    /// Whether the full remote key is recreated under the destination
    pub fn get_keep_structure(&self) -> bool {
        self.keep_structure
    }

    /// Set a listener notified of the object size and of each chunk written
    pub fn progress_listener(mut self, input: impl ProgressListener + 'static) -> Self {
        self.progress_listener = Some(Arc::new(input));
        self
    }

    /// Set a listener notified of the object size and of each chunk written
    pub fn set_progress_listener(mut self, input: Option<Arc<dyn ProgressListener>>) -> Self {
        self.progress_listener = input;
        self
    }

    /// Listener notified of the object size and of each chunk written
    pub fn get_progress_listener(&self) -> &Option<Arc<dyn ProgressListener>> {
        &self.progress_listener
    }

    /// Consumes the builder and constructs a [`DownloadInput`](crate::operation::download::DownloadInput).
    pub fn build(self) -> Result<DownloadInput, BuildError> {
        if self.bucket.is_none() {
            return Err(BuildError::missing_field("bucket", "A bucket is required"));
        }

        if self.key.is_none() {
            return Err(BuildError::missing_field("key", "An object key is required"));
        }

        if self.destination.is_none() {
            return Err(BuildError::missing_field(
                "destination",
                "Destination directory is required",
            ));
        }

        Ok(DownloadInput {
            bucket: self.bucket,
            key: self.key,
            destination: self.destination,
            keep_structure: self.keep_structure,
            progress_listener: self.progress_listener,
        })
    }
}

impl fmt::Debug for DownloadInputBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = f.debug_struct("DownloadInputBuilder");
        formatter.field("bucket", &self.bucket);
        formatter.field("key", &self.key);
        formatter.field("destination", &self.destination);
        formatter.field("keep_structure", &self.keep_structure);
        formatter.field("progress_listener", &self.progress_listener.is_some());
        formatter.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::DownloadInput;

    #[test]
    fn test_missing_field_errors() {
        let err = DownloadInput::builder()
            .key("report.csv")
            .destination("/tmp/test")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("A bucket is required"));

        let err = DownloadInput::builder()
            .bucket("test-bucket")
            .destination("/tmp/test")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("An object key is required"));

        let err = DownloadInput::builder()
            .bucket("test-bucket")
            .key("report.csv")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Destination directory is required"));
    }
}
