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

/// Input type for downloading multiple objects
#[non_exhaustive]
#[derive(Clone)]
pub struct DownloadObjectsInput {
    /// The bucket name containing the object(s).
    pub bucket: Option<String>,

    /// The destination directory to which files should be downloaded
    pub destination: Option<PathBuf>,

    /// Limit the response to keys that begin with the given prefix
    pub key_prefix: Option<String>,

    /// Keep the full remote key as the path relative to the destination
    /// instead of stripping the queried prefix
    pub keep_structure: bool,

    /// Listener notified of the object total and of each completed download
    pub progress_listener: Option<Arc<dyn ProgressListener>>,
}

impl DownloadObjectsInput {
    /// Creates a new builder-style object to manufacture [`DownloadObjectsInput`](crate::operation::download_objects::DownloadObjectsInput).
    pub fn builder() -> DownloadObjectsInputBuilder {
        DownloadObjectsInputBuilder::default()
    }

    /// The bucket name containing the object(s).
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The destination directory to which files should be downloaded
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Limit the response to keys that begin with the given prefix
    pub fn key_prefix(&self) -> Option<&str> {
        self.key_prefix.as_deref()
    }

    /// Whether the full remote key is preserved under the destination
    pub fn keep_structure(&self) -> bool {
        self.keep_structure
    }

    /// Listener notified of the object total and of each completed download
    pub fn progress_listener(&self) -> Option<&Arc<dyn ProgressListener>> {
        self.progress_listener.as_ref()
    }
}

impl fmt::Debug for DownloadObjectsInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = f.debug_struct("DownloadObjectsInput");
        formatter.field("bucket", &self.bucket);
        formatter.field("destination", &self.destination);
        formatter.field("key_prefix", &self.key_prefix);
        formatter.field("keep_structure", &self.keep_structure);
        formatter.field("progress_listener", &self.progress_listener.is_some());
        formatter.finish()
    }
}

/// A builder for [`DownloadObjectsInput`](crate::operation::download_objects::DownloadObjectsInput).
#[non_exhaustive]
#[derive(Clone, Default)]
pub struct DownloadObjectsInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) destination: Option<PathBuf>,
    pub(crate) key_prefix: Option<String>,
    pub(crate) keep_structure: bool,
    pub(crate) progress_listener: Option<Arc<dyn ProgressListener>>,
}

impl DownloadObjectsInputBuilder {
    /// Set the bucket name containing the object(s) to download.
    ///
    /// NOTE: A bucket name is required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// Set the bucket name containing the object(s) to download.
    ///
    /// NOTE: A bucket name is required.
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.bucket = input;
        self
    }

    /// The bucket name containing the object(s).
    pub fn get_bucket(&self) -> &Option<String> {
        &self.bucket
    }

    /// Set the destination directory to which files should be downloaded
    ///
    /// NOTE: A destination directory is required.
    pub fn destination(mut self, input: impl Into<PathBuf>) -> Self {
        self.destination = Some(input.into());
        self
    }

    /// Set the destination directory to which files should be downloaded
    ///
    /// NOTE: A destination directory is required.
    pub fn set_destination(mut self, input: Option<PathBuf>) -> Self {
        self.destination = input;
        self
    }

    /// The destination directory to which files should be downloaded
    pub fn get_destination(&self) -> &Option<PathBuf> {
        &self.destination
    }

    /// Limit the response to keys that begin with the given prefix
    pub fn key_prefix(mut self, input: impl Into<String>) -> Self {
        self.key_prefix = Some(input.into());
        self
    }

    /// Limit the response to keys that begin with the given prefix
    pub fn set_key_prefix(mut self, input: Option<String>) -> Self {
        self.key_prefix = input;
        self
    }

    /// The prefix the listing is limited to
    pub fn get_key_prefix(&self) -> &Option<String> {
        &self.key_prefix
    }

    /// Keep the full remote key as the path relative to the destination
    /// instead of stripping the queried prefix
    pub fn keep_structure(mut self, input: bool) -> Self {
        self.keep_structure = input;
        self
    }

    /// Whether the full remote key is preserved under the destination
    pub fn get_keep_structure(&self) -> bool {
        self.keep_structure
    }

    /// Set a listener notified of the object total and of each completed
    /// download
    pub fn progress_listener(mut self, input: impl ProgressListener + 'static) -> Self {
        self.progress_listener = Some(Arc::new(input));
        self
    }

    /// Set a listener notified of the object total and of each completed
    /// download
    pub fn set_progress_listener(mut self, input: Option<Arc<dyn ProgressListener>>) -> Self {
        self.progress_listener = input;
        self
    }

    /// Listener notified of the object total and of each completed download
    pub fn get_progress_listener(&self) -> &Option<Arc<dyn ProgressListener>> {
        &self.progress_listener
    }

    /// Consumes the builder and constructs a [`DownloadObjectsInput`](crate::operation::download_objects::DownloadObjectsInput).
    pub fn build(self) -> Result<DownloadObjectsInput, BuildError> {
        if self.bucket.is_none() {
            return Err(BuildError::missing_field("bucket", "A bucket is required"));
        }

        if self.destination.is_none() {
            return Err(BuildError::missing_field(
                "destination",
                "Destination directory is required",
            ));
        }

        Ok(DownloadObjectsInput {
            bucket: self.bucket,
            destination: self.destination,
            key_prefix: self.key_prefix,
            keep_structure: self.keep_structure,
            progress_listener: self.progress_listener,
        })
    }
}

impl fmt::Debug for DownloadObjectsInputBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = f.debug_struct("DownloadObjectsInputBuilder");
        formatter.field("bucket", &self.bucket);
        formatter.field("destination", &self.destination);
        formatter.field("key_prefix", &self.key_prefix);
        formatter.field("keep_structure", &self.keep_structure);
        formatter.field("progress_listener", &self.progress_listener.is_some());
        formatter.finish()
    }
}
