/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::Error;
use crate::progress::ProgressListener;
use std::{
    path::PathBuf,
    sync::Arc,
};

use super::{DownloadObjectsHandle, DownloadObjectsInputBuilder};

/// Fluent builder for constructing a multiple object download transfer
#[derive(Debug)]
pub struct DownloadObjectsFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: DownloadObjectsInputBuilder,
}

impl DownloadObjectsFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
        }
    }

    /// Initiate a download transfer for multiple objects
    pub async fn send(self) -> Result<DownloadObjectsHandle, Error> {
        let input = self.inner.build()?;
        crate::operation::download_objects::DownloadObjects::orchestrate(self.handle, input).await
    }

    /// Set the bucket name containing the object(s) to download.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// Set the bucket name containing the object(s) to download.
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_bucket(input);
        self
    }

    /// The bucket name containing the object(s).
    pub fn get_bucket(&self) -> &Option<String> {
        self.inner.get_bucket()
    }

    /// Set the destination directory to which files should be downloaded
    pub fn destination(mut self, input: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.destination(input);
        self
    }

    /// Set the destination directory to which files should be downloaded
    pub fn set_destination(mut self, input: Option<PathBuf>) -> Self {
        self.inner = self.inner.set_destination(input);
        self
    }

    /// The destination directory to which files should be downloaded
    pub fn get_destination(&self) -> &Option<PathBuf> {
        self.inner.get_destination()
    }

    /// Limit the response to keys that begin with the given prefix
    pub fn key_prefix(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key_prefix(input);
        self
    }

    /// Limit the response to keys that begin with the given prefix
    pub fn set_key_prefix(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_key_prefix(input);
        self
    }

    /// The prefix the listing is limited to
    pub fn get_key_prefix(&self) -> &Option<String> {
        self.inner.get_key_prefix()
    }

    /// Keep the full remote key as the path relative to the destination
    /// instead of stripping the queried prefix
    pub fn keep_structure(mut self, input: bool) -> Self {
        self.inner = self.inner.keep_structure(input);
        self
    }

    /// Whether the full remote key is preserved under the destination
    pub fn get_keep_structure(&self) -> bool {
        self.inner.get_keep_structure()
    }

    /// Set a listener notified of the object total and of each completed
    /// download
    pub fn progress_listener(mut self, input: impl ProgressListener + 'static) -> Self {
        self.inner = self.inner.progress_listener(input);
        self
    }

    /// Set a listener notified of the object total and of each completed
    /// download
    pub fn set_progress_listener(mut self, input: Option<Arc<dyn ProgressListener>>) -> Self {
        self.inner = self.inner.set_progress_listener(input);
        self
    }

    /// Listener notified of the object total and of each completed download
    pub fn get_progress_listener(&self) -> &Option<Arc<dyn ProgressListener>> {
        self.inner.get_progress_listener()
    }
}

impl crate::operation::download_objects::input::DownloadObjectsInputBuilder {
    /// Initiate a download transfer for multiple objects with this input
    /// using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<DownloadObjectsHandle, Error> {
        let mut fluent_builder = client.download_objects();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
