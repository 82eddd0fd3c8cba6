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

use super::{DownloadHandle, DownloadInputBuilder};

/// Fluent builder for constructing a single object download transfer
#[derive(Debug)]
pub struct DownloadFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: DownloadInputBuilder,
}

impl DownloadFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
        }
    }

    /// Initiate a download transfer for a single object
    pub async fn send(self) -> Result<DownloadHandle, Error> {
        let input = self.inner.build()?;
        crate::operation::download::Download::orchestrate(self.handle, input).await
    }

    /// Set the bucket name containing the object to download.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// Set the bucket name containing the object to download.
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_bucket(input);
        self
    }

    /// The bucket name containing the object.
    pub fn get_bucket(&self) -> &Option<String> {
        self.inner.get_bucket()
    }

    /// Set the key of the object to download.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key(input);
        self
    }

    /// Set the key of the object to download.
    pub fn set_key(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_key(input);
        self
    }

    /// The key of the object to download.
    pub fn get_key(&self) -> &Option<String> {
        self.inner.get_key()
    }

    /// Set the destination directory the file is written into
    pub fn destination(mut self, input: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.destination(input);
        self
    }

    /// Set the destination directory the file is written into
    pub fn set_destination(mut self, input: Option<PathBuf>) -> Self {
        self.inner = self.inner.set_destination(input);
        self
    }

    /// The destination directory the file is written into
    pub fn get_destination(&self) -> &Option<PathBuf> {
        self.inner.get_destination()
    }

    /// Recreate the full remote key under the destination instead of using
    /// only the final path segment
    pub fn keep_structure(mut self, input: bool) -> Self {
        self.inner = self.inner.keep_structure(input);
        self
    }

    /// Whether the full remote key is recreated under the destination
    pub fn get_keep_structure(&self) -> bool {
        self.inner.get_keep_structure()
    }

    /// Set a listener notified of the object size and of each chunk written
    pub fn progress_listener(mut self, input: impl ProgressListener + 'static) -> Self {
        self.inner = self.inner.progress_listener(input);
        self
    }

    /// Set a listener notified of the object size and of each chunk written
    pub fn set_progress_listener(mut self, input: Option<Arc<dyn ProgressListener>>) -> Self {
        self.inner = self.inner.set_progress_listener(input);
        self
    }

    /// Listener notified of the object size and of each chunk written
    pub fn get_progress_listener(&self) -> &Option<Arc<dyn ProgressListener>> {
        self.inner.get_progress_listener()
    }
}

impl crate::operation::download::input::DownloadInputBuilder {
    /// Initiate a download transfer for a single object with this input
    /// using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<DownloadHandle, Error> {
        let mut fluent_builder = client.download();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
