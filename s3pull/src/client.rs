/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::error::Error;
use crate::location::Location;
use crate::types::{ConcurrencySetting, TransferKind};
use crate::{Config, DEFAULT_CONCURRENCY};

/// Download client for Amazon Simple Storage Service.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations, e.g. config, env details, etc
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Handle {
    /// Get the concrete number of workers to use based on the concurrency setting.
    pub(crate) fn num_workers(&self) -> usize {
        match self.config.concurrency() {
            ConcurrencySetting::Auto => DEFAULT_CONCURRENCY,
            ConcurrencySetting::Explicit(concurrency) => (*concurrency).max(1),
        }
    }
}

impl Client {
    /// Creates a new client from a config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Resolve whether a location names a single object or a prefix.
    ///
    /// An empty key always means the whole bucket. Otherwise the key is
    /// probed with `HeadObject`: success means an exact object; the store's
    /// not-found signal means a prefix (an empty prefix is not an error here,
    /// enumeration later reports zero matches). Any other failure is fatal
    /// and propagated.
    pub async fn transfer_kind(&self, location: &Location) -> Result<TransferKind, Error> {
        if location.key().is_empty() {
            return Ok(TransferKind::Prefix);
        }

        let head_result = self
            .config()
            .client()
            .head_object()
            .bucket(location.bucket())
            .key(location.key())
            .send()
            .await;

        match head_result {
            Ok(_) => Ok(TransferKind::Object),
            Err(err) => match err.as_service_error() {
                Some(service_err) if service_err.is_not_found() => Ok(TransferKind::Prefix),
                _ => Err(err.into()),
            },
        }
    }

    /// Download a single object from S3 to a local file.
    ///
    /// Constructs a fluent builder for the
    /// [`Download`](crate::operation::download::builders::DownloadFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use s3pull::error::Error;
    ///
    /// async fn get_object(client: &s3pull::Client, dest: &Path) -> Result<(), Error> {
    ///     let handle = client
    ///         .download()
    ///         .bucket("my-bucket")
    ///         .key("my-key")
    ///         .destination(dest)
    ///         .send()
    ///         .await?;
    ///
    ///     // wait for the transfer to complete
    ///     let output = handle.join().await?;
    ///     assert!(output.succeeded());
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn download(&self) -> crate::operation::download::builders::DownloadFluentBuilder {
        crate::operation::download::builders::DownloadFluentBuilder::new(self.handle.clone())
    }

    /// Download all objects under a prefix to a local directory.
    ///
    /// Constructs a fluent builder for the
    /// [`DownloadObjects`](crate::operation::download_objects::builders::DownloadObjectsFluentBuilder) operation.
    ///
    /// # Examples
    /// ```no_run
    /// use std::path::PathBuf;
    /// use s3pull::error::Error;
    ///
    /// async fn download_folder(client: &s3pull::Client, dest: PathBuf) -> Result<(), Error> {
    ///     let handle = client
    ///         .download_objects()
    ///         .bucket("my-bucket")
    ///         .key_prefix("photos/2021/")
    ///         .destination(dest)
    ///         .send()
    ///         .await?;
    ///
    ///     // wait for all transfers to complete
    ///     let output = handle.join().await?;
    ///     println!("{}/{} objects", output.objects_downloaded(), output.objects_total());
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn download_objects(
        &self,
    ) -> crate::operation::download_objects::builders::DownloadObjectsFluentBuilder {
        crate::operation::download_objects::builders::DownloadObjectsFluentBuilder::new(
            self.handle.clone(),
        )
    }
}
