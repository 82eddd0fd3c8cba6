/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::Path;
use std::sync::Arc;

use crate::error::{self, Error};

/// Types for single object download operation
pub mod download;

/// Types for multiple object download operation
pub mod download_objects;

/// The key separator; keys ending in it are directory markers and are never
/// downloaded.
pub(crate) const DEFAULT_DELIMITER: &str = "/";

/// Container for maintaining context required to carry out a single operation/transfer.
///
/// `State` is whatever additional operation specific state is required for the operation.
#[derive(Debug)]
pub(crate) struct TransferContext<State> {
    handle: Arc<crate::client::Handle>,
    state: Arc<State>,
}

impl<State> TransferContext<State> {
    /// The S3 client to use for store operations
    pub(crate) fn client(&self) -> &aws_sdk_s3::Client {
        self.handle.config.client()
    }
}

impl<State> Clone for TransferContext<State> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            state: self.state.clone(),
        }
    }
}

/// Validate that the download destination exists and is a directory.
pub(crate) async fn validate_target_is_dir(path: &Path) -> Result<(), Error> {
    let meta = tokio::fs::metadata(path).await?;

    if !meta.is_dir() {
        return Err(error::invalid_input(format!(
            "destination is not a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Replace the key delimiter with the platform path separator when they differ
pub(crate) fn replace_delim(key: &str) -> std::borrow::Cow<'_, str> {
    if DEFAULT_DELIMITER == std::path::MAIN_SEPARATOR_STR {
        std::borrow::Cow::Borrowed(key)
    } else {
        std::borrow::Cow::Owned(key.replace(DEFAULT_DELIMITER, std::path::MAIN_SEPARATOR_STR))
    }
}

/// Validate the resolved key path doesn't resolve outside the destination directory
pub(crate) fn validate_path(root_dir: &Path, local_path: &Path, key: &str) -> Result<(), Error> {
    if !local_path.starts_with(root_dir) {
        let err = error::invalid_input(format!(
            "unable to download key: '{key}', its relative path resolves outside the target destination directory"
        ));
        return Err(err);
    }

    Ok(())
}
