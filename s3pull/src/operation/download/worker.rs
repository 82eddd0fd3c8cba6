/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use path_clean::PathClean;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{self, Error, ErrorKind};
use crate::operation::{replace_delim, validate_path, DEFAULT_DELIMITER};

use super::DownloadContext;

/// Stream one object to its local path with byte-level progress.
pub(super) async fn download_object(ctx: DownloadContext) -> Result<(), Error> {
    let state = &ctx.state;
    let bucket = state.input.bucket().expect("bucket set");
    let key = state.input.key().expect("key set");
    let root_dir = state.input.destination().expect("destination set");

    let key_path = local_object_path(root_dir, key, state.input.keep_structure())?;
    let progress = state.progress();

    // size probe feeds the progress display only; without it the transfer
    // still runs, just without a determinate total
    match ctx
        .client()
        .head_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
    {
        Ok(head) => {
            if let Some(len) = head.content_length().and_then(|len| u64::try_from(len).ok()) {
                progress.set_total(len);
            }
        }
        Err(err) => {
            tracing::warn!("unable to determine object size for {key:?}: {err}");
        }
    }

    let mut cancel_rx = state.cancel_rx.clone();

    // skip the transfer entirely if shutdown began during the size probe
    if *cancel_rx.borrow() {
        return Err(error::operation_cancelled());
    }

    let mut object = ctx
        .client()
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await?;

    if let Some(parent_dir) = key_path.parent() {
        fs::create_dir_all(parent_dir).await?;
    }
    let mut dest = fs::File::create(&key_path).await?;

    loop {
        tokio::select! {
            _ = cancel_rx.changed() => {
                tracing::debug!("received cancellation signal, abandoning transfer of {key:?}");
                return Err(error::operation_cancelled());
            }
            chunk = object.body.try_next() => {
                match chunk.map_err(|err| Error::new(ErrorKind::TransferFailed, err))? {
                    Some(bytes) => {
                        dest.write_all(&bytes).await?;
                        state.bytes_transferred.fetch_add(bytes.len() as u64, Ordering::SeqCst);
                        progress.inc(bytes.len() as u64);
                    }
                    None => break,
                }
            }
        }
    }

    dest.flush().await?;

    Ok(())
}

/// Derive the local path for a single-object download
fn local_object_path(root_dir: &Path, key: &str, keep_structure: bool) -> Result<PathBuf, Error> {
    let relative = if keep_structure {
        key
    } else {
        key.rsplit(DEFAULT_DELIMITER).next().unwrap_or(key)
    };
    let relative_path = replace_delim(relative);

    let local_path = root_dir.join(relative_path.as_ref()).clean();
    validate_path(root_dir, &local_path, key)?;

    Ok(local_path)
}

#[cfg(test)]
mod tests {
    use super::local_object_path;
    use std::path::PathBuf;

    #[cfg(target_family = "unix")]
    #[test]
    fn test_local_object_path() {
        let root_dir = PathBuf::from("test");

        let flat = local_object_path(&root_dir, "folder/sub/report.csv", false).unwrap();
        assert_eq!("test/report.csv", flat.to_str().unwrap());

        let nested = local_object_path(&root_dir, "folder/sub/report.csv", true).unwrap();
        assert_eq!("test/folder/sub/report.csv", nested.to_str().unwrap());

        let bare = local_object_path(&root_dir, "report.csv", false).unwrap();
        assert_eq!("test/report.csv", bare.to_str().unwrap());

        local_object_path(&root_dir, "../escape.bin", true)
            .expect_err("path resolves outside of the destination, expected error");
    }
}
