/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use async_channel::{Receiver, Sender};
use path_clean::PathClean;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{self, Error, ErrorKind};
use crate::operation::{replace_delim, validate_path, DEFAULT_DELIMITER};
use crate::types::FailedDownload;

use super::list_objects::ListObjectsStream;
use super::DownloadObjectsContext;

#[derive(Debug)]
pub(super) struct DownloadObjectJob {
    pub(super) object: aws_sdk_s3::types::Object,
}

impl DownloadObjectJob {
    fn key(&self) -> &str {
        self.object.key().unwrap_or("")
    }

    fn size(&self) -> u64 {
        self.object
            .size()
            .unwrap_or_default()
            .try_into()
            .unwrap_or_default()
    }
}

/// Directory markers are zero-content placeholder keys, never downloadable
/// content.
fn is_dir_marker(key: &str) -> bool {
    key.ends_with(DEFAULT_DELIMITER)
}

// worker to enumerate objects from a bucket
//
// First pass counts the downloadable objects so the total is known before
// any job is dispatched; second pass re-enumerates and feeds the workers.
// The two listings may observe different bucket contents, so the total is
// advisory.
pub(super) async fn discover_objects(
    ctx: DownloadObjectsContext,
    work_tx: Sender<DownloadObjectJob>,
) -> Result<(), error::Error> {
    let mut cancel_rx = ctx.state.cancel_rx.clone();

    let mut stream = ListObjectsStream::new(ctx.clone());
    let mut total: u64 = 0;

    loop {
        // checked between pages; a cancelled count keeps the partial total
        // and stops quietly instead of raising an error
        if *cancel_rx.borrow() {
            tracing::debug!("received cancellation signal while counting, keeping partial count of {total}");
            ctx.state.objects_total.store(total, Ordering::SeqCst);
            return Ok(());
        }

        match stream.next_page().await {
            None => break,
            Some(page) => {
                let page = page?;
                let count = page
                    .contents()
                    .iter()
                    .filter(|obj| !is_dir_marker(obj.key().unwrap_or("")))
                    .count();
                total += count as u64;
            }
        }
    }

    ctx.state.objects_total.store(total, Ordering::SeqCst);
    ctx.state.progress().set_total(total);

    if total == 0 {
        tracing::info!("no objects found under the requested prefix");
        return Ok(());
    }

    let mut stream = ListObjectsStream::new(ctx.clone());

    loop {
        tokio::select! {
            _ = cancel_rx.changed() => {
                tracing::debug!("received cancellation signal, exiting and not listing new objects");
                return Err(error::operation_cancelled());
            }
            page = stream.next_page() => {
                match page {
                    None => break,
                    Some(page) => {
                        let page = page?;
                        for object in page.contents.unwrap_or_default() {
                            let key = object.key().unwrap_or("");

                            if is_dir_marker(key) {
                                tracing::debug!("skipping directory marker: {key:?}");
                                continue;
                            }

                            let job = DownloadObjectJob { object };
                            if work_tx.send(job).await.is_err() {
                                tracing::error!("all receiver ends have been dropped, unable to send a job!");
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

// worker to download objects
pub(super) async fn download_objects(
    ctx: DownloadObjectsContext,
    work_rx: Receiver<DownloadObjectJob>,
) -> Result<(), error::Error> {
    let mut cancel_rx = ctx.state.cancel_rx.clone();
    loop {
        tokio::select! {
            _ = cancel_rx.changed() => {
                tracing::debug!("received cancellation signal, exiting and not downloading a new object");
                return Err(error::operation_cancelled());
            }
            job = work_rx.recv() => {
                match job {
                    Err(_) => break,
                    Ok(job) => {
                        tracing::debug!(
                            "worker recv'd request for key {:?} ({:?} bytes)",
                            job.object.key(),
                            job.object.size()
                        );

                        let dl_result = download_single_obj(&ctx, &job).await;
                        match dl_result {
                            Ok(()) => {
                                ctx.state
                                    .successful_downloads
                                    .fetch_add(1, Ordering::SeqCst);

                                ctx.state
                                    .total_bytes_transferred
                                    .fetch_add(job.size(), Ordering::SeqCst);

                                ctx.state.progress().inc(1);

                                tracing::debug!("worker finished downloading key {:?}", job.object.key());
                            }
                            Err(err) if err.kind() == &ErrorKind::OperationCancelled => {
                                return Err(err);
                            }
                            Err(err) => {
                                tracing::warn!(
                                    "failed to download key {:?}: {}",
                                    job.object.key(),
                                    err
                                );

                                let mut failures = ctx.state.failed_downloads.lock().unwrap();
                                failures.push(FailedDownload {
                                    key: job.key().to_owned(),
                                    error: err,
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    tracing::trace!("req channel closed, worker finished");
    Ok(())
}

async fn download_single_obj(
    ctx: &DownloadObjectsContext,
    job: &DownloadObjectJob,
) -> Result<(), error::Error> {
    let state = &ctx.state;
    let root_dir = state.input.destination().expect("destination set");
    let bucket = state.input.bucket().expect("bucket set");
    let key = job.key();

    let key_path = local_key_path(
        root_dir,
        key,
        state.input.key_prefix(),
        state.input.keep_structure(),
    )?;

    // skip jobs that were already queued when shutdown began
    if *state.cancel_rx.borrow() {
        return Err(error::operation_cancelled());
    }

    let mut object = ctx
        .client()
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await?;

    let parent_dir = key_path.parent().expect("valid parent dir for key");
    fs::create_dir_all(parent_dir).await?;
    let mut dest = fs::File::create(&key_path).await?;

    let mut cancel_rx = state.cancel_rx.clone();
    loop {
        tokio::select! {
            _ = cancel_rx.changed() => {
                return Err(error::operation_cancelled());
            }
            chunk = object.body.try_next() => {
                match chunk.map_err(|err| Error::new(ErrorKind::TransferFailed, err))? {
                    Some(bytes) => dest.write_all(&bytes).await?,
                    None => break,
                }
            }
        }
    }

    dest.flush().await?;

    Ok(())
}

/// If the prefix is not empty AND the key contains the delimiter, strip the
/// prefix from the key.
///
/// # Examples
///
/// ```ignore
/// let actual = strip_key_prefix("notes/2021/1.txt", Some("notes/2021/"));
/// assert_eq!("1.txt", actual);
///
/// // If the prefix is not the full name of the folder, the folder name will be truncated.
/// let actual = strip_key_prefix("top-level/sub-folder/1.txt", Some("top-"));
/// assert_eq!("level/sub-folder/1.txt", actual);
/// ```
fn strip_key_prefix<'a>(key: &'a str, prefix: Option<&str>) -> &'a str {
    let prefix = prefix.unwrap_or("");

    if key.is_empty() || prefix.is_empty() || !key.starts_with(prefix) || !key.contains(DEFAULT_DELIMITER)
    {
        return key;
    }

    let stripped = &key[prefix.len()..];

    if prefix.ends_with(DEFAULT_DELIMITER) || !stripped.starts_with(DEFAULT_DELIMITER) {
        return stripped;
    }

    &stripped[1..]
}

/// Derive the local path for a given S3 key
fn local_key_path(
    root_dir: &Path,
    key: &str,
    prefix: Option<&str>,
    keep_structure: bool,
) -> Result<PathBuf, error::Error> {
    let stripped = if keep_structure {
        key
    } else {
        strip_key_prefix(key, prefix)
    };
    let relative_path = replace_delim(stripped);

    let local_path = root_dir.join(relative_path.as_ref()).clean();
    validate_path(root_dir, &local_path, key)?;

    Ok(local_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::operation::download_objects::{DownloadObjectsContext, DownloadObjectsInput};

    use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};

    use std::path::PathBuf;
    use std::sync::atomic::Ordering;

    struct ObjectKeyPathTest {
        key: &'static str,
        prefix: Option<&'static str>,
        keep_structure: bool,
        expected: Result<&'static str, &'static str>,
    }

    fn success_path_test(
        key: &'static str,
        prefix: Option<&'static str>,
        keep_structure: bool,
        expected: &'static str,
    ) -> ObjectKeyPathTest {
        ObjectKeyPathTest {
            key,
            prefix,
            keep_structure,
            expected: Ok(expected),
        }
    }

    // we only use this on linux so windows only test complains
    #[allow(dead_code)]
    fn error_path_test(
        key: &'static str,
        prefix: Option<&'static str>,
        keep_structure: bool,
        expected_err: &'static str,
    ) -> ObjectKeyPathTest {
        ObjectKeyPathTest {
            key,
            prefix,
            keep_structure,
            expected: Err(expected_err),
        }
    }

    #[test]
    fn test_strip_key_prefix() {
        let tests = &[
            ("no-delim", None, "no-delim"),
            ("no-delim", Some(""), "no-delim"),
            ("delim/with/separator", Some(""), "delim/with/separator"),
            ("", Some("no-delim"), ""),
            ("no-delim", Some("no-delim"), "no-delim"),
            ("delim/", Some("delim"), ""),
            ("not-in-key", Some("prefix"), "not-in-key"),
            ("notes/2021/1.txt", Some("notes/2021"), "1.txt"),
            ("notes/2021/1.txt", Some("notes/2021/"), "1.txt"),
            ("top-level/sub-folder/1.txt", Some("top-"), "level/sub-folder/1.txt"),
            ("someInner/another/file1.txt", Some("someInner"), "another/file1.txt"),
            ("someInner/another/file1.txt", Some("someInner/a"), "nother/file1.txt"),
        ];

        for (key, prefix, expected) in tests {
            let actual = strip_key_prefix(key, *prefix);
            assert_eq!(*expected, actual);
        }
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn test_local_key_path_linux() {
        use aws_sdk_s3::error::DisplayErrorContext;

        let tests = &[
            success_path_test("2023/Jan/1.png", None, false, "test/2023/Jan/1.png"),
            success_path_test("2023/Jan/1.png", Some("2023/Jan/"), false, "test/1.png"),
            success_path_test("2023/Jan/1.png", Some("2023/Jan"), false, "test/1.png"),
            // keeping the structure ignores the queried prefix
            success_path_test("2023/Jan/1.png", Some("2023/Jan/"), true, "test/2023/Jan/1.png"),
            success_path_test("2023/Jan/1.png", None, true, "test/2023/Jan/1.png"),
            // resolves outside parent folder
            error_path_test(
                "../2023/Jan/1.png",
                None,
                false,
                "unable to download key: '../2023/Jan/1.png'",
            ),
            error_path_test(
                "/2023/Jan/1.png",
                None,
                false,
                "unable to download key: '/2023/Jan/1.png'",
            ),
            error_path_test(
                "foo/../2023/../../Jan/1.png",
                None,
                false,
                "unable to download key: 'foo/../2023/../../Jan/1.png'",
            ),
            error_path_test(
                "../test-2/object.dat",
                None,
                true,
                "unable to download key: '../test-2/object.dat'",
            ),
        ];

        for test in tests {
            let root_dir = PathBuf::from("test");
            let actual = local_key_path(&root_dir, test.key, test.prefix, test.keep_structure);
            if test.expected.is_ok() {
                let actual = actual.expect("expected success");
                let actual_str = actual.to_str().expect("valid utf-8 path");
                assert_eq!(*test.expected.as_ref().unwrap(), actual_str);
            } else {
                let err =
                    actual.expect_err("path resolves outside of parent folder, expected error");
                let actual_err = format!("{}", DisplayErrorContext(err));
                let expected_err_substr = test.expected.as_ref().unwrap_err();
                assert!(
                    actual_err.contains(expected_err_substr),
                    "'{actual_err}' does not contain '{expected_err_substr}'"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_skip_directory_markers() {
        let list_objects_rule = mock!(aws_sdk_s3::Client::list_objects_v2).then_output(|| {
            ListObjectsV2Output::builder()
                .contents(
                    aws_sdk_s3::types::Object::builder()
                        .key("a/")
                        .size(0)
                        .build(),
                )
                .contents(
                    aws_sdk_s3::types::Object::builder()
                        .key("a/1.txt")
                        .size(10)
                        .build(),
                )
                .contents(
                    aws_sdk_s3::types::Object::builder()
                        .key("a/2.txt")
                        .size(7)
                        .build(),
                )
                .build()
        });

        let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&list_objects_rule]);
        let config = crate::Config::builder().client(s3_client).build();
        let client = crate::Client::new(config);
        let input = DownloadObjectsInput::builder()
            .bucket("test-bucket")
            .key_prefix("a/")
            .destination("/tmp/test")
            .build()
            .unwrap();

        let ctx = DownloadObjectsContext::new(client.handle.clone(), input);

        let (work_tx, work_rx) = async_channel::unbounded();

        let join_handle = tokio::spawn(discover_objects(ctx.clone(), work_tx));

        let mut keys = Vec::new();

        while let Ok(job) = work_rx.recv().await {
            keys.push(job.object.key().unwrap().to_owned());
        }

        join_handle.await.unwrap().unwrap();

        assert_eq!(keys, vec!["a/1.txt", "a/2.txt"]);
        assert_eq!(2, ctx.state.objects_total.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_paginated_discovery() {
        let first_page = mock!(aws_sdk_s3::Client::list_objects_v2)
            .match_requests(|r| r.continuation_token().is_none())
            .then_output(|| {
                ListObjectsV2Output::builder()
                    .contents(aws_sdk_s3::types::Object::builder().key("k1").size(1).build())
                    .contents(aws_sdk_s3::types::Object::builder().key("k2").size(1).build())
                    .is_truncated(true)
                    .next_continuation_token("tok")
                    .build()
            });
        let second_page = mock!(aws_sdk_s3::Client::list_objects_v2)
            .match_requests(|r| r.continuation_token() == Some("tok"))
            .then_output(|| {
                ListObjectsV2Output::builder()
                    .contents(aws_sdk_s3::types::Object::builder().key("k3").size(1).build())
                    .build()
            });

        let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&first_page, &second_page]);
        let config = crate::Config::builder().client(s3_client).build();
        let client = crate::Client::new(config);
        let input = DownloadObjectsInput::builder()
            .bucket("test-bucket")
            .destination("/tmp/test")
            .build()
            .unwrap();

        let ctx = DownloadObjectsContext::new(client.handle.clone(), input);

        let (work_tx, work_rx) = async_channel::unbounded();

        let join_handle = tokio::spawn(discover_objects(ctx.clone(), work_tx));

        let mut keys = Vec::new();

        while let Ok(job) = work_rx.recv().await {
            keys.push(job.object.key().unwrap().to_owned());
        }

        join_handle.await.unwrap().unwrap();

        assert_eq!(keys, vec!["k1", "k2", "k3"]);
        assert_eq!(3, ctx.state.objects_total.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancelled_count_keeps_partial_total_without_error() {
        let list_objects_rule = mock!(aws_sdk_s3::Client::list_objects_v2).then_output(|| {
            ListObjectsV2Output::builder()
                .contents(aws_sdk_s3::types::Object::builder().key("k1").size(1).build())
                .build()
        });

        let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&list_objects_rule]);
        let config = crate::Config::builder().client(s3_client).build();
        let client = crate::Client::new(config);
        let input = DownloadObjectsInput::builder()
            .bucket("test-bucket")
            .destination("/tmp/test")
            .build()
            .unwrap();

        let ctx = DownloadObjectsContext::new(client.handle.clone(), input);
        ctx.state.cancel_tx.send(true).unwrap();

        let (work_tx, work_rx) = async_channel::unbounded();

        discover_objects(ctx.clone(), work_tx)
            .await
            .expect("cancellation while counting is not an error");

        // nothing dispatched after the flag was set
        assert!(work_rx.is_empty());
    }
}
