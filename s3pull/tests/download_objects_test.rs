/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::{
    operation::{get_object::GetObjectOutput, list_objects_v2::ListObjectsV2Output},
    primitives::ByteStream,
};
use aws_smithy_mocks_experimental::{mock, mock_client, Rule, RuleMode};
use aws_smithy_runtime_api::{client::orchestrator::HttpResponse, http::StatusCode};
use bytes::Bytes;
use s3pull::types::ConcurrencySetting;
use std::{io, iter, path::Path, sync::Arc};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
struct MockObject {
    object: aws_sdk_s3::types::Object,
    contents: Bytes,
    error_on_get: bool,
}

impl MockObject {
    /// Create a new mock object with the given key and contents
    fn new(key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let contents: Bytes = data.into();
        let object = aws_sdk_s3::types::Object::builder()
            .key(key.into())
            .size(contents.len() as i64)
            .build();
        Self {
            object,
            contents,
            error_on_get: false,
        }
    }

    /// Create a new mock object with the given key and content size using random data
    fn new_random(key: impl Into<String>, size: usize) -> Self {
        let data: String = iter::repeat_with(fastrand::alphanumeric)
            .take(size)
            .collect();
        Self::new(key, data)
    }

    /// Create a new mock object that fails when `get_object` is invoked on it
    fn new_with_error(key: impl Into<String>) -> Self {
        let mut obj = Self::new_random(key, 10);
        obj.error_on_get = true;
        obj
    }

    /// Get the output for the `get_object` invocation
    fn get_object_output(&self) -> GetObjectOutput {
        assert!(!self.error_on_get, "mock object expects error");
        GetObjectOutput::builder()
            .body(ByteStream::from(self.contents.clone()))
            .content_length(self.contents.len() as i64)
            .build()
    }
}

fn get_object_error_http_resp() -> HttpResponse {
    HttpResponse::new(StatusCode::try_from(500).unwrap(), Bytes::new().into())
}

/// Get the mock rule for this object when the `get_object` API is invoked for
/// the corresponding key
fn get_object_rule(mobj: &MockObject) -> Rule {
    let share1 = Arc::new(mobj.clone());
    let share2 = share1.clone();

    if mobj.error_on_get {
        mock!(aws_sdk_s3::Client::get_object)
            .match_requests(move |r| r.key() == share1.object.key())
            .then_http_response(get_object_error_http_resp)
    } else {
        mock!(aws_sdk_s3::Client::get_object)
            .match_requests(move |r| r.key() == share1.object.key())
            .then_output(move || share2.get_object_output())
    }
}

/// Mock bucket with the set of objects for testing the prefix engine.
///
/// NOTE: This is limited to scenarios where a single `ListObjectsV2` page
/// covers the bucket; pagination is covered by its own test below.
#[derive(Debug)]
struct MockBucket {
    objects: Vec<MockObject>,
}

impl MockBucket {
    fn builder() -> MockBucketBuilder {
        MockBucketBuilder::default()
    }

    /// Return the mock rules representing this bucket. This includes
    /// the `ListObjectsV2` call as well as all of the `GetObject` calls.
    fn rules(&self) -> Vec<Rule> {
        let contents = self.objects.iter().map(|m| m.object.clone()).collect();

        let list_output = ListObjectsV2Output::builder()
            .set_contents(Some(contents))
            .build();

        let list_rule =
            mock!(aws_sdk_s3::Client::list_objects_v2).then_output(move || list_output.clone());

        let mut rules: Vec<Rule> = self.objects.iter().map(get_object_rule).collect();

        rules.push(list_rule);
        rules
    }
}

#[derive(Debug, Default)]
struct MockBucketBuilder {
    objects: Vec<MockObject>,
}

impl MockBucketBuilder {
    /// Create a new key with the given contents
    fn key_with_data(mut self, key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.objects.push(MockObject::new(key, data));
        self
    }

    /// Create a new key with the given content size using random data
    fn key_with_size(mut self, key: impl Into<String>, size: usize) -> Self {
        self.objects.push(MockObject::new_random(key, size));
        self
    }

    /// Create a new key that returns an error when the `get_object` API
    /// operation is invoked
    fn key_with_error(mut self, key: impl Into<String>) -> Self {
        self.objects.push(MockObject::new_with_error(key));
        self
    }

    /// Consume the builder and build a `MockBucket`
    fn build(self) -> MockBucket {
        MockBucket {
            objects: self.objects,
        }
    }
}

fn client_for(bucket: &MockBucket) -> s3pull::Client {
    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, bucket.rules().as_slice());
    let config = s3pull::Config::builder().client(s3_client).build();
    s3pull::Client::new(config)
}

/// Walk the directory rooted at `dir` and gather all of the relative path
/// filenames (sans directory names)
fn relative_path_names(dir: &Path) -> Result<Vec<String>, io::Error> {
    let mut paths: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| !e.file_type().is_dir())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .expect("prefix present")
                .to_str()
                .expect("valid utf8 path")
                .to_string()
        })
        .collect();

    paths.sort();
    Ok(paths)
}

/// Should remove the prefix in the local filepath
#[tokio::test]
async fn test_strip_prefix_in_destination_path() {
    let bucket = MockBucket::builder()
        .key_with_size("abc/def/image.jpg", 12)
        .key_with_size("abc/def/title.jpg", 7)
        .key_with_size("abc/def/ghi/xyz.txt", 5)
        .build();

    let client = client_for(&bucket);
    let dest = tempfile::tempdir().unwrap();

    let handle = client
        .download_objects()
        .bucket("test-bucket")
        .key_prefix("abc/def/")
        .destination(dest.path())
        .send()
        .await
        .unwrap();

    let output = handle.join().await.unwrap();
    assert_eq!(3, output.objects_downloaded());
    assert_eq!(3, output.objects_total());
    assert!(output.succeeded());

    let paths = relative_path_names(dest.path()).unwrap();
    let mut expected = vec!["image.jpg", "title.jpg", "ghi/xyz.txt"]
        .into_iter()
        .map(str::to_owned)
        .collect::<Vec<String>>();
    expected.sort();
    assert_eq!(expected, paths);
}

/// Should recreate the full key path when keeping the structure
#[tokio::test]
async fn test_keep_structure_in_destination_path() {
    let bucket = MockBucket::builder()
        .key_with_size("folder/sub/file.txt", 12)
        .key_with_size("folder/other.txt", 7)
        .build();

    let client = client_for(&bucket);
    let dest = tempfile::tempdir().unwrap();

    let handle = client
        .download_objects()
        .bucket("test-bucket")
        .key_prefix("folder/")
        .destination(dest.path())
        .keep_structure(true)
        .send()
        .await
        .unwrap();

    let output = handle.join().await.unwrap();
    assert_eq!(2, output.objects_downloaded());

    let paths = relative_path_names(dest.path()).unwrap();
    let mut expected = vec!["folder/sub/file.txt", "folder/other.txt"]
        .into_iter()
        .map(str::to_owned)
        .collect::<Vec<String>>();
    expected.sort();
    assert_eq!(expected, paths);
}

/// Directory markers are counted out and never dispatched
#[tokio::test]
async fn test_skips_directory_markers() {
    let bucket = MockBucket::builder()
        .key_with_data("a/", "")
        .key_with_size("a/1.txt", 10)
        .key_with_size("a/2.txt", 11)
        .build();

    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, bucket.rules().as_slice());
    let config = s3pull::Config::builder()
        .client(s3_client)
        .concurrency(ConcurrencySetting::Explicit(2))
        .build();
    let client = s3pull::Client::new(config);

    let dest = tempfile::tempdir().unwrap();

    let handle = client
        .download_objects()
        .bucket("test-bucket")
        .key_prefix("a/")
        .destination(dest.path())
        .send()
        .await
        .unwrap();

    let output = handle.join().await.unwrap();
    assert_eq!(2, output.objects_downloaded());
    assert_eq!(2, output.objects_total());
    assert!(output.succeeded());

    let paths = relative_path_names(dest.path()).unwrap();
    assert_eq!(vec!["1.txt".to_owned(), "2.txt".to_owned()], paths);
}

/// Should record failed download(s) and keep going
#[tokio::test]
async fn test_failed_download_continues() {
    let bucket = MockBucket::builder()
        .key_with_size("key1", 12)
        .key_with_size("key2", 7)
        .key_with_error("key3")
        .build();

    let client = client_for(&bucket);
    let dest = tempfile::tempdir().unwrap();

    let handle = client
        .download_objects()
        .bucket("test-bucket")
        .destination(dest.path())
        .send()
        .await
        .unwrap();

    let output = handle.join().await.unwrap();
    assert_eq!(2, output.objects_downloaded());
    assert_eq!(3, output.objects_total());
    assert!(!output.succeeded());
    assert!(!output.is_cancelled());

    let paths = relative_path_names(dest.path()).unwrap();
    let expected = vec!["key1", "key2"]
        .into_iter()
        .map(str::to_owned)
        .collect::<Vec<String>>();
    assert_eq!(expected, paths);

    let failures = output.failed_transfers();
    assert_eq!(1, failures.len());
    assert_eq!("key3", failures[0].key());
}

/// An empty prefix is a no-op completion, not an error
#[tokio::test]
async fn test_empty_prefix_is_noop() {
    let list_rule = mock!(aws_sdk_s3::Client::list_objects_v2)
        .then_output(|| ListObjectsV2Output::builder().build());

    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&list_rule]);
    let config = s3pull::Config::builder().client(s3_client).build();
    let client = s3pull::Client::new(config);

    let dest = tempfile::tempdir().unwrap();

    let handle = client
        .download_objects()
        .bucket("test-bucket")
        .key_prefix("nothing/here/")
        .destination(dest.path())
        .send()
        .await
        .unwrap();

    let output = handle.join().await.unwrap();
    assert_eq!(0, output.objects_downloaded());
    assert_eq!(0, output.objects_total());
    assert!(output.succeeded());
    assert!(relative_path_names(dest.path()).unwrap().is_empty());
}

/// Cancelling before the engine runs dispatches nothing and is not an error
#[tokio::test]
async fn test_cancelled_before_listing() {
    let bucket = MockBucket::builder()
        .key_with_size("key1", 12)
        .key_with_size("key2", 7)
        .build();

    let client = client_for(&bucket);
    let dest = tempfile::tempdir().unwrap();

    let handle = client
        .download_objects()
        .bucket("test-bucket")
        .destination(dest.path())
        .send()
        .await
        .unwrap();

    handle.abort_handle().abort();

    let output = handle.join().await.unwrap();
    assert!(output.is_cancelled());
    assert!(!output.succeeded());
    assert!(output.objects_downloaded() <= output.objects_total());
    assert_eq!(0, output.objects_downloaded());
    assert!(relative_path_names(dest.path()).unwrap().is_empty());
}

/// Every page of a truncated listing is enumerated, in both passes
#[tokio::test]
async fn test_multi_page_listing() {
    let page_one = mock!(aws_sdk_s3::Client::list_objects_v2)
        .match_requests(|r| r.continuation_token().is_none())
        .then_output(|| {
            ListObjectsV2Output::builder()
                .contents(aws_sdk_s3::types::Object::builder().key("k1").size(4).build())
                .contents(aws_sdk_s3::types::Object::builder().key("k2").size(4).build())
                .is_truncated(true)
                .next_continuation_token("page-2")
                .build()
        });
    let page_two = mock!(aws_sdk_s3::Client::list_objects_v2)
        .match_requests(|r| r.continuation_token() == Some("page-2"))
        .then_output(|| {
            ListObjectsV2Output::builder()
                .contents(aws_sdk_s3::types::Object::builder().key("k3").size(4).build())
                .build()
        });
    let get_rule = mock!(aws_sdk_s3::Client::get_object).then_output(|| {
        GetObjectOutput::builder()
            .body(ByteStream::from_static(b"data"))
            .content_length(4)
            .build()
    });

    let s3_client = mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        &[&page_one, &page_two, &get_rule]
    );
    let config = s3pull::Config::builder().client(s3_client).build();
    let client = s3pull::Client::new(config);

    let dest = tempfile::tempdir().unwrap();

    let handle = client
        .download_objects()
        .bucket("test-bucket")
        .destination(dest.path())
        .send()
        .await
        .unwrap();

    let output = handle.join().await.unwrap();
    assert_eq!(3, output.objects_downloaded());
    assert_eq!(3, output.objects_total());

    let paths = relative_path_names(dest.path()).unwrap();
    assert_eq!(
        vec!["k1".to_owned(), "k2".to_owned(), "k3".to_owned()],
        paths
    );
}

/// Re-running the same download overwrites to identical contents
#[tokio::test]
async fn test_idempotent_redownload() {
    let bucket = MockBucket::builder()
        .key_with_data("report.csv", "id,total\n1,42\n")
        .build();

    let client = client_for(&bucket);
    let dest = tempfile::tempdir().unwrap();

    for _ in 0..2 {
        let handle = client
            .download_objects()
            .bucket("test-bucket")
            .destination(dest.path())
            .send()
            .await
            .unwrap();

        let output = handle.join().await.unwrap();
        assert_eq!(1, output.objects_downloaded());

        let contents = std::fs::read_to_string(dest.path().join("report.csv")).unwrap();
        assert_eq!("id,total\n1,42\n", contents);
    }
}
