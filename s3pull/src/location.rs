/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::{self, Error};

const ACCEPTED_FORMS: &str = "unrecognized storage URL; accepted forms are:\n\
    - s3://bucket-name/folder/path/\n\
    - https://bucket-name.s3.region.amazonaws.com/folder/path/\n\
    - https://s3-region.amazonaws.com/bucket-name/folder/path/";

/// A parsed storage location.
///
/// Invariants: `bucket` is never empty and `key` never starts with `/`.
/// An empty `key` refers to the whole bucket.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Location {
    bucket: String,
    key: String,
}

impl Location {
    /// Parse a user-supplied storage URL into its `(bucket, key)` parts.
    ///
    /// Three forms are accepted, checked in this order:
    /// 1. `s3://bucket/key...`
    /// 2. `https://bucket.s3[.region].amazonaws.com/key...` (virtual-hosted style)
    /// 3. `https://s3[-.]region.amazonaws.com/bucket/key...` (path style)
    ///
    /// The key is kept exactly as parsed; whether it names an object or a
    /// prefix is resolved later against the store.
    pub fn parse(raw: &str) -> Result<Location, Error> {
        if let Some(rest) = raw.strip_prefix("s3://") {
            let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
            return Location::new(bucket, key);
        }

        if let Some(rest) = raw.strip_prefix("https://") {
            let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
            let key = path.trim_start_matches('/');

            // virtual-hosted style: first host label is the bucket and the
            // remainder of the host is the s3 service endpoint
            if let Some((bucket, service)) = host.split_once('.') {
                if service == "s3.amazonaws.com"
                    || (service.starts_with("s3.") && service.ends_with(".amazonaws.com"))
                {
                    return Location::new(bucket, key);
                }
            }

            // path style: the host leads with the s3 service label and the
            // bucket is the first path segment
            if (host.starts_with("s3-") || host.starts_with("s3."))
                && host.ends_with(".amazonaws.com")
            {
                let (bucket, key) = key.split_once('/').unwrap_or((key, ""));
                return Location::new(bucket, key);
            }
        }

        Err(error::invalid_location(ACCEPTED_FORMS))
    }

    fn new(bucket: &str, key: &str) -> Result<Location, Error> {
        if bucket.is_empty() {
            return Err(error::invalid_location(ACCEPTED_FORMS));
        }

        Ok(Location {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        })
    }

    /// The bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The object key or prefix; empty means the whole bucket.
    pub fn key(&self) -> &str {
        &self.key
    }
}
