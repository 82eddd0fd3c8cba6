/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Concurrent downloader for Amazon S3 objects and prefixes.
//!
//! Given an S3 location this crate resolves whether it names a single object
//! or a prefix, then either streams that object to disk or enumerates the
//! prefix and fans the matching objects out to a bounded pool of download
//! workers. Progress is reported through a pluggable listener and every
//! long-running loop observes a cooperative cancellation signal.

#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

/// Default number of concurrent object downloads.
pub(crate) const DEFAULT_CONCURRENCY: usize = 5;

/// Error types emitted by `s3pull`
pub mod error;

/// Common types used by `s3pull`
pub mod types;

/// Parsing of user-supplied storage URLs
pub mod location;

/// Progress reporting
pub mod progress;

/// Client configuration and credential resolution
pub mod config;

/// Download client
pub mod client;

/// Download operations
pub mod operation;

pub use client::Client;
pub use config::Config;
