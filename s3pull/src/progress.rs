/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Progress reporting decoupled from the transfer engine.
//!
//! The operations own the counters that matter for correctness; a
//! [`ProgressListener`] only renders. Listener methods are infallible so a
//! rendering problem can never fail a download.

use std::fmt;

use indicatif::{ProgressBar, ProgressStyle};

/// Receives progress updates from an in-flight operation.
///
/// Implementations must be `Send + Sync`; updates arrive concurrently from
/// multiple workers. The unit is operation-defined: whole files for a prefix
/// download, bytes for a single-object download.
pub trait ProgressListener: Send + Sync {
    /// The total amount of work, once known. Called at most once, before any
    /// [`inc`](ProgressListener::inc) for that work is delivered.
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` units.
    fn inc(&self, delta: u64);

    /// The operation reached a terminal state; no further updates follow.
    fn finish(&self);
}

/// A listener that ignores all updates.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressListener for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self) {}
}

/// An `indicatif`-backed [`ProgressListener`].
///
/// Starts as a spinner and switches to a determinate bar when
/// [`set_total`](ProgressListener::set_total) delivers a length.
pub struct TransferProgressBar {
    bar: ProgressBar,
    bar_style: ProgressStyle,
}

impl fmt::Debug for TransferProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferProgressBar")
            .field("position", &self.bar.position())
            .finish_non_exhaustive()
    }
}

impl TransferProgressBar {
    /// Progress over a number of files discovered during enumeration.
    pub fn files(message: &str) -> Self {
        Self::spinner(
            message,
            "{msg} {wide_bar:.cyan/dim} {pos}/{len} files [{elapsed_precise}]",
        )
    }

    /// Progress over the bytes of a single object.
    pub fn bytes(message: &str) -> Self {
        Self::spinner(
            message,
            "{msg} {wide_bar:.cyan/dim} {bytes}/{total_bytes} [{elapsed_precise}]",
        )
    }

    fn spinner(message: &str, bar_template: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        let bar_style = ProgressStyle::with_template(bar_template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");

        Self { bar, bar_style }
    }

    /// The units rendered so far.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressListener for TransferProgressBar {
    fn set_total(&self, total: u64) {
        self.bar.set_style(self.bar_style.clone());
        self.bar.set_length(total);
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
