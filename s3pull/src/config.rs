/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::ConcurrencySetting;

mod loader;
pub use loader::ConfigLoader;

/// Configuration for a [`Client`](crate::client::Client)
#[derive(Debug, Clone)]
pub struct Config {
    concurrency: ConcurrencySetting,
    client: aws_sdk_s3::client::Client,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Create a [`ConfigLoader`] that resolves credentials and region from
    /// the environment and any explicit overrides.
    pub fn loader() -> ConfigLoader {
        ConfigLoader::default()
    }

    /// Returns the concurrency setting to use for prefix downloads.
    pub fn concurrency(&self) -> &ConcurrencySetting {
        &self.concurrency
    }

    /// The Amazon S3 client instance that will be used to send requests to S3.
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    concurrency: ConcurrencySetting,
    client: Option<aws_sdk_s3::Client>,
}

impl Builder {
    /// Set the concurrency level prefix downloads are allowed to use.
    ///
    /// This sets the maximum number of objects transferred in parallel.
    /// Default is [ConcurrencySetting::Auto].
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set an explicit S3 client to use.
    pub fn client(mut self, client: aws_sdk_s3::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    pub fn build(self) -> Config {
        Config {
            concurrency: self.concurrency,
            client: self.client.expect("client set"),
        }
    }
}
