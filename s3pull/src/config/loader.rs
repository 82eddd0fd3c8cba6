/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_config::meta::region::RegionProviderChain;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::config::Region;
use aws_credential_types::Credentials;

use crate::config::Builder;
use crate::types::ConcurrencySetting;
use crate::Config;

/// Load a [`Config`] from the environment plus explicit overrides.
///
/// Credential precedence: anonymous mode, then explicit access keys, then a
/// named profile, then the default provider chain. When the default chain is
/// in play and fails to resolve credentials, the loader falls back to
/// anonymous (unsigned) access instead of failing the run; public buckets
/// stay reachable on hosts with no AWS setup at all.
#[derive(Default, Debug)]
pub struct ConfigLoader {
    profile: Option<String>,
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    region: Option<String>,
    anonymous: bool,
    builder: Builder,
}

impl ConfigLoader {
    /// Use a named profile from the shared AWS config/credentials files.
    pub fn profile(mut self, name: impl Into<String>) -> Self {
        self.profile = Some(name.into());
        self
    }

    /// Use an explicit access key pair.
    ///
    /// Takes precedence over [`profile`](Self::profile) when both are given.
    pub fn credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Override the region instead of resolving it from the environment.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Send unsigned requests, for public buckets.
    pub fn anonymous(mut self, anonymous: bool) -> Self {
        self.anonymous = anonymous;
        self
    }

    /// Set the concurrency level prefix downloads are allowed to use.
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.builder = self.builder.concurrency(concurrency);
        self
    }

    fn region_provider(&self) -> RegionProviderChain {
        match &self.region {
            Some(region) => {
                RegionProviderChain::first_try(Region::new(region.clone())).or_default_provider()
            }
            None => RegionProviderChain::default_provider(),
        }
    }

    /// Resolve credentials and region and construct the [`Config`].
    pub async fn load(self) -> Config {
        let mut env = aws_config::from_env().region(self.region_provider());

        let explicit = if self.anonymous {
            tracing::info!("using anonymous access mode");
            env = env.no_credentials();
            true
        } else if let (Some(access_key), Some(secret_key)) =
            (&self.access_key_id, &self.secret_access_key)
        {
            let credentials =
                Credentials::new(access_key, secret_key, None, None, "command-line-arguments");
            env = env.credentials_provider(credentials);
            true
        } else if let Some(profile) = &self.profile {
            env = env.profile_name(profile);
            true
        } else {
            false
        };

        let mut shared_config = env.load().await;

        if !explicit && !credentials_resolvable(&shared_config).await {
            tracing::warn!(
                "unable to resolve default credentials, falling back to anonymous access"
            );
            shared_config = aws_config::from_env()
                .region(self.region_provider())
                .no_credentials()
                .load()
                .await;
        }

        let client = aws_sdk_s3::Client::new(&shared_config);
        self.builder.client(client).build()
    }
}

async fn credentials_resolvable(config: &aws_config::SdkConfig) -> bool {
    match config.credentials_provider() {
        Some(provider) => provider.provide_credentials().await.is_ok(),
        None => false,
    }
}
