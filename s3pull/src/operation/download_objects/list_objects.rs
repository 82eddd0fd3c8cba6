/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::operation::list_objects_v2::{ListObjectsV2Input, ListObjectsV2Output};

use crate::error::{self, Error};

use super::DownloadObjectsContext;

/// Paginator for the `ListObjectsV2` operation over a single prefix.
///
/// Each counting or dispatch pass over the prefix creates its own stream;
/// pagination state is not shared between passes.
#[derive(Debug)]
pub(super) struct ListObjectsStream {
    ctx: DownloadObjectsContext,
    next_token: Option<String>,
    done: bool,
}

impl ListObjectsStream {
    pub(super) fn new(ctx: DownloadObjectsContext) -> Self {
        Self {
            ctx,
            next_token: None,
            done: false,
        }
    }

    /// Fetch the next page of the listing, `None` once exhausted.
    ///
    /// A page error ends the stream; enumeration failures are fatal to the
    /// operation and there is nothing sensible to resume from.
    pub(super) async fn next_page(&mut self) -> Option<Result<ListObjectsV2Output, Error>> {
        if self.done {
            return None;
        }

        let input = &self.ctx.state.input;
        let request = ListObjectsV2Input::builder()
            .set_bucket(input.bucket.to_owned())
            .set_prefix(input.key_prefix.to_owned())
            .set_continuation_token(self.next_token.take());

        let list_result = request.send_with(self.ctx.client()).await;
        match list_result {
            Ok(output) => {
                let is_truncated = output.is_truncated().unwrap_or(false)
                    && output.next_continuation_token().is_some();

                if is_truncated {
                    self.next_token = output.next_continuation_token().map(str::to_owned);
                } else {
                    self.done = true;
                }

                Some(Ok(output))
            }
            Err(err) => {
                self.done = true;
                Some(Err(error::listing_failed(err)))
            }
        }
    }
}
