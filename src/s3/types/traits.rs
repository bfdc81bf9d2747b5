// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2022 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core traits for version listing.

use crate::s3::builders::ListObjectVersions;
use crate::s3::error::Error;
use crate::s3::response::VersionListing;
use async_trait::async_trait;
use futures_util::Stream;
use std::fmt::Debug;

/// Trait for anything able to serve one page of a `ListObjectVersions` call.
///
/// Implementations own everything between the request arguments and the
/// decoded page: transport, signing, retries, and error mapping. They must
/// build the returned [`VersionListing`] so that it echoes the request
/// parameters and carries continuation markers only when it is truncated.
///
/// # See Also
///
/// * [`ListObjectVersions::send`] - sends a request through its lister
/// * [`MemoryLister`](crate::s3::client::MemoryLister) - an in-memory implementation
#[async_trait]
pub trait VersionLister: Debug + Send + Sync {
    /// Fetches the page described by `request`.
    async fn list_object_versions(
        &self,
        request: &ListObjectVersions,
    ) -> Result<VersionListing, Error>;
}

/// Trait for request sequences that are fetched one page at a time.
#[async_trait]
pub trait Paginated {
    type Item;

    /// Fetches the next page, or returns `None` once the sequence is exhausted.
    ///
    /// `max_items` overrides the page size of this and all following requests.
    async fn next_page(&mut self, max_items: Option<u16>) -> Option<Result<Self::Item, Error>>;
}

#[async_trait]
/// Trait for types that can be converted to a stream of items.
pub trait ToStream: Sized {
    type Item;
    async fn to_stream(self) -> Box<dyn Stream<Item = Result<Self::Item, Error>> + Unpin + Send>;
}
