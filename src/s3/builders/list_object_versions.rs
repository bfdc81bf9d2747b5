// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2023 MinIO, Inc.
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

//! Argument builder for the ListObjectVersions API.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{Stream, stream as futures_stream};
use typed_builder::TypedBuilder;

use crate::s3::{
    config::{ListingConfig, MAX_KEYS_LIMIT},
    error::{Error, ValidationErr},
    multimap_ext::{Multimap, MultimapExt},
    response::VersionListing,
    types::{Paginated, ToStream, VersionLister},
    utils::{URL_ENCODING_TYPE, check_bucket_name},
};

/// Argument builder for the ListObjectVersions S3 API, created by
/// [list_object_versions()](crate::s3::client::ListVersionsExt::list_object_versions).
///
/// Use [`send()`](ListObjectVersions::send) for a single page, or
/// [`to_paginated()`](ListObjectVersions::to_paginated) to follow the
/// continuation markers until the listing is complete.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use version_listing::s3::client::{ListVersionsExt, MemoryLister};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let lister = Arc::new(MemoryLister::new());
/// let page = lister
///     .list_object_versions("my-bucket")
///     .prefix("photos/")
///     .delimiter("/")
///     .max_keys(100)
///     .build()
///     .send()
///     .await?;
/// println!("{} versions", page.version_summaries().len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, TypedBuilder)]
pub struct ListObjectVersions {
    client: Arc<dyn VersionLister>,
    #[builder(setter(into))]
    bucket: String,
    #[builder(default, setter(into, strip_option))]
    prefix: Option<String>,
    /// Delimiter to roll up common prefixes on.
    #[builder(default, setter(into, strip_option))]
    delimiter: Option<String>,
    #[builder(default, setter(into, strip_option))]
    key_marker: Option<String>,
    #[builder(default, setter(into, strip_option))]
    version_id_marker: Option<String>,
    #[builder(default, setter(strip_option))]
    max_keys: Option<u16>,
    #[builder(default)]
    config: ListingConfig,
    #[builder(default, setter(into))]
    extra_query_params: Option<Multimap>,
}

/// Builder type returned by [`ListVersionsExt::list_object_versions`](crate::s3::client::ListVersionsExt::list_object_versions)
pub type ListObjectVersionsBldr = ListObjectVersionsBuilder<(
    (Arc<dyn VersionLister>,),
    (String,),
    (),
    (),
    (),
    (),
    (),
    (),
    (),
)>;

impl ListObjectVersions {
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }

    pub fn key_marker(&self) -> Option<&str> {
        self.key_marker.as_deref()
    }

    pub fn version_id_marker(&self) -> Option<&str> {
        self.version_id_marker.as_deref()
    }

    /// Page size sent to the service: the request's own value, else the
    /// configured default.
    pub fn max_keys(&self) -> u16 {
        self.max_keys.unwrap_or(self.config.default_max_keys)
    }

    /// Encoding type the service is asked to apply to keys.
    pub fn encoding_type(&self) -> Option<&str> {
        self.config.url_encoding.then_some(URL_ENCODING_TYPE)
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    /// Checks the arguments without sending anything.
    pub fn validate(&self) -> Result<(), ValidationErr> {
        check_bucket_name(&self.bucket, true)?;
        let max_keys = self.max_keys();
        if max_keys == 0 || max_keys > MAX_KEYS_LIMIT {
            return Err(ValidationErr::InvalidMaxKeys(max_keys));
        }
        Ok(())
    }

    /// Builds the query parameters of the HTTP request for this page.
    pub fn to_query_params(&self) -> Result<Multimap, ValidationErr> {
        self.validate()?;

        let mut query_params = Multimap::new();
        if let Some(v) = &self.extra_query_params {
            query_params.add_multimap(v.clone());
        }
        query_params.add("versions", "");
        query_params.add_opt("delimiter", self.delimiter());
        query_params.add("max-keys", self.max_keys().to_string());
        query_params.add_opt("prefix", self.prefix());
        query_params.add_opt("encoding-type", self.encoding_type());
        query_params.add_opt("key-marker", self.key_marker());
        query_params.add_opt("version-id-marker", self.version_id_marker());
        Ok(query_params)
    }

    /// Sends this request through its lister and returns one page.
    pub async fn send(&self) -> Result<VersionListing, Error> {
        self.validate()?;
        log::debug!(
            "listing versions of bucket {} from key marker {:?}, version id marker {:?}",
            self.bucket,
            self.key_marker,
            self.version_id_marker
        );
        self.client.list_object_versions(self).await
    }

    /// Derives the request for the page following `page`.
    ///
    /// Returns `None` when `page` is the last one. A truncated page missing
    /// its continuation markers resumes after its last version; a page that
    /// would resume from the markers already in use is an error.
    pub fn next_request(&self, page: &VersionListing) -> Result<Option<Self>, ValidationErr> {
        if !page.is_truncated() {
            return Ok(None);
        }

        let (key_marker, version_id_marker) = match page.next_key_marker() {
            Some(k) => (
                k.to_string(),
                page.next_version_id_marker().map(str::to_string),
            ),
            None => match page.version_summaries().last() {
                Some(last) => {
                    log::warn!(
                        "truncated listing of bucket {} has no next key marker; resuming after {}",
                        self.bucket,
                        last.key
                    );
                    (last.key.clone(), Some(last.version_id.clone()))
                }
                None => {
                    return Err(ValidationErr::MissingContinuationMarker(
                        self.bucket.clone(),
                    ));
                }
            },
        };

        if self.key_marker.as_deref() == Some(key_marker.as_str())
            && self.version_id_marker == version_id_marker
        {
            log::warn!(
                "listing of bucket {} returned its own markers as continuation",
                self.bucket
            );
            return Err(ValidationErr::StalledPagination {
                bucket: self.bucket.clone(),
                key_marker,
            });
        }

        let mut next = self.clone();
        next.key_marker = Some(key_marker);
        next.version_id_marker = version_id_marker;
        Ok(Some(next))
    }

    /// Converts to a type that performs pagination automatically.
    pub fn to_paginated(self) -> ListObjectVersionsPaginated {
        ListObjectVersionsPaginated {
            args: Some(self),
            pending_error: None,
            pages_fetched: 0,
        }
    }
}

/// Adds pagination to the [`ListObjectVersions`] type.
#[derive(Debug)]
pub struct ListObjectVersionsPaginated {
    // None once the listing is complete or failed.
    args: Option<ListObjectVersions>,
    pending_error: Option<ValidationErr>,
    pages_fetched: usize,
}

impl ListObjectVersionsPaginated {
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_done(&self) -> bool {
        self.args.is_none() && self.pending_error.is_none()
    }
}

#[async_trait]
impl Paginated for ListObjectVersionsPaginated {
    type Item = VersionListing;

    async fn next_page(&mut self, max_items: Option<u16>) -> Option<Result<Self::Item, Error>> {
        if let Some(e) = self.pending_error.take() {
            return Some(Err(e.into()));
        }
        let mut args = self.args.take()?;
        if let Some(limit) = args.config.max_pages {
            if self.pages_fetched >= limit {
                log::debug!(
                    "stopping listing of bucket {} after {} pages",
                    args.bucket,
                    self.pages_fetched
                );
                return None;
            }
        }
        if max_items.is_some() {
            args.max_keys = max_items;
        }

        let resp = args.send().await;
        self.pages_fetched += 1;
        match resp {
            Ok(page) => {
                match args.next_request(&page) {
                    Ok(next) => self.args = next,
                    Err(e) => self.pending_error = Some(e),
                }
                Some(Ok(page))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[async_trait]
impl ToStream for ListObjectVersionsPaginated {
    type Item = VersionListing;

    async fn to_stream(self) -> Box<dyn Stream<Item = Result<Self::Item, Error>> + Unpin + Send> {
        Box::new(Box::pin(futures_stream::unfold(
            self,
            move |mut this| async move {
                let page = this.next_page(None).await?;
                Some((page, this))
            },
        )))
    }
}
