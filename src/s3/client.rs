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

//! Listers and the entry point for building version listing requests

use std::sync::Arc;

use crate::s3::builders::{ListObjectVersions, ListObjectVersionsBldr};
use crate::s3::types::VersionLister;

mod memory;

pub use memory::MemoryLister;

/// Entry point for building [`ListObjectVersions`] requests from a shared lister.
pub trait ListVersionsExt {
    /// Creates a [`ListObjectVersions`] request builder with this lister as its client.
    ///
    /// To execute the request, call [`ListObjectVersions::send()`] for one
    /// page, or [`ListObjectVersions::to_paginated()`] to walk all pages.
    fn list_object_versions<S: Into<String>>(&self, bucket: S) -> ListObjectVersionsBldr;
}

impl<L: VersionLister + 'static> ListVersionsExt for Arc<L> {
    fn list_object_versions<S: Into<String>>(&self, bucket: S) -> ListObjectVersionsBldr {
        let client: Arc<dyn VersionLister> = self.clone();
        ListObjectVersions::builder().client(client).bucket(bucket)
    }
}

impl ListVersionsExt for Arc<dyn VersionLister> {
    fn list_object_versions<S: Into<String>>(&self, bucket: S) -> ListObjectVersionsBldr {
        ListObjectVersions::builder()
            .client(self.clone())
            .bucket(bucket)
    }
}
