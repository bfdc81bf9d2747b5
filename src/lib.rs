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

//! # Version listing for S3 compatible object storage
//!
//! This crate provides a strongly-typed model of the S3 `ListObjectVersions`
//! API: the request arguments, the immutable page returned for each call, the
//! continuation protocol between pages, and the XML wire format of a page.
//!
//! The transport is not part of this crate. Any type implementing
//! [`s3::types::VersionLister`] can serve pages; [`s3::client::MemoryLister`]
//! is an in-memory versioned key store that does so locally.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use futures_util::StreamExt;
//! use version_listing::s3::client::{ListVersionsExt, MemoryLister};
//! use version_listing::s3::types::ToStream;
//!
//! #[tokio::main]
//! async fn main() {
//!     let lister = Arc::new(MemoryLister::new());
//!     lister.make_bucket("my-bucket");
//!     lister.put_object("my-bucket", "foo/boo", 11).unwrap();
//!
//!     let mut pages = lister
//!         .list_object_versions("my-bucket")
//!         .prefix("foo/")
//!         .build()
//!         .to_paginated()
//!         .to_stream()
//!         .await;
//!
//!     while let Some(page) = pages.next().await {
//!         for version in page.expect("listing failed").version_summaries() {
//!             println!("{} {}", version.key, version.version_id);
//!         }
//!     }
//! }
//! ```
//!
//! ## Design
//! - [`s3::builders::ListObjectVersions`] holds the request and knows how to derive the next one
//! - [`s3::response::VersionListing`] is an immutable snapshot of one page
//! - [`s3::builders::ListObjectVersionsPaginated`] drives the continuation protocol

#![allow(clippy::result_large_err)]
pub mod s3;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;
