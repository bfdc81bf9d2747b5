// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
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

//! In-memory versioned key store serving version listings.

use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::s3::builders::ListObjectVersions;
use crate::s3::error::Error;
use crate::s3::response::VersionListing;
use crate::s3::types::{Owner, VersionLister, VersionSummary};
use crate::s3::utils::utc_now;

// Versions of one key, newest first.
type KeyVersions = Vec<VersionSummary>;

/// A [`VersionLister`] backed by an in-memory versioned key store.
///
/// Keys are kept sorted, and the versions of each key newest first, which is
/// the order listings are returned in. Cloning shares the store.
#[derive(Clone, Debug, Default)]
pub struct MemoryLister {
    buckets: Arc<DashMap<String, BTreeMap<String, KeyVersions>>>,
    owner: Option<Owner>,
}

impl MemoryLister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the owner recorded on versions written from now on.
    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Creates an empty bucket. Returns false if it already existed.
    pub fn make_bucket(&self, bucket: &str) -> bool {
        let mut created = false;
        self.buckets.entry(bucket.to_string()).or_insert_with(|| {
            created = true;
            BTreeMap::new()
        });
        created
    }

    /// Stores a new version of `key` and returns its version id.
    pub fn put_object(&self, bucket: &str, key: &str, size: u64) -> Result<String, Error> {
        let version_id = Uuid::new_v4().simple().to_string();
        let etag = format!("\"{}\"", Uuid::new_v4().simple());
        let summary = VersionSummary::object(key, version_id.clone(), utc_now(), etag, size);
        self.push_version(bucket, summary)?;
        log::debug!("stored version {version_id} of {bucket}/{key}");
        Ok(version_id)
    }

    /// Stores a delete marker as the newest version of `key` and returns its version id.
    pub fn put_delete_marker(&self, bucket: &str, key: &str) -> Result<String, Error> {
        let version_id = Uuid::new_v4().simple().to_string();
        let summary = VersionSummary::delete_marker(key, version_id.clone(), utc_now());
        self.push_version(bucket, summary)?;
        log::debug!("stored delete marker {version_id} of {bucket}/{key}");
        Ok(version_id)
    }

    /// Removes one version of `key`. Returns false if no such version exists.
    pub fn remove_version(&self, bucket: &str, key: &str, version_id: &str) -> Result<bool, Error> {
        let mut keys = self
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| Error::NoSuchBucket(bucket.to_string()))?;
        let Some(versions) = keys.get_mut(key) else {
            return Ok(false);
        };
        let Some(idx) = versions.iter().position(|v| v.version_id == version_id) else {
            return Ok(false);
        };
        versions.remove(idx);
        if versions.is_empty() {
            keys.remove(key);
        }
        Ok(true)
    }

    fn push_version(&self, bucket: &str, mut summary: VersionSummary) -> Result<(), Error> {
        let mut keys = self
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| Error::NoSuchBucket(bucket.to_string()))?;
        summary.owner = self.owner.clone();
        keys.entry(summary.key.clone())
            .or_default()
            .insert(0, summary);
        Ok(())
    }

    fn list(&self, request: &ListObjectVersions) -> Result<VersionListing, Error> {
        let keys = self
            .buckets
            .get(request.bucket())
            .ok_or_else(|| Error::NoSuchBucket(request.bucket().to_string()))?;

        let prefix = request.prefix().unwrap_or("");
        let delimiter = request.delimiter().filter(|d| !d.is_empty());
        let key_marker = request.key_marker();
        let version_id_marker = request.version_id_marker();
        let max_keys = usize::from(request.max_keys());

        let start = match key_marker {
            Some(m) if m > prefix => Bound::Included(m.to_string()),
            _ => Bound::Included(prefix.to_string()),
        };

        let mut summaries: Vec<VersionSummary> = Vec::new();
        let mut common_prefixes: Vec<String> = Vec::new();
        let mut seen_prefixes = HashSet::new();
        let mut is_truncated = false;

        'keys: for (key, versions) in keys.range::<String, _>((start, Bound::Unbounded)) {
            if !key.starts_with(prefix) {
                // Sorted keys: nothing past the prefix range can match.
                break;
            }

            let at_marker = key_marker == Some(key.as_str());
            if at_marker && version_id_marker.is_none() {
                continue;
            }

            if let Some(d) = delimiter {
                let rest = &key[prefix.len()..];
                if let Some(pos) = rest.find(d) {
                    let common_prefix = format!("{prefix}{}{d}", &rest[..pos]);
                    if !seen_prefixes.contains(&common_prefix) {
                        if summaries.len() >= max_keys {
                            is_truncated = true;
                            break 'keys;
                        }
                        seen_prefixes.insert(common_prefix.clone());
                        common_prefixes.push(common_prefix);
                    }
                    continue;
                }
            }

            let mut skipping = at_marker;
            for (idx, version) in versions.iter().enumerate() {
                if skipping {
                    if Some(version.version_id.as_str()) == version_id_marker {
                        skipping = false;
                    }
                    continue;
                }
                if summaries.len() >= max_keys {
                    is_truncated = true;
                    break 'keys;
                }
                summaries.push(version.clone().with_latest(idx == 0));
            }
            if skipping {
                log::debug!(
                    "version id marker {version_id_marker:?} not found under key {key}; skipped key"
                );
            }
        }

        let next = if is_truncated {
            summaries
                .last()
                .map(|v| (v.key.clone(), v.version_id.clone()))
        } else {
            None
        };

        log::debug!(
            "listed {} versions and {} common prefixes of bucket {}, truncated: {is_truncated}",
            summaries.len(),
            common_prefixes.len(),
            request.bucket()
        );

        Ok(VersionListing::builder()
            .bucket_name(request.bucket())
            .version_summaries(summaries)
            .common_prefixes(common_prefixes)
            .prefix(request.prefix().map(str::to_string))
            .key_marker(key_marker.map(str::to_string))
            .version_id_marker(version_id_marker.map(str::to_string))
            .delimiter(delimiter.map(str::to_string))
            .max_keys(request.max_keys())
            .encoding_type(request.encoding_type().map(str::to_string))
            .is_truncated(is_truncated)
            .next_key_marker(next.as_ref().map(|n| n.0.clone()))
            .next_version_id_marker(next.map(|n| n.1))
            .build())
    }
}

#[async_trait]
impl VersionLister for MemoryLister {
    async fn list_object_versions(
        &self,
        request: &ListObjectVersions,
    ) -> Result<VersionListing, Error> {
        self.list(request)
    }
}
