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

//! Entries of a version listing: object versions and delete markers.

use serde::{Deserialize, Serialize};

use crate::s3::utils::UtcTime;

/// Version id reported for objects written while versioning was off.
pub const NULL_VERSION_ID: &str = "null";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
/// Owner of an object version
pub struct Owner {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
/// Contains information of one entry of a [`VersionListing`](crate::s3::response::VersionListing)
pub struct VersionSummary {
    pub key: String,
    pub version_id: String,
    pub is_latest: bool,
    pub last_modified: UtcTime,
    #[serde(default, rename = "ETag", skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>, // except DeleteMarker
    #[serde(default)]
    pub size: u64, // 0 for DeleteMarker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub is_delete_marker: bool,
}

impl VersionSummary {
    /// Creates a summary of a stored object version.
    pub fn object(
        key: impl Into<String>,
        version_id: impl Into<String>,
        last_modified: UtcTime,
        etag: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            key: key.into(),
            version_id: version_id.into(),
            is_latest: false,
            last_modified,
            etag: Some(etag.into()),
            size,
            storage_class: Some(String::from("STANDARD")),
            owner: None,
            is_delete_marker: false,
        }
    }

    /// Creates a summary of a delete marker.
    pub fn delete_marker(
        key: impl Into<String>,
        version_id: impl Into<String>,
        last_modified: UtcTime,
    ) -> Self {
        Self {
            key: key.into(),
            version_id: version_id.into(),
            is_latest: false,
            last_modified,
            etag: None,
            size: 0,
            storage_class: None,
            owner: None,
            is_delete_marker: true,
        }
    }

    pub fn with_latest(mut self, is_latest: bool) -> Self {
        self.is_latest = is_latest;
        self
    }

    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn is_null_version(&self) -> bool {
        self.version_id == NULL_VERSION_ID
    }

    /// Reads empty optional values as absent.
    pub(crate) fn normalized(mut self) -> Self {
        self.etag = self.etag.filter(|v| !v.is_empty());
        self.storage_class = self.storage_class.filter(|v| !v.is_empty());
        if let Some(owner) = self.owner.as_mut() {
            owner.display_name = owner.display_name.take().filter(|v| !v.is_empty());
        }
        self
    }
}
