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

//! Response type for the ListObjectVersions API

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::s3::{
    config::DEFAULT_MAX_KEYS,
    error::{Error, ValidationErr},
    types::{NULL_VERSION_ID, Owner, VersionSummary},
    utils::{
        decode_if_url, decode_url_value, encode_if_url, from_iso8601utc, to_iso8601utc,
        xml::{Element, MergeXmlElements, parent_element, text_element},
    },
};

const ROOT_TAG: &str = "ListVersionsResult";

fn default_max_keys() -> u16 {
    DEFAULT_MAX_KEYS
}

/// Unchecked field values of a [`VersionListing`].
///
/// This is what a lister fills in; converting it into a [`VersionListing`]
/// establishes the page invariants.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder, Deserialize)]
#[builder(build_method(into = VersionListing))]
#[serde(rename_all = "PascalCase")]
pub struct VersionListingParts {
    #[builder(setter(into))]
    #[serde(rename = "Name")]
    pub bucket_name: String,
    #[builder(default)]
    #[serde(default)]
    pub version_summaries: Vec<VersionSummary>,
    #[builder(default)]
    #[serde(default)]
    pub common_prefixes: Vec<String>,
    #[builder(default, setter(into))]
    #[serde(default)]
    pub prefix: Option<String>,
    #[builder(default, setter(into))]
    #[serde(default)]
    pub key_marker: Option<String>,
    #[builder(default, setter(into))]
    #[serde(default)]
    pub version_id_marker: Option<String>,
    #[builder(default, setter(into))]
    #[serde(default)]
    pub delimiter: Option<String>,
    #[builder(default = DEFAULT_MAX_KEYS)]
    #[serde(default = "default_max_keys")]
    pub max_keys: u16,
    #[builder(default, setter(into))]
    #[serde(default)]
    pub encoding_type: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub is_truncated: bool,
    #[builder(default, setter(into))]
    #[serde(default)]
    pub next_key_marker: Option<String>,
    #[builder(default, setter(into))]
    #[serde(default)]
    pub next_version_id_marker: Option<String>,
}

/// One page of a [list_object_versions()](crate::s3::client::ListVersionsExt::list_object_versions) call.
///
/// The page is an immutable snapshot. Construction guarantees that:
///
/// * continuation markers are present only on a truncated page,
/// * common prefixes are present only when a delimiter was requested, and
///   each one appears once, in the order first seen,
/// * empty strings in echoed parameters, markers and optional version
///   summary fields read as absent.
///
/// Version summaries keep the order they were supplied in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", from = "VersionListingParts")]
pub struct VersionListing {
    #[serde(rename = "Name")]
    bucket_name: String,
    version_summaries: Vec<VersionSummary>,
    common_prefixes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_id_marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delimiter: Option<String>,
    max_keys: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding_type: Option<String>,
    is_truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_key_marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_version_id_marker: Option<String>,
}

impl Default for VersionListingParts {
    fn default() -> Self {
        Self {
            bucket_name: String::new(),
            version_summaries: Vec::new(),
            common_prefixes: Vec::new(),
            prefix: None,
            key_marker: None,
            version_id_marker: None,
            delimiter: None,
            max_keys: DEFAULT_MAX_KEYS,
            encoding_type: None,
            is_truncated: false,
            next_key_marker: None,
            next_version_id_marker: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<VersionListingParts> for VersionListing {
    fn from(parts: VersionListingParts) -> Self {
        let is_truncated = parts.is_truncated;
        let mut next_key_marker = non_empty(parts.next_key_marker);
        let mut next_version_id_marker = non_empty(parts.next_version_id_marker);
        if !is_truncated && (next_key_marker.is_some() || next_version_id_marker.is_some()) {
            log::debug!(
                "dropping continuation markers of complete listing of bucket {}",
                parts.bucket_name
            );
            next_key_marker = None;
            next_version_id_marker = None;
        }

        let delimiter = non_empty(parts.delimiter);
        let common_prefixes = if delimiter.is_none() {
            if !parts.common_prefixes.is_empty() {
                log::debug!(
                    "dropping {} common prefixes of undelimited listing of bucket {}",
                    parts.common_prefixes.len(),
                    parts.bucket_name
                );
            }
            Vec::new()
        } else {
            let mut seen = HashSet::with_capacity(parts.common_prefixes.len());
            parts
                .common_prefixes
                .into_iter()
                .filter(|p| seen.insert(p.clone()))
                .collect()
        };

        VersionListing {
            bucket_name: parts.bucket_name,
            version_summaries: parts
                .version_summaries
                .into_iter()
                .map(VersionSummary::normalized)
                .collect(),
            common_prefixes,
            prefix: non_empty(parts.prefix),
            key_marker: non_empty(parts.key_marker),
            version_id_marker: non_empty(parts.version_id_marker),
            delimiter,
            max_keys: parts.max_keys,
            encoding_type: non_empty(parts.encoding_type),
            is_truncated,
            next_key_marker,
            next_version_id_marker,
        }
    }
}

impl From<VersionListing> for VersionListingParts {
    fn from(value: VersionListing) -> Self {
        VersionListingParts {
            bucket_name: value.bucket_name,
            version_summaries: value.version_summaries,
            common_prefixes: value.common_prefixes,
            prefix: value.prefix,
            key_marker: value.key_marker,
            version_id_marker: value.version_id_marker,
            delimiter: value.delimiter,
            max_keys: value.max_keys,
            encoding_type: value.encoding_type,
            is_truncated: value.is_truncated,
            next_key_marker: value.next_key_marker,
            next_version_id_marker: value.next_version_id_marker,
        }
    }
}

impl VersionListing {
    /// Returns a builder taking every field of the page.
    pub fn builder() -> VersionListingPartsBuilder {
        VersionListingParts::builder()
    }

    /// Name of the bucket that was listed.
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Object versions and delete markers, in the order the service returned them.
    pub fn version_summaries(&self) -> &[VersionSummary] {
        &self.version_summaries
    }

    /// Keys rolled up at the first delimiter after the prefix.
    pub fn common_prefixes(&self) -> &[String] {
        &self.common_prefixes
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn key_marker(&self) -> Option<&str> {
        self.key_marker.as_deref()
    }

    pub fn version_id_marker(&self) -> Option<&str> {
        self.version_id_marker.as_deref()
    }

    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }

    pub fn max_keys(&self) -> u16 {
        self.max_keys
    }

    pub fn encoding_type(&self) -> Option<&str> {
        self.encoding_type.as_deref()
    }

    /// True if more pages follow this one.
    pub fn is_truncated(&self) -> bool {
        self.is_truncated
    }

    /// Key marker for the next request; only set on a truncated page.
    pub fn next_key_marker(&self) -> Option<&str> {
        self.next_key_marker.as_deref()
    }

    /// Version id marker for the next request; only set on a truncated page.
    pub fn next_version_id_marker(&self) -> Option<&str> {
        self.next_version_id_marker.as_deref()
    }

    pub fn into_version_summaries(self) -> Vec<VersionSummary> {
        self.version_summaries
    }

    pub fn into_parts(self) -> VersionListingParts {
        self.into()
    }

    /// Parses a `ListVersionsResult` XML document.
    ///
    /// Keys, prefixes, the delimiter and key markers are URL-decoded when the
    /// document declares `<EncodingType>url</EncodingType>`.
    pub fn from_xml(body: &[u8]) -> Result<Self, Error> {
        let xmltree_root = xmltree::Element::parse(body)?;
        let root = Element::from(&xmltree_root);
        if root.name() != ROOT_TAG {
            return Err(ValidationErr::XmlError(format!(
                "unexpected root <{}>, expected <{ROOT_TAG}>",
                root.name()
            ))
            .into());
        }

        let encoding_type = root.get_child_text("EncodingType");
        let et = encoding_type.as_deref();

        let bucket_name = root.get_child_text_or_error("Name")?;
        let prefix = decode_if_url(et, root.get_child_text("Prefix"))?;
        let key_marker = decode_if_url(et, root.get_child_text("KeyMarker"))?;
        let version_id_marker = root.get_child_text("VersionIdMarker");
        let delimiter = decode_if_url(et, root.get_child_text("Delimiter"))?;
        let max_keys = root
            .get_child_text("MaxKeys")
            .map(|x| x.trim().parse::<u16>())
            .transpose()?
            .unwrap_or(DEFAULT_MAX_KEYS);
        let is_truncated = root
            .get_child_text("IsTruncated")
            .map(|x| x.trim().to_lowercase().parse::<bool>())
            .transpose()?
            .unwrap_or(false);
        let next_key_marker = decode_if_url(et, root.get_child_text("NextKeyMarker"))?;
        let next_version_id_marker = root.get_child_text("NextVersionIdMarker");

        let versions = root.get_matching_children("Version");
        let delete_markers = root.get_matching_children("DeleteMarker");
        let version_summaries = MergeXmlElements::new(&versions, &delete_markers)
            .map(|e| parse_version_summary(e, et))
            .collect::<Result<Vec<_>, _>>()?;

        let mut common_prefixes = Vec::new();
        for (_, common_prefix) in root.get_matching_children("CommonPrefixes") {
            common_prefixes.push(decode_url_value(
                et,
                common_prefix.get_child_text_or_error("Prefix")?,
            )?);
        }

        Ok(VersionListing::builder()
            .bucket_name(bucket_name)
            .version_summaries(version_summaries)
            .common_prefixes(common_prefixes)
            .prefix(prefix)
            .key_marker(key_marker)
            .version_id_marker(version_id_marker)
            .delimiter(delimiter)
            .max_keys(max_keys)
            .encoding_type(encoding_type)
            .is_truncated(is_truncated)
            .next_key_marker(next_key_marker)
            .next_version_id_marker(next_version_id_marker)
            .build())
    }

    /// Renders the page as a `ListVersionsResult` XML document.
    pub fn to_xml(&self) -> Result<String, Error> {
        let et = self.encoding_type.as_deref();
        let mut children = vec![text_element("Name", self.bucket_name.as_str())];
        if let Some(v) = &self.prefix {
            children.push(text_element("Prefix", encode_if_url(et, v)));
        }
        if let Some(v) = &self.key_marker {
            children.push(text_element("KeyMarker", encode_if_url(et, v)));
        }
        if let Some(v) = &self.version_id_marker {
            children.push(text_element("VersionIdMarker", v.as_str()));
        }
        if let Some(v) = &self.next_key_marker {
            children.push(text_element("NextKeyMarker", encode_if_url(et, v)));
        }
        if let Some(v) = &self.next_version_id_marker {
            children.push(text_element("NextVersionIdMarker", v.as_str()));
        }
        children.push(text_element("MaxKeys", self.max_keys.to_string()));
        if let Some(v) = &self.delimiter {
            children.push(text_element("Delimiter", encode_if_url(et, v)));
        }
        if let Some(v) = et {
            children.push(text_element("EncodingType", v));
        }
        children.push(text_element("IsTruncated", self.is_truncated.to_string()));
        for summary in &self.version_summaries {
            children.push(version_summary_element(summary, et));
        }
        for prefix in &self.common_prefixes {
            children.push(parent_element(
                "CommonPrefixes",
                vec![text_element("Prefix", encode_if_url(et, prefix))],
            ));
        }

        let mut buf = Vec::new();
        parent_element(ROOT_TAG, children).write(&mut buf)?;
        String::from_utf8(buf).map_err(|e| ValidationErr::XmlError(e.to_string()).into())
    }

    /// Parses the JSON form of a page.
    pub fn from_json(body: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Renders the page in its JSON form.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

fn parse_version_summary(
    content: &Element,
    encoding_type: Option<&str>,
) -> Result<VersionSummary, Error> {
    let key = decode_url_value(encoding_type, content.get_child_text_or_error("Key")?)?;
    let version_id = content
        .get_child_text_or_empty("VersionId")
        .unwrap_or_else(|| NULL_VERSION_ID.to_string());
    let is_latest = content
        .get_child_text("IsLatest")
        .map(|x| x.trim().to_lowercase().parse::<bool>())
        .transpose()?
        .unwrap_or(false);
    let last_modified = from_iso8601utc(&content.get_child_text_or_error("LastModified")?)?;
    let size = content
        .get_child_text("Size")
        .map(|x| x.trim().parse::<u64>())
        .transpose()?
        .unwrap_or(0);
    let owner = content.get_child("Owner").map(|v| Owner {
        id: v.get_child_text("ID").unwrap_or_default(),
        display_name: v.get_child_text("DisplayName"),
    });

    Ok(VersionSummary {
        key,
        version_id,
        is_latest,
        last_modified,
        etag: content.get_child_text("ETag"),
        size,
        storage_class: content.get_child_text("StorageClass"),
        owner,
        is_delete_marker: content.name() == "DeleteMarker",
    })
}

fn version_summary_element(
    summary: &VersionSummary,
    encoding_type: Option<&str>,
) -> xmltree::Element {
    let mut children = vec![
        text_element("Key", encode_if_url(encoding_type, &summary.key)),
        text_element("VersionId", summary.version_id.as_str()),
        text_element("IsLatest", summary.is_latest.to_string()),
        text_element("LastModified", to_iso8601utc(summary.last_modified)),
    ];
    if let Some(v) = &summary.etag {
        children.push(text_element("ETag", v.as_str()));
    }
    if !summary.is_delete_marker {
        children.push(text_element("Size", summary.size.to_string()));
    }
    if let Some(v) = &summary.storage_class {
        children.push(text_element("StorageClass", v.as_str()));
    }
    if let Some(owner) = &summary.owner {
        let mut owner_children = vec![text_element("ID", owner.id.as_str())];
        if let Some(v) = &owner.display_name {
            owner_children.push(text_element("DisplayName", v.as_str()));
        }
        children.push(parent_element("Owner", owner_children));
    }

    let tag = if summary.is_delete_marker {
        "DeleteMarker"
    } else {
        "Version"
    };
    parent_element(tag, children)
}
