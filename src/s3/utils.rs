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

//! Various utility and helper functions

use chrono::{DateTime, NaiveDateTime, ParseError, SubsecRound, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::s3::error::ValidationErr;

/// Date and time with UTC timezone
pub type UtcTime = DateTime<Utc>;

/// Encoding type value that makes the server URL-encode keys in a listing.
pub const URL_ENCODING_TYPE: &str = "url";

/// Gets the current time truncated to the millisecond precision of listings.
pub fn utc_now() -> UtcTime {
    Utc::now().trunc_subsecs(3)
}

/// Gets ISO8601 UTC formatted value of given time
pub fn to_iso8601utc(time: UtcTime) -> String {
    time.format("%Y-%m-%dT%H:%M:%S.%3fZ").to_string()
}

/// Parses ISO8601 UTC formatted value to time
pub fn from_iso8601utc(s: &str) -> Result<UtcTime, ParseError> {
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(
        match NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S.%3fZ") {
            Ok(d) => d,
            _ => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ")?,
        },
        Utc,
    ))
}

/// URL-decodes given value.
pub fn url_decode(s: &str) -> Result<String, ValidationErr> {
    urlencoding::decode(s)
        .map(|v| v.into_owned())
        .map_err(|e| ValidationErr::UrlDecodeError {
            input: s.to_string(),
            message: e.to_string(),
        })
}

/// URL-encodes given value.
pub fn url_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Decodes a listing value when the listing was URL-encoded.
pub fn decode_url_value(encoding_type: Option<&str>, value: String) -> Result<String, ValidationErr> {
    match encoding_type {
        Some(URL_ENCODING_TYPE) => url_decode(&value),
        _ => Ok(value),
    }
}

/// Decodes an optional listing value when the listing was URL-encoded.
pub fn decode_if_url(
    encoding_type: Option<&str>,
    value: Option<String>,
) -> Result<Option<String>, ValidationErr> {
    value.map(|v| decode_url_value(encoding_type, v)).transpose()
}

/// Encodes a listing value when the listing is URL-encoded.
pub fn encode_if_url(encoding_type: Option<&str>, value: &str) -> String {
    match encoding_type {
        Some(URL_ENCODING_TYPE) => url_encode(value),
        _ => value.to_string(),
    }
}

/// Returns true if the value starts or ends with a character a hostname label cannot.
fn has_invalid_edge(value: &str) -> bool {
    value.starts_with('-')
        || value.starts_with('_')
        || value.ends_with('-')
        || value.ends_with('_')
}

/// Validates given bucket name
pub fn check_bucket_name(bucket_name: &str, strict: bool) -> Result<(), ValidationErr> {
    if bucket_name.trim().is_empty() {
        return Err(ValidationErr::InvalidBucketName(String::from(
            "bucket name cannot be empty",
        )));
    }

    if bucket_name.len() < 3 {
        return Err(ValidationErr::InvalidBucketName(String::from(
            "bucket name cannot be less than 3 characters",
        )));
    }

    if bucket_name.len() > 63 {
        return Err(ValidationErr::InvalidBucketName(String::from(
            "bucket name cannot be greater than 63 characters",
        )));
    }

    lazy_static! {
        static ref IPV4_REGEX: Regex = Regex::new(r"^((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])\.){3}(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])$").unwrap();
        static ref VALID_BUCKET_NAME_REGEX: Regex =
            Regex::new("^[A-Za-z0-9][A-Za-z0-9\\.\\-_:]{1,61}[A-Za-z0-9]$").unwrap();
        static ref VALID_BUCKET_NAME_STRICT_REGEX: Regex =
            Regex::new("^[a-z0-9][a-z0-9\\.\\-]{1,61}[a-z0-9]$").unwrap();
    }

    if IPV4_REGEX.is_match(bucket_name) {
        return Err(ValidationErr::InvalidBucketName(String::from(
            "bucket name cannot be an IP address",
        )));
    }

    if bucket_name.contains("..") || bucket_name.contains(".-") || bucket_name.contains("-.") {
        return Err(ValidationErr::InvalidBucketName(String::from(
            "bucket name contains invalid successive characters '..', '.-' or '-.'",
        )));
    }

    if has_invalid_edge(bucket_name) {
        return Err(ValidationErr::InvalidBucketName(String::from(
            "bucket name cannot start or end with '-' or '_'",
        )));
    }

    if strict {
        if !VALID_BUCKET_NAME_STRICT_REGEX.is_match(bucket_name) {
            return Err(ValidationErr::InvalidBucketName(String::from(
                "bucket name does not follow S3 standards strictly",
            )));
        }
    } else if !VALID_BUCKET_NAME_REGEX.is_match(bucket_name) {
        return Err(ValidationErr::InvalidBucketName(String::from(
            "bucket name does not follow S3 standards",
        )));
    }

    Ok(())
}

pub mod xml {
    use std::collections::HashMap;

    use crate::s3::error::ValidationErr;

    #[derive(Debug, Clone)]
    struct XmlElementIndex {
        children: HashMap<String, Vec<usize>>,
    }

    impl XmlElementIndex {
        fn get_first(&self, tag: &str) -> Option<usize> {
            self.children.get(tag)?.first().copied()
        }

        fn get(&self, tag: &str) -> Option<&Vec<usize>> {
            self.children.get(tag)
        }
    }

    impl From<&xmltree::Element> for XmlElementIndex {
        fn from(value: &xmltree::Element) -> Self {
            let mut children = HashMap::new();
            for (i, e) in value
                .children
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.as_element().map(|e| (i, e)))
            {
                children
                    .entry(e.name.clone())
                    .or_insert_with(Vec::new)
                    .push(i);
            }
            Self { children }
        }
    }

    /// Read-only view of an [`xmltree::Element`] with its children indexed by tag.
    #[derive(Debug, Clone)]
    pub struct Element<'a> {
        inner: &'a xmltree::Element,
        child_element_index: XmlElementIndex,
    }

    impl<'a> From<&'a xmltree::Element> for Element<'a> {
        fn from(value: &'a xmltree::Element) -> Self {
            let element_index = XmlElementIndex::from(value);
            Self {
                inner: value,
                child_element_index: element_index,
            }
        }
    }

    impl<'a> Element<'a> {
        pub fn name(&self) -> &str {
            self.inner.name.as_str()
        }

        /// Returns the text of the first child with given tag; `None` if the
        /// child is missing or has no text.
        pub fn get_child_text(&self, tag: &str) -> Option<String> {
            self.get_child_text_or_empty(tag).filter(|v| !v.is_empty())
        }

        /// Returns the text of the first child with given tag, or an empty
        /// string if the child is present without text.
        pub fn get_child_text_or_empty(&self, tag: &str) -> Option<String> {
            let index = self.child_element_index.get_first(tag)?;
            self.inner.children[index].as_element().map(element_text)
        }

        pub fn get_child_text_or_error(&self, tag: &str) -> Result<String, ValidationErr> {
            self.get_child_text_or_empty(tag)
                .ok_or(ValidationErr::XmlError(format!("<{tag}> tag not found")))
        }

        // Returns all children with given tag along with their index.
        pub fn get_matching_children(&self, tag: &str) -> Vec<(usize, Element<'a>)> {
            self.child_element_index
                .get(tag)
                .map(|is| {
                    is.iter()
                        .filter_map(|i| {
                            self.inner.children[*i]
                                .as_element()
                                .map(|e| (*i, Element::from(e)))
                        })
                        .collect()
                })
                .unwrap_or_default()
        }

        pub fn get_child(&self, tag: &str) -> Option<Element<'a>> {
            let index = self.child_element_index.get_first(tag)?;
            Some(self.inner.children[index].as_element()?.into())
        }
    }

    // Helper type that implements merge sort in the iterator.
    pub struct MergeXmlElements<'a> {
        v1: &'a [(usize, Element<'a>)],
        v2: &'a [(usize, Element<'a>)],
        i1: usize,
        i2: usize,
    }

    impl<'a> MergeXmlElements<'a> {
        pub fn new(v1: &'a [(usize, Element<'a>)], v2: &'a [(usize, Element<'a>)]) -> Self {
            Self {
                v1,
                v2,
                i1: 0,
                i2: 0,
            }
        }
    }

    impl<'a> Iterator for MergeXmlElements<'a> {
        type Item = &'a Element<'a>;

        fn next(&mut self) -> Option<Self::Item> {
            let c1 = self.v1.get(self.i1);
            let c2 = self.v2.get(self.i2);
            match (c1, c2) {
                (Some(val1), Some(val2)) => {
                    if val1.0 < val2.0 {
                        self.i1 += 1;
                        Some(&val1.1)
                    } else {
                        self.i2 += 1;
                        Some(&val2.1)
                    }
                }
                (Some(val1), None) => {
                    self.i1 += 1;
                    Some(&val1.1)
                }
                (None, Some(val2)) => {
                    self.i2 += 1;
                    Some(&val2.1)
                }
                (None, None) => None,
            }
        }
    }

    // Concatenated text and CDATA children.
    fn element_text(elem: &xmltree::Element) -> String {
        elem.children
            .iter()
            .filter_map(|node| match node {
                xmltree::XMLNode::Text(s) | xmltree::XMLNode::CData(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Builds an element holding a single text node.
    ///
    /// Whitespace-only text is written as CDATA.
    pub fn text_element(name: &str, text: impl Into<String>) -> xmltree::Element {
        let text = text.into();
        let mut elem = xmltree::Element::new(name);
        if text.is_empty() {
            return elem;
        }
        if text.chars().all(char::is_whitespace) {
            elem.children.push(xmltree::XMLNode::CData(text));
        } else {
            elem.children.push(xmltree::XMLNode::Text(text));
        }
        elem
    }

    /// Builds an element holding the given child elements.
    pub fn parent_element(name: &str, children: Vec<xmltree::Element>) -> xmltree::Element {
        let mut elem = xmltree::Element::new(name);
        elem.children
            .extend(children.into_iter().map(xmltree::XMLNode::Element));
        elem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso8601_round_trip() {
        let t = from_iso8601utc("2024-03-09T10:11:12.345Z").unwrap();
        assert_eq!(to_iso8601utc(t), "2024-03-09T10:11:12.345Z");
        let t = from_iso8601utc("2024-03-09T10:11:12Z").unwrap();
        assert_eq!(to_iso8601utc(t), "2024-03-09T10:11:12.000Z");
        assert!(from_iso8601utc("yesterday").is_err());
    }

    #[test]
    fn test_check_bucket_name() {
        assert!(check_bucket_name("my-bucket", true).is_ok());
        assert!(check_bucket_name("ab", true).is_err());
        assert!(check_bucket_name("", true).is_err());
        assert!(check_bucket_name("192.168.1.1", true).is_err());
        assert!(check_bucket_name("my..bucket", true).is_err());
        assert!(check_bucket_name("My_Bucket", true).is_err());
        assert!(check_bucket_name("My_Bucket", false).is_ok());
        assert!(check_bucket_name(&"a".repeat(64), false).is_err());
    }

    #[test]
    fn test_decode_if_url() {
        assert_eq!(
            decode_if_url(Some("url"), Some("foo%2Fbar%20baz".into())).unwrap(),
            Some("foo/bar baz".to_string())
        );
        assert_eq!(
            decode_if_url(None, Some("foo%2Fbar".into())).unwrap(),
            Some("foo%2Fbar".to_string())
        );
        assert_eq!(decode_if_url(Some("url"), None).unwrap(), None);
        assert!(decode_if_url(Some("url"), Some("%FF%FE".into())).is_err());
    }

    #[test]
    fn test_xml_child_text_keeps_empty_and_whitespace() {
        let doc = xml::parent_element(
            "Root",
            vec![
                xml::text_element("Empty", ""),
                xml::text_element("Blank", " \t "),
                xml::text_element("Padded", " a "),
            ],
        );
        let mut buf = Vec::new();
        doc.write(&mut buf).unwrap();
        let parsed = xmltree::Element::parse(buf.as_slice()).unwrap();
        let root = xml::Element::from(&parsed);

        assert_eq!(root.get_child_text("Empty"), None);
        assert_eq!(root.get_child_text_or_empty("Empty"), Some(String::new()));
        assert_eq!(root.get_child_text_or_error("Empty").unwrap(), "");
        assert_eq!(root.get_child_text("Blank"), Some(" \t ".to_string()));
        assert_eq!(root.get_child_text("Padded"), Some(" a ".to_string()));
        assert_eq!(root.get_child_text_or_empty("Missing"), None);
        assert!(root.get_child_text_or_error("Missing").is_err());
    }

    quickcheck! {
        fn prop_url_encode_decode(s: String) -> bool {
            url_decode(&url_encode(&s)).map(|d| d == s).unwrap_or(false)
        }
    }
}
