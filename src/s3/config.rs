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

//! Listing configuration

use std::str::FromStr;

use typed_builder::TypedBuilder;

/// Number of entries a service returns per page when `max-keys` is not sent.
pub const DEFAULT_MAX_KEYS: u16 = 1000;

/// Largest `max-keys` value a service accepts.
pub const MAX_KEYS_LIMIT: u16 = 1000;

pub const ENV_MAX_KEYS: &str = "LISTING_MAX_KEYS";
pub const ENV_URL_ENCODING: &str = "LISTING_URL_ENCODING";
pub const ENV_MAX_PAGES: &str = "LISTING_MAX_PAGES";

/// Defaults applied to version listing requests.
///
/// ```
/// use version_listing::s3::ListingConfig;
///
/// let config = ListingConfig::builder().default_max_keys(100).build();
/// assert_eq!(config.default_max_keys, 100);
/// assert!(config.url_encoding);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct ListingConfig {
    /// `max-keys` sent when the request does not set one.
    #[builder(default = DEFAULT_MAX_KEYS)]
    pub default_max_keys: u16,
    /// Ask the service to URL-encode keys in its response.
    #[builder(default = true)]
    pub url_encoding: bool,
    /// Upper bound on pages fetched by a paginator; `None` is unlimited.
    #[builder(default, setter(strip_option))]
    pub max_pages: Option<usize>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ListingConfig {
    /// Reads the configuration from `LISTING_*` environment variables.
    ///
    /// Absent or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let defaults = Self::default();
        Self {
            default_max_keys: parse_var(&lookup, ENV_MAX_KEYS)
                .filter(|v| (1..=MAX_KEYS_LIMIT).contains(v))
                .unwrap_or(defaults.default_max_keys),
            url_encoding: parse_var(&lookup, ENV_URL_ENCODING).unwrap_or(defaults.url_encoding),
            max_pages: parse_var(&lookup, ENV_MAX_PAGES).or(defaults.max_pages),
        }
    }
}

fn parse_var<T: FromStr, F: Fn(&str) -> Option<String>>(lookup: &F, name: &str) -> Option<T> {
    let value = lookup(name)?;
    match value.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring unparsable value '{value}' of {name}");
            None
        }
    }
}
