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

//! Error definitions for version listing

use thiserror::Error;

/// Errors raised while validating requests or decoding listing documents,
/// before or after any lister is involved.
#[derive(Debug, Error)]
pub enum ValidationErr {
    #[error("{0}")]
    InvalidBucketName(String),

    #[error("max-keys {0} is not supported; allowed range is 1 to 1000")]
    InvalidMaxKeys(u16),

    #[error("XML error: {0}")]
    XmlError(String),

    #[error("time parse error: {0}")]
    TimeParseError(#[from] chrono::ParseError),

    #[error("integer parse error: {0}")]
    IntError(#[from] std::num::ParseIntError),

    #[error("boolean parse error: {0}")]
    BoolError(#[from] std::str::ParseBoolError),

    #[error("url decoding of '{input}' failed: {message}")]
    UrlDecodeError { input: String, message: String },

    #[error("truncated listing of bucket '{0}' carries no continuation marker")]
    MissingContinuationMarker(String),

    #[error("listing of bucket '{bucket}' did not advance past key marker '{key_marker}'")]
    StalledPagination { bucket: String, key_marker: String },
}

/// Error definitions
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErr),

    #[error("XML parse error: {0}")]
    XmlParseError(#[from] xmltree::ParseError),

    #[error("XML write error: {0}")]
    XmlWriteError(#[from] xmltree::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("bucket '{0}' does not exist")]
    NoSuchBucket(String),

    #[error("listing failed: {0}")]
    Lister(String),
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Self {
        Error::Validation(err.into())
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::Validation(err.into())
    }
}

impl From<std::str::ParseBoolError> for Error {
    fn from(err: std::str::ParseBoolError) -> Self {
        Error::Validation(err.into())
    }
}
