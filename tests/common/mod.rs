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

use std::sync::Arc;

use uuid::Uuid;
use version_listing::s3::{ListingConfig, MemoryLister};

#[derive(Clone, Debug)]
pub struct TestContext {
    pub lister: Arc<MemoryLister>,
    pub config: ListingConfig,
}

impl TestContext {
    pub fn new_from_env() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            lister: Arc::new(MemoryLister::new()),
            config: ListingConfig::from_env(),
        }
    }

    /// Creates a bucket with a random name and returns the name.
    pub fn create_bucket_helper(&self) -> String {
        let bucket_name = rand_bucket_name();
        assert!(self.lister.make_bucket(&bucket_name));
        bucket_name
    }

    /// Stores one version of each key.
    pub fn put_objects(&self, bucket_name: &str, keys: &[&str]) {
        for key in keys {
            self.lister.put_object(bucket_name, key, 11).unwrap();
        }
    }
}

pub fn rand_bucket_name() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

#[allow(dead_code)]
pub fn rand_object_name() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
