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

use criterion::{Criterion, criterion_group, criterion_main};
use version_listing::s3::ListVersionsExt;
use version_listing::s3::response::VersionListing;
use version_listing::s3::types::VersionSummary;
use version_listing::s3::utils::{check_bucket_name, utc_now};
use version_listing::s3::MemoryLister;

fn full_page() -> VersionListing {
    let now = utc_now();
    VersionListing::builder()
        .bucket_name("bench-bucket")
        .version_summaries(
            (0..1000)
                .map(|i| {
                    VersionSummary::object(
                        format!("photos/2025/img {i:04}.jpg"),
                        format!("{i:032x}"),
                        now,
                        "\"9b2cf535f27731c974343645a3985328\"",
                        4096,
                    )
                    .with_latest(i % 3 == 0)
                })
                .collect(),
        )
        .prefix(Some("photos/".to_string()))
        .encoding_type(Some("url".to_string()))
        .is_truncated(true)
        .next_key_marker(Some("photos/2025/img 0999.jpg".to_string()))
        .next_version_id_marker(Some(format!("{:032x}", 999)))
        .build()
}

fn bench_version_listing(c: &mut Criterion) {
    let page = full_page();
    let xml = page.to_xml().unwrap();

    c.bench_function("VersionListing::to_xml 1000 versions", |b| {
        b.iter(|| page.to_xml().unwrap())
    });

    c.bench_function("VersionListing::from_xml 1000 versions", |b| {
        b.iter(|| VersionListing::from_xml(xml.as_bytes()).unwrap())
    });

    let lister = Arc::new(MemoryLister::new());
    lister.make_bucket("bench-bucket");
    let req = lister.list_object_versions("bench-bucket").build();
    c.bench_function("ListObjectVersions::next_request", |b| {
        b.iter(|| req.next_request(&page).unwrap())
    });

    c.bench_function("check_bucket_name", |b| {
        b.iter(|| check_bucket_name("bench-bucket", true))
    });
}

criterion_group!(benches, bench_version_listing);
criterion_main!(benches);
