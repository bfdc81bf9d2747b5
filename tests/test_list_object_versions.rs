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

mod common;

use async_std::stream::StreamExt;
use common::{TestContext, rand_object_name};
use std::collections::HashSet;
use version_listing::s3::ListVersionsExt;
use version_listing::s3::error::Error;
use version_listing::s3::response::VersionListing;
use version_listing::s3::types::{Paginated, ToStream, VersionSummary};

async fn collect_pages(
    ctx: &TestContext,
    bucket_name: &str,
    prefix: Option<&str>,
    delimiter: Option<&str>,
    max_keys: u16,
) -> Vec<VersionListing> {
    let bldr = ctx
        .lister
        .list_object_versions(bucket_name)
        .max_keys(max_keys);
    let req = match (prefix, delimiter) {
        (Some(p), Some(d)) => bldr.prefix(p).delimiter(d).build(),
        (Some(p), None) => bldr.prefix(p).build(),
        (None, Some(d)) => bldr.delimiter(d).build(),
        (None, None) => bldr.build(),
    };
    let mut stream = req.to_paginated().to_stream().await;
    let mut pages = Vec::new();
    while let Some(page) = stream.next().await {
        pages.push(page.unwrap());
    }
    pages
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn list_object_versions_with_delimiter() {
    let ctx = TestContext::new_from_env();
    let bucket_name = ctx.create_bucket_helper();
    ctx.put_objects(&bucket_name, &["foo/bar/baz", "foo/bar/bash", "foo/boo"]);

    let page = ctx
        .lister
        .list_object_versions(&bucket_name)
        .prefix("foo/")
        .delimiter("/")
        .build()
        .send()
        .await
        .unwrap();

    assert_eq!(page.bucket_name(), bucket_name);
    assert_eq!(page.common_prefixes(), ["foo/bar/".to_string()]);
    let keys: Vec<&str> = page
        .version_summaries()
        .iter()
        .map(|v| v.key.as_str())
        .collect();
    assert_eq!(keys, vec!["foo/boo"]);
    assert!(!page.is_truncated());
    assert_eq!(page.next_key_marker(), None);
    assert_eq!(page.next_version_id_marker(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn list_object_versions_all_pages() {
    let ctx = TestContext::new_from_env();
    let bucket_name = ctx.create_bucket_helper();

    let mut names: Vec<String> = (0..25).map(|_| rand_object_name()).collect();
    names.sort();
    names.dedup();
    let mut expected: Vec<(String, String)> = Vec::new();
    for name in &names {
        let v1 = ctx.lister.put_object(&bucket_name, name, 1).unwrap();
        let v2 = ctx.lister.put_object(&bucket_name, name, 2).unwrap();
        expected.push((name.clone(), v2));
        expected.push((name.clone(), v1));
    }

    let pages = collect_pages(&ctx, &bucket_name, None, None, 7).await;
    assert_eq!(pages.len(), expected.len().div_ceil(7));
    let (last, rest) = pages.split_last().unwrap();
    assert!(rest.iter().all(|p| p.is_truncated()));
    assert!(rest.iter().all(|p| p.version_summaries().len() == 7));
    assert!(!last.is_truncated());
    assert_eq!(last.next_key_marker(), None);

    let listed: Vec<(String, String)> = pages
        .iter()
        .flat_map(|p| p.version_summaries())
        .map(|v| (v.key.clone(), v.version_id.clone()))
        .collect();
    assert_eq!(listed, expected);

    // each page resumes where the previous one said it would
    for pair in pages.windows(2) {
        assert_eq!(pair[1].key_marker(), pair[0].next_key_marker());
        assert_eq!(pair[1].version_id_marker(), pair[0].next_version_id_marker());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn list_object_versions_common_prefixes_across_pages() {
    let ctx = TestContext::new_from_env();
    let bucket_name = ctx.create_bucket_helper();
    ctx.put_objects(&bucket_name, &["a/1", "a/2", "b", "c/1", "c/2", "d"]);

    let pages = collect_pages(&ctx, &bucket_name, None, Some("/"), 1).await;
    assert_eq!(pages.len(), 2);

    let prefixes: Vec<&String> = pages.iter().flat_map(|p| p.common_prefixes()).collect();
    assert_eq!(prefixes, vec!["a/", "c/"]);
    let unique: HashSet<&String> = prefixes.iter().copied().collect();
    assert_eq!(unique.len(), prefixes.len());

    let keys: Vec<&str> = pages
        .iter()
        .flat_map(|p| p.version_summaries())
        .map(|v| v.key.as_str())
        .collect();
    assert_eq!(keys, vec!["b", "d"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn list_object_versions_delete_markers() {
    let ctx = TestContext::new_from_env();
    let bucket_name = ctx.create_bucket_helper();
    let object_name = rand_object_name();
    let v1 = ctx.lister.put_object(&bucket_name, &object_name, 11).unwrap();
    let dm = ctx
        .lister
        .put_delete_marker(&bucket_name, &object_name)
        .unwrap();

    let page = ctx
        .lister
        .list_object_versions(&bucket_name)
        .build()
        .send()
        .await
        .unwrap();
    let summaries: &[VersionSummary] = page.version_summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].version_id, dm);
    assert!(summaries[0].is_delete_marker);
    assert!(summaries[0].is_latest);
    assert_eq!(summaries[0].size, 0);
    assert_eq!(summaries[1].version_id, v1);
    assert!(!summaries[1].is_delete_marker);
    assert!(!summaries[1].is_latest);
    assert_eq!(summaries[1].size, 11);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn list_object_versions_default_max_keys() {
    let ctx = TestContext::new_from_env();
    let bucket_name = ctx.create_bucket_helper();
    for i in 0..1001 {
        ctx.lister
            .put_object(&bucket_name, &format!("obj-{i:04}"), 1)
            .unwrap();
    }

    let page = ctx
        .lister
        .list_object_versions(&bucket_name)
        .build()
        .send()
        .await
        .unwrap();
    assert_eq!(page.max_keys(), 1000);
    assert_eq!(page.version_summaries().len(), 1000);
    assert!(page.is_truncated());
    assert_eq!(page.next_key_marker(), Some("obj-0999"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn list_object_versions_no_such_bucket() {
    let ctx = TestContext::new_from_env();
    let mut paginated = ctx
        .lister
        .list_object_versions("no-such-bucket")
        .build()
        .to_paginated();

    let first = paginated.next_page(None).await.unwrap();
    assert!(matches!(first, Err(Error::NoSuchBucket(b)) if b == "no-such-bucket"));
    assert!(paginated.next_page(None).await.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn list_object_versions_xml_round_trip() {
    let ctx = TestContext::new_from_env();
    let bucket_name = ctx.create_bucket_helper();
    ctx.put_objects(&bucket_name, &["dir/a b", "dir/c&d", "dir/sub/e", "top"]);
    ctx.lister.put_delete_marker(&bucket_name, "top").unwrap();

    let page = ctx
        .lister
        .list_object_versions(&bucket_name)
        .prefix("dir/")
        .delimiter("/")
        .max_keys(1)
        .build()
        .send()
        .await
        .unwrap();
    assert!(page.is_truncated());
    assert_eq!(page.encoding_type(), Some("url"));

    let xml = page.to_xml().unwrap();
    assert!(xml.contains("<Key>dir%2Fa%20b</Key>"));
    assert_eq!(VersionListing::from_xml(xml.as_bytes()).unwrap(), page);
    assert_eq!(VersionListing::from_json(page.to_json().unwrap().as_bytes()).unwrap(), page);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn list_object_versions_next_request() {
    let ctx = TestContext::new_from_env();
    let bucket_name = ctx.create_bucket_helper();
    ctx.put_objects(&bucket_name, &["k1", "k2", "k3"]);

    let req = ctx
        .lister
        .list_object_versions(&bucket_name)
        .max_keys(2)
        .config(ctx.config.clone())
        .build();
    let first = req.send().await.unwrap();
    assert!(first.is_truncated());

    let next = req.next_request(&first).unwrap().unwrap();
    assert_eq!(next.key_marker(), Some("k2"));
    let second = next.send().await.unwrap();
    assert_eq!(second.version_summaries()[0].key, "k3");
    assert!(next.next_request(&second).unwrap().is_none());
}
