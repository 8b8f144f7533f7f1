//! Cursor pagination over fully materialized result sets.
//!
//! Every page request re-runs the backend query from scratch, so a cursor is
//! only meaningful because [`normalize`] is deterministic: the same backend
//! records, in any order, always produce the same sequence. A cursor carries
//! the offset into that sequence plus a fingerprint of the query that
//! produced it, and is rejected when presented with any other query.

use super::error::{NexusError, NexusResult};
use super::record::{record_order, NormalizedRecord};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Ceiling applied when no configuration overrides it.
pub const MAX_PAGE_SIZE: usize = 100;

/// Decoded form of the opaque continuation token handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(rename = "o")]
    pub offset: usize,
    #[serde(rename = "f")]
    pub fingerprint: String,
}

impl Cursor {
    pub fn encode(&self) -> String {
        // Serializing a two-field struct of plain types cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(token: &str) -> NexusResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|_| NexusError::InvalidCursor)?;
        serde_json::from_slice(&bytes).map_err(|_| NexusError::InvalidCursor)
    }
}

/// One page of a normalized result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<NormalizedRecord>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
    /// Position of `items[0]` in the full sorted set.
    pub offset: usize,
    /// Size of the full deduplicated set.
    pub total: usize,
    pub fingerprint: String,
}

impl Page {
    /// Keep only the first `keep` items and re-issue the cursor so the
    /// dropped items are served by the next page instead of being skipped.
    pub fn truncate_to(&mut self, keep: usize) {
        if keep >= self.items.len() {
            return;
        }
        self.items.truncate(keep);
        let next = self.offset + keep;
        self.has_more = next < self.total;
        self.next_cursor = self.has_more.then(|| {
            Cursor {
                offset: next,
                fingerprint: self.fingerprint.clone(),
            }
            .encode()
        });
    }
}

/// Collapse duplicate identities and sort newest first.
pub fn normalize(records: Vec<NormalizedRecord>) -> Vec<NormalizedRecord> {
    let mut merged: HashMap<String, NormalizedRecord> = HashMap::with_capacity(records.len());
    for record in records {
        match merged.get_mut(&record.identity) {
            Some(existing) => existing.absorb(record),
            None => {
                merged.insert(record.identity.clone(), record);
            }
        }
    }

    let mut sorted: Vec<NormalizedRecord> = merged.into_values().collect();
    sorted.sort_by(record_order);
    sorted
}

/// Fingerprint of a query: operation, target instance and parameters.
///
/// Parameters are hashed as `key=value` pairs in the order given; absent
/// optional parameters should be passed as `None` so that "unset" and
/// "empty" stay distinct.
pub fn fingerprint(operation: &str, instance: &str, params: &[(&str, Option<&str>)]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(operation.as_bytes());
    hasher.update([0u8]);
    hasher.update(instance.as_bytes());
    for (key, value) in params {
        hasher.update([0u8]);
        hasher.update(key.as_bytes());
        match value {
            Some(v) => {
                hasher.update(b"=");
                hasher.update(v.as_bytes());
            }
            None => hasher.update(b"!"),
        }
    }
    hex::encode(hasher.finalize())
}

/// Check a page request without touching any records.
///
/// Returns the effective page size and the starting offset. Tools call this
/// before querying the backend so that bad requests cost no traffic.
pub fn check_request(
    page_size: i64,
    cursor: Option<&str>,
    query_fingerprint: &str,
    max_page_size: usize,
) -> NexusResult<(usize, usize)> {
    if page_size <= 0 {
        return Err(NexusError::InvalidPageSize(page_size));
    }
    let size = usize::try_from(page_size)
        .unwrap_or(usize::MAX)
        .min(max_page_size.max(1));

    let offset = match cursor.map(str::trim).filter(|c| !c.is_empty()) {
        Some(token) => {
            let cursor = Cursor::decode(token)?;
            if cursor.fingerprint != query_fingerprint {
                return Err(NexusError::CursorMismatch);
            }
            cursor.offset
        }
        None => 0,
    };

    Ok((size, offset))
}

/// Produce one page of `records`.
///
/// `page_size` is clamped to `max_page_size`; non-positive sizes are
/// rejected. A cursor past the end yields an empty final page.
pub fn paginate(
    records: Vec<NormalizedRecord>,
    page_size: i64,
    cursor: Option<&str>,
    query_fingerprint: &str,
    max_page_size: usize,
) -> NexusResult<Page> {
    let (size, offset) = check_request(page_size, cursor, query_fingerprint, max_page_size)?;

    let sorted = normalize(records);
    let total = sorted.len();

    if offset >= total {
        return Ok(Page {
            items: Vec::new(),
            has_more: false,
            next_cursor: None,
            offset,
            total,
            fingerprint: query_fingerprint.to_string(),
        });
    }

    let end = offset.saturating_add(size).min(total);
    let has_more = end < total;
    let next_cursor = has_more.then(|| {
        Cursor {
            offset: end,
            fingerprint: query_fingerprint.to_string(),
        }
        .encode()
    });

    let items = sorted.into_iter().skip(offset).take(end - offset).collect();

    Ok(Page {
        items,
        has_more,
        next_cursor,
        offset,
        total,
        fingerprint: query_fingerprint.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn version_records(versions: &[&str]) -> Vec<NormalizedRecord> {
        versions
            .iter()
            .map(|v| NormalizedRecord::new(format!("com.example:artifact:{}", v), "maven-releases", 1, *v))
            .collect()
    }

    fn versions(page: &Page) -> Vec<&str> {
        page.items.iter().map(|r| r.raw_version.as_str()).collect()
    }

    fn collect_all(records: &[NormalizedRecord], page_size: i64, fp: &str) -> Vec<NormalizedRecord> {
        let mut out = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = paginate(records.to_vec(), page_size, cursor.as_deref(), fp, MAX_PAGE_SIZE)
                .expect("pagination should succeed");
            out.extend(page.items);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        out
    }

    #[test]
    fn test_two_page_walk() {
        let records = version_records(&["1.0.0", "1.2.0", "1.1.0"]);
        let fp = fingerprint("get_maven_versions", "https://nexus", &[("group", Some("g"))]);

        let first = paginate(records.clone(), 2, None, &fp, MAX_PAGE_SIZE).unwrap();
        assert_eq!(versions(&first), vec!["1.2.0", "1.1.0"]);
        assert!(first.has_more);
        let c1 = first.next_cursor.clone().expect("first page should carry a cursor");

        let second = paginate(records, 2, Some(&c1), &fp, MAX_PAGE_SIZE).unwrap();
        assert_eq!(versions(&second), vec!["1.0.0"]);
        assert!(!second.has_more);
        assert_eq!(second.next_cursor, None);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let records = version_records(&["1.0.0"]);
        let err = paginate(records, 0, None, "fp", MAX_PAGE_SIZE).unwrap_err();
        assert_eq!(err, NexusError::InvalidPageSize(0));

        let err = paginate(Vec::new(), -5, None, "fp", MAX_PAGE_SIZE).unwrap_err();
        assert_eq!(err, NexusError::InvalidPageSize(-5));
    }

    #[test]
    fn test_page_size_clamped_to_ceiling() {
        let all: Vec<String> = (0..30).map(|i| format!("1.{}.0", i)).collect();
        let refs: Vec<&str> = all.iter().map(String::as_str).collect();
        let page = paginate(version_records(&refs), 1000, None, "fp", 10).unwrap();

        assert_eq!(page.items.len(), 10);
        assert!(page.has_more);
        assert_eq!(page.items[0].raw_version, "1.29.0");
    }

    #[test]
    fn test_cursor_from_other_query_rejected() {
        let records = version_records(&["1.0.0", "1.1.0", "1.2.0"]);
        let fp_a = fingerprint("get_maven_versions", "https://nexus", &[("artifact", Some("a"))]);
        let fp_b = fingerprint("get_maven_versions", "https://nexus", &[("artifact", Some("b"))]);

        let page = paginate(records.clone(), 1, None, &fp_a, MAX_PAGE_SIZE).unwrap();
        let cursor = page.next_cursor.unwrap();

        let err = paginate(records, 1, Some(&cursor), &fp_b, MAX_PAGE_SIZE).unwrap_err();
        assert_eq!(err, NexusError::CursorMismatch);
    }

    #[test]
    fn test_garbage_cursor_rejected() {
        let err = paginate(Vec::new(), 5, Some("not a cursor!"), "fp", MAX_PAGE_SIZE).unwrap_err();
        assert_eq!(err, NexusError::InvalidCursor);

        let token = URL_SAFE_NO_PAD.encode(b"{\"unexpected\":true}");
        let err = paginate(Vec::new(), 5, Some(&token), "fp", MAX_PAGE_SIZE).unwrap_err();
        assert_eq!(err, NexusError::InvalidCursor);
    }

    #[test]
    fn test_cursor_past_end_is_empty_final_page() {
        let records = version_records(&["1.0.0", "2.0.0"]);
        let cursor = Cursor {
            offset: 10,
            fingerprint: "fp".to_string(),
        }
        .encode();

        let page = paginate(records.clone(), 5, Some(&cursor), "fp", MAX_PAGE_SIZE).unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.next_cursor, None);

        let again = paginate(records, 5, Some(&cursor), "fp", MAX_PAGE_SIZE).unwrap();
        assert_eq!(page, again);
    }

    #[test]
    fn test_empty_result_set() {
        let page = paginate(Vec::new(), 20, None, "fp", MAX_PAGE_SIZE).unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_duplicates_merge_with_summed_assets() {
        let records = vec![
            NormalizedRecord::new("g:a:1.0", "maven-releases", 2, "1.0"),
            NormalizedRecord::new("g:a:2.0", "maven-releases", 1, "2.0"),
            NormalizedRecord::new("g:a:1.0", "maven-public", 3, "1.0"),
        ];
        let sorted = normalize(records);

        assert_eq!(sorted.len(), 2);
        assert_eq!(sorted[1].identity, "g:a:1.0");
        assert_eq!(sorted[1].asset_count, 5);
        assert_eq!(sorted[1].repository, "maven-public");
    }

    #[test]
    fn test_truncate_reissues_cursor() {
        let records = version_records(&["1.0", "2.0", "3.0", "4.0"]);
        let mut page = paginate(records.clone(), 3, None, "fp", MAX_PAGE_SIZE).unwrap();
        page.truncate_to(1);

        assert_eq!(versions(&page), vec!["4.0"]);
        assert!(page.has_more);
        let next = paginate(records, 3, page.next_cursor.as_deref(), "fp", MAX_PAGE_SIZE).unwrap();
        assert_eq!(versions(&next), vec!["3.0", "2.0", "1.0"]);
    }

    #[test]
    fn test_fingerprint_distinguishes_unset_from_empty() {
        let unset = fingerprint("op", "https://nexus", &[("repository", None)]);
        let empty = fingerprint("op", "https://nexus", &[("repository", Some(""))]);
        let other_instance = fingerprint("op", "https://other", &[("repository", None)]);
        assert_ne!(unset, empty);
        assert_ne!(unset, other_instance);
        assert_eq!(unset, fingerprint("op", "https://nexus", &[("repository", None)]));
    }

    fn arb_records() -> impl Strategy<Value = Vec<NormalizedRecord>> {
        prop::collection::vec(
            ("[0-9]{1,2}\\.[0-9]{1,2}(-rc[0-9])?", "[a-c]", 0usize..4, "repo-[ab]"),
            0..40,
        )
        .prop_map(|items| {
            items
                .into_iter()
                .map(|(version, artifact, assets, repo)| {
                    NormalizedRecord::new(format!("g:{}:{}", artifact, version), repo, assets, version)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_following_cursors_yields_full_set_once(
            records in arb_records(),
            page_size in 1i64..12,
        ) {
            let expected = normalize(records.clone());
            let walked = collect_all(&records, page_size, "fp");
            prop_assert_eq!(walked, expected);
        }

        #[test]
        fn prop_paginate_is_idempotent(
            records in arb_records(),
            page_size in 1i64..12,
            offset in 0usize..50,
        ) {
            let cursor = Cursor { offset, fingerprint: "fp".to_string() }.encode();
            let a = paginate(records.clone(), page_size, Some(&cursor), "fp", MAX_PAGE_SIZE).unwrap();
            let b = paginate(records, page_size, Some(&cursor), "fp", MAX_PAGE_SIZE).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_normalize_ignores_backend_order(records in arb_records()) {
            let mut reversed = records.clone();
            reversed.reverse();
            prop_assert_eq!(normalize(records), normalize(reversed));
        }

        #[test]
        fn prop_foreign_cursor_never_returns_data(
            records in arb_records(),
            offset in 0usize..50,
        ) {
            let cursor = Cursor { offset, fingerprint: "query-a".to_string() }.encode();
            let result = paginate(records, 5, Some(&cursor), "query-b", MAX_PAGE_SIZE);
            prop_assert_eq!(result, Err(NexusError::CursorMismatch));
        }

        #[test]
        fn prop_asset_counts_preserved(records in arb_records()) {
            let before: usize = records.iter().map(|r| r.asset_count).sum();
            let after: usize = normalize(records).iter().map(|r| r.asset_count).sum();
            prop_assert_eq!(before, after);
        }
    }
}
