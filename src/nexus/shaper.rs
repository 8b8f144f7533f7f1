//! Rendering of pages and record lists into bounded JSON payloads.
//!
//! The serialized payload never exceeds [`OutputLimits::max_output_bytes`]:
//! with [`OverflowPolicy::Truncate`] trailing items are dropped and the
//! payload is flagged `"truncated": true`; with [`OverflowPolicy::Fail`] the
//! call fails with [`NexusError::OutputTooLarge`]. Truncation that would
//! leave no items at all also fails.

use super::error::{NexusError, NexusResult};
use super::pagination::Page;
use super::record::{AssetLink, NormalizedRecord};
use serde_json::{json, Map, Value};

/// Default payload ceiling in bytes.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 90_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detail {
    /// Identity, repository, asset count and download locations for every item.
    #[default]
    Full,
    /// Bare version strings.
    Simple,
}

impl Detail {
    pub fn from_simple_flag(simple: bool) -> Self {
        if simple {
            Detail::Simple
        } else {
            Detail::Full
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    #[default]
    Truncate,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLimits {
    pub max_output_bytes: usize,
    pub overflow: OverflowPolicy,
}

impl Default for OutputLimits {
    fn default() -> Self {
        Self {
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            overflow: OverflowPolicy::Truncate,
        }
    }
}

/// A rendered payload, ready to send as tool output.
#[derive(Debug, Clone, PartialEq)]
pub struct Shaped {
    pub payload: Value,
    pub text: String,
    pub truncated: bool,
    pub item_count: usize,
}

/// Render one version page.
///
/// `header` fields (e.g. `groupId`) lead the payload; then `count`,
/// `versions`, `hasMore` and, when more pages exist, `continuationToken`.
pub fn shape_page(
    page: &Page,
    detail: Detail,
    header: Map<String, Value>,
    limits: &OutputLimits,
) -> NexusResult<Shaped> {
    let build = |keep: usize| {
        let mut view = page.clone();
        view.truncate_to(keep);
        let truncated = keep < page.items.len();

        let versions: Vec<Value> = view.items.iter().map(|r| render_version(r, detail)).collect();

        let mut payload = header.clone();
        payload.insert("count".to_string(), json!(versions.len()));
        payload.insert("versions".to_string(), Value::Array(versions));
        payload.insert("hasMore".to_string(), json!(view.has_more));
        if let Some(token) = view.next_cursor {
            payload.insert("continuationToken".to_string(), json!(token));
        }
        if truncated {
            payload.insert("truncated".to_string(), json!(true));
        }
        Value::Object(payload)
    };

    fit(page.items.len(), limits, build)
}

/// Render a complete (unpaginated) record list under `items_key`.
pub fn shape_list<F>(
    records: &[NormalizedRecord],
    items_key: &str,
    header: Map<String, Value>,
    limits: &OutputLimits,
    render: F,
) -> NexusResult<Shaped>
where
    F: Fn(&NormalizedRecord) -> Value,
{
    let build = |keep: usize| {
        let items: Vec<Value> = records.iter().take(keep).map(&render).collect();

        let mut payload = header.clone();
        payload.insert("count".to_string(), json!(items.len()));
        payload.insert(items_key.to_string(), Value::Array(items));
        if keep < records.len() {
            payload.insert("truncated".to_string(), json!(true));
            payload.insert("totalCount".to_string(), json!(records.len()));
        }
        Value::Object(payload)
    };

    fit(records.len(), limits, build)
}

fn render_version(record: &NormalizedRecord, detail: Detail) -> Value {
    match detail {
        Detail::Simple => json!(record.raw_version),
        Detail::Full => json!({
            "version": record.raw_version,
            "identity": record.identity,
            "repository": record.repository,
            "assetCount": record.asset_count,
            "assets": render_assets(&record.assets),
        }),
    }
}

/// `[{downloadUrl, path, contentType?}]` for each asset.
pub fn render_assets(assets: &[AssetLink]) -> Value {
    Value::Array(
        assets
            .iter()
            .map(|asset| {
                let mut item = Map::new();
                item.insert("downloadUrl".to_string(), json!(asset.download_url));
                item.insert("path".to_string(), json!(asset.path));
                if let Some(content_type) = &asset.content_type {
                    item.insert("contentType".to_string(), json!(content_type));
                }
                Value::Object(item)
            })
            .collect(),
    )
}

/// Keep as many leading items as fit under the byte ceiling.
fn fit<F>(len: usize, limits: &OutputLimits, build: F) -> NexusResult<Shaped>
where
    F: Fn(usize) -> Value,
{
    let render = |keep: usize| {
        let payload = build(keep);
        let text = serde_json::to_string(&payload).unwrap_or_else(|_| "{}".to_string());
        (payload, text)
    };

    let (payload, text) = render(len);
    if text.len() <= limits.max_output_bytes {
        return Ok(Shaped {
            payload,
            text,
            truncated: false,
            item_count: len,
        });
    }

    let full_size = text.len();
    if limits.overflow == OverflowPolicy::Fail {
        return Err(NexusError::OutputTooLarge {
            size: full_size,
            limit: limits.max_output_bytes,
        });
    }

    // Largest prefix that fits; payload size grows with the item count.
    let (mut lo, mut hi) = (0usize, len.saturating_sub(1));
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if render(mid).1.len() <= limits.max_output_bytes {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    // A page that cannot carry a single item would hand back the same
    // cursor forever.
    let (payload, text) = render(lo);
    if lo == 0 || text.len() > limits.max_output_bytes {
        return Err(NexusError::OutputTooLarge {
            size: full_size,
            limit: limits.max_output_bytes,
        });
    }

    tracing::debug!(
        kept = lo,
        total = len,
        bytes = text.len(),
        limit = limits.max_output_bytes,
        "truncated tool output to fit size limit"
    );

    Ok(Shaped {
        payload,
        text,
        truncated: true,
        item_count: lo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nexus::pagination::{paginate, MAX_PAGE_SIZE};

    fn records(n: usize) -> Vec<NormalizedRecord> {
        (0..n)
            .map(|i| {
                let version = format!("1.{}.0", i);
                NormalizedRecord::new(format!("com.example:artifact:{}", version), "maven-releases", 2, version)
            })
            .collect()
    }

    fn header() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("groupId".to_string(), json!("com.example"));
        map
    }

    #[test]
    fn test_full_detail_fields() {
        let page = paginate(records(2), 20, None, "fp", MAX_PAGE_SIZE).unwrap();
        let shaped = shape_page(&page, Detail::Full, header(), &OutputLimits::default()).unwrap();

        assert!(!shaped.truncated);
        assert_eq!(shaped.payload["groupId"], "com.example");
        assert_eq!(shaped.payload["count"], 2);
        assert_eq!(shaped.payload["hasMore"], false);
        assert!(shaped.payload.get("continuationToken").is_none());
        assert!(shaped.payload.get("truncated").is_none());

        let first = &shaped.payload["versions"][0];
        assert_eq!(first["version"], "1.1.0");
        assert_eq!(first["identity"], "com.example:artifact:1.1.0");
        assert_eq!(first["repository"], "maven-releases");
        assert_eq!(first["assetCount"], 2);
        assert_eq!(first["assets"], json!([]));
    }

    #[test]
    fn test_full_detail_lists_download_locations() {
        let record = NormalizedRecord::new("com.example:lib:1.0", "maven-releases", 1, "1.0").with_assets(vec![
            AssetLink {
                path: "com/example/lib/1.0/lib-1.0.jar".to_string(),
                download_url: "https://nexus.example.com/repository/maven-releases/com/example/lib/1.0/lib-1.0.jar"
                    .to_string(),
                content_type: Some("application/java-archive".to_string()),
            },
        ]);
        let page = paginate(vec![record.clone()], 20, None, "fp", MAX_PAGE_SIZE).unwrap();

        let full = shape_page(&page, Detail::Full, Map::new(), &OutputLimits::default()).unwrap();
        assert_eq!(
            full.payload["versions"][0]["assets"],
            json!([{
                "downloadUrl": "https://nexus.example.com/repository/maven-releases/com/example/lib/1.0/lib-1.0.jar",
                "path": "com/example/lib/1.0/lib-1.0.jar",
                "contentType": "application/java-archive",
            }])
        );

        let simple = shape_page(&page, Detail::Simple, Map::new(), &OutputLimits::default()).unwrap();
        assert_eq!(simple.payload["versions"], json!(["1.0"]));
    }

    #[test]
    fn test_simple_detail_emits_bare_versions() {
        let page = paginate(records(3), 2, None, "fp", MAX_PAGE_SIZE).unwrap();
        let shaped = shape_page(&page, Detail::Simple, Map::new(), &OutputLimits::default()).unwrap();

        assert_eq!(shaped.payload["versions"], json!(["1.2.0", "1.1.0"]));
        assert_eq!(shaped.payload["hasMore"], true);
        assert!(shaped.payload["continuationToken"].is_string());
    }

    #[test]
    fn test_truncation_keeps_payload_under_limit() {
        let page = paginate(records(50), 50, None, "fp", MAX_PAGE_SIZE).unwrap();
        let limits = OutputLimits {
            max_output_bytes: 1_000,
            overflow: OverflowPolicy::Truncate,
        };
        let shaped = shape_page(&page, Detail::Full, header(), &limits).unwrap();

        assert!(shaped.truncated);
        assert!(shaped.text.len() <= 1_000);
        assert!(shaped.item_count > 0 && shaped.item_count < 50);
        assert_eq!(shaped.payload["truncated"], true);
        assert_eq!(shaped.payload["hasMore"], true);

        // The re-issued cursor resumes right after the last emitted item.
        let token = shaped.payload["continuationToken"].as_str().unwrap();
        let next = paginate(records(50), 50, Some(token), "fp", MAX_PAGE_SIZE).unwrap();
        assert_eq!(next.offset, shaped.item_count);
    }

    #[test]
    fn test_fail_policy_rejects_oversized_output() {
        let page = paginate(records(50), 50, None, "fp", MAX_PAGE_SIZE).unwrap();
        let limits = OutputLimits {
            max_output_bytes: 500,
            overflow: OverflowPolicy::Fail,
        };
        let err = shape_page(&page, Detail::Full, header(), &limits).unwrap_err();
        assert!(matches!(err, NexusError::OutputTooLarge { limit: 500, .. }));
    }

    #[test]
    fn test_shape_list_truncation_reports_total() {
        let all = records(40);
        let limits = OutputLimits {
            max_output_bytes: 600,
            overflow: OverflowPolicy::Truncate,
        };
        let shaped = shape_list(&all, "artifacts", Map::new(), &limits, |r| {
            json!({"version": r.raw_version, "repository": r.repository})
        })
        .unwrap();

        assert!(shaped.truncated);
        assert!(shaped.text.len() <= 600);
        assert_eq!(shaped.payload["totalCount"], 40);
        assert_eq!(
            shaped.payload["count"].as_u64().unwrap() as usize,
            shaped.payload["artifacts"].as_array().unwrap().len()
        );
    }

    #[test]
    fn test_truncation_to_nothing_fails() {
        let page = paginate(records(5), 5, None, "fp", MAX_PAGE_SIZE).unwrap();
        let limits = OutputLimits {
            max_output_bytes: 40,
            overflow: OverflowPolicy::Truncate,
        };
        let err = shape_page(&page, Detail::Full, header(), &limits).unwrap_err();
        assert!(matches!(err, NexusError::OutputTooLarge { limit: 40, .. }));
    }

    #[test]
    fn test_shape_list_fits_untouched() {
        let all = records(3);
        let shaped = shape_list(&all, "tags", Map::new(), &OutputLimits::default(), |r| {
            json!({"tag": r.raw_version})
        })
        .unwrap();

        assert!(!shaped.truncated);
        assert_eq!(shaped.item_count, 3);
        assert!(shaped.payload.get("totalCount").is_none());
    }
}
