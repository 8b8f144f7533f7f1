//! The common record shape produced by every query executor, and the
//! version ordering the pagination engine sorts by.

use std::cmp::Ordering;

/// Where one file of a component can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AssetLink {
    pub path: String,
    pub download_url: String,
    pub content_type: Option<String>,
}

/// One logical result row, independent of the ecosystem it came from.
///
/// `identity` is the dedup and tie-break key. The descriptive fields are
/// carried through to output; they never take part in ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub identity: String,
    pub repository: String,
    pub asset_count: usize,
    pub raw_version: String,
    pub name: String,
    pub group: Option<String>,
    pub format: String,
    pub digest: Option<String>,
    pub size: Option<u64>,
    pub assets: Vec<AssetLink>,
    /// Docker image records only: every tag merged into the image, newest first.
    pub tags: Vec<String>,
}

impl NormalizedRecord {
    pub fn new(
        identity: impl Into<String>,
        repository: impl Into<String>,
        asset_count: usize,
        raw_version: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            repository: repository.into(),
            asset_count,
            raw_version: raw_version.into(),
            name: String::new(),
            group: None,
            format: String::new(),
            digest: None,
            size: None,
            assets: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_digest(mut self, digest: Option<String>) -> Self {
        self.digest = digest;
        self
    }

    pub fn with_size(mut self, size: Option<u64>) -> Self {
        self.size = size;
        self
    }

    pub fn with_assets(mut self, mut assets: Vec<AssetLink>) -> Self {
        assets.sort();
        assets.dedup();
        self.assets = assets;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        sort_tags(&mut self.tags);
        self
    }

    /// Fold a record with the same identity into this one.
    ///
    /// Asset counts add up. Every other conflicting field keeps its smallest
    /// value so the result does not depend on the order the backend returned
    /// the duplicates in.
    pub fn absorb(&mut self, other: NormalizedRecord) {
        debug_assert_eq!(self.identity, other.identity);
        self.asset_count += other.asset_count;
        if other.repository < self.repository {
            self.repository = other.repository;
        }
        if self.name.is_empty() || (!other.name.is_empty() && other.name < self.name) {
            self.name = other.name;
        }
        self.digest = match (self.digest.take(), other.digest) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.size = match (self.size, other.size) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.assets.extend(other.assets);
        self.assets.sort();
        self.assets.dedup();
        self.tags.extend(other.tags);
        sort_tags(&mut self.tags);
    }
}

fn sort_tags(tags: &mut Vec<String>) {
    tags.sort_by(|a, b| compare_versions(b, a).then_with(|| a.cmp(b)));
    tags.dedup();
}

/// Newest first, then identity ascending.
pub fn record_order(a: &NormalizedRecord, b: &NormalizedRecord) -> Ordering {
    compare_versions(&b.raw_version, &a.raw_version).then_with(|| a.identity.cmp(&b.identity))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Num(u128),
    Text(String),
}

/// Markers that mean "plain release" and carry no ordering weight.
const RELEASE_MARKERS: &[&str] = &["final", "ga", "release"];

/// Qualifiers that mark a build published after the release they follow.
const POST_RELEASE_MARKERS: &[&str] = &["post", "patch", "sp"];

fn push_segment(token: String, numeric: bool, out: &mut Vec<Segment>) {
    if token.is_empty() {
        return;
    }
    if numeric {
        // Digit runs too long for u128 fall back to text comparison.
        match token.parse::<u128>() {
            Ok(n) => out.push(Segment::Num(n)),
            Err(_) => out.push(Segment::Text(token)),
        }
    } else {
        let lower = token.to_ascii_lowercase();
        if !RELEASE_MARKERS.contains(&lower.as_str()) {
            out.push(Segment::Text(lower));
        }
    }
}

fn segments(version: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut numeric = false;

    let trimmed = version.trim().trim_start_matches(|c| c == 'v' || c == 'V');
    for ch in trimmed.chars() {
        if matches!(ch, '.' | '-' | '_' | '+') {
            push_segment(std::mem::take(&mut current), numeric, &mut out);
            continue;
        }
        let is_digit = ch.is_ascii_digit();
        if !current.is_empty() && is_digit != numeric {
            push_segment(std::mem::take(&mut current), numeric, &mut out);
        }
        numeric = is_digit;
        current.push(ch);
    }
    push_segment(current, numeric, &mut out);
    out
}

/// Rank of a segment slot: pre-release text < end of version < post-release
/// text < numbers.
fn slot_cmp(a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
    fn rank(s: Option<&Segment>) -> u8 {
        match s {
            Some(Segment::Text(t)) if POST_RELEASE_MARKERS.contains(&t.as_str()) => 2,
            Some(Segment::Text(_)) => 0,
            None => 1,
            Some(Segment::Num(_)) => 3,
        }
    }

    match rank(a).cmp(&rank(b)) {
        Ordering::Equal => match (a, b) {
            (Some(Segment::Num(x)), Some(Segment::Num(y))) => x.cmp(y),
            (Some(Segment::Text(x)), Some(Segment::Text(y))) => x.cmp(y),
            _ => Ordering::Equal,
        },
        other => other,
    }
}

/// Compare two version strings; `Greater` means `a` is newer.
///
/// A total order over all strings: numeric runs compare numerically, text
/// runs case-insensitively, and a trailing qualifier (`-rc1`, `-SNAPSHOT`)
/// sorts before the plain release it qualifies.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = segments(a);
    let right = segments(b);
    let len = left.len().max(right.len());

    for i in 0..len {
        match slot_cmp(left.get(i), right.get(i)) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}
