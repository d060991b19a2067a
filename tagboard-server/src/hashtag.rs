use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tagboard_types::{HashtagMatch, LinkToken, Segment};
use unicode_normalization::UnicodeNormalization;

/// Longest accepted key, in codepoints
pub const MAX_TAG_LEN: usize = 64;

/// Path prefix used by [`default_tag_href`]
pub const DEFAULT_HREF_BASE: &str = "/tags";

/// Regex pattern for matching hashtags
/// Matches: `#` followed by letters, numbers, underscores, combining marks and
/// emoji. A ZWJ may glue further emoji onto the run so sequences such as
/// 👨‍💻 stay in one piece. Group 1 is the tag without the `#`.
static HASHTAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"#(",
        r"[\p{L}\p{N}_\p{M}\p{Extended_Pictographic}\p{Emoji_Presentation}]+",
        r"(?:\x{200D}[\p{Extended_Pictographic}\p{Emoji_Presentation}]",
        r"[\p{Extended_Pictographic}\p{Emoji_Presentation}\p{M}]*)*",
        r")",
    ))
    .expect("Failed to compile hashtag regex")
});

fn is_variation_selector(c: char) -> bool {
    c == '\u{FE0E}' || c == '\u{FE0F}'
}

/// Normalize a candidate tag into its canonical lookup key
///
/// Applies NFKC, drops emoji variation selectors, strips leading `#`s and
/// surrounding whitespace, then lowercases ASCII letters only. Returns an empty
/// string when the result is not between 1 and [`MAX_TAG_LEN`] codepoints long;
/// callers must treat the empty string as "no tag".
///
/// # Examples
///
/// ```
/// use tagboard_server::hashtag::normalize_tag;
/// assert_eq!(normalize_tag("ＨｅｌｌｏＷｏｒｌｄ"), "helloworld");
/// assert_eq!(normalize_tag("⭐\u{FE0F}"), "⭐");
/// assert_eq!(normalize_tag("Привет"), "Привет");
/// assert_eq!(normalize_tag("#"), "");
/// ```
pub fn normalize_tag(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let composed: String = raw.nfkc().filter(|&c| !is_variation_selector(c)).collect();
    let key = composed
        .trim_start_matches('#')
        .trim()
        .to_ascii_lowercase();

    let len = key.chars().count();
    if (1..=MAX_TAG_LEN).contains(&len) {
        key
    } else {
        String::new()
    }
}

/// Extract hashtags from post content
///
/// Returns one entry per distinct key in order of first appearance. The
/// `display` of each entry is the spelling of its first occurrence; later
/// occurrences of the same key are ignored.
///
/// # Examples
///
/// ```
/// use tagboard_server::hashtag::extract_hashtags;
/// let hashtags = extract_hashtags("Check out #Rust and #rust! Also #web_dev");
/// assert_eq!(hashtags.len(), 2);
/// assert_eq!(hashtags[0].key, "rust");
/// assert_eq!(hashtags[0].display, "Rust");
/// assert_eq!(hashtags[1].key, "web_dev");
/// ```
pub fn extract_hashtags(content: &str) -> Vec<HashtagMatch> {
    let mut seen = HashSet::new();
    let mut hashtags = Vec::new();

    for cap in HASHTAG_REGEX.captures_iter(content) {
        let Some(raw) = cap.get(1) else { continue };
        let key = normalize_tag(raw.as_str());
        if key.is_empty() {
            continue;
        }
        if seen.insert(key.clone()) {
            hashtags.push(HashtagMatch {
                key,
                display: raw.as_str().to_string(),
            });
        }
    }

    hashtags
}

/// Characters left unescaped in hrefs besides `A-Z a-z 0-9 - _ . ~`
const UNESCAPED_MARKS: &[char] = &['!', '\'', '(', ')', '*'];

/// Percent-encode a key as a URI component
///
/// Same output as JavaScript's `encodeURIComponent`: the RFC 3986 unreserved
/// set plus `!'()*` pass through, so the key of `#⑴` (`(1)`) stays readable.
pub fn encode_tag_component(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    let mut rest = key;
    while let Some(pos) = rest.find(UNESCAPED_MARKS) {
        encoded.push_str(&urlencoding::encode(&rest[..pos]));
        // Every mark is one byte
        encoded.push_str(&rest[pos..pos + 1]);
        rest = &rest[pos + 1..];
    }
    encoded.push_str(&urlencoding::encode(rest));
    encoded
}

/// Default href for a tag key: `/tags/<percent-encoded key>`
pub fn default_tag_href(key: &str) -> String {
    format!("{}/{}", DEFAULT_HREF_BASE, encode_tag_component(key))
}

/// Split content into plain text and hashtag links, using [`default_tag_href`]
pub fn linkify_hashtags(content: &str) -> Vec<Segment> {
    linkify_hashtags_with(content, default_tag_href)
}

/// Split content into plain text and hashtag links
///
/// Every hashtag that normalizes to a valid key becomes a [`LinkToken`] whose
/// `text` is the full match including `#` and whose `href` is `to_href(key)`.
/// Everything else, invalid hashtags included, is passed through as plain
/// text, so [`reassemble`] of the result always equals `content`.
pub fn linkify_hashtags_with<F>(content: &str, to_href: F) -> Vec<Segment>
where
    F: Fn(&str) -> String,
{
    let mut segments = Vec::new();
    let mut last_end = 0;

    for cap in HASHTAG_REGEX.captures_iter(content) {
        let (Some(whole), Some(raw)) = (cap.get(0), cap.get(1)) else {
            continue;
        };

        if whole.start() > last_end {
            segments.push(Segment::Text(content[last_end..whole.start()].to_string()));
        }

        let key = normalize_tag(raw.as_str());
        if key.is_empty() {
            segments.push(Segment::Text(whole.as_str().to_string()));
        } else {
            segments.push(LinkToken::new(whole.as_str(), to_href(&key)).into());
        }

        last_end = whole.end();
    }

    if last_end < content.len() {
        segments.push(Segment::Text(content[last_end..].to_string()));
    }

    segments
}

/// Concatenate segments back into the text they were produced from
pub fn reassemble(segments: &[Segment]) -> String {
    segments.iter().map(Segment::as_str).collect()
}

/// Linkifier bound to a configurable tag page base path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLinker {
    base: String,
}

impl TagLinker {
    /// Create a linker for tag pages under `base` (a trailing `/` is ignored)
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the tag page for an already normalized key
    pub fn href(&self, key: &str) -> String {
        format!("{}/{}", self.base, encode_tag_component(key))
    }

    pub fn linkify(&self, content: &str) -> Vec<Segment> {
        linkify_hashtags_with(content, |key| self.href(key))
    }
}

impl Default for TagLinker {
    fn default() -> Self {
        Self::new(DEFAULT_HREF_BASE)
    }
}
