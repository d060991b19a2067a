use serde::{Deserialize, Serialize};

use crate::enums::TokenKind;

/// A hashtag found in a body of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagMatch {
    /// Canonical lookup key (see `normalize_tag`)
    pub key: String,
    /// Text after the `#` of the first occurrence, as written
    pub display: String,
}

/// A hashtag occurrence annotated with the URL of its tag page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkToken {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Matched substring including the leading `#`
    pub text: String,
    pub href: String,
}

impl LinkToken {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Link,
            text: text.into(),
            href: href.into(),
        }
    }
}

/// One element of a linkified body.
///
/// Plain text serializes as a bare JSON string, links as
/// `{"type":"link","text":...,"href":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Text(String),
    Link(LinkToken),
}

impl Segment {
    /// The original text this segment covers.
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Link(link) => &link.text,
        }
    }
}

impl From<LinkToken> for Segment {
    fn from(link: LinkToken) -> Self {
        Segment::Link(link)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeRequest {
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeResponse {
    /// `None` when the input is not a valid tag
    pub key: Option<String>,
}

/// Body of the extract and linkify endpoints. A missing or null `text` is
/// treated as empty.
#[derive(Debug, Serialize, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub texts: Vec<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub hashtags: Vec<HashtagMatch>,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_segment_wire_format() {
        let segments = vec![
            Segment::Text("Testing ".to_string()),
            LinkToken::new("#JavaScript", "/tags/javascript").into(),
        ];

        let value = serde_json::to_value(&segments).unwrap();
        assert_eq!(
            value,
            json!([
                "Testing ",
                {"type": "link", "text": "#JavaScript", "href": "/tags/javascript"}
            ])
        );
    }

    #[test]
    fn test_segment_deserializes_both_shapes() {
        let parsed: Vec<Segment> = serde_json::from_value(json!([
            " plain ",
            {"type": "link", "text": "#rust", "href": "/tags/rust"}
        ]))
        .unwrap();

        assert_eq!(parsed[0], Segment::Text(" plain ".to_string()));
        assert!(matches!(parsed[1], Segment::Link(_)));
        assert_eq!(parsed[1].as_str(), "#rust");
    }

    #[test]
    fn test_link_requires_link_type() {
        let parsed: Result<Segment, _> = serde_json::from_value(json!(
            {"type": "mention", "text": "@bob", "href": "/users/bob"}
        ));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_hashtag_match_wire_format() {
        let m = HashtagMatch {
            key: "javascript".to_string(),
            display: "JavaScript".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            json!({"key": "javascript", "display": "JavaScript"})
        );
    }

    #[test]
    fn test_text_request_accepts_null_and_missing() {
        let missing: TextRequest = serde_json::from_str("{}").unwrap();
        assert!(missing.text.is_none());

        let null: TextRequest = serde_json::from_str(r#"{"text": null}"#).unwrap();
        assert!(null.text.is_none());

        let batch: BatchRequest = serde_json::from_str(r##"{"texts": ["#a", null]}"##).unwrap();
        assert_eq!(batch.texts, vec![Some("#a".to_string()), None]);
    }
}
