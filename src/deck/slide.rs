//! Slide types: the closed, type-tagged content union and per-slide
//! layout/style metadata.
//!
//! `SlideContent` is the wire contract every producer of slide content
//! (editor UI or generation collaborator) must satisfy. The variants are
//! resolved by exhaustive pattern matching in the renderer; missing
//! optional fields mean "omit this visual element", never an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::deck::theme::Theme;

/// One page of a deck: a typed content payload plus optional layout,
/// style, and speaker notes.
///
/// Slide ids are unique within a deck, stable across edits, and are the
/// addressing key for partial updates. An empty id on a draft means
/// "assign one at insertion".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub content: SlideContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<SlideLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<SlideStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Slide {
    /// Create a slide draft with no id; the edit engine assigns one on
    /// insertion.
    pub fn draft(content: SlideContent) -> Self {
        Self {
            id: String::new(),
            content,
            layout: None,
            style: None,
            notes: None,
        }
    }

    /// The theme attached to this slide, if any.
    pub fn theme(&self) -> Option<&Theme> {
        self.style.as_ref().and_then(|s| s.theme.as_ref())
    }
}

/// Layout metadata carried alongside the content payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlideLayout {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Per-slide style overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlideStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

/// The eleven semantic layout kinds, adjacently tagged so persisted JSON
/// carries `{"type": "...", "content": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum SlideContent {
    Title(TitleContent),
    Section(SectionContent),
    Content(BodyContent),
    TwoColumn(TwoColumnContent),
    Timeline(TimelineContent),
    Process(ProcessContent),
    Grid(GridContent),
    Comparison(ComparisonContent),
    Data(DataContent),
    Quote(QuoteContent),
    ImageText(ImageTextContent),
}

impl SlideContent {
    /// The wire name of this layout kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Section(_) => "section",
            Self::Content(_) => "content",
            Self::TwoColumn(_) => "two-column",
            Self::Timeline(_) => "timeline",
            Self::Process(_) => "process",
            Self::Grid(_) => "grid",
            Self::Comparison(_) => "comparison",
            Self::Data(_) => "data",
            Self::Quote(_) => "quote",
            Self::ImageText(_) => "image-text",
        }
    }

    /// The background/inline image reference, for the kinds that carry one.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Title(c) => c.image_url.as_deref(),
            Self::Section(c) => c.image_url.as_deref(),
            Self::ImageText(c) => c.image_url.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleContent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionContent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Free-form body: bullet list preferred, free-flow text as fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyContent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoColumnContent {
    pub title: String,
    pub left: ColumnContent,
    pub right: ColumnContent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineContent {
    pub title: String,
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineEvent {
    pub year: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessContent {
    pub title: String,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridContent {
    pub title: String,
    pub items: Vec<GridItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridItem {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonContent {
    pub title: String,
    pub items: Vec<ComparisonRow>,
}

/// One row of the three-column comparison table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonRow {
    pub name: String,
    #[serde(rename = "valueA")]
    pub value_a: String,
    #[serde(rename = "valueB")]
    pub value_b: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataContent {
    pub title: String,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteContent {
    pub quote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageTextContent {
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Validate an arbitrary JSON value against the slide contract.
///
/// Used by the edit engine after a merge: the merged value must
/// deserialize back into a well-formed `Slide`, otherwise the patch is
/// rejected before any mutation.
pub fn slide_from_value(value: Value) -> crate::common::Result<Slide> {
    serde_json::from_value(value).map_err(|e| crate::common::Error::InvalidContent(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tagged_roundtrip() {
        let slide = Slide {
            id: "s1".into(),
            content: SlideContent::TwoColumn(TwoColumnContent {
                title: "T".into(),
                left: ColumnContent {
                    title: Some("L".into()),
                    points: vec!["a".into()],
                },
                right: ColumnContent {
                    title: None,
                    points: vec![],
                },
            }),
            layout: None,
            style: None,
            notes: None,
        };
        let v = serde_json::to_value(&slide).unwrap();
        assert_eq!(v["type"], "two-column");
        assert_eq!(v["content"]["left"]["points"][0], "a");
        let back: Slide = serde_json::from_value(v).unwrap();
        assert_eq!(back, slide);
    }

    #[test]
    fn test_missing_optional_fields_tolerated() {
        let v = json!({
            "id": "s2",
            "type": "timeline",
            "content": { "title": "History" }
        });
        let slide: Slide = serde_json::from_value(v).unwrap();
        match slide.content {
            SlideContent::Timeline(t) => {
                assert_eq!(t.title, "History");
                assert!(t.events.is_empty());
            }
            other => panic!("wrong variant: {}", other.kind()),
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let v = json!({ "id": "x", "type": "mosaic", "content": {} });
        assert!(slide_from_value(v).is_err());
    }

    #[test]
    fn test_draft_has_no_id() {
        let draft = Slide::draft(SlideContent::Quote(QuoteContent {
            quote: "q".into(),
            author: None,
            title: None,
        }));
        assert!(draft.id.is_empty());
    }

    #[test]
    fn test_comparison_value_casing() {
        let v = json!({
            "id": "c",
            "type": "comparison",
            "content": {
                "title": "T",
                "items": [{ "name": "n", "valueA": "1", "valueB": "2" }]
            }
        });
        let slide: Slide = serde_json::from_value(v).unwrap();
        match slide.content {
            SlideContent::Comparison(c) => {
                assert_eq!(c.items[0].value_a, "1");
                assert_eq!(c.items[0].value_b, "2");
            }
            _ => panic!("wrong variant"),
        }
    }
}
