/*
 * model/issue.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Issue, article and image entities.
 */

//! Issue, article and image entities.
//!
//! An [`Issue`] owns an ordered list of section names and a set of
//! [`Article`]s; each article owns its [`Image`]s. Articles are replaced
//! wholesale when an issue is re-imported, so none of these types carry
//! partial-update machinery.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Draft,
    Processing,
    Completed,
    Failed,
}

/// A magazine issue: metadata plus the ordered section list.
///
/// The section order is significant - the table of contents and the
/// article order in the composed document both follow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Stable identity (slug).
    pub id: String,
    /// Human title shown on the cover.
    pub title: String,
    /// Publication date.
    pub date: NaiveDate,
    /// Ordered section names. Every article's `section` must be one of these.
    pub sections: Vec<String>,
    pub status: IssueStatus,
}

impl Issue {
    /// Position of a section in the issue's section order, if present.
    pub fn section_index(&self, section: &str) -> Option<usize> {
        self.sections.iter().position(|s| s == section)
    }
}

/// Editorial category of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleKind {
    Feature,
    /// Standard article / reportage.
    #[serde(alias = "article")]
    Reportage,
    /// Short news item.
    #[serde(alias = "short")]
    News,
    Editorial,
}

/// One article inside an issue.
///
/// `body_html` is a constrained HTML fragment (p, h2, h3, strong, em,
/// ul, ol, li, blockquote, a). It is interpolated into the composed
/// document verbatim - sanitization is the intake collaborator's
/// responsibility, the core does not re-sanitize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Human slug, unique within the issue.
    pub id: String,
    /// Owning issue.
    pub issue_id: String,
    /// Section name; should match one of the issue's sections.
    pub section: String,
    pub kind: ArticleKind,
    pub title: String,
    /// Subtitle / teaser between headline and byline.
    pub dek: Option<String>,
    pub author: String,
    pub body_html: String,
    pub images: Vec<Image>,
    pub created_at: DateTime<Utc>,
}

impl Article {
    /// First image with the hero role, if any.
    pub fn hero_image(&self) -> Option<&Image> {
        self.images.iter().find(|i| i.role == ImageRole::Hero)
    }

    /// All inline images, in input order.
    pub fn inline_images(&self) -> Vec<&Image> {
        self.images
            .iter()
            .filter(|i| i.role == ImageRole::Inline)
            .collect()
    }
}

/// Placement semantics of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRole {
    /// Full-bleed opener above the article header.
    Hero,
    /// Interleaved between body paragraphs.
    Inline,
    /// Collected into a gallery block (not placed inline).
    Gallery,
}

/// An image referenced by an article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Source URL.
    pub src: String,
    pub role: ImageRole,
    pub caption: Option<String>,
    pub credit: Option<String>,
    /// Normalized crop focus, both components in [0, 1].
    ///
    /// Parsed once at intake from the wire form `"x,y"`.
    pub focal_point: Option<(f32, f32)>,
    /// Intrinsic pixel width, when known.
    pub width_px: Option<u32>,
    /// Intrinsic pixel height, when known.
    pub height_px: Option<u32>,
    pub dpi: Option<u32>,
}

impl Image {
    /// CSS `object-position` value derived from the focal point.
    ///
    /// Defaults to centered when no focal point was supplied.
    pub fn object_position(&self) -> String {
        match self.focal_point {
            Some((x, y)) => format!("{:.0}% {:.0}%", x * 100.0, y * 100.0),
            None => "50% 50%".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(role: ImageRole) -> Image {
        Image {
            src: "https://example.org/a.jpg".to_string(),
            role,
            caption: None,
            credit: None,
            focal_point: None,
            width_px: None,
            height_px: None,
            dpi: None,
        }
    }

    #[test]
    fn test_section_index() {
        let issue = Issue {
            id: "2025-07".to_string(),
            title: "July".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            sections: vec!["politik".to_string(), "kultur".to_string()],
            status: IssueStatus::Draft,
        };

        assert_eq!(issue.section_index("politik"), Some(0));
        assert_eq!(issue.section_index("kultur"), Some(1));
        assert_eq!(issue.section_index("sport"), None);
    }

    #[test]
    fn test_article_image_partition() {
        let article = Article {
            id: "a1".to_string(),
            issue_id: "2025-07".to_string(),
            section: "politik".to_string(),
            kind: ArticleKind::Feature,
            title: "T".to_string(),
            dek: None,
            author: "A".to_string(),
            body_html: String::new(),
            images: vec![
                image(ImageRole::Inline),
                image(ImageRole::Hero),
                image(ImageRole::Hero),
                image(ImageRole::Gallery),
                image(ImageRole::Inline),
            ],
            created_at: Utc::now(),
        };

        // First hero wins, inline order preserved
        assert!(article.hero_image().is_some());
        assert_eq!(article.inline_images().len(), 2);
    }

    #[test]
    fn test_object_position() {
        let mut img = image(ImageRole::Hero);
        assert_eq!(img.object_position(), "50% 50%");

        img.focal_point = Some((0.25, 0.75));
        assert_eq!(img.object_position(), "25% 75%");
    }

    #[test]
    fn test_article_kind_aliases() {
        let kind: ArticleKind = serde_json::from_str("\"article\"").unwrap();
        assert_eq!(kind, ArticleKind::Reportage);
        let kind: ArticleKind = serde_json::from_str("\"short\"").unwrap();
        assert_eq!(kind, ArticleKind::News);
        let kind: ArticleKind = serde_json::from_str("\"feature\"").unwrap();
        assert_eq!(kind, ArticleKind::Feature);
    }
}
