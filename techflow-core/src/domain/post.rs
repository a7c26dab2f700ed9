use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Placeholder used when a post is saved without a featured image.
pub const DEFAULT_FEATURED_IMAGE: &str = "https://picsum.photos/800/400";

/// The fixed category set shared by the editor form and by feed filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Artificial Intelligence")]
    ArtificialIntelligence,
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Cyber Security")]
    CyberSecurity,
    #[serde(rename = "Cloud Computing")]
    CloudComputing,
    #[serde(rename = "Mobile Apps")]
    MobileApps,
    Blockchain,
    IoT,
    Gadgets,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::ArtificialIntelligence,
        Category::WebDevelopment,
        Category::CyberSecurity,
        Category::CloudComputing,
        Category::MobileApps,
        Category::Blockchain,
        Category::IoT,
        Category::Gadgets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ArtificialIntelligence => "Artificial Intelligence",
            Category::WebDevelopment => "Web Development",
            Category::CyberSecurity => "Cyber Security",
            Category::CloudComputing => "Cloud Computing",
            Category::MobileApps => "Mobile Apps",
            Category::Blockchain => "Blockchain",
            Category::IoT => "IoT",
            Category::Gadgets => "Gadgets",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(raw))
            .ok_or(DomainError::Validation {
                field: "category",
                message: "unknown category",
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    Draft,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Published => "published",
            PostStatus::Draft => "draft",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "published" => Ok(PostStatus::Published),
            "draft" => Ok(PostStatus::Draft),
            _ => Err(DomainError::Validation {
                field: "status",
                message: "must be 'published' or 'draft'",
            }),
        }
    }
}

/// One blog article as persisted in the store. Field names follow the
/// stored JSON schema, so existing collections deserialize as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    /// Markdown body.
    pub content: String,
    pub excerpt: String,
    pub featured_image: String,
    pub tags: Vec<String>,
    pub category: Category,
    pub status: PostStatus,
    /// Epoch milliseconds, immutable after creation.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed on every successful update.
    pub updated_at: i64,
    pub author: String,
    pub views: u64,
}

impl Post {
    /// Overlays the caller-settable fields; identity and bookkeeping fields
    /// (`id`, `created_at`, `updated_at`, `views`) are untouched.
    pub(crate) fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.content = draft.content;
        self.excerpt = draft.excerpt;
        self.featured_image = draft.featured_image;
        self.tags = draft.tags;
        self.category = draft.category;
        self.status = draft.status;
        self.author = draft.author;
    }
}

/// Exactly the fields a caller may set when creating or updating a post.
/// `id`, `created_at`, `updated_at` and `views` are never caller-controlled.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub featured_image: String,
    pub tags: Vec<String>,
    pub category: Category,
    pub status: PostStatus,
    pub author: String,
}

impl PostDraft {
    /// Normalizes and checks the draft. Tags must already be a clean
    /// sequence of trimmed, non-empty strings; splitting and trimming raw
    /// input is the presentation layer's job.
    pub fn validate(self) -> Result<Self, DomainError> {
        let title = normalize_title(&self.title)?;
        let content = normalize_content(&self.content)?;
        let author = normalize_author(&self.author)?;

        if self
            .tags
            .iter()
            .any(|tag| tag.trim().is_empty() || tag.trim() != tag)
        {
            return Err(DomainError::Validation {
                field: "tags",
                message: "entries must be trimmed and non-empty",
            });
        }

        let featured_image = match self.featured_image.trim() {
            "" => DEFAULT_FEATURED_IMAGE.to_string(),
            url => url.to_string(),
        };

        Ok(Self {
            title,
            content,
            excerpt: self.excerpt.trim().to_string(),
            featured_image,
            tags: self.tags,
            category: self.category,
            status: self.status,
            author,
        })
    }
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.len() > 255 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    Ok(content.to_string())
}

fn normalize_author(author: &str) -> Result<String, DomainError> {
    let author = author.trim();
    if author.is_empty() {
        return Err(DomainError::Validation {
            field: "author",
            message: "must not be empty",
        });
    }
    Ok(author.to_string())
}
