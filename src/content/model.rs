//! Typed mirrors of the CMS content resources.
//!
//! Every struct is deserialized from an already-normalized flat record
//! (see [`crate::normalize`]), so none of them carry the nested
//! `attributes` envelope. Fields default liberally: half-configured CMS
//! entries must never make a whole collection undecodable.

use serde::{Deserialize, Serialize};

// ─── Shared components ────────────────────────────────────────────────────────

/// A labelled icon line, e.g. the short claims under the hero banner.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Highlight {
    pub id: Option<i64>,
    pub icon: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLink {
    pub id: Option<i64>,
    pub platform: String,
    pub url: String,
    pub icon: Option<String>,
}

/// An uploaded media file. Older backends nest the URL under
/// `data.attributes.url`; newer ones put it directly on the object.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Media {
    pub id: Option<i64>,
    pub url: Option<String>,
    pub name: Option<String>,
    pub alternative_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub mime: Option<String>,
    pub data: Option<MediaData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaData {
    pub attributes: MediaAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaAttributes {
    pub url: String,
}

impl Media {
    /// The file URL regardless of which shape the backend sent.
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .or_else(|| self.data.as_ref().map(|d| d.attributes.url.as_str()))
    }
}

// ─── Resources ────────────────────────────────────────────────────────────────

/// Hero banner content (single type).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Hero {
    pub id: Option<i64>,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub availability_status: String,
    pub is_available: bool,
    pub cv_url: Option<String>,
    pub profile_image: Option<Media>,
    pub highlights: Vec<Highlight>,
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessionalExperience {
    pub id: Option<i64>,
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_current: bool,
    pub description: String,
    pub location: Option<String>,
    pub technologies: Vec<String>,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: Option<i64>,
    pub degree: String,
    pub institution: String,
    pub department: Option<String>,
    pub graduation_date: Option<String>,
    pub gpa: Option<String>,
    pub description: Option<String>,
    pub current: bool,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub id: Option<i64>,
    pub title: String,
    pub issuer: String,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
    pub description: Option<String>,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreCompetency {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub certifications: Vec<Certification>,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Tool {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolCategory {
    pub id: Option<i64>,
    pub category: String,
    pub tools: Vec<Tool>,
    pub order: i64,
}

/// Portfolio project card. `category` is a free-form tag ("ml", "nlp",
/// "cv", ...) rather than an enum so new backend tags never break decoding.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub image: Option<Media>,
    pub image_url: Option<String>,
    pub technologies: Vec<String>,
    pub category: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ResearchPublication {
    pub id: Option<i64>,
    pub title: String,
    pub publisher: String,
    pub publication_date: Option<String>,
    pub description: String,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub authors: Vec<String>,
    pub order: i64,
}

/// A headline stat, e.g. "15+ projects delivered".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Achievement {
    pub id: Option<i64>,
    pub number: String,
    pub label: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub order: i64,
}

/// Contact details (single type).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInformation {
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub social_links: Vec<SocialLink>,
    pub contact_message: Option<String>,
}

/// About/bio content (single type).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct About {
    pub bio: String,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SoftSkill {
    pub id: Option<i64>,
    pub name: String,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CvSectionLabel {
    pub id: Option<i64>,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct QuickFact {
    pub id: Option<i64>,
    pub number: String,
    pub label: String,
}

/// CV download/preview block. The backend stores these as a collection;
/// the accessor picks the featured entry (or the first one).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CvSection {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub cv_url: Option<String>,
    pub preview_name: String,
    pub preview_title: String,
    pub preview_description: Option<String>,
    pub cv_sections: Vec<CvSectionLabel>,
    pub quick_facts: Vec<QuickFact>,
    pub order: Option<i64>,
    pub featured: bool,
}

// ─── Tests ────────────────────────────────────────────────────────────────────
