// SPDX-License-Identifier: MIT
//! Data access layer: one zero-argument accessor per content resource.
//!
//! Every accessor goes through the shared [`ResourceCache`] under a fixed
//! key, normalizes the raw payload, and decodes it into the typed models.
//! Accessors are fail-open by design: any transport or backend failure is
//! logged and converted into an empty collection or an absent singleton, so
//! the rendering side always receives something it can display. Do not
//! "fix" this into error propagation — downstream code relies on it.

pub mod model;

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::cache::ResourceCache;
use crate::cms::CmsClient;
use crate::config::Config;
use crate::error::Error;
use crate::normalize::{normalize_item, normalize_list};

use model::{
    About, Achievement, Certification, ContactInformation, CoreCompetency, CvSection, Education,
    Hero, ProfessionalExperience, Project, ResearchPublication, SoftSkill, ToolCategory,
};

/// Explicitly-owned handle over the CMS client and the resource cache.
/// Construct one per process and share it; there is no ambient singleton.
pub struct ContentService {
    cms: CmsClient,
    cache: ResourceCache,
    ttl: Duration,
}

impl ContentService {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            cms: CmsClient::new(config)?,
            cache: ResourceCache::new(),
            ttl: config.cache_ttl,
        })
    }

    /// Drop every cached resource and in-flight marker. The next accessor
    /// call for any resource refetches.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    // ─── Singletons ───────────────────────────────────────────────────────────

    /// Hero banner content, or `None` when unconfigured or unreachable.
    pub async fn hero(&self) -> Option<Hero> {
        let result = self.load_single("hero", "/hero", &[("populate", "*")]).await;
        decode_single("hero", result)
    }

    /// Contact details, or `None` when unconfigured or unreachable.
    pub async fn contact_information(&self) -> Option<ContactInformation> {
        let result = self
            .load_single("contact-information", "/contact-information", &[("populate", "*")])
            .await;
        decode_single("contact-information", result)
    }

    /// About/bio content, or `None` when unconfigured or unreachable.
    pub async fn about(&self) -> Option<About> {
        let result = self
            .load_single("about", "/about", &[("populate[achievements]", "*")])
            .await;
        decode_single("about", result)
    }

    // ─── Collections (backend order) ──────────────────────────────────────────

    pub async fn professional_experiences(&self) -> Vec<ProfessionalExperience> {
        let result = self
            .load_collection(
                "professional-experiences",
                "/professional-experiences",
                &[("sort", "order:asc")],
            )
            .await;
        decode_collection("professional-experiences", result)
    }

    pub async fn core_competencies(&self) -> Vec<CoreCompetency> {
        let result = self
            .load_collection(
                "core-competencies",
                "/core-competencies",
                &[("populate", "*"), ("sort", "order:asc")],
            )
            .await;
        decode_collection("core-competencies", result)
    }

    pub async fn certifications(&self) -> Vec<Certification> {
        let result = self
            .load_collection(
                "certifications",
                "/certifications",
                &[("populate", "*"), ("sort", "order:asc")],
            )
            .await;
        decode_collection("certifications", result)
    }

    pub async fn tool_categories(&self) -> Vec<ToolCategory> {
        let result = self
            .load_collection(
                "tool-categories",
                "/tool-categories",
                &[("populate", "*"), ("sort", "order:asc")],
            )
            .await;
        decode_collection("tool-categories", result)
    }

    pub async fn projects(&self) -> Vec<Project> {
        let result = self
            .load_collection(
                "projects",
                "/projects",
                &[("populate", "*"), ("sort", "order:asc")],
            )
            .await;
        decode_collection("projects", result)
    }

    pub async fn research_publications(&self) -> Vec<ResearchPublication> {
        let result = self
            .load_collection(
                "research-publications",
                "/research-publications",
                &[("sort", "order:asc")],
            )
            .await;
        decode_collection("research-publications", result)
    }

    pub async fn achievements(&self) -> Vec<Achievement> {
        let result = self
            .load_collection("achievements", "/achievements", &[("sort", "order:asc")])
            .await;
        decode_collection("achievements", result)
    }

    pub async fn soft_skills(&self) -> Vec<SoftSkill> {
        let result = self
            .load_collection("soft-skills", "/soft-skills", &[("sort", "order:asc")])
            .await;
        decode_collection("soft-skills", result)
    }

    // ─── Collections with post-processing ─────────────────────────────────────

    /// Education entries, re-sorted client-side: current entries first, then
    /// graduation date descending, dated entries before undated ones, ties
    /// broken by descending `order`. The cached value is already sorted.
    pub async fn educations(&self) -> Vec<Education> {
        let cms = self.cms.clone();
        let result = self
            .cache
            .fetch_or_load("educations", Some(self.ttl), move || async move {
                let response = cms.get("/educations", &[("sort", "order:asc")]).await?;
                let mut items: Vec<Education> =
                    serde_json::from_value(Value::Array(normalize_list(response.data)))?;
                sort_educations(&mut items);
                Ok(serde_json::to_value(items)?)
            })
            .await;
        decode_collection("educations", result)
    }

    /// The CV block to display: the entry flagged `featured`, else the first
    /// entry, else `None` when the collection is empty.
    pub async fn cv_section(&self) -> Option<CvSection> {
        let cms = self.cms.clone();
        let result = self
            .cache
            .fetch_or_load("cv-sections", Some(self.ttl), move || async move {
                let response = cms
                    .get("/cv-sections", &[("populate", "*"), ("sort", "order:asc")])
                    .await?;
                let sections: Vec<CvSection> =
                    serde_json::from_value(Value::Array(normalize_list(response.data)))?;
                match select_cv_section(sections) {
                    Some(section) => Ok(serde_json::to_value(section)?),
                    None => Ok(Value::Null),
                }
            })
            .await;
        decode_single("cv-sections", result)
    }

    // ─── Shared fetch plumbing ────────────────────────────────────────────────

    async fn load_single(
        &self,
        key: &str,
        path: &'static str,
        query: &'static [(&'static str, &'static str)],
    ) -> Result<Value, Arc<Error>> {
        let cms = self.cms.clone();
        self.cache
            .fetch_or_load(key, Some(self.ttl), move || async move {
                let response = cms.get(path, query).await?;
                Ok(match response.data {
                    // A configured single type arrives as one object; null or
                    // absent means "nothing configured", kept distinct from an
                    // empty record.
                    Some(data) if !data.is_null() => normalize_item(data),
                    _ => Value::Null,
                })
            })
            .await
    }

    async fn load_collection(
        &self,
        key: &str,
        path: &'static str,
        query: &'static [(&'static str, &'static str)],
    ) -> Result<Value, Arc<Error>> {
        let cms = self.cms.clone();
        self.cache
            .fetch_or_load(key, Some(self.ttl), move || async move {
                let response = cms.get(path, query).await?;
                Ok(Value::Array(normalize_list(response.data)))
            })
            .await
    }
}

// ─── Fail-open decoding ───────────────────────────────────────────────────────

fn decode_collection<T: DeserializeOwned>(resource: &str, result: Result<Value, Arc<Error>>) -> Vec<T> {
    match result {
        Ok(value) => match serde_json::from_value(value) {
            Ok(items) => items,
            Err(e) => {
                warn!(resource, err = %e, "undecodable resource — returning empty");
                Vec::new()
            }
        },
        Err(e) => {
            warn!(resource, err = %e, "CMS fetch failed — returning empty");
            Vec::new()
        }
    }
}

fn decode_single<T: DeserializeOwned>(resource: &str, result: Result<Value, Arc<Error>>) -> Option<T> {
    match result {
        Ok(Value::Null) => None,
        Ok(value) => match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(resource, err = %e, "undecodable resource — returning none");
                None
            }
        },
        Err(e) => {
            warn!(resource, err = %e, "CMS fetch failed — returning none");
            None
        }
    }
}

// ─── Post-processing ──────────────────────────────────────────────────────────

fn sort_educations(items: &mut [Education]) {
    items.sort_by(|a, b| {
        b.current
            .cmp(&a.current)
            .then_with(|| {
                let da = parse_graduation_date(a.graduation_date.as_deref());
                let db = parse_graduation_date(b.graduation_date.as_deref());
                match (da, db) {
                    (Some(da), Some(db)) => db.cmp(&da),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            })
            .then_with(|| b.order.cmp(&a.order))
    });
}

/// Accepts "2023-06-15", "2023-06", or "2023". Anything else counts as
/// undated and sorts after dated entries.
fn parse_graduation_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok())
        .or_else(|| {
            raw.parse::<i32>()
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        })
}

fn select_cv_section(mut sections: Vec<CvSection>) -> Option<CvSection> {
    if sections.is_empty() {
        return None;
    }
    let index = sections.iter().position(|s| s.featured).unwrap_or(0);
    Some(sections.swap_remove(index))
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn education(degree: &str, current: bool, date: Option<&str>, order: i64) -> Education {
        Education {
            degree: degree.to_string(),
            current,
            graduation_date: date.map(str::to_string),
            order,
            ..Education::default()
        }
    }

    fn degrees(items: &[Education]) -> Vec<&str> {
        items.iter().map(|e| e.degree.as_str()).collect()
    }

    #[test]
    fn current_sorts_first_then_date_desc_then_undated() {
        let mut items = vec![
            education("B", false, Some("2023-06-01"), 1),
            education("C", false, None, 2),
            education("A", true, Some("2020-01-01"), 0),
        ];
        sort_educations(&mut items);
        assert_eq!(degrees(&items), vec!["A", "B", "C"]);
    }

    #[test]
    fn dated_entries_come_before_undated() {
        let mut items = vec![
            education("undated", false, None, 9),
            education("dated", false, Some("2015"), 0),
        ];
        sort_educations(&mut items);
        assert_eq!(degrees(&items), vec!["dated", "undated"]);
    }

    #[test]
    fn tie_breaks_by_descending_order() {
        let mut items = vec![
            education("low", false, None, 1),
            education("high", false, None, 5),
        ];
        sort_educations(&mut items);
        assert_eq!(degrees(&items), vec!["high", "low"]);

        let mut same_date = vec![
            education("low", false, Some("2021-01-01"), 1),
            education("high", false, Some("2021-01-01"), 5),
        ];
        sort_educations(&mut same_date);
        assert_eq!(degrees(&same_date), vec!["high", "low"]);
    }

    #[test]
    fn unparseable_date_counts_as_undated() {
        let mut items = vec![
            education("junk", false, Some("someday"), 9),
            education("dated", false, Some("2019-09"), 0),
        ];
        sort_educations(&mut items);
        assert_eq!(degrees(&items), vec!["dated", "junk"]);
    }

    #[test]
    fn graduation_date_formats() {
        assert!(parse_graduation_date(Some("2023-06-15")).is_some());
        assert!(parse_graduation_date(Some("2023-06")).is_some());
        assert!(parse_graduation_date(Some("2023")).is_some());
        assert!(parse_graduation_date(Some("")).is_none());
        assert!(parse_graduation_date(Some("n/a")).is_none());
        assert!(parse_graduation_date(None).is_none());
    }

    fn cv(title: &str, featured: bool) -> CvSection {
        CvSection {
            title: title.to_string(),
            featured,
            ..CvSection::default()
        }
    }

    #[test]
    fn featured_cv_section_wins_regardless_of_position() {
        let chosen = select_cv_section(vec![cv("a", false), cv("b", true), cv("c", false)]);
        assert_eq!(chosen.unwrap().title, "b");
    }

    #[test]
    fn first_cv_section_when_none_featured() {
        let chosen = select_cv_section(vec![cv("a", false), cv("b", false)]);
        assert_eq!(chosen.unwrap().title, "a");
    }

    #[test]
    fn no_cv_section_when_empty() {
        assert!(select_cv_section(Vec::new()).is_none());
    }
}
