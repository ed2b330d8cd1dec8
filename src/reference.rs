use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::catalog::CatalogSource;
use crate::error::ApiError;

/// A category or country as the catalog names it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RefEntry {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

impl std::fmt::Display for RefEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub type RefList = Arc<[RefEntry]>;

fn empty_list() -> RefList {
    Arc::from(Vec::new())
}

fn name_for(list: &[RefEntry], slug: &str) -> String {
    list.iter()
        .find(|entry| entry.slug == slug)
        .map(|entry| entry.name.clone())
        .unwrap_or_else(|| slug.to_string())
}

/// Read-only view of the two reference lists, shared by every page.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub categories: RefList,
    pub countries: RefList,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self {
            categories: empty_list(),
            countries: empty_list(),
        }
    }
}

impl ReferenceData {
    pub fn category_name(&self, slug: &str) -> String {
        name_for(&self.categories, slug)
    }

    pub fn country_name(&self, slug: &str) -> String {
        name_for(&self.countries, slug)
    }

    pub fn is_complete(&self) -> bool {
        !self.categories.is_empty() && !self.countries.is_empty()
    }

    /// Lists that failed to load keep their prior value.
    pub fn apply(&mut self, update: ReferenceUpdate) {
        if let Some(categories) = update.categories {
            self.categories = categories;
        }
        if let Some(countries) = update.countries {
            self.countries = countries;
        }
    }
}

/// Outcome of one reference load; `None` marks a list whose fetch failed.
#[derive(Debug, Clone, Default)]
pub struct ReferenceUpdate {
    pub categories: Option<RefList>,
    pub countries: Option<RefList>,
}

/// Process-wide memo of the category and country lists.
///
/// Each list is filled at most once. A failed fetch leaves its cell empty so
/// a later load tries again; concurrent loads wait on the same fill.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCache {
    categories: Arc<OnceCell<RefList>>,
    countries: Arc<OnceCell<RefList>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&self, source: &dyn CatalogSource) -> ReferenceUpdate {
        let (categories, countries) = tokio::join!(
            self.categories.get_or_try_init(|| async {
                debug!("fetching category list");
                source.categories().await.map(RefList::from)
            }),
            self.countries.get_or_try_init(|| async {
                debug!("fetching country list");
                source.countries().await.map(RefList::from)
            }),
        );

        ReferenceUpdate {
            categories: settle("categories", categories),
            countries: settle("countries", countries),
        }
    }
}

fn settle(list: &str, result: Result<&RefList, ApiError>) -> Option<RefList> {
    match result {
        Ok(entries) => Some(Arc::clone(entries)),
        Err(error) => {
            warn!(list, %error, "reference list unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::FakeCatalog;

    fn entry(name: &str, slug: &str) -> RefEntry {
        RefEntry {
            id: slug.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn names_fall_back_to_slug() {
        let data = ReferenceData {
            categories: RefList::from(vec![entry("Hành Động", "hanh-dong")]),
            countries: empty_list(),
        };
        assert_eq!(data.category_name("hanh-dong"), "Hành Động");
        assert_eq!(data.category_name("vien-tuong"), "vien-tuong");
        assert_eq!(data.country_name("han-quoc"), "han-quoc");
    }

    #[test]
    fn reference_entries_accept_both_id_spellings() {
        let listed: RefEntry =
            serde_json::from_str(r#"{"_id":"1","name":"Á","slug":"a"}"#).unwrap();
        let tagged: RefEntry = serde_json::from_str(r#"{"id":"1","name":"Á","slug":"a"}"#).unwrap();
        assert_eq!(listed, tagged);
    }

    #[tokio::test]
    async fn lists_are_fetched_once_and_shared() {
        let source = FakeCatalog::default()
            .with_categories(vec![entry("Hành Động", "hanh-dong")])
            .with_countries(vec![entry("Hàn Quốc", "han-quoc")]);
        let cache = ReferenceCache::new();

        let first = cache.load(&source).await;
        let second = cache.clone().load(&source).await;

        assert_eq!(source.category_calls(), 1);
        assert_eq!(source.country_calls(), 1);
        let (Some(a), Some(b)) = (first.categories, second.categories) else {
            panic!("categories should be loaded");
        };
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn failed_list_keeps_prior_value_and_is_retried() {
        let source = FakeCatalog::default()
            .with_categories(vec![entry("Hài Hước", "hai-huoc")])
            .failing_countries();
        let cache = ReferenceCache::new();
        let mut data = ReferenceData::default();

        data.apply(cache.load(&source).await);
        assert_eq!(data.categories.len(), 1);
        assert!(data.countries.is_empty());

        cache.load(&source).await;
        assert_eq!(source.category_calls(), 1);
        assert_eq!(source.country_calls(), 2);
    }
}
