use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::normalize::{normalize, ListViewModel, MovieSummary};
use crate::query::{PredefinedList, ResolvedQuery};
use crate::reference::RefEntry;
use crate::settings::AppSettings;

pub const DEFAULT_API_BASE: &str = "https://phimapi.com";

/// Home rails shown under the featured banner, in display order.
pub const HOME_RAILS: [PredefinedList; 3] = [
    PredefinedList::Series,
    PredefinedList::SingleMovies,
    PredefinedList::Animation,
];

const FEATURED_POOL: usize = 5;

/// Everything the views need from the upstream catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn categories(&self) -> Result<Vec<RefEntry>, ApiError>;

    async fn countries(&self) -> Result<Vec<RefEntry>, ApiError>;

    /// Runs a resolved list query and normalizes whatever shape comes back.
    async fn list(&self, query: &ResolvedQuery) -> Result<ListViewModel, ApiError>;

    async fn detail(&self, slug: &str) -> Result<MovieDetailResponse, ApiError>;
}

#[derive(Clone)]
pub struct CatalogClient {
    base_url: String,
    http_client: Arc<reqwest::Client>,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: Arc::new(reqwest::Client::new()),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        if settings.api_base_url.trim().is_empty() {
            Self::new(DEFAULT_API_BASE)
        } else {
            Self::new(settings.api_base_url.trim())
        }
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_response(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<reqwest::Response, ApiError> {
        let response = self
            .http_client
            .get(self.endpoint_url(path))
            .query(params)
            .send()
            .await?;

        match response.status().as_u16() {
            404 => Err(ApiError::NotFound),
            429 => Err(ApiError::RateLimit),
            s if s >= 400 => Err(ApiError::Status(s)),
            _ => Ok(response),
        }
    }

    async fn fetch_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        Ok(self.fetch_response(path, params).await?.json().await?)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn categories(&self) -> Result<Vec<RefEntry>, ApiError> {
        self.fetch_json("/the-loai", &[]).await
    }

    async fn countries(&self) -> Result<Vec<RefEntry>, ApiError> {
        self.fetch_json("/quoc-gia", &[]).await
    }

    async fn list(&self, query: &ResolvedQuery) -> Result<ListViewModel, ApiError> {
        let path = query.endpoint.path();
        debug!(path = %path, params = ?query.params, "issuing list query");
        let raw: serde_json::Value = self.fetch_json(&path, &query.params).await?;
        normalize(raw, &query.endpoint)
    }

    async fn detail(&self, slug: &str) -> Result<MovieDetailResponse, ApiError> {
        let body: RawDetailBody = self.fetch_json(&format!("/phim/{}", slug), &[]).await?;
        body.into_detail()
    }
}

#[derive(Debug, Clone)]
pub struct Rail {
    pub list: PredefinedList,
    pub items: Vec<MovieSummary>,
}

#[derive(Debug, Clone, Default)]
pub struct HomeContent {
    pub featured: Option<MovieSummary>,
    pub latest: Vec<MovieSummary>,
    pub rails: Vec<Rail>,
}

/// Picks one of the first few latest items; `seed` is reduced modulo the pool.
pub fn pick_featured(latest: &[MovieSummary], seed: usize) -> Option<MovieSummary> {
    let pool = &latest[..latest.len().min(FEATURED_POOL)];
    if pool.is_empty() {
        return None;
    }
    Some(pool[seed % pool.len()].clone())
}

/// Loads the latest updates and every home rail concurrently; any single
/// failure fails the whole home.
pub async fn load_home_content(
    source: Arc<dyn CatalogSource>,
    page_size: u32,
) -> Result<HomeContent, ApiError> {
    let latest_query = ResolvedQuery::latest_updates(1);
    let rail_queries = HOME_RAILS.map(|list| ResolvedQuery::predefined(list, 1, page_size));

    let (latest, series, single, animation) = tokio::try_join!(
        source.list(&latest_query),
        source.list(&rail_queries[0]),
        source.list(&rail_queries[1]),
        source.list(&rail_queries[2]),
    )?;

    let seed = chrono::Utc::now().timestamp_subsec_nanos() as usize;
    let rails = HOME_RAILS
        .into_iter()
        .zip([series, single, animation])
        .map(|(list, model)| Rail {
            list,
            items: model.items,
        })
        .collect();

    Ok(HomeContent {
        featured: pick_featured(&latest.items, seed),
        latest: latest.items,
        rails,
    })
}

pub async fn load_list(
    source: Arc<dyn CatalogSource>,
    query: ResolvedQuery,
) -> Result<ListViewModel, ApiError> {
    source.list(&query).await
}

pub async fn load_detail(
    source: Arc<dyn CatalogSource>,
    slug: String,
) -> Result<MovieDetailResponse, ApiError> {
    source.detail(&slug).await
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MovieDetail {
    #[serde(default, rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub origin_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub thumb_url: String,
    #[serde(default)]
    pub trailer_url: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub episode_current: String,
    #[serde(default)]
    pub episode_total: String,
    #[serde(default)]
    pub quality: String,
    #[serde(default)]
    pub lang: String,
    pub year: Option<u32>,
    #[serde(default)]
    pub actor: Vec<String>,
    #[serde(default)]
    pub director: Vec<String>,
    #[serde(default)]
    pub category: Vec<RefEntry>,
    #[serde(default)]
    pub country: Vec<RefEntry>,
}

impl MovieDetail {
    pub fn description(&self) -> String {
        strip_html(&self.content)
    }

    pub fn country_names(&self) -> String {
        join_names(&self.country)
    }

    /// Trimmed, non-empty names of a credits list.
    pub fn credited(names: &[String]) -> Vec<&str> {
        names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EpisodeServer {
    #[serde(default)]
    pub server_name: String,
    #[serde(default)]
    pub server_data: Vec<EpisodeLink>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EpisodeLink {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub link_embed: String,
    #[serde(default)]
    pub link_m3u8: String,
}

impl EpisodeLink {
    /// Embed link when present, else the HLS playlist.
    pub fn playable_url(&self) -> Option<&str> {
        [self.link_embed.as_str(), self.link_m3u8.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|link| !link.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieDetailResponse {
    pub movie: MovieDetail,
    pub episodes: Vec<EpisodeServer>,
}

#[derive(Debug, Deserialize)]
struct RawDetailBody {
    movie: Option<MovieDetail>,
    #[serde(default)]
    episodes: Vec<EpisodeServer>,
}

impl RawDetailBody {
    fn into_detail(self) -> Result<MovieDetailResponse, ApiError> {
        // Unknown slugs come back as 200 with `status: false` and no movie.
        let movie = self.movie.ok_or(ApiError::NotFound)?;
        Ok(MovieDetailResponse {
            movie,
            episodes: self.episodes,
        })
    }
}

static TAG_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"<[^>]*>"));

const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
];

/// Plain text of an HTML description.
pub fn strip_html(html: &str) -> String {
    let text = match TAG_PATTERN.as_ref() {
        Ok(pattern) => pattern.replace_all(html, " ").into_owned(),
        Err(_) => html.to_string(),
    };
    let decoded = ENTITIES
        .iter()
        .fold(text, |acc, (entity, plain)| acc.replace(entity, plain));
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn join_names(entries: &[RefEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}


#[cfg(test)]
mod tests {
    use super::testing::FakeCatalog;
    use super::*;
    use crate::query::EndpointKind;

    fn movie(slug: &str) -> MovieSummary {
        MovieSummary {
            id: slug.to_string(),
            name: slug.to_uppercase(),
            origin_name: String::new(),
            slug: slug.to_string(),
            kind: String::new(),
            poster_url: String::new(),
            thumb_url: String::new(),
            time: String::new(),
            episode_current: String::new(),
            quality: String::new(),
            lang: String::new(),
            year: None,
            categories: Vec::new(),
            countries: Vec::new(),
        }
    }

    fn model(slugs: &[&str]) -> ListViewModel {
        ListViewModel {
            items: slugs.iter().map(|slug| movie(slug)).collect(),
            ..ListViewModel::default()
        }
    }

    #[test]
    fn featured_is_drawn_from_first_five() {
        let latest = model(&["a", "b", "c", "d", "e", "f", "g"]).items;
        for seed in 0..20 {
            let featured = pick_featured(&latest, seed).unwrap();
            assert!(["a", "b", "c", "d", "e"].contains(&featured.slug.as_str()));
        }
        assert_eq!(pick_featured(&[], 3), None);
    }

    #[test]
    fn playable_url_prefers_embed() {
        let mut link = EpisodeLink {
            link_embed: String::from("https://player/embed"),
            link_m3u8: String::from("https://cdn/index.m3u8"),
            ..EpisodeLink::default()
        };
        assert_eq!(link.playable_url(), Some("https://player/embed"));
        link.link_embed.clear();
        assert_eq!(link.playable_url(), Some("https://cdn/index.m3u8"));
        link.link_m3u8.clear();
        assert_eq!(link.playable_url(), None);
    }

    #[test]
    fn strip_html_leaves_readable_text() {
        let html = "<p>Câu chuyện&nbsp;về <b>Tôn Ngộ Không</b></p><p>Tom &amp; Jerry</p>";
        assert_eq!(strip_html(html), "Câu chuyện về Tôn Ngộ Không Tom & Jerry");
    }

    #[test]
    fn country_names_are_comma_separated() {
        let countries = vec![
            RefEntry {
                name: String::from("Trung Quốc"),
                ..RefEntry::default()
            },
            RefEntry {
                name: String::from("Hồng Kông"),
                ..RefEntry::default()
            },
        ];
        assert_eq!(join_names(&countries), "Trung Quốc, Hồng Kông");
        assert_eq!(join_names(&[]), "");
    }

    #[test]
    fn detail_without_movie_is_not_found() {
        let body: RawDetailBody =
            serde_json::from_str(r#"{"status":false,"msg":"Movie not found"}"#).unwrap();
        assert_eq!(body.into_detail(), Err(ApiError::NotFound));
    }

    #[test]
    fn detail_body_parses_episode_servers() {
        let body: RawDetailBody = serde_json::from_str(
            r##"{
                "status": true,
                "movie": { "_id": "m", "name": "Phim", "slug": "phim", "year": 2023, "actor": ["A"], "director": [] },
                "episodes": [{
                    "server_name": "#Hà Nội (Vietsub)",
                    "server_data": [{ "name": "Tập 01", "slug": "tap-01", "link_embed": "https://e/1", "link_m3u8": "" }]
                }]
            }"##,
        )
        .unwrap();
        let detail = body.into_detail().unwrap();
        assert_eq!(detail.movie.year, Some(2023));
        assert_eq!(detail.episodes[0].server_data[0].playable_url(), Some("https://e/1"));
    }

    #[tokio::test]
    async fn home_joins_latest_and_rails() {
        let source = Arc::new(
            FakeCatalog::default()
                .with_list(EndpointKind::LatestUpdates, Ok(model(&["new-1", "new-2"])))
                .with_list(EndpointKind::Predefined(PredefinedList::Series), Ok(model(&["s"])))
                .with_list(EndpointKind::Predefined(PredefinedList::Animation), Ok(model(&["a"]))),
        );

        let home = load_home_content(source.clone(), 12).await.unwrap();

        assert_eq!(home.latest.len(), 2);
        assert!(home.featured.is_some());
        let lists: Vec<_> = home.rails.iter().map(|rail| rail.list).collect();
        assert_eq!(lists, HOME_RAILS.to_vec());
        assert_eq!(home.rails[0].items[0].slug, "s");
        assert!(home.rails[1].items.is_empty());
        assert_eq!(source.issued().len(), 4);
        assert!(source
            .issued()
            .iter()
            .filter(|query| query.endpoint != EndpointKind::LatestUpdates)
            .all(|query| query.param("limit") == Some("12")));
    }

    #[tokio::test]
    async fn any_failed_rail_fails_the_home() {
        let source = Arc::new(FakeCatalog::default().with_list(
            EndpointKind::Predefined(PredefinedList::SingleMovies),
            Err(ApiError::Status(500)),
        ));
        let result = load_home_content(source, 12).await;
        assert_eq!(result.map(|_| ()), Err(ApiError::Status(500)));
    }
}
