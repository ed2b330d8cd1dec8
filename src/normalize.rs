use serde::Deserialize;

use crate::error::ApiError;
use crate::query::EndpointKind;
use crate::reference::RefEntry;

/// How a list endpoint lays out its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `items` and `pagination` at the top level.
    LatestUpdates,
    /// Everything under `data`, pagination under `data.params`.
    Envelope,
}

impl EndpointKind {
    pub fn shape(&self) -> ResponseShape {
        match self {
            EndpointKind::LatestUpdates => ResponseShape::LatestUpdates,
            EndpointKind::Predefined(_)
            | EndpointKind::Search
            | EndpointKind::Category(_)
            | EndpointKind::Country(_)
            | EndpointKind::Year(_) => ResponseShape::Envelope,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u32,
    pub items_per_page: u32,
}

impl Pagination {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn previous_page(&self) -> u32 {
        self.current_page.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> u32 {
        self.current_page.saturating_add(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieSummary {
    pub id: String,
    pub name: String,
    pub origin_name: String,
    pub slug: String,
    pub kind: String,
    pub poster_url: String,
    pub thumb_url: String,
    pub time: String,
    pub episode_current: String,
    pub quality: String,
    pub lang: String,
    pub year: Option<u32>,
    pub categories: Vec<RefEntry>,
    pub countries: Vec<RefEntry>,
}

/// Canonical list model every list endpoint is reduced to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListViewModel {
    pub items: Vec<MovieSummary>,
    pub pagination: Option<Pagination>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMovie {
    #[serde(default, rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub origin_name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub thumb_url: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub episode_current: String,
    #[serde(default)]
    pub quality: String,
    #[serde(default)]
    pub lang: String,
    pub year: Option<u32>,
    #[serde(default)]
    pub category: Vec<RefEntry>,
    #[serde(default)]
    pub country: Vec<RefEntry>,
}

impl From<RawMovie> for MovieSummary {
    fn from(raw: RawMovie) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            origin_name: raw.origin_name,
            slug: raw.slug,
            kind: raw.kind,
            poster_url: raw.poster_url,
            thumb_url: raw.thumb_url,
            time: raw.time,
            episode_current: raw.episode_current,
            quality: raw.quality,
            lang: raw.lang,
            year: raw.year.filter(|year| *year > 0),
            categories: raw.category,
            countries: raw.country,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPagination {
    #[serde(default)]
    total_items: u32,
    #[serde(default)]
    total_items_per_page: u32,
    #[serde(default)]
    current_page: u32,
    #[serde(default)]
    total_pages: u32,
}

impl From<RawPagination> for Pagination {
    fn from(raw: RawPagination) -> Self {
        Self {
            current_page: raw.current_page.max(1),
            total_pages: raw.total_pages,
            total_items: raw.total_items,
            items_per_page: raw.total_items_per_page,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestUpdatesBody {
    items: Option<Vec<RawMovie>>,
    pagination: Option<RawPagination>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeBody {
    data: Option<EnvelopeData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeData {
    items: Option<Vec<RawMovie>>,
    params: Option<EnvelopeParams>,
    title_page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeParams {
    pagination: Option<RawPagination>,
}

fn summaries(items: Option<Vec<RawMovie>>) -> Vec<MovieSummary> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(MovieSummary::from)
        .collect()
}

/// Reduces a raw list body to a [`ListViewModel`]. The shape is taken from
/// the endpoint that was called, not from the body.
pub fn normalize(raw: serde_json::Value, endpoint: &EndpointKind) -> Result<ListViewModel, ApiError> {
    match endpoint.shape() {
        ResponseShape::LatestUpdates => {
            let body: LatestUpdatesBody = serde_json::from_value(raw)?;
            Ok(ListViewModel {
                items: summaries(body.items),
                pagination: body.pagination.map(Pagination::from),
                title: None,
            })
        }
        ResponseShape::Envelope => {
            let Some(data) = serde_json::from_value::<EnvelopeBody>(raw)?.data else {
                return Ok(ListViewModel::default());
            };
            Ok(ListViewModel {
                items: summaries(data.items),
                pagination: data
                    .params
                    .and_then(|params| params.pagination)
                    .map(Pagination::from),
                title: data.title_page.filter(|title| !title.trim().is_empty()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PredefinedList;
    use serde_json::json;

    #[test]
    fn empty_latest_updates_body_normalizes_to_empty_model() {
        let model = normalize(json!({ "status": true, "items": [] }), &EndpointKind::LatestUpdates)
            .unwrap();
        assert_eq!(model, ListViewModel::default());
    }

    #[test]
    fn latest_updates_reads_top_level_pagination() {
        let raw = json!({
            "status": true,
            "items": [{
                "_id": "a1",
                "name": "Tên Phim",
                "slug": "ten-phim",
                "origin_name": "Movie Name",
                "poster_url": "https://phimimg.com/upload/poster.jpg",
                "thumb_url": "https://phimimg.com/upload/thumb.jpg",
                "year": 2024,
                "modified": { "time": "2024-05-01T10:00:00.000Z" }
            }],
            "pagination": {
                "totalItems": 25011,
                "totalItemsPerPage": 10,
                "currentPage": 2,
                "totalPages": 2502
            }
        });
        let model = normalize(raw, &EndpointKind::LatestUpdates).unwrap();

        assert_eq!(model.items.len(), 1);
        assert_eq!(model.items[0].slug, "ten-phim");
        assert_eq!(model.items[0].year, Some(2024));
        assert!(model.items[0].categories.is_empty());
        assert_eq!(
            model.pagination,
            Some(Pagination {
                current_page: 2,
                total_pages: 2502,
                total_items: 25011,
                items_per_page: 10,
            })
        );
        assert_eq!(model.title, None);
    }

    #[test]
    fn envelope_reads_nested_items_pagination_and_title() {
        let raw = json!({
            "status": "success",
            "data": {
                "titlePage": "Phim Hành Động",
                "items": [
                    {
                        "_id": "x",
                        "name": "One",
                        "slug": "one",
                        "type": "single",
                        "quality": "FHD",
                        "lang": "Vietsub",
                        "episode_current": "Full",
                        "category": [{ "id": "c1", "name": "Hành Động", "slug": "hanh-dong" }],
                        "country": [{ "id": "k1", "name": "Hàn Quốc", "slug": "han-quoc" }]
                    },
                    { "_id": "y", "name": "Two", "slug": "two" }
                ],
                "params": {
                    "pagination": { "totalItems": 40, "totalItemsPerPage": 12, "currentPage": 1, "totalPages": 4 }
                }
            }
        });
        let model = normalize(raw, &EndpointKind::Category(String::from("hanh-dong"))).unwrap();

        assert_eq!(model.title.as_deref(), Some("Phim Hành Động"));
        assert_eq!(model.items.len(), 2);
        assert_eq!(model.items[0].categories[0].slug, "hanh-dong");
        assert_eq!(model.items[0].countries[0].name, "Hàn Quốc");
        assert_eq!(model.items[1].year, None);
        assert_eq!(model.pagination.map(|p| p.total_pages), Some(4));
        assert_eq!(model.pagination.map(|p| p.total_items), Some(40));
    }

    #[test]
    fn envelope_without_pagination_or_title_is_not_an_error() {
        let raw = json!({ "data": { "items": null, "titlePage": "" } });
        let model = normalize(raw, &EndpointKind::Search).unwrap();
        assert!(model.items.is_empty());
        assert_eq!(model.pagination, None);
        assert_eq!(model.title, None);
    }

    #[test]
    fn shape_follows_endpoint_not_body() {
        // A top-level `items` array is ignored on an envelope endpoint.
        let raw = json!({ "items": [{ "slug": "stray" }] });
        let model = normalize(raw, &EndpointKind::Predefined(PredefinedList::Series)).unwrap();
        assert!(model.items.is_empty());
    }

    #[test]
    fn wrong_item_type_is_a_parse_error() {
        let raw = json!({ "items": "nope" });
        assert!(matches!(
            normalize(raw, &EndpointKind::LatestUpdates),
            Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn page_steps_saturate_at_the_bounds() {
        let last = Pagination {
            current_page: u32::MAX,
            total_pages: u32::MAX,
            total_items: 0,
            items_per_page: 12,
        };
        assert_eq!(last.next_page(), u32::MAX);
        assert!(!last.has_next());

        let first = Pagination {
            current_page: 1,
            ..last
        };
        assert_eq!(first.previous_page(), 1);
        assert_eq!(first.next_page(), 2);
    }
}
