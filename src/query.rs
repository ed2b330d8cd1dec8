//! Decides which upstream list endpoint a view should call and how its
//! filters are encoded on the wire.
//!
//! Resolution is a pure function of an immutable [`ListQueryContext`]. The
//! precedence rules and the per-endpoint parameter sets are tables, so the
//! decision can be tested without any rendering or transport involved.

use std::fmt;

pub const DEFAULT_LIMIT: u32 = 12;
pub const FIRST_YEAR: i32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    UpdatedTime,
    Year,
}

impl SortField {
    pub const ALL: [SortField; 2] = [SortField::UpdatedTime, SortField::Year];

    pub fn wire_name(self) -> &'static str {
        match self {
            SortField::UpdatedTime => "modified.time",
            SortField::Year => "year",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortField::UpdatedTime => write!(f, "Last updated"),
            SortField::Year => write!(f, "Release year"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortType {
    Asc,
    #[default]
    Desc,
}

impl SortType {
    pub const ALL: [SortType; 2] = [SortType::Desc, SortType::Asc];

    pub fn wire_name(self) -> &'static str {
        match self {
            SortType::Asc => "asc",
            SortType::Desc => "desc",
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortType::Asc => write!(f, "Ascending"),
            SortType::Desc => write!(f, "Descending"),
        }
    }
}

/// Audio/subtitle variants the catalog can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortLang {
    #[default]
    Any,
    Vietsub,
    Dubbed,
    Narrated,
}

impl SortLang {
    pub const ALL: [SortLang; 4] = [
        SortLang::Any,
        SortLang::Vietsub,
        SortLang::Dubbed,
        SortLang::Narrated,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            SortLang::Any => "",
            SortLang::Vietsub => "vietsub",
            SortLang::Dubbed => "long-tieng",
            SortLang::Narrated => "thuyet-minh",
        }
    }

    pub fn from_wire(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|lang| lang.wire_name() == value)
            .unwrap_or_default()
    }
}

impl fmt::Display for SortLang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortLang::Any => write!(f, "Any language"),
            SortLang::Vietsub => write!(f, "Vietsub"),
            SortLang::Dubbed => write!(f, "Lồng Tiếng"),
            SortLang::Narrated => write!(f, "Thuyết Minh"),
        }
    }
}

/// The user-editable filter fields that take part in endpoint selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Keyword,
    Category,
    Country,
    Year,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Keyword,
        FilterField::Category,
        FilterField::Country,
        FilterField::Year,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    pub keyword: String,
    pub category: String,
    pub country: String,
    pub year: String,
    pub sort_field: SortField,
    pub sort_type: SortType,
    pub sort_lang: String,
    /// Always >= 1.
    pub page: u32,
    pub limit: u32,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }
}

impl FilterSet {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            keyword: String::new(),
            category: String::new(),
            country: String::new(),
            year: String::new(),
            sort_field: SortField::default(),
            sort_type: SortType::default(),
            sort_lang: String::new(),
            page: 1,
            limit: limit.max(1),
        }
    }

    pub fn value(&self, field: FilterField) -> &str {
        match field {
            FilterField::Keyword => &self.keyword,
            FilterField::Category => &self.category,
            FilterField::Country => &self.country,
            FilterField::Year => &self.year,
        }
    }

    pub fn set(&mut self, field: FilterField, value: String) {
        match field {
            FilterField::Keyword => self.keyword = value,
            FilterField::Category => self.category = value,
            FilterField::Country => self.country = value,
            FilterField::Year => self.year = value,
        }
    }

    pub fn clear(&mut self, field: FilterField) {
        self.set(field, String::new());
    }
}

/// The four catalog partitions served by dedicated, filterless endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedList {
    Series,
    SingleMovies,
    Animation,
    TvShows,
}

impl PredefinedList {
    pub const ALL: [PredefinedList; 4] = [
        PredefinedList::Series,
        PredefinedList::SingleMovies,
        PredefinedList::Animation,
        PredefinedList::TvShows,
    ];

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|list| list.slug() == slug)
    }

    pub fn slug(self) -> &'static str {
        match self {
            PredefinedList::Series => "phim-bo",
            PredefinedList::SingleMovies => "phim-le",
            PredefinedList::Animation => "hoat-hinh",
            PredefinedList::TvShows => "tv-shows",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PredefinedList::Series => "Phim Bộ",
            PredefinedList::SingleMovies => "Phim Lẻ",
            PredefinedList::Animation => "Hoạt Hình",
            PredefinedList::TvShows => "TV Shows",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Category,
    Country,
}

/// Route of a category or country listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRoute {
    pub slug: String,
    pub kind: ListingKind,
}

impl ListingRoute {
    pub fn category(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            kind: ListingKind::Category,
        }
    }

    pub fn country(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            kind: ListingKind::Country,
        }
    }

    pub fn predefined(&self) -> Option<PredefinedList> {
        match self.kind {
            ListingKind::Category => PredefinedList::from_slug(&self.slug),
            ListingKind::Country => None,
        }
    }

    /// Title shown until the upstream envelope supplies one.
    pub fn local_title(&self) -> String {
        match PredefinedList::from_slug(&self.slug) {
            Some(list) => list.title().to_string(),
            None => self.slug.clone(),
        }
    }

    /// Predefined listings render without the advanced filter panel.
    pub fn shows_filter_panel(&self) -> bool {
        self.kind == ListingKind::Country || PredefinedList::from_slug(&self.slug).is_none()
    }
}

/// Which page a filter set belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewScope {
    Search,
    Listing(ListingRoute),
}

/// Immutable snapshot taken for exactly one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQueryContext {
    pub route_slug: String,
    pub is_country_route: bool,
    pub is_predefined_category: bool,
    pub from_search: bool,
    pub filters: FilterSet,
}

impl ListQueryContext {
    pub fn new(scope: &ViewScope, filters: FilterSet) -> Self {
        match scope {
            ViewScope::Search => Self {
                route_slug: String::new(),
                is_country_route: false,
                is_predefined_category: false,
                from_search: true,
                filters,
            },
            ViewScope::Listing(route) => Self {
                route_slug: route.slug.clone(),
                is_country_route: route.kind == ListingKind::Country,
                is_predefined_category: PredefinedList::from_slug(&route.slug).is_some(),
                from_search: false,
                filters,
            },
        }
    }

    pub fn filter_panel_active(&self) -> bool {
        self.from_search || self.is_country_route || !self.is_predefined_category
    }

    fn predefined_list(&self) -> Option<PredefinedList> {
        if self.filter_panel_active() {
            return None;
        }
        PredefinedList::from_slug(&self.route_slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointKind {
    LatestUpdates,
    Predefined(PredefinedList),
    Search,
    Category(String),
    Country(String),
    Year(String),
}

impl EndpointKind {
    pub fn path(&self) -> String {
        match self {
            EndpointKind::LatestUpdates => String::from("/danh-sach/phim-moi-cap-nhat"),
            EndpointKind::Predefined(list) => format!("/v1/api/danh-sach/{}", list.slug()),
            EndpointKind::Search => String::from("/v1/api/tim-kiem"),
            EndpointKind::Category(slug) => format!("/v1/api/the-loai/{}", slug),
            EndpointKind::Country(slug) => format!("/v1/api/quoc-gia/{}", slug),
            EndpointKind::Year(year) => format!("/v1/api/nam/{}", year),
        }
    }

    /// Parameters this endpoint accepts, in wire order. The field that
    /// selected the endpoint travels in the path and is not repeated here.
    fn carried_params(&self) -> &'static [Param] {
        match self {
            EndpointKind::LatestUpdates => LATEST_PARAMS,
            EndpointKind::Predefined(_) => PREDEFINED_PARAMS,
            EndpointKind::Search => SEARCH_PARAMS,
            EndpointKind::Category(_) => CATEGORY_PARAMS,
            EndpointKind::Country(_) => COUNTRY_PARAMS,
            EndpointKind::Year(_) => YEAR_PARAMS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Param {
    Keyword,
    Page,
    Limit,
    SortField,
    SortType,
    SortLang,
    Category,
    Country,
    Year,
}

impl Param {
    fn wire_name(self) -> &'static str {
        match self {
            Param::Keyword => "keyword",
            Param::Page => "page",
            Param::Limit => "limit",
            Param::SortField => "sort_field",
            Param::SortType => "sort_type",
            Param::SortLang => "sort_lang",
            Param::Category => "category",
            Param::Country => "country",
            Param::Year => "year",
        }
    }

    /// `None` for empty values so that upstream defaults apply.
    fn encode(self, filters: &FilterSet) -> Option<String> {
        let value = match self {
            Param::Page => return Some(filters.page.to_string()),
            Param::Limit => return Some(filters.limit.to_string()),
            Param::SortField => return Some(filters.sort_field.wire_name().to_string()),
            Param::SortType => return Some(filters.sort_type.wire_name().to_string()),
            Param::Keyword => &filters.keyword,
            Param::SortLang => &filters.sort_lang,
            Param::Category => &filters.category,
            Param::Country => &filters.country,
            Param::Year => &filters.year,
        };
        if value.is_empty() {
            None
        } else {
            Some(value.clone())
        }
    }
}

const LATEST_PARAMS: &[Param] = &[Param::Page];
const PREDEFINED_PARAMS: &[Param] = &[Param::Page, Param::Limit];
const SEARCH_PARAMS: &[Param] = &[
    Param::Keyword,
    Param::Page,
    Param::Limit,
    Param::SortField,
    Param::SortType,
    Param::SortLang,
    Param::Category,
    Param::Country,
    Param::Year,
];
const CATEGORY_PARAMS: &[Param] = &[
    Param::Page,
    Param::Limit,
    Param::SortField,
    Param::SortType,
    Param::SortLang,
    Param::Country,
    Param::Year,
];
const COUNTRY_PARAMS: &[Param] = &[
    Param::Page,
    Param::Limit,
    Param::SortField,
    Param::SortType,
    Param::SortLang,
    Param::Category,
    Param::Year,
];
const YEAR_PARAMS: &[Param] = &[
    Param::Page,
    Param::Limit,
    Param::SortField,
    Param::SortType,
    Param::SortLang,
    Param::Category,
    Param::Country,
];

/// Search criteria in precedence order; the first non-empty one picks the
/// endpoint.
const SEARCH_PRECEDENCE: [FilterField; 4] = [
    FilterField::Keyword,
    FilterField::Category,
    FilterField::Country,
    FilterField::Year,
];

fn search_endpoint(field: FilterField, value: &str) -> EndpointKind {
    match field {
        FilterField::Keyword => EndpointKind::Search,
        FilterField::Category => EndpointKind::Category(value.to_string()),
        FilterField::Country => EndpointKind::Country(value.to_string()),
        FilterField::Year => EndpointKind::Year(value.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub endpoint: EndpointKind,
    pub params: Vec<(&'static str, String)>,
}

impl ResolvedQuery {
    pub fn new(endpoint: EndpointKind, filters: &FilterSet) -> Self {
        let params = endpoint
            .carried_params()
            .iter()
            .filter_map(|param| Some((param.wire_name(), param.encode(filters)?)))
            .collect();
        Self { endpoint, params }
    }

    pub fn latest_updates(page: u32) -> Self {
        let filters = FilterSet {
            page: page.max(1),
            ..FilterSet::default()
        };
        Self::new(EndpointKind::LatestUpdates, &filters)
    }

    pub fn predefined(list: PredefinedList, page: u32, limit: u32) -> Self {
        let filters = FilterSet {
            page: page.max(1),
            ..FilterSet::with_limit(limit)
        };
        Self::new(EndpointKind::Predefined(list), &filters)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Fetch(ResolvedQuery),
    /// Search with no criteria never reaches upstream.
    Unsearched,
}

pub fn resolve(context: &ListQueryContext) -> Resolution {
    let endpoint = if let Some(list) = context.predefined_list() {
        EndpointKind::Predefined(list)
    } else if context.from_search {
        let chosen = SEARCH_PRECEDENCE.into_iter().find_map(|field| {
            let value = context.filters.value(field);
            (!value.is_empty()).then(|| search_endpoint(field, value))
        });
        match chosen {
            Some(endpoint) => endpoint,
            None => return Resolution::Unsearched,
        }
    } else if context.is_country_route {
        EndpointKind::Country(context.route_slug.clone())
    } else {
        EndpointKind::Category(context.route_slug.clone())
    };

    Resolution::Fetch(ResolvedQuery::new(endpoint, &context.filters))
}

/// Year choices offered by the filter panels, newest first.
pub fn year_options(current_year: i32) -> Vec<String> {
    (FIRST_YEAR..=current_year.max(FIRST_YEAR))
        .rev()
        .map(|year| year.to_string())
        .collect()
}
