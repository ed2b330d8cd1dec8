use iced::widget::image::Handle;
use iced::Color;
use tracing::debug;

use crate::catalog::{HomeContent, MovieDetailResponse};
use crate::error::ApiError;
use crate::filters::FilterManager;
use crate::normalize::ListViewModel;
use crate::query::{
    FilterField, ListingKind, ListingRoute, PredefinedList, SortField, SortLang, SortType,
    ViewScope,
};
use crate::reference::ReferenceUpdate;
use crate::view_model::{ListView, RequestTicket};

pub const BACKGROUND_BLACK: Color = Color::from_rgb(0.0, 0.0, 0.0);
pub const SURFACE_DARK_GRAY: Color = Color::from_rgb(0.078, 0.078, 0.078);
pub const SURFACE_RAISED_GRAY: Color = Color::from_rgb(0.157, 0.157, 0.157);
pub const ACCENT_AMBER: Color = Color::from_rgb(0.961, 0.620, 0.043);
pub const TEXT_WHITE: Color = Color::from_rgb(1.0, 1.0, 1.0);
pub const TEXT_GRAY: Color = Color::from_rgb(0.702, 0.702, 0.702);

pub const MAIN_SCROLL_ID: &str = "main-content";

/// Screen currently shown; each variant maps to one catalog route.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Home,
    /// Optional keyword pre-filled from a deep link or the header search bar.
    Search(Option<String>),
    Listing(ListingRoute),
    Detail(String),
}

impl Page {
    /// Parses an in-app route such as `/the-loai/hanh-dong` or
    /// `/tim-kiem?keyword=abc`. Unknown routes land on the home page.
    pub fn from_route(route: &str) -> Self {
        let trimmed = route.trim();
        let with_slash = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        let Ok(url) = reqwest::Url::parse(&format!("app://phimdeck{}", with_slash)) else {
            debug!(route, "unparseable route, falling back to home");
            return Page::Home;
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Page::Home,
            ["phim", slug] => Page::Detail(slug.to_string()),
            ["tim-kiem"] => {
                let keyword = url
                    .query_pairs()
                    .find(|(key, _)| key == "keyword")
                    .map(|(_, value)| value.trim().to_string())
                    .filter(|value| !value.is_empty());
                Page::Search(keyword)
            }
            ["danh-sach", slug] | ["the-loai", slug] => {
                Page::Listing(ListingRoute::category(*slug))
            }
            ["quoc-gia", slug] => Page::Listing(ListingRoute::country(*slug)),
            _ => Page::Home,
        }
    }

    pub fn route(&self) -> String {
        match self {
            Page::Home => String::from("/"),
            Page::Search(None) => String::from("/tim-kiem"),
            Page::Search(Some(keyword)) => search_route(keyword),
            Page::Listing(route) => match (route.kind, route.predefined()) {
                (ListingKind::Category, Some(list)) => format!("/danh-sach/{}", list.slug()),
                (ListingKind::Category, None) => format!("/the-loai/{}", route.slug),
                (ListingKind::Country, _) => format!("/quoc-gia/{}", route.slug),
            },
            Page::Detail(slug) => format!("/phim/{}", slug),
        }
    }
}

/// `/tim-kiem` with the keyword form-encoded, as `from_route` decodes it.
fn search_route(keyword: &str) -> String {
    match reqwest::Url::parse("app://phimdeck/tim-kiem") {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("keyword", keyword);
            match url.query() {
                Some(query) => format!("{}?{}", url.path(), query),
                None => url.path().to_string(),
            }
        }
        Err(_) => String::from("/tim-kiem"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Home,
    List(PredefinedList),
    Search,
}

impl NavItem {
    pub fn for_page(page: &Page) -> Option<Self> {
        match page {
            Page::Home => Some(NavItem::Home),
            Page::Search(_) => Some(NavItem::Search),
            Page::Listing(route) => route.predefined().map(NavItem::List),
            Page::Detail(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadingState {
    Idle,
    Loading,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct HeaderState {
    pub active_nav: Option<NavItem>,
    pub search_query: String,
}

impl Default for HeaderState {
    fn default() -> Self {
        Self {
            active_nav: Some(NavItem::Home),
            search_query: String::new(),
        }
    }
}

/// Which list page a filter or result message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    Search,
    Listing,
}

#[derive(Debug, Clone)]
pub struct HomeState {
    pub loading: LoadingState,
    pub content: HomeContent,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            loading: LoadingState::Idle,
            content: HomeContent::default(),
        }
    }
}

/// Filter state plus results for one list page.
#[derive(Debug, Clone)]
pub struct ListPage {
    pub filters: FilterManager,
    pub results: ListView,
}

impl ListPage {
    pub fn new(scope: ViewScope, limit: u32) -> Self {
        let results = match &scope {
            ViewScope::Search => ListView::default(),
            ViewScope::Listing(route) => ListView::with_title(route.local_title()),
        };
        Self {
            filters: FilterManager::new(scope, limit),
            results,
        }
    }

    /// Swaps in a fresh filter set for `scope`. Results are cleared rather
    /// than replaced so tickets from the previous scope stay stale.
    pub fn enter(&mut self, scope: ViewScope, limit: u32) {
        if let ViewScope::Listing(route) = &scope {
            self.results.retitle(route.local_title());
        }
        self.results.clear();
        self.filters = FilterManager::new(scope, limit);
    }
}

#[derive(Debug, Clone, Default)]
pub enum DetailState {
    #[default]
    Loading,
    Ready(Box<MovieDetailResponse>),
    Missing,
}

#[derive(Debug, Clone, Default)]
pub struct DetailPage {
    pub slug: String,
    pub state: DetailState,
    pub selected_server: usize,
    /// Index into the selected server's episode list.
    pub selected_episode: Option<usize>,
}

impl DetailPage {
    pub fn loading(slug: String) -> Self {
        Self {
            slug,
            ..Self::default()
        }
    }

    pub fn detail(&self) -> Option<&MovieDetailResponse> {
        match &self.state {
            DetailState::Ready(detail) => Some(detail),
            DetailState::Loading | DetailState::Missing => None,
        }
    }

    pub fn selected_link(&self) -> Option<&str> {
        let detail = self.detail()?;
        let server = detail.episodes.get(self.selected_server)?;
        server
            .server_data
            .get(self.selected_episode?)?
            .playable_url()
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    NavigateTo(Page),
    HomeLoaded(Result<HomeContent, ApiError>),
    RetryHome,
    ReferenceLoaded(ReferenceUpdate),
    ListLoaded(ListTarget, RequestTicket, Result<ListViewModel, ApiError>),
    DetailLoaded(String, Result<MovieDetailResponse, ApiError>),
    SearchQueryChanged(String),
    SearchSubmit,
    SetFilter(ListTarget, FilterField, String),
    SetSortField(ListTarget, SortField),
    SetSortType(ListTarget, SortType),
    SetSortLang(ListTarget, SortLang),
    ApplyFilters(ListTarget),
    ResetFilters(ListTarget),
    RemoveFilter(FilterField),
    GoToPage(ListTarget, u32),
    LoadImage(String),
    ImageLoaded(String, Result<Handle, ApiError>),
    SelectServer(usize),
    SelectEpisode(usize),
    CopyEpisodeLink(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_parse_to_pages() {
        assert_eq!(Page::from_route("/"), Page::Home);
        assert_eq!(
            Page::from_route("/phim/tay-du-ky"),
            Page::Detail(String::from("tay-du-ky"))
        );
        assert_eq!(
            Page::from_route("/danh-sach/phim-bo"),
            Page::Listing(ListingRoute::category("phim-bo"))
        );
        assert_eq!(
            Page::from_route("the-loai/hanh-dong"),
            Page::Listing(ListingRoute::category("hanh-dong"))
        );
        assert_eq!(
            Page::from_route("/quoc-gia/han-quoc"),
            Page::Listing(ListingRoute::country("han-quoc"))
        );
        assert_eq!(Page::from_route("/dang-nhap"), Page::Home);
        assert_eq!(Page::from_route("/phim"), Page::Home);
    }

    #[test]
    fn search_deep_link_decodes_keyword() {
        assert_eq!(
            Page::from_route("/tim-kiem?keyword=t%C3%A2y%20du+k%E1%BB%B3"),
            Page::Search(Some(String::from("tây du kỳ")))
        );
        assert_eq!(Page::from_route("/tim-kiem?keyword="), Page::Search(None));
    }

    #[test]
    fn search_route_encodes_keyword() {
        let page = Page::Search(Some(String::from("tom & jerry")));
        let route = page.route();
        assert_eq!(route, "/tim-kiem?keyword=tom+%26+jerry");
        assert_eq!(Page::from_route(&route), page);
    }

    #[test]
    fn predefined_listings_route_through_danh_sach() {
        let page = Page::Listing(ListingRoute::category("hoat-hinh"));
        assert_eq!(page.route(), "/danh-sach/hoat-hinh");
        assert_eq!(NavItem::for_page(&page), Some(NavItem::List(PredefinedList::Animation)));
        assert_eq!(
            Page::Listing(ListingRoute::category("hai-huoc")).route(),
            "/the-loai/hai-huoc"
        );
    }

    #[test]
    fn selected_link_follows_server_and_episode() {
        use crate::catalog::{EpisodeLink, EpisodeServer};

        let episode = |embed: &str| EpisodeLink {
            link_embed: embed.to_string(),
            ..EpisodeLink::default()
        };
        let mut page = DetailPage::loading(String::from("phim"));
        page.state = DetailState::Ready(Box::new(MovieDetailResponse {
            movie: Default::default(),
            episodes: vec![
                EpisodeServer {
                    server_name: String::from("Vietsub"),
                    server_data: vec![episode("https://a/1"), episode("https://a/2")],
                },
                EpisodeServer {
                    server_name: String::from("Thuyết Minh"),
                    server_data: vec![episode("https://b/1")],
                },
            ],
        }));

        assert_eq!(page.selected_link(), None);
        page.selected_episode = Some(1);
        assert_eq!(page.selected_link(), Some("https://a/2"));
        page.selected_server = 1;
        assert_eq!(page.selected_link(), None);
    }
}
