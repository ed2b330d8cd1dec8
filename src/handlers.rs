use std::sync::Arc;

use iced::widget::scrollable::AbsoluteOffset;
use iced::Task;
use tracing::{debug, info, warn};

use crate::catalog::{load_home_content, load_list, CatalogSource, HomeContent};
use crate::detail_handlers;
use crate::error::ApiError;
use crate::images::fetch_image_bytes;
use crate::media::{
    ListPage, ListTarget, LoadingState, Message, NavItem, Page, MAIN_SCROLL_ID,
};
use crate::normalize::{ListViewModel, MovieSummary};
use crate::query::{FilterField, Resolution, SortLang, SortType, ViewScope};
use crate::reference::{ReferenceCache, ReferenceUpdate};
use crate::view_model::RequestTicket;
use crate::Phimdeck;

pub fn handle_message(app: &mut Phimdeck, message: Message) -> Task<Message> {
    match message {
        Message::NavigateTo(page) => handle_navigate(app, page),
        Message::HomeLoaded(result) => handle_home_loaded(app, result),
        Message::RetryHome => load_home(app),
        Message::ReferenceLoaded(update) => handle_reference_loaded(app, update),
        Message::ListLoaded(target, ticket, result) => handle_list_loaded(app, target, ticket, result),
        Message::DetailLoaded(slug, result) => detail_handlers::handle_detail_loaded(app, slug, result),
        Message::SearchQueryChanged(query) => {
            app.header_state.search_query = query;
            Task::none()
        }
        Message::SearchSubmit => handle_search_submit(app),
        Message::SetFilter(target, field, value) => {
            list_page(app, target).filters.set(field, value);
            Task::none()
        }
        Message::SetSortField(target, sort_field) => {
            list_page(app, target).filters.set_sort_field(sort_field);
            Task::none()
        }
        Message::SetSortType(target, sort_type) => handle_set_sort_type(app, target, sort_type),
        Message::SetSortLang(target, sort_lang) => handle_set_sort_lang(app, target, sort_lang),
        Message::ApplyFilters(target) => handle_apply_filters(app, target),
        Message::ResetFilters(target) => handle_reset_filters(app, target),
        Message::RemoveFilter(field) => handle_remove_filter(app, field),
        Message::GoToPage(target, page) => handle_go_to_page(app, target, page),
        Message::LoadImage(url) => handle_load_image(app, url),
        Message::ImageLoaded(url, result) => handle_image_loaded(app, url, result),
        Message::SelectServer(index) => detail_handlers::handle_select_server(app, index),
        Message::SelectEpisode(index) => detail_handlers::handle_select_episode(app, index),
        Message::CopyEpisodeLink(link) => detail_handlers::handle_copy_episode_link(link),
    }
}

fn list_page(app: &mut Phimdeck, target: ListTarget) -> &mut ListPage {
    match target {
        ListTarget::Search => &mut app.search_page,
        ListTarget::Listing => &mut app.listing_page,
    }
}

fn scroll_to_top() -> Task<Message> {
    iced::widget::operation::scroll_to(
        iced::widget::Id::new(MAIN_SCROLL_ID),
        AbsoluteOffset { x: 0.0, y: 0.0 },
    )
}

pub fn handle_navigate(app: &mut Phimdeck, page: Page) -> Task<Message> {
    info!(route = %page.route(), "navigating");
    let was_searching = matches!(app.current_page, Page::Search(_));
    app.current_page = page.clone();
    app.header_state.active_nav = NavItem::for_page(&page);

    let page_task = match page {
        Page::Home => {
            if app.home.loading == LoadingState::Loading || !app.home.content.latest.is_empty() {
                Task::none()
            } else {
                load_home(app)
            }
        }
        Page::Search(keyword) => {
            // A new keyword on the open search page keeps the other filters.
            if !(was_searching && keyword.is_some()) {
                let page_size = app.settings.page_size;
                app.search_page.enter(ViewScope::Search, page_size);
            }
            match keyword {
                Some(keyword) => {
                    app.header_state.search_query = keyword.clone();
                    app.search_page.filters.set(FilterField::Keyword, keyword);
                    Task::batch([load_reference(app), handle_apply_filters(app, ListTarget::Search)])
                }
                None => load_reference(app),
            }
        }
        Page::Listing(route) => {
            let page_size = app.settings.page_size;
            let shows_panel = route.shows_filter_panel();
            app.listing_page.enter(ViewScope::Listing(route), page_size);
            let apply = handle_apply_filters(app, ListTarget::Listing);
            if shows_panel {
                Task::batch([load_reference(app), apply])
            } else {
                apply
            }
        }
        Page::Detail(slug) => detail_handlers::handle_open_detail(app, slug),
    };

    Task::batch([scroll_to_top(), page_task])
}

fn load_home(app: &mut Phimdeck) -> Task<Message> {
    app.home.loading = LoadingState::Loading;
    let catalog = Arc::clone(&app.catalog);
    Task::perform(
        load_home_content(catalog, app.settings.page_size),
        Message::HomeLoaded,
    )
}

fn handle_home_loaded(app: &mut Phimdeck, result: Result<HomeContent, ApiError>) -> Task<Message> {
    match result {
        Ok(content) => {
            app.home.loading = LoadingState::Idle;
            app.home.content = content;
            let mut posters: Vec<&MovieSummary> = app.home.content.latest.iter().collect();
            for rail in &app.home.content.rails {
                posters.extend(rail.items.iter());
            }
            let mut tasks = image_tasks(app, posters);
            if let Some(featured) = &app.home.content.featured {
                tasks.push(Task::done(Message::LoadImage(
                    app.image_cache.url_for(&featured.thumb_url),
                )));
            }
            Task::batch(tasks)
        }
        Err(error) => {
            warn!(%error, "home content unavailable");
            app.home.loading = LoadingState::Error(error.to_string());
            app.home.content = HomeContent::default();
            Task::none()
        }
    }
}

/// Fetches whichever reference lists are still missing. Filled lists come
/// straight from the process-wide cache.
pub fn load_reference(app: &Phimdeck) -> Task<Message> {
    if app.reference.is_complete() {
        return Task::none();
    }
    let cache: ReferenceCache = app.reference_cache.clone();
    let catalog: Arc<dyn CatalogSource> = Arc::clone(&app.catalog);
    Task::perform(
        async move { cache.load(catalog.as_ref()).await },
        Message::ReferenceLoaded,
    )
}

fn handle_reference_loaded(app: &mut Phimdeck, update: ReferenceUpdate) -> Task<Message> {
    app.reference.apply(update);
    debug!(
        categories = app.reference.categories.len(),
        countries = app.reference.countries.len(),
        "reference data updated"
    );
    Task::none()
}

fn handle_search_submit(app: &mut Phimdeck) -> Task<Message> {
    let keyword = app.header_state.search_query.trim().to_string();
    if keyword.is_empty() {
        return Task::none();
    }
    handle_navigate(app, Page::Search(Some(keyword)))
}

/// Issues `resolution` for `target`, or settles the page into its
/// unsearched state when there is nothing to ask upstream.
fn issue(app: &mut Phimdeck, target: ListTarget, resolution: Resolution) -> Task<Message> {
    let catalog = Arc::clone(&app.catalog);
    let page = list_page(app, target);
    match resolution {
        Resolution::Fetch(query) => {
            let ticket = page.results.begin();
            debug!(?target, endpoint = %query.endpoint.path(), "list request issued");
            Task::perform(load_list(catalog, query), move |result| {
                Message::ListLoaded(target, ticket, result)
            })
        }
        Resolution::Unsearched => {
            page.results.clear();
            Task::none()
        }
    }
}

fn handle_apply_filters(app: &mut Phimdeck, target: ListTarget) -> Task<Message> {
    let resolution = list_page(app, target).filters.apply();
    issue(app, target, resolution)
}

fn handle_set_sort_type(app: &mut Phimdeck, target: ListTarget, sort_type: SortType) -> Task<Message> {
    list_page(app, target).filters.set_sort_type(sort_type);
    Task::none()
}

fn handle_set_sort_lang(app: &mut Phimdeck, target: ListTarget, sort_lang: SortLang) -> Task<Message> {
    list_page(app, target).filters.set_sort_lang(sort_lang);
    Task::none()
}

fn handle_reset_filters(app: &mut Phimdeck, target: ListTarget) -> Task<Message> {
    let page = list_page(app, target);
    page.filters.reset();
    page.results.clear();
    match target {
        ListTarget::Search => {
            app.header_state.search_query.clear();
            Task::none()
        }
        // A listing always has its route to fall back on, so reset reloads it.
        ListTarget::Listing => handle_apply_filters(app, target),
    }
}

fn handle_remove_filter(app: &mut Phimdeck, field: FilterField) -> Task<Message> {
    if field == FilterField::Keyword {
        app.header_state.search_query.clear();
    }
    let resolution = app.search_page.filters.remove_filter(field);
    issue(app, ListTarget::Search, resolution)
}

fn handle_go_to_page(app: &mut Phimdeck, target: ListTarget, page: u32) -> Task<Message> {
    let resolution = list_page(app, target).filters.go_to_page(page);
    Task::batch([issue(app, target, resolution), scroll_to_top()])
}

fn handle_list_loaded(
    app: &mut Phimdeck,
    target: ListTarget,
    ticket: RequestTicket,
    result: Result<ListViewModel, ApiError>,
) -> Task<Message> {
    let page = list_page(app, target);
    if !page.results.complete(ticket, result) {
        return Task::none();
    }
    let posters: Vec<MovieSummary> = page.results.items().to_vec();
    Task::batch(image_tasks(app, posters.iter()))
}

fn image_tasks<'a>(
    app: &Phimdeck,
    items: impl IntoIterator<Item = &'a MovieSummary>,
) -> Vec<Task<Message>> {
    items
        .into_iter()
        .map(|item| app.image_cache.url_for(&item.poster_url))
        .filter(|url| app.image_cache.get(url).is_none())
        .map(|url| Task::done(Message::LoadImage(url)))
        .collect()
}

fn handle_load_image(app: &mut Phimdeck, url: String) -> Task<Message> {
    if !app.image_cache.begin_load(&url) {
        return Task::none();
    }
    let image_url = url.clone();
    let cache_path = app.image_cache.cache_path(&url);

    Task::perform(
        async move {
            if let Some(ref path) = cache_path {
                if let Ok(bytes) = tokio::fs::read(path).await {
                    return (image_url, Ok(bytes));
                }
            }
            let result = fetch_image_bytes(image_url.clone()).await;
            if let (Ok(bytes), Some(path)) = (&result, &cache_path) {
                if let Err(error) = tokio::fs::write(path, bytes).await {
                    debug!(%error, "could not write image cache entry");
                }
            }
            (image_url, result)
        },
        |(url, result)| {
            Message::ImageLoaded(url, result.map(iced::widget::image::Handle::from_bytes))
        },
    )
}

fn handle_image_loaded(
    app: &mut Phimdeck,
    url: String,
    result: Result<iced::widget::image::Handle, ApiError>,
) -> Task<Message> {
    match result {
        Ok(handle) => app.image_cache.insert(url, handle),
        Err(error) => {
            debug!(%url, %error, "image failed to load");
            app.image_cache.fail(&url);
        }
    }
    Task::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::FakeCatalog;
    use crate::query::{ListingRoute, PredefinedList, SortField};
    use crate::settings::AppSettings;
    use crate::view_model::EmptyState;

    fn app() -> Phimdeck {
        Phimdeck::with_catalog(
            AppSettings::default(),
            Arc::new(FakeCatalog::default()),
            None,
        )
    }

    fn is_loading(app: &Phimdeck, target: ListTarget) -> bool {
        match target {
            ListTarget::Search => app.search_page.results.is_loading(),
            ListTarget::Listing => app.listing_page.results.is_loading(),
        }
    }

    #[test]
    fn navigating_to_predefined_listing_starts_loading() {
        let mut app = app();
        let _ = handle_navigate(&mut app, Page::Listing(ListingRoute::category("phim-le")));

        assert!(is_loading(&app, ListTarget::Listing));
        assert_eq!(
            app.header_state.active_nav,
            Some(NavItem::List(PredefinedList::SingleMovies))
        );
        assert_eq!(app.listing_page.results.title(), Some("Phim Lẻ"));
    }

    #[test]
    fn search_without_keyword_stays_unsearched() {
        let mut app = app();
        let _ = handle_navigate(&mut app, Page::Search(None));
        assert!(!is_loading(&app, ListTarget::Search));
        assert!(!app.search_page.filters.searched());

        let _ = handle_apply_filters(&mut app, ListTarget::Search);
        assert!(!is_loading(&app, ListTarget::Search));
    }

    #[test]
    fn header_search_navigates_with_keyword() {
        let mut app = app();
        app.header_state.search_query = String::from("  naruto ");
        let _ = handle_search_submit(&mut app);

        assert_eq!(app.current_page, Page::Search(Some(String::from("naruto"))));
        assert_eq!(app.search_page.filters.filters().keyword, "naruto");
        assert!(app.search_page.filters.searched());
        assert!(is_loading(&app, ListTarget::Search));
    }

    #[test]
    fn response_for_previous_route_is_dropped() {
        let mut app = app();
        let _ = handle_navigate(&mut app, Page::Listing(ListingRoute::category("phim-bo")));
        let stale = app.listing_page.results.begin();
        let _ = handle_navigate(&mut app, Page::Listing(ListingRoute::country("han-quoc")));

        let _ = handle_list_loaded(
            &mut app,
            ListTarget::Listing,
            stale,
            Ok(ListViewModel {
                title: Some(String::from("Phim Bộ")),
                ..ListViewModel::default()
            }),
        );
        assert_eq!(app.listing_page.results.title(), Some("han-quoc"));
        assert!(app.listing_page.results.is_loading());
    }

    #[test]
    fn listing_reset_reissues_the_route_query() {
        let mut app = app();
        let _ = handle_navigate(&mut app, Page::Listing(ListingRoute::category("hai-huoc")));
        app.listing_page
            .filters
            .set(FilterField::Country, String::from("au-my"));
        let _ = handle_reset_filters(&mut app, ListTarget::Listing);

        assert!(is_loading(&app, ListTarget::Listing));
        assert!(app.listing_page.filters.filters().country.is_empty());
    }

    #[test]
    fn search_reset_clears_results_and_searched() {
        let mut app = app();
        let _ = handle_navigate(&mut app, Page::Search(Some(String::from("abc"))));
        let _ = handle_reset_filters(&mut app, ListTarget::Search);

        assert!(!app.search_page.filters.searched());
        assert!(!app.search_page.filters.has_active_filters());
        assert!(app.search_page.results.items().is_empty());
        assert!(app.header_state.search_query.is_empty());
    }

    #[test]
    fn sort_setters_do_not_issue_requests() {
        let mut app = app();
        let _ = handle_navigate(&mut app, Page::Search(None));
        let _ = handle_message(&mut app, Message::SetSortField(ListTarget::Search, SortField::Year));
        let _ = handle_set_sort_type(&mut app, ListTarget::Search, SortType::Asc);

        let filters = app.search_page.filters.filters();
        assert_eq!(filters.sort_field, SortField::Year);
        assert_eq!(filters.sort_type, SortType::Asc);
        assert!(!is_loading(&app, ListTarget::Search));
    }

    #[test]
    fn header_search_on_open_search_page_keeps_other_filters() {
        let mut app = app();
        let _ = handle_navigate(&mut app, Page::Search(None));
        let _ = handle_message(
            &mut app,
            Message::SetFilter(ListTarget::Search, FilterField::Category, String::from("hanh-dong")),
        );
        let _ = handle_message(
            &mut app,
            Message::SetFilter(ListTarget::Search, FilterField::Year, String::from("2020")),
        );

        app.header_state.search_query = String::from("naruto");
        let _ = handle_search_submit(&mut app);

        let filters = app.search_page.filters.filters();
        assert_eq!(filters.keyword, "naruto");
        assert_eq!(filters.category, "hanh-dong");
        assert_eq!(filters.year, "2020");
        assert!(is_loading(&app, ListTarget::Search));
    }

    #[test]
    fn paging_with_cleared_keyword_shows_not_searched() {
        let mut app = app();
        let _ = handle_navigate(&mut app, Page::Search(Some(String::from("abc"))));
        let _ = handle_message(
            &mut app,
            Message::SetFilter(ListTarget::Search, FilterField::Keyword, String::new()),
        );
        let _ = handle_go_to_page(&mut app, ListTarget::Search, 2);

        let page = &app.search_page;
        assert!(!page.filters.searched());
        assert_eq!(
            page.results.empty_state(page.filters.searched()),
            Some(EmptyState::NotSearched)
        );
    }
}
