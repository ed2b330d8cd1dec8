use crate::query::{
    resolve, FilterField, FilterSet, ListQueryContext, Resolution, SortField, SortLang, SortType,
    ViewScope,
};
use crate::reference::ReferenceData;

/// A filter currently narrowing the results, labelled for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub field: FilterField,
    pub label: String,
}

/// Owns one page's filter set and the "searched" flag.
///
/// Every operation that should hit upstream returns the [`Resolution`] built
/// from a fresh snapshot of the filters; the caller issues it.
#[derive(Debug, Clone)]
pub struct FilterManager {
    scope: ViewScope,
    defaults: FilterSet,
    filters: FilterSet,
    searched: bool,
}

impl FilterManager {
    pub fn new(scope: ViewScope, limit: u32) -> Self {
        let defaults = FilterSet::with_limit(limit);
        Self {
            scope,
            filters: defaults.clone(),
            defaults,
            searched: false,
        }
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn searched(&self) -> bool {
        self.searched
    }

    pub fn set(&mut self, field: FilterField, value: String) {
        self.filters.set(field, value);
    }

    pub fn set_sort_field(&mut self, sort_field: SortField) {
        self.filters.sort_field = sort_field;
    }

    pub fn set_sort_type(&mut self, sort_type: SortType) {
        self.filters.sort_type = sort_type;
    }

    pub fn set_sort_lang(&mut self, sort_lang: SortLang) {
        self.filters.sort_lang = sort_lang.wire_name().to_string();
    }

    pub fn context(&self) -> ListQueryContext {
        ListQueryContext::new(&self.scope, self.filters.clone())
    }

    pub fn apply(&mut self) -> Resolution {
        self.filters.page = 1;
        let resolution = resolve(&self.context());
        self.searched = matches!(resolution, Resolution::Fetch(_));
        resolution
    }

    pub fn reset(&mut self) {
        self.filters = self.defaults.clone();
        self.searched = false;
    }

    pub fn remove_filter(&mut self, field: FilterField) -> Resolution {
        self.filters.clear(field);
        self.apply()
    }

    /// Moves to page `page` keeping every other filter. No upper bound is
    /// enforced; pages below 1 become 1.
    pub fn go_to_page(&mut self, page: u32) -> Resolution {
        self.filters.page = page.max(1);
        let resolution = resolve(&self.context());
        self.searched = matches!(resolution, Resolution::Fetch(_));
        resolution
    }

    pub fn has_active_filters(&self) -> bool {
        FilterField::ALL
            .iter()
            .any(|field| !self.filters.value(*field).is_empty())
    }

    pub fn active_filters(&self, reference: &ReferenceData) -> Vec<ActiveFilter> {
        FilterField::ALL
            .into_iter()
            .filter_map(|field| {
                let value = self.filters.value(field);
                if value.is_empty() {
                    return None;
                }
                let label = match field {
                    FilterField::Keyword => format!("\"{}\"", value),
                    FilterField::Category => reference.category_name(value),
                    FilterField::Country => reference.country_name(value),
                    FilterField::Year => value.to_string(),
                };
                Some(ActiveFilter { field, label })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{EndpointKind, ListingRoute, DEFAULT_LIMIT};
    use crate::reference::{RefEntry, RefList};
    use proptest::prelude::*;

    fn search_manager() -> FilterManager {
        FilterManager::new(ViewScope::Search, DEFAULT_LIMIT)
    }

    fn fetched(resolution: Resolution) -> crate::query::ResolvedQuery {
        match resolution {
            Resolution::Fetch(query) => query,
            Resolution::Unsearched => panic!("expected a query"),
        }
    }

    #[test]
    fn apply_without_criteria_stays_unsearched() {
        let mut manager = search_manager();
        manager.set_sort_field(SortField::Year);
        assert_eq!(manager.apply(), Resolution::Unsearched);
        assert!(!manager.searched());
    }

    #[test]
    fn apply_resets_page_and_marks_searched() {
        let mut manager = search_manager();
        manager.set(FilterField::Keyword, String::from("one piece"));
        manager.go_to_page(7);

        let query = fetched(manager.apply());
        assert_eq!(query.param("page"), Some("1"));
        assert_eq!(manager.filters().page, 1);
        assert!(manager.searched());
    }

    #[test]
    fn go_to_page_keeps_every_other_filter() {
        let mut manager = search_manager();
        manager.set(FilterField::Keyword, String::from("kiem hiep"));
        manager.set(FilterField::Category, String::from("vo-thuat"));
        manager.set(FilterField::Country, String::from("trung-quoc"));
        manager.set(FilterField::Year, String::from("2019"));
        manager.apply();
        let before = manager.filters().clone();

        let query = fetched(manager.go_to_page(3));

        assert_eq!(
            manager.filters(),
            &FilterSet {
                page: 3,
                ..before
            }
        );
        assert_eq!(query.param("page"), Some("3"));
        assert_eq!(query.param("keyword"), Some("kiem hiep"));
    }

    #[test]
    fn go_to_page_does_not_clamp_to_known_total() {
        let mut manager = search_manager();
        manager.set(FilterField::Year, String::from("2021"));
        let query = fetched(manager.go_to_page(9_999));
        assert_eq!(query.param("page"), Some("9999"));
        assert_eq!(manager.go_to_page(0), manager.go_to_page(1));
    }

    #[test]
    fn paging_after_clearing_every_criterion_is_unsearched() {
        let mut manager = search_manager();
        manager.set(FilterField::Keyword, String::from("abc"));
        assert!(matches!(manager.apply(), Resolution::Fetch(_)));

        manager.set(FilterField::Keyword, String::new());
        assert_eq!(manager.go_to_page(2), Resolution::Unsearched);
        assert!(!manager.searched());
    }

    #[test]
    fn removing_last_filter_returns_to_unsearched() {
        let mut manager = search_manager();
        manager.set(FilterField::Category, String::from("hanh-dong"));
        manager.apply();

        assert_eq!(manager.remove_filter(FilterField::Category), Resolution::Unsearched);
        assert!(!manager.has_active_filters());
        assert!(!manager.searched());
    }

    #[test]
    fn removing_category_falls_through_to_country() {
        let mut manager = search_manager();
        manager.set(FilterField::Category, String::from("hanh-dong"));
        manager.set(FilterField::Country, String::from("my"));

        let query = fetched(manager.remove_filter(FilterField::Category));
        assert_eq!(query.endpoint, EndpointKind::Country(String::from("my")));
        assert!(manager.has_active_filters());
    }

    #[test]
    fn listing_reset_restores_route_defaults() {
        let route = ListingRoute::category("hai-huoc");
        let mut manager = FilterManager::new(ViewScope::Listing(route), 24);
        manager.set(FilterField::Country, String::from("han-quoc"));
        manager.set_sort_type(SortType::Asc);
        manager.set_sort_lang(SortLang::Vietsub);
        manager.reset();

        let query = fetched(manager.apply());
        assert_eq!(query.endpoint, EndpointKind::Category(String::from("hai-huoc")));
        assert_eq!(query.param("country"), None);
        assert_eq!(query.param("sort_type"), Some("desc"));
        assert_eq!(query.param("sort_lang"), None);
        assert_eq!(query.param("limit"), Some("24"));
    }

    #[test]
    fn active_filters_use_reference_names() {
        let reference = ReferenceData {
            categories: RefList::from(vec![RefEntry {
                id: String::from("1"),
                name: String::from("Hành Động"),
                slug: String::from("hanh-dong"),
            }]),
            countries: RefList::from(Vec::new()),
        };
        let mut manager = search_manager();
        manager.set(FilterField::Keyword, String::from("rong"));
        manager.set(FilterField::Category, String::from("hanh-dong"));
        manager.set(FilterField::Country, String::from("thai-lan"));

        let labels: Vec<_> = manager
            .active_filters(&reference)
            .into_iter()
            .map(|filter| filter.label)
            .collect();
        assert_eq!(labels, vec!["\"rong\"", "Hành Động", "thai-lan"]);
    }

    fn optional_value() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[a-z0-9]{1,8}"]
    }

    proptest! {
        #[test]
        fn reset_is_idempotent(
            keyword in optional_value(),
            category in optional_value(),
            year in optional_value(),
            page in 1u32..100,
        ) {
            let mut manager = search_manager();
            manager.set(FilterField::Keyword, keyword);
            manager.set(FilterField::Category, category);
            manager.set(FilterField::Year, year);
            manager.go_to_page(page);

            manager.reset();
            let once = (manager.filters().clone(), manager.searched());
            manager.reset();
            let twice = (manager.filters().clone(), manager.searched());

            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(once.0, FilterSet::default());
        }

        #[test]
        fn removing_category_leaves_active_iff_others_set(
            keyword in optional_value(),
            category in optional_value(),
            country in optional_value(),
            year in optional_value(),
        ) {
            let others_set = !keyword.is_empty() || !country.is_empty() || !year.is_empty();
            let mut manager = search_manager();
            manager.set(FilterField::Keyword, keyword);
            manager.set(FilterField::Category, category);
            manager.set(FilterField::Country, country);
            manager.set(FilterField::Year, year);

            manager.remove_filter(FilterField::Category);
            prop_assert_eq!(manager.has_active_filters(), others_set);
        }
    }
}
