use iced::widget::{column, text};
use iced::{Element, Length, Padding};

use crate::components::bold;
use crate::media::{ListTarget, Message, TEXT_WHITE};
use crate::query::{ListingKind, ListingRoute};
use crate::Phimdeck;

impl Phimdeck {
    /// Category or country listing. A category route refines by country and a
    /// country route by category; predefined lists get no panel.
    pub fn view_listing_page<'a>(&'a self, route: &'a ListingRoute) -> Element<'a, Message> {
        let page = &self.listing_page;
        let title = page.results.title().unwrap_or(route.slug.as_str());

        let mut content = column![text(title)
            .size(32)
            .color(TEXT_WHITE)
            .font(bold())
            .shaping(text::Shaping::Advanced)]
        .spacing(24)
        .padding(Padding::new(32.0).left(48.0).right(48.0))
        .width(Length::Fill);

        if route.shows_filter_panel() {
            let (with_category, with_country) = match route.kind {
                ListingKind::Category => (false, true),
                ListingKind::Country => (true, false),
            };
            content = content.push(self.view_filter_panel(
                ListTarget::Listing,
                page,
                with_category,
                with_country,
            ));
        }

        content
            .push(self.view_list_results(ListTarget::Listing, page, false))
            .into()
    }
}
