use std::fmt;

use chrono::Datelike;
use iced::widget::{button, column, container, pick_list, row, text, text_input, Row, Space};
use iced::{Element, Length, Padding};

use crate::components::{
    accent_button_style, bold, dropdown_style, icon, input_style, pill_button_style, ICON_SEARCH,
    ICON_X,
};
use crate::media::{ListPage, ListTarget, Message, TEXT_GRAY, TEXT_WHITE};
use crate::query::{year_options, FilterField, SortField, SortLang, SortType};
use crate::reference::RefEntry;
use crate::view_model::RequestState;
use crate::Phimdeck;

const ALL_LABEL: &str = "Tất cả";

/// One entry of a filter dropdown; the empty slug means "no filter".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChoice {
    pub slug: String,
    pub label: String,
}

impl FilterChoice {
    fn all() -> Self {
        Self {
            slug: String::new(),
            label: String::from(ALL_LABEL),
        }
    }
}

impl fmt::Display for FilterChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Dropdown choices for a reference list, led by the "all" entry.
pub fn reference_choices(entries: &[RefEntry]) -> Vec<FilterChoice> {
    std::iter::once(FilterChoice::all())
        .chain(entries.iter().map(|entry| FilterChoice {
            slug: entry.slug.clone(),
            label: entry.name.clone(),
        }))
        .collect()
}

pub fn year_choices(current_year: i32) -> Vec<FilterChoice> {
    std::iter::once(FilterChoice::all())
        .chain(year_options(current_year).into_iter().map(|year| FilterChoice {
            slug: year.clone(),
            label: year,
        }))
        .collect()
}

/// The choice matching `slug`. A slug missing from the list is still shown,
/// labelled by itself.
pub fn selected_choice(choices: &[FilterChoice], slug: &str) -> FilterChoice {
    choices
        .iter()
        .find(|choice| choice.slug == slug)
        .cloned()
        .unwrap_or_else(|| FilterChoice {
            slug: slug.to_string(),
            label: slug.to_string(),
        })
}

fn field_label(label: &'static str) -> Element<'static, Message> {
    text(label)
        .size(12)
        .color(TEXT_GRAY)
        .shaping(text::Shaping::Advanced)
        .into()
}

impl Phimdeck {
    pub fn view_search_page(&self) -> Element<'_, Message> {
        let page = &self.search_page;
        let heading = text("Tìm Kiếm Phim")
            .size(32)
            .color(TEXT_WHITE)
            .font(bold())
            .shaping(text::Shaping::Advanced);

        column![
            heading,
            self.view_keyword_input(page),
            self.view_filter_panel(ListTarget::Search, page, true, true),
            self.view_active_filter_tags(page),
            self.view_search_meta(page),
            self.view_list_results(ListTarget::Search, page, true)
        ]
        .spacing(24)
        .padding(Padding::new(32.0).left(48.0).right(48.0))
        .width(Length::Fill)
        .into()
    }

    fn view_keyword_input<'a>(&'a self, page: &'a ListPage) -> Element<'a, Message> {
        let input = text_input("Nhập tên phim...", &page.filters.filters().keyword)
            .on_input(|value| Message::SetFilter(ListTarget::Search, FilterField::Keyword, value))
            .on_submit(Message::ApplyFilters(ListTarget::Search))
            .padding(12)
            .size(16)
            .width(Length::Fill)
            .style(input_style);

        let submit = button(icon(ICON_SEARCH).size(16))
            .padding(Padding::new(12.0).left(20.0).right(20.0))
            .style(accent_button_style)
            .on_press(Message::ApplyFilters(ListTarget::Search));

        row![input, submit]
            .spacing(8)
            .align_y(iced::Alignment::Center)
            .into()
    }

    /// Category/country/year/sort refinement controls for a list page.
    pub fn view_filter_panel<'a>(
        &'a self,
        target: ListTarget,
        page: &'a ListPage,
        with_category: bool,
        with_country: bool,
    ) -> Element<'a, Message> {
        let filters = page.filters.filters();
        let mut controls: Vec<Element<Message>> = Vec::new();

        if with_category {
            let choices = reference_choices(&self.reference.categories);
            let selected = selected_choice(&choices, &filters.category);
            controls.push(self.view_choice_dropdown(
                "Thể loại",
                choices,
                selected,
                target,
                FilterField::Category,
            ));
        }
        if with_country {
            let choices = reference_choices(&self.reference.countries);
            let selected = selected_choice(&choices, &filters.country);
            controls.push(self.view_choice_dropdown(
                "Quốc gia",
                choices,
                selected,
                target,
                FilterField::Country,
            ));
        }

        let years = year_choices(chrono::Utc::now().year());
        let selected_year = selected_choice(&years, &filters.year);
        controls.push(self.view_choice_dropdown(
            "Năm",
            years,
            selected_year,
            target,
            FilterField::Year,
        ));

        controls.push(
            column![
                field_label("Sắp xếp"),
                pick_list(SortField::ALL, Some(filters.sort_field), move |field| {
                    Message::SetSortField(target, field)
                })
                .text_size(13)
                .padding(Padding::new(8.0).left(12.0).right(12.0))
                .style(dropdown_style)
            ]
            .spacing(6)
            .into(),
        );
        controls.push(
            column![
                field_label("Thứ tự"),
                pick_list(SortType::ALL, Some(filters.sort_type), move |sort_type| {
                    Message::SetSortType(target, sort_type)
                })
                .text_size(13)
                .padding(Padding::new(8.0).left(12.0).right(12.0))
                .style(dropdown_style)
            ]
            .spacing(6)
            .into(),
        );
        controls.push(
            column![
                field_label("Ngôn ngữ"),
                pick_list(
                    SortLang::ALL,
                    Some(SortLang::from_wire(&filters.sort_lang)),
                    move |lang| Message::SetSortLang(target, lang)
                )
                .text_size(13)
                .padding(Padding::new(8.0).left(12.0).right(12.0))
                .style(dropdown_style)
            ]
            .spacing(6)
            .into(),
        );

        let apply = button(text("Lọc").size(14).shaping(text::Shaping::Advanced))
            .padding(Padding::new(8.0).left(20.0).right(20.0))
            .style(accent_button_style)
            .on_press(Message::ApplyFilters(target));
        let reset = button(text("Đặt lại").size(14).shaping(text::Shaping::Advanced))
            .padding(Padding::new(8.0).left(20.0).right(20.0))
            .style(pill_button_style(false))
            .on_press(Message::ResetFilters(target));

        let actions = row![apply, reset]
            .spacing(8)
            .align_y(iced::Alignment::End);

        container(
            row![
                Row::with_children(controls)
                    .spacing(16)
                    .align_y(iced::Alignment::End)
                    .wrap(),
                Space::new().width(Length::Fill),
                actions
            ]
            .align_y(iced::Alignment::End),
        )
        .padding(Padding::new(16.0))
        .width(Length::Fill)
        .style(|_theme| iced::widget::container::Style {
            background: Some(iced::Background::Color(iced::Color::from_rgba(
                1.0, 1.0, 1.0, 0.04,
            ))),
            border: iced::Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        })
        .into()
    }

    fn view_choice_dropdown(
        &self,
        label: &'static str,
        choices: Vec<FilterChoice>,
        selected: FilterChoice,
        target: ListTarget,
        field: FilterField,
    ) -> Element<'_, Message> {
        column![
            field_label(label),
            pick_list(choices, Some(selected), move |choice: FilterChoice| {
                Message::SetFilter(target, field, choice.slug)
            })
            .text_size(13)
            .padding(Padding::new(8.0).left(12.0).right(12.0))
            .style(dropdown_style)
        ]
        .spacing(6)
        .into()
    }

    fn view_active_filter_tags<'a>(&'a self, page: &'a ListPage) -> Element<'a, Message> {
        if !page.filters.has_active_filters() {
            return Space::new().height(0).into();
        }

        let tags: Vec<Element<Message>> = page
            .filters
            .active_filters(&self.reference)
            .into_iter()
            .map(|filter| {
                button(
                    row![
                        text(filter.label)
                            .size(13)
                            .shaping(text::Shaping::Advanced),
                        icon(ICON_X).size(12)
                    ]
                    .spacing(6)
                    .align_y(iced::Alignment::Center),
                )
                .padding(Padding::new(6.0).left(12.0).right(10.0))
                .style(pill_button_style(true))
                .on_press(Message::RemoveFilter(filter.field))
                .into()
            })
            .collect();

        Row::with_children(tags).spacing(8).wrap().into()
    }

    fn view_search_meta<'a>(&'a self, page: &'a ListPage) -> Element<'a, Message> {
        if !page.filters.searched() || page.results.is_loading() {
            return Space::new().height(0).into();
        }
        let (current, total) = page
            .results
            .pagination()
            .map(|p| (p.current_page, p.total_pages.max(1)))
            .unwrap_or((1, 1));

        text(format!(
            "{} kết quả · trang {} / {}",
            page.results.total_items(),
            current,
            total
        ))
        .size(14)
        .color(TEXT_GRAY)
        .shaping(text::Shaping::Advanced)
        .into()
    }

    /// Result grid with its loading, empty and pagination states.
    pub fn view_list_results<'a>(
        &'a self,
        target: ListTarget,
        page: &'a ListPage,
        full_pagination: bool,
    ) -> Element<'a, Message> {
        if page.results.state() == RequestState::Loading {
            return column![self.view_skeleton_row(6), self.view_skeleton_row(6)]
                .spacing(24)
                .into();
        }
        if let Some(empty) = page.results.empty_state(page.filters.searched()) {
            return self.view_empty_state(empty);
        }

        column![
            self.view_movie_grid(page.results.items()),
            self.view_pagination(target, page.results.pagination(), full_pagination)
        ]
        .spacing(16)
        .width(Length::Fill)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(slug: &str, name: &str) -> RefEntry {
        RefEntry {
            id: String::new(),
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn reference_choices_lead_with_all() {
        let choices = reference_choices(&[entry("hanh-dong", "Hành Động")]);
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].slug, "");
        assert_eq!(choices[1].to_string(), "Hành Động");
    }

    #[test]
    fn unknown_slug_is_selected_under_its_own_label() {
        let choices = reference_choices(&[entry("hanh-dong", "Hành Động")]);
        assert_eq!(selected_choice(&choices, "").label, ALL_LABEL);
        assert_eq!(selected_choice(&choices, "hanh-dong").label, "Hành Động");
        assert_eq!(selected_choice(&choices, "vien-tuong").label, "vien-tuong");
    }

    #[test]
    fn year_choices_start_with_current_year() {
        let choices = year_choices(2024);
        assert_eq!(choices[1].slug, "2024");
        assert_eq!(choices.last().map(|c| c.slug.as_str()), Some("2000"));
    }
}
