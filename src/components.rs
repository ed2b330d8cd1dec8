use iced::widget::{
    button, column, container, pick_list, row, scrollable, text, text_input, Column, Row, Space,
};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::media::{
    ListTarget, LoadingState, Message, NavItem, Page, ACCENT_AMBER, MAIN_SCROLL_ID,
    SURFACE_DARK_GRAY, TEXT_GRAY, TEXT_WHITE,
};
use crate::normalize::Pagination;
use crate::query::{ListingRoute, PredefinedList};
use crate::view_model::EmptyState;
use crate::Phimdeck;

pub const ICON_SEARCH: char = '\u{F52A}';
pub const ICON_CHEVRON_LEFT: char = '\u{F284}';
pub const ICON_CHEVRON_RIGHT: char = '\u{F285}';
pub const ICON_CHEVRON_DOUBLE_LEFT: char = '\u{F27F}';
pub const ICON_CHEVRON_DOUBLE_RIGHT: char = '\u{F280}';
pub const ICON_X: char = '\u{F62A}';
pub const ICON_FILM: char = '\u{F3A9}';

const HEADER_HEIGHT: f32 = 72.0;

pub fn icon(icon_char: char) -> iced::widget::Text<'static> {
    text(icon_char.to_string()).font(iced::Font {
        family: iced::font::Family::Name("bootstrap-icons"),
        ..Default::default()
    })
}

pub fn bold() -> iced::Font {
    iced::Font {
        weight: iced::font::Weight::Bold,
        ..Default::default()
    }
}

pub fn hidden_scrollbar_style(
    _theme: &iced::Theme,
    _status: scrollable::Status,
) -> scrollable::Style {
    let hidden_rail = scrollable::Rail {
        background: None,
        border: Border::default(),
        scroller: scrollable::Scroller {
            background: iced::Background::Color(Color::TRANSPARENT),
            border: Border::default(),
        },
    };
    scrollable::Style {
        container: container::Style::default(),
        vertical_rail: hidden_rail,
        horizontal_rail: hidden_rail,
        gap: None,
        auto_scroll: scrollable::AutoScroll {
            background: iced::Background::Color(Color::TRANSPARENT),
            border: Border::default(),
            shadow: Shadow::default(),
            icon: Color::TRANSPARENT,
        },
    }
}

pub fn pill_button_style(
    active: bool,
) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |_theme, status| {
        let bg_alpha = if active {
            0.3
        } else if matches!(status, button::Status::Hovered) {
            0.15
        } else {
            0.08
        };
        button::Style {
            background: Some(iced::Background::Color(Color::from_rgba(
                1.0, 1.0, 1.0, bg_alpha,
            ))),
            text_color: TEXT_WHITE,
            border: Border {
                color: if active {
                    ACCENT_AMBER
                } else {
                    Color::from_rgba(1.0, 1.0, 1.0, 0.15)
                },
                width: 1.0,
                radius: 4.0.into(),
            },
            shadow: Shadow::default(),
            snap: false,
        }
    }
}

pub fn accent_button_style(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let alpha = match status {
        button::Status::Hovered => 0.85,
        button::Status::Disabled => 0.4,
        _ => 1.0,
    };
    button::Style {
        background: Some(iced::Background::Color(Color {
            a: alpha,
            ..ACCENT_AMBER
        })),
        text_color: Color::BLACK,
        border: Border {
            radius: 4.0.into(),
            ..Default::default()
        },
        shadow: Shadow::default(),
        snap: false,
    }
}

pub fn dropdown_style(_theme: &iced::Theme, _status: pick_list::Status) -> pick_list::Style {
    pick_list::Style {
        text_color: TEXT_WHITE,
        placeholder_color: TEXT_GRAY,
        handle_color: TEXT_WHITE,
        background: iced::Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.1)),
        border: Border {
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.2),
            width: 1.0,
            radius: 4.0.into(),
        },
    }
}

pub fn input_style(_theme: &iced::Theme, _status: text_input::Status) -> text_input::Style {
    text_input::Style {
        background: iced::Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.1)),
        border: Border {
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.2),
            width: 1.0,
            radius: 4.0.into(),
        },
        icon: TEXT_GRAY,
        placeholder: TEXT_GRAY,
        value: TEXT_WHITE,
        selection: ACCENT_AMBER,
    }
}

impl Phimdeck {
    pub fn view_main_content(&self) -> Element<'_, Message> {
        let body: Element<Message> = match &self.current_page {
            Page::Home => self.view_home(),
            Page::Search(_) => self.view_search_page(),
            Page::Listing(route) => self.view_listing_page(route),
            Page::Detail(_) => self.view_detail_page(),
        };

        let page = column![
            Space::new().height(Length::Fixed(HEADER_HEIGHT)),
            body,
            self.view_footer()
        ]
        .width(Length::Fill);

        let main_scroll = scrollable(page)
            .id(iced::widget::Id::new(MAIN_SCROLL_ID))
            .direction(scrollable::Direction::Vertical(
                scrollable::Scrollbar::new().width(0).scroller_width(0),
            ))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(hidden_scrollbar_style);

        iced::widget::stack![main_scroll, self.view_header()]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn view_home(&self) -> Element<'_, Message> {
        match &self.home.loading {
            LoadingState::Loading => self.view_skeleton_home(),
            LoadingState::Error(error_message) => self.view_error_state(error_message),
            LoadingState::Idle => {
                let rails: Vec<Element<Message>> = self
                    .home
                    .content
                    .rails
                    .iter()
                    .map(|rail| self.view_rail(rail.list.title(), Some(rail.list), &rail.items))
                    .collect();

                column![
                    self.view_hero_section(),
                    self.view_rail("Phim Mới Cập Nhật", None, &self.home.content.latest),
                    Column::with_children(rails).spacing(40)
                ]
                .spacing(40)
                .width(Length::Fill)
                .into()
            }
        }
    }

    pub fn view_header(&self) -> Element<'_, Message> {
        let logo = button(text("Phimdeck").size(26).color(ACCENT_AMBER).font(bold()))
            .padding(0)
            .style(|_theme, _status| button::Style {
                background: None,
                text_color: ACCENT_AMBER,
                border: Border::default(),
                shadow: Shadow::default(),
                snap: false,
            })
            .on_press(Message::NavigateTo(Page::Home));

        let left_section = row![logo, self.view_navigation()]
            .spacing(32)
            .align_y(iced::Alignment::Center);

        let header_content = row![
            left_section,
            Space::new().width(Length::Fill),
            self.view_search_bar()
        ]
        .padding(Padding::new(16.0).left(48.0).right(48.0))
        .align_y(iced::Alignment::Center);

        container(header_content)
            .width(Length::Fill)
            .height(Length::Fixed(HEADER_HEIGHT))
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(Color::from_rgba(
                    0.0, 0.0, 0.0, 0.85,
                ))),
                ..Default::default()
            })
            .into()
    }

    pub fn view_navigation(&self) -> Element<'_, Message> {
        let mut nav_buttons: Vec<Element<Message>> =
            vec![self.view_nav_button(NavItem::Home, "Trang Chủ", Page::Home)];
        nav_buttons.extend(PredefinedList::ALL.into_iter().map(|list| {
            self.view_nav_button(
                NavItem::List(list),
                list.title(),
                Page::Listing(ListingRoute::category(list.slug())),
            )
        }));
        nav_buttons.push(self.view_nav_button(NavItem::Search, "Tìm Kiếm", Page::Search(None)));

        Row::with_children(nav_buttons)
            .spacing(12)
            .align_y(iced::Alignment::Center)
            .into()
    }

    pub fn view_nav_button(
        &self,
        nav_item: NavItem,
        label: &'static str,
        page: Page,
    ) -> Element<'_, Message> {
        let is_active = self.header_state.active_nav == Some(nav_item);
        let text_color = if is_active { TEXT_WHITE } else { TEXT_GRAY };

        let label_text = text(label)
            .size(14)
            .color(text_color)
            .shaping(text::Shaping::Advanced);
        let underline_color = if is_active {
            ACCENT_AMBER
        } else {
            Color::TRANSPARENT
        };
        let underline = container(Space::new().width(Length::Fill).height(2)).style(move |_theme| {
            container::Style {
                background: Some(iced::Background::Color(underline_color)),
                ..Default::default()
            }
        });

        button(
            column![label_text, underline]
                .spacing(4)
                .align_x(iced::Alignment::Center),
        )
        .padding(Padding::new(8.0).left(10.0).right(10.0))
        .style(move |_theme, status| {
            let final_color = match status {
                button::Status::Hovered => TEXT_WHITE,
                _ if is_active => TEXT_WHITE,
                _ => TEXT_GRAY,
            };
            button::Style {
                background: Some(iced::Background::Color(Color::TRANSPARENT)),
                text_color: final_color,
                border: Border::default(),
                shadow: Shadow::default(),
                snap: false,
            }
        })
        .on_press(Message::NavigateTo(page))
        .into()
    }

    pub fn view_search_bar(&self) -> Element<'_, Message> {
        let search_icon = icon(ICON_SEARCH).size(14).color(TEXT_GRAY);

        let search_input = text_input("Tìm phim...", &self.header_state.search_query)
            .on_input(Message::SearchQueryChanged)
            .on_submit(Message::SearchSubmit)
            .padding(8)
            .width(Length::Fixed(200.0))
            .style(|_theme, _status| text_input::Style {
                background: iced::Background::Color(Color::TRANSPARENT),
                border: Border::default(),
                icon: TEXT_GRAY,
                placeholder: TEXT_GRAY,
                value: TEXT_WHITE,
                selection: ACCENT_AMBER,
            });

        container(
            row![search_icon, search_input]
                .spacing(8)
                .align_y(iced::Alignment::Center),
        )
        .padding(Padding::new(4.0).left(12.0).right(8.0))
        .style(|_theme| container::Style {
            background: Some(iced::Background::Color(Color::from_rgba(
                0.0, 0.0, 0.0, 0.7,
            ))),
            border: Border {
                color: TEXT_GRAY,
                width: 1.0,
                radius: 24.0.into(),
            },
            ..Default::default()
        })
        .into()
    }

    fn view_footer(&self) -> Element<'_, Message> {
        container(
            text("Dữ liệu phim từ KKPhim")
                .size(12)
                .color(TEXT_GRAY)
                .shaping(text::Shaping::Advanced),
        )
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(Padding::new(32.0))
        .into()
    }

    fn view_error_state<'a>(&'a self, error_message: &'a str) -> Element<'a, Message> {
        let error_text = text(error_message).size(18).color(ACCENT_AMBER);
        let retry_button = button(text("Thử lại").size(16).shaping(text::Shaping::Advanced))
            .padding(Padding::new(12.0).left(24.0).right(24.0))
            .style(accent_button_style)
            .on_press(Message::RetryHome);

        container(
            column![error_text, retry_button]
                .spacing(16)
                .align_x(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .height(Length::Fixed(400.0))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    }

    pub fn view_empty_state(&self, state: EmptyState) -> Element<'_, Message> {
        let (headline, hint) = match state {
            EmptyState::NotSearched => (
                "Nhập từ khóa hoặc chọn bộ lọc",
                "Chọn thể loại, quốc gia hoặc năm rồi bấm Lọc",
            ),
            EmptyState::NoResults => (
                "Không tìm thấy phim nào",
                "Thử thay đổi từ khóa hoặc bộ lọc",
            ),
        };

        container(
            column![
                icon(ICON_FILM).size(40).color(TEXT_GRAY),
                text(headline)
                    .size(22)
                    .color(TEXT_GRAY)
                    .shaping(text::Shaping::Advanced),
                text(hint)
                    .size(14)
                    .color(TEXT_GRAY)
                    .shaping(text::Shaping::Advanced)
            ]
            .spacing(12)
            .align_x(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .height(Length::Fixed(300.0))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    }

    /// Page controls; `full` adds first/last jumps and hides single-page
    /// results.
    pub fn view_pagination(
        &self,
        target: ListTarget,
        pagination: Option<Pagination>,
        full: bool,
    ) -> Element<'_, Message> {
        let Some(pagination) = pagination else {
            return Space::new().height(0).into();
        };
        if full && pagination.total_pages <= 1 {
            return Space::new().height(0).into();
        }

        let nav = |glyph: char, page: u32, enabled: bool| {
            page_button(glyph, enabled.then_some(Message::GoToPage(target, page)))
        };

        let current = pagination.current_page;
        let mut controls: Vec<Element<Message>> = Vec::new();
        if full {
            controls.push(nav(ICON_CHEVRON_DOUBLE_LEFT, 1, pagination.has_previous()));
        }
        controls.push(nav(
            ICON_CHEVRON_LEFT,
            pagination.previous_page(),
            pagination.has_previous(),
        ));
        controls.push(
            text(format!("Trang {} / {}", current, pagination.total_pages.max(1)))
                .size(14)
                .color(TEXT_WHITE)
                .shaping(text::Shaping::Advanced)
                .into(),
        );
        controls.push(nav(ICON_CHEVRON_RIGHT, pagination.next_page(), pagination.has_next()));
        if full {
            controls.push(nav(
                ICON_CHEVRON_DOUBLE_RIGHT,
                pagination.total_pages,
                pagination.has_next(),
            ));
        }

        container(
            Row::with_children(controls)
                .spacing(12)
                .align_y(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(Padding::new(24.0))
        .into()
    }
}

impl Phimdeck {
    pub fn view_skeleton_home(&self) -> Element<'_, Message> {
        let hero = container(Space::new().width(Length::Fill).height(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fixed(460.0))
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
                ..Default::default()
            });

        let sections: Vec<Element<Message>> =
            (0..3).map(|_| self.view_skeleton_section()).collect();

        column![
            hero,
            Column::with_children(sections)
                .spacing(32)
                .padding(Padding::new(24.0).left(48.0).right(48.0))
        ]
        .spacing(24)
        .width(Length::Fill)
        .into()
    }

    pub fn view_skeleton_section(&self) -> Element<'_, Message> {
        let title_skeleton =
            container(Space::new().width(180.0).height(24.0)).style(skeleton_style(4.0, 0.6));

        column![title_skeleton, self.view_skeleton_row(6)]
            .spacing(16)
            .width(Length::Fill)
            .into()
    }

    pub fn view_skeleton_row(&self, count: usize) -> Element<'_, Message> {
        let card_skeletons: Vec<Element<Message>> = (0..count)
            .map(|_| {
                container(Space::new().width(160.0).height(240.0))
                    .style(skeleton_style(8.0, 0.5))
                    .into()
            })
            .collect();

        Row::with_children(card_skeletons)
            .spacing(16)
            .align_y(iced::Alignment::Start)
            .into()
    }
}

fn page_button<'a>(glyph: char, on_press: Option<Message>) -> Element<'a, Message> {
    button(icon(glyph).size(14))
        .padding(Padding::new(8.0).left(12.0).right(12.0))
        .style(pill_button_style(false))
        .on_press_maybe(on_press)
        .into()
}

fn skeleton_style(radius: f32, alpha: f32) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| container::Style {
        background: Some(iced::Background::Color(Color::from_rgba(
            0.2, 0.2, 0.2, alpha,
        ))),
        border: Border {
            radius: radius.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}
