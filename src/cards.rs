use iced::widget::{button, column, container, row, scrollable, text, Column, Row, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::components::{bold, hidden_scrollbar_style, icon, ICON_CHEVRON_RIGHT, ICON_FILM};
use crate::media::{Message, Page, ACCENT_AMBER, SURFACE_DARK_GRAY, TEXT_GRAY, TEXT_WHITE};
use crate::normalize::MovieSummary;
use crate::query::{ListingRoute, PredefinedList};
use crate::Phimdeck;

pub const CARD_WIDTH: f32 = 180.0;
pub const CARD_HEIGHT: f32 = 270.0;
const CARDS_PER_ROW: usize = 6;

impl Phimdeck {
    /// Horizontal rail of posters. Predefined rails link to their listing.
    pub fn view_rail<'a>(
        &'a self,
        title: &'a str,
        list: Option<PredefinedList>,
        items: &'a [MovieSummary],
    ) -> Element<'a, Message> {
        let section_title = text(title)
            .size(24)
            .color(TEXT_WHITE)
            .font(bold())
            .shaping(text::Shaping::Advanced);

        let header: Element<Message> = match list {
            Some(list) => {
                let see_all = button(
                    row![
                        text("Xem tất cả")
                            .size(14)
                            .shaping(text::Shaping::Advanced),
                        icon(ICON_CHEVRON_RIGHT).size(12)
                    ]
                    .spacing(6)
                    .align_y(iced::Alignment::Center),
                )
                .padding(0)
                .style(|_theme, status| button::Style {
                    background: None,
                    text_color: match status {
                        button::Status::Hovered => ACCENT_AMBER,
                        _ => TEXT_GRAY,
                    },
                    border: Border::default(),
                    shadow: Shadow::default(),
                    snap: false,
                })
                .on_press(Message::NavigateTo(Page::Listing(ListingRoute::category(
                    list.slug(),
                ))));
                row![section_title, Space::new().width(Length::Fill), see_all]
                    .align_y(iced::Alignment::Center)
                    .into()
            }
            None => section_title.into(),
        };

        let cards: Vec<Element<Message>> =
            items.iter().map(|item| self.view_movie_card(item)).collect();

        let cards_row = Row::with_children(cards)
            .spacing(16)
            .align_y(iced::Alignment::Start);

        let scrollable_cards = scrollable(cards_row)
            .direction(scrollable::Direction::Horizontal(
                scrollable::Scrollbar::new().width(0).scroller_width(0),
            ))
            .width(Length::Fill)
            .style(hidden_scrollbar_style);

        column![header, scrollable_cards]
            .spacing(20)
            .padding(Padding::new(0.0).left(48.0).right(48.0))
            .width(Length::Fill)
            .into()
    }

    pub fn view_movie_grid<'a>(&'a self, items: &'a [MovieSummary]) -> Element<'a, Message> {
        let rows: Vec<Element<Message>> = items
            .chunks(CARDS_PER_ROW)
            .map(|chunk| {
                let row_cards: Vec<Element<Message>> =
                    chunk.iter().map(|item| self.view_movie_card(item)).collect();
                Row::with_children(row_cards)
                    .spacing(16)
                    .align_y(iced::Alignment::Start)
                    .into()
            })
            .collect();

        Column::with_children(rows)
            .spacing(24)
            .width(Length::Fill)
            .into()
    }

    pub fn view_movie_card<'a>(&'a self, movie: &'a MovieSummary) -> Element<'a, Message> {
        let poster = container(self.view_card_poster(&movie.poster_url, CARD_WIDTH, CARD_HEIGHT))
            .width(Length::Fixed(CARD_WIDTH))
            .height(Length::Fixed(CARD_HEIGHT))
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
                border: Border {
                    color: Color::TRANSPARENT,
                    width: 0.0,
                    radius: 8.0.into(),
                },
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
                    offset: iced::Vector::new(0.0, 4.0),
                    blur_radius: 8.0,
                },
                ..Default::default()
            });

        let badge_text = [movie.episode_current.as_str(), movie.quality.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" · ");

        let mut caption = column![text(&movie.name)
            .size(14)
            .color(TEXT_WHITE)
            .font(bold())
            .shaping(text::Shaping::Advanced)]
        .spacing(2)
        .width(Length::Fixed(CARD_WIDTH));
        if !movie.origin_name.is_empty() {
            caption = caption.push(
                text(&movie.origin_name)
                    .size(12)
                    .color(TEXT_GRAY)
                    .shaping(text::Shaping::Advanced),
            );
        }
        if !badge_text.is_empty() {
            caption = caption.push(
                text(badge_text)
                    .size(11)
                    .color(ACCENT_AMBER)
                    .shaping(text::Shaping::Advanced),
            );
        }

        iced::widget::mouse_area(column![poster, caption].spacing(8))
            .on_press(Message::NavigateTo(Page::Detail(movie.slug.clone())))
            .interaction(iced::mouse::Interaction::Pointer)
            .into()
    }

    /// Cached poster image, or a placeholder while it loads.
    pub fn view_card_poster(&self, path: &str, width: f32, height: f32) -> Element<'_, Message> {
        let handle = self.image_cache.get(&self.image_cache.url_for(path));

        match handle {
            Some(h) => iced::widget::image(h.clone())
                .width(Length::Fixed(width))
                .height(Length::Fixed(height))
                .content_fit(iced::ContentFit::Cover)
                .into(),
            None => self.view_card_placeholder(width, height),
        }
    }

    pub fn view_card_placeholder(&self, width: f32, height: f32) -> Element<'_, Message> {
        container(icon(ICON_FILM).size(48).color(TEXT_GRAY))
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
                ..Default::default()
            })
            .into()
    }
}
