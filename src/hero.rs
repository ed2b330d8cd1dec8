use iced::widget::{button, column, container, row, text, Row, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::components::{accent_button_style, bold, icon};
use crate::media::{Message, Page, ACCENT_AMBER, SURFACE_DARK_GRAY, TEXT_GRAY, TEXT_WHITE};
use crate::normalize::MovieSummary;
use crate::Phimdeck;

const HERO_HEIGHT: f32 = 560.0;
const ICON_PLAY_FILL: char = '\u{F4F4}';
const ICON_INFO_CIRCLE: char = '\u{F431}';

impl Phimdeck {
    pub fn view_hero_section(&self) -> Element<'_, Message> {
        match &self.home.content.featured {
            Some(movie) => self.view_hero_with_content(movie),
            None => self.view_hero_placeholder(),
        }
    }

    pub fn view_hero_placeholder(&self) -> Element<'_, Message> {
        container(
            text("Chưa có phim nổi bật")
                .size(24)
                .color(TEXT_GRAY)
                .shaping(text::Shaping::Advanced),
        )
        .width(Length::Fill)
        .height(Length::Fixed(HERO_HEIGHT))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
            ..Default::default()
        })
        .into()
    }

    pub fn view_hero_with_content<'a>(&'a self, movie: &'a MovieSummary) -> Element<'a, Message> {
        let hero_title = text(&movie.name)
            .size(48)
            .color(TEXT_WHITE)
            .font(bold())
            .shaping(text::Shaping::Advanced);
        let origin_title = text(&movie.origin_name)
            .size(18)
            .color(TEXT_GRAY)
            .shaping(text::Shaping::Advanced);

        let button_row = row![
            self.view_hero_watch_button(&movie.slug),
            self.view_hero_more_info_button(&movie.slug)
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center);

        let hero_text_content = column![
            hero_title,
            origin_title,
            self.view_hero_metadata(movie),
            button_row
        ]
        .spacing(16)
        .max_width(640.0)
        .padding(Padding::new(64.0).left(64.0).right(64.0));

        let hero_left_gradient = container(hero_text_content)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_y(iced::alignment::Vertical::Bottom)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Gradient(iced::Gradient::Linear(
                    iced::gradient::Linear::new(0.0)
                        .add_stop(0.0, Color::from_rgba(0.0, 0.0, 0.0, 0.99))
                        .add_stop(0.3, Color::from_rgba(0.0, 0.0, 0.0, 0.85))
                        .add_stop(0.6, Color::from_rgba(0.0, 0.0, 0.0, 0.4))
                        .add_stop(0.9, Color::TRANSPARENT),
                ))),
                ..Default::default()
            });

        iced::widget::stack![self.view_hero_backdrop(&movie.thumb_url), hero_left_gradient]
            .width(Length::Fill)
            .height(Length::Fixed(HERO_HEIGHT))
            .into()
    }

    fn view_hero_metadata(&self, movie: &MovieSummary) -> Element<'_, Message> {
        let year = movie.year.map(|year| year.to_string());
        let parts: Vec<Element<Message>> = [
            year.as_deref(),
            Some(movie.quality.as_str()),
            Some(movie.lang.as_str()),
            Some(movie.episode_current.as_str()),
            Some(movie.time.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .map(|part| {
            text(part.to_string())
                .size(14)
                .color(ACCENT_AMBER)
                .shaping(text::Shaping::Advanced)
                .into()
        })
        .collect();

        Row::with_children(parts)
            .spacing(16)
            .align_y(iced::Alignment::Center)
            .into()
    }

    pub fn view_hero_backdrop(&self, path: &str) -> Element<'_, Message> {
        let Some(handle) = self.image_cache.get(&self.image_cache.url_for(path)) else {
            return container(Space::new().width(Length::Fill).height(Length::Fill))
                .width(Length::Fill)
                .height(Length::Fixed(HERO_HEIGHT))
                .style(|_theme| container::Style {
                    background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
                    ..Default::default()
                })
                .into();
        };
        iced::widget::image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(HERO_HEIGHT))
            .content_fit(iced::ContentFit::Cover)
            .into()
    }

    fn view_hero_watch_button(&self, slug: &str) -> Element<'_, Message> {
        button(
            row![
                icon(ICON_PLAY_FILL).size(14),
                text("Xem phim").size(16).shaping(text::Shaping::Advanced)
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center),
        )
        .padding(Padding::new(12.0).left(24.0).right(24.0))
        .style(accent_button_style)
        .on_press(Message::NavigateTo(Page::Detail(slug.to_string())))
        .into()
    }

    fn view_hero_more_info_button(&self, slug: &str) -> Element<'_, Message> {
        button(
            row![
                icon(ICON_INFO_CIRCLE).size(14).color(TEXT_WHITE),
                text("Chi tiết")
                    .size(16)
                    .color(TEXT_WHITE)
                    .shaping(text::Shaping::Advanced)
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center),
        )
        .padding(Padding::new(12.0).left(24.0).right(24.0))
        .style(|_theme, status| {
            let background_color = match status {
                button::Status::Hovered => Color::from_rgba(1.0, 1.0, 1.0, 0.1),
                _ => Color::TRANSPARENT,
            };
            button::Style {
                background: Some(iced::Background::Color(background_color)),
                text_color: TEXT_WHITE,
                border: Border {
                    color: TEXT_WHITE,
                    width: 1.0,
                    radius: 4.0.into(),
                },
                shadow: Shadow::default(),
                snap: false,
            }
        })
        .on_press(Message::NavigateTo(Page::Detail(slug.to_string())))
        .into()
    }
}
