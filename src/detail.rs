use iced::widget::{button, column, container, row, text, Column, Row, Space};
use iced::{Border, Color, Element, Length, Padding};

use crate::catalog::{MovieDetail, MovieDetailResponse};
use crate::components::{accent_button_style, bold, pill_button_style};
use crate::media::{DetailState, Message, Page, ACCENT_AMBER, SURFACE_RAISED_GRAY, TEXT_GRAY, TEXT_WHITE};
use crate::query::ListingRoute;
use crate::Phimdeck;

const POSTER_WIDTH: f32 = 260.0;
const POSTER_HEIGHT: f32 = 390.0;

fn rounded_style(radius: f32, bg: Option<Color>) -> container::Style {
    container::Style {
        background: bg.map(iced::Background::Color),
        border: Border {
            radius: radius.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn labelled<'a>(label: &'static str, value: String) -> Element<'a, Message> {
    row![
        text(label)
            .size(14)
            .color(TEXT_GRAY)
            .width(Length::Fixed(110.0))
            .shaping(text::Shaping::Advanced),
        text(value)
            .size(14)
            .color(TEXT_WHITE)
            .shaping(text::Shaping::Advanced)
    ]
    .spacing(8)
    .into()
}

impl Phimdeck {
    pub fn view_detail_page(&self) -> Element<'_, Message> {
        match &self.detail_page.state {
            DetailState::Loading => column![self.view_skeleton_section()]
                .padding(Padding::new(32.0).left(48.0).right(48.0))
                .into(),
            DetailState::Ready(detail) => self.view_detail_content(detail),
            DetailState::Missing => Space::new().height(0).into(),
        }
    }

    fn view_detail_content<'a>(&'a self, detail: &'a MovieDetailResponse) -> Element<'a, Message> {
        let movie = &detail.movie;
        let poster = container(self.view_card_poster(&movie.poster_url, POSTER_WIDTH, POSTER_HEIGHT))
            .style(|_theme| rounded_style(8.0, None));

        let info = column![
            text(&movie.name)
                .size(36)
                .color(TEXT_WHITE)
                .font(bold())
                .shaping(text::Shaping::Advanced),
            text(&movie.origin_name)
                .size(18)
                .color(TEXT_GRAY)
                .shaping(text::Shaping::Advanced),
            self.view_detail_badges(movie),
            self.view_detail_categories(movie),
            self.view_detail_credits(movie),
            text(movie.description())
                .size(15)
                .color(TEXT_GRAY)
                .shaping(text::Shaping::Advanced)
        ]
        .spacing(16)
        .width(Length::Fill);

        column![
            row![poster, info].spacing(32),
            self.view_detail_episodes(detail)
        ]
        .spacing(40)
        .padding(Padding::new(32.0).left(48.0).right(48.0))
        .width(Length::Fill)
        .into()
    }

    fn view_detail_badges(&self, movie: &MovieDetail) -> Element<'_, Message> {
        let year = movie.year.map(|year| year.to_string()).unwrap_or_default();
        let badges: Vec<Element<Message>> = [
            movie.quality.as_str(),
            movie.lang.as_str(),
            year.as_str(),
            movie.time.as_str(),
            movie.episode_current.as_str(),
        ]
        .into_iter()
        .filter(|badge| !badge.is_empty())
        .map(|badge| {
            container(
                text(badge.to_string())
                    .size(12)
                    .color(ACCENT_AMBER)
                    .shaping(text::Shaping::Advanced),
            )
            .padding(Padding::new(4.0).left(8.0).right(8.0))
            .style(|_theme| container::Style {
                border: Border {
                    color: ACCENT_AMBER,
                    width: 1.0,
                    radius: 4.0.into(),
                },
                ..Default::default()
            })
            .into()
        })
        .collect();

        Row::with_children(badges).spacing(8).wrap().into()
    }

    fn view_detail_categories<'a>(&'a self, movie: &'a MovieDetail) -> Element<'a, Message> {
        let tags: Vec<Element<Message>> = movie
            .category
            .iter()
            .map(|category| {
                button(
                    text(&category.name)
                        .size(13)
                        .shaping(text::Shaping::Advanced),
                )
                .padding(Padding::new(6.0).left(12.0).right(12.0))
                .style(pill_button_style(false))
                .on_press(Message::NavigateTo(Page::Listing(ListingRoute::category(
                    category.slug.clone(),
                ))))
                .into()
            })
            .collect();

        Row::with_children(tags).spacing(8).wrap().into()
    }

    fn view_detail_credits(&self, movie: &MovieDetail) -> Element<'_, Message> {
        let mut credits = Column::new().spacing(6);
        let countries = movie.country_names();
        if !countries.is_empty() {
            credits = credits.push(labelled("Quốc gia", countries));
        }
        let directors = MovieDetail::credited(&movie.director);
        if !directors.is_empty() {
            credits = credits.push(labelled("Đạo diễn", directors.join(", ")));
        }
        let actors = MovieDetail::credited(&movie.actor);
        if !actors.is_empty() {
            credits = credits.push(labelled("Diễn viên", actors.join(", ")));
        }
        if !movie.status.is_empty() {
            credits = credits.push(labelled("Trạng thái", movie.status.clone()));
        }
        if !movie.episode_total.is_empty() {
            credits = credits.push(labelled("Số tập", movie.episode_total.clone()));
        }
        if !movie.trailer_url.is_empty() {
            credits = credits.push(labelled("Trailer", movie.trailer_url.clone()));
        }
        credits.into()
    }

    fn view_detail_episodes<'a>(&'a self, detail: &'a MovieDetailResponse) -> Element<'a, Message> {
        if detail.episodes.is_empty() {
            return Space::new().height(0).into();
        }
        let selected_server = self.detail_page.selected_server;

        let tabs: Vec<Element<Message>> = detail
            .episodes
            .iter()
            .enumerate()
            .map(|(index, server)| {
                button(
                    text(&server.server_name)
                        .size(14)
                        .shaping(text::Shaping::Advanced),
                )
                .padding(Padding::new(8.0).left(16.0).right(16.0))
                .style(pill_button_style(index == selected_server))
                .on_press(Message::SelectServer(index))
                .into()
            })
            .collect();

        let episodes: Vec<Element<Message>> = detail
            .episodes
            .get(selected_server)
            .map(|server| server.server_data.as_slice())
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(index, episode)| {
                let active = self.detail_page.selected_episode == Some(index);
                button(
                    text(&episode.name)
                        .size(13)
                        .shaping(text::Shaping::Advanced),
                )
                .padding(Padding::new(6.0).left(14.0).right(14.0))
                .style(pill_button_style(active))
                .on_press(Message::SelectEpisode(index))
                .into()
            })
            .collect();

        column![
            text("Danh sách tập")
                .size(22)
                .color(TEXT_WHITE)
                .font(bold())
                .shaping(text::Shaping::Advanced),
            Row::with_children(tabs).spacing(8).wrap(),
            Row::with_children(episodes).spacing(8).wrap(),
            self.view_selected_link()
        ]
        .spacing(16)
        .width(Length::Fill)
        .into()
    }

    fn view_selected_link(&self) -> Element<'_, Message> {
        let Some(link) = self.detail_page.selected_link() else {
            return Space::new().height(0).into();
        };

        let copy = button(text("Sao chép").size(14).shaping(text::Shaping::Advanced))
            .padding(Padding::new(8.0).left(16.0).right(16.0))
            .style(accent_button_style)
            .on_press(Message::CopyEpisodeLink(link.to_string()));

        container(
            row![
                text(link).size(13).color(TEXT_WHITE).width(Length::Fill),
                copy
            ]
            .spacing(12)
            .align_y(iced::Alignment::Center),
        )
        .padding(Padding::new(12.0))
        .width(Length::Fill)
        .style(|_theme| rounded_style(6.0, Some(SURFACE_RAISED_GRAY)))
        .into()
    }
}
