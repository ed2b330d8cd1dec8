use std::sync::Arc;

use iced::Task;
use tracing::{info, warn};

use crate::catalog::{load_detail, MovieDetailResponse};
use crate::error::ApiError;
use crate::media::{DetailPage, DetailState, Message};
use crate::Phimdeck;

pub fn handle_open_detail(app: &mut Phimdeck, slug: String) -> Task<Message> {
    app.detail_page = DetailPage::loading(slug.clone());
    let catalog = Arc::clone(&app.catalog);
    let requested = slug.clone();
    Task::perform(load_detail(catalog, slug), move |result| {
        Message::DetailLoaded(requested.clone(), result)
    })
}

pub fn handle_detail_loaded(
    app: &mut Phimdeck,
    slug: String,
    result: Result<MovieDetailResponse, ApiError>,
) -> Task<Message> {
    if app.detail_page.slug != slug {
        return Task::none();
    }

    match result {
        Ok(detail) => {
            let poster = app.image_cache.url_for(&detail.movie.poster_url);
            let thumb = app.image_cache.url_for(&detail.movie.thumb_url);
            app.detail_page.state = DetailState::Ready(Box::new(detail));
            app.detail_page.selected_server = 0;
            app.detail_page.selected_episode = None;
            Task::batch([
                Task::done(Message::LoadImage(poster)),
                Task::done(Message::LoadImage(thumb)),
            ])
        }
        Err(error) => {
            warn!(%slug, %error, "movie detail unavailable");
            app.detail_page.state = DetailState::Missing;
            Task::none()
        }
    }
}

pub fn handle_select_server(app: &mut Phimdeck, index: usize) -> Task<Message> {
    let server_count = app
        .detail_page
        .detail()
        .map(|detail| detail.episodes.len())
        .unwrap_or(0);
    if index < server_count && index != app.detail_page.selected_server {
        app.detail_page.selected_server = index;
        app.detail_page.selected_episode = None;
    }
    Task::none()
}

pub fn handle_select_episode(app: &mut Phimdeck, index: usize) -> Task<Message> {
    app.detail_page.selected_episode = Some(index);
    if let Some(link) = app.detail_page.selected_link() {
        info!(slug = %app.detail_page.slug, link, "episode selected");
    }
    Task::none()
}

pub fn handle_copy_episode_link(link: String) -> Task<Message> {
    iced::clipboard::write(link)
}
