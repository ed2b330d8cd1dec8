mod cards;
mod catalog;
mod components;
mod detail;
mod detail_handlers;
mod error;
mod filters;
mod handlers;
mod hero;
mod images;
mod listing;
mod media;
mod normalize;
mod query;
mod reference;
mod search;
mod settings;
mod view_model;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use iced::widget::container;
use iced::{Element, Font, Length, Size, Task, Theme};
use tracing::info;

use catalog::{CatalogClient, CatalogSource};
use images::ImageCache;
use media::{DetailPage, HeaderState, HomeState, ListPage, Message, Page, BACKGROUND_BLACK};
use query::{ListingRoute, ViewScope};
use reference::{ReferenceCache, ReferenceData};
use settings::AppSettings;

#[derive(Parser, Debug)]
#[command(name = "phimdeck")]
#[command(about = "Desktop browser for the KKPhim movie catalog", long_about = None)]
#[command(version)]
struct Args {
    /// Route to open at startup, e.g. `/tim-kiem?keyword=abc` or `/phim/<slug>`
    route: Option<String>,

    /// Log level, overrides the settings file
    #[arg(long, value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: Option<String>,

    /// Path to the settings file
    #[arg(long)]
    config: Option<PathBuf>,
}

pub struct Phimdeck {
    pub settings: AppSettings,
    pub current_page: Page,
    pub header_state: HeaderState,
    pub home: HomeState,
    pub search_page: ListPage,
    pub listing_page: ListPage,
    pub detail_page: DetailPage,
    pub reference: ReferenceData,
    pub reference_cache: ReferenceCache,
    pub catalog: Arc<dyn CatalogSource>,
    pub image_cache: ImageCache,
}

impl Phimdeck {
    fn with_catalog(
        settings: AppSettings,
        catalog: Arc<dyn CatalogSource>,
        image_cache_dir: Option<PathBuf>,
    ) -> Self {
        let page_size = settings.page_size;
        Self {
            image_cache: ImageCache::with_directory(&settings.image_base_url, image_cache_dir),
            current_page: Page::Home,
            header_state: HeaderState::default(),
            home: HomeState::default(),
            search_page: ListPage::new(ViewScope::Search, page_size),
            listing_page: ListPage::new(
                ViewScope::Listing(ListingRoute::category(query::PredefinedList::Series.slug())),
                page_size,
            ),
            detail_page: DetailPage::default(),
            reference: ReferenceData::default(),
            reference_cache: ReferenceCache::new(),
            catalog,
            settings,
        }
    }

    fn new(settings: AppSettings, start: Page) -> (Self, Task<Message>) {
        let catalog: Arc<dyn CatalogSource> = Arc::new(CatalogClient::from_settings(&settings));
        let mut app = Self::with_catalog(settings, catalog, None);
        app.image_cache = ImageCache::new(&app.settings.image_base_url);

        let load_reference = handlers::load_reference(&app);
        let open_start = handlers::handle_navigate(&mut app, start);
        (app, Task::batch([load_reference, open_start]))
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        handlers::handle_message(self, message)
    }

    fn view(&self) -> Element<'_, Message> {
        container(self.view_main_content())
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(BACKGROUND_BLACK)),
                ..Default::default()
            })
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    let args = Args::parse();
    let settings = AppSettings::load(args.config.clone());

    let level = args
        .log_level
        .as_deref()
        .unwrap_or(&settings.log_level)
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let start = args
        .route
        .as_deref()
        .map(Page::from_route)
        .unwrap_or(Page::Home);
    info!(api = %settings.api_base_url, route = %start.route(), "starting phimdeck");

    iced::application(
        move || Phimdeck::new(settings.clone(), start.clone()),
        Phimdeck::update,
        Phimdeck::view,
    )
    .title("Phimdeck")
    .theme(Phimdeck::theme)
    .window_size(Size::new(1280.0, 800.0))
    .font(iced_fonts::BOOTSTRAP_FONT_BYTES)
    .default_font(Font::DEFAULT)
    .run()
}
