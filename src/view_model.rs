use tracing::{debug, warn};

use crate::error::ApiError;
use crate::normalize::{ListViewModel, MovieSummary, Pagination};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Sequence number of an issued list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// What an empty result grid should say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The search page has no criteria yet.
    NotSearched,
    /// Upstream returned nothing, or the request failed; both render alike.
    NoResults,
}

/// Per-page list model that the views render.
///
/// Only the most recently issued request may publish; earlier completions are
/// dropped when they arrive.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    state: RequestState,
    items: Vec<MovieSummary>,
    pagination: Option<Pagination>,
    envelope_title: Option<String>,
    local_title: Option<String>,
    last_issued: u64,
}

impl ListView {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            local_title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Replaces the page-local title and forgets any envelope title.
    pub fn retitle(&mut self, title: impl Into<String>) {
        self.local_title = Some(title.into());
        self.envelope_title = None;
    }

    pub fn begin(&mut self) -> RequestTicket {
        self.last_issued += 1;
        self.state = RequestState::Loading;
        RequestTicket(self.last_issued)
    }

    /// Publishes a completed request. Returns `false` if the ticket was
    /// superseded and the result discarded.
    pub fn complete(&mut self, ticket: RequestTicket, result: Result<ListViewModel, ApiError>) -> bool {
        if ticket.0 != self.last_issued {
            debug!(
                ticket = ticket.0,
                latest = self.last_issued,
                "discarding stale list response"
            );
            return false;
        }

        match result {
            Ok(model) => {
                self.items = model.items;
                self.pagination = model.pagination;
                if model.title.is_some() {
                    self.envelope_title = model.title;
                }
                self.state = RequestState::Ready;
            }
            Err(error) => {
                warn!(%error, "list request failed");
                self.items.clear();
                self.pagination = None;
                self.state = RequestState::Failed;
            }
        }
        true
    }

    /// Drops results and invalidates any request still in flight.
    pub fn clear(&mut self) {
        self.last_issued += 1;
        self.items.clear();
        self.pagination = None;
        self.state = RequestState::Idle;
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == RequestState::Loading
    }

    pub fn items(&self) -> &[MovieSummary] {
        &self.items
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }

    pub fn total_items(&self) -> u32 {
        self.pagination
            .map(|p| p.total_items)
            .unwrap_or(self.items.len() as u32)
    }

    /// Envelope title when upstream sent one, else the page-local title.
    pub fn title(&self) -> Option<&str> {
        self.envelope_title
            .as_deref()
            .or(self.local_title.as_deref())
    }

    pub fn empty_state(&self, searched: bool) -> Option<EmptyState> {
        if self.is_loading() || !self.items.is_empty() {
            return None;
        }
        if searched {
            Some(EmptyState::NoResults)
        } else {
            Some(EmptyState::NotSearched)
        }
    }
}
