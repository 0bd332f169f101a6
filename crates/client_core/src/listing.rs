//! Per-view controller for paginated, optionally searchable listings.

use std::{num::NonZeroU32, sync::Arc};

use async_trait::async_trait;
use shared::{
    domain::{Item, PageRequest, PageResult, Resource, SearchTerm},
    error::{ErrorKind, FetchError},
};
use tracing::{debug, info, warn};

use crate::{pagination::PaginationControls, sequence::RequestSequencer};

#[async_trait]
pub trait PageSource: Send + Sync {
    async fn load_page(&self, request: &PageRequest) -> Result<PageResult, FetchError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListingState {
    Idle,
    Loading(PageRequest),
    Loaded(PageRequest, PageResult),
    Failed(PageRequest, FetchError),
}

impl ListingState {
    pub fn request(&self) -> Option<&PageRequest> {
        match self {
            ListingState::Idle => None,
            ListingState::Loading(request)
            | ListingState::Loaded(request, _)
            | ListingState::Failed(request, _) => Some(request),
        }
    }
}

type Outcome = Result<PageResult, FetchError>;

/// Owns the request/response lifecycle of one listing view.
///
/// All transitions happen on the caller's task. Requests run on spawned
/// tasks; only the response to the most recently issued request is applied.
/// Dropping the controller aborts whatever request is still outstanding.
pub struct ListingController {
    source: Arc<dyn PageSource>,
    base: Resource,
    page_size: NonZeroU32,
    state: ListingState,
    /// Page count last reported for the resource currently shown.
    known_total_pages: Option<u32>,
    requests: RequestSequencer<Outcome>,
}

impl ListingController {
    pub fn new(source: Arc<dyn PageSource>, base: Resource, page_size: NonZeroU32) -> Self {
        Self {
            source,
            base,
            page_size,
            state: ListingState::Idle,
            known_total_pages: None,
            requests: RequestSequencer::new(),
        }
    }

    pub fn base(&self) -> &Resource {
        &self.base
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    /// Loads the first page of the base listing. Only acts from `Idle`.
    pub fn mount(&mut self) {
        self.mount_at(0);
    }

    /// Like [`mount`](Self::mount), but starts on `page`.
    pub fn mount_at(&mut self, page: u32) {
        if matches!(self.state, ListingState::Idle) {
            self.issue(PageRequest::new(self.base.clone(), page, self.page_size));
        }
    }

    /// Starts directly on a search page. An empty term, or a listing without
    /// search, mounts the base listing instead.
    pub fn mount_search(&mut self, term: &str, page: u32) {
        if !matches!(self.state, ListingState::Idle) {
            return;
        }
        let resource = self.search_resource(term);
        self.issue(PageRequest::new(resource, page, self.page_size));
    }

    pub fn set_page(&mut self, index: u32) {
        let resource = match self.state.request() {
            Some(current) if current.page_index == index => return,
            Some(current) => current.resource.clone(),
            None => self.base.clone(),
        };
        self.issue(PageRequest::new(resource, index, self.page_size));
    }

    fn search_resource(&self, term: &str) -> Resource {
        if !self.base.is_product_listing() {
            return self.base.clone();
        }
        match SearchTerm::parse(term) {
            Some(term) => Resource::ProductSearch(term),
            None => self.base.clone(),
        }
    }

    /// Trimmed empty input clears the search. A new term restarts at page 0;
    /// resubmitting the active term reloads the current page. The department
    /// listing has no search endpoint, so it ignores submissions.
    pub fn submit_search(&mut self, term: &str) {
        if !self.base.is_product_listing() {
            debug!(listing = %self.base, "search is not available for this listing");
            return;
        }
        let resource = self.search_resource(term);
        let page = match self.state.request() {
            Some(current) if current.resource == resource => current.page_index,
            _ => 0,
        };
        self.issue(PageRequest::new(resource, page, self.page_size));
    }

    pub fn clear_search(&mut self) {
        self.submit_search("");
    }

    /// Re-issues the failed request unchanged. Returns `false` (and does
    /// nothing) from any state other than `Failed`.
    pub fn retry(&mut self) -> bool {
        let ListingState::Failed(request, _) = &self.state else {
            return false;
        };
        let request = request.clone();
        info!(listing = %request.resource, page = request.page_index, "retrying listing request");
        self.issue(request);
        true
    }

    fn issue(&mut self, request: PageRequest) {
        if self.state.request().map(|current| &current.resource) != Some(&request.resource) {
            self.known_total_pages = None;
        }
        let source = Arc::clone(&self.source);
        let pending = request.clone();
        let seq = self
            .requests
            .issue(async move { source.load_page(&pending).await });
        debug!(
            seq,
            listing = %request.resource,
            page = request.page_index,
            "listing request issued"
        );
        self.state = ListingState::Loading(request);
    }

    fn apply(&mut self, outcome: Outcome) {
        let ListingState::Loading(request) = &self.state else {
            return;
        };
        let request = request.clone();
        self.state = match outcome {
            Ok(result) => {
                self.known_total_pages = Some(result.total_pages);
                ListingState::Loaded(request, result)
            }
            Err(err) => {
                warn!(listing = %request.resource, page = request.page_index, error = %err, "listing failed to load");
                ListingState::Failed(request, err)
            }
        };
    }

    /// Applies a response if the latest one has arrived, without waiting.
    /// Returns whether the state changed.
    pub fn pump(&mut self) -> bool {
        match self.requests.try_next() {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    /// Waits until the current request settles and returns the new state.
    pub async fn settle(&mut self) -> &ListingState {
        if let Some(outcome) = self.requests.next().await {
            self.apply(outcome);
        }
        &self.state
    }

    /// Tears the view down, aborting any outstanding request.
    pub fn unmount(mut self) {
        self.requests.cancel();
        debug!(listing = %self.base, "listing unmounted");
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListingState::Loading(_))
    }

    pub fn is_error(&self, kind: ErrorKind) -> bool {
        matches!(&self.state, ListingState::Failed(_, err) if err.kind() == kind)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.state {
            ListingState::Failed(_, err) => Some(err),
            _ => None,
        }
    }

    fn result(&self) -> Option<&PageResult> {
        match &self.state {
            ListingState::Loaded(_, result) => Some(result),
            _ => None,
        }
    }

    pub fn current_request(&self) -> Option<&PageRequest> {
        self.state.request()
    }

    pub fn current_page(&self) -> u32 {
        self.state.request().map_or(0, |request| request.page_index)
    }

    pub fn search_term(&self) -> Option<&SearchTerm> {
        self.state
            .request()
            .and_then(|request| request.resource.search_term())
    }

    pub fn current_items(&self) -> &[Item] {
        self.result()
            .map(|result| result.items.as_slice())
            .unwrap_or_default()
    }

    pub fn total_items(&self) -> u64 {
        self.result().map_or(0, |result| result.total_items)
    }

    pub fn total_pages(&self) -> u32 {
        self.result().map_or(0, |result| result.total_pages)
    }

    /// The record owning this listing, e.g. the department header.
    pub fn context(&self) -> Option<&Item> {
        self.result().and_then(|result| result.context.as_ref())
    }

    /// Page after the current (or pending) one. While the page count is
    /// unknown, moving forward is allowed.
    pub fn next_page(&self) -> Option<u32> {
        let next = self.current_page().checked_add(1)?;
        match self.known_total_pages {
            Some(total) if next >= total => None,
            _ => Some(next),
        }
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.current_page().checked_sub(1)
    }

    /// Last page count reported for the current resource, kept while a
    /// newer page of it is loading.
    pub fn known_total_pages(&self) -> Option<u32> {
        self.known_total_pages
    }

    pub fn pagination(&self) -> PaginationControls {
        match self.result() {
            Some(result) => PaginationControls::new(result.page_index, result.total_pages),
            None => PaginationControls::default(),
        }
    }

    pub fn failure_message(&self) -> Option<&'static str> {
        let ListingState::Failed(request, _) = &self.state else {
            return None;
        };
        Some(match request.resource {
            Resource::ProductSearch(_) => "Failed to search products. Please try again.",
            Resource::ProductsByDepartment(_) => {
                "Failed to load department products. Please try again later."
            }
            Resource::Departments => "Failed to load departments. Please try again later.",
            _ => "Failed to load products. Please try again later.",
        })
    }

    pub fn summary(&self) -> Option<String> {
        let ListingState::Loaded(request, result) = &self.state else {
            return None;
        };
        let shown = result.items.len();
        let total = result.total_items;
        let mut line = match &request.resource {
            Resource::Departments => format!("Showing {shown} of {total} departments"),
            _ => format!("Showing {shown} of {total} products"),
        };
        if let Some(term) = request.resource.search_term() {
            line.push_str(&format!(" for \"{term}\""));
        }
        if let Some(name) = result.context.as_ref().and_then(Item::name) {
            line.push_str(&format!(" in {name}"));
        }
        Some(line)
    }
}

#[cfg(test)]
#[path = "tests/listing_tests.rs"]
mod tests;
