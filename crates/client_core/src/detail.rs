//! Single-record detail views (product or department).

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use shared::{
    domain::{DepartmentId, Item, ProductId},
    error::{ErrorKind, FetchError},
};
use tracing::{debug, warn};

use crate::sequence::RequestSequencer;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordTarget {
    Product(ProductId),
    Department(DepartmentId),
    DepartmentByName(String),
}

impl fmt::Display for RecordTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordTarget::Product(id) => write!(f, "product {id}"),
            RecordTarget::Department(id) => write!(f, "department {id}"),
            RecordTarget::DepartmentByName(name) => write!(f, "department \"{name}\""),
        }
    }
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn load_record(&self, target: &RecordTarget) -> Result<Item, FetchError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Loading,
    Loaded(Item),
    Failed(FetchError),
}

pub struct DetailLoader {
    source: Arc<dyn RecordSource>,
    target: RecordTarget,
    state: DetailState,
    requests: RequestSequencer<Result<Item, FetchError>>,
}

impl DetailLoader {
    pub fn new(source: Arc<dyn RecordSource>, target: RecordTarget) -> Self {
        Self {
            source,
            target,
            state: DetailState::Idle,
            requests: RequestSequencer::new(),
        }
    }

    pub fn target(&self) -> &RecordTarget {
        &self.target
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn mount(&mut self) {
        if self.state == DetailState::Idle {
            self.issue();
        }
    }

    /// Only acts from `Failed`.
    pub fn retry(&mut self) -> bool {
        if !matches!(self.state, DetailState::Failed(_)) {
            return false;
        }
        self.issue();
        true
    }

    fn issue(&mut self) {
        let source = Arc::clone(&self.source);
        let target = self.target.clone();
        let seq = self
            .requests
            .issue(async move { source.load_record(&target).await });
        debug!(seq, record = %self.target, "detail request issued");
        self.state = DetailState::Loading;
    }

    fn apply(&mut self, outcome: Result<Item, FetchError>) {
        self.state = match outcome {
            Ok(item) => DetailState::Loaded(item),
            Err(err) => {
                warn!(record = %self.target, error = %err, "detail failed to load");
                DetailState::Failed(err)
            }
        };
    }

    pub fn pump(&mut self) -> bool {
        match self.requests.try_next() {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    pub async fn settle(&mut self) -> &DetailState {
        if let Some(outcome) = self.requests.next().await {
            self.apply(outcome);
        }
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == DetailState::Loading
    }

    pub fn is_error(&self, kind: ErrorKind) -> bool {
        matches!(&self.state, DetailState::Failed(err) if err.kind() == kind)
    }

    pub fn record(&self) -> Option<&Item> {
        match &self.state {
            DetailState::Loaded(item) => Some(item),
            _ => None,
        }
    }

    /// A 404 is reported as "not found" rather than a load failure.
    pub fn is_not_found(&self) -> bool {
        matches!(&self.state, DetailState::Failed(err) if err.is_not_found())
    }

    pub fn failure_message(&self) -> Option<&'static str> {
        if !matches!(self.state, DetailState::Failed(_)) {
            return None;
        }
        Some(match self.target {
            RecordTarget::Product(_) => "Failed to load product details. Please try again later.",
            _ => "Failed to load department. Please try again later.",
        })
    }
}
