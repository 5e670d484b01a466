#![allow(dead_code)]

use std::fmt;

use super::entities::EntityId;

/// Lifecycle of a fetched view.
///
/// `Idle -> Loading -> {Loaded, Errored}`. A mutation on a loaded view goes back through
/// `Loading` for the refetch; there is no optimistic state.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ViewState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Errored(String),
}

impl<T> ViewState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Errored(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Loading => "loading",
            ViewState::Loaded(_) => "loaded",
            ViewState::Errored(_) => "errored",
        }
    }
}

/// Query cache key: entity type plus, where scoped, the owning id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheResource {
    Customers,
    Comics,
    /// Pulls belonging to one customer.
    PullList(EntityId),
}

impl fmt::Display for CacheResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheResource::Customers => f.write_str("customers"),
            CacheResource::Comics => f.write_str("comics"),
            CacheResource::PullList(id) => write!(f, "pull-list:{id}"),
        }
    }
}
