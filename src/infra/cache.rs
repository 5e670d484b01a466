//! In-memory query cache for entity lists.
//!
//! Entries live until invalidated by a mutation or until the TTL runs out. Nothing is
//! written to disk.

use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use crate::domain::{CacheResource, Comic, Customer, EntityId, Pull};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    pub(crate) fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

pub(crate) struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    pub(crate) fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    pub(crate) fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
        {
            Some(CachedPayload::new(
                self.value.clone(),
                self.fetched_at,
                CacheStatus::Cached,
            ))
        } else {
            None
        }
    }
}

#[derive(Default)]
pub(crate) struct QueryCache {
    pub(crate) customers: Option<Cached<Vec<Customer>>>,
    pub(crate) comics: Option<Cached<Vec<Comic>>>,
    pub(crate) pull_lists: HashMap<EntityId, Cached<Vec<Pull>>>,
}

impl QueryCache {
    pub(crate) fn invalidate(&mut self, resource: &CacheResource) {
        match resource {
            CacheResource::Customers => self.customers = None,
            CacheResource::Comics => self.comics = None,
            CacheResource::PullList(customer_id) => {
                self.pull_lists.remove(customer_id);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, resource: &CacheResource) -> bool {
        match resource {
            CacheResource::Customers => self.customers.is_some(),
            CacheResource::Comics => self.comics.is_some(),
            CacheResource::PullList(customer_id) => self.pull_lists.contains_key(customer_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entries_are_served_until_ttl() {
        let entry = Cached::new(vec![1, 2], SystemTime::now());
        let payload = entry.if_fresh(Duration::from_secs(60)).unwrap();
        assert_eq!(payload.data, vec![1, 2]);
        assert_eq!(payload.status, CacheStatus::Cached);

        let old = Cached::new(vec![1], SystemTime::now() - Duration::from_secs(120));
        assert!(old.if_fresh(Duration::from_secs(60)).is_none());
    }

    #[test]
    fn invalidation_is_scoped_to_one_key() {
        let mut cache = QueryCache::default();
        let now = SystemTime::now();
        cache.comics = Some(Cached::new(Vec::new(), now));
        cache.pull_lists.insert("1".into(), Cached::new(Vec::new(), now));
        cache.pull_lists.insert("2".into(), Cached::new(Vec::new(), now));

        cache.invalidate(&CacheResource::PullList("1".into()));

        assert!(!cache.contains(&CacheResource::PullList("1".into())));
        assert!(cache.contains(&CacheResource::PullList("2".into())));
        assert!(cache.contains(&CacheResource::Comics));

        cache.invalidate(&CacheResource::Comics);
        assert!(!cache.contains(&CacheResource::Comics));
    }
}
