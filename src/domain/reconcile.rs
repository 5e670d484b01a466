//! Joins pulls to the catalog and filters what the user can browse or add.

use std::collections::{HashMap, HashSet};

use super::entities::{Comic, Customer, Pull};

/// Suggestion box size when searching for comics to add.
pub const SEARCH_LIMIT: usize = 5;

/// Title shown when a pull references a comic the catalog doesn't have (yet).
pub const MISSING_COMIC_TITLE: &str = "Refresh to view newly added comic";

/// A pull resolved against the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct PullListEntry {
    pub pull: Pull,
    pub comic: Comic,
    /// False when `comic` is the refresh placeholder.
    pub resolved: bool,
}

pub fn placeholder_comic() -> Comic {
    Comic {
        title: MISSING_COMIC_TITLE.to_string(),
        ..Comic::default()
    }
}

/// Join every pull to its comic, keeping pull order. Missing comics never drop an entry.
pub fn join_pulls(pulls: &[Pull], catalog: &[Comic]) -> Vec<PullListEntry> {
    let by_id: HashMap<&str, &Comic> = catalog.iter().map(|c| (c.id.as_str(), c)).collect();
    pulls
        .iter()
        .map(|pull| match by_id.get(pull.comic_id.as_str()) {
            Some(comic) => PullListEntry {
                pull: pull.clone(),
                comic: (*comic).clone(),
                resolved: true,
            },
            None => {
                tracing::debug!(
                    pull_id = %pull.id,
                    comic_id = %pull.comic_id,
                    "pull references unknown comic"
                );
                PullListEntry {
                    pull: pull.clone(),
                    comic: placeholder_comic(),
                    resolved: false,
                }
            }
        })
        .collect()
}

/// Comics matching `query` by title or publisher that the customer doesn't already hold.
pub fn search_candidates<'a>(catalog: &'a [Comic], held: &[Pull], query: &str) -> Vec<&'a Comic> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let held_ids: HashSet<&str> = held.iter().map(|p| p.comic_id.as_str()).collect();
    catalog
        .iter()
        .filter(|comic| !held_ids.contains(comic.id.as_str()))
        .filter(|comic| {
            comic.title.to_lowercase().contains(&needle)
                || comic.publisher.to_lowercase().contains(&needle)
        })
        .take(SEARCH_LIMIT)
        .collect()
}

pub fn is_held(held: &[Pull], comic_id: &str) -> bool {
    held.iter().any(|p| p.comic_id == comic_id)
}

/// Customer list filter: full name, email, or company. Empty query keeps everyone.
pub fn filter_customers<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return customers.iter().collect();
    }
    customers
        .iter()
        .filter(|c| {
            c.full_name().to_lowercase().contains(&needle)
                || c.email.to_lowercase().contains(&needle)
                || c.company.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Catalog filter: title, publisher, or issue number. Empty query keeps everything.
pub fn filter_comics<'a>(catalog: &'a [Comic], query: &str) -> Vec<&'a Comic> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return catalog.iter().collect();
    }
    catalog
        .iter()
        .filter(|c| {
            c.title.to_lowercase().contains(&needle)
                || c.publisher.to_lowercase().contains(&needle)
                || c.issue_number.to_string().contains(&needle)
        })
        .collect()
}
