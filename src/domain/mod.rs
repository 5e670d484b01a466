//! Domain logic for customers, comics and pull lists lives here.

pub mod app_state;
pub mod entities;
pub mod forms;
pub mod reconcile;
pub mod report;

pub use app_state::{CacheResource, ViewState};
pub use entities::{
    Comic, ComicPayload, ComicSelection, Customer, CustomerPayload, EntityId, NewPull, Pull,
    PullUpdate, Quantity, QuantityError,
};
pub use forms::{ComicForm, CustomerForm, FormErrors};
pub use reconcile::{
    filter_comics, filter_customers, join_pulls, search_candidates, PullListEntry,
};
pub use report::{build_rows, HoldsRow, REPORT_HEADERS};
