//! Customer x pull x comic join behind the holds report.

use std::collections::HashMap;

use super::entities::{Comic, Customer, Pull};

/// Column headers, in output order.
pub const REPORT_HEADERS: [&str; 4] = ["First Name", "Last Name", "Number of Holds", "Holds"];

#[derive(Clone, Debug, PartialEq)]
pub struct HoldsRow {
    pub first_name: String,
    pub last_name: String,
    pub hold_count: usize,
    /// `Title #Issue` entries joined with ", ".
    pub holds: String,
}

/// One row per customer, in input order. Holds keep the order the pulls were fetched in.
pub fn build_rows(customers: &[Customer], pulls: &[Pull], catalog: &[Comic]) -> Vec<HoldsRow> {
    let by_id: HashMap<&str, &Comic> = catalog.iter().map(|c| (c.id.as_str(), c)).collect();

    customers
        .iter()
        .map(|customer| {
            let labels: Vec<String> = pulls
                .iter()
                .filter(|pull| pull.customer_id == customer.id)
                .map(|pull| match by_id.get(pull.comic_id.as_str()) {
                    Some(comic) => comic.label(),
                    None => {
                        tracing::warn!(
                            customer_id = %customer.id,
                            comic_id = %pull.comic_id,
                            "holds report references a comic missing from the catalog"
                        );
                        missing_label(&pull.comic_id)
                    }
                })
                .collect();

            HoldsRow {
                first_name: customer.first_name.clone(),
                last_name: customer.last_name.clone(),
                hold_count: labels.len(),
                holds: labels.join(", "),
            }
        })
        .collect()
}

fn missing_label(comic_id: &str) -> String {
    format!("Unknown comic ({comic_id})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Quantity;

    fn customer(id: &str, first: &str, last: &str) -> Customer {
        Customer {
            id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            ..Customer::default()
        }
    }

    fn pull(customer_id: &str, comic_id: &str) -> Pull {
        Pull {
            id: format!("{customer_id}-{comic_id}"),
            customer_id: customer_id.into(),
            comic_id: comic_id.into(),
            quantity: Quantity::default(),
            date_added: None,
        }
    }

    fn comic(id: &str, title: &str, issue: u32) -> Comic {
        Comic {
            id: id.into(),
            title: title.into(),
            issue_number: issue,
            ..Comic::default()
        }
    }

    #[test]
    fn single_customer_single_hold() {
        let rows = build_rows(
            &[customer("1", "Ann", "Lee")],
            &[pull("1", "c1")],
            &[comic("c1", "Saga", 5)],
        );
        assert_eq!(
            rows,
            vec![HoldsRow {
                first_name: "Ann".into(),
                last_name: "Lee".into(),
                hold_count: 1,
                holds: "Saga #5".into(),
            }]
        );
    }

    #[test]
    fn rows_follow_customer_order_and_holds_follow_pull_order() {
        let customers = [customer("2", "Bo", "Diaz"), customer("1", "Ann", "Lee")];
        let pulls = [pull("1", "c2"), pull("2", "c1"), pull("1", "c1")];
        let catalog = [comic("c1", "Saga", 5), comic("c2", "Batman", 130)];

        let rows = build_rows(&customers, &pulls, &catalog);
        assert_eq!(rows[0].first_name, "Bo");
        assert_eq!(rows[0].holds, "Saga #5");
        assert_eq!(rows[1].hold_count, 2);
        assert_eq!(rows[1].holds, "Batman #130, Saga #5");
    }

    #[test]
    fn customer_without_pulls_gets_empty_row() {
        let rows = build_rows(&[customer("9", "Cy", "Ng")], &[pull("1", "c1")], &[]);
        assert_eq!(rows[0].hold_count, 0);
        assert_eq!(rows[0].holds, "");
    }

    #[test]
    fn unresolved_comic_is_flagged_not_dropped() {
        let rows = build_rows(
            &[customer("1", "Ann", "Lee")],
            &[pull("1", "c9")],
            &[comic("c1", "Saga", 5)],
        );
        assert_eq!(rows[0].hold_count, 1);
        assert_eq!(rows[0].holds, "Unknown comic (c9)");
    }
}
