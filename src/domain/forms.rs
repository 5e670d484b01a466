//! Editable form state for customers and comics.
//!
//! Each form owns its values. Edit forms are prefilled from the entity being edited,
//! new-entity forms start from `Default`.

use std::fmt;

use super::entities::{Comic, ComicPayload, Customer, CustomerPayload};

const MIN_PHONE_LEN: usize = 10;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every failed field, in form order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    fn check(&mut self, ok: bool, field: &'static str, message: &'static str) {
        if !ok {
            self.0.push(FieldError { field, message });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomerForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub phone_number: String,
    pub store_credit: f64,
    pub discount: f64,
    pub notes: String,
}

impl From<&Customer> for CustomerForm {
    fn from(customer: &Customer) -> Self {
        Self {
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            company: customer.company.clone(),
            phone_number: customer.phone_number.clone(),
            store_credit: customer.store_credit,
            discount: customer.discount,
            notes: customer.notes.clone(),
        }
    }
}

impl CustomerForm {
    pub fn validate(self) -> Result<CustomerPayload, FormErrors> {
        let mut errors = FormErrors::default();
        errors.check(
            !self.first_name.trim().is_empty(),
            "first_name",
            "First name is required",
        );
        errors.check(
            !self.last_name.trim().is_empty(),
            "last_name",
            "Last name is required",
        );
        errors.check(
            looks_like_email(&self.email),
            "email",
            "Invalid email address",
        );
        errors.check(
            !self.company.trim().is_empty(),
            "company",
            "Company is required",
        );
        errors.check(
            self.phone_number.trim().len() >= MIN_PHONE_LEN,
            "phone_number",
            "Phone number must be at least 10 digits",
        );
        errors.check(
            self.store_credit.is_finite() && self.store_credit >= 0.0,
            "store_credit",
            "Store credit cannot be negative",
        );
        errors.check(
            (0.0..=100.0).contains(&self.discount),
            "discount",
            "Discount must be between 0 and 100",
        );

        errors.into_result(CustomerPayload {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: self.company.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            store_credit: self.store_credit,
            discount: self.discount,
            notes: self.notes,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComicForm {
    pub title: String,
    pub issue_number: u32,
    pub publisher: String,
    pub distributor: String,
    pub release_date: String,
    pub is_custom: bool,
}

impl From<&Comic> for ComicForm {
    fn from(comic: &Comic) -> Self {
        Self {
            title: comic.title.clone(),
            issue_number: comic.issue_number,
            publisher: comic.publisher.clone(),
            distributor: comic.distributor.clone(),
            release_date: comic.release_date.clone(),
            is_custom: comic.is_custom,
        }
    }
}

impl ComicForm {
    /// Ad hoc entry from the pull-list screen: only title and publisher are asked for.
    pub fn custom(title: impl Into<String>, publisher: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            publisher: publisher.into(),
            is_custom: true,
            ..Self::default()
        }
    }

    pub fn validate(self) -> Result<ComicPayload, FormErrors> {
        let mut errors = FormErrors::default();
        errors.check(!self.title.trim().is_empty(), "title", "Title is required");
        errors.check(
            !self.publisher.trim().is_empty(),
            "publisher",
            "Publisher is required",
        );

        errors.into_result(ComicPayload {
            title: self.title.trim().to_string(),
            issue_number: self.issue_number,
            publisher: self.publisher.trim().to_string(),
            distributor: self.distributor.trim().to_string(),
            release_date: self.release_date.trim().to_string(),
            is_custom: self.is_custom,
        })
    }
}

fn looks_like_email(raw: &str) -> bool {
    let raw = raw.trim();
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !raw.contains(char::is_whitespace)
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    }
}
