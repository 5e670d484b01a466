#![allow(dead_code)]

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Identifier for customers, comics and pulls. The API may send numbers; they are kept as text.
pub type EntityId = String;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(deserialize_with = "string_from_json")]
    pub id: EntityId,
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: String,
    #[serde(default, alias = "storeCredit")]
    pub store_credit: f64,
    /// Percentage off the cover price, 0-100.
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub notes: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Comic {
    #[serde(deserialize_with = "string_from_json")]
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub issue_number: u32,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub distributor: String,
    #[serde(default)]
    pub release_date: String,
    /// Entered by shop staff rather than imported from a distributor catalog.
    #[serde(default, alias = "isCustom")]
    pub is_custom: bool,
}

impl Comic {
    /// `Title #Issue`, the form used in reports and listings.
    pub fn label(&self) -> String {
        format!("{} #{}", self.title, self.issue_number)
    }
}

/// Body sent when creating or replacing a comic.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ComicPayload {
    pub title: String,
    pub issue_number: u32,
    pub publisher: String,
    pub distributor: String,
    pub release_date: String,
    pub is_custom: bool,
}

/// Body sent when creating or replacing a customer.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CustomerPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub phone_number: String,
    pub store_credit: f64,
    pub discount: f64,
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pull {
    #[serde(deserialize_with = "string_from_json")]
    pub id: EntityId,
    #[serde(deserialize_with = "string_from_json")]
    pub customer_id: EntityId,
    #[serde(deserialize_with = "string_from_json")]
    pub comic_id: EntityId,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default)]
    pub date_added: Option<String>,
}

impl Pull {
    /// Creation time, when the server sent an RFC 3339 timestamp.
    pub fn added_at(&self) -> Option<OffsetDateTime> {
        self.date_added
            .as_deref()
            .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
    }
}

/// Body of `PUT /api/pulls/:id`. Always a full replace.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PullUpdate {
    pub customer_id: EntityId,
    pub comic_id: EntityId,
    pub quantity: Quantity,
}

/// Body of `POST /api/customers/:id/pulls`: the comic being held plus the copy count.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewPull {
    #[serde(flatten)]
    pub comic: Comic,
    pub comic_id: EntityId,
    pub quantity: Quantity,
}

impl NewPull {
    pub fn for_comic(comic: Comic) -> Self {
        Self {
            comic_id: comic.id.clone(),
            comic,
            quantity: Quantity::default(),
        }
    }
}

/// What the user picked to add to a pull list.
#[derive(Clone, Debug, PartialEq)]
pub enum ComicSelection {
    /// A comic already in the catalog.
    Existing(Comic),
    /// An ad hoc entry that must be created first.
    Custom { title: String, publisher: String },
}

/// Number of copies held. Never below one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity is required")]
    Missing,
    #[error("quantity must be a whole number, got {0:?}")]
    NotANumber(String),
    #[error("quantity must be at least 1")]
    TooSmall,
}

impl Quantity {
    pub const MIN: u32 = 1;

    pub fn new(value: u32) -> Result<Self, QuantityError> {
        if value < Self::MIN {
            return Err(QuantityError::TooSmall);
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QuantityError::Missing);
        }
        if trimmed.starts_with('-') && trimmed[1..].chars().all(|c| c.is_ascii_digit()) {
            return Err(QuantityError::TooSmall);
        }
        let value = trimmed
            .parse::<u32>()
            .map_err(|_| QuantityError::NotANumber(trimmed.to_string()))?;
        Self::new(value)
    }
}

impl Quantity {
    /// Stored quantities were never validated, so anything unusable reads as the default.
    fn from_stored(raw: Option<f64>) -> Self {
        match raw {
            Some(value)
                if value.is_finite()
                    && value.fract() == 0.0
                    && value >= f64::from(Self::MIN)
                    && value <= f64::from(u32::MAX) =>
            {
                Self(value as u32)
            }
            other => {
                tracing::warn!(stored = ?other, "unusable stored quantity, using default");
                Self::default()
            }
        }
    }
}

/// Server values are read leniently. User input goes through `FromStr`.
impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct StoredQuantity;

        impl<'de> serde::de::Visitor<'de> for StoredQuantity {
            type Value = Option<f64>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a quantity as a number, numeric string or null")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(value as f64))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(value as f64))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value.trim().parse::<f64>().ok())
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(None)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }
        }

        let raw = deserializer.deserialize_any(StoredQuantity)?;
        Ok(Quantity::from_stored(raw))
    }
}

fn string_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct StringOrNumber;

    impl<'de> serde::de::Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}
