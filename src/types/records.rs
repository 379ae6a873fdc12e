//! Raw records served by the rental backend
//!
//! These mirror the JSON payloads of the reservations, expenses and
//! maintenance endpoints. Every field the adapters may need to reject a record
//! on is optional here; validation belongs to the adapters, not to decoding.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::transaction::RecordId;

/// Reservation as returned by `GET /reservations/agency/{id}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    pub id: RecordId,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp")]
    pub start_date: Option<DateTime<Utc>>,
    pub total_amount: Option<Decimal>,
    pub invoice: Option<InvoiceRecord>,
    /// Car model display name
    pub model: Option<String>,
    pub car_license_plate: Option<String>,
    pub status: Option<String>,
}

/// Invoice nested in a reservation
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub id: Option<RecordId>,
    pub invoice_number: Option<String>,
    pub total_amount: Option<Decimal>,
}

/// Expense as returned by `GET /expenses/agency/{id}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: RecordId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
}

/// Maintenance record as returned by `GET /maintenance/agency/{id}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: RecordId,
    pub car_id: Option<String>,
    #[serde(default, with = "timestamp")]
    pub scheduled_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub cost: Option<Decimal>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, with = "timestamp")]
    pub completed_date: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
    pub car_license_plate: Option<String>,
}

/// One element of a source collection, decoded on its own
///
/// A payload element that does not decode as `T` (unparseable timestamp,
/// non-numeric amount, missing id, not an object) is kept as `Malformed` so
/// the rest of its collection still loads.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRecord<T> {
    Valid(T),
    Malformed {
        /// The element's `id` when readable, its `#<position>` otherwise
        record_id: RecordId,
        /// Decoder message
        reason: String,
    },
}

impl<T: DeserializeOwned> SourceRecord<T> {
    /// Decode the element found at `position` of its collection
    pub fn decode(position: usize, value: Value) -> Self {
        let record_id = match value.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => format!("#{}", position),
        };

        match serde_json::from_value(value) {
            Ok(record) => SourceRecord::Valid(record),
            Err(error) => SourceRecord::Malformed {
                record_id,
                reason: error.to_string(),
            },
        }
    }
}

impl<T> From<T> for SourceRecord<T> {
    fn from(record: T) -> Self {
        SourceRecord::Valid(record)
    }
}

/// Lenient timestamp (de)serialization
///
/// The backend emits RFC 3339 instants, but older endpoints omit the offset
/// (`2024-01-05T09:30:00`) or send a bare date. Offset-less values are taken
/// as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Parse a backend timestamp
    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        let value = value.trim();

        if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
            return Some(instant.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw))),
        }
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(instant) => serializer.serialize_some(&instant.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}
