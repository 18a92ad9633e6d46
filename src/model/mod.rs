//! Document records as consumed from the classification service
//!
//! This module defines the wire shape of a processed document:
//! - `DocumentRecord`: one document with display names and timestamps
//! - `Classification`: the optional vendor/amount/GL sub-record
//! - `PaymentStatus`: closed set of payment states, with a catch-all
//!
//! Every field is optional. Decoding never rejects a record because a field
//! is missing, `null`, or of a loosely compatible type (a numeric string for
//! `amount`, a number for `id`).

pub mod envelope;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub use envelope::unwrap_records;

/// One processed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Opaque identifier
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    /// Display name assigned after processing
    #[serde(default, deserialize_with = "lenient_string")]
    pub filename: Option<String>,

    /// Name of the file as uploaded
    #[serde(default, deserialize_with = "lenient_string")]
    pub original_filename: Option<String>,

    /// ISO-8601 creation timestamp
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,

    /// Processing status (`manual_review`, `processed`, ...)
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,

    /// Owning tenant
    #[serde(default, deserialize_with = "lenient_string")]
    pub tenant_id: Option<String>,

    /// Classification result, absent for unclassified documents
    #[serde(default)]
    pub classification: Option<Classification>,
}

/// Classification sub-record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default, deserialize_with = "lenient_string")]
    pub vendor_name: Option<String>,

    /// Invoice total
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,

    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub gl_account_code: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub expense_category: Option<String>,

    /// Downstream billing queue
    #[serde(default, deserialize_with = "lenient_string")]
    pub routing_destination: Option<String>,

    /// Category confidence on a 0-100 scale
    #[serde(default, deserialize_with = "lenient_number")]
    pub category_confidence: Option<f64>,
}

/// Payment state of a classified document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    Partial,
    Void,
    /// Any value the service sends that is not one of the above
    Unknown,
}

impl PaymentStatus {
    /// Parse a wire value; unrecognized text maps to `Unknown`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => PaymentStatus::Paid,
            "unpaid" => PaymentStatus::Unpaid,
            "partial" => PaymentStatus::Partial,
            "void" => PaymentStatus::Void,
            _ => PaymentStatus::Unknown,
        }
    }

    /// Lowercase wire form
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Void => "void",
            PaymentStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => PaymentStatus::parse(&s),
            _ => PaymentStatus::Unknown,
        })
    }
}

impl DocumentRecord {
    /// Name shown for the document: `filename`, then `original_filename`
    pub fn display_name(&self) -> &str {
        self.filename
            .as_deref()
            .or(self.original_filename.as_deref())
            .unwrap_or("")
    }

    pub fn vendor_name(&self) -> Option<&str> {
        self.classification.as_ref()?.vendor_name.as_deref()
    }

    pub fn gl_account_code(&self) -> Option<&str> {
        self.classification.as_ref()?.gl_account_code.as_deref()
    }

    pub fn payment_status(&self) -> Option<PaymentStatus> {
        self.classification.as_ref()?.payment_status
    }

    /// Amount with the documented default of 0
    pub fn amount_or_zero(&self) -> f64 {
        self.classification
            .as_ref()
            .and_then(|c| c.amount)
            .unwrap_or(0.0)
    }
}

impl AsRef<DocumentRecord> for DocumentRecord {
    fn as_ref(&self) -> &DocumentRecord {
        self
    }
}

/// Accept strings, numbers and booleans as text; `null` as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Accept JSON numbers and numeric strings; anything else is absent
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}
