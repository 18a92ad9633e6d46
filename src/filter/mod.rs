//! Search and quick-filter evaluation over an in-memory document list
//!
//! [`filter`] returns borrowed records in their original relative order. It
//! never sorts, never mutates, and treats "nothing matched" as an empty
//! result rather than an error.
//!
//! Predicates combine conjunctively:
//! - free-text query over filename, vendor name and GL account code
//! - one quick-filter preset
//! - optional structured bounds (status, payment status, amount, date)

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AsrError, InputError};
use crate::extract::parse_created_date;
use crate::model::{DocumentRecord, PaymentStatus};

/// Default amount at or above which a document counts as high value
pub const DEFAULT_HIGH_VALUE_THRESHOLD: f64 = 10_000.0;

/// Status value that marks a document as waiting for manual review
pub const MANUAL_REVIEW_STATUS: &str = "manual_review";

/// Single-click filter presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickFilter {
    #[default]
    All,
    ManualReview,
    Unpaid,
    HighValue,
}

impl QuickFilter {
    pub const ALL: [QuickFilter; 4] = [
        QuickFilter::All,
        QuickFilter::ManualReview,
        QuickFilter::Unpaid,
        QuickFilter::HighValue,
    ];

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            QuickFilter::All => "All Documents",
            QuickFilter::ManualReview => "Manual Review",
            QuickFilter::Unpaid => "Unpaid",
            QuickFilter::HighValue => "High Value",
        }
    }

    /// Whether `record` passes this preset
    pub fn matches(&self, record: &DocumentRecord, high_value_threshold: f64) -> bool {
        match self {
            QuickFilter::All => true,
            QuickFilter::ManualReview => record.status.as_deref() == Some(MANUAL_REVIEW_STATUS),
            QuickFilter::Unpaid => record.payment_status() == Some(PaymentStatus::Unpaid),
            QuickFilter::HighValue => record.amount_or_zero() >= high_value_threshold,
        }
    }
}

impl fmt::Display for QuickFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuickFilter::All => "all",
            QuickFilter::ManualReview => "manual-review",
            QuickFilter::Unpaid => "unpaid",
            QuickFilter::HighValue => "high-value",
        };
        f.write_str(name)
    }
}

impl FromStr for QuickFilter {
    type Err = AsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "all" | "all-documents" => Ok(QuickFilter::All),
            "manual-review" => Ok(QuickFilter::ManualReview),
            "unpaid" => Ok(QuickFilter::Unpaid),
            "high-value" => Ok(QuickFilter::HighValue),
            _ => Err(InputError::UnknownQuickFilter(s.to_string()).into()),
        }
    }
}

/// Query descriptor applied by [`filter`]
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Free-text query; empty matches everything
    pub query: Option<String>,

    /// Selected preset
    pub quick_filter: QuickFilter,

    /// Threshold used by [`QuickFilter::HighValue`]
    pub high_value_threshold: f64,

    /// Exact match on `status`
    pub status: Option<String>,

    /// Exact match on the classification payment status
    pub payment_status: Option<PaymentStatus>,

    /// Inclusive lower bound on amount (absent amount counts as 0)
    pub min_amount: Option<f64>,

    /// Inclusive upper bound on amount
    pub max_amount: Option<f64>,

    /// Inclusive lower bound on the `created_at` calendar date
    pub date_from: Option<NaiveDate>,

    /// Inclusive upper bound on the `created_at` calendar date
    pub date_to: Option<NaiveDate>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            query: None,
            quick_filter: QuickFilter::All,
            high_value_threshold: DEFAULT_HIGH_VALUE_THRESHOLD,
            status: None,
            payment_status: None,
            min_amount: None,
            max_amount: None,
            date_from: None,
            date_to: None,
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_quick_filter(mut self, quick_filter: QuickFilter) -> Self {
        self.quick_filter = quick_filter;
        self
    }

    pub fn with_high_value_threshold(mut self, threshold: f64) -> Self {
        self.high_value_threshold = threshold;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn with_amount_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Normalized query: trimmed, lowercased, `None` when blank
    fn needle(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether `record` passes every predicate
    pub fn matches(&self, record: &DocumentRecord) -> bool {
        self.matches_with_needle(record, self.needle().as_deref())
    }

    fn matches_with_needle(&self, record: &DocumentRecord, needle: Option<&str>) -> bool {
        if let Some(needle) = needle
            && !search_text(record).contains(needle)
        {
            return false;
        }

        if !self.quick_filter.matches(record, self.high_value_threshold) {
            return false;
        }

        if let Some(status) = &self.status
            && record.status.as_deref() != Some(status.as_str())
        {
            return false;
        }

        if let Some(payment_status) = self.payment_status
            && record.payment_status() != Some(payment_status)
        {
            return false;
        }

        let amount = record.amount_or_zero();
        if self.min_amount.is_some_and(|min| amount < min)
            || self.max_amount.is_some_and(|max| amount > max)
        {
            return false;
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = record.created_at.as_deref().and_then(parse_created_date) else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from)
                || self.date_to.is_some_and(|to| date > to)
            {
                return false;
            }
        }

        true
    }
}

/// Lowercased haystack for the free-text query
///
/// Fields are space separated so a query never matches across two fields.
fn search_text(record: &DocumentRecord) -> String {
    [
        record.filename.as_deref().unwrap_or(""),
        record.vendor_name().unwrap_or(""),
        record.gl_account_code().unwrap_or(""),
    ]
    .join(" ")
    .to_lowercase()
}

/// Apply `criteria` to `records`, preserving input order
pub fn filter<'a>(
    records: &'a [DocumentRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a DocumentRecord> {
    let needle = criteria.needle();
    records
        .iter()
        .filter(|record| criteria.matches_with_needle(record, needle.as_deref()))
        .collect()
}

/// Document count per quick-filter preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuickFilterCounts {
    pub all: usize,
    pub manual_review: usize,
    pub unpaid: usize,
    pub high_value: usize,
}

impl QuickFilterCounts {
    pub fn get(&self, filter: QuickFilter) -> usize {
        match filter {
            QuickFilter::All => self.all,
            QuickFilter::ManualReview => self.manual_review,
            QuickFilter::Unpaid => self.unpaid,
            QuickFilter::HighValue => self.high_value,
        }
    }

    /// Presets with their counts, in button order
    pub fn entries(&self) -> [(QuickFilter, usize); 4] {
        QuickFilter::ALL.map(|f| (f, self.get(f)))
    }
}

/// Count records per preset, for badging the quick-filter buttons
pub fn count_by_quick_filter(
    records: &[DocumentRecord],
    high_value_threshold: f64,
) -> QuickFilterCounts {
    let count = |filter: QuickFilter| {
        records
            .iter()
            .filter(|r| filter.matches(r, high_value_threshold))
            .count()
    };

    QuickFilterCounts {
        all: records.len(),
        manual_review: count(QuickFilter::ManualReview),
        unpaid: count(QuickFilter::Unpaid),
        high_value: count(QuickFilter::HighValue),
    }
}
