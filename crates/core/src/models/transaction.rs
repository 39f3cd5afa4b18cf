use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar;

/// Direction of a transaction. The amount itself is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money put into the balance
    #[default]
    Addition,
    /// Money taken out of the balance
    Withdrawal,
}

impl TransactionType {
    /// +1 for additions, -1 for withdrawals.
    pub fn sign(self) -> f64 {
        match self {
            TransactionType::Addition => 1.0,
            TransactionType::Withdrawal => -1.0,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Addition => write!(f, "addition"),
            TransactionType::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

/// A single dated addition or withdrawal on a profile.
///
/// `date` keeps its `YYYY-MM-DD` wire form so that imported documents with
/// malformed dates still load; such transactions simply contribute nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque unique identifier
    pub id: String,

    /// Calendar date of the transaction (`YYYY-MM-DD`)
    pub date: String,

    /// Always positive; the sign lives in `transaction_type`
    pub amount: f64,

    #[serde(rename = "type", default)]
    pub transaction_type: TransactionType,

    #[serde(default)]
    pub note: String,

    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        transaction_type: TransactionType,
        amount: f64,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: calendar::format_date(date),
            amount,
            transaction_type,
            note: String::new(),
            created_at,
        }
    }

    /// Attach a free-text note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// The parsed calendar date, or `None` if the stored date is malformed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        calendar::parse_date(&self.date)
    }

    /// Amount with its direction applied.
    pub fn signed_amount(&self) -> f64 {
        self.transaction_type.sign() * self.amount
    }
}

/// A transaction as entered at the boundary, before ids and timestamps
/// are assigned. Missing fields take their defaults on insert.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewTransaction {
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub transaction_type: TransactionType,
    pub note: Option<String>,
}

impl NewTransaction {
    pub fn addition(amount: f64, date: NaiveDate) -> Self {
        Self {
            amount,
            date: Some(date),
            transaction_type: TransactionType::Addition,
            note: None,
        }
    }

    pub fn withdrawal(amount: f64, date: NaiveDate) -> Self {
        Self {
            amount,
            date: Some(date),
            transaction_type: TransactionType::Withdrawal,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
