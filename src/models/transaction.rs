//! Raw transaction events consumed by the analytics engine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::error::InputError;

/// Settlement status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Completed,
    Failed,
    Pending,
    PendingAuthorized,
    Cancelled,
    #[serde(other)]
    Other,
}

impl TransactionStatus {
    pub fn is_successful(self) -> bool {
        matches!(self, TransactionStatus::Completed)
    }

    pub fn is_failed(self) -> bool {
        matches!(self, TransactionStatus::Failed)
    }
}

/// A single transaction as handed over by the data-access layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub timestamp: DateTime<Utc>,
    pub amount: Decimal,
    pub status: TransactionStatus,
    #[serde(default)]
    pub fee: Decimal,
    #[serde(default)]
    pub is_reversed: bool,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transaction_type_id: Option<i64>,
}

impl TransactionRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        amount: Decimal,
        status: TransactionStatus,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            amount,
            status,
            fee: Decimal::ZERO,
            is_reversed: false,
            currency: currency.into(),
            channel: None,
            transaction_type_id: None,
        }
    }

    /// Amounts and fees are never negative; refunds arrive as reversals
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [("amount", self.amount), ("fee", self.fee)] {
            if value < Decimal::ZERO {
                return Err(InputError::Negative {
                    subject: format!("transaction at {}", self.timestamp.to_rfc3339()),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.fee = fee;
        self
    }

    pub fn reversed(mut self) -> Self {
        self.is_reversed = true;
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_transaction_type(mut self, transaction_type_id: i64) -> Self {
        self.transaction_type_id = Some(transaction_type_id);
        self
    }
}
