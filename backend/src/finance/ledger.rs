//! Double-entry bookkeeping
//!
//! Money only ever moves between two [`Account`]s through
//! [`Ledger::transfer`], which posts a debit on one side and a matching
//! credit on the other. The sum of all balances therefore never changes.
//!
//! CRITICAL: All money values are i64 Credits

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by accounts, transfers and companies
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FinanceError {
    #[error("Invalid transfer: {0}")]
    InvalidTransfer(&'static str),

    #[error("Starting capital cannot be negative (got Cr{0})")]
    NegativeCapital(i64),

    #[error("Insufficient funds: required Cr{required}, available Cr{available}")]
    InsufficientFunds { required: i64, available: i64 },
}

/// Render an amount as `Cr1,234,567` (negative amounts as `-Cr1,234`)
///
/// ```
/// use t5sim_core::finance::format_credits;
///
/// assert_eq!(format_credits(1_100_000), "Cr1,100,000");
/// assert_eq!(format_credits(-250), "-Cr250");
/// assert_eq!(format_credits(0), "Cr0");
/// ```
pub fn format_credits(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-Cr{}", grouped)
    } else {
        format!("Cr{}", grouped)
    }
}

/// One posting on an account
///
/// Entries are appended by the ledger and never edited afterwards; accounts
/// only hand them out as shared slices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Simulated time of the posting, in days
    pub time: f64,
    /// Signed amount: positive credits, negative debits
    pub amount: i64,
    /// Account balance right after this posting
    pub balance_after: i64,
    pub memo: String,
    /// Name of the account on the other side of the transfer
    pub counterparty: Option<String>,
}

/// A named balance with its full posting history
///
/// # Example
/// ```
/// use t5sim_core::Account;
///
/// let mut account = Account::new("Scratch");
/// account.post(0.0, 250, "opening", None);
/// account.post(1.5, -100, "fee", Some("Bank".to_string()));
/// assert_eq!(account.balance(), 150);
/// assert_eq!(account.entries().len(), 2);
/// assert_eq!(account.entries()[1].balance_after, 150);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    name: String,
    serial: Uuid,
    balance: i64,
    entries: Vec<LedgerEntry>,
}

impl Account {
    /// New account with a zero balance
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            serial: Uuid::new_v4(),
            balance: 0,
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn serial(&self) -> Uuid {
        self.serial
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Postings in the order they were made
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Apply a signed amount and record it
    pub fn post(
        &mut self,
        time: f64,
        amount: i64,
        memo: impl Into<String>,
        counterparty: Option<String>,
    ) {
        self.balance += amount;
        self.entries.push(LedgerEntry {
            time,
            amount,
            balance_after: self.balance,
            memo: memo.into(),
            counterparty,
        });
    }
}

/// A completed transfer as seen from the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub time: f64,
    pub from: String,
    pub to: String,
    pub amount: i64,
    pub memo: String,
}

/// Journal of transfers between accounts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    transfers: Vec<TransferRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `amount` from one account to another
    ///
    /// Posts `-amount` on `from` and `+amount` on `to`, each naming the other
    /// as counterparty. Overdrafts are allowed here; callers decide whether a
    /// negative balance is acceptable.
    ///
    /// # Errors
    /// - `amount` is negative
    /// - both sides are the same account
    ///
    /// # Example
    /// ```
    /// use t5sim_core::{Account, Ledger};
    ///
    /// let mut ledger = Ledger::new();
    /// let mut a = Account::new("A");
    /// let mut b = Account::new("B");
    /// ledger.transfer(0.0, &mut a, &mut b, 40, "rent").unwrap();
    /// assert_eq!(a.balance() + b.balance(), 0);
    /// assert_eq!(b.entries()[0].counterparty.as_deref(), Some("A"));
    /// ```
    pub fn transfer(
        &mut self,
        time: f64,
        from: &mut Account,
        to: &mut Account,
        amount: i64,
        memo: &str,
    ) -> Result<(), FinanceError> {
        if amount < 0 {
            return Err(FinanceError::InvalidTransfer(
                "transfer amount cannot be negative",
            ));
        }
        if from.serial == to.serial {
            return Err(FinanceError::InvalidTransfer(
                "cannot transfer to the same account",
            ));
        }

        from.post(time, -amount, memo, Some(to.name.clone()));
        to.post(time, amount, memo, Some(from.name.clone()));
        self.transfers.push(TransferRecord {
            time,
            from: from.name.clone(),
            to: to.name.clone(),
            amount,
            memo: memo.to_string(),
        });
        Ok(())
    }

    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_transfer_rejected() {
        let mut ledger = Ledger::new();
        let mut a = Account::new("A");
        let mut b = Account::new("B");
        let err = ledger.transfer(0.0, &mut a, &mut b, -5, "x").unwrap_err();
        assert_eq!(
            err,
            FinanceError::InvalidTransfer("transfer amount cannot be negative")
        );
        assert!(a.entries().is_empty());
        assert!(b.entries().is_empty());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_self_transfer_rejected() {
        let mut ledger = Ledger::new();
        let mut a = Account::new("A");
        let mut twin = a.clone();
        let err = ledger.transfer(0.0, &mut a, &mut twin, 5, "x").unwrap_err();
        assert_eq!(
            err,
            FinanceError::InvalidTransfer("cannot transfer to the same account")
        );
    }

    #[test]
    fn test_zero_transfer_still_posts() {
        let mut ledger = Ledger::new();
        let mut a = Account::new("A");
        let mut b = Account::new("B");
        ledger.transfer(2.0, &mut a, &mut b, 0, "nothing").unwrap();
        assert_eq!(a.entries().len(), 1);
        assert_eq!(b.entries().len(), 1);
        assert_eq!(ledger.transfers()[0].amount, 0);
    }
}
