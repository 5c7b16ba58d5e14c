//! Trading company that owns a starship
//!
//! A company holds one cash account plus one account per outside party it
//! has dealt with (fuel depots, brokers, the crew, a patron...). Every
//! payment is a ledger transfer between cash and one of those accounts, so
//! the company's accounts always sum to zero: its cash balance is mirrored
//! by what the outside world has paid in or taken out.

use super::ledger::{Account, FinanceError, Ledger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    name: String,
    serial: Uuid,
    ledger: Ledger,
    cash: Account,
    /// Outside accounts keyed by name, created on first use
    counterparties: BTreeMap<String, Account>,
}

impl Company {
    /// Create a company and pay in its starting capital
    ///
    /// Positive capital is transferred at time zero from an
    /// `"<name> - Owner Capital"` account with memo `"Initial capitalization"`.
    ///
    /// # Errors
    /// `FinanceError::NegativeCapital` when `starting_capital < 0`
    ///
    /// # Example
    /// ```
    /// use t5sim_core::Company;
    ///
    /// let company = Company::new("Trader_001", 1_000_000).unwrap();
    /// assert_eq!(company.balance(), 1_000_000);
    /// assert_eq!(company.cash().name(), "Trader_001 - Cash");
    /// assert_eq!(company.cash().entries()[0].memo, "Initial capitalization");
    /// ```
    pub fn new(name: impl Into<String>, starting_capital: i64) -> Result<Self, FinanceError> {
        if starting_capital < 0 {
            return Err(FinanceError::NegativeCapital(starting_capital));
        }
        let name = name.into();
        let mut company = Self {
            cash: Account::new(format!("{} - Cash", name)),
            serial: Uuid::new_v4(),
            ledger: Ledger::new(),
            counterparties: BTreeMap::new(),
            name,
        };
        if starting_capital > 0 {
            let owner = format!("{} - Owner Capital", company.name);
            company.receive(0.0, &owner, starting_capital, "Initial capitalization")?;
        }
        Ok(company)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn serial(&self) -> Uuid {
        self.serial
    }

    /// Cash on hand
    pub fn balance(&self) -> i64 {
        self.cash.balance()
    }

    pub fn cash(&self) -> &Account {
        &self.cash
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn counterparty(&self, name: &str) -> Option<&Account> {
        self.counterparties.get(name)
    }

    pub fn counterparties(&self) -> impl Iterator<Item = &Account> {
        self.counterparties.values()
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        self.cash.balance() >= amount
    }

    /// Sum over cash and every counterparty account (zero by construction)
    pub fn net_position(&self) -> i64 {
        self.cash.balance()
            + self
                .counterparties
                .values()
                .map(Account::balance)
                .sum::<i64>()
    }

    /// Credit cash from the named outside account
    pub fn receive(
        &mut self,
        time: f64,
        from: &str,
        amount: i64,
        memo: &str,
    ) -> Result<(), FinanceError> {
        let source = self
            .counterparties
            .entry(from.to_string())
            .or_insert_with(|| Account::new(from));
        self.ledger
            .transfer(time, source, &mut self.cash, amount, memo)
    }

    /// Debit cash to the named outside account
    ///
    /// # Errors
    /// `FinanceError::InsufficientFunds` if cash would go negative; nothing
    /// is posted in that case.
    pub fn pay(&mut self, time: f64, to: &str, amount: i64, memo: &str) -> Result<(), FinanceError> {
        if amount > self.cash.balance() {
            return Err(FinanceError::InsufficientFunds {
                required: amount,
                available: self.cash.balance(),
            });
        }
        let sink = self
            .counterparties
            .entry(to.to_string())
            .or_insert_with(|| Account::new(to));
        self.ledger.transfer(time, &mut self.cash, sink, amount, memo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_capital_rejected() {
        assert_eq!(
            Company::new("Broke Co", -1).unwrap_err(),
            FinanceError::NegativeCapital(-1)
        );
    }

    #[test]
    fn test_zero_capital_posts_nothing() {
        let company = Company::new("Empty Co", 0).unwrap();
        assert_eq!(company.balance(), 0);
        assert!(company.cash().entries().is_empty());
        assert_eq!(company.counterparties().count(), 0);
    }

    #[test]
    fn test_overdraft_refused_without_posting() {
        let mut company = Company::new("Thin Co", 100).unwrap();
        let err = company.pay(1.0, "Shipyard", 101, "repairs").unwrap_err();
        assert_eq!(
            err,
            FinanceError::InsufficientFunds {
                required: 101,
                available: 100
            }
        );
        assert_eq!(company.cash().entries().len(), 1);
        assert!(company.counterparty("Shipyard").is_none());
    }

    #[test]
    fn test_counterparty_mirrors_cash() {
        let mut company = Company::new("Mirror Co", 500).unwrap();
        company.pay(1.0, "Depot", 200, "fuel").unwrap();
        company.receive(2.0, "Brokers", 50, "cargo").unwrap();
        assert_eq!(company.counterparty("Depot").unwrap().balance(), 200);
        assert_eq!(company.counterparty("Brokers").unwrap().balance(), -50);
        assert_eq!(company.net_position(), 0);
    }
}
