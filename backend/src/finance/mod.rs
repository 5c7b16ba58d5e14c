//! Money: accounts, double-entry transfers and the companies that own ships

pub mod company;
pub mod ledger;

pub use company::Company;
pub use ledger::{format_credits, Account, FinanceError, Ledger, LedgerEntry, TransferRecord};
