//! Balance display for the active wallet's Solana address.
//!
//! Queries are asynchronous and may resolve out of order. A response is only
//! applied if it was requested for the address currently being tracked;
//! anything else is a leftover from before a wallet switch and is dropped.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("balance query for {address} failed: {reason}")]
    Query { address: String, reason: String },
}

/// Remote source of chain balances, in the chain's smallest unit.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn get_balance(&self, address: &str) -> Result<u64, BalanceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Balance {
    lamports: u64,
}

impl Balance {
    #[must_use]
    pub fn from_lamports(lamports: u64) -> Self {
        Balance { lamports }
    }

    #[must_use]
    pub fn lamports(&self) -> u64 {
        self.lamports
    }

    /// Balance in SOL.
    #[must_use]
    pub fn display_units(&self) -> f64 {
        self.lamports as f64 / LAMPORTS_PER_SOL as f64
    }
}

impl std::fmt::Display for Balance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} SOL", self.display_units())
    }
}

/// Proof of which address a query was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct BalanceTicket {
    address: String,
    seq: u64,
}

impl BalanceTicket {
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Latest known balance of the tracked address.
#[derive(Debug, Default)]
pub struct BalanceTracker {
    address: Option<String>,
    balance: Option<Balance>,
    next_seq: u64,
    applied_seq: Option<u64>,
}

impl BalanceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// `None` while unknown: nothing tracked, nothing resolved yet, or the
    /// last query failed.
    #[must_use]
    pub fn balance(&self) -> Option<Balance> {
        self.balance
    }

    /// Switches the tracked address. The known balance is forgotten when the
    /// address changes.
    ///
    /// The tracker does not observe the wallet manager. Callers must call
    /// this (or [`BalanceTracker::request`]) after every active-wallet change,
    /// otherwise a late response for the previous wallet is still applied.
    pub fn track(&mut self, address: Option<&str>) {
        if self.address.as_deref() == address {
            return;
        }
        self.address = address.map(str::to_string);
        self.balance = None;
        self.applied_seq = None;
    }

    /// Tracks `address` and issues a ticket for a query against it.
    pub fn request(&mut self, address: &str) -> BalanceTicket {
        self.track(Some(address));
        self.next_seq += 1;
        BalanceTicket {
            address: address.to_string(),
            seq: self.next_seq,
        }
    }

    /// Applies a query result. Returns `false` when the response was stale
    /// and dropped.
    ///
    /// For the tracked address, the response that arrives last wins unless a
    /// later-issued response was already applied. Staleness is judged against
    /// the tracked address only; see [`BalanceTracker::track`].
    pub fn resolve(&mut self, ticket: BalanceTicket, result: Result<u64, BalanceError>) -> bool {
        if self.address.as_deref() != Some(ticket.address.as_str()) {
            debug!(address = %ticket.address, "dropping stale balance response");
            return false;
        }
        if self.applied_seq.is_some_and(|applied| applied > ticket.seq) {
            debug!(address = %ticket.address, "dropping superseded balance response");
            return false;
        }

        self.applied_seq = Some(ticket.seq);
        self.balance = match result {
            Ok(lamports) => Some(Balance::from_lamports(lamports)),
            Err(e) => {
                debug!(error = %e, "balance unknown");
                None
            }
        };
        true
    }

    /// Queries `source` for `address` and applies the result.
    pub async fn refresh<B: BalanceSource + ?Sized>(
        &mut self,
        source: &B,
        address: &str,
    ) -> Option<Balance> {
        let ticket = self.request(address);
        let result = source.get_balance(address).await;
        self.resolve(ticket, result);
        self.balance
    }
}
