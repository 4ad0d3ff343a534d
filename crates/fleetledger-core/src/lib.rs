//! Accounting business logic for the fleet operator back office
//!
//! - [`chart`]: chart of accounts tree, insertion and visible-row traversal
//! - [`journal`]: journal entry composition and the balanced gate
//! - [`preferences`]: language and theme shared by every page
//!
//! A [`Workspace`] bundles the state one browser session owns.

pub mod chart;
pub mod error;
pub mod journal;
pub mod preferences;
pub mod types;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use chart::{AccountNode, AccountTree, ChartOfAccounts, ExpansionState, NewAccount, NodeId};
pub use error::{
    CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity,
};
pub use journal::{EntryHeader, JournalEntry, JournalLine, PostedEntry};
pub use preferences::{Direction, Preferences};
pub use types::{EntryType, LineField, NodeKind};

/// Everything a single session works on
#[derive(Debug, Clone)]
pub struct Workspace {
    pub chart: ChartOfAccounts,
    pub expansion: ExpansionState,
    pub entry: JournalEntry,
    posted: Vec<PostedEntry>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(ChartOfAccounts::seeded())
    }
}

impl Workspace {
    /// Fresh session state starting from `chart`
    pub fn new(chart: ChartOfAccounts) -> Self {
        Self {
            chart,
            expansion: ExpansionState::new(),
            entry: JournalEntry::new(),
            posted: Vec::new(),
        }
    }

    /// Post the current entry and start a new one.
    ///
    /// On rejection the composition is kept as is.
    pub fn post_entry(&mut self) -> CoreResult<&PostedEntry> {
        let posted = self.entry.post()?;
        log::info!(
            "Posted journal entry '{}' for {} over {} lines",
            posted.header.reference,
            posted.total,
            posted.lines.len()
        );
        self.entry.reset();
        self.posted.push(posted);
        Ok(&self.posted[self.posted.len() - 1])
    }

    /// Entries posted in this session, oldest first
    pub fn posted(&self) -> &[PostedEntry] {
        &self.posted
    }

    /// Top-level groups with the sum of their ledger balances
    pub fn group_summaries(&self) -> Vec<GroupSummary> {
        self.chart
            .roots()
            .iter()
            .filter_map(|&id| {
                let node = self.chart.get(id)?;
                Some(GroupSummary {
                    code: node.code.clone(),
                    name: node.name.clone(),
                    total: self.chart.subtotal(id),
                    accounts: self.chart_accounts_under(id),
                })
            })
            .collect()
    }

    fn chart_accounts_under(&self, id: NodeId) -> usize {
        match self.chart.get(id) {
            Some(node) if node.is_group() => node
                .children()
                .iter()
                .map(|&c| self.chart_accounts_under(c))
                .sum(),
            Some(_) => 1,
            None => 0,
        }
    }

    /// Totals and gate state of the entry being composed
    pub fn journal_status(&self) -> JournalStatus {
        JournalStatus {
            lines: self.entry.lines().to_vec(),
            total_debit: self.entry.total_debit(),
            total_credit: self.entry.total_credit(),
            difference: self.entry.difference(),
            balanced: self.entry.is_balanced(),
        }
    }
}

/// Dashboard figure for one top-level group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub code: String,
    pub name: String,
    pub total: Decimal,
    /// Ledger accounts below the group
    pub accounts: usize,
}

/// Journal composer state for the status banner and the JSON API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalStatus {
    pub lines: Vec<JournalLine>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub difference: Decimal,
    pub balanced: bool,
}
