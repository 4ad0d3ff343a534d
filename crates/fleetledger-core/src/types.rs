//! Basic types for the accounting module

use serde::{Deserialize, Serialize};

/// Kind of a chart-of-accounts node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Classification node that holds children
    Group,
    /// Ledger account that carries a balance
    Account,
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Account
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "group" => Ok(NodeKind::Group),
            "account" | "ledger" => Ok(NodeKind::Account),
            _ => Err(format!("Invalid node kind: {}", s)),
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Group => write!(f, "group"),
            NodeKind::Account => write!(f, "account"),
        }
    }
}

/// Journal entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    General,
    Adjustment,
    Closing,
}

impl EntryType {
    pub const ALL: [EntryType; 3] = [EntryType::General, EntryType::Adjustment, EntryType::Closing];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            EntryType::General => "General Entry",
            EntryType::Adjustment => "Adjustment",
            EntryType::Closing => "Closing Entry",
        }
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general" => Ok(EntryType::General),
            "adjustment" => Ok(EntryType::Adjustment),
            "closing" => Ok(EntryType::Closing),
            _ => Err(format!("Invalid entry type: {}", s)),
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::General => write!(f, "general"),
            EntryType::Adjustment => write!(f, "adjustment"),
            EntryType::Closing => write!(f, "closing"),
        }
    }
}

/// Editable field of a journal line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineField {
    Account,
    Description,
    Debit,
    Credit,
}

impl std::str::FromStr for LineField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "account" => Ok(LineField::Account),
            "description" => Ok(LineField::Description),
            "debit" => Ok(LineField::Debit),
            "credit" => Ok(LineField::Credit),
            _ => Err(format!("Invalid line field: {}", s)),
        }
    }
}

impl std::fmt::Display for LineField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineField::Account => write!(f, "account"),
            LineField::Description => write!(f, "description"),
            LineField::Debit => write!(f, "debit"),
            LineField::Credit => write!(f, "credit"),
        }
    }
}
