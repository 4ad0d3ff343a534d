//! Chart of accounts
//!
//! The tree is an arena of [`AccountNode`]s addressed by [`NodeId`], with
//! parent/child links stored as indices and lookup maps by code and by id.
//! Nodes are only ever appended: there is no removal or reparenting, so a
//! `NodeId` stays valid for the life of the chart and of its clones.
//!
//! Expand/collapse state is presentation state and lives outside the tree in
//! [`ExpansionState`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{CoreError, CoreResult};
use crate::types::NodeKind;

/// Index of a node inside its chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Kind-specific payload of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeDetail {
    Group { children: Vec<NodeId> },
    Account { balance: Decimal },
}

/// A group or ledger account in the chart
#[derive(Debug, Clone, PartialEq)]
pub struct AccountNode {
    /// Stable opaque identifier
    pub id: String,
    /// Lookup key, unique across the chart (e.g. "1110")
    pub code: String,
    /// Display label
    pub name: String,
    parent: Option<NodeId>,
    detail: NodeDetail,
}

impl AccountNode {
    pub fn kind(&self) -> NodeKind {
        match self.detail {
            NodeDetail::Group { .. } => NodeKind::Group,
            NodeDetail::Account { .. } => NodeKind::Account,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.detail, NodeDetail::Group { .. })
    }

    /// Balance of a ledger account; groups have none
    pub fn balance(&self) -> Option<Decimal> {
        match self.detail {
            NodeDetail::Account { balance } => Some(balance),
            NodeDetail::Group { .. } => None,
        }
    }

    /// Children in display order; empty for ledger accounts
    pub fn children(&self) -> &[NodeId] {
        match &self.detail {
            NodeDetail::Group { children } => children,
            NodeDetail::Account { .. } => &[],
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn detail(&self) -> &NodeDetail {
        &self.detail
    }
}

/// Nested, serialisable form of a chart used by the JSON API and seed files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountTree {
    #[serde(default)]
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AccountTree>>,
}

impl AccountTree {
    pub fn group(id: &str, code: &str, name: &str, children: Vec<AccountTree>) -> Self {
        Self {
            id: id.to_string(),
            code: code.to_string(),
            name: name.to_string(),
            kind: NodeKind::Group,
            balance: None,
            children: Some(children),
        }
    }

    pub fn account(id: &str, code: &str, name: &str, balance: i64) -> Self {
        Self {
            id: id.to_string(),
            code: code.to_string(),
            name: name.to_string(),
            kind: NodeKind::Account,
            balance: Some(Decimal::from(balance)),
            children: None,
        }
    }
}

/// Request to add a node under an existing group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAccount {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub parent_code: String,
}

/// Ordered tree of groups and ledger accounts
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    nodes: Vec<AccountNode>,
    roots: Vec<NodeId>,
    by_code: HashMap<String, NodeId>,
    by_id: HashMap<String, NodeId>,
    next_seq: u64,
}

impl ChartOfAccounts {
    /// Chart with the built-in fleet operator hierarchy
    pub fn seeded() -> Self {
        let mut chart = Self::default();
        for tree in seed_tree() {
            chart.attach(None, tree);
        }
        chart
    }

    /// Build a chart from its nested form, rejecting duplicate codes or ids
    pub fn from_tree(mut trees: Vec<AccountTree>) -> CoreResult<Self> {
        fill_missing_ids(&mut trees, None);

        let mut codes = HashSet::new();
        let mut ids = HashSet::new();
        for tree in &trees {
            validate_tree(tree, &mut codes, &mut ids)?;
        }

        let mut chart = Self::default();
        for tree in trees {
            chart.attach(None, tree);
        }
        Ok(chart)
    }

    /// Parse a YAML list of top-level nodes
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let trees: Vec<AccountTree> = serde_yaml::from_str(content)
            .map_err(|e| CoreError::InvalidFormat { message: e.to_string() })?;
        Self::from_tree(trees)
    }

    /// Nested copy of the whole chart
    pub fn to_tree(&self) -> Vec<AccountTree> {
        self.roots.iter().map(|&id| self.build_subtree(id)).collect()
    }

    /// Nested copy of one node and everything below it
    pub fn subtree(&self, id: NodeId) -> Option<AccountTree> {
        self.nodes.get(id.0).map(|_| self.build_subtree(id))
    }

    fn build_subtree(&self, id: NodeId) -> AccountTree {
        let node = &self.nodes[id.0];
        AccountTree {
            id: node.id.clone(),
            code: node.code.clone(),
            name: node.name.clone(),
            kind: node.kind(),
            balance: node.balance(),
            children: match &node.detail {
                NodeDetail::Group { children } => {
                    Some(children.iter().map(|&c| self.build_subtree(c)).collect())
                }
                NodeDetail::Account { .. } => None,
            },
        }
    }

    fn attach(&mut self, parent: Option<NodeId>, tree: AccountTree) -> NodeId {
        let id = NodeId(self.nodes.len());
        let detail = match tree.kind {
            NodeKind::Group => NodeDetail::Group { children: Vec::new() },
            NodeKind::Account => NodeDetail::Account {
                balance: tree.balance.unwrap_or_default(),
            },
        };
        self.by_code.insert(tree.code.clone(), id);
        self.by_id.insert(tree.id.clone(), id);
        self.nodes.push(AccountNode {
            id: tree.id,
            code: tree.code,
            name: tree.name,
            parent,
            detail,
        });

        match parent {
            Some(p) => {
                if let NodeDetail::Group { children } = &mut self.nodes[p.0].detail {
                    children.push(id);
                }
            }
            None => self.roots.push(id),
        }

        if tree.kind == NodeKind::Group {
            for child in tree.children.unwrap_or_default() {
                self.attach(Some(id), child);
            }
        }
        id
    }

    /// Append a new node as the last child of the group `draft.parent_code`.
    ///
    /// Blank fields, an unknown or non-group parent, and an already used code
    /// are rejected without touching the chart. New ledger accounts start
    /// with a zero balance, new groups with no children.
    pub fn insert(&mut self, draft: &NewAccount) -> CoreResult<NodeId> {
        let code = draft.code.trim();
        let name = draft.name.trim();
        let parent_code = draft.parent_code.trim();

        for (field, value) in [("code", code), ("name", name), ("parent_code", parent_code)] {
            if value.is_empty() {
                return Err(CoreError::MissingField { field: field.to_string() });
            }
        }

        let parent = match self.by_code.get(parent_code) {
            Some(&p) if self.nodes[p.0].is_group() => p,
            _ => {
                return Err(CoreError::InvalidParent { code: parent_code.to_string() });
            }
        };

        if self.by_code.contains_key(code) {
            return Err(CoreError::DuplicateCode { code: code.to_string() });
        }

        self.next_seq += 1;
        let id = format!("{}-n{}", self.nodes[parent.0].id, self.next_seq);
        let tree = AccountTree {
            id,
            code: code.to_string(),
            name: name.to_string(),
            kind: draft.kind,
            balance: match draft.kind {
                NodeKind::Account => Some(Decimal::ZERO),
                NodeKind::Group => None,
            },
            children: None,
        };
        let node = self.attach(Some(parent), tree);
        log::debug!("Added {} {} under {}", draft.kind, code, parent_code);
        Ok(node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, id: NodeId) -> Option<&AccountNode> {
        self.nodes.get(id.0)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&AccountNode> {
        self.by_code.get(code).map(|&id| &self.nodes[id.0])
    }

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.by_id.get(id).copied()
    }

    /// Children of the node with `code`, in order
    pub fn children_of(&self, code: &str) -> Vec<&AccountNode> {
        self.find_by_code(code)
            .map(|node| node.children().iter().map(|&c| &self.nodes[c.0]).collect())
            .unwrap_or_default()
    }

    /// Distance from the top level (roots are 0)
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(id.0).and_then(|n| n.parent);
        while let Some(p) = current {
            depth += 1;
            current = self.nodes[p.0].parent;
        }
        depth
    }

    /// Every node in depth-first pre-order
    pub fn iter(&self) -> VisibleNodes<'_> {
        VisibleNodes::new(self, None)
    }

    /// Rows a tree view shows given the current expand/collapse state
    pub fn visible<'a>(&'a self, expansion: &'a ExpansionState) -> VisibleNodes<'a> {
        VisibleNodes::new(self, Some(expansion))
    }

    /// All groups in pre-order, the valid parents for [`ChartOfAccounts::insert`]
    pub fn groups(&self) -> Vec<&AccountNode> {
        self.iter().map(|row| row.node).filter(|n| n.is_group()).collect()
    }

    /// All ledger accounts in pre-order
    pub fn ledger_accounts(&self) -> Vec<&AccountNode> {
        self.iter().map(|row| row.node).filter(|n| !n.is_group()).collect()
    }

    /// Sum of ledger balances at or below `id`
    pub fn subtotal(&self, id: NodeId) -> Decimal {
        match self.nodes.get(id.0).map(|n| &n.detail) {
            Some(NodeDetail::Account { balance }) => *balance,
            Some(NodeDetail::Group { children }) => {
                children.iter().map(|&c| self.subtotal(c)).sum()
            }
            None => Decimal::ZERO,
        }
    }
}

fn fill_missing_ids(trees: &mut [AccountTree], prefix: Option<&str>) {
    for (i, tree) in trees.iter_mut().enumerate() {
        if tree.id.trim().is_empty() {
            tree.id = match prefix {
                Some(p) => format!("{}-{}", p, i + 1),
                None => (i + 1).to_string(),
            };
        }
        let id = tree.id.clone();
        if let Some(children) = tree.children.as_mut() {
            fill_missing_ids(children, Some(&id));
        }
    }
}

fn validate_tree(
    tree: &AccountTree,
    codes: &mut HashSet<String>,
    ids: &mut HashSet<String>,
) -> CoreResult<()> {
    if tree.code.trim().is_empty() {
        return Err(CoreError::MissingField { field: "code".to_string() });
    }
    if tree.name.trim().is_empty() {
        return Err(CoreError::MissingField { field: "name".to_string() });
    }
    if !codes.insert(tree.code.clone()) {
        return Err(CoreError::DuplicateCode { code: tree.code.clone() });
    }
    if !ids.insert(tree.id.clone()) {
        return Err(CoreError::InvalidFormat {
            message: format!("duplicate node id '{}'", tree.id),
        });
    }

    match (tree.kind, &tree.children) {
        (NodeKind::Account, Some(children)) if !children.is_empty() => {
            Err(CoreError::InvalidFormat {
                message: format!("account '{}' cannot have children", tree.code),
            })
        }
        (NodeKind::Group, Some(children)) => {
            for child in children {
                validate_tree(child, codes, ids)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

// ==================== Expand/Collapse ====================

/// Per-node expanded flags, keyed by node id.
///
/// Nodes without an explicit flag are expanded when they sit in the top two
/// levels.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    overrides: HashMap<String, bool>,
}

impl ExpansionState {
    /// Levels shown expanded until toggled
    pub const DEFAULT_EXPANDED_DEPTH: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, node: &AccountNode, depth: usize) -> bool {
        self.overrides
            .get(&node.id)
            .copied()
            .unwrap_or(depth < Self::DEFAULT_EXPANDED_DEPTH)
    }

    /// Flip one node and return its new state.
    ///
    /// Nodes without children have nothing to show and stay collapsed.
    pub fn toggle(&mut self, chart: &ChartOfAccounts, id: &str) -> CoreResult<bool> {
        let node_id = chart
            .node_id(id)
            .ok_or_else(|| CoreError::NodeNotFound { id: id.to_string() })?;
        let node = &chart.nodes[node_id.0];
        if !node.has_children() {
            return Ok(false);
        }
        let expanded = !self.is_expanded(node, chart.depth(node_id));
        self.overrides.insert(node.id.clone(), expanded);
        Ok(expanded)
    }
}

/// One row of a depth-first traversal
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    pub id: NodeId,
    pub node: &'a AccountNode,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// Lazy depth-first pre-order traversal.
///
/// Without an [`ExpansionState`] every node is visited.
pub struct VisibleNodes<'a> {
    chart: &'a ChartOfAccounts,
    expansion: Option<&'a ExpansionState>,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> VisibleNodes<'a> {
    fn new(chart: &'a ChartOfAccounts, expansion: Option<&'a ExpansionState>) -> Self {
        let stack = chart.roots.iter().rev().map(|&id| (id, 0)).collect();
        Self { chart, expansion, stack }
    }
}

impl<'a> Iterator for VisibleNodes<'a> {
    type Item = VisibleRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let node = &self.chart.nodes[id.0];
        let has_children = node.has_children();
        let expanded = has_children
            && self.expansion.map_or(true, |state| state.is_expanded(node, depth));
        if expanded {
            self.stack
                .extend(node.children().iter().rev().map(|&c| (c, depth + 1)));
        }
        Some(VisibleRow {
            id,
            node,
            depth,
            has_children,
            expanded,
        })
    }
}

// ==================== Seed Data ====================

/// Initial hierarchy every session starts from
#[rustfmt::skip]
pub fn seed_tree() -> Vec<AccountTree> {
    use AccountTree as T;
    vec![
        T::group("1", "1000", "Assets", vec![
            T::group("1-1", "1100", "Current Assets", vec![
                T::account("1-1-1", "1110", "Cash in Hand", 25_000),
                T::account("1-1-2", "1120", "Bank Accounts", 485_000),
                T::account("1-1-3", "1130", "Accounts Receivable", 125_000),
            ]),
            T::group("1-2", "1200", "Fixed Assets", vec![
                T::account("1-2-1", "1210", "Vehicles", 850_000),
                T::account("1-2-2", "1220", "Equipment", 45_000),
            ]),
        ]),
        T::group("2", "2000", "Liabilities", vec![
            T::group("2-1", "2100", "Current Liabilities", vec![
                T::account("2-1-1", "2110", "Accounts Payable", 78_000),
                T::account("2-1-2", "2120", "Driver Loans", 45_000),
            ]),
        ]),
        T::group("3", "3000", "Equity", vec![
            T::account("3-1", "3100", "Owner Capital", 500_000),
            T::account("3-2", "3200", "Retained Earnings", 280_000),
        ]),
        T::group("4", "4000", "Income", vec![
            T::account("4-1", "4100", "Delivery Revenue", 1_250_000),
            T::account("4-2", "4200", "Contract Revenue", 350_000),
        ]),
        T::group("5", "5000", "Expenses", vec![
            T::account("5-1", "5100", "Salaries & Wages", 420_000),
            T::account("5-2", "5200", "Fuel Expenses", 185_000),
            T::account("5-3", "5300", "Vehicle Maintenance", 65_000),
            T::account("5-4", "5400", "Insurance", 42_000),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(code: &str, name: &str, kind: NodeKind, parent: &str) -> NewAccount {
        NewAccount {
            code: code.to_string(),
            name: name.to_string(),
            kind,
            parent_code: parent.to_string(),
        }
    }

    #[test]
    fn test_seeded_shape() {
        let chart = ChartOfAccounts::seeded();
        assert_eq!(chart.roots().len(), 5);
        assert_eq!(chart.len(), 23);
        assert_eq!(chart.children_of("1100").len(), 3);
        assert_eq!(chart.groups().len(), 8);
        assert_eq!(chart.ledger_accounts().len(), 15);
    }

    #[test]
    fn test_insert_petty_cash() {
        let mut chart = ChartOfAccounts::seeded();
        chart
            .insert(&draft("1140", "Petty Cash", NodeKind::Account, "1100"))
            .unwrap();

        let children = chart.children_of("1100");
        assert_eq!(children.len(), 4);
        let petty = children[3];
        assert_eq!(petty.code, "1140");
        assert_eq!(petty.name, "Petty Cash");
        assert_eq!(petty.kind(), NodeKind::Account);
        assert_eq!(petty.balance(), Some(Decimal::ZERO));
        assert!(petty.children().is_empty());
    }

    #[test]
    fn test_insert_only_appends_to_parent() {
        let mut chart = ChartOfAccounts::seeded();
        let mut expected = chart.to_tree();

        chart
            .insert(&draft("1230", "Trailers", NodeKind::Account, "1200"))
            .unwrap();

        let after = chart.to_tree();
        let inserted = after[0].children.as_ref().unwrap()[1]
            .children
            .as_ref()
            .unwrap()
            .last()
            .cloned()
            .unwrap();
        expected[0].children.as_mut().unwrap()[1]
            .children
            .as_mut()
            .unwrap()
            .push(inserted.clone());

        assert_eq!(after, expected);
        assert_eq!(inserted.code, "1230");
    }

    #[test]
    fn test_insert_group_has_no_balance() {
        let mut chart = ChartOfAccounts::seeded();
        let id = chart
            .insert(&draft("5500", "Fines", NodeKind::Group, "5000"))
            .unwrap();
        let node = chart.get(id).unwrap();
        assert!(node.is_group());
        assert_eq!(node.balance(), None);
        assert!(!node.has_children());
        assert_eq!(chart.depth(id), 1);

        chart
            .insert(&draft("5510", "Traffic Fines", NodeKind::Account, "5500"))
            .unwrap();
        assert_eq!(chart.children_of("5500").len(), 1);

        let fines = chart.subtree(id).unwrap();
        assert_eq!(fines.children.unwrap()[0].code, "5510");
    }

    #[test]
    fn test_insert_under_leaf_is_rejected_without_change() {
        let mut chart = ChartOfAccounts::seeded();
        let before = chart.to_tree();

        let err = chart
            .insert(&draft("1111", "Drawer", NodeKind::Account, "1110"))
            .unwrap_err();

        assert_eq!(err, CoreError::InvalidParent { code: "1110".to_string() });
        assert_eq!(chart.to_tree(), before);
        assert_eq!(chart.len(), 23);
    }

    #[test]
    fn test_insert_unknown_parent() {
        let mut chart = ChartOfAccounts::seeded();
        let err = chart
            .insert(&draft("9100", "Misc", NodeKind::Account, "9000"))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidParent { .. }));
        assert_eq!(chart.len(), 23);
    }

    #[test]
    fn test_insert_duplicate_code() {
        let mut chart = ChartOfAccounts::seeded();
        let err = chart
            .insert(&draft("1110", "Cash again", NodeKind::Account, "1100"))
            .unwrap_err();
        assert_eq!(err, CoreError::DuplicateCode { code: "1110".to_string() });
        assert_eq!(chart.children_of("1100").len(), 3);
    }

    #[test]
    fn test_insert_requires_fields() {
        let mut chart = ChartOfAccounts::seeded();
        let cases = [
            (draft("", "Petty Cash", NodeKind::Account, "1100"), "code"),
            (draft("1140", "  ", NodeKind::Account, "1100"), "name"),
            (draft("1140", "Petty Cash", NodeKind::Account, ""), "parent_code"),
        ];
        for (input, field) in cases {
            let err = chart.insert(&input).unwrap_err();
            assert_eq!(err, CoreError::MissingField { field: field.to_string() });
        }
        assert_eq!(chart.len(), 23);
    }

    #[test]
    fn test_inserted_ids_are_unique() {
        let mut chart = ChartOfAccounts::seeded();
        let a = chart
            .insert(&draft("1140", "Petty Cash", NodeKind::Account, "1100"))
            .unwrap();
        let b = chart
            .insert(&draft("1150", "Deposits", NodeKind::Account, "1100"))
            .unwrap();
        let a_id = chart.get(a).unwrap().id.clone();
        let b_id = chart.get(b).unwrap().id.clone();
        assert_ne!(a_id, b_id);
        assert!(a_id.starts_with("1-1-"));
        assert_eq!(chart.node_id(&b_id), Some(b));
    }

    #[test]
    fn test_default_visibility() {
        let chart = ChartOfAccounts::seeded();
        let expansion = ExpansionState::new();
        let rows: Vec<_> = chart.visible(&expansion).collect();

        // roots and their children are expanded, so every seeded node shows
        assert_eq!(rows.len(), 23);
        assert_eq!(rows[0].node.code, "1000");
        assert_eq!(rows[1].node.code, "1100");
        assert_eq!(rows[2].node.code, "1110");
        assert_eq!(rows[2].depth, 2);
        assert!(rows.iter().all(|r| r.depth <= 2));
    }

    #[test]
    fn test_third_level_groups_start_collapsed() {
        let mut chart = ChartOfAccounts::seeded();
        chart
            .insert(&draft("1150", "Deposits", NodeKind::Group, "1100"))
            .unwrap();
        chart
            .insert(&draft("1151", "Rent Deposit", NodeKind::Account, "1150"))
            .unwrap();

        let expansion = ExpansionState::new();
        let codes: Vec<_> = chart.visible(&expansion).map(|r| r.node.code.clone()).collect();
        assert!(codes.contains(&"1150".to_string()));
        assert!(!codes.contains(&"1151".to_string()));
    }

    #[test]
    fn test_toggle_affects_only_that_subtree() {
        let chart = ChartOfAccounts::seeded();
        let mut expansion = ExpansionState::new();

        assert!(!expansion.toggle(&chart, "1-1").unwrap());
        let codes: Vec<_> = chart.visible(&expansion).map(|r| r.node.code.clone()).collect();
        assert!(!codes.contains(&"1110".to_string()));
        assert!(codes.contains(&"1100".to_string()));
        assert!(codes.contains(&"1210".to_string()));
        assert!(codes.contains(&"2110".to_string()));

        assert!(expansion.toggle(&chart, "1-1").unwrap());
        assert_eq!(chart.visible(&expansion).count(), 23);
    }

    #[test]
    fn test_collapsing_root_hides_descendants() {
        let chart = ChartOfAccounts::seeded();
        let mut expansion = ExpansionState::new();
        expansion.toggle(&chart, "1").unwrap();

        let rows: Vec<_> = chart.visible(&expansion).collect();
        assert_eq!(rows[0].node.code, "1000");
        assert!(!rows[0].expanded);
        assert_eq!(rows[1].node.code, "2000");
        assert_eq!(rows.len(), 23 - 7);
    }

    #[test]
    fn test_toggle_leaf_and_unknown() {
        let chart = ChartOfAccounts::seeded();
        let mut expansion = ExpansionState::new();
        assert!(!expansion.toggle(&chart, "1-1-1").unwrap());
        assert_eq!(chart.visible(&expansion).count(), 23);

        let err = expansion.toggle(&chart, "nope").unwrap_err();
        assert!(matches!(err, CoreError::NodeNotFound { .. }));
    }

    #[test]
    fn test_subtotals() {
        let chart = ChartOfAccounts::seeded();
        let assets = chart.roots()[0];
        assert_eq!(chart.subtotal(assets), Decimal::from(1_530_000));
        let expenses = chart.roots()[4];
        assert_eq!(chart.subtotal(expenses), Decimal::from(712_000));
    }

    #[test]
    fn test_tree_json_shape() {
        let chart = ChartOfAccounts::seeded();
        let json = serde_json::to_value(chart.to_tree()).unwrap();
        let cash = &json[0]["children"][0]["children"][0];
        assert_eq!(cash["code"], "1110");
        assert_eq!(cash["type"], "account");
        assert!(cash.get("children").is_none());
        assert!(json[0].get("balance").is_none());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
- code: "1000"
  name: Assets
  type: group
  children:
    - code: "1010"
      name: Cash
      type: account
      balance: 1500
- code: "2000"
  name: Liabilities
  type: group
  children: []
"#;
        let chart = ChartOfAccounts::from_yaml(yaml).unwrap();
        assert_eq!(chart.len(), 3);
        let cash = chart.find_by_code("1010").unwrap();
        assert_eq!(cash.id, "1-1");
        assert_eq!(cash.balance(), Some(Decimal::from(1500)));
        assert!(chart.find_by_code("2000").unwrap().is_group());
    }

    #[test]
    fn test_from_yaml_rejects_duplicates_and_bad_shape() {
        let duplicate = r#"
- code: "1000"
  name: Assets
  type: group
  children:
    - { code: "1000", name: Cash, type: account }
"#;
        assert!(matches!(
            ChartOfAccounts::from_yaml(duplicate),
            Err(CoreError::DuplicateCode { .. })
        ));

        let leaf_with_children = r#"
- code: "1010"
  name: Cash
  type: account
  children:
    - { code: "1011", name: Drawer, type: account }
"#;
        assert!(matches!(
            ChartOfAccounts::from_yaml(leaf_with_children),
            Err(CoreError::InvalidFormat { .. })
        ));

        assert!(matches!(
            ChartOfAccounts::from_yaml("not: [a list"),
            Err(CoreError::InvalidFormat { .. })
        ));
    }
}
