//! Account routes - Chart of accounts tree view
//!
//! Features:
//! - Hierarchical tree with expandable/collapsible groups
//! - Group subtotals and ledger balances
//! - Add account form that appends under an existing group
//! - Nested JSON view of the chart
//!
//! Structure:
//! - api.rs: JSON API endpoints
//! - page.rs: Accounting page and chart partials

pub mod api;
pub mod page;

pub use api::{api_accounts, api_accounts_create};
pub use page::{
    htmx_chart,
    htmx_chart_add,
    htmx_chart_toggle,
    page_accounting,
    render_chart_card,
};
