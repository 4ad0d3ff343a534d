//! Route modules for the API server
//!
//! - accounts: chart of accounts tree, add account form, accounts JSON API
//! - journal: journal entry composer
//! - settings: configuration display and preferences
//!
//! Each module follows the same structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: HTMX page and partial rendering

pub mod accounts;
pub mod journal;
pub mod settings;
