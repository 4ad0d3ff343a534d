//! Journal routes - Journal entry composer
//!
//! Structure:
//! - api.rs: JSON API endpoints
//! - page.rs: Composer card and its HTMX partials

pub mod api;
pub mod page;

pub use api::api_journal;
pub use page::{
    htmx_journal,
    htmx_journal_add_line,
    htmx_journal_header,
    htmx_journal_post,
    htmx_journal_remove_line,
    htmx_journal_reset,
    htmx_journal_update_line,
    render_journal_card,
};
