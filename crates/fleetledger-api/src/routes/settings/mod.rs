//! Settings routes - Configuration display and preferences

pub mod api;
pub mod page;

pub use api::{
    api_preferences, api_set_preferences, api_settings, PreferencesUpdate, PreferencesView,
};
pub use page::{htmx_preferences, page_settings};
