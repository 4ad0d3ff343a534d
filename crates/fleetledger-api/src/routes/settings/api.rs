//! Settings API endpoints - JSON API

use crate::AppState;
use axum::extract::State;
use axum::Json;
use fleetledger_config::{Config, Language, Theme};
use fleetledger_core::{Direction, Preferences};
use serde::{Deserialize, Serialize};

/// Current preferences as reported by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesView {
    pub language: Language,
    pub theme: Theme,
    pub direction: Direction,
}

impl From<Preferences> for PreferencesView {
    fn from(prefs: Preferences) -> Self {
        Self {
            language: prefs.language(),
            theme: prefs.theme(),
            direction: prefs.direction(),
        }
    }
}

/// Partial update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesUpdate {
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub theme: Option<Theme>,
}

impl PreferencesUpdate {
    pub fn apply(&self, prefs: &mut Preferences) {
        if let Some(language) = self.language {
            prefs.set_language(language);
        }
        if let Some(theme) = self.theme {
            prefs.set_theme(theme);
        }
    }
}

pub async fn api_settings(State(state): State<AppState>) -> Json<Config> {
    Json(state.config.clone())
}

pub async fn api_preferences(State(state): State<AppState>) -> Json<PreferencesView> {
    Json(state.prefs().await.into())
}

pub async fn api_set_preferences(
    State(state): State<AppState>,
    Json(update): Json<PreferencesUpdate>,
) -> Json<PreferencesView> {
    let mut prefs = state.preferences.write().await;
    update.apply(&mut prefs);
    Json((*prefs).into())
}
