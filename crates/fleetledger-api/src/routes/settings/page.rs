//! Settings page rendering

use super::api::PreferencesUpdate;
use crate::{form_params, is_htmx_request, ApiError, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use fleetledger_config::{Language, Theme};
use fleetledger_utils::escape_html;

pub async fn page_settings(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let prefs = state.prefs().await;
    let config = &state.config;

    let language_options: String = [(Language::En, "English"), (Language::Ar, "العربية")]
        .iter()
        .map(|(lang, label)| {
            format!(
                "<option value='{}'{}>{}</option>",
                lang,
                if *lang == prefs.language() { " selected" } else { "" },
                label
            )
        })
        .collect();
    let theme_options: String = [Theme::Light, Theme::Dark, Theme::System]
        .iter()
        .map(|theme| {
            format!(
                "<option value='{}'{}>{}</option>",
                theme,
                if *theme == prefs.theme() { " selected" } else { "" },
                theme
            )
        })
        .collect();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>{}</h2></div>
        <div class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>{}</h3>
            <form class='grid grid-cols-1 md:grid-cols-3 gap-4 items-end' method='post' action='/settings/preferences' hx-post='/settings/preferences'>
                <label class='text-sm'>{}<select name='language' class='w-full px-2 py-1.5 border rounded-lg'>{}</select></label>
                <label class='text-sm'>{}<select name='theme' class='w-full px-2 py-1.5 border rounded-lg'>{}</select></label>
                <button type='submit' class='px-3 py-1.5 text-sm bg-indigo-600 text-white rounded-lg'>{}</button>
            </form>
        </div>
        <div class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>{}</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Host</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Port</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>{}</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>{}</p><p class='font-medium' id='currency'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Decimal places</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Thousands separator</p><p class='font-medium'>"{}"</p></div>
                <div><p class='text-sm text-gray-500'>Chart seed</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Log level</p><p class='font-medium'>{}</p></div>
            </div>
        </div>"#,
        prefs.translate("nav.settings"),
        prefs.translate("settings.preferences"),
        prefs.translate("settings.language"),
        language_options,
        prefs.translate("settings.theme"),
        theme_options,
        prefs.translate("common.save"),
        prefs.translate("settings.server"),
        escape_html(&config.server.host),
        config.server.port,
        prefs.translate("settings.configuration"),
        prefs.translate("settings.currency"),
        escape_html(&config.accounting.currency),
        config.accounting.decimal_places,
        escape_html(&config.accounting.thousands_separator),
        config
            .accounting
            .chart_seed
            .as_ref()
            .map(|p| escape_html(&p.display().to_string()))
            .unwrap_or_else(|| "built-in".to_string()),
        escape_html(&config.logging.level),
    );

    session.respond(Html(crate::page_response(
        &headers,
        prefs.translate("nav.settings"),
        "/settings",
        &inner_content,
        &prefs,
    )))
}

fn update_from_form(body: &str) -> Result<PreferencesUpdate, ApiError> {
    let params = form_params(body);
    let mut update = PreferencesUpdate::default();
    if let Some(value) = params.get("language").filter(|v| !v.is_empty()) {
        update.language = Some(value.parse().map_err(|message| ApiError::BadRequest { message })?);
    }
    if let Some(value) = params.get("theme").filter(|v| !v.is_empty()) {
        update.theme = Some(value.parse().map_err(|message| ApiError::BadRequest { message })?);
    }
    Ok(update)
}

/// Preferences form submit.
///
/// Language and direction change the whole layout, so HTMX callers are told
/// to reload and plain form posts are redirected back to the page.
pub async fn htmx_preferences(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, ApiError> {
    let update = update_from_form(&body)?;
    update.apply(&mut *state.preferences.write().await);

    if is_htmx_request(&headers) {
        Ok(([("HX-Refresh", "true")], Html(String::new())).into_response())
    } else {
        Ok(Redirect::to("/settings").into_response())
    }
}
