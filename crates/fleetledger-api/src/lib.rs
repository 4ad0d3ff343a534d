//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::accounts: Chart of accounts tree, add account form, JSON API
//! - routes::journal: Journal entry composer and balance banner
//! - routes::settings: Configuration display and language/theme preferences
//!
//! Every page and partial works on the caller's session (see [`session`]).

pub mod error;
pub mod routes;
pub mod session;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, Response},
    routing::{get, post},
    Router,
};
use fleetledger_config::{Config, Theme};
use fleetledger_core::{
    ChartOfAccounts, CoreError, DefaultErrorLogger, ErrorContext, ErrorLogger, Preferences,
};
use fleetledger_utils::{escape_html, format_amount};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

pub use error::ApiError;
pub use session::{Session, SessionStore};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    /// Language and theme, shared by every session
    pub preferences: Arc<RwLock<Preferences>>,
}

impl AppState {
    pub fn new(config: Config, seed: ChartOfAccounts) -> Self {
        let preferences = Preferences::from_config(&config.ui);
        let sessions = SessionStore::new(seed, &config.server);
        Self {
            config,
            sessions,
            preferences: Arc::new(RwLock::new(preferences)),
        }
    }

    /// Snapshot of the current preferences
    pub async fn prefs(&self) -> Preferences {
        *self.preferences.read().await
    }

    /// Amount with grouping, configured decimal places and currency code
    pub fn money(&self, amount: Decimal) -> String {
        format_money(&self.config, amount)
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::accounts::{
        api_accounts, api_accounts_create, htmx_chart, htmx_chart_add, htmx_chart_toggle,
        page_accounting,
    };
    use routes::journal::{
        api_journal, htmx_journal, htmx_journal_add_line, htmx_journal_header, htmx_journal_post,
        htmx_journal_remove_line, htmx_journal_reset, htmx_journal_update_line,
    };
    use routes::settings::{
        api_preferences, api_set_preferences, api_settings, htmx_preferences, page_settings,
    };

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/accounts", get(api_accounts).post(api_accounts_create))
        .route("/api/journal", get(api_journal))
        .route("/api/settings", get(api_settings))
        .route("/api/preferences", get(api_preferences).put(api_set_preferences))
        // Pages
        .route("/", get(index_page))
        .route("/accounting", get(page_accounting))
        .route("/settings", get(page_settings))
        // HTMX partials
        .route("/accounting/chart", get(htmx_chart).post(htmx_chart_add))
        .route("/accounting/chart/:id/toggle", post(htmx_chart_toggle))
        .route("/accounting/journal", get(htmx_journal))
        .route("/accounting/journal/lines", post(htmx_journal_add_line))
        .route("/accounting/journal/lines/:id", post(htmx_journal_update_line))
        .route("/accounting/journal/lines/:id/remove", post(htmx_journal_remove_line))
        .route("/accounting/journal/header", post(htmx_journal_header))
        .route("/accounting/journal/post", post(htmx_journal_post))
        .route("/accounting/journal/reset", post(htmx_journal_reset))
        .route("/settings/preferences", post(htmx_preferences))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str, prefs: &Preferences) -> String {
    let theme_class = match prefs.theme() {
        Theme::Dark => "dark",
        Theme::Light | Theme::System => "",
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="{}" dir="{}" class="{}" data-theme="{}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Fleetledger</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <script>tailwind.config = {{ darkMode: 'class' }}</script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900 dark:bg-gray-900 dark:text-gray-100">
    {}
</body>
</html>"#,
        prefs.language(),
        prefs.direction(),
        theme_class,
        prefs.theme(),
        escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str, prefs: &Preferences) -> String {
    let links = [
        ("/", "nav.dashboard", "📊"),
        ("/accounting", "nav.accounting", "📒"),
        ("/settings", "nav.settings", "⚙️"),
    ];

    let mut nav = String::from("<div class='bg-white dark:bg-gray-800 border-e h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Fleetledger</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, key, icon) in &links {
        let is_active = if *path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path)
        };
        let active_class = if is_active {
            "bg-indigo-50 text-indigo-600"
        } else {
            "text-gray-600 hover:bg-gray-50"
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, prefs.translate(key)
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Check if request is from HTMX (partial page update)
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(
    headers: &HeaderMap,
    title: &str,
    current_path: &str,
    inner_content: &str,
    prefs: &Preferences,
) -> String {
    if is_htmx_request(headers) {
        format!(r#"<main class='flex-1 overflow-auto p-6'>{}</main>"#, inner_content)
    } else {
        base_html(
            title,
            &format!(
                r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto p-6'>{}</main>
    </div>
</div>"#,
                nav_sidebar(current_path, prefs),
                inner_content
            ),
            prefs,
        )
    }
}

/// Red notice listing why an operation was refused
pub fn render_error(err: &CoreError) -> String {
    let details = err.to_details();
    let suggestions: String = details
        .suggestions
        .iter()
        .map(|s| format!("<li>{}</li>", escape_html(s)))
        .collect();
    format!(
        r#"<div class='notice-error mb-4 p-3 rounded-lg border border-red-200 bg-red-50 text-red-700 text-sm' data-code='{}'><p class='font-medium'>{}</p><ul class='list-disc ms-5'>{}</ul></div>"#,
        details.code,
        escape_html(&details.message),
        suggestions
    )
}

pub fn render_success(message: &str) -> String {
    format!(
        r#"<div class='notice-success mb-4 p-3 rounded-lg border border-green-200 bg-green-50 text-green-700 text-sm'>{}</div>"#,
        escape_html(message)
    )
}

/// Log a refused domain operation for a session
pub(crate) fn log_rejection(err: &CoreError, context: ErrorContext, session: &Session) {
    DefaultErrorLogger.log_error(err, &context.with_session(&session.id));
}

/// Decode an `application/x-www-form-urlencoded` body
pub fn form_params(body: &str) -> HashMap<String, String> {
    let decode = |s: &str| {
        let spaced = s.replace('+', " ");
        urlencoding::decode(&spaced)
            .map(|c| c.into_owned())
            .unwrap_or(spaced)
    };
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode(key), decode(value)),
            None => (decode(pair), String::new()),
        })
        .collect()
}

/// Amount with grouping, configured decimal places and currency code
pub fn format_money(config: &Config, amount: Decimal) -> String {
    format!(
        "{} {}",
        config.accounting.currency,
        format_amount(
            amount,
            config.accounting.decimal_places,
            &config.accounting.thousands_separator
        )
    )
}

/// Dashboard: group subtotals and journal state of this session
async fn index_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let prefs = state.prefs().await;
    let (summaries, ledger_count, status, posted_count) = state
        .sessions
        .read(&session, |ws| {
            (
                ws.group_summaries(),
                ws.chart.ledger_accounts().len(),
                ws.journal_status(),
                ws.posted().len(),
            )
        })
        .await;

    let group_cards: String = summaries
        .iter()
        .map(|g| {
            format!(
                r#"<div class='bg-white dark:bg-gray-800 p-4 rounded-lg border' data-group='{}'><p class='text-sm text-gray-500'>{} <span class='font-mono'>{}</span></p><p class='text-xl font-bold'>{}</p><p class='text-xs text-gray-400'>{} {}</p></div>"#,
                escape_html(&g.code),
                escape_html(&g.name),
                escape_html(&g.code),
                state.money(g.total),
                g.accounts,
                prefs.translate("dashboard.ledgerAccounts"),
            )
        })
        .collect();

    let journal_state = if status.balanced {
        format!("<span class='text-green-600'>{}</span>", prefs.translate("accounting.balanced"))
    } else {
        format!(
            "<span class='text-amber-600'>{}</span> <span class='text-sm text-gray-500'>{}: {}</span>",
            prefs.translate("accounting.mustBalance"),
            prefs.translate("accounting.difference"),
            state.money(status.difference)
        )
    };

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>{}</h2></div>
        <div class='grid grid-cols-1 md:grid-cols-3 lg:grid-cols-5 gap-4 mb-6'>{}</div>
        <div class='grid grid-cols-1 md:grid-cols-3 gap-4'>
            <div class='bg-white dark:bg-gray-800 p-4 rounded-lg border'><p class='text-sm text-gray-500'>{}</p><p class='text-xl font-bold' id='ledger-count'>{}</p></div>
            <div class='bg-white dark:bg-gray-800 p-4 rounded-lg border'><p class='text-sm text-gray-500'>{}</p><p class='font-medium'>{}</p></div>
            <div class='bg-white dark:bg-gray-800 p-4 rounded-lg border'><p class='text-sm text-gray-500'>{}</p><p class='text-xl font-bold' id='posted-count'>{}</p></div>
        </div>
        <div class='mt-6'><a href='/accounting' class='text-indigo-600 hover:text-indigo-800'>{} →</a></div>"#,
        prefs.translate("nav.dashboard"),
        group_cards,
        prefs.translate("dashboard.ledgerAccounts"),
        ledger_count,
        prefs.translate("dashboard.journalStatus"),
        journal_state,
        prefs.translate("accounting.postedEntries"),
        posted_count,
        prefs.translate("nav.accounting"),
    );

    session.respond(Html(page_response(
        &headers,
        prefs.translate("nav.dashboard"),
        "/",
        &inner_content,
        &prefs,
    )))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Start the HTTP server
///
/// Binds the configured address and serves until Ctrl-C.
pub async fn start_server(config: Config, seed: ChartOfAccounts) -> std::io::Result<()> {
    let addr = config.bind_address();
    let state = AppState::new(config, seed);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Fleetledger server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Dashboard)");
    log::info!("  - /accounting (Chart of accounts and journal entry)");
    log::info!("  - /settings (Configuration and preferences)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}
