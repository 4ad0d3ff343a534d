//! Accounting page and chart of accounts partials

use crate::routes::journal::render_journal_card;
use crate::{form_params, log_rejection, render_error, AppState};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{Html, Response};
use fleetledger_core::chart::VisibleRow;
use fleetledger_core::{CoreError, ErrorContext, NewAccount, NodeKind, Preferences, Workspace};
use fleetledger_utils::escape_html;
use serde_json::json;

const CHEVRON: &str = r#"<svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M9 5l7 7-7 7"/></svg>"#;

fn render_chart_row(ws: &Workspace, row: &VisibleRow<'_>, state: &AppState) -> String {
    let node = row.node;
    let indent_html = if row.depth > 0 {
        format!(r#"<span class="inline-block" style="width: {}px"></span>"#, row.depth * 24)
    } else {
        String::new()
    };
    let toggle_html = if row.has_children {
        format!(
            r#"<button class="toggle w-5 h-5 me-1 text-gray-400 flex-shrink-0 {}" hx-post="/accounting/chart/{}/toggle" hx-target='#chart-card' hx-swap="outerHTML" aria-expanded="{}">{}</button>"#,
            if row.expanded { "rotate-90" } else { "" },
            urlencoding::encode(&node.id),
            row.expanded,
            CHEVRON
        )
    } else {
        r#"<span class="w-5 h-5 me-1 flex-shrink-0"></span>"#.to_string()
    };
    let (name_class, amount_html) = match node.balance() {
        Some(balance) => (
            "text-gray-700 dark:text-gray-200",
            format!(r#"<span class="font-medium">{}</span>"#, state.money(balance)),
        ),
        None => (
            "font-semibold",
            format!(
                r#"<span class="font-semibold text-gray-500">{}</span>"#,
                state.money(ws.chart.subtotal(row.id))
            ),
        ),
    };

    format!(
        r#"<div class="chart-row flex items-center py-2 px-3 hover:bg-gray-50 dark:hover:bg-gray-700" data-id="{}" data-depth="{}"><div class="flex items-center flex-1 min-w-0">{}{}<span class="font-mono text-xs text-gray-400 me-2">{}</span><span class="{}">{}</span></div><div class="flex-shrink-0">{}</div></div>"#,
        escape_html(&node.id),
        row.depth,
        indent_html,
        toggle_html,
        escape_html(&node.code),
        name_class,
        escape_html(&node.name),
        amount_html
    )
}

/// Values typed into the add account form
#[derive(Debug, Default)]
struct AccountForm {
    code: String,
    name: String,
    kind: String,
    parent_code: String,
}

impl AccountForm {
    fn parse(body: &str) -> Self {
        let params = form_params(body);
        let field = |name: &str| params.get(name).cloned().unwrap_or_default();
        Self {
            code: field("code"),
            name: field("name"),
            kind: field("type"),
            parent_code: field("parent_code"),
        }
    }

    fn draft(&self) -> Result<NewAccount, CoreError> {
        let kind = match self.kind.trim() {
            "" => NodeKind::default(),
            value => value.parse().map_err(|_| CoreError::InvalidValue {
                field: "type".to_string(),
                value: value.to_string(),
            })?,
        };
        Ok(NewAccount {
            code: self.code.clone(),
            name: self.name.clone(),
            kind,
            parent_code: self.parent_code.clone(),
        })
    }
}

fn render_add_account_form(ws: &Workspace, prefs: &Preferences, form: &AccountForm) -> String {
    let selected = |on: bool| if on { " selected" } else { "" };
    let parent_options: String = ws
        .chart
        .groups()
        .iter()
        .map(|g| {
            format!(
                "<option value='{}'{}>{} {}</option>",
                escape_html(&g.code),
                selected(g.code == form.parent_code.trim()),
                escape_html(&g.code),
                escape_html(&g.name)
            )
        })
        .collect();
    let is_group = form.kind.trim() == NodeKind::Group.to_string();

    format!(
        r#"<form class="mt-4 grid grid-cols-1 md:grid-cols-5 gap-2" hx-post="/accounting/chart" hx-target='#chart-card' hx-swap="outerHTML">
    <input name="code" value="{}" placeholder="{}" class="px-2 py-1.5 text-sm border rounded-lg">
    <input name="name" value="{}" placeholder="{}" class="px-2 py-1.5 text-sm border rounded-lg">
    <select name="type" class="px-2 py-1.5 text-sm border rounded-lg"><option value="account">{}</option><option value="group"{}>{}</option></select>
    <select name="parent_code" class="px-2 py-1.5 text-sm border rounded-lg" aria-label="{}">{}</select>
    <button type="submit" class="px-3 py-1.5 text-sm bg-indigo-600 text-white rounded-lg">{}</button>
</form>"#,
        escape_html(&form.code),
        prefs.translate("accounting.code"),
        escape_html(&form.name),
        prefs.translate("accounting.name"),
        prefs.translate("accounting.ledger"),
        selected(is_group),
        prefs.translate("accounting.group"),
        prefs.translate("accounting.parent"),
        parent_options,
        prefs.translate("accounting.addAccount"),
    )
}

/// Chart card: visible tree rows plus the add account form
pub fn render_chart_card(
    ws: &Workspace,
    prefs: &Preferences,
    state: &AppState,
    notice: &str,
) -> String {
    render_chart_card_with_form(ws, prefs, state, notice, &AccountForm::default())
}

fn render_chart_card_with_form(
    ws: &Workspace,
    prefs: &Preferences,
    state: &AppState,
    notice: &str,
    form: &AccountForm,
) -> String {
    let rows: String = ws
        .chart
        .visible(&ws.expansion)
        .map(|row| render_chart_row(ws, &row, state))
        .collect();
    let body = if rows.is_empty() {
        r#"<div class="text-center py-12 text-gray-500">No accounts</div>"#.to_string()
    } else {
        rows
    };

    format!(
        r#"<div id="chart-card" class="bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6 mb-6">
    <div class="flex items-center justify-between mb-4"><h3 class="text-lg font-semibold">{}</h3><span class="text-sm text-gray-500">{} {}</span></div>
    {}
    <div class="border rounded-lg divide-y">{}</div>
    {}
</div>"#,
        prefs.translate("accounting.chartOfAccounts"),
        ws.chart.ledger_accounts().len(),
        prefs.translate("dashboard.ledgerAccounts"),
        notice,
        body,
        render_add_account_form(ws, prefs, form)
    )
}

/// Accounting page: chart card and journal entry card
pub async fn page_accounting(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let prefs = state.prefs().await;
    let inner_content = state
        .sessions
        .read(&session, |ws| {
            format!(
                r#"<div class='mb-6'><h2 class='text-2xl font-bold'>{}</h2></div>
<div class='grid grid-cols-1 xl:grid-cols-2 gap-6'><div>{}</div><div>{}</div></div>"#,
                prefs.translate("nav.accounting"),
                render_chart_card(ws, &prefs, &state, ""),
                render_journal_card(ws, &prefs, &state, "")
            )
        })
        .await;

    session.respond(Html(crate::page_response(
        &headers,
        prefs.translate("nav.accounting"),
        "/accounting",
        &inner_content,
        &prefs,
    )))
}

/// HTMX: chart card
pub async fn htmx_chart(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let prefs = state.prefs().await;
    let html = state
        .sessions
        .read(&session, |ws| render_chart_card(ws, &prefs, &state, ""))
        .await;
    session.respond(Html(html))
}

/// HTMX: add account form submit
pub async fn htmx_chart_add(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let prefs = state.prefs().await;
    let form = AccountForm::parse(&body);
    let context = ErrorContext::new("chart.insert")
        .with_data("code", json!(form.code))
        .with_data("parent", json!(form.parent_code));
    let html = state
        .sessions
        .write(&session, |ws| {
            match form.draft().and_then(|draft| ws.chart.insert(&draft)) {
                Ok(_) => render_chart_card(ws, &prefs, &state, ""),
                Err(err) => {
                    log_rejection(&err, context, &session);
                    render_chart_card_with_form(ws, &prefs, &state, &render_error(&err), &form)
                }
            }
        })
        .await;
    session.respond(Html(html))
}

/// HTMX: expand or collapse one group
pub async fn htmx_chart_toggle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let prefs = state.prefs().await;
    let html = state
        .sessions
        .write(&session, |ws| {
            let notice = match ws.expansion.toggle(&ws.chart, &id) {
                Ok(expanded) => {
                    log::debug!("Node {} expanded={}", id, expanded);
                    String::new()
                }
                Err(err) => {
                    let context = ErrorContext::new("chart.toggle").with_data("node", json!(id));
                    log_rejection(&err, context, &session);
                    render_error(&err)
                }
            };
            render_chart_card(ws, &prefs, &state, &notice)
        })
        .await;
    session.respond(Html(html))
}
