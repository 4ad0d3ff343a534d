//! Journal entry composer card and partials
//!
//! Every partial answers with the whole card so totals, the balance banner
//! and the Post button stay in step with the edited line.

use crate::{form_params, log_rejection, render_error, render_success, AppState, Session};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{Html, Response};
use fleetledger_core::{
    CoreError, CoreResult, EntryType, ErrorContext, JournalLine, LineField, Preferences, Workspace,
};
use fleetledger_utils::escape_html;
use rust_decimal::Decimal;
use serde_json::json;

const TARGET: &str = r##"hx-target="#journal-card" hx-swap="outerHTML""##;

fn amount_value(amount: Option<Decimal>) -> String {
    amount.map(|a| a.to_string()).unwrap_or_default()
}

fn render_line(ws: &Workspace, line: &JournalLine, prefs: &Preferences) -> String {
    let options: String = ws
        .chart
        .ledger_accounts()
        .iter()
        .map(|acc| {
            format!(
                "<option value='{}'{}>{} {}</option>",
                escape_html(&acc.code),
                if acc.code == line.account_code { " selected" } else { "" },
                escape_html(&acc.code),
                escape_html(&acc.name)
            )
        })
        .collect();
    let edit = |field: LineField| {
        format!(
            r#"hx-post="/accounting/journal/lines/{}" hx-vals='{{"field":"{}"}}' hx-trigger="change" {}"#,
            line.id, field, TARGET
        )
    };
    let disabled = |blocked: bool| if blocked { " disabled" } else { "" };

    format!(
        r#"<tr class="journal-line" data-line="{id}">
    <td class="p-1"><select name="value" class="w-full px-2 py-1 text-sm border rounded" {account}><option value="">{select}</option>{options}</select></td>
    <td class="p-1"><input name="value" value="{description}" class="w-full px-2 py-1 text-sm border rounded" {describe}></td>
    <td class="p-1"><input name="value" value="{debit}" inputmode="decimal" class="w-28 px-2 py-1 text-sm border rounded text-end" {debit_edit}{debit_disabled}></td>
    <td class="p-1"><input name="value" value="{credit}" inputmode="decimal" class="w-28 px-2 py-1 text-sm border rounded text-end" {credit_edit}{credit_disabled}></td>
    <td class="p-1"><button class="text-red-500 text-sm" hx-post="/accounting/journal/lines/{id}/remove" {target}{remove_disabled}>{remove}</button></td>
</tr>"#,
        id = line.id,
        account = edit(LineField::Account),
        select = prefs.translate("accounting.selectAccount"),
        options = options,
        description = escape_html(&line.description),
        describe = edit(LineField::Description),
        debit = amount_value(line.debit),
        debit_edit = edit(LineField::Debit),
        debit_disabled = disabled(line.credit.is_some()),
        credit = amount_value(line.credit),
        credit_edit = edit(LineField::Credit),
        credit_disabled = disabled(line.debit.is_some()),
        target = TARGET,
        remove_disabled = disabled(!ws.entry.can_remove_line()),
        remove = prefs.translate("common.delete"),
    )
}

fn render_header(ws: &Workspace, prefs: &Preferences) -> String {
    let header = &ws.entry.header;
    let edit = |field: &str| {
        format!(
            r#"name="value" hx-post="/accounting/journal/header" hx-vals='{{"field":"{}"}}' hx-trigger="change" {}"#,
            field, TARGET
        )
    };
    let type_options: String = EntryType::ALL
        .iter()
        .map(|t| {
            format!(
                "<option value='{}'{}>{}</option>",
                t,
                if header.entry_type == Some(*t) { " selected" } else { "" },
                t.label()
            )
        })
        .collect();

    format!(
        r#"<div class="grid grid-cols-2 md:grid-cols-4 gap-2 mb-4">
    <label class="text-sm">{}<input type="date" value="{}" class="w-full px-2 py-1 border rounded" {}></label>
    <label class="text-sm">{}<input value="{}" class="w-full px-2 py-1 border rounded" {}></label>
    <label class="text-sm">{}<select class="w-full px-2 py-1 border rounded" {}><option value=""></option>{}</select></label>
    <label class="text-sm">{}<input value="{}" class="w-full px-2 py-1 border rounded" {}></label>
</div>"#,
        prefs.translate("accounting.date"),
        header.date.format("%Y-%m-%d"),
        edit("date"),
        prefs.translate("accounting.reference"),
        escape_html(&header.reference),
        edit("reference"),
        prefs.translate("accounting.entryType"),
        edit("entry_type"),
        type_options,
        prefs.translate("accounting.memo"),
        escape_html(&header.memo),
        edit("memo"),
    )
}

fn render_banner(ws: &Workspace, prefs: &Preferences, state: &AppState) -> String {
    if ws.entry.is_balanced() {
        format!(
            r#"<div class="balance-banner balanced p-3 rounded-lg bg-green-50 text-green-700 text-sm">{}</div>"#,
            prefs.translate("accounting.balanced")
        )
    } else {
        format!(
            r#"<div class="balance-banner unbalanced p-3 rounded-lg bg-amber-50 text-amber-700 text-sm">{} <span class="font-medium">{}: {}</span></div>"#,
            prefs.translate("accounting.mustBalance"),
            prefs.translate("accounting.difference"),
            state.money(ws.entry.difference())
        )
    }
}

fn render_posted(ws: &Workspace, prefs: &Preferences, state: &AppState) -> String {
    if ws.posted().is_empty() {
        return String::new();
    }
    let rows: String = ws
        .posted()
        .iter()
        .rev()
        .map(|p| {
            format!(
                r#"<li class="posted-entry flex justify-between py-2 text-sm"><span>{} <span class="font-mono">{}</span> {}</span><span class="font-medium">{}</span></li>"#,
                p.header.date.format("%Y-%m-%d"),
                escape_html(&p.header.reference),
                p.header.entry_type.map(|t| t.label()).unwrap_or_default(),
                state.money(p.total)
            )
        })
        .collect();
    format!(
        r#"<div class="mt-6"><h4 class="font-semibold mb-2">{}</h4><ul class="divide-y">{}</ul></div>"#,
        prefs.translate("accounting.postedEntries"),
        rows
    )
}

/// Journal card: header, lines, totals, balance banner and actions
pub fn render_journal_card(
    ws: &Workspace,
    prefs: &Preferences,
    state: &AppState,
    notice: &str,
) -> String {
    let lines: String = ws
        .entry
        .lines()
        .iter()
        .map(|line| render_line(ws, line, prefs))
        .collect();
    let post_disabled = if ws.entry.is_balanced() { "" } else { " disabled" };

    format!(
        r#"<div id="journal-card" class="bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6 mb-6">
    <h3 class="text-lg font-semibold mb-4">{title}</h3>
    {notice}
    {header}
    <table class="w-full mb-4">
        <thead><tr class="text-xs text-gray-500 text-start"><th>{account}</th><th>{description}</th><th>{debit}</th><th>{credit}</th><th></th></tr></thead>
        <tbody>{lines}</tbody>
        <tfoot><tr class="font-semibold"><td colspan="2">{total}</td><td class="text-end" id="total-debit">{total_debit}</td><td class="text-end" id="total-credit">{total_credit}</td><td></td></tr></tfoot>
    </table>
    {banner}
    <div class="flex gap-2 mt-4">
        <button class="px-3 py-1.5 text-sm border rounded-lg" hx-post="/accounting/journal/lines" {target}>{add_line}</button>
        <button class="post-entry px-3 py-1.5 text-sm bg-indigo-600 text-white rounded-lg disabled:opacity-50" hx-post="/accounting/journal/post" {target}{post_disabled}>{post}</button>
        <button class="px-3 py-1.5 text-sm border rounded-lg" hx-post="/accounting/journal/reset" {target}>{reset}</button>
    </div>
    {posted}
</div>"#,
        title = prefs.translate("accounting.journalEntry"),
        notice = notice,
        header = render_header(ws, prefs),
        account = prefs.translate("accounting.account"),
        description = prefs.translate("accounting.description"),
        debit = prefs.translate("accounting.debit"),
        credit = prefs.translate("accounting.credit"),
        lines = lines,
        total = prefs.translate("common.total"),
        total_debit = state.money(ws.entry.total_debit()),
        total_credit = state.money(ws.entry.total_credit()),
        banner = render_banner(ws, prefs, state),
        target = TARGET,
        add_line = prefs.translate("accounting.addLine"),
        post_disabled = post_disabled,
        post = prefs.translate("accounting.postEntry"),
        reset = prefs.translate("accounting.reset"),
        posted = render_posted(ws, prefs, state),
    )
}

/// Run one edit on the caller's entry and answer with the refreshed card
async fn edit_journal(
    state: &AppState,
    session: &Session,
    context: ErrorContext,
    edit: impl FnOnce(&mut Workspace) -> CoreResult<String>,
) -> Response {
    let prefs = state.prefs().await;
    let html = state
        .sessions
        .write(session, |ws| {
            let notice = match edit(ws) {
                Ok(notice) => notice,
                Err(err) => {
                    log_rejection(&err, context, session);
                    render_error(&err)
                }
            };
            render_journal_card(ws, &prefs, state, &notice)
        })
        .await;
    session.respond(Html(html))
}

/// HTMX: journal card
pub async fn htmx_journal(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let prefs = state.prefs().await;
    let html = state
        .sessions
        .read(&session, |ws| render_journal_card(ws, &prefs, &state, ""))
        .await;
    session.respond(Html(html))
}

/// HTMX: append a blank line
pub async fn htmx_journal_add_line(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    edit_journal(&state, &session, ErrorContext::new("journal.add_line"), |ws| {
        let id = ws.entry.add_line();
        log::debug!("Added journal line {}", id);
        Ok(String::new())
    })
    .await
}

/// HTMX: set one field of one line from a `field`/`value` form
pub async fn htmx_journal_update_line(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    body: String,
) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let params = form_params(&body);
    let context = ErrorContext::new("journal.update_line")
        .with_data("line", json!(id))
        .with_data("field", json!(params.get("field")))
        .with_data("value", json!(params.get("value")));
    edit_journal(&state, &session, context, |ws| {
        let raw = params.get("field").map(String::as_str).unwrap_or_default();
        let field: LineField = raw.parse().map_err(|_| CoreError::InvalidValue {
            field: "field".to_string(),
            value: raw.to_string(),
        })?;
        let value = params.get("value").map(String::as_str).unwrap_or_default();
        ws.entry.update_line(id, field, value)?;
        Ok(String::new())
    })
    .await
}

/// HTMX: remove a line, keeping the two-line floor
pub async fn htmx_journal_remove_line(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let context = ErrorContext::new("journal.remove_line").with_data("line", json!(id));
    edit_journal(&state, &session, context, |ws| {
        ws.entry.remove_line(id)?;
        Ok(String::new())
    })
    .await
}

/// HTMX: set one header field from a `field`/`value` form
pub async fn htmx_journal_header(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let params = form_params(&body);
    let context = ErrorContext::new("journal.header")
        .with_data("field", json!(params.get("field")))
        .with_data("value", json!(params.get("value")));
    edit_journal(&state, &session, context, |ws| {
        let field = params.get("field").map(String::as_str).unwrap_or_default();
        let value = params.get("value").map(String::as_str).unwrap_or_default();
        ws.entry.header.set_field(field, value)?;
        Ok(String::new())
    })
    .await
}

/// HTMX: post a balanced entry and start a new one
pub async fn htmx_journal_post(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let prefs = state.prefs().await;
    edit_journal(&state, &session, ErrorContext::new("journal.post"), |ws| {
        let posted = ws.post_entry()?;
        Ok(render_success(&format!(
            "{}: {}",
            prefs.translate("accounting.posted"),
            state.money(posted.total)
        )))
    })
    .await
}

/// HTMX: discard the entry being composed
pub async fn htmx_journal_reset(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    edit_journal(&state, &session, ErrorContext::new("journal.reset"), |ws| {
        ws.entry.reset();
        log::debug!("Journal entry reset");
        Ok(String::new())
    })
    .await
}
