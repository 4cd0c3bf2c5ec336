// Server rendered pages: landing (sign-in), dashboard and confirmation prompts.
//
// The dashboard page long-polls `/records/table?after=<revision>` and swaps the
// table body in place, so other viewers' writes show up without a reload.

use crate::modules::dashboard::core::renderer::{TableRenderer, escape_html};
use crate::modules::dashboard::core::view::{Flash, PageView, Screen};

const STYLE: &str = r#"<style>
body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
table { width: 100%; border-collapse: collapse; margin-top: 1rem; }
th, td { border-bottom: 1px solid #ddd; padding: .5rem; text-align: left; }
.flash.success { color: #1b5e20; }
.flash.error { color: #b71c1c; }
header { display: flex; justify-content: space-between; align-items: center; }
</style>"#;

const LIVE_TABLE_SCRIPT: &str = r#"<script>
(function () {
  const body = document.getElementById('attendance-body');
  async function poll() {
    try {
      const after = body.dataset.revision;
      const response = await fetch('/records/table?after=' + after, { credentials: 'same-origin' });
      if (response.status === 401) { window.location.href = '/'; return; }
      if (response.ok) {
        body.dataset.revision = response.headers.get('x-revision') || after;
        body.innerHTML = await response.text();
      }
    } catch (e) {
      await new Promise(function (resolve) { setTimeout(resolve, 2000); });
    }
    poll();
  }
  poll();
})();
</script>"#;

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{}</title>{STYLE}</head>
<body>
{content}
</body>
</html>"#,
        escape_html(title)
    )
}

fn flash_html(flash: Option<&Flash>) -> String {
    match flash {
        Some(Flash::Success(message)) => format!(
            r#"<p class="flash success" role="status">{}</p>"#,
            escape_html(message)
        ),
        Some(Flash::Error(message)) => format!(
            r#"<p class="flash error" role="alert">{}</p>"#,
            escape_html(message)
        ),
        None => String::new(),
    }
}

pub fn landing_page(flash: Option<&Flash>) -> String {
    let content = format!(
        r#"<h1>Attendance</h1>
{}
<form method="post" action="/login">
  <label>Email <input type="email" name="email" required></label>
  <label>Password <input type="password" name="password"></label>
  <button type="submit">Sign in</button>
</form>"#,
        flash_html(flash)
    );
    layout("Attendance - Sign in", &content)
}

pub fn dashboard_page(view: &PageView, flash: Option<&Flash>, renderer: &TableRenderer) -> String {
    let user_label = match &view.screen {
        Screen::Dashboard { user_label } => user_label.as_str(),
        Screen::Landing => "",
    };
    let action_header = if renderer.deletable {
        "<th>Action</th>"
    } else {
        ""
    };
    let content = format!(
        r#"<header>
  <h1>Attendance</h1>
  <form method="post" action="/logout"><span>{user}</span> <button type="submit">Logout</button></form>
</header>
{flash}
<form method="post" action="/records" id="attendanceForm">
  <label>Name <input type="text" name="name" id="name" value="{name}" autofocus></label>
  <button type="submit">Mark attendance</button>
</form>
<table id="attendanceTable">
  <thead><tr><th>Name</th><th>Date</th><th>Time</th>{action_header}</tr></thead>
  <tbody id="attendance-body" data-revision="{revision}">{rows}</tbody>
</table>
<p><a href="/records/clear" id="clearBtn">Clear logs</a></p>
{LIVE_TABLE_SCRIPT}"#,
        user = escape_html(user_label),
        flash = flash_html(flash),
        name = escape_html(&view.name_input),
        revision = view.revision,
        rows = renderer.body_html(&view.table),
    );
    layout("Attendance", &content)
}

/// Yes/no prompt for a destructive action. Confirming posts `confirmed=true`.
pub fn confirm_page(message: &str, action: &str) -> String {
    let content = format!(
        r#"<h1>Please confirm</h1>
<p>{}</p>
<form method="post" action="{}">
  <input type="hidden" name="confirmed" value="true">
  <button type="submit">OK</button>
  <a href="/">Cancel</a>
</form>"#,
        escape_html(message),
        escape_html(action)
    );
    layout("Attendance - Confirm", &content)
}

#[cfg(test)]
mod html_pages_tests {
    use super::*;
    use crate::modules::dashboard::core::renderer::{RowView, TableBody};
    use rstest::rstest;

    #[rstest]
    fn it_should_render_the_dashboard_with_rows_and_flash() {
        let view = PageView {
            screen: Screen::Dashboard {
                user_label: "alice@example.com".into(),
            },
            table: TableBody::Rows(vec![RowView {
                id: "r-1".into(),
                name: "Alice".into(),
                date: "14/11/2023".into(),
                time: "22:13:20".into(),
            }]),
            flash: None,
            name_input: "<b>".into(),
            revision: 7,
            generation: 2,
        };
        let html = dashboard_page(
            &view,
            Some(&Flash::Success("Attendance marked for Alice!".into())),
            &TableRenderer::default(),
        );
        assert!(html.contains("alice@example.com"));
        assert!(html.contains("Attendance marked for Alice!"));
        assert!(html.contains("<td>Alice</td><td>14/11/2023</td><td>22:13:20</td>"));
        assert!(html.contains(r#"data-revision="7""#));
        assert!(html.contains(r#"value="&lt;b&gt;""#));
    }

    #[rstest]
    fn it_should_render_the_landing_page_with_an_error() {
        let html = landing_page(Some(&Flash::Error("invalid email or password".into())));
        assert!(html.contains(r#"action="/login""#));
        assert!(html.contains(r#"class="flash error""#));
    }

    #[rstest]
    fn it_should_render_a_confirmation_prompt() {
        let html = confirm_page(
            "Are you sure you want to clear all attendance records?",
            "/records/clear",
        );
        assert!(html.contains("Are you sure you want to clear all attendance records?"));
        assert!(html.contains(r#"name="confirmed" value="true""#));
    }
}
