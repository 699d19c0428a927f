//! The dashboard page.

use crate::actions::Action;

use super::escape_html;

/// Seconds between fragment refreshes.
pub const REFRESH_SECS: u32 = 5;

const STYLE: &str = r#"
:root{--bg:#0b0f14;--panel:#111826;--border:#243041;--text:#e7eef8;--muted:#9db0c7;--r:16px}
*{box-sizing:border-box}
body{margin:0;font-family:system-ui;background:var(--bg);color:var(--text)}
.app{display:grid;grid-template-columns:320px 1fr;gap:16px;padding:16px;min-height:100vh}
.sidebar,.main{background:var(--panel);border:1px solid var(--border);border-radius:var(--r);padding:16px}
h1{font-size:18px;margin:0 0 14px}
.section{color:var(--muted);font-size:12px;letter-spacing:.12em;text-transform:uppercase;margin:14px 0 10px}
.btnRow{display:flex;gap:10px;flex-wrap:wrap}
button{border:1px solid var(--border);background:rgba(0,0,0,.28);color:var(--text);padding:10px 12px;border-radius:14px;cursor:pointer}
.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(220px,1fr));gap:12px;margin-bottom:12px}
.card{border:1px solid var(--border);background:rgba(0,0,0,.25);border-radius:var(--r);padding:12px 14px}
.k{color:var(--muted);font-size:12px}
.v{font-size:20px;font-weight:650;margin-top:4px}
pre{margin:0;padding:12px;font-size:12px;color:#b9f6c6;font-family:ui-monospace,monospace;white-space:pre-wrap;max-height:180px;overflow:auto;border:1px solid var(--border);border-radius:var(--r)}
@media(max-width:900px){.app{grid-template-columns:1fr}}
"#;

/// Render the full dashboard page.
pub fn render_page(title: &str) -> String {
    let title = escape_html(title);
    let buttons: String = Action::ALL
        .iter()
        .map(|action| {
            format!(
                "  <button hx-post=\"{}\" hx-target=\"#logbox\">{}</button>\n",
                action.route(),
                escape_html(action.label())
            )
        })
        .collect();

    format!(
        r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
<script src="https://unpkg.com/htmx.org@1.9.12"></script>
<style>{style}</style>
</head>
<body>
<div class="app">
<aside class="sidebar">
 <h1>{title}</h1>
 <div class="card" hx-get="/status" hx-trigger="load, every {refresh}s">Loading status…</div>
 <div class="section">Actions</div>
 <div class="btnRow">
{buttons}  <button hx-get="/logs" hx-target="#logbox">Show Logs</button>
 </div>
</aside>
<main class="main">
 <div class="section">System Overview</div>
 <div id="overview" hx-get="/overview" hx-trigger="load, every {refresh}s">Loading overview…</div>
 <div class="section">System Logs</div>
 <pre id="logbox" hx-get="/logs" hx-trigger="load">Loading logs…</pre>
</main>
</div>
</body>
</html>
"##,
        title = title,
        style = STYLE,
        refresh = REFRESH_SECS,
        buttons = buttons,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_wires_endpoints() {
        let html = render_page("KhajunBridge");
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>KhajunBridge</title>"));
        assert!(html.contains("hx-get=\"/status\""));
        assert!(html.contains("hx-get=\"/overview\""));
        assert!(html.contains("hx-get=\"/logs\""));
        assert!(html.contains("every 5s"));
    }

    #[test]
    fn test_page_has_action_buttons() {
        let html = render_page("KhajunBridge");
        assert!(html.contains("hx-post=\"/action/update-cidrs\""));
        assert!(html.contains(">Update CIDRs</button>"));
        assert!(html.contains("hx-post=\"/action/apply\""));
        assert!(html.contains(">Apply Firewall</button>"));
    }
}
