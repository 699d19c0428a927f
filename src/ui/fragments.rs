//! HTML fragments polled by the dashboard page.

use std::fmt::Write;

use crate::app::{Overview, ServiceState};

use super::escape_html;

/// Render the liveness line, e.g. `<b>Conduit:</b> active`.
pub fn render_status(state: ServiceState) -> String {
    format!("<b>Conduit:</b> {}", state.label())
}

/// Render the overview grid: host resources, then traffic.
pub fn render_overview(overview: &Overview) -> String {
    let host = &overview.host;
    let traffic = &overview.telemetry;

    let mut html = String::new();

    html.push_str("<div class=\"grid\">\n");
    card(&mut html, "Uptime", &host.uptime);
    card(&mut html, "CPU", &format!("{:.1}%", host.cpu_percent));
    card(
        &mut html,
        "RAM",
        &format!("{} / {} MiB", host.mem_used_mib, host.mem_total_mib),
    );
    html.push_str("</div>\n");

    html.push_str("<div class=\"grid\">\n");
    card(&mut html, "Active Users", &traffic.connected.to_string());
    card(&mut html, "Connecting", &traffic.connecting.to_string());
    card(&mut html, "Up Speed", &traffic.up_rate_display);
    card(&mut html, "Down Speed", &traffic.down_rate_display);
    card(&mut html, "Total Upload", &traffic.up_total_display);
    card(&mut html, "Total Download", &traffic.down_total_display);
    html.push_str("</div>\n");

    html
}

/// Render log or script output for the log panel.
///
/// The panel is a `<pre>`, so the text keeps its line breaks and only
/// needs escaping.
pub fn render_log_text(text: &str) -> String {
    escape_html(text)
}

fn card(html: &mut String, label: &str, value: &str) {
    // Writing to a String cannot fail.
    let _ = writeln!(
        html,
        " <div class=\"card\"><div class=\"k\">{}</div><div class=\"v\">{}</div></div>",
        escape_html(label),
        escape_html(value)
    );
}
