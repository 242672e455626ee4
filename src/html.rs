use chrono::{DateTime, Local};

use crate::charts::DashboardCharts;
use crate::models::domain::StatisticsReport;

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; background: #f4f6f8; color: #222; margin: 0; }
header { background: #2c3e50; color: #fff; padding: 18px 32px; }
main { max-width: 1100px; margin: 0 auto; padding: 24px; }
.cards { display: flex; gap: 16px; flex-wrap: wrap; }
.card { background: #fff; border-radius: 8px; padding: 16px 24px; flex: 1; min-width: 180px; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.card .value { font-size: 28px; font-weight: bold; }
.chart { background: #fff; border-radius: 8px; margin-top: 24px; padding: 16px; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.chart img { width: 100%; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: 6px 10px; border-bottom: 1px solid #eee; }
.notice { background: #fff3cd; border: 1px solid #ffe08a; border-radius: 8px; padding: 12px 16px; margin-bottom: 16px; }
.error { background: #fdecea; border: 1px solid #f5c2c0; border-radius: 8px; padding: 24px; }
footer { color: #888; font-size: 12px; text-align: center; padding: 16px; }
"#;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("{value:.2}"),
        None => "n/a".to_string(),
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n\
         <header><h1>{title}</h1></header>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
        style = STYLE,
    )
}

pub fn render_dashboard(
    report: &StatisticsReport,
    charts: &DashboardCharts,
    generated_at: DateTime<Local>,
) -> String {
    let mut body = String::new();

    if report.is_empty() {
        body.push_str(
            "<div class=\"notice\">The capture file has no packets; the average size is undefined.</div>\n",
        );
    }

    body.push_str(&format!(
        "<section class=\"cards\">\n\
         <div class=\"card\"><div>Total Packets</div><div class=\"value\">{}</div></div>\n\
         <div class=\"card\"><div>Average Packet Size</div><div class=\"value\">{}</div></div>\n\
         <div class=\"card\"><div>Protocols</div><div class=\"value\">{}</div></div>\n\
         </section>\n",
        report.total_packets,
        format_average(report.average_size),
        report.protocol_counts.len(),
    ));

    body.push_str(&format!(
        "<section class=\"chart\"><h2>Protocol Distribution</h2>\
         <img alt=\"Packet count by protocol\" src=\"{}\"></section>\n",
        charts.protocols.to_data_uri()
    ));
    body.push_str(&format!(
        "<section class=\"chart\"><h2>Top Talkers</h2>\
         <img alt=\"Top 3 most active IPs\" src=\"{}\"></section>\n",
        charts.addresses.to_data_uri()
    ));

    body.push_str("<section class=\"chart\"><h2>Packets per Protocol</h2><table>\n<tr><th>Protocol</th><th>Packets</th></tr>\n");
    for entry in &report.protocol_counts {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape(&entry.protocol),
            entry.count
        ));
    }
    body.push_str("</table></section>\n");

    body.push_str("<section class=\"chart\"><h2>Most Active IPs</h2><table>\n<tr><th>Address</th><th>Packets</th></tr>\n");
    for entry in &report.top_addresses {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape(&entry.address),
            entry.count
        ));
    }
    body.push_str("</table></section>\n");

    body.push_str(&format!(
        "<footer>Generated {}</footer>",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    page("Network Analytics Dashboard", &body)
}

pub fn render_error(message: &str) -> String {
    page(
        "Network Analytics Dashboard",
        &format!("<div class=\"error\"><h2>Error</h2><p>{}</p></div>", escape(message)),
    )
}
