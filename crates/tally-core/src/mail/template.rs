//! Report email rendering
//!
//! Renders a [`ReportPayload`] into the HTML body of the monthly report
//! email: greeting, income/expense/net summary, category table, insights.

use crate::models::ReportPayload;

/// Minimal HTML escaping for user- and model-supplied text
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render the monthly report email body
pub fn render_report_email(payload: &ReportPayload) -> String {
    let stats = &payload.stats;

    let category_rows = stats
        .by_category
        .iter()
        .map(|(category, amount)| {
            format!(
                "<tr><td style=\"padding:4px 12px 4px 0;\">{}</td>\
                 <td style=\"padding:4px 0;text-align:right;\">${:.2}</td></tr>",
                escape(category),
                amount
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let insight_items = payload
        .insights
        .iter()
        .map(|insight| format!("<li style=\"margin:6px 0;\">{}</li>", escape(insight)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<html>
<body style="font-family:Helvetica,Arial,sans-serif;color:#1f2933;max-width:600px;margin:0 auto;">
  <h1 style="font-size:20px;">Your Monthly Financial Report</h1>
  <p>Hello {name},</p>
  <p>Here is your financial summary for {month}:</p>
  <table style="width:100%;border-collapse:collapse;">
    <tr><td style="padding:4px 12px 4px 0;">Total Income</td>
        <td style="padding:4px 0;text-align:right;">${income:.2}</td></tr>
    <tr><td style="padding:4px 12px 4px 0;">Total Expenses</td>
        <td style="padding:4px 0;text-align:right;">${expenses:.2}</td></tr>
    <tr><td style="padding:4px 12px 4px 0;font-weight:bold;">Net Income</td>
        <td style="padding:4px 0;text-align:right;font-weight:bold;">${net:.2}</td></tr>
  </table>
  <h2 style="font-size:16px;">Expenses by Category</h2>
  <table style="width:100%;border-collapse:collapse;">
{category_rows}
  </table>
  <h2 style="font-size:16px;">Insights</h2>
  <ul>
{insight_items}
  </ul>
  <p style="color:#7b8794;font-size:12px;">Sent by Tally. Reply to this email if something looks off.</p>
</body>
</html>"#,
        name = escape(&payload.user_name),
        month = escape(&payload.month),
        income = stats.total_income,
        expenses = stats.total_expenses,
        net = stats.net_income(),
        category_rows = category_rows,
        insight_items = insight_items,
    )
}
