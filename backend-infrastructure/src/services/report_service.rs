use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone};
use tokio::fs;
use tracing::error;

use backend_application::queries::{stock_queries, visit_queries};
use backend_application::AppState;
use backend_domain::{StockSummary, VisitReportQuery, VisitStatus, VisitView};

/// Sleeps until the configured local time each day, then writes the digest.
pub async fn schedule_reports(state: AppState) {
    loop {
        let next = next_report_time(&state.config);
        let duration = next.signed_duration_since(Local::now());
        let sleep_ms = duration.num_milliseconds().max(0) as u64;
        tokio::time::sleep(std::time::Duration::from_millis(sleep_ms)).await;

        if let Err(err) = generate_daily_digest(&state).await {
            error!("digest generation failed: {}", err);
        }
    }
}

pub async fn generate_daily_digest(state: &AppState) -> Result<()> {
    let date = Local::now().format("%Y-%m-%d").to_string();
    let visits = visit_queries::report_rows(
        state,
        VisitReportQuery {
            date: Some(date.clone()),
            late_only: None,
        },
    )
    .await
    .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    let stock = stock_queries::stock_summary(state)
        .await
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;

    let report_dir = Path::new(&state.config.report_dir);
    fs::create_dir_all(report_dir).await?;
    let path = report_dir.join(format!("{}.html", date));

    let html = render_digest(&date, &visits, &stock);
    fs::write(&path, html).await?;

    if let Some(url) = &state.config.webhook_url {
        let digest_link = format!("{}/reports/{}", state.config.public_base_url, date);
        let late = visits.iter().filter(|view| view.is_late).count();
        send_webhook(
            url,
            state.config.webhook_template.as_deref(),
            &date,
            visits.len(),
            late,
            &digest_link,
        )
        .await?;
    }

    Ok(())
}

pub fn render_digest(date: &str, visits: &[VisitView], stock: &StockSummary) -> String {
    let total = visits.len();
    let still_in = visits
        .iter()
        .filter(|view| view.status == VisitStatus::IN)
        .count();
    let late: Vec<&VisitView> = visits.iter().filter(|view| view.is_late).collect();

    let mut late_rows = String::new();
    for view in &late {
        late_rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            view.truck_number,
            view.transporter,
            view.duration,
            view.out_time.as_deref().unwrap_or("-"),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<title>Yard Digest {date}</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; }}
td, th {{ border: 1px solid #ccc; padding: 4px 10px; }}
.late {{ color: #b91c1c; }}
</style>
</head>
<body>
<h1>Yard Digest {date}</h1>
<p>Visits: {total} &middot; Still inside: {still_in} &middot; <span class="late">Late exits: {late_count}</span></p>
<p>Stock on hand: {stock_bags} bags / {stock_mt} MT</p>
<h2>Late exits</h2>
<table>
<tr><th>Truck</th><th>Transporter</th><th>Duration</th><th>Out</th></tr>
{late_rows}
</table>
</body>
</html>
"#,
        date = date,
        total = total,
        still_in = still_in,
        late_count = late.len(),
        stock_bags = stock.grand_total.total.bags,
        stock_mt = stock.grand_total.total.mt,
        late_rows = late_rows,
    )
}

async fn send_webhook(
    url: &str,
    template: Option<&str>,
    date: &str,
    total: usize,
    late: usize,
    link: &str,
) -> Result<()> {
    let template = template.unwrap_or(
        r#"{"message":"Yard digest {date}: {total} visits, {late} late. {link}"}"#,
    );
    let payload = template
        .replace("{date}", date)
        .replace("{total}", &total.to_string())
        .replace("{late}", &late.to_string())
        .replace("{link}", link);

    let client = reqwest::Client::new();
    client
        .post(url)
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

fn next_report_time(config: &backend_domain::RuntimeConfig) -> DateTime<Local> {
    let now = Local::now();
    let today = now.date_naive();
    let at = today
        .and_hms_opt(config.report_hour, config.report_minute, 0)
        .and_then(|dt| Local.from_local_datetime(&dt).earliest());
    match at {
        Some(scheduled) if scheduled > now => scheduled,
        Some(scheduled) => scheduled + ChronoDuration::days(1),
        None => now + ChronoDuration::hours(24),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::{CargoBalance, StockGrandTotal};

    fn view(truck: &str, duration: &str, is_late: bool) -> VisitView {
        VisitView {
            id: "v".to_string(),
            truck_number: truck.to_string(),
            transporter: "T".to_string(),
            paper_ok: None,
            driver_ok: None,
            tarpaulin_ok: None,
            remarks: String::new(),
            status: VisitStatus::OUT,
            in_time: "2026-08-07T10:00:00+00:00".to_string(),
            out_time: Some("2026-08-07T15:00:00+00:00".to_string()),
            manual_out_time: None,
            duration: duration.to_string(),
            is_late,
        }
    }

    #[test]
    fn digest_lists_only_late_exits_in_the_table() {
        let visits = vec![
            view("GJ01AA1111", "1h 0m", false),
            view("GJ01BB2222", "5h 0m", true),
        ];
        let stock = StockSummary {
            rows: Vec::new(),
            grand_total: StockGrandTotal {
                total: CargoBalance { bags: 120, mt: 6.0 },
                ..StockGrandTotal::default()
            },
        };
        let html = render_digest("2026-08-07", &visits, &stock);
        assert!(html.contains("Late exits: 1"));
        assert!(html.contains("GJ01BB2222"));
        assert!(!html.contains("<tr><td>GJ01AA1111"));
        assert!(html.contains("120 bags"));
    }
}
