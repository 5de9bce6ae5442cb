//! Report generator implementation.

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::sections::series::format_usd;
use crate::sections::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const DEFAULT_TITLE: &str = "Matiks - User Behavior & Revenue Dashboard";

const EMPTY_NOTICE: &str =
    r#"<p class="empty-notice">No data for the current filters.</p>"#;

/// Complete report data structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    /// Report configuration.
    pub config: ReportConfig,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Generator version.
    pub generator_version: String,
    pub overview: Option<OverviewSection>,
    pub activity: Option<ActivitySection>,
    pub revenue: Option<RevenueSection>,
    pub churn: Option<ChurnSection>,
    pub top_users: Option<TopUsersSection>,
    pub cohort: Option<CohortSection>,
    pub export: Option<ExportSection>,
}

impl ReportData {
    /// Report data with no sections.
    pub fn empty(config: ReportConfig) -> Self {
        Self {
            config,
            generated_at: Utc::now(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            overview: None,
            activity: None,
            revenue: None,
            churn: None,
            top_users: None,
            cohort: None,
            export: None,
        }
    }

    /// Get the report title.
    pub fn title(&self) -> String {
        self.config
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }
}

/// Chart series embedded for the browser. The export payload stays out of it.
#[derive(Serialize)]
struct ChartPayload<'a> {
    activity: Option<&'a ActivitySection>,
    revenue: Option<&'a RevenueSection>,
    cohort: Option<&'a CohortSection>,
}

/// Report generator.
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    /// Create a new report generator with configuration.
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn default_config() -> Self {
        Self::new(ReportConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Generate report from structured data.
    pub fn generate(&self, data: ReportData) -> Result<String> {
        self.render_html(&data)
    }

    /// Generate report from JSON data.
    pub fn generate_from_json(&self, json: &str) -> Result<String> {
        let data: ReportData = serde_json::from_str(json)?;
        self.render_html(&data)
    }

    /// Render the single top-level error page shown when the dataset
    /// cannot be loaded.
    pub fn generate_error_page(&self, message: &str) -> String {
        let title = self
            .config
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        format!(
            r##"<!DOCTYPE html>
<html lang="en" class="{theme_class}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="generator" content="dash-report {version}">
    <meta name="robots" content="noindex, nofollow">
</head>
<body>
    <main style="max-width: 48rem; margin: 4rem auto; font-family: ui-sans-serif, system-ui, sans-serif;">
        <h1>{title}</h1>
        <div class="load-error" role="alert" style="border: 1px solid #fca5a5; background: #fef2f2; color: #991b1b; padding: 1rem; border-radius: 0.5rem;">
            <strong>Failed to load data.</strong>
            <p>{message}</p>
        </div>
    </main>
</body>
</html>"##,
            theme_class = self.config.theme.css_class(),
            title = html_escape(&title),
            version = env!("CARGO_PKG_VERSION"),
            message = html_escape(message),
        )
    }

    fn render_html(&self, data: &ReportData) -> Result<String> {
        if self.config.limits.max_table_rows == 0 {
            return Err(ReportError::InvalidConfig(
                "limits.max_table_rows must be at least 1".to_string(),
            ));
        }

        let html = self.generate_html(data)?;

        // Optionally minify
        let output = if cfg!(debug_assertions) {
            html
        } else {
            let cfg = minify_html::Cfg {
                minify_js: true,
                minify_css: true,
                ..Default::default()
            };
            String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
        };

        info!(
            bytes = output.len(),
            title = %data.title(),
            "Report generated"
        );

        Ok(output)
    }

    fn generate_html(&self, data: &ReportData) -> Result<String> {
        let title = data.title();
        let theme_class = self.config.theme.css_class();
        let cdn_base = &self.config.cdn_config.base_url;

        let mut cdn_scripts = String::new();
        if let Some(lib) = self.config.cdn_config.libraries.get("echarts") {
            let integrity = lib
                .sri
                .as_deref()
                .map(|sri| format!(r#" integrity="{}" crossorigin="anonymous""#, sri))
                .unwrap_or_default();
            cdn_scripts.push_str(&format!(
                r#"<script src="{}"{}></script>"#,
                lib.url(cdn_base, "echarts"),
                integrity
            ));
        }

        let payload = ChartPayload {
            activity: data.activity.as_ref(),
            revenue: data.revenue.as_ref(),
            cohort: data.cohort.as_ref(),
        };
        // `</` would end the script element early.
        let data_json = serde_json::to_string(&payload)?.replace("</", "<\\/");
        debug!(bytes = data_json.len(), "Embedded chart payload");

        Ok(format!(
            r##"<!DOCTYPE html>
<html lang="en" class="{theme_class}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="generator" content="dash-report {version}">
    <meta name="robots" content="noindex, nofollow">
    <style>
        :root {{
            --bg-primary: #ffffff;
            --bg-secondary: #f9fafb;
            --text-primary: #111827;
            --text-secondary: #6b7280;
            --border-color: #e5e7eb;
            --accent-color: #3b82f6;
        }}
        .dark {{
            --bg-primary: #111827;
            --bg-secondary: #1f2937;
            --text-primary: #f9fafb;
            --text-secondary: #9ca3af;
            --border-color: #374151;
            --accent-color: #60a5fa;
        }}
        @media (prefers-color-scheme: dark) {{
            :root:not(.light) {{
                --bg-primary: #111827;
                --bg-secondary: #1f2937;
                --text-primary: #f9fafb;
                --text-secondary: #9ca3af;
                --border-color: #374151;
                --accent-color: #60a5fa;
            }}
        }}
        body {{
            background-color: var(--bg-primary);
            color: var(--text-primary);
            font-family: ui-sans-serif, system-ui, sans-serif;
            line-height: 1.5;
            margin: 0;
        }}
        .page {{ max-width: 80rem; margin: 0 auto; padding: 2rem 1rem; }}
        .grid {{ display: grid; gap: 1rem; }}
        .grid-3 {{ grid-template-columns: repeat(auto-fit, minmax(16rem, 1fr)); }}
        .grid-2 {{ grid-template-columns: repeat(auto-fit, minmax(24rem, 1fr)); }}
        .card {{
            background-color: var(--bg-secondary);
            border: 1px solid var(--border-color);
            border-radius: 0.5rem;
            padding: 1.5rem;
            margin-bottom: 1rem;
        }}
        .stat-card {{ text-align: center; padding: 1rem; }}
        .stat-value {{ font-size: 2rem; font-weight: 700; color: var(--accent-color); }}
        .stat-label {{ font-size: 0.875rem; color: var(--text-secondary); }}
        .muted {{ color: var(--text-secondary); font-size: 0.875rem; }}
        .chart {{ height: 300px; }}
        .empty-notice {{ color: var(--text-secondary); font-style: italic; }}
        nav.tabs {{ display: flex; flex-wrap: wrap; border-bottom: 1px solid var(--border-color); margin-bottom: 1.5rem; }}
        .tab-btn {{
            padding: 0.75rem 1.5rem;
            border: none;
            border-bottom: 2px solid transparent;
            background: none;
            color: inherit;
            cursor: pointer;
        }}
        .tab-btn.active {{ border-bottom-color: var(--accent-color); color: var(--accent-color); }}
        .tab-content {{ display: none; }}
        .tab-content.active {{ display: block; }}
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ border-bottom: 1px solid var(--border-color); padding: 6px 8px; text-align: left; font-size: 14px; }}
        .num {{ text-align: right; font-variant-numeric: tabular-nums; }}
        .download-btn {{
            display: inline-block;
            padding: 0.5rem 1rem;
            border-radius: 0.375rem;
            background: var(--accent-color);
            color: #ffffff;
            text-decoration: none;
        }}
        @media print {{
            .no-print {{ display: none !important; }}
            .tab-content {{ display: block; }}
            .card {{ page-break-inside: avoid; }}
        }}
    </style>
</head>
<body>
    <div class="page">
        <header>
            <h1>{title}</h1>
            <p class="muted">Generated: {generated_at}</p>
        </header>

        <nav class="tabs no-print">
            {tab_buttons}
        </nav>

        <main>
            {tab_contents}
        </main>

        <footer class="muted" style="margin-top: 2rem; text-align: center;">
            <p>Matiks Dashboard v{version}</p>
        </footer>
    </div>

    {cdn_scripts}
    <script>
        const REPORT_DATA = {data_json};

        function switchTab(tabId) {{
            document.querySelectorAll('.tab-btn').forEach(btn => {{
                btn.classList.toggle('active', btn.dataset.tab === tabId);
            }});
            document.querySelectorAll('.tab-content').forEach(content => {{
                content.classList.toggle('active', content.id === 'tab-' + tabId);
            }});
            window.dispatchEvent(new Event('resize'));
        }}

        document.querySelectorAll('.tab-btn').forEach(btn => {{
            btn.addEventListener('click', () => switchTab(btn.dataset.tab));
        }});

        const firstTab = document.querySelector('.tab-btn');
        if (firstTab) switchTab(firstTab.dataset.tab);

        function drawChart(id, kind, points, valueKey, name) {{
            const el = document.getElementById(id);
            if (!el || typeof echarts === 'undefined') return;
            const chart = echarts.init(el);
            chart.setOption({{
                tooltip: {{ trigger: 'axis' }},
                xAxis: {{ type: 'category', data: points.map(p => p.label) }},
                yAxis: {{ type: 'value' }},
                series: [{{ name: name, type: kind, data: points.map(p => p[valueKey]),
                            itemStyle: {{ color: '#3b82f6' }} }}]
            }});
            window.addEventListener('resize', () => chart.resize());
        }}

        if (REPORT_DATA.activity) {{
            drawChart('dau-chart', 'line', REPORT_DATA.activity.daily, 'count', 'DAU');
            drawChart('wau-chart', 'line', REPORT_DATA.activity.weekly, 'count', 'WAU');
            drawChart('mau-chart', 'line', REPORT_DATA.activity.monthly, 'count', 'MAU');
        }}
        if (REPORT_DATA.revenue) {{
            drawChart('revenue-trend-chart', 'line', REPORT_DATA.revenue.monthly_trend, 'value', 'Revenue');
            drawChart('revenue-device-chart', 'bar', REPORT_DATA.revenue.by_device, 'value', 'Revenue');
            drawChart('revenue-mode-chart', 'bar', REPORT_DATA.revenue.avg_by_game_mode, 'value', 'Avg revenue');
        }}
        if (REPORT_DATA.cohort) {{
            drawChart('cohort-chart', 'bar', REPORT_DATA.cohort.cohorts, 'value', 'Avg revenue');
        }}
    </script>
</body>
</html>"##,
            theme_class = theme_class,
            title = html_escape(&title),
            version = env!("CARGO_PKG_VERSION"),
            generated_at = data.generated_at.format("%Y-%m-%d %H:%M UTC"),
            tab_buttons = self.generate_tab_buttons(data),
            tab_contents = self.generate_tab_contents(data),
            cdn_scripts = cdn_scripts,
            data_json = data_json,
        ))
    }

    fn generate_tab_buttons(&self, data: &ReportData) -> String {
        let mut buttons = Vec::new();
        let sections = &self.config.sections;

        if sections.overview && data.overview.is_some() {
            buttons.push(r#"<button class="tab-btn" data-tab="overview">Overview</button>"#);
        }
        if sections.activity && data.activity.is_some() {
            buttons.push(r#"<button class="tab-btn" data-tab="activity">Active Users</button>"#);
        }
        if sections.revenue && data.revenue.is_some() {
            buttons.push(r#"<button class="tab-btn" data-tab="revenue">Revenue</button>"#);
        }
        if sections.churn && data.churn.is_some() {
            buttons.push(r#"<button class="tab-btn" data-tab="churn">Churn</button>"#);
        }
        if sections.top_users && data.top_users.is_some() {
            buttons.push(r#"<button class="tab-btn" data-tab="top-users">Top Users</button>"#);
        }
        if sections.cohort && data.cohort.is_some() {
            buttons.push(r#"<button class="tab-btn" data-tab="cohort">Cohorts</button>"#);
        }
        if sections.export && data.export.is_some() {
            buttons.push(r#"<button class="tab-btn" data-tab="export">Export</button>"#);
        }

        buttons.join("\n            ")
    }

    fn generate_tab_contents(&self, data: &ReportData) -> String {
        let mut contents = Vec::new();
        let sections = &self.config.sections;

        if sections.overview {
            if let Some(ref overview) = data.overview {
                contents.push(self.generate_overview_tab(overview));
            }
        }
        if sections.activity {
            if let Some(ref activity) = data.activity {
                contents.push(self.generate_activity_tab(activity));
            }
        }
        if sections.revenue {
            if let Some(ref revenue) = data.revenue {
                contents.push(self.generate_revenue_tab(revenue));
            }
        }
        if sections.churn {
            if let Some(ref churn) = data.churn {
                contents.push(self.generate_churn_tab(churn));
            }
        }
        if sections.top_users {
            if let Some(ref top) = data.top_users {
                contents.push(self.generate_top_users_tab(top));
            }
        }
        if sections.cohort {
            if let Some(ref cohort) = data.cohort {
                contents.push(self.generate_cohort_tab(cohort));
            }
        }
        if sections.export {
            if let Some(ref export) = data.export {
                contents.push(self.generate_export_tab(export));
            }
        }

        contents.join("\n")
    }

    fn generate_overview_tab(&self, overview: &OverviewSection) -> String {
        format!(
            r##"<section id="tab-overview" class="tab-content">
    <div class="grid grid-3" style="margin-bottom: 1.5rem;">
        <div class="card stat-card">
            <div class="stat-value">{dau_days}</div>
            <div class="stat-label">Total DAU Days</div>
        </div>
        <div class="card stat-card">
            <div class="stat-value">{wau_weeks}</div>
            <div class="stat-label">Total WAU Weeks</div>
        </div>
        <div class="card stat-card">
            <div class="stat-value">{mau_months}</div>
            <div class="stat-label">Total MAU Months</div>
        </div>
    </div>

    <div class="card">
        <h3>Dataset</h3>
        <dl>
            <dt class="muted">Source</dt>
            <dd>{source} <code class="muted">{fingerprint}</code></dd>
            <dt class="muted">Rows</dt>
            <dd>{filtered_rows} of {total_rows} ({filtered_pct:.1}%)</dd>
            <dt class="muted">Distinct users</dt>
            <dd>{distinct_users}</dd>
            <dt class="muted">Total revenue</dt>
            <dd>{total_revenue}</dd>
            <dt class="muted">Filters</dt>
            <dd>{filters}</dd>
            <dt class="muted">Unparseable timestamps</dt>
            <dd>{warnings}</dd>
        </dl>
    </div>
</section>"##,
            dau_days = overview.dau_days,
            wau_weeks = overview.wau_weeks,
            mau_months = overview.mau_months,
            source = html_escape(&overview.source_name),
            fingerprint = html_escape(overview.fingerprint_short()),
            filtered_rows = overview.filtered_rows,
            total_rows = overview.total_rows,
            filtered_pct = overview.filtered_pct(),
            distinct_users = overview.distinct_users,
            total_revenue = opt_usd(overview.total_revenue),
            filters = html_escape(&overview.filters_formatted()),
            warnings = overview.coercion_warnings,
        )
    }

    fn generate_activity_tab(&self, activity: &ActivitySection) -> String {
        format!(
            r##"<section id="tab-activity" class="tab-content">
    <h2>Active User Metrics</h2>
    <div class="grid grid-3">
        <div class="card">
            <h3>Daily Active Users</h3>
            <p class="muted">{days} days, peak {peak}</p>
            {daily}
        </div>
        <div class="card">
            <h3>Weekly Active Users</h3>
            <p class="muted">{weeks} weeks</p>
            {weekly}
        </div>
        <div class="card">
            <h3>Monthly Active Users</h3>
            <p class="muted">{months} months</p>
            {monthly}
        </div>
    </div>
</section>"##,
            days = activity.daily.len(),
            peak = activity.peak_daily(),
            weeks = activity.weekly.len(),
            months = activity.monthly.len(),
            daily = chart_or_notice("dau-chart", activity.daily.is_empty()),
            weekly = chart_or_notice("wau-chart", activity.weekly.is_empty()),
            monthly = chart_or_notice("mau-chart", activity.monthly.is_empty()),
        )
    }

    fn generate_revenue_tab(&self, revenue: &RevenueSection) -> String {
        format!(
            r##"<section id="tab-revenue" class="tab-content">
    <h2>Revenue Trends Over Time</h2>
    <div class="card">
        <h3>Monthly Revenue</h3>
        {trend}
    </div>
    <h2>Revenue Breakdown by Segment</h2>
    <div class="grid grid-2">
        <div class="card">
            <h3>Revenue by Device Type</h3>
            {device}
            {device_table}
        </div>
        <div class="card">
            <h3>Avg Revenue by Game Mode</h3>
            {mode}
            {mode_table}
        </div>
    </div>
</section>"##,
            trend = chart_or_notice("revenue-trend-chart", revenue.monthly_trend.is_empty()),
            device = chart_or_notice("revenue-device-chart", revenue.by_device.is_empty()),
            device_table = value_table("Device_Type", "Total_Revenue_USD", &revenue.by_device),
            mode = chart_or_notice("revenue-mode-chart", revenue.avg_by_game_mode.is_empty()),
            mode_table = value_table(
                "Preferred_Game_Mode",
                "Total_Revenue_USD",
                &revenue.avg_by_game_mode
            ),
        )
    }

    fn generate_churn_tab(&self, churn: &ChurnSection) -> String {
        let limit = self.config.limits.max_table_rows;
        let heading = match (&churn.cutoff, &churn.latest_login) {
            (Some(cutoff), _) => format!(
                "Users inactive since before {}:",
                html_escape(cutoff)
            ),
            (None, Some(latest)) => format!(
                "A {}-day window before {} reaches past the supported date range; no user can be churned.",
                churn.threshold_days,
                html_escape(latest)
            ),
            (None, None) => "No login activity in the current view.".to_string(),
        };

        let body = if churn.users.is_empty() {
            EMPTY_NOTICE.to_string()
        } else {
            let rows: String = churn
                .users
                .iter()
                .take(limit)
                .map(|u| {
                    format!(
                        r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
                        html_escape(&u.user_id),
                        html_escape(&u.username),
                        html_escape(&u.last_login),
                        opt_int(u.total_play_sessions),
                        opt_usd(u.total_revenue_usd),
                    )
                })
                .collect::<Vec<_>>()
                .join("\n                ");
            format!(
                r#"<table id="churn-table">
            <thead><tr><th>User_ID</th><th>Username</th><th>Last_Login</th><th class="num">Total_Play_Sessions</th><th class="num">Total_Revenue_USD</th></tr></thead>
            <tbody>
                {}
            </tbody>
        </table>"#,
                rows
            )
        };

        let shown = churn.users.len().min(limit);
        let truncation_notice = if churn.truncated || shown < churn.users.len() {
            format!(
                r#"<p class="muted">Showing {} of {} churned users</p>"#,
                shown, churn.total_count
            )
        } else {
            String::new()
        };

        format!(
            r##"<section id="tab-churn" class="tab-content">
    <h2>Potential Churn Users</h2>
    <div class="grid grid-3" style="margin-bottom: 1.5rem;">
        <div class="card stat-card">
            <div class="stat-value">{count}</div>
            <div class="stat-label">Churned Users ({days}-day window)</div>
        </div>
        <div class="card stat-card">
            <div class="stat-value">{at_risk}</div>
            <div class="stat-label">Revenue At Risk</div>
        </div>
    </div>
    <div class="card">
        <p>{heading}</p>
        {truncation_notice}
        {body}
    </div>
</section>"##,
            count = churn.total_count,
            days = churn.threshold_days,
            at_risk = format_usd(churn.revenue_at_risk()),
            heading = heading,
            truncation_notice = truncation_notice,
            body = body,
        )
    }

    fn generate_top_users_tab(&self, top: &TopUsersSection) -> String {
        let body = if top.users.is_empty() {
            EMPTY_NOTICE.to_string()
        } else {
            let rows: String = top
                .users
                .iter()
                .enumerate()
                .map(|(rank, u)| {
                    format!(
                        r#"<tr><td class="num">{}</td><td>{}</td><td>{}</td><td class="num">{}</td><td class="num">{}</td><td class="num">{}</td><td>{}</td></tr>"#,
                        rank + 1,
                        html_escape(&u.user_id),
                        html_escape(&u.username),
                        opt_usd(u.total_revenue_usd),
                        u.total_hours_played
                            .map(|h| format!("{:.1}", h))
                            .unwrap_or_else(|| "N/A".to_string()),
                        opt_int(u.in_game_purchases_count),
                        html_escape(&u.preferred_game_mode),
                    )
                })
                .collect::<Vec<_>>()
                .join("\n                ");
            format!(
                r#"<table id="top-users-table">
            <thead><tr><th class="num">#</th><th>User_ID</th><th>Username</th><th class="num">Total_Revenue_USD</th><th class="num">Total_Hours_Played</th><th class="num">In_Game_Purchases_Count</th><th>Preferred_Game_Mode</th></tr></thead>
            <tbody>
                {}
            </tbody>
        </table>"#,
                rows
            )
        };

        format!(
            r##"<section id="tab-top-users" class="tab-content">
    <h2>Top High-Value Users</h2>
    <div class="card">
        <p class="muted">Top {limit} by Total_Revenue_USD</p>
        {body}
    </div>
</section>"##,
            limit = top.limit,
            body = body,
        )
    }

    fn generate_cohort_tab(&self, cohort: &CohortSection) -> String {
        let best = cohort
            .best_cohort()
            .map(|p| {
                format!(
                    r#"<p class="muted">Best cohort: {} ({})</p>"#,
                    html_escape(&p.label),
                    p.value_formatted()
                )
            })
            .unwrap_or_default();

        format!(
            r##"<section id="tab-cohort" class="tab-content">
    <h2>Cohort Analysis: Avg Revenue by Signup Month</h2>
    <div class="card">
        {best}
        {chart}
        {table}
    </div>
</section>"##,
            best = best,
            chart = chart_or_notice("cohort-chart", cohort.is_empty()),
            table = value_table("Signup_Month", "Total_Revenue_USD", &cohort.cohorts),
        )
    }

    fn generate_export_tab(&self, export: &ExportSection) -> String {
        format!(
            r##"<section id="tab-export" class="tab-content">
    <h2>Export Data</h2>
    <div class="card">
        <p>{rows} rows, {size}</p>
        <a class="download-btn" id="download-csv" href="{href}" download="{filename}" type="{mime}">Download Filtered CSV</a>
    </div>
</section>"##,
            rows = export.rows,
            size = export.size_formatted(),
            href = export.data_uri(),
            filename = html_escape(&export.filename),
            mime = html_escape(&export.mime_type),
        )
    }
}

fn chart_or_notice(id: &str, empty: bool) -> String {
    if empty {
        EMPTY_NOTICE.to_string()
    } else {
        format!(r#"<div id="{}" class="chart"></div>"#, id)
    }
}

fn value_table(key_header: &str, value_header: &str, points: &[ValuePoint]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let rows: String = points
        .iter()
        .map(|p| {
            format!(
                r#"<tr><td>{}</td><td class="num">{}</td></tr>"#,
                html_escape(&p.label),
                p.value_formatted()
            )
        })
        .collect::<Vec<_>>()
        .join("");
    format!(
        r#"<table><thead><tr><th>{}</th><th class="num">{}</th></tr></thead><tbody>{}</tbody></table>"#,
        key_header, value_header, rows
    )
}

fn opt_usd(value: Option<f64>) -> String {
    value.map(format_usd).unwrap_or_else(|| "N/A".to_string())
}

fn opt_int(value: Option<i64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
