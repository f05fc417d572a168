use chrono::Utc;
use url::Url;

use crate::engine::MatchContext;
use crate::journal::DailySummary;
use crate::lines::LineEstimate;
use crate::scanner::ScanStats;
use crate::types::{Period, Side, StrategyResult};

const SEARCH_URL: &str = "https://www.google.com/search";

/// A signal rendered both ways so a rejected HTML send can fall back.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalMessage {
    pub html: String,
    pub plain: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Markup {
    Html,
    Plain,
}

impl Markup {
    fn text(self, s: &str) -> String {
        match self {
            Markup::Html => escape_html(s),
            Markup::Plain => s.to_string(),
        }
    }

    fn bold(self, s: &str) -> String {
        match self {
            Markup::Html => format!("<b>{}</b>", escape_html(s)),
            Markup::Plain => s.to_string(),
        }
    }

    fn link(self, label: &str, url: &str) -> String {
        match self {
            Markup::Html => format!("<a href=\"{}\">{}</a>", escape_html(url), escape_html(label)),
            Markup::Plain => format!("{label}: {url}"),
        }
    }
}

/// Escape the characters Telegram's HTML mode reserves.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Search link for the match on the bookmaker's site.
pub fn bookmaker_link(home: &str, away: &str, league: &str) -> Option<String> {
    let query = format!("site:bet365.com {home} x {away} {league}");
    Url::parse_with_params(SEARCH_URL, &[("q", query.trim())])
        .ok()
        .map(|u| u.to_string())
}

fn period_tag(period: Option<Period>) -> &'static str {
    period.map(Period::label).unwrap_or("-")
}

fn pct(p: f64) -> String {
    format!("{:.0}%", p * 100.0)
}

fn render(
    m: Markup,
    ctx: &MatchContext<'_>,
    result: &StrategyResult,
    lines: &[LineEstimate],
) -> String {
    let snap = ctx.snapshot;
    let (h, a) = (&ctx.home, &ctx.away);
    let mut out = Vec::new();

    out.push(format!("🚩 {}", m.bold("CORNER SIGNAL")));
    if !snap.league.is_empty() {
        out.push(format!("🏆 {}", m.text(&snap.league)));
    }
    out.push(format!(
        "⚽ {} x {}",
        m.bold(&snap.home_name),
        m.bold(&snap.away_name)
    ));
    out.push(format!(
        "⏱ {:.0}' ({}) | Score: {}-{}",
        ctx.minute,
        period_tag(ctx.period),
        snap.goals(Side::Home),
        snap.goals(Side::Away)
    ));
    out.push(format!(
        "🚩 Corners: H {} - A {} (total {})",
        h.corners,
        a.corners,
        ctx.total_corners()
    ));
    out.push(format!(
        "⚔️ Attacks: H {} - A {} | Dangerous: H {} - A {}",
        h.attacks, a.attacks, h.danger, a.danger
    ));
    out.push(format!(
        "🎯 Shots: H {} - A {} | Possession: H {}% - A {}%",
        h.shots, a.shots, h.possession, a.possession
    ));
    out.push(format!(
        "📈 Pressure: H {:.2} - A {:.2} | 🏟 Small venue: {}",
        ctx.pressure.home,
        ctx.pressure.away,
        if ctx.small_venue { "✅" } else { "❌" }
    ));

    out.push(String::new());
    out.push(format!("🧠 {}", m.bold("Strategies")));
    if result.fired.is_empty() {
        out.push(format!(
            " • Composite signal (quorum {}/5)",
            result.quorum_hits
        ));
    } else {
        for name in &result.fired {
            out.push(format!(" • {}", m.text(name)));
        }
    }

    if !lines.is_empty() {
        out.push(String::new());
        out.push(format!("📐 {}", m.bold("Top lines")));
        for line in lines {
            let push = if line.p_push > 0.0 {
                format!(" | push {}", pct(line.p_push))
            } else {
                String::new()
            };
            out.push(format!(
                " • Over {:.1}: win {}{}",
                line.line,
                pct(line.p_win),
                push
            ));
        }
    }

    if let Some(url) = bookmaker_link(&snap.home_name, &snap.away_name, &snap.league) {
        out.push(String::new());
        out.push(format!("🔎 {}", m.link("Find on bet365", &url)));
    }

    out.join("\n")
}

/// Render the channel message for a qualifying signal.
pub fn signal_message(
    ctx: &MatchContext<'_>,
    result: &StrategyResult,
    lines: &[LineEstimate],
) -> SignalMessage {
    SignalMessage {
        html: render(Markup::Html, ctx, result, lines),
        plain: render(Markup::Plain, ctx, result, lines),
    }
}

/// One-line echo for the admin chat. Plain text.
pub fn admin_summary(ctx: &MatchContext<'_>, result: &StrategyResult) -> String {
    let snap = ctx.snapshot;
    let what = if result.fired.is_empty() {
        format!("composite {}/5", result.quorum_hits)
    } else {
        result.fired.join(", ")
    };
    format!(
        "[signal] {} {}-{} {} {:.0}' ({}) corners {} | {}",
        snap.label(),
        snap.goals(Side::Home),
        snap.goals(Side::Away),
        snap.league,
        ctx.minute,
        period_tag(ctx.period),
        ctx.total_corners(),
        what
    )
}

pub fn startup_text() -> String {
    format!(
        "🤖 Corner signal bot online (v{}). Watching live matches.",
        env!("CARGO_PKG_VERSION")
    )
}

pub fn help_text() -> String {
    "Commands:\n/status - scanner status and API usage\n/today - today's signals by strategy".to_string()
}

fn human_duration(secs: i64) -> String {
    let secs = secs.max(0);
    let (h, m) = (secs / 3600, (secs % 3600) / 60);
    if h > 0 { format!("{h}h {m}m") } else { format!("{m}m") }
}

/// Plain-text answer to `/status`.
pub fn status_text(stats: &ScanStats) -> String {
    let now = Utc::now();
    let uptime = human_duration((now - stats.started_at).num_seconds());
    let last_scan = stats
        .last_scan_at
        .map(|t| t.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    let quota = match stats.usage.minute_used_pct() {
        Some(p) => format!("{p:.0}% of minute quota ({})", stats.usage.health()),
        None => stats.usage.health().to_string(),
    };
    [
        "📊 Status".to_string(),
        format!("Uptime: {uptime}"),
        format!("Scans: {}", stats.scans),
        format!("Last scan: {last_scan}"),
        format!("Live matches (last scan): {}", stats.live_matches),
        format!("Tracked matches: {}", stats.tracked_matches),
        format!(
            "Signals: {} last scan, {} total",
            stats.signals_last_cycle, stats.signals_total
        ),
        format!("Delivery failures: {}", stats.delivery_failures),
        format!("Next scan in: {}s", stats.next_interval_secs),
        format!("API: {} requests, {quota}", stats.usage.requests),
    ]
    .join("\n")
}

/// Plain-text answer to `/today`.
pub fn daily_summary_text(summary: &DailySummary) -> String {
    let day = summary
        .date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default();
    if summary.total == 0 {
        return format!("📅 {day}: no signals yet.");
    }
    let mut out = vec![format!("📅 {day}: {} signals", summary.total)];
    for (name, count) in &summary.by_strategy {
        out.push(format!(" • {name}: {count}"));
    }
    let outcomes: Vec<String> = summary
        .by_outcome
        .iter()
        .map(|(o, n)| format!("{o:?}: {n}").to_lowercase())
        .collect();
    out.push(format!("Outcomes: {}", outcomes.join(", ")));
    out.join("\n")
}
