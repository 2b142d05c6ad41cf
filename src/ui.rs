use crate::charts::{
    ChartData, feature_importance_chart, gender_split_chart, gender_trend_chart,
    medal_type_chart, palette, series_chart,
};
use crate::dashboard::{
    AGE_RANGE, Dashboard, FilterOptions, Filters, HEIGHT_RANGE, PredictionView, Season, Sex, Slot,
    Tab, WEIGHT_RANGE,
};
use crate::models::{CountryStats, ModelInfo, Series};
use std::fmt::Write;
use std::ops::RangeInclusive;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 260.0;
const PADDING_X: f64 = 44.0;
const PADDING_Y: f64 = 34.0;
const TOP: f64 = 24.0;
const MAX_X_LABELS: usize = 12;

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let filters = if dashboard.tab.uses_filters() {
        render_filter_bar(&dashboard.filters, &dashboard.options)
    } else {
        String::new()
    };
    let content = match dashboard.tab {
        Tab::Overview => render_overview(dashboard),
        Tab::Trends => render_trends(dashboard),
        Tab::Athletes => render_athletes(dashboard),
        Tab::Country => render_country(dashboard),
        Tab::Predict => render_predict(dashboard),
    };
    let synced = dashboard
        .synced_at
        .map(|at| format!(" · LAST SYNC {}", at.format("%H:%M:%S")))
        .unwrap_or_default();

    fill_template(
        INDEX_HTML,
        &[
            ("TABS", render_tabs(dashboard.tab).as_str()),
            ("BADGE", render_badge(dashboard.model_info.as_ref()).as_str()),
            ("SYNCED", synced.as_str()),
            ("FILTERS", filters.as_str()),
            ("CONTENT", content.as_str()),
        ],
    )
}

/// Substitutes `{{NAME}}` placeholders in a single pass over `template`.
/// Inserted values are never scanned again.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after.find("}}").and_then(|end| {
            let name = &after[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (end, *value))
        });
        match value {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn render_tabs(active: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            let class = if *tab == active { "tab active" } else { "tab" };
            format!(r#"<a class="{class}" href="/tab/{tab}" data-tab="{tab}">{tab}</a>"#)
        })
        .collect()
}

fn render_badge(info: Option<&ModelInfo>) -> String {
    match info.and_then(|info| info.accuracy) {
        Some(accuracy) => format!(
            r#"<div class="badge" id="model-accuracy"><span class="muted">MODEL ACC</span> <strong>{:.1}%</strong></div>"#,
            accuracy * 100.0
        ),
        None => String::new(),
    }
}

fn render_filter_bar(filters: &Filters, options: &FilterOptions) -> String {
    let country_select = select(
        "country",
        "All countries",
        &options.countries,
        &filters.country,
    );
    let sport_select = select("sport", "All sports", &options.sports, &filters.sport);

    let mut seasons = String::new();
    let choices = std::iter::once(("", "All", filters.season.is_none())).chain(
        Season::ALL
            .iter()
            .map(|season| (season.as_str(), season.as_str(), filters.season == Some(*season))),
    );
    for (value, label, checked) in choices {
        let checked = if checked { " checked" } else { "" };
        let _ = write!(
            seasons,
            r#"<label class="toggle"><input type="radio" name="season" value="{value}"{checked} onchange="this.form.submit()"><span>{label}</span></label>"#
        );
    }

    let state = if filters.is_unfiltered() {
        "unfiltered"
    } else {
        "filtered"
    };

    format!(
        r#"<section class="filter-bar" data-state="{state}">
      <form method="post" action="/filters" class="filters">
        {country_select}
        <div class="toggles">{seasons}</div>
        {sport_select}
        <button type="submit" class="ghost">Apply</button>
      </form>
      <form method="post" action="/filters/reset">
        <button type="submit" class="ghost">Reset</button>
      </form>
    </section>"#
    )
}

fn select(name: &str, placeholder: &str, options: &[String], current: &str) -> String {
    let mut html = format!(
        r#"<select name="{name}" onchange="this.form.submit()"><option value="">{placeholder}</option>"#
    );
    for option in options {
        let selected = if option == current { " selected" } else { "" };
        let value = escape(option);
        let _ = write!(html, r#"<option value="{value}"{selected}>{value}</option>"#);
    }
    // Keep a selection the server no longer lists visible.
    if !current.is_empty() && !options.iter().any(|option| option == current) {
        let value = escape(current);
        let _ = write!(html, r#"<option value="{value}" selected>{value}</option>"#);
    }
    html.push_str("</select>");
    html
}

fn render_overview(dashboard: &Dashboard) -> String {
    let charts = &dashboard.charts;
    let medals = chart_card(
        "🏅 Medals by Country",
        "medals-by-country",
        &charts.medals_by_country,
        |series| bar_chart(&series_chart(series, "Medals", palette::GOLD), false),
    );
    let types = chart_card(
        "🥇 Medals by Type",
        "medals-by-type",
        &dashboard.medals_by_type,
        |breakdown| bar_chart(&medal_type_chart(breakdown), true),
    );
    let gender = chart_card(
        "⚧ Gender Distribution",
        "gender-distribution",
        &charts.gender_distribution,
        |split| split_bar(&gender_split_chart(split)),
    );

    format!(
        r#"<div class="grid two">{medals}{types}</div><div class="grid two">{gender}{coverage}</div>"#,
        coverage = render_coverage(&dashboard.options)
    )
}

fn render_coverage(options: &FilterOptions) -> String {
    let span = match (options.years.iter().min(), options.years.iter().max()) {
        (Some(first), Some(last)) => format!("{first} – {last}"),
        _ => "—".to_string(),
    };
    let body = format!(
        r#"<div class="stats">{}{}{}{}</div>"#,
        stat("Years covered", &span),
        stat("Games", &options.years.len().to_string()),
        stat("Countries", &options.countries.len().to_string()),
        stat("Sports", &options.sports.len().to_string()),
    );
    card("📚 Dataset Coverage", &body, false)
}

fn render_trends(dashboard: &Dashboard) -> String {
    let charts = &dashboard.charts;
    let medals = chart_card(
        "📈 Medals Over Time",
        "medals-over-time",
        &charts.medals_over_time,
        |series| line_chart(&series_chart(series, "Medals", palette::ACCENT1)),
    );
    let gender = chart_card(
        "👥 Gender Over Time",
        "gender-over-time",
        &charts.gender_over_time,
        |trend| line_chart(&gender_trend_chart(trend)),
    );
    let athletes = chart_card(
        "🏃 Athletes Over Time",
        "athlete-count-over-time",
        &charts.athletes_over_time,
        |series| line_chart(&series_chart(series, "Athletes", palette::ACCENT3)),
    );
    format!(r#"<div class="grid">{medals}<div class="grid two">{gender}{athletes}</div></div>"#)
}

fn render_athletes(dashboard: &Dashboard) -> String {
    let charts = &dashboard.charts;
    let ages = chart_card(
        "🎂 Age Distribution",
        "age-distribution",
        &charts.age_distribution,
        |series| bar_chart(&series_chart(series, "Athletes", palette::ACCENT2), false),
    );
    let avg_age = chart_card(
        "⏳ Average Age by Sport",
        "avg-age-by-sport",
        &charts.avg_age_by_sport,
        |series| bar_chart(&series_chart(series, "Average age", palette::ACCENT3), false),
    );
    let sports = chart_card(
        "🏆 Top Sports by Medals",
        "top-sports-by-medals",
        &charts.top_sports,
        |series| bar_chart(&series_chart(series, "Medals", palette::GOLD), false),
    );
    format!(r#"<div class="grid">{ages}<div class="grid two">{avg_age}{sports}</div></div>"#)
}

fn render_country(dashboard: &Dashboard) -> String {
    let country = &dashboard.filters.country;
    if country.is_empty() {
        return card(
            "🌍 Country Profile",
            r#"<p class="hint">Pick a country in the filter bar to see its profile.</p>"#,
            false,
        );
    }

    let body = country_stats(dashboard.charts.country_stats.loaded());
    let profile = card(&format!("🌍 {}", escape(country)), &body, true);
    let sports = chart_card(
        "🏆 Best Sports",
        "top-sports-by-medals",
        &dashboard.charts.top_sports,
        |series| bar_chart(&series_chart(series, "Medals", palette::GOLD), false),
    );
    format!(r#"<div class="grid two">{profile}{sports}</div>"#)
}

fn country_stats(stats: Option<&CountryStats>) -> String {
    let dash = || "—".to_string();
    let count = |pick: fn(&CountryStats) -> u64| {
        stats.map(|s| pick(s).to_string()).unwrap_or_else(dash)
    };

    let total_medals = stats
        .and_then(|s| s.total_medals)
        .map(|n| n.to_string())
        .unwrap_or_else(dash);
    let avg_age = stats
        .and_then(|s| s.avg_age)
        .map(|age| format!("{age:.1}"))
        .unwrap_or_else(dash);
    let best_sport = stats
        .and_then(|s| s.best_sport.as_deref())
        .map(escape)
        .unwrap_or_else(dash);

    format!(
        r#"<div class="stats">{}{}{}{}{}{}{}</div>"#,
        stat("Athletes", &count(|s| s.total_athletes)),
        stat("Total medals", &total_medals),
        medal_stat("Gold", &count(|s| s.gold), palette::GOLD),
        medal_stat("Silver", &count(|s| s.silver), palette::SILVER),
        medal_stat("Bronze", &count(|s| s.bronze), palette::BRONZE),
        stat("Average age", &avg_age),
        stat("Best sport", &best_sport),
    )
}

fn render_predict(dashboard: &Dashboard) -> String {
    let predictor = render_predictor(&dashboard.prediction);
    let info = dashboard.model_info.as_ref();
    let mut side = render_model_info(info);
    if let Some(importance) = info.and_then(|info| info.feature_importance.as_ref()) {
        side.push_str(&render_feature_importance(importance));
    }
    side.push_str(&card("💡 Top Insights", INSIGHTS_HTML, false));

    format!(r#"<div class="grid two">{predictor}<div class="grid">{side}</div></div>"#)
}

fn render_predictor(view: &PredictionView) -> String {
    let input = &view.input;
    let mut body = String::from(
        r#"<form method="post" action="/predict" class="predictor"><div class="controls">"#,
    );
    body.push_str(&slider("age", "Age", input.age, &AGE_RANGE));
    body.push_str(&slider("height", "Height (cm)", input.height, &HEIGHT_RANGE));
    body.push_str(&slider("weight", "Weight (kg)", input.weight, &WEIGHT_RANGE));

    body.push_str(r#"<div class="control"><span class="control-label">Gender</span><div class="toggles">"#);
    for sex in [Sex::M, Sex::F] {
        let checked = if input.sex == sex { " checked" } else { "" };
        let _ = write!(
            body,
            r#"<label class="toggle"><input type="radio" name="sex" value="{}"{checked}><span>{}</span></label>"#,
            sex.as_str(),
            sex.label()
        );
    }
    body.push_str("</div></div></div>");

    let (label, disabled) = if view.loading {
        ("Computing...", " disabled")
    } else {
        ("Predict →", "")
    };
    let _ = write!(
        body,
        r#"<button type="submit" class="primary"{disabled}>{label}</button></form>"#
    );

    if let Some(error) = &view.error {
        let _ = write!(
            body,
            r#"<div class="error" id="predict-error">⚠ {}</div>"#,
            escape(error)
        );
    }

    if let Some(probability) = view.result {
        let color = probability_color(probability);
        let _ = write!(
            body,
            r#"<div class="result" id="predict-result">
          <div class="probability" style="color: rgb({color})">{probability:.1}%</div>
          <div class="muted">probability of winning a medal</div>
          <div class="meter"><div style="width: {probability}%; background: linear-gradient(90deg, rgb({color}), rgba({color},0.5))"></div></div>
        </div>"#
        );
    }

    card("🎯 Medal Probability Predictor", &body, true)
}

fn slider(name: &str, label: &str, value: u32, range: &RangeInclusive<u32>) -> String {
    format!(
        r#"<div class="control"><label class="control-label" for="{name}">{label}: <span id="{name}-value">{value}</span></label><input type="range" id="{name}" name="{name}" min="{min}" max="{max}" step="1" value="{value}" oninput="document.getElementById('{name}-value').textContent = this.value"></div>"#,
        min = range.start(),
        max = range.end(),
    )
}

fn probability_color(probability: f64) -> &'static str {
    if probability > 50.0 {
        "0,245,255"
    } else if probability > 25.0 {
        "255,196,0"
    } else {
        "255,0,110"
    }
}

fn render_model_info(info: Option<&ModelInfo>) -> String {
    let algorithm = info
        .and_then(|info| info.model.as_deref())
        .unwrap_or("Random Forest Classifier");
    let accuracy = info
        .and_then(|info| info.accuracy)
        .map(|accuracy| format!("{:.2}%", accuracy * 100.0))
        .unwrap_or_else(|| "Loading...".to_string());

    let coefficients = info.and_then(|info| info.features.as_ref()).filter(|f| !f.is_empty());
    let features = coefficients
        .or_else(|| info.and_then(|info| info.feature_importance.as_ref()))
        .filter(|series| !series.is_empty())
        .map(|series| escape(&series.labels().collect::<Vec<_>>().join(", ")))
        .unwrap_or_else(|| "Age, Sex, Height, Weight".to_string());

    let mut rows = vec![
        ("Algorithm", escape(algorithm)),
        ("Training Features", features),
    ];
    if let Some(coefficients) = coefficients {
        let weights: Vec<String> = coefficients
            .0
            .iter()
            .map(|(name, weight)| format!("{} {weight:+.3}", escape(name)))
            .collect();
        rows.push(("Coefficients", weights.join(" · ")));
    }
    rows.extend([
        ("Model Accuracy", accuracy),
        ("Dataset", "120+ Years of Olympic Data".to_string()),
        ("Athletes", "271,116 entries".to_string()),
    ]);
    let body: String = rows
        .iter()
        .map(|(key, value)| {
            format!(
                r#"<div class="row"><span class="muted">{key}</span><strong>{value}</strong></div>"#
            )
        })
        .collect();
    card("🤖 Model Info", &body, false)
}

fn render_feature_importance(importance: &Series) -> String {
    let chart = feature_importance_chart(importance);
    let Some(dataset) = chart.datasets.first() else {
        return String::new();
    };
    let mut body = String::new();
    for (feature, value) in chart.labels.iter().zip(&dataset.values) {
        let percent = value * 100.0;
        let _ = write!(
            body,
            r#"<div class="importance"><div class="row"><span class="feature">{}</span><span class="accent">{percent:.1}%</span></div><div class="meter"><div style="width: {percent}%; background: linear-gradient(90deg, {}, {})"></div></div></div>"#,
            escape(feature),
            palette::ACCENT1,
            dataset.color,
        );
    }
    card("📊 Feature Importance", &body, false)
}

fn chart_card<T>(
    title: &str,
    id: &str,
    slot: &Slot<T>,
    draw: impl FnOnce(&T) -> String,
) -> String {
    let (state, svg) = match slot {
        Slot::Loaded(data) => ("loaded", draw(data)),
        Slot::Empty => ("empty", empty_svg()),
        Slot::Failed(_) => ("failed", empty_svg()),
    };
    let body = format!(r#"<div class="chart" id="{id}" data-state="{state}">{svg}</div>"#);
    card(title, &body, false)
}

fn card(title: &str, body: &str, glow: bool) -> String {
    let class = if glow { "card glow" } else { "card" };
    format!(
        r#"<section class="{class}"><h2 class="card-title"><span class="bar"></span>{title}</h2>{body}</section>"#
    )
}

fn stat(label: &str, value: &str) -> String {
    format!(r#"<div class="stat"><span class="label">{label}</span><span class="value">{value}</span></div>"#)
}

fn medal_stat(label: &str, value: &str, color: &str) -> String {
    format!(
        r#"<div class="stat"><span class="label">{label}</span><span class="value" style="color: {color}">{value}</span></div>"#
    )
}

fn empty_svg() -> String {
    svg(r#"<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>"#)
}

fn svg(inner: &str) -> String {
    format!(
        r#"<svg viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="chart">{inner}</svg>"#
    )
}

/// Vertical bars, grouped side by side or stacked per label.
fn bar_chart(chart: &ChartData, stacked: bool) -> String {
    if chart.is_empty() {
        return empty_svg();
    }

    let count = chart.labels.len();
    let max = if stacked {
        (0..count)
            .map(|i| chart.datasets.iter().map(|set| set.values[i]).sum::<f64>())
            .fold(0.0, f64::max)
    } else {
        chart.max_value()
    };
    let scale = Scale::new(0.0, max);
    let band = (WIDTH - PADDING_X * 2.0) / count as f64;
    let groups = if stacked { 1 } else { chart.datasets.len().max(1) };
    let bar_width = band * 0.8 / groups as f64;

    let mut inner = scale.grid();
    for (index, label) in chart.labels.iter().enumerate() {
        let band_x = PADDING_X + band * index as f64 + band * 0.1;
        let mut base = 0.0;
        for (group, set) in chart.datasets.iter().enumerate() {
            let value = set.values[index];
            let (x, from) = if stacked {
                (band_x, base)
            } else {
                (band_x + bar_width * group as f64, 0.0)
            };
            let y_top = scale.y(from + value);
            let height = (scale.y(from) - y_top).max(0.0);
            let _ = write!(
                inner,
                r#"<rect x="{x:.2}" y="{y_top:.2}" width="{bar_width:.2}" height="{height:.2}" fill="{}"><title>{} · {}: {}</title></rect>"#,
                set.color,
                escape(label),
                escape(&set.label),
                format_value(value)
            );
            base += value;
        }
    }
    inner.push_str(&x_labels(&chart.labels, |index| {
        PADDING_X + band * (index as f64 + 0.5)
    }));
    inner.push_str(&legend(chart));
    svg(&inner)
}

fn line_chart(chart: &ChartData) -> String {
    if chart.is_empty() {
        return empty_svg();
    }

    let count = chart.labels.len();
    let scale = Scale::new(0.0, chart.max_value());
    let step = if count > 1 {
        (WIDTH - PADDING_X * 2.0) / (count - 1) as f64
    } else {
        0.0
    };
    let x = |index: usize| PADDING_X + index as f64 * step;

    let mut inner = scale.grid();
    for set in &chart.datasets {
        let path = set
            .values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let command = if index == 0 { 'M' } else { 'L' };
                format!("{command} {:.2} {:.2}", x(index), scale.y(*value))
            })
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            inner,
            r#"<path class="chart-line" d="{path}" stroke="{}" />"#,
            set.color
        );
        if count <= 40 {
            for (index, value) in set.values.iter().enumerate() {
                let _ = write!(
                    inner,
                    r#"<circle class="chart-point" cx="{:.2}" cy="{:.2}" r="3" stroke="{}"><title>{}: {}</title></circle>"#,
                    x(index),
                    scale.y(*value),
                    set.color,
                    escape(&chart.labels[index]),
                    format_value(*value)
                );
            }
        }
    }
    inner.push_str(&x_labels(&chart.labels, x));
    inner.push_str(&legend(chart));
    svg(&inner)
}

/// Two-part horizontal bar for a binary split such as male/female.
fn split_bar(chart: &ChartData) -> String {
    let Some(set) = chart.datasets.first() else {
        return empty_svg();
    };
    let total: f64 = set.values.iter().sum();
    if total <= 0.0 {
        return empty_svg();
    }

    let colors = [palette::ACCENT1, palette::ACCENT2];
    let usable = WIDTH - PADDING_X * 2.0;
    let mut offset = PADDING_X;
    let mut inner = String::new();
    for (index, (label, value)) in chart.labels.iter().zip(&set.values).enumerate() {
        let share = value / total;
        let width = usable * share;
        let color = colors[index % colors.len()];
        let _ = write!(
            inner,
            r#"<rect x="{offset:.2}" y="90" width="{width:.2}" height="48" fill="{color}" />
            <text class="chart-label" x="{:.2}" y="170" text-anchor="middle">{} {:.1}% ({})</text>"#,
            offset + width / 2.0,
            escape(label),
            share * 100.0,
            format_value(*value)
        );
        offset += width;
    }
    svg(&inner)
}

struct Scale {
    min: f64,
    range: f64,
}

impl Scale {
    fn new(min: f64, max: f64) -> Self {
        let (min, max) = if min == max { (min, min + 1.0) } else { (min, max) };
        Self {
            min,
            range: max - min,
        }
    }

    fn y(&self, value: f64) -> f64 {
        let scale = (HEIGHT - TOP - PADDING_Y) / self.range;
        HEIGHT - PADDING_Y - (value - self.min) * scale
    }

    fn grid(&self) -> String {
        const TICKS: usize = 4;
        let mut grid = String::new();
        for i in 0..=TICKS {
            let value = self.min + self.range * i as f64 / TICKS as f64;
            let y = self.y(value);
            let _ = write!(
                grid,
                r#"<line class="chart-grid" x1="{PADDING_X}" y1="{y:.2}" x2="{}" y2="{y:.2}" /><text class="chart-label" x="{}" y="{:.2}" text-anchor="end">{}</text>"#,
                WIDTH - PADDING_X,
                PADDING_X - 10.0,
                y + 4.0,
                format_axis_value(value)
            );
        }
        grid
    }
}

fn x_labels(labels: &[String], x: impl Fn(usize) -> f64) -> String {
    let every = labels.len().div_ceil(MAX_X_LABELS).max(1);
    let mut html = String::new();
    for (index, label) in labels.iter().enumerate() {
        if index % every != 0 {
            continue;
        }
        let _ = write!(
            html,
            r#"<text class="chart-label" x="{:.2}" y="{}" text-anchor="middle">{}</text>"#,
            x(index),
            HEIGHT - PADDING_Y + 18.0,
            escape(&short_label(label))
        );
    }
    html
}

fn legend(chart: &ChartData) -> String {
    if chart.datasets.len() < 2 {
        return String::new();
    }
    let mut html = String::new();
    for (index, set) in chart.datasets.iter().enumerate() {
        let x = PADDING_X + index as f64 * 90.0;
        let _ = write!(
            html,
            r#"<rect x="{x}" y="6" width="10" height="10" fill="{}" /><text class="chart-label" x="{}" y="15">{}</text>"#,
            set.color,
            x + 14.0,
            escape(&set.label)
        );
    }
    html
}

fn short_label(label: &str) -> String {
    const LIMIT: usize = 10;
    if label.chars().count() <= LIMIT {
        label.to_string()
    } else {
        let cut: String = label.chars().take(LIMIT - 1).collect();
        format!("{cut}…")
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

fn format_axis_value(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    format_value(rounded)
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const INSIGHTS_HTML: &str = r#"<div class="insights">
  <p class="lead">🏅 Key patterns from the data:</p>
  <p>• Athletes aged <span class="accent">22–28</span> have the highest medal probability.</p>
  <p>• <span class="accent">Height &amp; weight</span> matter more in sports like Swimming and Rowing.</p>
  <p>• Female participation has grown <span class="accent-2">500%</span> since 1960.</p>
  <p>• The US, Russia, and Germany dominate total medal counts historically.</p>
</div>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Olympix Intelligence Dashboard</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Orbitron:wght@400;700;900&family=Space+Mono:wght@400;700&display=swap');

    :root {
      --bg: #050A14;
      --card: #0D1B2A;
      --card-border: #1A2E45;
      --text: #E8F4FD;
      --muted: #6B8CAE;
      --accent-1: #00F5FF;
      --accent-2: #FF006E;
      --accent-3: #8338EC;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background-color: var(--bg);
      background-image:
        linear-gradient(rgba(0, 245, 255, 0.03) 1px, transparent 1px),
        linear-gradient(90deg, rgba(0, 245, 255, 0.03) 1px, transparent 1px);
      background-size: 60px 60px;
      color: var(--text);
      font-family: "Space Mono", monospace;
    }

    header {
      position: sticky;
      top: 0;
      z-index: 10;
      background: rgba(5, 10, 20, 0.95);
      backdrop-filter: blur(20px);
      border-bottom: 1px solid var(--card-border);
      padding: 0 40px;
    }

    .header-inner {
      max-width: 1400px;
      margin: 0 auto;
      height: 70px;
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
    }

    .brand {
      font-family: "Orbitron", sans-serif;
      font-weight: 900;
      letter-spacing: 3px;
    }

    .brand small {
      display: block;
      font-family: "Space Mono", monospace;
      font-weight: 400;
      font-size: 9px;
      letter-spacing: 4px;
      color: var(--muted);
    }

    nav {
      display: flex;
      gap: 4px;
    }

    .tab {
      padding: 8px 20px;
      border-radius: 8px;
      border: 1px solid transparent;
      color: var(--muted);
      font-family: "Orbitron", sans-serif;
      font-size: 10px;
      letter-spacing: 2px;
      text-transform: uppercase;
      text-decoration: none;
    }

    .tab.active {
      color: var(--accent-1);
      border-color: var(--accent-1);
      background: rgba(0, 245, 255, 0.1);
    }

    .badge {
      padding: 6px 16px;
      border-radius: 20px;
      border: 1px solid rgba(0, 245, 255, 0.3);
      background: rgba(0, 245, 255, 0.05);
      font-size: 9px;
      letter-spacing: 2px;
    }

    .badge strong {
      color: var(--accent-1);
      font-family: "Orbitron", sans-serif;
      font-size: 13px;
    }

    main {
      max-width: 1400px;
      margin: 0 auto;
      padding: 32px 40px;
      display: grid;
      gap: 24px;
    }

    .filter-bar {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
    }

    .filters {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
    }

    select {
      background: var(--card);
      color: var(--text);
      border: 1px solid var(--card-border);
      border-radius: 8px;
      padding: 8px 12px;
      font-family: inherit;
    }

    .toggles {
      display: flex;
      gap: 6px;
    }

    .toggle input {
      display: none;
    }

    .toggle span {
      display: inline-block;
      padding: 8px 14px;
      border-radius: 8px;
      border: 1px solid var(--card-border);
      color: var(--muted);
      cursor: pointer;
      font-size: 11px;
    }

    .toggle input:checked + span {
      color: var(--accent-1);
      border-color: var(--accent-1);
      background: rgba(0, 245, 255, 0.1);
    }

    button {
      font-family: "Orbitron", sans-serif;
      letter-spacing: 2px;
      text-transform: uppercase;
      cursor: pointer;
      color: var(--accent-1);
      border: 1px solid var(--accent-1);
      border-radius: 10px;
      background: transparent;
    }

    button.ghost {
      padding: 8px 16px;
      font-size: 10px;
    }

    button.primary {
      width: 100%;
      padding: 14px;
      margin: 20px 0;
      font-size: 13px;
      background: linear-gradient(135deg, rgba(0, 245, 255, 0.2), rgba(131, 56, 236, 0.2));
    }

    button:disabled {
      opacity: 0.7;
      cursor: not-allowed;
    }

    .grid {
      display: grid;
      gap: 24px;
    }

    .grid.two {
      grid-template-columns: repeat(auto-fit, minmax(420px, 1fr));
    }

    .card {
      background: linear-gradient(135deg, var(--card) 0%, #0A1628 100%);
      border: 1px solid var(--card-border);
      border-radius: 16px;
      padding: 24px;
      box-shadow: 0 4px 24px rgba(0, 0, 0, 0.4);
    }

    .card.glow {
      border-color: var(--accent-1);
      box-shadow: 0 0 30px rgba(0, 245, 255, 0.15);
    }

    .card-title {
      margin: 0 0 20px;
      font-family: "Orbitron", sans-serif;
      font-size: 13px;
      letter-spacing: 3px;
      color: var(--accent-1);
      text-transform: uppercase;
      display: flex;
      gap: 8px;
      align-items: center;
    }

    .card-title .bar {
      width: 4px;
      height: 16px;
      border-radius: 2px;
      background: var(--accent-1);
    }

    .chart svg {
      width: 100%;
      height: 260px;
      display: block;
    }

    .chart-line {
      fill: none;
      stroke-width: 3;
    }

    .chart-point {
      fill: var(--bg);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(107, 140, 174, 0.15);
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .controls {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 16px;
    }

    .control-label {
      display: block;
      margin-bottom: 6px;
      font-size: 10px;
      letter-spacing: 1px;
      text-transform: uppercase;
      color: var(--muted);
    }

    .control-label span {
      color: var(--accent-1);
    }

    input[type="range"] {
      width: 100%;
      accent-color: var(--accent-1);
    }

    .error {
      padding: 12px 16px;
      border-radius: 8px;
      margin-bottom: 12px;
      background: rgba(255, 0, 110, 0.1);
      border: 1px solid rgba(255, 0, 110, 0.4);
      color: var(--accent-2);
      font-size: 11px;
    }

    .result {
      text-align: center;
    }

    .probability {
      font-family: "Orbitron", sans-serif;
      font-size: 52px;
      font-weight: 900;
      line-height: 1;
    }

    .meter {
      margin-top: 12px;
      height: 8px;
      border-radius: 4px;
      background: rgba(255, 255, 255, 0.05);
      overflow: hidden;
    }

    .meter div {
      height: 100%;
      border-radius: 4px;
    }

    .row {
      display: flex;
      justify-content: space-between;
      padding: 10px 0;
      border-bottom: 1px solid var(--card-border);
      font-size: 11px;
    }

    .row strong,
    .accent {
      color: var(--accent-1);
    }

    .accent-2 {
      color: var(--accent-2);
    }

    .feature {
      text-transform: capitalize;
    }

    .muted,
    .hint {
      color: var(--muted);
      font-size: 11px;
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 16px;
    }

    .stat {
      display: grid;
      gap: 6px;
      padding: 16px;
      border-radius: 12px;
      border: 1px solid var(--card-border);
    }

    .stat .label {
      font-size: 10px;
      letter-spacing: 2px;
      text-transform: uppercase;
      color: var(--muted);
    }

    .stat .value {
      font-family: "Orbitron", sans-serif;
      font-size: 20px;
      color: var(--accent-1);
    }

    .insights {
      color: var(--muted);
      font-size: 12px;
      line-height: 1.8;
    }

    .insights .lead {
      color: var(--text);
    }

    footer {
      text-align: center;
      padding: 32px;
      border-top: 1px solid var(--card-border);
      color: var(--muted);
      font-size: 10px;
      letter-spacing: 2px;
    }

    @media (max-width: 900px) {
      header,
      main {
        padding-left: 18px;
        padding-right: 18px;
      }

      .grid.two {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <header>
    <div class="header-inner">
      <div class="brand">⚡ OLYMPIX<small>INTELLIGENCE DASHBOARD</small></div>
      <nav>{{TABS}}</nav>
      {{BADGE}}
    </div>
  </header>

  <main>
    {{FILTERS}}
    {{CONTENT}}
  </main>

  <footer>OLYMPIX INTELLIGENCE · 120 YEARS OF OLYMPIC DATA{{SYNCED}}</footer>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{Action, ChartUpdate, PredictorInput};

    fn on_tab(tab: Tab) -> Dashboard {
        Dashboard {
            tab,
            ..Dashboard::default()
        }
    }

    #[test]
    fn sliders_show_stored_values() {
        let mut dashboard = on_tab(Tab::Predict);
        dashboard.prediction.input = PredictorInput::clamped(31, Sex::F, 182, 77);
        let html = render_dashboard(&dashboard);

        assert!(html.contains(r#"<span id="age-value">31</span>"#));
        assert!(html.contains(r#"name="age" min="14" max="70" step="1" value="31""#));
        assert!(html.contains(r#"<span id="height-value">182</span>"#));
        assert!(html.contains(r#"<span id="weight-value">77</span>"#));
        assert!(html.contains(r#"value="F" checked"#));
    }

    #[test]
    fn prediction_result_and_error_rendering() {
        let mut dashboard = on_tab(Tab::Predict);
        dashboard.prediction.result = Some(63.456);
        let html = render_dashboard(&dashboard);
        assert!(html.contains("63.5%"));
        assert!(html.contains("rgb(0,245,255)"));
        assert!(!html.contains("predict-error"));

        dashboard.prediction.result = None;
        dashboard.prediction.error = Some("<b>down</b>".into());
        let html = render_dashboard(&dashboard);
        assert!(html.contains("⚠ &lt;b&gt;down&lt;/b&gt;"));
        assert!(!html.contains("predict-result"));
    }

    #[test]
    fn model_panels_follow_available_fields() {
        let mut dashboard = on_tab(Tab::Predict);
        let html = render_dashboard(&dashboard);
        assert!(!html.contains("model-accuracy"));
        assert!(!html.contains("Feature Importance"));
        assert!(html.contains("Loading..."));

        dashboard.model_info = Some(ModelInfo {
            accuracy: Some(0.8532),
            model: Some("Random Forest".into()),
            feature_importance: Some(Series::from([("Height", 0.41), ("Age", 0.2)])),
            features: None,
        });
        let html = render_dashboard(&dashboard);
        assert!(html.contains("model-accuracy"));
        assert!(html.contains("85.3%"));
        assert!(html.contains("85.32%"));
        assert!(html.contains("Feature Importance"));
        assert!(html.contains("41.0%"));
    }

    #[test]
    fn charts_render_bars_or_placeholder() {
        let mut dashboard = on_tab(Tab::Overview);
        let html = render_dashboard(&dashboard);
        assert!(html.contains(r#"id="medals-by-country" data-state="empty""#));
        assert!(html.contains("No data yet"));

        dashboard.charts.medals_by_country =
            Slot::Loaded(Series::from([("USA", 120.0), ("GBR", 80.0)]));
        let html = render_dashboard(&dashboard);
        assert!(html.contains(r#"id="medals-by-country" data-state="loaded""#));
        assert!(html.contains("USA · Medals: 120"));
        assert!(html.contains("GBR · Medals: 80"));
    }

    #[test]
    fn filter_bar_hidden_on_predict_tab() {
        assert!(render_dashboard(&on_tab(Tab::Trends)).contains(r#"<section class="filter-bar""#));
        let predict = render_dashboard(&on_tab(Tab::Predict));
        assert!(!predict.contains(r#"<section class="filter-bar""#));
    }

    #[test]
    fn filter_bar_marks_selection() {
        let mut dashboard = on_tab(Tab::Overview);
        dashboard.options.countries = vec!["Norway".into(), "USA".into()];
        dashboard.filters.country = "USA".into();
        dashboard.filters.season = Some(Season::Winter);
        let html = render_dashboard(&dashboard);
        assert!(html.contains(r#"data-state="filtered""#));
        assert!(html.contains(r#"<option value="USA" selected>USA</option>"#));
        assert!(html.contains(r#"value="Winter" checked"#));
    }

    #[test]
    fn country_tab_uses_em_dash_for_missing_stats() {
        let mut dashboard = on_tab(Tab::Country);
        assert!(render_dashboard(&dashboard).contains("Pick a country"));

        dashboard.filters.country = "Jamaica".into();
        dashboard.charts.country_stats = Slot::Loaded(CountryStats {
            total_athletes: 420,
            total_medals: None,
            gold: 17,
            silver: 30,
            bronze: 20,
            avg_age: None,
            best_sport: Some("Athletics".into()),
        });
        let html = render_dashboard(&dashboard);
        assert!(html.contains("🌍 Jamaica"));
        assert!(html.contains(r#"<span class="value">420</span>"#));
        assert!(html.contains(r#"<span class="label">Total medals</span><span class="value">—</span>"#));
        assert!(html.contains("Athletics"));
    }

    #[test]
    fn active_tab_is_highlighted() {
        let html = render_dashboard(&on_tab(Tab::Athletes));
        assert!(html.contains(r#"<a class="tab active" href="/tab/athletes""#));
        assert!(html.contains(r#"<a class="tab" href="/tab/overview""#));
    }

    #[test]
    fn value_formatting() {
        assert_eq!(format_value(120.0), "120");
        assert_eq!(format_value(24.36), "24.4");
        assert_eq!(format_axis_value(37.5), "37.5");
        assert_eq!(short_label("Modern Pentathlon"), "Modern Pe…");
        assert_eq!(escape(r#"a&b"'"#), "a&amp;b&quot;&#39;");
    }

    #[test]
    fn country_card_never_shows_previous_country_numbers() {
        let mut dashboard = on_tab(Tab::Country);
        let country = |name: &str| Filters {
            country: name.into(),
            ..Filters::default()
        };
        dashboard.apply(Action::SetFilters(country("USA")));
        dashboard.apply(Action::ChartLoaded {
            generation: 1,
            update: ChartUpdate::CountryStats(Ok(CountryStats {
                total_athletes: 420,
                total_medals: Some(67),
                gold: 777,
                silver: 30,
                bronze: 20,
                avg_age: None,
                best_sport: None,
            })),
        });
        assert!(render_dashboard(&dashboard).contains(">777<"));

        dashboard.apply(Action::SetFilters(country("Jamaica")));
        let html = render_dashboard(&dashboard);
        assert!(html.contains("🌍 Jamaica"));
        assert!(!html.contains(">777<"));
    }

    #[test]
    fn model_info_lists_trained_features_and_coefficients() {
        let mut dashboard = on_tab(Tab::Predict);
        let html = render_dashboard(&dashboard);
        assert!(html.contains("Age, Sex, Height, Weight"));
        assert!(!html.contains("Coefficients"));

        dashboard.model_info = Some(ModelInfo {
            features: Some(Series::from([("Age", 0.125), ("Height", -0.5), ("BMI", 0.0)])),
            ..ModelInfo::default()
        });
        let html = render_dashboard(&dashboard);
        assert!(html.contains("<strong>Age, Height, BMI</strong>"));
        assert!(html.contains("Age +0.125 · Height -0.500 · BMI +0.000"));
    }

    #[test]
    fn placeholders_in_server_data_are_not_expanded() {
        let mut dashboard = on_tab(Tab::Overview);
        dashboard.options.countries = vec!["{{CONTENT}}".into(), "{{TABS}}".into()];
        let html = render_dashboard(&dashboard);
        assert_eq!(html.matches(r#"<section class="filter-bar""#).count(), 1);
        assert_eq!(html.matches(r#"id="medals-by-country""#).count(), 1);
        assert!(html.contains(r#"<option value="{{CONTENT}}">{{CONTENT}}</option>"#));
        assert!(!html.contains("{{FILTERS}}"));
    }

    #[test]
    fn fill_template_keeps_unknown_braces() {
        let out = fill_template("a {{X}} b {{Y}} c {{", &[("X", "{{Y}}")]);
        assert_eq!(out, "a {{Y}} b {{Y}} c {{");
    }
}
