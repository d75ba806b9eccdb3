//! Server-rendered HTML for the form, result and error views.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ferrocast_core::{
    csv_filename, png_filename, ChartKind, ForecastHorizon, ModelKind, PipelineOutput, Theme,
};

use crate::form::ForecastForm;

const PAGE_TITLE: &str = "Stock Price Forecast";

/// Empty form with defaults.
pub fn form_page(form: &ForecastForm) -> String {
    layout(form, "")
}

/// Form followed by the outcome of a successful run.
pub fn result_page(form: &ForecastForm, output: &PipelineOutput) -> String {
    let run = &output.run;
    let ticker = run.series.ticker();
    let png_name = png_filename(ticker);
    let csv_name = csv_filename(ticker);

    let mut body = String::new();
    body.push_str(&format!(
        "<section class=\"summary\">\n<p class=\"headline\">{}</p>\n<p class=\"caption\">Model trained in {:.2} seconds</p>\n</section>\n",
        escape_html(&output.summary().to_string()),
        output.fit_seconds()
    ));

    for warning in &output.warnings {
        body.push_str(&format!("<p class=\"warning\">{}</p>\n", escape_html(warning)));
    }

    match &output.candlestick {
        Some(candlestick) => {
            body.push_str("<figure class=\"chart candlestick\">\n");
            body.push_str(&candlestick.svg);
            body.push_str("\n</figure>\n");
        }
        None => body.push_str(&format!(
            "<figure class=\"chart\"><img src=\"data:image/png;base64,{}\" alt=\"{}\" width=\"{}\" height=\"{}\"></figure>\n",
            STANDARD.encode(&output.chart.png),
            escape_html(&format!("{ticker} Stock Price Forecast")),
            output.chart.size.0,
            output.chart.size.1
        )),
    }

    body.push_str(&format!(
        "<nav class=\"downloads\">\n<a download=\"{png_name}\" href=\"data:image/png;base64,{}\">Download forecast image</a>\n<a download=\"{csv_name}\" href=\"data:text/csv;base64,{}\">Download historical data</a>\n</nav>\n",
        STANDARD.encode(&output.chart.png),
        STANDARD.encode(&output.csv),
        png_name = escape_html(&png_name),
        csv_name = escape_html(&csv_name),
    ));

    layout(form, &body)
}

/// Form followed by a single error message.
pub fn error_page(form: &ForecastForm, message: &str) -> String {
    layout(
        form,
        &format!("<p class=\"error\" role=\"alert\">{}</p>\n", escape_html(message)),
    )
}

fn layout(form: &ForecastForm, body: &str) -> String {
    let theme = form.theme();
    let (background, foreground, panel) = match theme {
        Theme::Light => ("#ffffff", "#212529", "#f1f3f5"),
        Theme::Dark => ("#0e1117", "#e6e6e6", "#1c1f26"),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{PAGE_TITLE}</title>
<style>
body {{ background: {background}; color: {foreground}; font-family: sans-serif; margin: 2rem auto; max-width: 1480px; }}
form {{ background: {panel}; padding: 1rem; display: flex; gap: 1rem; flex-wrap: wrap; align-items: end; }}
label {{ display: flex; flex-direction: column; font-size: 0.9rem; }}
.error {{ color: #d62728; font-weight: bold; }}
.warning {{ color: #ff7f0e; }}
.headline {{ font-size: 1.3rem; font-weight: bold; }}
.caption {{ opacity: 0.7; }}
.chart img, .chart svg {{ max-width: 100%; height: auto; }}
.downloads a {{ margin-right: 1.5rem; }}
</style>
</head>
<body>
<h1>{PAGE_TITLE}</h1>
{form}
{body}</body>
</html>
"#,
        form = form_html(form),
    )
}

fn form_html(form: &ForecastForm) -> String {
    let theme = select("theme", "Theme", &form.theme, &[Theme::Light.as_str(), Theme::Dark.as_str()]);
    let chart = select(
        "chart",
        "Chart type",
        &form.chart,
        &[ChartKind::Static.as_str(), ChartKind::Candlestick.as_str()],
    );
    let models: Vec<&str> = ModelKind::ALL.iter().map(|model| model.as_str()).collect();
    let model = select("model", "Model", &form.model, &models);

    format!(
        "<form method=\"post\" action=\"/forecast\">\n\
<label>Ticker<input type=\"text\" name=\"ticker\" value=\"{ticker}\" required></label>\n\
<label>Forecast days<input type=\"number\" name=\"horizon\" value=\"{horizon}\" min=\"{min}\" max=\"{max}\"></label>\n\
{theme}{chart}{model}<button type=\"submit\">Run Forecast</button>\n</form>",
        ticker = escape_html(&form.ticker),
        horizon = escape_html(&form.horizon),
        min = ForecastHorizon::MIN_DAYS,
        max = ForecastHorizon::MAX_DAYS,
    )
}

fn select(name: &str, label: &str, current: &str, options: &[&str]) -> String {
    let mut html = format!("<label>{label}<select name=\"{name}\">");
    for option in options {
        let selected = if option.eq_ignore_ascii_case(current.trim()) {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!("<option value=\"{option}\"{selected}>{option}</option>"));
    }
    html.push_str("</select></label>\n");
    html
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
