use crate::analysis::is_us_state;
use crate::error::RenderError;
use crate::utils::log_render;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// A Plotly figure that can be written as a standalone HTML page.
pub trait Chart {
    fn title(&self) -> &str;

    /// `(data, layout)` in Plotly's JSON schema.
    fn figure(&self) -> (Value, Value);

    fn to_html(&self) -> Result<String, RenderError> {
        let (data, layout) = self.figure();
        let data = script_safe(&serde_json::to_string(&data)?);
        let layout = script_safe(&serde_json::to_string(&layout)?);
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
             <script src=\"{PLOTLY_CDN}\"></script>\n</head>\n<body>\n\
             <div id=\"chart\" style=\"width:100%;height:90vh;\"></div>\n\
             <script>Plotly.newPlot(\"chart\", {data}, {layout});</script>\n</body>\n</html>\n",
            title = escape_html(self.title()),
        ))
    }

    fn write_html(&self, path: &Path) -> Result<PathBuf, RenderError> {
        let html = self.to_html()?;
        std::fs::write(path, html).map_err(|source| RenderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log_render(&format!("Wrote chart '{}' to {}", self.title(), path.display()));
        Ok(path.to_path_buf())
    }
}

/// Values per US state on a map of the United States.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethChart {
    pub title: String,
    pub value_label: String,
    pub locations: Vec<String>,
    pub values: Vec<f64>,
    pub hover: Vec<String>,
}

impl ChoroplethChart {
    pub fn new(title: &str, value_label: &str) -> Self {
        Self {
            title: title.to_string(),
            value_label: value_label.to_string(),
            locations: Vec::new(),
            values: Vec::new(),
            hover: Vec::new(),
        }
    }

    /// Adds a state. Codes outside the fifty states and DC are skipped.
    pub fn with_state(mut self, state: &str, value: f64, hover: &str) -> Self {
        let code = state.trim().to_uppercase();
        if !is_us_state(&code) {
            tracing::debug!(state = %code, "Skipping non-US location on state map");
            return self;
        }
        self.locations.push(code);
        self.values.push(value);
        self.hover.push(hover.to_string());
        self
    }

    pub fn from_counts(title: &str, value_label: &str, counts: &BTreeMap<String, usize>) -> Self {
        counts
            .iter()
            .fold(Self::new(title, value_label), |chart, (state, &count)| {
                chart.with_state(state, count as f64, &format!("{}: {}", state, count))
            })
    }
}

impl Chart for ChoroplethChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn figure(&self) -> (Value, Value) {
        let data = json!([{
            "type": "choropleth",
            "locationmode": "USA-states",
            "locations": self.locations,
            "z": self.values,
            "text": self.hover,
            "hoverinfo": "text",
            "colorscale": "Blues",
            "colorbar": { "title": { "text": self.value_label } },
        }]);
        let layout = json!({
            "title": { "text": self.title },
            "geo": { "scope": "usa" },
        });
        (data, layout)
    }
}

/// Categorical bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
}

impl BarChart {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            categories: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn with_bar(mut self, category: &str, value: f64) -> Self {
        self.categories.push(category.to_string());
        self.values.push(value);
        self
    }
}

impl Chart for BarChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn figure(&self) -> (Value, Value) {
        let data = json!([{
            "type": "bar",
            "x": self.categories,
            "y": self.values,
        }]);
        let layout = json!({
            "title": { "text": self.title },
            "xaxis": { "title": { "text": self.x_label }, "tickangle": -45 },
            "yaxis": { "title": { "text": self.y_label } },
        });
        (data, layout)
    }
}

/// Bar chart with one named trace per series, bars grouped by category.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: BTreeMap<String, Vec<(String, f64)>>,
}

impl GroupedBarChart {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            series: BTreeMap::new(),
        }
    }

    pub fn with_bar(mut self, series: &str, category: &str, value: f64) -> Self {
        self.series
            .entry(series.to_string())
            .or_default()
            .push((category.to_string(), value));
        self
    }
}

impl Chart for GroupedBarChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn figure(&self) -> (Value, Value) {
        let data: Vec<Value> = self
            .series
            .iter()
            .map(|(name, bars)| {
                let (x, y): (Vec<&str>, Vec<f64>) =
                    bars.iter().map(|(c, v)| (c.as_str(), *v)).unzip();
                json!({ "type": "bar", "name": name, "x": x, "y": y })
            })
            .collect();
        let layout = json!({
            "title": { "text": self.title },
            "barmode": "group",
            "xaxis": { "title": { "text": self.x_label }, "type": "category", "tickangle": -45 },
            "yaxis": { "title": { "text": self.y_label } },
        });
        (Value::Array(data), layout)
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// JSON inside a <script> element must not close the element early
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
