//! Plotly-compatible line chart description.
//!
//! The [`Figure`] serializes to the `{ data, layout }` object accepted by
//! `Plotly.react`, so the browser only draws what the server computed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::aggregate::LongRow;
use crate::config::ChartConfig;

pub const X_AXIS_TITLE: &str = "Date de publication";
pub const Y_AXIS_TITLE: &str = "Nombre parrainages";
pub const LEGEND_TITLE: &str = "Catégorie";
pub const HOVER_TEMPLATE: &str = "%{y} parrainages le %{x|%d/%m/%y}<extra></extra>";

const COLORWAY: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    PlotlyWhite,
    Plotly,
}

impl Template {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "plotly_white" => Self::PlotlyWhite,
            "plotly" => Self::Plotly,
            other => {
                warn!("unknown chart template {other}, using plotly_white");
                Self::PlotlyWhite
            }
        }
    }

    fn plot_background(self) -> &'static str {
        match self {
            Self::PlotlyWhite => "white",
            Self::Plotly => "#E5ECF6",
        }
    }

    fn grid_color(self) -> &'static str {
        match self {
            Self::PlotlyWhite => "#EBF0F8",
            Self::Plotly => "white",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub height: u32,
    pub template: Template,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            height: 450,
            template: Template::PlotlyWhite,
        }
    }
}

impl From<&ChartConfig> for ChartOptions {
    fn from(value: &ChartConfig) -> Self {
        Self {
            height: value.height,
            template: Template::from_name(&value.template),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
    pub name: String,
    pub legendgroup: String,
    pub showlegend: bool,
    pub x: Vec<NaiveDate>,
    pub y: Vec<u64>,
    pub line: LineStyle,
    pub hovertemplate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineStyle {
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layout {
    pub height: u32,
    pub hovermode: String,
    pub showlegend: bool,
    pub legend: Legend,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub colorway: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Axis {
    pub title: Title,
    pub gridcolor: String,
    pub linecolor: String,
    pub zerolinecolor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl Axis {
    fn new(title: &str, template: Template) -> Self {
        Self {
            title: Title::new(title),
            gridcolor: template.grid_color().to_string(),
            linecolor: template.grid_color().to_string(),
            zerolinecolor: template.grid_color().to_string(),
        }
    }
}

impl Layout {
    fn new(options: &ChartOptions) -> Self {
        Self {
            height: options.height,
            hovermode: "x unified".to_string(),
            showlegend: true,
            legend: Legend {
                title: Title::new(LEGEND_TITLE),
            },
            xaxis: Axis::new(X_AXIS_TITLE, options.template),
            yaxis: Axis::new(Y_AXIS_TITLE, options.template),
            paper_bgcolor: "white".to_string(),
            plot_bgcolor: options.template.plot_background().to_string(),
            colorway: COLORWAY.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Figure {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.data.iter().find(|t| t.name == name)
    }
}

/// One line per category, in the order categories first appear in `rows`.
pub fn build_figure(rows: &[LongRow], options: &ChartOptions) -> Figure {
    let mut data: Vec<Trace> = Vec::new();
    for row in rows {
        let idx = match data.iter().position(|t| t.name == row.category) {
            Some(idx) => idx,
            None => {
                data.push(new_trace(&row.category, data.len()));
                data.len() - 1
            }
        };
        data[idx].x.push(row.date);
        data[idx].y.push(row.value);
    }

    Figure {
        data,
        layout: Layout::new(options),
    }
}

fn new_trace(name: &str, index: usize) -> Trace {
    Trace {
        kind: "scatter".to_string(),
        mode: "lines".to_string(),
        name: name.to_string(),
        legendgroup: name.to_string(),
        showlegend: true,
        x: Vec::new(),
        y: Vec::new(),
        line: LineStyle {
            color: COLORWAY[index % COLORWAY.len()].to_string(),
        },
        hovertemplate: HOVER_TEMPLATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{daily_series, CUMULATIVE_LABEL, DAILY_LABEL};
    use crate::data::{EndorsementRecord, EndorsementTable};

    fn alice_table() -> EndorsementTable {
        let d1 = NaiveDate::from_ymd_opt(2022, 1, 1).expect("date");
        let d2 = NaiveDate::from_ymd_opt(2022, 1, 2).expect("date");
        vec![
            EndorsementRecord::new("Alice", d1),
            EndorsementRecord::new("Alice", d1),
            EndorsementRecord::new("Alice", d2),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn one_trace_per_series_label() {
        let rows = daily_series(&alice_table(), "Alice").to_long_format();
        let figure = build_figure(&rows, &ChartOptions::default());
        let names: Vec<_> = figure.data.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec![DAILY_LABEL, CUMULATIVE_LABEL]);
        assert_eq!(figure.trace(DAILY_LABEL).expect("daily").y, vec![2, 1]);
        assert_eq!(
            figure.trace(CUMULATIVE_LABEL).expect("cumulative").y,
            vec![2, 3]
        );
        assert_eq!(figure.data[0].x, figure.data[1].x);
    }

    #[test]
    fn layout_matches_dashboard_conventions() {
        let figure = build_figure(&[], &ChartOptions::default());
        assert!(figure.is_empty());
        assert_eq!(figure.layout.height, 450);
        assert_eq!(figure.layout.hovermode, "x unified");
        assert_eq!(figure.layout.xaxis.title.text, X_AXIS_TITLE);
        assert_eq!(figure.layout.yaxis.title.text, Y_AXIS_TITLE);
        assert_eq!(figure.layout.plot_bgcolor, "white");
    }

    #[test]
    fn serializes_to_plotly_shape() {
        let rows = daily_series(&alice_table(), "Alice").to_long_format();
        let json = serde_json::to_value(build_figure(&rows, &ChartOptions::default()))
            .expect("json");
        assert_eq!(json["data"][0]["type"], "scatter");
        assert_eq!(json["data"][0]["x"][0], "2022-01-01");
        assert_eq!(json["data"][1]["y"][1], 3);
        assert_eq!(json["layout"]["xaxis"]["title"]["text"], "Date de publication");
        assert_eq!(json["layout"]["legend"]["title"]["text"], "Catégorie");
    }

    #[test]
    fn template_names_resolve() {
        assert_eq!(Template::from_name("plotly"), Template::Plotly);
        assert_eq!(Template::from_name("PLOTLY_WHITE"), Template::PlotlyWhite);
        assert_eq!(Template::from_name("seaborn"), Template::PlotlyWhite);
        let options = ChartOptions::from(&ChartConfig {
            height: 300,
            template: "plotly".to_string(),
        });
        let figure = build_figure(&[], &options);
        assert_eq!(figure.layout.height, 300);
        assert_eq!(figure.layout.plot_bgcolor, "#E5ECF6");
    }
}
