pub mod page;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::aggregate::{daily_series, DailySeries};
use crate::chart::{build_figure, ChartOptions, Figure};
use crate::data::{qualifying_candidates, CandidateCount, EndorsementTable};

pub const CANDIDATE_INPUT: &str = "par-candidat";
pub const GRAPH_OUTPUT: &str = "par-main-graph";

/// Wires one input component property to one output component property.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CallbackBinding {
    pub input: &'static str,
    pub input_property: &'static str,
    pub output: &'static str,
    pub output_property: &'static str,
}

pub const GRAPH_BINDING: CallbackBinding = CallbackBinding {
    input: CANDIDATE_INPUT,
    input_property: "value",
    output: GRAPH_OUTPUT,
    output_property: "figure",
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no callback bound to input `{0}`")]
    UnknownInput(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct CallbackOutput {
    pub output: &'static str,
    pub figure: Figure,
}

/// Read-only dashboard state shared by every request.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: Arc<EndorsementTable>,
    candidates: Arc<Vec<CandidateCount>>,
    chart: ChartOptions,
}

impl Dashboard {
    pub fn new(table: EndorsementTable, threshold: usize, chart: ChartOptions) -> Self {
        let candidates = qualifying_candidates(&table, threshold);
        debug!(
            "{} candidates above {threshold} endorsements",
            candidates.len()
        );
        Self {
            table: Arc::new(table),
            candidates: Arc::new(candidates),
            chart,
        }
    }

    pub fn table(&self) -> &EndorsementTable {
        &self.table
    }

    pub fn candidates(&self) -> &[CandidateCount] {
        &self.candidates
    }

    pub fn chart_options(&self) -> &ChartOptions {
        &self.chart
    }

    /// Most endorsed qualifying candidate, if any qualifies.
    pub fn default_selection(&self) -> Option<&str> {
        self.candidates.first().map(|c| c.candidate.as_str())
    }

    /// Explicit selection, else the default one. `None` only when nothing qualifies.
    ///
    /// A non-blank selection is used verbatim since candidate names are not trimmed on load.
    pub fn resolve_selection<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        requested
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.default_selection())
    }

    pub fn series(&self, candidate: &str) -> DailySeries {
        daily_series(&self.table, candidate)
    }

    pub fn update_graph(&self, candidate: &str) -> Figure {
        let rows = self.series(candidate).to_long_format();
        build_figure(&rows, &self.chart)
    }

    pub fn dispatch(&self, input: &str, value: &str) -> Result<CallbackOutput, DispatchError> {
        if input != GRAPH_BINDING.input {
            return Err(DispatchError::UnknownInput(input.to_string()));
        }
        let selection = self.resolve_selection(Some(value)).unwrap_or_default();
        Ok(CallbackOutput {
            output: GRAPH_BINDING.output,
            figure: self.update_graph(selection),
        })
    }
}
