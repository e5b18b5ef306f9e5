//! Visualization selector: chart kinds, column-count rules, and the plot
//! request handed to the external renderer.

/// Chart kind offered by the visualization step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    #[default]
    Scatter,
    BoxPlot,
    Bar,
    Heatmap,
}

impl ChartKind {
    pub const ALL: [Self; 4] = [Self::Scatter, Self::BoxPlot, Self::Bar, Self::Heatmap];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scatter => "Scatter Plot",
            Self::BoxPlot => "Box Plot",
            Self::Bar => "Bar Plot",
            Self::Heatmap => "Heat Map",
        }
    }

    /// Whether `count` selected columns satisfy this kind's requirement.
    /// Scatter needs exactly (x, y, hue); the heat map needs exactly the two
    /// pivot axes plus the aggregated value; box and bar accept any non-empty
    /// selection.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Scatter | Self::Heatmap => count == 3,
            Self::BoxPlot | Self::Bar => count >= 1,
        }
    }

    /// Human-readable requirement, used when a selection is rejected.
    pub fn requirement(self) -> &'static str {
        match self {
            Self::Scatter => "exactly 3 columns (x, y, hue)",
            Self::Heatmap => "exactly 3 columns (two pivot axes and a value)",
            Self::BoxPlot | Self::Bar => "at least 1 column",
        }
    }
}

/// A fully-specified plot request. Rendering (including masking heat-map
/// cells with no observations) belongs to the external plotting collaborator;
/// this is where the core's contract ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub columns: Vec<String>,
    pub title: String,
}

/// Validates the selection against the kind's column-count rule and builds
/// the plot request. Returns `None` when the rule is violated: no plot is
/// produced for an invalid selection.
pub fn build_chart_spec(kind: ChartKind, columns: &[String]) -> Option<ChartSpec> {
    if !kind.accepts(columns.len()) {
        return None;
    }
    let title = match kind {
        ChartKind::Scatter => format!("Scatter Plot of {} vs {}", columns[0], columns[1]),
        ChartKind::BoxPlot => format!("Box Plot of {}", columns.join(", ")),
        ChartKind::Bar => format!("Bar Plot of {}", columns.join(", ")),
        ChartKind::Heatmap => format!("Relation with respect to {}", columns[2]),
    };
    Some(ChartSpec {
        kind,
        columns: columns.to_vec(),
        title,
    })
}
