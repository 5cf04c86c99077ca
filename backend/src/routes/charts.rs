use serde::{Deserialize, Serialize};

// =========================================================
// Chart specification types
// =========================================================

/// Kind of chart the frontend should draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    HexagonMap,
    Heatmap,
}

/// Vega-Lite field type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Temporal,
    Quantitative,
    Nominal,
    Ordinal,
}

/// One encoded field (axis, tooltip entry or colour field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEncoding {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Explicit category order, e.g. month names in calendar order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<String>>,
}

impl FieldEncoding {
    pub fn new(field: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: field.into(),
            field_type,
            title: None,
            sort: None,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn sorted(mut self, order: Vec<String>) -> Self {
        self.sort = Some(order);
        self
    }
}

/// How marks are coloured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ColorRule {
    /// Every mark has the same colour.
    Fixed { color: String },
    /// One colour per category of a nominal field.
    ByField { field: FieldEncoding },
    /// Runs above/below a threshold drawn in different colours. `segment_field`
    /// separates runs so each is drawn as its own line.
    Threshold {
        flag_field: String,
        segment_field: String,
        threshold: f64,
        above: String,
        below: String,
    },
}

/// Axis, colour and tooltip encodings of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingSpec {
    pub x: FieldEncoding,
    pub y: FieldEncoding,
    pub color: ColorRule,
    pub tooltip: Vec<FieldEncoding>,
}

/// Declarative chart handed to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    /// Vega-Lite document (line/bar) or deck.gl layer description (maps).
    pub spec: serde_json::Value,
}
