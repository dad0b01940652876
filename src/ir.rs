use crate::components::{AxisPointer, Legend, Tooltip};
use crate::data::ValueType;
use crate::format::ValueFormatter;
use crate::resolve::{Panel, PanelOptions, SeriesOptions, XAxisOptions};
use serde::{Serialize, Serializer};
use serde_json::Value;

// =============================================================================
// Phase 1: Mapping
// =============================================================================

/// Grouping-column cell paired with the column's declared type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupValue {
    pub value: Value,
    pub value_type: Option<ValueType>,
}

/// The atomic (row, measure column) unit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRecord {
    /// Role identifier of the source column
    pub id: String,
    /// Display name of the source column
    pub key: String,
    pub group: GroupValue,
    /// `None` for empty cells; rendered as a gap
    pub value: Option<f64>,
    pub panel: PanelOptions,
    pub x_axis: XAxisOptions,
    pub series: SeriesOptions,
    pub value_format: String,
    pub roles_index: i64,
}

impl ValueRecord {
    pub fn panel_key(&self) -> Panel {
        self.panel.panel
    }

    pub fn lane_key(&self) -> LaneKey {
        LaneKey { panel: self.panel.panel, offset: self.x_axis.offset }
    }

    pub fn series_key(&self) -> SeriesKey {
        SeriesKey {
            lane: self.lane_key(),
            key: self.key.clone(),
            value_format: self.value_format.clone(),
        }
    }
}

/// Axis lane: (panel, horizontal offset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaneKey {
    pub panel: Panel,
    pub offset: u8,
}

impl LaneKey {
    /// Identifier shared by the x-axis and the series bound to it.
    pub fn axis_id(&self) -> String {
        format!("{}-{}", self.panel, self.offset)
    }
}

/// Series group: (panel, offset, measure key, value format)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub lane: LaneKey,
    pub key: String,
    pub value_format: String,
}

// =============================================================================
// Phase 2: Chart specification
// =============================================================================

/// A percentage of the container, serialized as `"12.5%"`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percent(pub f64);

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Round away float noise such as 29.700000000000003
        let rounded = (self.0 * 1e4).round() / 1e4;
        serializer.serialize_str(&format!("{}%", rounded))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub legend: Legend,
    pub tooltip: Tooltip,
    pub axis_pointer: AxisPointer,
    pub grid: Vec<Grid>,
    pub x_axis: Vec<XAxis>,
    pub y_axis: Vec<YAxis>,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub id: String,
    pub top: Percent,
    pub left: Percent,
    pub width: Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Toggle {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLabel {
    pub show: bool,
    pub font_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_format: Option<ValueFormatter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Time,
    Value,
}

/// Shared time axis of one panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    #[serde(rename = "type")]
    pub axis_type: AxisType,
    pub id: String,
    pub grid_id: String,
    pub inverse: bool,
    pub axis_line: Toggle,
    pub axis_label: AxisLabel,
    pub axis_tick: Toggle,
}

/// Lower or upper bound of a value axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AxisBound {
    #[serde(rename = "dataMin")]
    DataMin,
    #[serde(rename = "dataMax")]
    DataMax,
    #[serde(untagged)]
    Fixed(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Top,
}

/// Value axis of one lane
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxis {
    #[serde(rename = "type")]
    pub axis_type: AxisType,
    pub id: String,
    pub grid_id: String,
    pub align_ticks: bool,
    pub min: AxisBound,
    pub max: AxisBound,
    pub position: AxisPosition,
    pub offset: u32,
    pub inverse: bool,
    pub axis_label: AxisLabel,
}

/// `[value, group]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint(pub Option<f64>, pub Value);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorStyle {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaStyle {
    pub color: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Symbol {
    #[serde(rename = "emptyCircle")]
    EmptyCircle,
    #[serde(rename = "none")]
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    #[serde(rename = "type")]
    pub series_type: SeriesType,
    pub symbol: Symbol,
    pub name: String,
    pub y_axis_id: String,
    pub x_axis_id: String,
    pub data: Vec<DataPoint>,
    pub line_style: ColorStyle,
    pub item_style: ColorStyle,
    pub area_style: Option<AreaStyle>,
}
