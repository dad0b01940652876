//! Per-column configuration resolvers.
//!
//! Each measure column carries an opaque set of style objects grouped by
//! name (`panel`, `xAxis`, `series`). A resolver reads one group and
//! produces a fully populated options value; any property that is missing
//! or malformed keeps its documented default.

use crate::data::ColumnObjects;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Highest horizontal lane an x-axis can be staggered into.
pub const MAX_LANE_OFFSET: u8 = 2;

/// Neutral line color used when a column has no color override.
pub const DEFAULT_SERIES_COLOR: &str = "#333333";

/// One editable property of an object group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
}

const fn property(name: &'static str, display_name: &'static str) -> PropertyDescriptor {
    PropertyDescriptor { name, display_name }
}

pub const PANEL_PROPERTIES: &[PropertyDescriptor] = &[property("panel", "Panel")];

pub const X_AXIS_PROPERTIES: &[PropertyDescriptor] = &[
    property("offset", "Offset"),
    property("inverse", "Inverse"),
    property("mmOverride", "Min/Max Override"),
    property("mmMin", "Min"),
    property("mmMax", "Max"),
];

pub const SERIES_PROPERTIES: &[PropertyDescriptor] = &[
    property("color", "Color"),
    property("area", "Area"),
    property("areaOpacity", "Area Opacity (%)"),
];

/// Options resolved from one named object group of a column
pub trait ObjectOptions: Default + Serialize {
    /// Object group name inside the column's style objects.
    const GROUP: &'static str;
    /// Editable properties, in display order.
    const PROPERTIES: &'static [PropertyDescriptor];

    /// Apply one property value. Returns false if the value is unusable.
    fn apply(&mut self, name: &str, value: &Value) -> bool;

    /// Current property values keyed by property name.
    fn to_properties(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Resolve an options group from a column's style objects.
pub fn resolve<T: ObjectOptions>(objects: Option<&ColumnObjects>) -> T {
    let mut options = T::default();

    let Some(group) = objects.and_then(|o| o.get(T::GROUP)).and_then(Value::as_object) else {
        return options;
    };

    for descriptor in T::PROPERTIES {
        if let Some(value) = group.get(descriptor.name) {
            if !options.apply(descriptor.name, value) {
                tracing::warn!(
                    group = T::GROUP,
                    property = descriptor.name,
                    %value,
                    "ignoring unusable property value"
                );
            }
        }
    }

    options
}

pub fn resolve_panel(objects: Option<&ColumnObjects>) -> PanelOptions {
    resolve(objects)
}

pub fn resolve_x_axis(objects: Option<&ColumnObjects>) -> XAxisOptions {
    resolve(objects)
}

pub fn resolve_series(objects: Option<&ColumnObjects>) -> SeriesOptions {
    resolve(objects)
}

// =============================================================================
// Panel
// =============================================================================

/// One of the fixed panel slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Panel {
    #[default]
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
}

impl Panel {
    pub const ALL: [Panel; 5] = [Panel::One, Panel::Two, Panel::Three, Panel::Four, Panel::Five];

    pub fn as_str(&self) -> &'static str {
        match self {
            Panel::One => "1",
            Panel::Two => "2",
            Panel::Three => "3",
            Panel::Four => "4",
            Panel::Five => "5",
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_u64().and_then(|n| n.to_string().parse().ok()),
            _ => None,
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Panel::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| format!("unknown panel '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelOptions {
    pub panel: Panel,
}

impl ObjectOptions for PanelOptions {
    const GROUP: &'static str = "panel";
    const PROPERTIES: &'static [PropertyDescriptor] = PANEL_PROPERTIES;

    fn apply(&mut self, name: &str, value: &Value) -> bool {
        match name {
            "panel" => Panel::from_value(value).map(|p| self.panel = p).is_some(),
            _ => false,
        }
    }
}

// =============================================================================
// X-Axis
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxisOptions {
    pub offset: u8,
    pub inverse: bool,
    pub mm_override: bool,
    pub mm_min: f64,
    pub mm_max: f64,
}

impl Default for XAxisOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            inverse: false,
            mm_override: false,
            mm_min: 0.0,
            mm_max: 100.0,
        }
    }
}

impl ObjectOptions for XAxisOptions {
    const GROUP: &'static str = "xAxis";
    const PROPERTIES: &'static [PropertyDescriptor] = X_AXIS_PROPERTIES;

    fn apply(&mut self, name: &str, value: &Value) -> bool {
        match name {
            "offset" => lane_offset(value).map(|o| self.offset = o).is_some(),
            "inverse" => value.as_bool().map(|b| self.inverse = b).is_some(),
            "mmOverride" => value.as_bool().map(|b| self.mm_override = b).is_some(),
            "mmMin" => value.as_f64().map(|v| self.mm_min = v).is_some(),
            "mmMax" => value.as_f64().map(|v| self.mm_max = v).is_some(),
            _ => false,
        }
    }
}

fn lane_offset(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    u8::try_from(raw).ok().filter(|o| *o <= MAX_LANE_OFFSET)
}

// =============================================================================
// Series
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidColor {
    pub color: String,
}

/// Host fill representation: `{ "solid": { "color": "#rrggbb" } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub solid: SolidColor,
}

impl Fill {
    pub fn solid(color: impl Into<String>) -> Self {
        Self { solid: SolidColor { color: color.into() } }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesOptions {
    pub color: Fill,
    pub area: bool,
    pub area_opacity: f64,
}

impl SeriesOptions {
    pub fn color(&self) -> &str {
        &self.color.solid.color
    }
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            color: Fill::solid(DEFAULT_SERIES_COLOR),
            area: false,
            area_opacity: 1.0,
        }
    }
}

impl ObjectOptions for SeriesOptions {
    const GROUP: &'static str = "series";
    const PROPERTIES: &'static [PropertyDescriptor] = SERIES_PROPERTIES;

    fn apply(&mut self, name: &str, value: &Value) -> bool {
        match name {
            "color" => {
                let fill = match value {
                    Value::String(s) => Some(Fill::solid(s.clone())),
                    other => serde_json::from_value::<Fill>(other.clone()).ok(),
                };
                fill.map(|f| self.color = f).is_some()
            }
            "area" => value.as_bool().map(|b| self.area = b).is_some(),
            "areaOpacity" => value.as_f64().map(|v| self.area_opacity = v).is_some(),
            _ => false,
        }
    }
}
