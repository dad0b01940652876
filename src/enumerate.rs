//! Exposes current property values back to the host's settings UI.
//!
//! Simple groups yield one instance holding every property. The per-column
//! groups (`panel`, `xAxis`, `series`) yield one instance per measure column
//! and property, so each measure's property can be edited on its own.

use crate::data::DataTable;
use crate::resolve::{resolve, ObjectOptions, PanelOptions, SeriesOptions, XAxisOptions};
use crate::settings::VisualSettings;
use crate::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectName {
    Legend,
    Axis,
    Tooltip,
    DataPoint,
    StaticPanel,
    Panel,
    XAxis,
    Series,
}

impl ObjectName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectName::Legend => "legend",
            ObjectName::Axis => "axis",
            ObjectName::Tooltip => "tooltip",
            ObjectName::DataPoint => "dataPoint",
            ObjectName::StaticPanel => "staticPanel",
            ObjectName::Panel => PanelOptions::GROUP,
            ObjectName::XAxis => XAxisOptions::GROUP,
            ObjectName::Series => SeriesOptions::GROUP,
        }
    }
}

impl FromStr for ObjectName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "legend" => Ok(ObjectName::Legend),
            "axis" => Ok(ObjectName::Axis),
            "tooltip" => Ok(ObjectName::Tooltip),
            "dataPoint" => Ok(ObjectName::DataPoint),
            "staticPanel" => Ok(ObjectName::StaticPanel),
            "panel" => Ok(ObjectName::Panel),
            "xAxis" => Ok(ObjectName::XAxis),
            "series" => Ok(ObjectName::Series),
            other => Err(format!("unknown object '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector {
    pub metadata: String,
}

/// One editable entry handed to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInstance {
    pub object_name: String,
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub selector: Option<Selector>,
}

/// Enumerate instances for a requested object name. Unknown names yield
/// nothing.
pub fn enumerate_objects(
    object_name: &str,
    settings: &VisualSettings,
    table: &DataTable,
) -> Result<Vec<ObjectInstance>> {
    let Ok(name) = object_name.parse::<ObjectName>() else {
        tracing::debug!(object_name = object_name, "no instances for unknown object");
        return Ok(Vec::new());
    };

    let instances = match name {
        ObjectName::Legend => single(name, &settings.legend)?,
        ObjectName::Axis => single(name, &settings.axis)?,
        ObjectName::Tooltip => single(name, &settings.tooltip)?,
        ObjectName::DataPoint => single(name, &settings.data_point)?,
        ObjectName::StaticPanel => single(name, &settings.static_panel)?,
        ObjectName::Panel => per_column::<PanelOptions>(table),
        ObjectName::XAxis => per_column::<XAxisOptions>(table),
        ObjectName::Series => per_column::<SeriesOptions>(table),
    };

    Ok(instances)
}

fn single<T: Serialize>(name: ObjectName, group: &T) -> Result<Vec<ObjectInstance>> {
    let properties = match serde_json::to_value(group)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Ok(vec![ObjectInstance {
        object_name: name.as_str().to_string(),
        properties,
        display_name: None,
        selector: None,
    }])
}

fn per_column<T: ObjectOptions>(table: &DataTable) -> Vec<ObjectInstance> {
    table
        .measure_columns()
        .flat_map(|(_, column)| {
            let mut current = resolve::<T>(column.objects.as_ref()).to_properties();
            T::PROPERTIES.iter().filter_map(move |descriptor| {
                let value = current.remove(descriptor.name)?;
                let mut properties = Map::new();
                properties.insert(descriptor.name.to_string(), value);
                Some(ObjectInstance {
                    object_name: T::GROUP.to_string(),
                    properties,
                    display_name: Some(format!(
                        "[{}] {}",
                        column.display_name, descriptor.display_name
                    )),
                    selector: Some(Selector { metadata: column.selector_name().to_string() }),
                })
            })
        })
        .collect()
}
