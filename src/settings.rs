//! Global visual settings supplied by the host on every refresh.
//!
//! Every field has a serde default so a partial (or empty) settings object
//! still yields a complete configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendSettings {
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_legend_spacing")]
    pub spacing: f64,
    /// Also reused as the vertical reserve above every grid.
    #[serde(default = "default_legend_width")]
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSettings {
    #[serde(default = "default_font_size")]
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipSettings {
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_tooltip_opacity")]
    pub opacity: f64,
    #[serde(default = "default_panel_gap")]
    pub panel_gap: f64,
    #[serde(default = "default_tooltip_padding")]
    pub padding: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPointSettings {
    #[serde(default, alias = "dataPoint")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPanelSettings {
    #[serde(default = "default_panel_width")]
    pub width1: f64,
    #[serde(default = "default_panel_width")]
    pub width2: f64,
    #[serde(default = "default_panel_width")]
    pub width3: f64,
    #[serde(default = "default_panel_width")]
    pub width4: f64,
    #[serde(default = "default_panel_width")]
    pub width5: f64,
}

impl StaticPanelSettings {
    /// Widths in declared order, first through fifth.
    pub fn widths(&self) -> [f64; 5] {
        [self.width1, self.width2, self.width3, self.width4, self.width5]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualSettings {
    #[serde(default)]
    pub legend: LegendSettings,
    #[serde(default)]
    pub axis: AxisSettings,
    #[serde(default)]
    pub tooltip: TooltipSettings,
    #[serde(default)]
    pub data_point: DataPointSettings,
    #[serde(default)]
    pub static_panel: StaticPanelSettings,
}

impl VisualSettings {
    pub fn from_json(value: &serde_json::Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }
}

fn default_font_size() -> f64 { 12.0 }
fn default_legend_spacing() -> f64 { 10.0 }
fn default_legend_width() -> f64 { 20.0 }
fn default_tooltip_opacity() -> f64 { 100.0 }
fn default_panel_gap() -> f64 { 64.0 }
fn default_tooltip_padding() -> f64 { 1.0 }
fn default_panel_width() -> f64 { 20.0 }

impl Default for LegendSettings {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            spacing: default_legend_spacing(),
            width: default_legend_width(),
        }
    }
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self { font_size: default_font_size() }
    }
}

impl Default for TooltipSettings {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            opacity: default_tooltip_opacity(),
            panel_gap: default_panel_gap(),
            padding: default_tooltip_padding(),
        }
    }
}

impl Default for StaticPanelSettings {
    fn default() -> Self {
        Self {
            width1: default_panel_width(),
            width2: default_panel_width(),
            width3: default_panel_width(),
            width4: default_panel_width(),
            width5: default_panel_width(),
        }
    }
}
