//! Chart-wide components: legend, tooltip and axis pointer.

use crate::format::ValueFormatter;
use crate::settings::{LegendSettings, TooltipSettings};
use serde::Serialize;
use std::collections::BTreeMap;

/// Legend entries longer than this are truncated for display.
pub const LEGEND_NAME_LIMIT: usize = 25;

const DARK_TEXT: &str = "#333333";
const LIGHT_TEXT: &str = "#ffffff";

// =============================================================================
// Legend
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    #[serde(rename = "fontSize")]
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub orient: &'static str,
    pub text_style: TextStyle,
    pub item_gap: f64,
    pub name_limit: usize,
}

impl Legend {
    pub fn new(settings: &LegendSettings) -> Self {
        Self {
            orient: "horizontal",
            text_style: TextStyle { font_size: settings.font_size },
            item_gap: settings.spacing,
            name_limit: LEGEND_NAME_LIMIT,
        }
    }

    /// Display text for a series name
    pub fn display_name(&self, name: &str) -> String {
        if name.chars().count() >= self.name_limit {
            let head: String = name.chars().take(self.name_limit).collect();
            format!("{}...", head)
        } else {
            name.to_string()
        }
    }
}

// =============================================================================
// Tooltip
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointerType {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipStyle {
    pub font_size: f64,
    pub opacity: f64,
    pub panel_gap: f64,
    pub padding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub trigger: &'static str,
    pub class_name: &'static str,
    pub background_color: &'static str,
    pub extra_css_text: &'static str,
    pub padding: f64,
    pub axis_pointer: PointerType,
    pub style: TooltipStyle,
    /// One formatter per series, indexed by series index
    pub value_formats: Vec<ValueFormatter>,
}

/// A hovered series point as reported by the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct HoveredPoint {
    pub axis_index: usize,
    pub series_index: usize,
    pub series_name: String,
    pub value: Option<f64>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipEntry {
    pub label: String,
    pub value: String,
    pub background_color: String,
    pub color: &'static str,
    pub opacity: String,
    pub padding: String,
    pub font_size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipPanel {
    pub entries: Vec<TooltipEntry>,
}

impl Tooltip {
    pub fn new(settings: &TooltipSettings, value_formats: Vec<ValueFormatter>) -> Self {
        Self {
            trigger: "axis",
            class_name: "tooltip-container",
            background_color: "transparent",
            extra_css_text: "box-shadow: none; border: none",
            padding: 0.0,
            axis_pointer: PointerType { kind: "cross" },
            style: TooltipStyle {
                font_size: settings.font_size,
                opacity: settings.opacity,
                panel_gap: settings.panel_gap,
                padding: settings.padding,
            },
            value_formats,
        }
    }

    /// Tooltip content for a set of hovered points, one panel per axis
    /// index in ascending order.
    pub fn panels(&self, hovered: &[HoveredPoint]) -> Vec<TooltipPanel> {
        let mut by_axis: BTreeMap<usize, Vec<TooltipEntry>> = BTreeMap::new();
        for point in hovered {
            by_axis.entry(point.axis_index).or_default().push(self.entry(point));
        }
        by_axis
            .into_values()
            .map(|entries| TooltipPanel { entries })
            .collect()
    }

    fn entry(&self, point: &HoveredPoint) -> TooltipEntry {
        let value = match self.value_formats.get(point.series_index) {
            Some(formatter) => formatter.format_opt(point.value),
            None => ValueFormatter::default().format_opt(point.value),
        };

        TooltipEntry {
            label: point.series_name.clone(),
            value,
            background_color: point.color.clone(),
            color: contrast_color(&point.color),
            opacity: format!("{}%", self.style.opacity),
            padding: format!("{}px", self.style.padding),
            font_size: format!("{}px", self.style.font_size),
        }
    }
}

/// Readable text color on top of a `#rrggbb` background.
pub fn contrast_color(background: &str) -> &'static str {
    match u32::from_str_radix(background.trim_start_matches('#'), 16) {
        Ok(rgb) if rgb > 0xffffff / 2 => DARK_TEXT,
        _ => LIGHT_TEXT,
    }
}

// =============================================================================
// Axis pointer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerLink {
    pub y_axis_index: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerLabel {
    pub background_color: &'static str,
    /// Applied to the time (y) dimension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    /// Applied to the value (x) dimension
    pub value_format: ValueFormatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisPointer {
    pub snap: bool,
    pub link: PointerLink,
    pub label: PointerLabel,
}

impl AxisPointer {
    pub fn new(date_format: Option<&str>) -> Self {
        Self {
            snap: true,
            link: PointerLink { y_axis_index: "all" },
            label: PointerLabel {
                background_color: "#777",
                date_format: date_format.map(str::to_string),
                value_format: ValueFormatter::default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(axis: usize, series: usize, value: Option<f64>, color: &str) -> HoveredPoint {
        HoveredPoint {
            axis_index: axis,
            series_index: series,
            series_name: format!("s{}", series),
            value,
            color: color.to_string(),
        }
    }

    #[test]
    fn test_legend_truncation() {
        let legend = Legend::new(&LegendSettings::default());
        assert_eq!(legend.display_name("1 - Temp"), "1 - Temp");
        let long = "x".repeat(30);
        assert_eq!(legend.display_name(&long), format!("{}...", "x".repeat(25)));
        let exact = "y".repeat(25);
        assert_eq!(legend.display_name(&exact), format!("{}...", exact));
    }

    #[test]
    fn test_contrast_color() {
        assert_eq!(contrast_color("#ffffff"), "#333333");
        assert_eq!(contrast_color("#000000"), "#ffffff");
        assert_eq!(contrast_color("#333333"), "#ffffff");
        assert_eq!(contrast_color("not a color"), "#ffffff");
    }

    #[test]
    fn test_tooltip_panels_grouped_by_axis() {
        let tooltip = Tooltip::new(
            &TooltipSettings::default(),
            vec![ValueFormatter::new("0.0"), ValueFormatter::new("0")],
        );
        let panels = tooltip.panels(&[
            point(1, 1, Some(1013.4), "#ffffff"),
            point(0, 0, Some(21.46), "#000000"),
            point(1, 0, None, "#000000"),
        ]);

        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].entries.len(), 1);
        assert_eq!(panels[0].entries[0].value, "21.5");
        assert_eq!(panels[0].entries[0].color, "#ffffff");
        assert_eq!(panels[1].entries[0].value, "1013");
        assert_eq!(panels[1].entries[0].color, "#333333");
        assert_eq!(panels[1].entries[1].value, "-");
        assert_eq!(panels[1].entries[0].opacity, "100%");
        assert_eq!(panels[1].entries[0].padding, "1px");
    }

    #[test]
    fn test_axis_pointer_date_format() {
        let pointer = AxisPointer::new(Some("yyyy-MM-dd"));
        let json = serde_json::to_value(&pointer).unwrap();
        assert_eq!(json["label"]["dateFormat"], "yyyy-MM-dd");
        assert_eq!(json["link"]["yAxisIndex"], "all");
    }
}
