use crate::components::{AxisPointer, Legend, Tooltip};
use crate::format::{ValueFormatter, DEFAULT_FORMAT};
use crate::ir::{
    AreaStyle, AxisBound, AxisLabel, AxisPosition, AxisType, ChartSpec, ColorStyle, DataPoint,
    Grid, LaneKey, LineSeries, Percent, SeriesKey, SeriesType, Symbol, Toggle, ValueRecord, XAxis,
    YAxis,
};
use crate::resolve::{Panel, SeriesOptions, XAxisOptions};
use crate::settings::VisualSettings;
use crate::{ChartError, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Share of each static panel width actually used; the rest is margin.
pub const PANEL_SHRINK: f64 = 0.9;

/// Gutter (in percent) placed left of every grid.
pub const PANEL_GUTTER: f64 = 5.0;

/// Pixels between stacked x-axis lanes.
pub const LANE_SPACING: u32 = 20;

/// Records partitioned by key, keys in first-seen order
struct Partition<'a, K> {
    groups: Vec<(K, Vec<&'a ValueRecord>)>,
}

impl<'a, K: Eq + Hash + Clone> Partition<'a, K> {
    fn new(records: &'a [ValueRecord], key_fn: impl Fn(&ValueRecord) -> K) -> Self {
        let mut index: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<(K, Vec<&'a ValueRecord>)> = Vec::new();

        for record in records {
            let key = key_fn(record);
            match index.get(&key) {
                Some(&i) => groups[i].1.push(record),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push((key, vec![record]));
                }
            }
        }

        Self { groups }
    }

    fn len(&self) -> usize {
        self.groups.len()
    }
}

/// Effective configuration of a group: the last member wins, `default`
/// applies to an empty group. Divergent members are logged, not rejected.
fn representative<T, F>(members: &[&ValueRecord], field: F, default: T, what: &str) -> T
where
    T: Clone + PartialEq + Debug,
    F: Fn(&ValueRecord) -> &T,
{
    let Some(last) = members.last() else {
        return default;
    };
    let chosen = field(*last);
    if members.iter().any(|r| field(*r) != chosen) {
        tracing::warn!(
            what = what,
            chosen = ?chosen,
            members = members.len(),
            "group members disagree on configuration, last one wins"
        );
    }
    chosen.clone()
}

/// Build the chart specification from ordered value records.
pub fn compose(
    records: &[ValueRecord],
    settings: &VisualSettings,
    date_format: Option<&str>,
) -> Result<ChartSpec> {
    if records.is_empty() {
        return Err(ChartError::InputContractViolation(
            "cannot compose a chart from zero records".to_string(),
        ));
    }

    let panels = Partition::new(records, ValueRecord::panel_key);
    let lanes = Partition::new(records, ValueRecord::lane_key);
    let series_groups = Partition::new(records, ValueRecord::series_key);

    tracing::debug!(
        panels = panels.len(),
        lanes = lanes.len(),
        series = series_groups.len(),
        "partitioned records"
    );

    let panel_order: Vec<Panel> = panels.groups.iter().map(|(p, _)| *p).collect();

    let grid = build_grids(&panel_order, settings);
    let y_axis = build_y_axes(&panel_order, settings);
    let x_axis = lanes
        .groups
        .iter()
        .map(|(lane, members)| build_x_axis(lane, members, settings))
        .collect();
    let series = series_groups
        .groups
        .iter()
        .map(|(key, members)| build_series(key, members, settings))
        .collect();

    let value_formats = series_groups
        .groups
        .iter()
        .map(|(key, _)| ValueFormatter::new(&key.value_format))
        .collect();

    Ok(ChartSpec {
        legend: Legend::new(&settings.legend),
        tooltip: Tooltip::new(&settings.tooltip, value_formats),
        axis_pointer: AxisPointer::new(date_format),
        grid,
        x_axis,
        y_axis,
        series,
    })
}

/// Adjusted static widths, first through fifth. Missing, zero, negative or non-finite
/// widths contribute nothing.
fn adjusted_widths(settings: &VisualSettings) -> [f64; 5] {
    settings
        .static_panel
        .widths()
        .map(|w| if w.is_finite() && w > 0.0 { w * PANEL_SHRINK } else { 0.0 })
}

fn build_grids(panels: &[Panel], settings: &VisualSettings) -> Vec<Grid> {
    let widths = adjusted_widths(settings);

    panels
        .iter()
        .enumerate()
        .map(|(i, panel)| {
            let preceding: f64 = widths.iter().take(i).sum();
            let own = widths.get(i).copied().unwrap_or(0.0);
            Grid {
                id: panel.to_string(),
                // The legend width doubles as the vertical reserve above grids
                top: Percent(settings.legend.width),
                left: Percent(preceding + PANEL_GUTTER),
                width: Percent(own - PANEL_GUTTER),
            }
        })
        .collect()
}

fn build_y_axes(panels: &[Panel], settings: &VisualSettings) -> Vec<YAxis> {
    panels
        .iter()
        .enumerate()
        .map(|(i, panel)| {
            // Only the first panel draws the shared time axis
            let show = i == 0;
            YAxis {
                axis_type: AxisType::Time,
                id: panel.to_string(),
                grid_id: panel.to_string(),
                inverse: true,
                axis_line: Toggle { show },
                axis_label: AxisLabel {
                    show,
                    font_size: settings.axis.font_size,
                    value_format: None,
                },
                axis_tick: Toggle { show },
            }
        })
        .collect()
}

fn build_x_axis(lane: &LaneKey, members: &[&ValueRecord], settings: &VisualSettings) -> XAxis {
    let options = representative(members, |r| &r.x_axis, XAxisOptions::default(), "x-axis");
    let value_format = members
        .last()
        .map_or(DEFAULT_FORMAT, |r| r.value_format.as_str());

    let (min, max) = if options.mm_override {
        (AxisBound::Fixed(options.mm_min), AxisBound::Fixed(options.mm_max))
    } else {
        (AxisBound::DataMin, AxisBound::DataMax)
    };

    XAxis {
        axis_type: AxisType::Value,
        id: lane.axis_id(),
        grid_id: lane.panel.to_string(),
        align_ticks: true,
        min,
        max,
        position: AxisPosition::Top,
        offset: u32::from(lane.offset) * LANE_SPACING,
        inverse: options.inverse,
        axis_label: AxisLabel {
            show: true,
            font_size: settings.axis.font_size,
            value_format: Some(ValueFormatter::new(value_format)),
        },
    }
}

fn build_series(key: &SeriesKey, members: &[&ValueRecord], settings: &VisualSettings) -> LineSeries {
    let style = representative(members, |r| &r.series, SeriesOptions::default(), "series");
    let color = style.color().to_string();

    LineSeries {
        series_type: SeriesType::Line,
        symbol: if settings.data_point.enabled { Symbol::EmptyCircle } else { Symbol::None },
        name: format!("{} - {}", key.lane.panel, key.key),
        y_axis_id: key.lane.panel.to_string(),
        x_axis_id: key.lane.axis_id(),
        data: members
            .iter()
            .map(|r| DataPoint(r.value, r.group.value.clone()))
            .collect(),
        line_style: ColorStyle { color: color.clone() },
        item_style: ColorStyle { color: color.clone() },
        area_style: style.area.then(|| AreaStyle { color, opacity: style.area_opacity }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::GroupValue;
    use crate::resolve::{Fill, PanelOptions};
    use crate::settings::StaticPanelSettings;
    use serde_json::json;

    fn record(key: &str, panel: Panel, offset: u8, format: &str, value: f64, group: i64) -> ValueRecord {
        ValueRecord {
            id: "measures".to_string(),
            key: key.to_string(),
            group: GroupValue { value: json!(group), value_type: None },
            value: Some(value),
            panel: PanelOptions { panel },
            x_axis: XAxisOptions { offset, ..XAxisOptions::default() },
            series: SeriesOptions::default(),
            value_format: format.to_string(),
            roles_index: 0,
        }
    }

    #[test]
    fn test_single_panel_two_lanes() {
        let records = vec![
            record("Temp", Panel::One, 0, "0.0", 20.0, 1),
            record("Pressure", Panel::One, 1, "0", 1000.0, 1),
            record("Temp", Panel::One, 0, "0.0", 21.0, 2),
            record("Pressure", Panel::One, 1, "0", 1001.0, 2),
        ];
        let spec = compose(&records, &VisualSettings::default(), None).unwrap();

        assert_eq!(spec.grid.len(), 1);
        assert_eq!(spec.y_axis.len(), 1);
        let x_ids: Vec<_> = spec.x_axis.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(x_ids, vec!["1-0", "1-1"]);
        assert_eq!(spec.x_axis[1].offset, 20);

        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].name, "1 - Temp");
        assert_eq!(spec.series[0].x_axis_id, "1-0");
        assert_eq!(spec.series[1].x_axis_id, "1-1");
        assert_eq!(spec.series[0].data.len(), 2);
        assert_eq!(spec.tooltip.value_formats[1].source(), "0");
    }

    #[test]
    fn test_grid_geometry() {
        let records = vec![
            record("A", Panel::Two, 0, "0", 1.0, 1),
            record("B", Panel::One, 0, "0", 1.0, 1),
        ];
        let spec = compose(&records, &VisualSettings::default(), None).unwrap();

        // First-seen order: panel 2 comes first
        assert_eq!(spec.grid[0].id, "2");
        assert_eq!(spec.grid[0].left, Percent(5.0));
        assert_eq!(spec.grid[0].width, Percent(13.0));
        assert_eq!(spec.grid[1].left, Percent(23.0));
        assert_eq!(spec.grid[0].top, Percent(20.0));

        assert!(spec.y_axis[0].axis_label.show);
        assert!(!spec.y_axis[1].axis_label.show);
        assert!(!spec.y_axis[1].axis_tick.show);
    }

    #[test]
    fn test_full_width_single_panel() {
        let settings = VisualSettings {
            static_panel: StaticPanelSettings {
                width1: 100.0,
                width2: 0.0,
                width3: 0.0,
                width4: 0.0,
                width5: 0.0,
            },
            ..VisualSettings::default()
        };
        let spec = compose(&[record("A", Panel::One, 0, "0", 1.0, 1)], &settings, None).unwrap();
        assert_eq!(spec.grid.len(), 1);
        assert_eq!(spec.grid[0].left, Percent(5.0));
        assert_eq!(spec.grid[0].width, Percent(85.0));
    }

    #[test]
    fn test_negative_and_non_finite_widths_count_as_zero() {
        let settings = VisualSettings {
            static_panel: StaticPanelSettings {
                width1: -30.0,
                width2: f64::NAN,
                width3: 20.0,
                width4: 20.0,
                width5: 20.0,
            },
            ..VisualSettings::default()
        };
        let records = vec![
            record("A", Panel::One, 0, "0", 1.0, 1),
            record("B", Panel::Two, 0, "0", 1.0, 1),
            record("C", Panel::Three, 0, "0", 1.0, 1),
        ];
        let spec = compose(&records, &settings, None).unwrap();

        assert_eq!(spec.grid[0].left, Percent(5.0));
        assert_eq!(spec.grid[0].width, Percent(-5.0));
        assert_eq!(spec.grid[1].left, Percent(5.0));
        assert_eq!(spec.grid[2].left, Percent(5.0));
        assert_eq!(spec.grid[2].width, Percent(13.0));
    }

    #[test]
    fn test_min_max_override() {
        let mut r = record("A", Panel::One, 0, "0", 1.0, 1);
        r.x_axis.mm_override = true;
        r.x_axis.mm_min = -10.0;
        r.x_axis.mm_max = 10.0;
        r.x_axis.inverse = true;

        let spec = compose(&[r], &VisualSettings::default(), None).unwrap();
        assert_eq!(spec.x_axis[0].min, AxisBound::Fixed(-10.0));
        assert_eq!(spec.x_axis[0].max, AxisBound::Fixed(10.0));
        assert!(spec.x_axis[0].inverse);

        let spec = compose(&[record("A", Panel::One, 0, "0", 1.0, 1)], &VisualSettings::default(), None).unwrap();
        assert_eq!(spec.x_axis[0].min, AxisBound::DataMin);
        assert_eq!(spec.x_axis[0].max, AxisBound::DataMax);
    }

    #[test]
    fn test_duplicate_configuration_collapses() {
        let records = vec![
            record("Dup", Panel::One, 0, "0", 1.0, 1),
            record("Dup", Panel::One, 0, "0", 2.0, 1),
            record("Dup", Panel::One, 0, "0", 3.0, 2),
        ];
        let spec = compose(&records, &VisualSettings::default(), None).unwrap();
        assert_eq!(spec.series.len(), 1);
        let values: Vec<_> = spec.series[0].data.iter().map(|p| p.0).collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_series_style_last_wins() {
        let mut first = record("A", Panel::One, 0, "0", 1.0, 1);
        first.series.color = Fill::solid("#111111");
        let mut last = record("A", Panel::One, 0, "0", 2.0, 2);
        last.series = SeriesOptions { color: Fill::solid("#ff0000"), area: true, area_opacity: 0.3 };

        let spec = compose(&[first, last], &VisualSettings::default(), None).unwrap();
        let series = &spec.series[0];
        assert_eq!(series.line_style.color, "#ff0000");
        assert_eq!(series.item_style.color, "#ff0000");
        assert_eq!(series.area_style, Some(AreaStyle { color: "#ff0000".into(), opacity: 0.3 }));
    }

    #[test]
    fn test_data_point_symbol() {
        let mut settings = VisualSettings::default();
        let r = [record("A", Panel::One, 0, "0", 1.0, 1)];
        assert_eq!(compose(&r, &settings, None).unwrap().series[0].symbol, Symbol::None);
        settings.data_point.enabled = true;
        assert_eq!(compose(&r, &settings, None).unwrap().series[0].symbol, Symbol::EmptyCircle);
    }

    #[test]
    fn test_empty_records_rejected() {
        assert!(compose(&[], &VisualSettings::default(), None).is_err());
    }

    #[test]
    fn test_representative_default_on_empty_group() {
        let chosen = representative(&[], |r| &r.x_axis, XAxisOptions::default(), "x-axis");
        assert_eq!(chosen, XAxisOptions::default());
    }
}
