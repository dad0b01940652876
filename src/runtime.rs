// Runtime executor: one host refresh, table in, chart specification out

use crate::compiler::compose;
use crate::data::DataTable;
use crate::ir::ChartSpec;
use crate::settings::VisualSettings;
use crate::transform::map_table;
use crate::Result;

/// Run one refresh. Returns `Ok(None)` when the table produces no records,
/// in which case nothing should be drawn.
pub fn build_chart(table: &DataTable, settings: &VisualSettings) -> Result<Option<ChartSpec>> {
    let span = tracing::debug_span!("refresh", columns = table.columns.len(), rows = table.rows.len());
    let _enter = span.enter();

    let records = map_table(table)?;
    if records.is_empty() {
        tracing::info!("table produced no records, skipping composition");
        return Ok(None);
    }

    let date_format = table.group_column()?.format.as_deref();
    let spec = compose(&records, settings, date_format)?;

    tracing::info!(
        records = records.len(),
        grids = spec.grid.len(),
        x_axes = spec.x_axis.len(),
        series = spec.series.len(),
        "chart specification built"
    );

    Ok(Some(spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChartError;
    use serde_json::json;

    #[test]
    fn test_build_chart_end_to_end() {
        let table = DataTable::from_json(&json!({
            "columns": [
                { "displayName": "Time", "roles": { "group": true }, "type": "dateTime", "format": "yyyy-MM-dd" },
                { "displayName": "Temp", "roles": { "measures": true }, "format": "0.0" }
            ],
            "rows": [["2024-01-01", 20.0], ["2024-01-02", 21.0]]
        }))
        .unwrap();

        let spec = build_chart(&table, &VisualSettings::default()).unwrap().unwrap();
        assert_eq!(spec.series.len(), 1);
        assert_eq!(spec.axis_pointer.label.date_format.as_deref(), Some("yyyy-MM-dd"));
    }

    #[test]
    fn test_empty_rows_skip_composition() {
        let table = DataTable::from_json(&json!({
            "columns": [
                { "displayName": "Time", "roles": { "group": true } },
                { "displayName": "Temp", "roles": { "measures": true } }
            ],
            "rows": []
        }))
        .unwrap();
        assert!(build_chart(&table, &VisualSettings::default()).unwrap().is_none());
    }

    #[test]
    fn test_missing_group_column_fails() {
        let table = DataTable::from_json(&json!({
            "columns": [{ "displayName": "Temp", "roles": { "measures": true } }],
            "rows": [[1.0]]
        }))
        .unwrap();
        let err = build_chart(&table, &VisualSettings::default()).unwrap_err();
        assert!(matches!(err, ChartError::InputContractViolation(_)));
    }
}
