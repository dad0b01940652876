use crate::data::{Column, DataTable};
use crate::format::DEFAULT_FORMAT;
use crate::ir::{GroupValue, ValueRecord};
use crate::resolve::{resolve_panel, resolve_series, resolve_x_axis, PanelOptions, SeriesOptions, XAxisOptions};
use crate::{ChartError, Result};
use serde_json::Value;
use std::cmp::Reverse;

/// Column-level data shared by every record of one measure column
#[derive(Debug, Clone)]
struct MeasureColumn {
    position: usize,
    id: String,
    key: String,
    panel: PanelOptions,
    x_axis: XAxisOptions,
    series: SeriesOptions,
    value_format: String,
    roles_index: i64,
}

impl MeasureColumn {
    fn from_column(position: usize, measure_index: usize, column: &Column) -> Result<Self> {
        let id = column.role_id().ok_or_else(|| {
            ChartError::InputContractViolation(format!(
                "measure column '{}' carries no role",
                column.display_name
            ))
        })?;

        let objects = column.objects.as_ref();
        let value_format = column
            .format
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(DEFAULT_FORMAT);

        Ok(Self {
            position,
            id: id.to_string(),
            key: column.display_name.clone(),
            panel: resolve_panel(objects),
            x_axis: resolve_x_axis(objects),
            series: resolve_series(objects),
            value_format: value_format.to_string(),
            roles_index: column.ordering_index().unwrap_or(measure_index as i64),
        })
    }

    fn record(&self, group: &GroupValue, cell: &Value, row: usize) -> Result<ValueRecord> {
        Ok(ValueRecord {
            id: self.id.clone(),
            key: self.key.clone(),
            group: group.clone(),
            value: measure_value(cell, row, &self.key)?,
            panel: self.panel,
            x_axis: self.x_axis.clone(),
            series: self.series.clone(),
            value_format: self.value_format.clone(),
            roles_index: self.roles_index,
        })
    }
}

/// Normalize a table into value records, one per (row, measure column),
/// ordered by descending ordering index. Ties keep (row, column) order.
pub fn map_table(table: &DataTable) -> Result<Vec<ValueRecord>> {
    let group_index = table.group_index()?;
    let group_column = &table.columns[group_index];

    // Resolve column-level configuration once, independent of rows
    let measures = table
        .measure_columns()
        .enumerate()
        .map(|(measure_index, (position, column))| {
            MeasureColumn::from_column(position, measure_index, column)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        rows = table.rows.len(),
        measures = measures.len(),
        group = %group_column.display_name,
        "mapping table"
    );

    let mut records = Vec::with_capacity(table.rows.len() * measures.len());
    for (row_index, row) in table.rows.iter().enumerate() {
        if row.len() != table.columns.len() {
            return Err(ChartError::InputContractViolation(format!(
                "row {} has {} cells, expected {}",
                row_index,
                row.len(),
                table.columns.len()
            )));
        }

        let group = GroupValue {
            value: row[group_index].clone(),
            value_type: group_column.value_type,
        };

        for measure in &measures {
            records.push(measure.record(&group, &row[measure.position], row_index)?);
        }
    }

    // sort_by_key is stable
    records.sort_by_key(|r| Reverse(r.roles_index));

    Ok(records)
}

fn measure_value(cell: &Value, row: usize, key: &str) -> Result<Option<f64>> {
    match cell {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse::<f64>().map(Some).map_err(|_| {
            ChartError::InputContractViolation(format!(
                "row {}: value '{}' for '{}' is not numeric",
                row, s, key
            ))
        }),
        other => Err(ChartError::InputContractViolation(format!(
            "row {}: value {} for '{}' is not numeric",
            row, other, key
        ))),
    }
}
