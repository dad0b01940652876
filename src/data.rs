use crate::{ChartError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Read;

/// Role flag that marks the grouping (time) column.
pub const GROUP_ROLE: &str = "group";

/// Role assigned to measure columns loaded from CSV.
pub const MEASURE_ROLE: &str = "measures";

/// Declared type of a column's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    DateTime,
    Numeric,
    Integer,
    Text,
    Bool,
}

/// Per-column style objects: object group name -> property name -> value.
pub type ColumnObjects = Map<String, Value>;

/// Column metadata as delivered by the host data layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub display_name: String,
    #[serde(default)]
    pub query_name: Option<String>,
    /// Ordered role set; the first role flagged `true` identifies the column.
    #[serde(default)]
    pub roles: Map<String, Value>,
    #[serde(default, rename = "type")]
    pub value_type: Option<ValueType>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub roles_index: BTreeMap<String, Vec<i64>>,
    #[serde(default)]
    pub objects: Option<ColumnObjects>,
}

impl Column {
    pub fn is_group(&self) -> bool {
        matches!(self.roles.get(GROUP_ROLE), Some(Value::Bool(true)))
    }

    /// The role identifier: first role flagged `true`, else the first role key.
    pub fn role_id(&self) -> Option<&str> {
        self.roles
            .iter()
            .find(|(_, flag)| matches!(flag, Value::Bool(true)))
            .or_else(|| self.roles.iter().next())
            .map(|(role, _)| role.as_str())
    }

    /// Ordering index under this column's role.
    pub fn ordering_index(&self) -> Option<i64> {
        let role = self.role_id()?;
        self.roles_index.get(role).and_then(|idx| idx.first().copied())
    }

    /// Selector used when the host addresses this column's properties.
    pub fn selector_name(&self) -> &str {
        self.query_name.as_deref().unwrap_or(&self.display_name)
    }
}

/// A flat table: ordered columns plus positional rows aligned to them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Index of the single column flagged with the grouping role
    pub fn group_index(&self) -> Result<usize> {
        let mut groups = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_group())
            .map(|(i, _)| i);

        match (groups.next(), groups.next()) {
            (Some(idx), None) => Ok(idx),
            (None, _) => Err(ChartError::InputContractViolation(format!(
                "no column carries the '{}' role",
                GROUP_ROLE
            ))),
            (Some(_), Some(_)) => Err(ChartError::InputContractViolation(format!(
                "more than one column carries the '{}' role",
                GROUP_ROLE
            ))),
        }
    }

    pub fn group_column(&self) -> Result<&Column> {
        let idx = self.group_index()?;
        Ok(&self.columns[idx])
    }

    /// Measure columns in table order, paired with their positional index.
    pub fn measure_columns(&self) -> impl Iterator<Item = (usize, &Column)> {
        self.columns.iter().enumerate().filter(|(_, c)| !c.is_group())
    }

    /// Parse a table from its JSON representation
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a table from CSV. The first column is the grouping column; every
    /// other header becomes a measure column with default metadata.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(ChartError::InputContractViolation(
                "CSV input has no header row".to_string(),
            ));
        }

        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if i == 0 {
                    csv_column(name, GROUP_ROLE, None)
                } else {
                    csv_column(name, MEASURE_ROLE, Some(i as i64 - 1))
                }
            })
            .collect();

        let mut rows = Vec::new();
        for (line, record) in rdr.records().enumerate() {
            let record = record?;
            let mut row = Vec::with_capacity(headers.len());
            for (i, field) in record.iter().enumerate() {
                let cell = if i == 0 {
                    group_cell(field)
                } else {
                    measure_cell(field).ok_or_else(|| {
                        ChartError::InputContractViolation(format!(
                            "row {}: value '{}' in column '{}' is not numeric",
                            line + 1,
                            field,
                            headers[i]
                        ))
                    })?
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }
}

fn csv_column(name: &str, role: &str, index: Option<i64>) -> Column {
    let mut roles = Map::new();
    roles.insert(role.to_string(), Value::Bool(true));

    let mut roles_index = BTreeMap::new();
    if let Some(idx) = index {
        roles_index.insert(role.to_string(), vec![idx]);
    }

    Column {
        display_name: name.to_string(),
        query_name: Some(name.to_string()),
        roles,
        value_type: Some(if role == GROUP_ROLE { ValueType::Text } else { ValueType::Numeric }),
        format: None,
        roles_index,
        objects: None,
    }
}

fn group_cell(field: &str) -> Value {
    match field.parse::<f64>() {
        Ok(n) => serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number),
        Err(_) if field.is_empty() => Value::Null,
        Err(_) => Value::String(field.to_string()),
    }
}

fn measure_cell(field: &str) -> Option<Value> {
    if field.is_empty() {
        return Some(Value::Null);
    }
    let n = field.parse::<f64>().ok()?;
    Some(serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_group_column() {
        let table = DataTable::from_json(&json!({
            "columns": [
                { "displayName": "Time", "roles": { "group": true }, "type": "dateTime" },
                { "displayName": "Temp", "roles": { "measures": true }, "rolesIndex": { "measures": [0] } }
            ],
            "rows": [["2024-01-01", 1.5]]
        }))
        .unwrap();

        assert_eq!(table.group_index().unwrap(), 0);
        assert_eq!(table.group_column().unwrap().value_type, Some(ValueType::DateTime));
        let measures: Vec<_> = table.measure_columns().map(|(i, _)| i).collect();
        assert_eq!(measures, vec![1]);
        assert_eq!(table.columns[1].ordering_index(), Some(0));
    }

    #[test]
    fn test_missing_group_role() {
        let table = DataTable::new(
            vec![Column { display_name: "Temp".into(), ..Default::default() }],
            vec![],
        );
        assert!(matches!(
            table.group_index(),
            Err(ChartError::InputContractViolation(_))
        ));
    }

    #[test]
    fn test_duplicate_group_role() {
        let table = DataTable::from_json(&json!({
            "columns": [
                { "displayName": "Time", "roles": { "group": true } },
                { "displayName": "Time2", "roles": { "group": true } },
                { "displayName": "A", "roles": { "measures": true } }
            ],
            "rows": [["t0", "t0", 1.0]]
        }))
        .unwrap();

        let err = table.group_index().unwrap_err();
        assert!(matches!(err, ChartError::InputContractViolation(_)));
        assert!(err.to_string().contains("more than one"));
    }

    #[test]
    fn test_reader_errors_surface_as_json_errors() {
        let err = DataTable::from_json_reader("{ \"columns\": [".as_bytes()).unwrap_err();
        assert!(matches!(err, ChartError::Json(_)));
    }

    #[test]
    fn test_role_id_prefers_flagged_role() {
        let mut roles = Map::new();
        roles.insert("tooltips".into(), Value::Bool(false));
        roles.insert("measures".into(), Value::Bool(true));
        let col = Column { display_name: "A".into(), roles, ..Default::default() };
        assert_eq!(col.role_id(), Some("measures"));
    }

    #[test]
    fn test_from_csv() {
        let csv = "time,temp,pressure\n1,20.5,1000\n2,,1001\n";
        let table = DataTable::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.columns.len(), 3);
        assert!(table.columns[0].is_group());
        assert_eq!(table.columns[2].ordering_index(), Some(1));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][1], Value::Null);
        assert_eq!(table.rows[0][0], json!(1.0));
    }

    #[test]
    fn test_from_csv_non_numeric_measure() {
        let csv = "time,temp\n1,hot\n";
        let err = DataTable::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("not numeric"));
    }
}
