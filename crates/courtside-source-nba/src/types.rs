//! Tabular response envelope shared by every stats.nba.com endpoint

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct StatsResponse {
    #[serde(rename = "resultSets")]
    pub result_sets: Option<Vec<ResultSet>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultSet {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(rename = "rowSet", default)]
    pub row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn column_index(&self) -> HashMap<&str, usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        let columns = self.column_index();
        self.row_set.iter().map(move |values| Row {
            columns: columns.clone(),
            values,
        })
    }
}

/// One row addressed by column name; missing columns read as `None`
pub(crate) struct Row<'a> {
    columns: HashMap<&'a str, usize>,
    values: &'a [Value],
}

impl Row<'_> {
    fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .get(column)
            .and_then(|&idx| self.values.get(idx))
            .filter(|v| !v.is_null())
    }

    pub fn text(&self, column: &str) -> Option<String> {
        match self.get(column)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn integer(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
