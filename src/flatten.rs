// Projection of nested food records onto flat, scalar-only rows.
//
// A row keeps the key order in which columns were first set, so the CSV
// writer can derive a stable header from heterogeneous rows.

use crate::json::{dig, str_at, to_cell};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Custom field whose value is exported as the `usercode` column.
pub const USER_CODE_FIELD: &str = "User Code";

pub const NOTES_DELIMITER: &str = "|";
pub const NAMES_DELIMITER: &str = ",";

/// One CSV row: column name to scalar value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow {
    cells: Map<String, Value>,
}

impl FlatRow {
    pub fn new() -> Self {
        FlatRow::default()
    }

    /// Set a column. Re-setting a column keeps its original position.
    /// Nested values are projected to a single string first.
    pub fn set(&mut self, key: impl Into<String>, value: &Value) {
        self.cells.insert(key.into(), project(value));
    }

    pub fn set_str(&mut self, key: impl Into<String>, value: &str) {
        self.cells.insert(key.into(), Value::String(value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cells.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    /// Cell text for `key`; a missing column renders as an empty string.
    pub fn cell(&self, key: &str) -> String {
        self.cells.get(key).map(to_cell).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Copy every top-level field of a JSON object. Non-objects give an
    /// empty row.
    pub fn from_record(record: &Value) -> Self {
        let mut row = FlatRow::new();
        if let Value::Object(map) = record {
            for (key, value) in map {
                row.set(key.clone(), value);
            }
        }
        row
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FlatRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = FlatRow::new();
        for (k, v) in iter {
            row.set(k, &v.into());
        }
        row
    }
}

/// Reduce a value to a scalar. Lists are comma joined; objects become
/// their `name` when they have one, compact JSON otherwise.
fn project(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::String(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(_) if dig(item, &["name"]).is_string() => {
                        str_at(item, &["name"]).to_string()
                    }
                    other => to_cell(other),
                })
                .collect::<Vec<_>>()
                .join(NAMES_DELIMITER),
        ),
        Value::Object(_) => match dig(value, &["name"]) {
            Value::String(name) => Value::String(name.clone()),
            _ => Value::String(value.to_string()),
        },
        scalar => scalar.clone(),
    }
}

/// Secondary per-record lookups merged into a row. `None` means the lookup
/// was not performed and its columns are left out; `Some` always produces
/// its columns, defaulting to empty strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Auxiliary<'a> {
    /// `nutrientInfos` list from an analysis.
    pub nutrients: Option<&'a [Value]>,
    /// `costPerAmount` object; `Some(&Value::Null)` when the food has none.
    pub cost: Option<&'a Value>,
    pub custom_fields: Option<&'a [Value]>,
    pub notes: Option<&'a [Value]>,
    pub sub_ingredients: Option<&'a [Value]>,
    /// `getStatements` payload.
    pub statements: Option<&'a Value>,
}

/// Builds flat rows, optionally restricted to a set of nutrient names.
#[derive(Debug, Clone, Default)]
pub struct Flattener {
    nutrient_filter: Option<HashSet<String>>,
}

impl Flattener {
    pub fn new(nutrient_filter: Option<HashSet<String>>) -> Self {
        Flattener { nutrient_filter }
    }

    fn keeps(&self, nutrient: &str) -> bool {
        self.nutrient_filter
            .as_ref()
            .map_or(true, |names| names.contains(nutrient))
    }

    /// Never fails: anything missing degrades to an empty cell.
    pub fn flatten(&self, record: &Value, aux: &Auxiliary<'_>) -> FlatRow {
        let mut row = FlatRow::from_record(record);

        if let Some(nutrients) = aux.nutrients {
            for info in nutrients {
                let name = str_at(info, &["nutrient", "name"]);
                if name.is_empty() || !self.keeps(name) {
                    continue;
                }
                row.set(name, dig(info, &["value"]));
            }
        }

        if let Some(fields) = aux.custom_fields {
            row.set_str("usercode", &user_code(fields));
        }

        if let Some(cost) = aux.cost {
            let (cost, amount) = cost_and_amount(cost);
            row.set_str("cost", &cost);
            row.set_str("amount", &amount);
        }

        if let Some(notes) = aux.notes {
            let joined = notes
                .iter()
                .map(|n| str_at(n, &["text"]))
                .collect::<Vec<_>>()
                .join(NOTES_DELIMITER);
            row.set_str("notes", &joined);
        }

        if let Some(items) = aux.sub_ingredients {
            let joined = items
                .iter()
                .map(|i| str_at(i, &["food", "name"]))
                .collect::<Vec<_>>()
                .join(NAMES_DELIMITER);
            row.set_str("sub_ingredients", &joined);
        }

        if let Some(statements) = aux.statements {
            row.set_str(
                "ingredient_statement",
                str_at(statements, &["ingredientStatement", "statement"]),
            );
            row.set_str(
                "allergen_statement",
                str_at(statements, &["allergenStatement", "statement"]),
            );
        }

        row
    }
}

/// Value of the first custom field named [`USER_CODE_FIELD`].
pub fn user_code(fields: &[Value]) -> String {
    fields
        .iter()
        .find(|f| str_at(f, &["customField", "name"]) == USER_CODE_FIELD)
        .map(|f| to_cell(dig(f, &["value"])))
        .unwrap_or_default()
}

/// `(cost, "<quantity> <unit>")` for a `costPerAmount` object.
pub fn cost_and_amount(cost: &Value) -> (String, String) {
    if !cost.is_object() {
        return (String::new(), String::new());
    }
    let price = to_cell(dig(cost, &["cost"]));
    let quantity = to_cell(dig(cost, &["amount", "quantity", "value"]));
    let unit = str_at(cost, &["amount", "unit", "name"]);
    let amount = format!("{} {}", quantity, unit).trim().to_string();
    (price, amount)
}

/// Rows for a list of records sharing no auxiliary data.
pub fn flatten_all(records: &[Value]) -> Vec<FlatRow> {
    records.iter().map(FlatRow::from_record).collect()
}
