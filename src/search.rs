// Food search shared by the label, export and download flows.

use crate::api::GraphQl;
use crate::config::FoodType;
use crate::error::RequestFailure;
use crate::json::{array_at, has_path, i64_at};
use crate::prompt::DateRange;
use crate::queries;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

const RESULTS_PATH: &[&str] = &["data", "foods", "search", "foodSearchResults"];
const TOTAL_PATH: &[&str] = &["data", "foods", "search", "totalCount"];

/// Which versions of each customer item a search returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Versions {
    /// Latest version of unarchived items.
    #[default]
    Current,
    /// Every version, archived items included.
    All,
}

/// Search scope. Customer items only; `versions` picks current or all.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    pub food_type: FoodType,
    pub limit: u32,
    pub search_text: String,
    pub versions: Versions,
    pub tags: Vec<String>,
    pub modified: DateRange,
}

impl SearchFilter {
    pub fn new(food_type: FoodType, limit: u32) -> Self {
        SearchFilter {
            food_type,
            limit,
            search_text: String::new(),
            versions: Versions::Current,
            tags: Vec::new(),
            modified: DateRange::default(),
        }
    }

    pub fn variables(&self) -> Value {
        let mut input = Map::new();
        input.insert("searchText".into(), json!(self.search_text));
        input.insert("foodTypes".into(), json!([self.food_type.as_str()]));
        input.insert("itemSourceFilter".into(), json!("Customer"));
        match self.versions {
            Versions::Current => {
                input.insert("archiveFilter".into(), json!("Unarchived"));
                input.insert("versionFilter".into(), json!("Latest"));
            }
            Versions::All => {
                input.insert("versionFilter".into(), json!("All"));
            }
        }
        input.insert("first".into(), json!(self.limit));
        input.insert("after".into(), json!(0));
        if !self.tags.is_empty() {
            input.insert("tags".into(), json!(self.tags));
        }
        if !self.modified.is_open() {
            let mut range = Map::new();
            if let Some(start) = self.modified.start {
                range.insert("start".into(), json!(start.format("%Y-%m-%d").to_string()));
            }
            if let Some(end) = self.modified.end {
                range.insert("end".into(), json!(end.format("%Y-%m-%d").to_string()));
            }
            input.insert("modifiedDateRange".into(), Value::Object(range));
        }
        json!({ "input": input })
    }
}

/// Run the search and log the reported total.
pub fn search<C: GraphQl>(client: &C, filter: &SearchFilter) -> Result<Value, RequestFailure> {
    info!("Running query...");
    let result = client.execute(queries::FOOD_SEARCH, filter.variables())?;
    if !has_path(&result, &["data", "foods", "search"]) {
        warn!("Search response has no results section: {}", result);
    }
    info!("Found {} results.", total_count(&result));
    Ok(result)
}

pub fn total_count(result: &Value) -> i64 {
    i64_at(result, TOTAL_PATH)
}

pub fn food_results(result: &Value) -> &[Value] {
    array_at(result, RESULTS_PATH)
}
