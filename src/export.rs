// Bulk export: search, enrich every result with per-food lookups, then
// write the flattened rows to CSV. Any failed request aborts the export so
// a partial CSV is never mistaken for a complete one.

use crate::api::GraphQl;
use crate::config::{FoodType, Settings};
use crate::flatten::{Auxiliary, FlatRow, Flattener};
use crate::json::{array_at, dig, str_at, to_cell};
use crate::prompt::DateRange;
use crate::queries;
use crate::search::{self, SearchFilter};
use crate::table::{self, JsonArrayWriter};
use crate::tables::GRAM_UNIT_ID;
use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{info, warn};

/// What the operator asked to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Foods of the configured type with their nutrient analysis.
    Foods,
    /// Ingredients with nutrients, user code, cost and notes.
    Ingredients,
    /// Recipes with nutrients, cost, sub-ingredients and statements.
    RecipeAnalysis,
    /// One row per item of every recipe.
    RecipeItems,
}

pub const EXPORT_MENU: [&str; 4] = [
    "Foods of the configured type",
    "Ingredients (nutrients, user code, cost, notes)",
    "Recipe analysis (nutrients, cost, statements)",
    "Recipe items",
];

impl ExportKind {
    /// Kind for a 1-based menu choice.
    pub fn from_choice(choice: usize) -> Self {
        match choice {
            2 => ExportKind::Ingredients,
            3 => ExportKind::RecipeAnalysis,
            4 => ExportKind::RecipeItems,
            _ => ExportKind::Foods,
        }
    }

    fn food_type(&self, configured: FoodType) -> FoodType {
        match self {
            ExportKind::Foods => configured,
            ExportKind::Ingredients => FoodType::Ingredient,
            ExportKind::RecipeAnalysis | ExportKind::RecipeItems => FoodType::Recipe,
        }
    }

    fn output(&self, settings: &Settings) -> PathBuf {
        let files = &settings.files;
        match self {
            ExportKind::Foods => files.output_csv.clone(),
            ExportKind::Ingredients => files.ingredients_csv.clone(),
            ExportKind::RecipeAnalysis => files.recipe_analysis_csv.clone(),
            ExportKind::RecipeItems => files.recipe_items_csv.clone(),
        }
    }
}

/// Operator selections for one export run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub kind: ExportKind,
    pub tags: Vec<String>,
    pub modified: DateRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub foods: usize,
    pub rows: usize,
    pub csv: PathBuf,
}

/// Nutrient list from a 100 g net analysis of `food_id`.
pub fn get_analysis<C: GraphQl>(client: &C, food_id: &str) -> Result<Vec<Value>> {
    let variables = json!({"input": {
        "foodId": food_id,
        "analysisInput": {
            "analysisType": "Net",
            "amount": {"quantity": "100", "unitId": GRAM_UNIT_ID}
        }
    }});
    let result = client
        .execute(queries::GET_ANALYSIS, variables)
        .with_context(|| format!("Analysis request failed for {}", food_id))?;
    let nutrients = array_at(
        &result,
        &["data", "analysis", "getAnalysis", "analysis", "nutrientInfos"],
    );
    if nutrients.is_empty() {
        warn!("Unable to get nutrient information for {}", food_id);
    }
    Ok(nutrients.to_vec())
}

/// The `food` object of a details lookup; `Null` when the response has none.
pub fn get_food_details<C: GraphQl>(client: &C, food_id: &str) -> Result<Value> {
    let result = client
        .execute(queries::GET_FOOD_DETAILS, json!({"input": {"foodId": food_id}}))
        .with_context(|| format!("Food details request failed for {}", food_id))?;
    Ok(dig(&result, &["data", "foods", "get", "food"]).clone())
}

/// Statement payload for `food_id`. A malformed payload flattens to empty
/// statements rather than failing the export.
pub fn get_statements<C: GraphQl>(client: &C, food_id: &str) -> Result<Value> {
    let result = client
        .execute(queries::GET_STATEMENTS, json!({"input": {"foodId": food_id}}))
        .with_context(|| format!("Statements request failed for {}", food_id))?;
    Ok(dig(&result, &["data", "foods", "getStatements"]).clone())
}

/// Flatten one search result according to `kind`.
pub fn export_row<C: GraphQl>(
    client: &C,
    flattener: &Flattener,
    kind: ExportKind,
    food: &Value,
) -> Result<FlatRow> {
    let food_id = str_at(food, &["id"]);
    let nutrients = get_analysis(client, food_id)?;
    let details = match kind {
        ExportKind::Ingredients | ExportKind::RecipeAnalysis => get_food_details(client, food_id)?,
        ExportKind::Foods | ExportKind::RecipeItems => Value::Null,
    };
    let statements = match kind {
        ExportKind::RecipeAnalysis => get_statements(client, food_id)?,
        _ => Value::Null,
    };

    let mut aux = Auxiliary {
        nutrients: Some(nutrients.as_slice()),
        ..Default::default()
    };
    match kind {
        ExportKind::Foods | ExportKind::RecipeItems => {}
        ExportKind::Ingredients => {
            aux.custom_fields = Some(array_at(&details, &["customFields"]));
            aux.cost = Some(dig(&details, &["costPerAmount"]));
            aux.notes = Some(array_at(&details, &["notes"]));
        }
        ExportKind::RecipeAnalysis => {
            aux.custom_fields = Some(array_at(&details, &["customFields"]));
            aux.cost = Some(dig(&details, &["costPerAmount"]));
            aux.sub_ingredients = Some(array_at(&details, &["items"]));
            aux.statements = Some(&statements);
        }
    }
    Ok(flattener.flatten(food, &aux))
}

/// One row per item in a recipe's details.
pub fn recipe_item_rows(recipe: &Value, details: &Value) -> Vec<FlatRow> {
    array_at(details, &["items"])
        .iter()
        .map(|item| {
            let mut row = FlatRow::new();
            row.set_str("recipe_id", str_at(recipe, &["id"]));
            row.set_str("recipe_name", str_at(recipe, &["name"]));
            row.set_str("item_id", str_at(item, &["food", "id"]));
            row.set_str("item_name", str_at(item, &["food", "name"]));
            row.set_str("quantity", &to_cell(dig(item, &["amount", "quantity", "value"])));
            row.set_str("unit", str_at(item, &["amount", "unit", "name"]));
            row
        })
        .collect()
}

/// Run a full export. Zero search results or any failed lookup aborts the
/// run before the CSV is written.
pub fn run<C: GraphQl>(client: &C, settings: &Settings, request: &ExportRequest) -> Result<ExportSummary> {
    let json_path = settings.files.output_file.clone();
    table::remove_existing(&json_path)?;

    let mut filter = SearchFilter::new(
        request.kind.food_type(settings.options.food_type),
        settings.options.limit,
    );
    filter.search_text = "*".into();
    filter.tags = request.tags.clone();
    filter.modified = request.modified;

    let result = search::search(client, &filter).context("Search request failed")?;
    let foods = search::food_results(&result);
    if foods.is_empty() {
        bail!("No results found. Exiting.");
    }

    let mut json_out = JsonArrayWriter::create(&json_path)?;
    json_out.append(&result)?;
    json_out.finish()?;

    let flattener = Flattener::new(settings.options.nutrient_filter());
    let mut rows = Vec::new();
    for food in foods {
        match request.kind {
            ExportKind::RecipeItems => {
                let details = get_food_details(client, str_at(food, &["id"]))?;
                rows.extend(recipe_item_rows(food, &details));
            }
            kind => rows.push(export_row(client, &flattener, kind, food)?),
        }
    }

    let csv = request.kind.output(settings);
    table::write_table(&rows, &csv)?;
    info!("Complete. Exported results to {}", csv.display());
    Ok(ExportSummary {
        foods: foods.len(),
        rows: rows.len(),
        csv,
    })
}
