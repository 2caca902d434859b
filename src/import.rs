// Ingredient import from CSV. Each row is validated completely before any
// request is issued, so a bad row never leaves a half-created food behind.

use crate::api::GraphQl;
use crate::config::{AllergenTables, Settings};
use crate::error::RowError;
use crate::flatten::FlatRow;
use crate::json::{array_at, str_at};
use crate::queries;
use crate::table;
use crate::tables::{self, Authority, ENGLISH};
use anyhow::Result;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Columns with a fixed meaning; every other column must be a nutrient.
pub const RESERVED_COLUMNS: [&str; 10] = [
    "Name",
    "Product",
    "Supplier",
    "Weight",
    "Unit",
    "Alias",
    "Authority",
    "Contains Allergens",
    "May Contain Allergens",
    "Status",
];

const DEFAULT_WEIGHT: &str = "100";
const DEFAULT_UNIT: &str = "Gram";

/// Everything needed to create one ingredient, resolved to API ids.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientPlan {
    pub name: String,
    pub supplier: Option<String>,
    pub aliases: Vec<String>,
    pub weight: String,
    pub unit_id: &'static str,
    pub nutrients: Vec<(&'static str, String)>,
    pub authority: Authority,
    pub contains: Vec<String>,
    pub may_contain: Vec<String>,
    pub approve: bool,
}

fn non_blank(row: &FlatRow, column: &str) -> Option<String> {
    let value = row.cell(column);
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn resolve_allergens(
    row: &FlatRow,
    column: &str,
    allergens: &AllergenTables,
    authority: Authority,
    errors: &mut Vec<RowError>,
) -> Vec<String> {
    let mut ids = Vec::new();
    for allergen in split_list(&row.cell(column)) {
        match allergens.allergen_id(authority, &allergen) {
            Some(id) => ids.push(id.to_string()),
            None => errors.push(RowError::UnknownAllergen {
                column: column.to_string(),
                allergen,
                authority: authority.as_str().to_string(),
            }),
        }
    }
    ids
}

/// Validate one CSV row against the built-in unit and nutrient tables and the
/// configured allergen tables. All problems are reported, not just the first.
pub fn plan_row(row: &FlatRow, allergens: &AllergenTables) -> Result<IngredientPlan, Vec<RowError>> {
    let mut errors = Vec::new();

    let name = non_blank(row, "Name").unwrap_or_default();
    if name.is_empty() {
        errors.push(RowError::MissingName);
    }

    let unit = non_blank(row, "Unit").unwrap_or_else(|| DEFAULT_UNIT.to_string());
    let unit_id = match tables::unit_id(&unit) {
        Some(id) => id,
        None => {
            errors.push(RowError::UnknownUnit(unit));
            ""
        }
    };

    let mut nutrients = Vec::new();
    for column in row.keys() {
        if RESERVED_COLUMNS.contains(&column) {
            continue;
        }
        match tables::nutrient_id(column) {
            Some(id) => {
                if let Some(value) = non_blank(row, column) {
                    nutrients.push((id, value));
                }
            }
            None => errors.push(RowError::UnknownColumn(column.to_string())),
        }
    }

    let authority = match non_blank(row, "Authority") {
        None => Some(Authority::default()),
        Some(raw) => {
            let parsed = Authority::parse(&raw);
            if parsed.is_none() {
                errors.push(RowError::UnknownAuthority(raw));
            }
            parsed
        }
    };
    let (contains, may_contain) = match authority {
        Some(a) => (
            resolve_allergens(row, "Contains Allergens", allergens, a, &mut errors),
            resolve_allergens(row, "May Contain Allergens", allergens, a, &mut errors),
        ),
        None => (Vec::new(), Vec::new()),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(IngredientPlan {
        name,
        supplier: non_blank(row, "Supplier"),
        aliases: split_list(&row.cell("Alias")),
        weight: non_blank(row, "Weight").unwrap_or_else(|| DEFAULT_WEIGHT.to_string()),
        unit_id,
        nutrients,
        authority: authority.unwrap_or_default(),
        contains,
        may_contain,
        approve: non_blank(row, "Status").map_or(false, |s| s.eq_ignore_ascii_case("approved")),
    })
}

/// What happened to one CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Created { id: String, approved: bool },
    /// Validation failed; nothing was sent.
    Skipped,
    /// Creating the food failed; later steps were not attempted.
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows: usize,
    pub created: usize,
    pub approved: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ImportSummary {
    fn record(&mut self, outcome: &RowOutcome) {
        self.rows += 1;
        match outcome {
            RowOutcome::Created { approved, .. } => {
                self.created += 1;
                if *approved {
                    self.approved += 1;
                }
            }
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::Failed => self.failed += 1,
        }
    }
}

/// Issues the create/update mutations for validated rows and caches the
/// user-added suppliers (lower-cased name to id) across rows.
pub struct Importer<'a, C: GraphQl> {
    client: &'a C,
    allergens: &'a AllergenTables,
    suppliers: HashMap<String, String>,
}

impl<'a, C: GraphQl> Importer<'a, C> {
    pub fn new(client: &'a C, allergens: &'a AllergenTables) -> Self {
        Importer {
            client,
            allergens,
            suppliers: HashMap::new(),
        }
    }

    /// Fetch existing suppliers. A failed lookup leaves the cache empty,
    /// which only means suppliers are created again by name.
    pub fn load_suppliers(&mut self) {
        let result = match self
            .client
            .execute(queries::GET_USER_SUPPLIERS, json!({"input": {}}))
        {
            Ok(result) => result,
            Err(_) => {
                warn!("Unable to load existing suppliers");
                return;
            }
        };
        for supplier in array_at(&result, &["data", "suppliers", "getUserAdded", "suppliers"]) {
            let name = str_at(supplier, &["name"]);
            let id = str_at(supplier, &["id"]);
            if !name.is_empty() && !id.is_empty() {
                self.suppliers.insert(name.to_lowercase(), id.to_string());
            }
        }
    }

    pub fn known_suppliers(&self) -> usize {
        self.suppliers.len()
    }

    fn supplier_id(&mut self, name: &str) -> Option<String> {
        let key = name.to_lowercase();
        if let Some(id) = self.suppliers.get(&key) {
            return Some(id.clone());
        }
        let result = self
            .client
            .execute(queries::CREATE_SUPPLIER, json!({"input": {"name": name}}))
            .ok()?;
        let id = str_at(&result, &["data", "suppliers", "create", "supplier", "id"]);
        if id.is_empty() {
            error!("Failed to create supplier {}", name);
            return None;
        }
        info!("Created new supplier for {}", name);
        self.suppliers.insert(key, id.to_string());
        Some(id.to_string())
    }

    fn mutate(&self, document: &str, variables: Value, what: &str, name: &str) -> bool {
        match self.client.execute(document, variables) {
            Ok(_) => {
                info!("{} on {}", what, name);
                true
            }
            Err(_) => {
                error!("Failed: {} on {}", what, name);
                false
            }
        }
    }

    /// Create one ingredient and apply every update the plan asks for.
    pub fn import(&mut self, plan: &IngredientPlan) -> RowOutcome {
        let supplier_id = plan.supplier.as_deref().and_then(|s| self.supplier_id(s));

        let created = self.client.execute(
            queries::CREATE_FOOD,
            json!({"input": {"name": plan.name, "foodType": "Ingredient"}}),
        );
        let food_id = match &created {
            Ok(result) => str_at(result, &["data", "foods", "create", "food", "id"]).to_string(),
            Err(_) => String::new(),
        };
        if food_id.is_empty() {
            error!("Failed to create '{}'", plan.name);
            return RowOutcome::Failed;
        }
        info!("Created {} with Ingredient ID {}", plan.name, food_id);

        let nutrient_values: Vec<Value> = plan
            .nutrients
            .iter()
            .map(|(id, value)| json!({"nutrientId": id, "value": value}))
            .collect();
        self.mutate(
            queries::SET_NUTRIENTS_AND_AMOUNT,
            json!({
                "input": {"foodId": food_id, "nutrientValues": nutrient_values},
                "amountInput": {
                    "foodId": food_id,
                    "amount": {"quantity": plan.weight, "unitId": plan.unit_id}
                }
            }),
            "Updated nutrients and weights",
            &plan.name,
        );

        if let Some(supplier_id) = supplier_id {
            self.mutate(
                queries::SET_SUPPLIER,
                json!({"input": {"supplierId": supplier_id, "foodId": food_id}}),
                "Set supplier",
                &plan.name,
            );
        }

        if !plan.aliases.is_empty() {
            let aliases: Vec<Value> = plan
                .aliases
                .iter()
                .map(|a| json!({"languageId": ENGLISH, "name": a}))
                .collect();
            self.mutate(
                queries::SET_ALIASES,
                json!({"input": {"aliases": aliases, "foodId": food_id}}),
                "Updated aliases",
                &plan.name,
            );
        }

        if !plan.contains.is_empty() || !plan.may_contain.is_empty() {
            self.mutate(
                queries::SET_ALLERGENS,
                json!({"input": {
                    "foodId": food_id,
                    "authority": plan.authority.as_str(),
                    "contains": plan.contains,
                    "mayContain": plan.may_contain
                }}),
                "Set allergens",
                &plan.name,
            );
        }

        let mut approved = false;
        if plan.approve {
            let input = json!({"input": {"foodId": food_id}});
            approved = self.mutate(queries::VERIFY_ALLERGENS, input.clone(), "Verified allergens", &plan.name)
                && self.mutate(queries::APPROVE_FOOD, input, "Approved", &plan.name);
        }

        RowOutcome::Created {
            id: food_id,
            approved,
        }
    }

    /// Validate then import one row. Invalid rows are logged and skipped.
    pub fn import_row(&mut self, row: &FlatRow) -> RowOutcome {
        match plan_row(row, self.allergens) {
            Ok(plan) => self.import(&plan),
            Err(errors) => {
                let name = row.cell("Name");
                for e in &errors {
                    error!("Row '{}': {}", name, e);
                }
                warn!("Skipped creation of '{}'!", name);
                RowOutcome::Skipped
            }
        }
    }

    pub fn import_rows(&mut self, rows: &[FlatRow]) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for row in rows {
            let outcome = self.import_row(row);
            summary.record(&outcome);
        }
        summary
    }
}

/// Import every row of the configured input CSV.
pub fn run<C: GraphQl>(client: &C, settings: &Settings) -> Result<ImportSummary> {
    let rows = table::read_table(&settings.files.input_csv)?;
    info!("Read {} rows from {}", rows.len(), settings.files.input_csv.display());

    let mut importer = Importer::new(client, &settings.allergens);
    importer.load_suppliers();
    let summary = importer.import_rows(&rows);
    info!(
        "Import complete: {} created, {} approved, {} skipped, {} failed.",
        summary.created, summary.approved, summary.skipped, summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> FlatRow {
        cells.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn allergens() -> AllergenTables {
        let mut tables = AllergenTables::default();
        tables.eu.insert("Milk".into(), "eu-milk".into());
        tables.canada.insert("Mustard".into(), "ca-mustard".into());
        tables
    }

    fn plan_of(cells: &[(&str, &str)]) -> Result<IngredientPlan, Vec<RowError>> {
        plan_row(&row(cells), &allergens())
    }

    #[test]
    fn defaults_apply_to_missing_columns() {
        let plan = plan_of(&[("Name", "Oats"), ("Protein", "13")]).unwrap();
        assert_eq!(plan.weight, "100");
        assert_eq!(plan.unit_id, tables::GRAM_UNIT_ID);
        assert_eq!(plan.authority, Authority::Us);
        assert_eq!(plan.nutrients.len(), 1);
        assert!(!plan.approve);
    }

    #[test]
    fn unknown_unit_is_named() {
        let errors = plan_of(&[("Name", "Rock"), ("Unit", "Stone")]).unwrap_err();
        assert_eq!(errors, vec![RowError::UnknownUnit("Stone".into())]);
        assert!(errors[0].to_string().contains("Stone"));
    }

    #[test]
    fn every_problem_is_reported() {
        let errors = plan_of(&[
            ("Name", ""),
            ("Flavour", "9"),
            ("Authority", "eu"),
            ("Contains Allergens", "Milk, Kryptonite"),
        ])
        .unwrap_err();
        assert!(errors.contains(&RowError::MissingName));
        assert!(errors.contains(&RowError::UnknownColumn("Flavour".into())));
        assert!(errors.iter().any(|e| matches!(e, RowError::UnknownAllergen { allergen, .. } if allergen == "Kryptonite")));
    }

    #[test]
    fn blank_header_is_an_unknown_column() {
        let errors = plan_of(&[("Name", "Oats"), ("Protein", "13"), ("", "")]).unwrap_err();
        assert_eq!(errors, vec![RowError::UnknownColumn("".into())]);
    }

    #[test]
    fn region_without_configured_allergens_knows_none() {
        let errors = plan_of(&[("Name", "Yogurt"), ("Contains Allergens", "Milk")]).unwrap_err();
        assert!(matches!(
            &errors[..],
            [RowError::UnknownAllergen { allergen, authority, .. }] if allergen == "Milk" && authority == "us"
        ));
        let plan = plan_of(&[("Name", "Yogurt"), ("Authority", "EU"), ("Contains Allergens", "milk")]).unwrap();
        assert_eq!(plan.contains, vec!["eu-milk"]);
    }

    #[test]
    fn unknown_authority_skips_allergen_lookup() {
        let errors = plan_of(&[
            ("Name", "x"),
            ("Authority", "atlantis"),
            ("Contains Allergens", "Milk"),
        ])
        .unwrap_err();
        assert_eq!(errors, vec![RowError::UnknownAuthority("atlantis".into())]);
    }

    #[test]
    fn lists_statuses_and_blank_nutrients() {
        let plan = plan_of(&[
            ("Name", "Cheese"),
            ("Alias", "cheddar, , aged cheddar"),
            ("Authority", "Canada"),
            ("May Contain Allergens", "mustard"),
            ("Status", "Approved"),
            ("Calories", ""),
            ("Fat", "33"),
        ])
        .unwrap();
        assert_eq!(plan.aliases, vec!["cheddar", "aged cheddar"]);
        assert_eq!(plan.authority, Authority::Canada);
        assert_eq!(plan.may_contain, vec!["ca-mustard"]);
        assert!(plan.approve);
        assert_eq!(plan.nutrients, vec![("84a8709a-0011-0000-ebf9-90cea7d9d44f", "33".to_string())]);
    }
}
