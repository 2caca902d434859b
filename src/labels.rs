// Bulk label creation: one label per food and selected regulation, each
// followed by a call that attaches the food to the new label.

use crate::api::GraphQl;
use crate::config::Settings;
use crate::json::str_at;
use crate::queries;
use crate::search::{self, SearchFilter};
use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tracing::{error, info, warn};

/// Regulatory label formats supported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regulation {
    Us2016,
    Ca2016,
    Eu2011,
    Mx2020,
}

pub const ALL_REGULATIONS: [Regulation; 4] = [
    Regulation::Us2016,
    Regulation::Ca2016,
    Regulation::Eu2011,
    Regulation::Mx2020,
];

/// Menu shown to the operator, numbered from 1.
pub const LABEL_MENU: [&str; 5] = ["US 2016", "CA 2016", "EU 2011", "MX 2020", "All label types"];

/// Regulations for a 1-based menu choice.
pub fn regulations_for_choice(choice: usize) -> Vec<Regulation> {
    match choice {
        1..=4 => vec![ALL_REGULATIONS[choice - 1]],
        _ => ALL_REGULATIONS.to_vec(),
    }
}

impl Regulation {
    pub fn display_name(&self) -> &'static str {
        match self {
            Regulation::Us2016 => "US 2016",
            Regulation::Ca2016 => "CA 2016",
            Regulation::Eu2011 => "EU 2011",
            Regulation::Mx2020 => "MX 2020",
        }
    }

    /// Field under `label` that the mutations for this regulation live in.
    fn namespace(&self) -> &'static str {
        match self {
            Regulation::Us2016 => "unitedStates2016",
            Regulation::Ca2016 => "canada2016",
            Regulation::Eu2011 => "europeanUnion2011",
            Regulation::Mx2020 => "mexico2020",
        }
    }

    pub fn create_document(&self) -> &'static str {
        match self {
            Regulation::Us2016 => queries::CREATE_US2016_LABEL,
            Regulation::Ca2016 => queries::CREATE_CA2016_LABEL,
            Regulation::Eu2011 => queries::CREATE_EU2011_LABEL,
            Regulation::Mx2020 => queries::CREATE_MX2020_LABEL,
        }
    }

    pub fn set_items_document(&self) -> &'static str {
        match self {
            Regulation::Us2016 => queries::SET_US2016_LABEL_ITEMS,
            Regulation::Ca2016 => queries::SET_CA2016_LABEL_ITEMS,
            Regulation::Eu2011 => queries::SET_EU2011_LABEL_ITEM,
            Regulation::Mx2020 => queries::SET_MX2020_LABEL_ITEM,
        }
    }

    /// US and CA accept a list of foods; EU and MX a single food.
    fn takes_item_list(&self) -> bool {
        matches!(self, Regulation::Us2016 | Regulation::Ca2016)
    }

    fn set_items_field(&self) -> &'static str {
        if self.takes_item_list() {
            "setLabelItems"
        } else {
            "setLabelItem"
        }
    }

    pub fn label_name(&self, food_name: &str, date: NaiveDate) -> String {
        format!(
            "{} - {} - Generated on {}",
            food_name,
            self.display_name(),
            date.format("%Y-%m-%d")
        )
    }

    pub fn create_variables(&self, food_name: &str, date: NaiveDate) -> Value {
        let name = self.label_name(food_name, date);
        match self {
            Regulation::Us2016 => json!({"input": {
                "name": name,
                "labelStyle": "StandardVertical",
                "recommendationProfile": "Adult"
            }}),
            Regulation::Ca2016 | Regulation::Mx2020 => json!({"input": {
                "name": name,
                "labelStyle": "StandardVertical"
            }}),
            Regulation::Eu2011 => json!({"input": {"name": name}}),
        }
    }

    pub fn set_items_variables(&self, food_id: &str, label_id: &str) -> Value {
        if self.takes_item_list() {
            json!({"input": {"foodIds": [food_id], "labelId": label_id}})
        } else {
            json!({"input": {"foodId": food_id, "labelId": label_id}})
        }
    }

    /// Id of the created label, empty when the response has none.
    pub fn created_label_id<'a>(&self, response: &'a Value) -> &'a str {
        str_at(response, &["data", "label", self.namespace(), "create", "label", "id"])
    }

    pub fn attached_label_id<'a>(&self, response: &'a Value) -> &'a str {
        str_at(
            response,
            &["data", "label", self.namespace(), self.set_items_field(), "label", "id"],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSummary {
    pub foods: usize,
    pub labels_created: usize,
    pub items_set: usize,
    pub failures: usize,
}

/// Create a label for every food and regulation. A failed creation skips
/// the attach call for that pair only; the run continues.
pub fn create_labels<C: GraphQl>(
    client: &C,
    foods: &[Value],
    regulations: &[Regulation],
    date: NaiveDate,
) -> LabelSummary {
    let mut summary = LabelSummary {
        foods: foods.len(),
        ..Default::default()
    };
    for food in foods {
        let food_name = str_at(food, &["name"]);
        let food_id = str_at(food, &["id"]);
        for regulation in regulations {
            let created = client.execute(
                regulation.create_document(),
                regulation.create_variables(food_name, date),
            );
            let label_id = match &created {
                Ok(response) => regulation.created_label_id(response),
                Err(_) => "",
            };
            if label_id.is_empty() {
                error!(
                    "Failed to create {} label for {}",
                    regulation.display_name(),
                    food_name
                );
                summary.failures += 1;
                continue;
            }
            summary.labels_created += 1;

            match client.execute(
                regulation.set_items_document(),
                regulation.set_items_variables(food_id, label_id),
            ) {
                Ok(response) => {
                    if regulation.attached_label_id(&response).is_empty() {
                        warn!("No label returned when attaching {} to label {}", food_id, label_id);
                    }
                    summary.items_set += 1;
                }
                Err(_) => {
                    error!(
                        "Failed to add recipe to {} label for {}",
                        regulation.display_name(),
                        food_id
                    );
                    summary.failures += 1;
                }
            }
        }
    }
    summary
}

/// Search for foods of the configured type, ask which regulations to use,
/// then create the labels. No search result ends the run before any
/// label is created.
pub fn run<C, F>(client: &C, settings: &Settings, date: NaiveDate, choose: F) -> Result<LabelSummary>
where
    C: GraphQl,
    F: FnOnce(i64) -> Result<Vec<Regulation>>,
{
    info!("Starting bulk create label process...");
    let food_type = settings.options.food_type.as_str();
    let filter = SearchFilter::new(settings.options.food_type, settings.options.limit);
    let result = match search::search(client, &filter) {
        Ok(result) => result,
        Err(_) => bail!("No results found. Exiting."),
    };

    let total = search::total_count(&result);
    let foods = search::food_results(&result);
    if foods.is_empty() {
        bail!("No {} items found. Exiting.", food_type);
    }
    info!("Found {} {} items to process.", total, food_type);

    let regulations = choose(total)?;
    let names: Vec<&str> = regulations.iter().map(|r| r.display_name()).collect();
    info!("Selected label types: {}", names.join(", "));

    let summary = create_labels(client, foods, &regulations, date);
    info!(
        "Bulk create label process completed: {} labels created, {} failures.",
        summary.labels_created, summary.failures
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn menu_choices_map_to_regulations() {
        assert_eq!(regulations_for_choice(3), vec![Regulation::Eu2011]);
        assert_eq!(regulations_for_choice(5).len(), 4);
    }

    #[test]
    fn label_names_carry_regulation_and_date() {
        assert_eq!(
            Regulation::Mx2020.label_name("Granola", day()),
            "Granola - MX 2020 - Generated on 2024-03-09"
        );
    }

    #[test]
    fn create_inputs_differ_per_regulation() {
        let us = Regulation::Us2016.create_variables("x", day());
        assert_eq!(us["input"]["recommendationProfile"], "Adult");
        let eu = Regulation::Eu2011.create_variables("x", day());
        assert!(eu["input"].get("labelStyle").is_none());
        let mx = Regulation::Mx2020.create_variables("x", day());
        assert_eq!(mx["input"]["labelStyle"], "StandardVertical");
    }

    #[test]
    fn set_items_shape() {
        let ca = Regulation::Ca2016.set_items_variables("f", "l");
        assert_eq!(ca["input"]["foodIds"], json!(["f"]));
        let eu = Regulation::Eu2011.set_items_variables("f", "l");
        assert_eq!(eu["input"]["foodId"], "f");
    }

    #[test]
    fn response_ids_are_read_per_namespace() {
        let response = json!({"data": {"label": {"canada2016": {"create": {"label": {"id": "L1"}}}}}});
        assert_eq!(Regulation::Ca2016.created_label_id(&response), "L1");
        assert_eq!(Regulation::Us2016.created_label_id(&response), "");
        let attached = json!({"data": {"label": {"mexico2020": {"setLabelItem": {"label": {"id": "L2"}}}}}});
        assert_eq!(Regulation::Mx2020.attached_label_id(&attached), "L2");
    }
}
