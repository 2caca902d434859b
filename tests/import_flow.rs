mod common;

use common::{capture_logs, server_error, settings_in, FakeApi};
use genesis_cli::config::AllergenTables;
use genesis_cli::flatten::FlatRow;
use genesis_cli::import::{self, Importer, RowOutcome};
use genesis_cli::queries;
use serde_json::json;

fn row(cells: &[(&str, &str)]) -> FlatRow {
    cells.iter().map(|(k, v)| (*k, *v)).collect()
}

fn us_allergens() -> AllergenTables {
    let mut tables = AllergenTables::default();
    tables.us.insert("Milk".into(), "us-milk".into());
    tables
}

/// Creates foods named after their input and knows one supplier, "Acme".
fn import_api() -> FakeApi {
    FakeApi::new(|document, variables| {
        if document == queries::GET_USER_SUPPLIERS {
            return Ok(json!({"data": {"suppliers": {"getUserAdded": {"suppliers": [
                {"id": "s-acme", "name": "Acme"}
            ]}}}}));
        }
        if document == queries::CREATE_SUPPLIER {
            let name = variables["input"]["name"].as_str().unwrap_or("");
            return Ok(json!({"data": {"suppliers": {"create": {"supplier": {"id": format!("s-{}", name)}}}}}));
        }
        if document == queries::CREATE_FOOD {
            let name = variables["input"]["name"].as_str().unwrap_or("");
            if name == "Broken" {
                return Err(server_error());
            }
            return Ok(json!({"data": {"foods": {"create": {"food": {"id": format!("id-{}", name)}}}}}));
        }
        Ok(json!({}))
    })
}

#[test]
fn unknown_unit_skips_the_row_and_names_the_unit() {
    let api = import_api();
    let tables = us_allergens();
    let rows = vec![
        row(&[("Name", "Rock Salt"), ("Unit", "Stone"), ("Sodium", "38000")]),
        row(&[("Name", "Sugar"), ("Unit", "Kilogram"), ("Calories", "387")]),
    ];

    let (summary, logs) = capture_logs(|| Importer::new(&api, &tables).import_rows(&rows));

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.created, 1);
    let creates = api.variables_for(queries::CREATE_FOOD);
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0]["input"]["name"], "Sugar");
    assert!(logs.contains("unable to find unit 'Stone'"), "logs were: {}", logs);
}

#[test]
fn unknown_column_issues_no_calls() {
    let api = import_api();
    let tables = us_allergens();
    let outcome = Importer::new(&api, &tables).import_row(&row(&[("Name", "Mystery"), ("Sparkle", "3")]));
    assert_eq!(outcome, RowOutcome::Skipped);
    assert!(api.calls().is_empty());
}

#[test]
fn approved_status_adds_verify_then_approve() {
    let api = import_api();
    let tables = us_allergens();
    let outcome = Importer::new(&api, &tables).import_row(&row(&[
        ("Name", "Honey"),
        ("Status", "approved"),
        ("Calories", "304"),
    ]));

    assert_eq!(
        outcome,
        RowOutcome::Created {
            id: "id-Honey".into(),
            approved: true
        }
    );
    let documents: Vec<String> = api.calls().into_iter().map(|(d, _)| d).collect();
    assert_eq!(
        documents,
        vec![
            queries::CREATE_FOOD.to_string(),
            queries::SET_NUTRIENTS_AND_AMOUNT.to_string(),
            queries::VERIFY_ALLERGENS.to_string(),
            queries::APPROVE_FOOD.to_string(),
        ]
    );
    assert_eq!(api.variables_for(queries::APPROVE_FOOD)[0]["input"]["foodId"], "id-Honey");
}

#[test]
fn unapproved_row_makes_no_approval_calls() {
    let api = import_api();
    let tables = us_allergens();
    Importer::new(&api, &tables).import_row(&row(&[("Name", "Honey"), ("Status", "draft")]));
    assert_eq!(api.count(queries::VERIFY_ALLERGENS), 0);
    assert_eq!(api.count(queries::APPROVE_FOOD), 0);
}

#[test]
fn full_row_sets_supplier_aliases_and_allergens() {
    let api = import_api();
    let tables = us_allergens();
    let mut importer = Importer::new(&api, &tables);
    importer.load_suppliers();
    assert_eq!(importer.known_suppliers(), 1);

    importer.import_row(&row(&[
        ("Name", "Cheddar"),
        ("Supplier", "ACME"),
        ("Weight", "1"),
        ("Unit", "Pound"),
        ("Alias", "Sharp Cheddar, Aged Cheddar"),
        ("Contains Allergens", "Milk"),
        ("Fat", "33.1"),
    ]));

    assert_eq!(api.count(queries::CREATE_SUPPLIER), 0);
    let supplier = &api.variables_for(queries::SET_SUPPLIER)[0];
    assert_eq!(supplier["input"]["supplierId"], "s-acme");

    let update = &api.variables_for(queries::SET_NUTRIENTS_AND_AMOUNT)[0];
    assert_eq!(update["amountInput"]["amount"]["quantity"], "1");
    assert_eq!(update["amountInput"]["amount"]["unitId"], "a7df0af5-0007-0000-7484-751e8eaf05c6");
    assert_eq!(update["input"]["nutrientValues"][0]["value"], "33.1");

    let aliases = &api.variables_for(queries::SET_ALIASES)[0];
    assert_eq!(aliases["input"]["aliases"][1]["name"], "Aged Cheddar");

    let allergens = &api.variables_for(queries::SET_ALLERGENS)[0];
    assert_eq!(allergens["input"]["authority"], "us");
    assert_eq!(allergens["input"]["contains"], json!(["us-milk"]));
}

#[test]
fn new_supplier_is_created_once() {
    let api = import_api();
    let tables = us_allergens();
    let mut importer = Importer::new(&api, &tables);
    importer.import_rows(&[
        row(&[("Name", "Rye"), ("Supplier", "Mill Co")]),
        row(&[("Name", "Spelt"), ("Supplier", "mill co")]),
    ]);
    assert_eq!(api.count(queries::CREATE_SUPPLIER), 1);
    assert_eq!(api.count(queries::SET_SUPPLIER), 2);
}

#[test]
fn failed_create_continues_with_next_row() {
    let api = import_api();
    let tables = us_allergens();
    let summary = Importer::new(&api, &tables).import_rows(&[
        row(&[("Name", "Broken"), ("Status", "approved")]),
        row(&[("Name", "Fine")]),
    ]);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.created, 1);
    assert_eq!(api.count(queries::CREATE_FOOD), 2);
    assert_eq!(api.count(queries::SET_NUTRIENTS_AND_AMOUNT), 1);
    assert_eq!(api.count(queries::APPROVE_FOOD), 0);
}

#[test]
fn run_reads_the_configured_csv() {
    let api = import_api();
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings_in(dir.path());
    settings.allergens = us_allergens();
    std::fs::write(
        &settings.files.input_csv,
        "\u{feff}Name,Supplier,Calories,Unit,Contains Allergens\nOats,Acme,389,Gram,\nPebbles,,1,Stone,\nMilk Powder,,496,Gram,Milk\n",
    )
    .unwrap();

    let summary = import::run(&api, &settings).unwrap();
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.created, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(api.variables_for(queries::SET_ALLERGENS)[0]["input"]["contains"], json!(["us-milk"]));
    assert_eq!(api.calls()[0].0, queries::GET_USER_SUPPLIERS);
}
