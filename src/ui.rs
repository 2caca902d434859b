// UI layer: interactive menu built on `dialoguer`. The prompt loops only
// read text; `prompt` decides whether an answer is valid.

use crate::api::ApiClient;
use crate::config::Settings;
use crate::export::{self, ExportKind, ExportRequest, EXPORT_MENU};
use crate::labels::{self, regulations_for_choice, Regulation, LABEL_MENU};
use crate::prompt::{parse_date, parse_date_range, parse_menu_choice, parse_tags, DateRange};
use crate::{download, import};
use anyhow::Result;
use chrono::Local;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::error;

/// Main interactive menu. Runs one flow per selection until "Exit".
pub fn main_menu(api: &ApiClient, settings: &Settings) -> Result<()> {
    loop {
        let items = vec![
            "Bulk create labels",
            "Export foods to CSV",
            "Import ingredients from CSV",
            "Download search results",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        // A failed flow is reported and the menu shown again.
        let outcome = match selection {
            0 => handle_labels(api, settings),
            1 => handle_export(api, settings),
            2 => handle_import(api, settings),
            3 => handle_download(api, settings),
            _ => break,
        };
        if let Err(e) = outcome {
            error!("{:#}", e);
            println!("Failed: {:#}", e);
        }
    }
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Print a numbered menu and read a choice until it is in range.
fn numbered_choice(title: &str, options: &[&str]) -> Result<usize> {
    println!("{}", title);
    for (i, option) in options.iter().enumerate() {
        println!("{}. {}", i + 1, option);
    }
    let max = options.len();
    let answer: String = Input::new()
        .with_prompt(format!("Enter your choice (1-{})", max))
        .validate_with(|input: &String| -> Result<(), String> {
            parse_menu_choice(input, max).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok(parse_menu_choice(&answer, max)?)
}

fn ask_label_types(total: i64, settings: &Settings) -> Result<Vec<Regulation>> {
    println!("\nFound {} {} items.", total, settings.options.food_type.as_str());
    let choice = numbered_choice("Available label types:", &LABEL_MENU)?;
    Ok(regulations_for_choice(choice))
}

fn ask_tags() -> Result<Vec<String>> {
    let answer: String = Input::new()
        .with_prompt("Filter by tags (comma separated, blank for none)")
        .allow_empty(true)
        .interact_text()?;
    Ok(parse_tags(&answer))
}

fn ask_date(prompt: &str) -> Result<String> {
    let answer: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            parse_date(input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok(answer)
}

fn ask_date_range() -> Result<DateRange> {
    loop {
        let start = ask_date("Modified on or after (YYYY-MM-DD, blank for any)")?;
        let end = ask_date("Modified on or before (YYYY-MM-DD, blank for any)")?;
        match parse_date_range(&start, &end) {
            Ok(range) => return Ok(range),
            Err(e) => println!("{}", e),
        }
    }
}

fn handle_labels(api: &ApiClient, settings: &Settings) -> Result<()> {
    let today = Local::now().date_naive();
    let summary = labels::run(api, settings, today, |total| ask_label_types(total, settings))?;
    println!(
        "Created {} labels for {} foods ({} failures).",
        summary.labels_created, summary.foods, summary.failures
    );
    Ok(())
}

fn handle_export(api: &ApiClient, settings: &Settings) -> Result<()> {
    let kind = ExportKind::from_choice(numbered_choice("What should be exported?", &EXPORT_MENU)?);
    let request = ExportRequest {
        kind,
        tags: ask_tags()?,
        modified: ask_date_range()?,
    };
    let progress = spinner("Exporting...");
    let outcome = export::run(api, settings, &request);
    progress.finish_and_clear();
    let summary = outcome?;
    println!("Exported {} rows to {}", summary.rows, summary.csv.display());
    Ok(())
}

fn handle_import(api: &ApiClient, settings: &Settings) -> Result<()> {
    let progress = spinner("Importing...");
    let outcome = import::run(api, settings);
    progress.finish_and_clear();
    let summary = outcome?;
    println!(
        "Processed {} rows: {} created, {} approved, {} skipped, {} failed.",
        summary.rows, summary.created, summary.approved, summary.skipped, summary.failed
    );
    Ok(())
}

fn handle_download(api: &ApiClient, settings: &Settings) -> Result<()> {
    let progress = spinner("Downloading...");
    let outcome = download::run(api, settings);
    progress.finish_and_clear();
    let summary = outcome?;
    match summary.csv {
        Some(csv) => println!("Downloaded {} results to {} and {}", summary.total, summary.json.display(), csv.display()),
        None => println!("No results found."),
    }
    Ok(())
}
