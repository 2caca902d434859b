// Raw search download: the search response goes to the JSON output file and
// its result list, unenriched, to a CSV next to it.

use crate::api::GraphQl;
use crate::config::Settings;
use crate::flatten::flatten_all;
use crate::search::{self, SearchFilter, Versions};
use crate::table::{self, JsonArrayWriter};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSummary {
    pub total: i64,
    pub json: PathBuf,
    /// `None` when the search returned nothing and no CSV was written.
    pub csv: Option<PathBuf>,
}

/// `foo.json` becomes `foo.csv`; other names get `.csv` appended.
pub fn csv_path_for(json: &Path) -> PathBuf {
    match json.extension() {
        Some(ext) if ext == "json" => json.with_extension("csv"),
        _ => {
            let mut name = json.as_os_str().to_owned();
            name.push(".csv");
            PathBuf::from(name)
        }
    }
}

/// Every version of every customer item, archived ones included. The JSON
/// file is always left as a complete array, even when the search fails.
pub fn run<C: GraphQl>(client: &C, settings: &Settings) -> Result<DownloadSummary> {
    let json_path = settings.files.output_file.clone();
    let mut out = JsonArrayWriter::create(&json_path)?;

    let mut filter = SearchFilter::new(settings.options.food_type, settings.options.limit);
    filter.versions = Versions::All;
    let result = match search::search(client, &filter) {
        Ok(result) => result,
        Err(failure) => {
            out.finish()?;
            return Err(failure).context("Search request failed");
        }
    };

    let total = search::total_count(&result);
    let foods = search::food_results(&result);
    if total > 0 && !foods.is_empty() {
        out.append(&result)?;
    } else {
        info!("No results found. Skipping write.");
    }
    out.finish()?;

    let csv = if foods.is_empty() {
        None
    } else {
        let path = csv_path_for(&json_path);
        table::write_table(&flatten_all(foods), &path)?;
        Some(path)
    };
    info!("Complete. Exported results to {}", json_path.display());
    Ok(DownloadSummary {
        total,
        json: json_path,
        csv,
    })
}
