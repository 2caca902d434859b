// Settings loaded once at startup from `config.ini` and handed to the client
// and the orchestrators by reference.

use crate::tables::Authority;
use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Default location of the INI file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.ini";

/// Kind of food the search-based flows operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum FoodType {
    #[default]
    Ingredient,
    Recipe,
}

impl FoodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodType::Ingredient => "Ingredient",
            FoodType::Recipe => "Recipe",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub output_file: PathBuf,
    pub output_csv: PathBuf,
    pub input_csv: PathBuf,
    pub recipe_analysis_csv: PathBuf,
    pub ingredients_csv: PathBuf,
    pub recipe_items_csv: PathBuf,
}

impl Default for FileSettings {
    fn default() -> Self {
        FileSettings {
            output_file: "output.json".into(),
            output_csv: "output.csv".into(),
            input_csv: "input.csv".into(),
            recipe_analysis_csv: "recipe_analysis.csv".into(),
            ingredients_csv: "ingredients.csv".into(),
            recipe_items_csv: "recipe_items.csv".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    pub food_type: FoodType,
    pub limit: u32,
    /// Comma separated nutrient names kept in exports. Blank keeps all.
    pub nutrients: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            food_type: FoodType::Ingredient,
            limit: 10000,
            nutrients: None,
        }
    }
}

impl Options {
    /// Inclusion set for nutrient columns, or `None` when every nutrient is
    /// exported.
    pub fn nutrient_filter(&self) -> Option<HashSet<String>> {
        let raw = self.nutrients.as_deref()?;
        let set: HashSet<String> = raw
            .split(',')
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        if set.is_empty() {
            None
        } else {
            Some(set)
        }
    }
}

/// Allergen name to id, one `[allergens.<authority>]` section per region.
/// The ids belong to the account's allergen catalog, so none are built in;
/// a region without a section knows no allergens.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AllergenTables {
    pub us: HashMap<String, String>,
    pub canada: HashMap<String, String>,
    pub eu: HashMap<String, String>,
    pub mexico: HashMap<String, String>,
}

impl AllergenTables {
    fn table(&self, authority: Authority) -> &HashMap<String, String> {
        match authority {
            Authority::Us => &self.us,
            Authority::Canada => &self.canada,
            Authority::Eu => &self.eu,
            Authority::Mexico => &self.mexico,
        }
    }

    /// Case-insensitive lookup within one region's table.
    pub fn allergen_id(&self, authority: Authority, name: &str) -> Option<&str> {
        let wanted = name.trim();
        self.table(authority)
            .iter()
            .find(|(n, _)| n.trim().eq_ignore_ascii_case(wanted))
            .map(|(_, id)| id.trim())
            .filter(|id| !id.is_empty())
    }
}

/// All recognised configuration sections.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub files: FileSettings,
    #[serde(default)]
    pub options: Options,
    #[serde(default)]
    pub allergens: AllergenTables,
}

impl Settings {
    /// Read the INI file named by `GENESIS_CONFIG`, falling back to
    /// `config.ini`. `GENESIS__SECTION__KEY` variables override the file.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var("GENESIS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::load(Path::new(&path))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini))
            .add_source(Environment::with_prefix("GENESIS").separator("__"))
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;
        Self::from_config(cfg)
    }

    /// Parse settings from INI text without touching the environment.
    pub fn from_ini_str(text: &str) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::from_str(text, FileFormat::Ini))
            .build()
            .context("Failed to parse configuration")?;
        Self::from_config(cfg)
    }

    fn from_config(cfg: Config) -> Result<Self> {
        let settings: Settings = cfg
            .try_deserialize()
            .context("Invalid configuration values")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.api.endpoint.trim().is_empty() {
            bail!("api.endpoint must not be empty");
        }
        if self.api.api_key.trim().is_empty() {
            bail!("api.api_key must not be empty");
        }
        Ok(())
    }
}
