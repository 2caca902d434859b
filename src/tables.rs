// Fixed lookup tables used to translate CSV import columns into API ids.

/// Language id used for aliases created by the import.
pub const ENGLISH: &str = "973847da-8760-4b54-9981-a596640a4659";

/// Unit id used when requesting a 100 g net analysis.
pub const GRAM_UNIT_ID: &str = "a7df0af5-0008-0000-7484-751e8eaf05c6";

pub const UNITS: &[(&str, &str)] = &[
    ("Gram", GRAM_UNIT_ID),
    ("Pound", "a7df0af5-0007-0000-7484-751e8eaf05c6"),
    ("Kilogram", "a7df0af5-0009-0000-7484-751e8eaf05c6"),
    ("Ounce-weight", "a7df0af5-0006-0000-7484-751e8eaf05c6"),
];

pub const NUTRIENTS: &[(&str, &str)] = &[
    ("Calories", "84a8709a-0000-0000-ebf9-90cea7d9d44f"),
    ("Protein", "84a8709a-0001-0000-ebf9-90cea7d9d44f"),
    ("Carbohydrates", "84a8709a-0002-0000-ebf9-90cea7d9d44f"),
    ("Total Dietary Fiber", "84a8709a-0003-0000-ebf9-90cea7d9d44f"),
    ("Total Soluble Fiber", "84a8709a-0004-0000-ebf9-90cea7d9d44f"),
    ("Total Sugars", "84a8709a-0006-0000-ebf9-90cea7d9d44f"),
    ("Monosaccharides", "84a8709a-0007-0000-ebf9-90cea7d9d44f"),
    ("Disaccharides", "84a8709a-000b-0000-ebf9-90cea7d9d44f"),
    ("Other Carbohydrate", "84a8709a-0010-0000-ebf9-90cea7d9d44f"),
    ("Fat", "84a8709a-0011-0000-ebf9-90cea7d9d44f"),
    ("Saturated Fat", "84a8709a-0012-0000-ebf9-90cea7d9d44f"),
    ("Monounsaturated Fat", "84a8709a-0013-0000-ebf9-90cea7d9d44f"),
    ("Polyunsaturated Fat", "84a8709a-0014-0000-ebf9-90cea7d9d44f"),
    ("Trans Fat", "84a8709a-0015-0000-ebf9-90cea7d9d44f"),
    ("Cholesterol", "84a8709a-0016-0000-ebf9-90cea7d9d44f"),
    ("Water", "84a8709a-0017-0000-ebf9-90cea7d9d44f"),
    ("Vitamin A - IU", "84a8709a-0019-0000-ebf9-90cea7d9d44f"),
    ("Carotenoid RE", "84a8709a-001b-0000-ebf9-90cea7d9d44f"),
    ("Retinol RE", "84a8709a-001c-0000-ebf9-90cea7d9d44f"),
    ("Beta-Carotene", "84a8709a-001d-0000-ebf9-90cea7d9d44f"),
    ("Vitamin B1 - Thiamin", "84a8709a-001e-0000-ebf9-90cea7d9d44f"),
    ("Vitamin B2 - Riboflavin", "84a8709a-001f-0000-ebf9-90cea7d9d44f"),
    ("Vitamin B3 - Niacin", "84a8709a-0020-0000-ebf9-90cea7d9d44f"),
    ("Vitamin B6", "84a8709a-0022-0000-ebf9-90cea7d9d44f"),
    ("Vitamin B12", "84a8709a-0023-0000-ebf9-90cea7d9d44f"),
    ("Biotin", "84a8709a-0024-0000-ebf9-90cea7d9d44f"),
    ("Vitamin C", "84a8709a-0025-0000-ebf9-90cea7d9d44f"),
    ("Vitamin D - IU", "84a8709a-0026-0000-ebf9-90cea7d9d44f"),
    ("Vitamin D", "84a8709a-0027-0000-ebf9-90cea7d9d44f"),
    ("Folate", "84a8709a-002b-0000-ebf9-90cea7d9d44f"),
    ("Vitamin K", "84a8709a-002c-0000-ebf9-90cea7d9d44f"),
    ("Pantothenic Acid", "84a8709a-002d-0000-ebf9-90cea7d9d44f"),
    ("Calcium", "84a8709a-002f-0000-ebf9-90cea7d9d44f"),
    ("Chromium", "84a8709a-0031-0000-ebf9-90cea7d9d44f"),
    ("Copper", "84a8709a-0032-0000-ebf9-90cea7d9d44f"),
    ("Fluoride", "84a8709a-0033-0000-ebf9-90cea7d9d44f"),
    ("Iodine", "84a8709a-0034-0000-ebf9-90cea7d9d44f"),
    ("Iron", "84a8709a-0035-0000-ebf9-90cea7d9d44f"),
    ("Magnesium", "84a8709a-0036-0000-ebf9-90cea7d9d44f"),
    ("Manganese", "84a8709a-0037-0000-ebf9-90cea7d9d44f"),
    ("Molybdenum", "84a8709a-0038-0000-ebf9-90cea7d9d44f"),
    ("Phosphorus", "84a8709a-0039-0000-ebf9-90cea7d9d44f"),
    ("Potassium", "84a8709a-003a-0000-ebf9-90cea7d9d44f"),
    ("Selenium", "84a8709a-003b-0000-ebf9-90cea7d9d44f"),
    ("Sodium", "84a8709a-003c-0000-ebf9-90cea7d9d44f"),
    ("Zinc", "84a8709a-003d-0000-ebf9-90cea7d9d44f"),
    ("Omega 3", "84a8709a-005b-0000-ebf9-90cea7d9d44f"),
    ("Omega 6", "84a8709a-005c-0000-ebf9-90cea7d9d44f"),
    ("Alcohol", "84a8709a-006f-0000-ebf9-90cea7d9d44f"),
    ("Caffeine", "84a8709a-0070-0000-ebf9-90cea7d9d44f"),
    ("Choline", "84a8709a-007f-0000-ebf9-90cea7d9d44f"),
    ("Kilojoules", "84a8709a-0081-0000-ebf9-90cea7d9d44f"),
    ("Vitamin E - Alpha Toco", "84a8709a-0087-0000-ebf9-90cea7d9d44f"),
    ("Added Sugar", "84a8709a-0094-0000-ebf9-90cea7d9d44f"),
    ("Folate DFE", "84a8709a-00b7-0000-ebf9-90cea7d9d44f"),
    ("Vitamin A - RAE", "84a8709a-00c6-0000-ebf9-90cea7d9d44f"),
    ("Salt", "84a8709a-00cf-0000-ebf9-90cea7d9d44f"),
    ("Dietary Fiber (US 2016)", "84a8709a-00d0-0000-ebf9-90cea7d9d44f"),
    ("Soluble Dietary Fiber (US 2016)", "84a8709a-00d1-0000-ebf9-90cea7d9d44f"),
    ("Calories from Fat", "84a8709a-03ec-0000-ebf9-90cea7d9d44f"),
    ("Calories from SatFat", "84a8709a-03ed-0000-ebf9-90cea7d9d44f"),
    ("Calories from TransFat", "84a8709a-03f7-0000-ebf9-90cea7d9d44f"),
    ("Vitamin A - RE", "30f21f68-ddba-4a1f-8020-b02d7839ede5"),
];

/// Regulatory region whose allergen table an import row is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Authority {
    #[default]
    Us,
    Canada,
    Eu,
    Mexico,
}

impl Authority {
    /// Accepts the region names operators put in the `Authority` column.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "us" | "usa" | "united states" => Some(Authority::Us),
            "ca" | "canada" => Some(Authority::Canada),
            "eu" | "european union" => Some(Authority::Eu),
            "mx" | "mexico" => Some(Authority::Mexico),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Authority::Us => "us",
            Authority::Canada => "canada",
            Authority::Eu => "eu",
            Authority::Mexico => "mexico",
        }
    }
}

/// Exact-match lookup, units are case sensitive like the column values.
pub fn unit_id(name: &str) -> Option<&'static str> {
    UNITS.iter().find(|(n, _)| *n == name).map(|(_, id)| *id)
}

pub fn nutrient_id(name: &str) -> Option<&'static str> {
    NUTRIENTS.iter().find(|(n, _)| *n == name).map(|(_, id)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_are_exact() {
        assert_eq!(unit_id("Gram"), Some(GRAM_UNIT_ID));
        assert_eq!(unit_id("gram"), None);
        assert_eq!(unit_id("Stone"), None);
    }

    #[test]
    fn nutrients_resolve() {
        assert_eq!(nutrient_id("Protein"), Some("84a8709a-0001-0000-ebf9-90cea7d9d44f"));
        assert!(nutrient_id("Unobtainium").is_none());
    }

    #[test]
    fn authority_names() {
        assert_eq!(Authority::parse(" EU "), Some(Authority::Eu));
        assert_eq!(Authority::parse("mexico"), Some(Authority::Mexico));
        assert_eq!(Authority::parse("mars"), None);
        assert_eq!(Authority::default(), Authority::Us);
    }
}
