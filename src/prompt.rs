// Parsers for operator input. The dialoguer loops in `ui` only read text
// and re-prompt; every decision about what the text means lives here.

use crate::error::ChoiceError;
use chrono::NaiveDate;

/// Parse a numbered menu answer in `1..=max`. Returns the 1-based choice.
pub fn parse_menu_choice(input: &str, max: usize) -> Result<usize, ChoiceError> {
    let trimmed = input.trim();
    match trimmed.parse::<usize>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(ChoiceError::OutOfRange {
            input: trimmed.to_string(),
            max,
        }),
    }
}

/// Comma separated tag names. Blank input means no tag filter.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// `YYYY-MM-DD`, or `None` for blank input (an open bound).
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, ChoiceError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ChoiceError::InvalidDate(trimmed.to_string()))
}

/// Inclusive modified-date window. Either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

pub fn parse_date_range(start: &str, end: &str) -> Result<DateRange, ChoiceError> {
    let range = DateRange {
        start: parse_date(start)?,
        end: parse_date(end)?,
    };
    if let (Some(s), Some(e)) = (range.start, range.end) {
        if s > e {
            return Err(ChoiceError::InvertedRange {
                start: s.to_string(),
                end: e.to_string(),
            });
        }
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_choice_bounds() {
        assert_eq!(parse_menu_choice(" 5 ", 5), Ok(5));
        assert_eq!(parse_menu_choice("1", 5), Ok(1));
        assert!(parse_menu_choice("0", 5).is_err());
        assert!(parse_menu_choice("6", 5).is_err());
        assert!(parse_menu_choice("two", 5).is_err());
        assert!(parse_menu_choice("", 5).is_err());
    }

    #[test]
    fn tags_split_and_trim() {
        assert_eq!(parse_tags(" bakery, , dairy "), vec!["bakery", "dairy"]);
        assert!(parse_tags("   ").is_empty());
    }

    #[test]
    fn dates() {
        assert_eq!(parse_date(""), Ok(None));
        assert_eq!(parse_date("2024-02-29"), Ok(NaiveDate::from_ymd_opt(2024, 2, 29)));
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("29/02/2024").is_err());
    }

    #[test]
    fn ranges() {
        assert!(parse_date_range("", "").unwrap().is_open());
        let r = parse_date_range("2024-01-01", "").unwrap();
        assert!(r.start.is_some() && r.end.is_none());
        assert!(matches!(
            parse_date_range("2024-05-01", "2024-04-01"),
            Err(ChoiceError::InvertedRange { .. })
        ));
    }
}
