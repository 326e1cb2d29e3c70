//! Ugandan district type.
//!
//! Delivery addressing is keyed on the official district list, so the
//! district field is validated by exact membership rather than free text.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The official list of Ugandan districts.
///
/// Matching is exact and case-sensitive; the storefront presents this
/// list as a picker, so arbitrary casing never reaches validation.
pub const UGANDA_DISTRICTS: &[&str] = &[
    "Abim",
    "Adjumani",
    "Agago",
    "Alebtong",
    "Amolatar",
    "Amudat",
    "Amuria",
    "Amuru",
    "Apac",
    "Arua",
    "Budaka",
    "Bududa",
    "Bugiri",
    "Bugweri",
    "Buhweju",
    "Buikwe",
    "Bukedea",
    "Bukomansimbi",
    "Bukwo",
    "Bulambuli",
    "Buliisa",
    "Bundibugyo",
    "Bunyangabu",
    "Bushenyi",
    "Busia",
    "Butaleja",
    "Butambala",
    "Butebo",
    "Buvuma",
    "Buyende",
    "Dokolo",
    "Gomba",
    "Gulu",
    "Hoima",
    "Ibanda",
    "Iganga",
    "Isingiro",
    "Jinja",
    "Kaabong",
    "Kabale",
    "Kabarole",
    "Kaberamaido",
    "Kagadi",
    "Kakumiro",
    "Kalaki",
    "Kalangala",
    "Kaliro",
    "Kalungu",
    "Kampala",
    "Kamuli",
    "Kamwenge",
    "Kanungu",
    "Kapchorwa",
    "Kapelebyong",
    "Karenga",
    "Kasanda",
    "Kasese",
    "Katakwi",
    "Kayunga",
    "Kazo",
    "Kibaale",
    "Kiboga",
    "Kibuku",
    "Kikuube",
    "Kiruhura",
    "Kiryandongo",
    "Kisoro",
    "Kitagwenda",
    "Kitgum",
    "Koboko",
    "Kole",
    "Kotido",
    "Kumi",
    "Kwania",
    "Kween",
    "Kyankwanzi",
    "Kyegegwa",
    "Kyenjojo",
    "Kyotera",
    "Lamwo",
    "Lira",
    "Luuka",
    "Luwero",
    "Lwengo",
    "Lyantonde",
    "Madi-Okollo",
    "Manafwa",
    "Maracha",
    "Masaka",
    "Masindi",
    "Mayuge",
    "Mbale",
    "Mbarara",
    "Mitooma",
    "Mityana",
    "Moroto",
    "Moyo",
    "Mpigi",
    "Mubende",
    "Mukono",
    "Nabilatuk",
    "Nakapiripirit",
    "Nakaseke",
    "Nakasongola",
    "Namayingo",
    "Namisindwa",
    "Namutumba",
    "Napak",
    "Nebbi",
    "Ngora",
    "Ntoroko",
    "Ntungamo",
    "Nwoya",
    "Obongi",
    "Omoro",
    "Otuke",
    "Oyam",
    "Pader",
    "Pakwach",
    "Pallisa",
    "Rakai",
    "Rubanda",
    "Rubirizi",
    "Rukiga",
    "Rukungiri",
    "Rwampara",
    "Sembabule",
    "Serere",
    "Sheema",
    "Sironko",
    "Soroti",
    "Terego",
    "Tororo",
    "Wakiso",
    "Yumbe",
    "Zombo",
];

/// Errors that can occur when parsing a [`District`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DistrictError {
    /// The input string is empty.
    #[error("district cannot be empty")]
    Empty,
    /// The input is not in the Ugandan district list.
    #[error("'{0}' is not a Ugandan district")]
    Unknown(String),
}

/// A Ugandan district, validated against [`UGANDA_DISTRICTS`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct District(String);

impl District {
    /// Parse a `District` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not an exact member of
    /// the district list.
    pub fn parse(s: &str) -> Result<Self, DistrictError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DistrictError::Empty);
        }
        if !UGANDA_DISTRICTS.contains(&trimmed) {
            return Err(DistrictError::Unknown(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the district name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `District` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for District {
    type Err = DistrictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for District {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_is_complete_enough() {
        assert!(UGANDA_DISTRICTS.len() > 100);
    }

    #[test]
    fn test_parse_valid_districts() {
        assert!(District::parse("Kampala").is_ok());
        assert!(District::parse("Wakiso").is_ok());
        assert!(District::parse("Gulu").is_ok());
        assert!(District::parse(" Mbarara ").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(District::parse(""), Err(DistrictError::Empty));
        assert_eq!(District::parse("   "), Err(DistrictError::Empty));
    }

    #[test]
    fn test_parse_unknown_district() {
        let err = District::parse("Nairobi").unwrap_err();
        assert_eq!(err, DistrictError::Unknown("Nairobi".to_owned()));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(District::parse("kampala").is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let district = District::parse("Jinja").unwrap();
        let json = serde_json::to_string(&district).unwrap();
        assert_eq!(json, "\"Jinja\"");

        let parsed: District = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, district);
    }
}
