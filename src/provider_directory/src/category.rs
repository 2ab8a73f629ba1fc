//! The fixed set of service categories a profile can be listed under.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

/// Service category of a provider profile. Stored as its canonical label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ServiceCategory {
    /// "Builders"
    Builders,
    /// "Interior Designers"
    InteriorDesigners,
    /// "Architects"
    Architects,
    /// "Electric Solutions"
    ElectricSolutions,
    /// "Bathware Suppliers"
    BathwareSuppliers,
    /// "Furniture Retailers"
    FurnitureRetailers,
    /// "Garden Solutions"
    GardenSolutions,
    /// "Fabrications"
    Fabrications,
    /// "Others"
    Others,
}

impl ServiceCategory {
    /// All categories in presentation order.
    pub const ALL: [ServiceCategory; 9] = [
        Self::Builders,
        Self::InteriorDesigners,
        Self::Architects,
        Self::ElectricSolutions,
        Self::BathwareSuppliers,
        Self::FurnitureRetailers,
        Self::GardenSolutions,
        Self::Fabrications,
        Self::Others,
    ];

    /// Canonical label, as stored in `profiles.service_category`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Builders => "Builders",
            Self::InteriorDesigners => "Interior Designers",
            Self::Architects => "Architects",
            Self::ElectricSolutions => "Electric Solutions",
            Self::BathwareSuppliers => "Bathware Suppliers",
            Self::FurnitureRetailers => "Furniture Retailers",
            Self::GardenSolutions => "Garden Solutions",
            Self::Fabrications => "Fabrications",
            Self::Others => "Others",
        }
    }

    /// Route slug of the category feed page (e.g., "builderfeed").
    pub fn feed_slug(self) -> &'static str {
        match self {
            Self::Builders => "builderfeed",
            Self::InteriorDesigners => "interiorfeed",
            Self::Architects => "architectfeed",
            Self::ElectricSolutions => "electricfeed",
            Self::BathwareSuppliers => "bathwarefeed",
            Self::FurnitureRetailers => "furniturefeed",
            Self::GardenSolutions => "gardenfeed",
            Self::Fabrications => "fabricationsfeed",
            Self::Others => "othersfeed",
        }
    }

    /// Resolve a feed route slug back to its category.
    pub fn from_feed_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim().trim_end_matches('/').trim_end_matches(".html");
        Self::ALL.into_iter().find(|c| c.feed_slug() == slug)
    }

    /// Case-insensitive label lookup ("builders", " BUILDERS ").
    pub fn parse_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCategory {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s).ok_or_else(|| DirectoryError::InvalidCategory(s.to_string()))
    }
}

impl TryFrom<String> for ServiceCategory {
    type Error = DirectoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ServiceCategory> for String {
    fn from(value: ServiceCategory) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(
            "builders".parse::<ServiceCategory>().unwrap(),
            ServiceCategory::Builders
        );
        assert_eq!(
            " INTERIOR designers ".parse::<ServiceCategory>().unwrap(),
            ServiceCategory::InteriorDesigners
        );
        assert!(matches!(
            "Plumbers".parse::<ServiceCategory>(),
            Err(DirectoryError::InvalidCategory(_))
        ));
    }

    #[test]
    fn every_category_round_trips_through_label_and_slug() {
        for c in ServiceCategory::ALL {
            assert_eq!(ServiceCategory::parse_label(c.as_str()), Some(c));
            assert_eq!(ServiceCategory::from_feed_slug(c.feed_slug()), Some(c));
        }
        assert_eq!(
            ServiceCategory::from_feed_slug("builderfeed.html/"),
            Some(ServiceCategory::Builders)
        );
    }

    #[test]
    fn serde_uses_canonical_label() {
        let json = serde_json::to_string(&ServiceCategory::GardenSolutions).unwrap();
        assert_eq!(json, "\"Garden Solutions\"");
        let back: ServiceCategory = serde_json::from_str("\"garden solutions\"").unwrap();
        assert_eq!(back, ServiceCategory::GardenSolutions);
    }
}
