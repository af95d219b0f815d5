use serde::{Deserialize, Deserializer, Serialize};

/// Reads `null` as 0. serde_json writes non-finite floats as `null`.
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct City {
    pub name: String,
    #[serde(default)]
    pub addresses: Vec<String>,
}

impl City {
    pub fn new(name: &str) -> Self {
        City {
            name: name.to_string(),
            addresses: Vec::new(),
        }
    }
}

/// `completed` is only stored on per-address checklists; the global
/// template leaves it out.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl ChecklistItem {
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChecklistCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Checklist {
    #[serde(default)]
    pub categories: Vec<ChecklistCategory>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub nightly_rate: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub occupancy_rate: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub monthly_revenue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
}

impl Platform {
    /// A placeholder platform at zero rate and occupancy.
    pub fn placeholder(name: &str) -> Self {
        Platform {
            name: name.to_string(),
            nightly_rate: 0.0,
            occupancy_rate: 0.0,
            monthly_revenue: 0.0,
            profit: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityData {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub monthly_rent: f64,
    #[serde(default)]
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Photo {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct AddressRecord {
    #[serde(default)]
    pub profitability: ProfitabilityData,
    #[serde(default)]
    pub checklist: Checklist,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// Key of an address record in the `addressData` map.
pub fn record_key(city: &str, address: &str) -> String {
    format!("{}:{}", city, address)
}

/// Prefix shared by every record key belonging to `city`.
pub fn city_prefix(city: &str) -> String {
    format!("{}:", city)
}

/// Names as entered in the UI; surrounding whitespace is not significant.
pub fn normalize_name(name: &str) -> &str {
    name.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_numbers_read_as_zero() {
        let platform: Platform = serde_json::from_str(
            r#"{"name":"AirDNA","nightlyRate":null,"occupancyRate":40,"monthlyRevenue":null,"profit":null}"#,
        )
        .unwrap();

        assert_eq!(platform.nightly_rate, 0.0);
        assert_eq!(platform.occupancy_rate, 40.0);
        assert_eq!(platform.monthly_revenue, 0.0);
        assert_eq!(platform.profit, None);

        let data: ProfitabilityData =
            serde_json::from_str(r#"{"monthlyRent":null,"platforms":[]}"#).unwrap();
        assert_eq!(data.monthly_rent, 0.0);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Lyon "), "Lyon");
        assert_eq!(normalize_name("12 rue Mercière"), "12 rue Mercière");
    }
}
