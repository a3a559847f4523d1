use serde::{Deserialize, Serialize};

/// Coarse address returned by reverse geocoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponents {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl AddressComponents {
    /// The city, when present and not blank.
    pub fn city(&self) -> Option<&str> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
    }

    /// Human-readable `city, state, country` label, skipping missing parts.
    pub fn label(&self) -> String {
        [&self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
