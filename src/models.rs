//! Portfolio Models
//!
//! Static project records shown in the details modal.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Project table compiled into the binary
const PROJECTS_JSON: &str = include_str!("../data/projects.json");

/// One portfolio project (read-only for the page lifetime)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectRecord {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub client: String,
    pub year: String,
    pub category: String,
    #[serde(rename = "image")]
    pub image_url: String,
}

/// Projects keyed by id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: BTreeMap<u32, ProjectRecord>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let list: Vec<ProjectRecord> = serde_json::from_str(json)?;
        Ok(Self {
            records: list.into_iter().map(|p| (p.id, p)).collect(),
        })
    }

    /// The built-in project table
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(PROJECTS_JSON)
    }

    pub fn get(&self, id: u32) -> Option<&ProjectRecord> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_has_six_projects() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 6);
        for id in 1..=6 {
            assert_eq!(catalog.get(id).unwrap().id, id);
        }
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(7).is_none());
    }

    #[test]
    fn test_record_fields() {
        let catalog = Catalog::builtin().unwrap();
        let coffee = catalog.get(4).unwrap();
        assert_eq!(coffee.title, "Artisan Coffee Logo Suite");
        assert_eq!(coffee.client, "Artisan Coffee Roasters");
        assert_eq!(coffee.year, "2024");
        assert_eq!(coffee.category, "Branding");
        assert!(coffee.image_url.starts_with("https://images.unsplash.com/"));
    }

    #[test]
    fn test_from_json_rejects_missing_fields() {
        assert!(Catalog::from_json(r#"[{"id": 1, "title": "x"}]"#).is_err());
        assert_eq!(Catalog::from_json("[]").unwrap().len(), 0);
    }
}
