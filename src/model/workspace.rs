use serde::{Deserialize, Serialize};

use super::category::Category;
use super::project::Project;
use super::template::Template;
use super::term::Term;

/// Everything persisted for one data directory.
///
/// Keys are camelCase so a `data.json` written by the web front end loads
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Id of the project commands act on (empty = none)
    #[serde(default)]
    pub active_project_id: String,
    /// The selection set: term texts in the order they were picked
    #[serde(default)]
    pub selected_terms: Vec<String>,
    #[serde(default)]
    pub templates: Vec<Template>,
}

impl Workspace {
    /// The starter workspace a fresh data directory is initialized with
    pub fn seeded() -> Self {
        let terms = |texts: &[&str]| -> Vec<Term> {
            texts.iter().map(|t| Term::new(*t, None)).collect()
        };
        let category = |name: &str, texts: &[&str]| -> Category {
            let mut c = Category::new(name);
            c.terms = terms(texts);
            c
        };

        let mut private = Project::new("Private");
        private.categories = vec![
            category("Objects", &["house", "car", "tree", "mountain"]),
            category("Colors", &["yellow roof", "blue sky", "green grass"]),
        ];
        let mut work = Project::new("Work");
        work.categories = vec![category("Mood", &["professional", "clean", "modern"])];

        Workspace {
            active_project_id: private.id.clone(),
            projects: vec![private, work],
            selected_terms: Vec::new(),
            templates: Vec::new(),
        }
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    /// Look a project up by id, falling back to a case-insensitive name match
    pub fn resolve_project(&self, key: &str) -> Option<&Project> {
        self.project(key).or_else(|| {
            self.projects
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(key))
        })
    }

    pub fn active_project(&self) -> Option<&Project> {
        if self.active_project_id.is_empty() {
            return None;
        }
        self.project(&self.active_project_id)
    }

    pub fn template(&self, template_id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == template_id)
    }

    /// Whether any term anywhere in the workspace has this text
    pub fn has_term_text(&self, text: &str) -> bool {
        self.projects
            .iter()
            .flat_map(|p| p.categories.iter())
            .any(|c| c.contains_term(text))
    }

    pub fn is_selected(&self, text: &str) -> bool {
        self.selected_terms.iter().any(|t| t == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_workspace_has_active_project() {
        let ws = Workspace::seeded();
        assert_eq!(ws.projects.len(), 2);
        assert_eq!(ws.active_project().unwrap().name, "Private");
        assert!(ws.has_term_text("blue sky"));
        assert!(!ws.has_term_text("purple"));
    }

    #[test]
    fn loads_web_front_end_data_file() {
        let json = r#"{
            "projects": [
                {"id": "1", "name": "Private", "categories": [
                    {"id": "1", "name": "Objekt", "terms": [{"text": "house"}, {"text": "car", "image": "/uploads/1_car.png"}]}
                ]}
            ],
            "activeProjectId": "1",
            "selectedTerms": ["car"]
        }"#;
        let ws: Workspace = serde_json::from_str(json).unwrap();
        assert_eq!(ws.active_project_id, "1");
        assert_eq!(ws.selected_terms, vec!["car"]);
        let cat = &ws.projects[0].categories[0];
        assert_eq!(cat.terms[1].image.as_deref(), Some("/uploads/1_car.png"));
        assert!(ws.templates.is_empty());
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let mut ws = Workspace::seeded();
        ws.selected_terms = vec!["car".into(), "blue sky".into()];
        let json = serde_json::to_string_pretty(&ws).unwrap();
        let back: Workspace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ws);
    }

    #[test]
    fn empty_object_is_empty_workspace() {
        let ws: Workspace = serde_json::from_str("{}").unwrap();
        assert_eq!(ws, Workspace::default());
        assert!(ws.active_project().is_none());
    }

    #[test]
    fn resolve_project_by_name() {
        let ws = Workspace::seeded();
        assert_eq!(ws.resolve_project("work").unwrap().name, "Work");
        let id = ws.projects[0].id.clone();
        assert_eq!(ws.resolve_project(&id).unwrap().name, "Private");
        assert!(ws.resolve_project("nope").is_none());
    }
}
