use serde::Serialize;

use crate::io::prompt_log::PromptLogEntry;
use crate::model::category::Category;
use crate::model::project::Project;
use crate::model::template::Template;
use crate::model::workspace::Workspace;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ProjectJson {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub categories: usize,
}

#[derive(Serialize)]
pub struct CategoryJson {
    pub id: String,
    pub name: String,
    pub terms: usize,
}

#[derive(Serialize)]
pub struct TermJson<'a> {
    pub id: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'a str>,
    pub selected: bool,
}

#[derive(Serialize)]
pub struct PromptJson<'a> {
    pub prompt: String,
    pub terms: &'a [String],
}

#[derive(Serialize)]
pub struct StatusJson {
    pub undo: usize,
    pub redo: usize,
    pub max_history: usize,
    pub selected: usize,
    pub unsaved: bool,
}

#[derive(Serialize)]
pub struct ImageJson {
    pub path: String,
    pub content_type: &'static str,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn project_json(ws: &Workspace, project: &Project) -> ProjectJson {
    ProjectJson {
        id: project.id.clone(),
        name: project.name.clone(),
        active: ws.active_project_id == project.id,
        categories: project.categories.len(),
    }
}

pub fn category_json(category: &Category) -> CategoryJson {
    CategoryJson {
        id: category.id.clone(),
        name: category.name.clone(),
        terms: category.terms.len(),
    }
}

pub fn term_jsons<'a>(ws: &Workspace, category: &'a Category) -> Vec<TermJson<'a>> {
    category
        .terms
        .iter()
        .map(|t| TermJson {
            id: &t.id,
            text: &t.text,
            image: t.image.as_deref(),
            selected: ws.is_selected(&t.text),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

pub fn format_projects(ws: &Workspace) -> String {
    let mut out = String::new();
    for p in &ws.projects {
        let marker = if ws.active_project_id == p.id { "*" } else { " " };
        out.push_str(&format!(
            "{} {}  ({} categories)  {}\n",
            marker,
            p.name,
            p.categories.len(),
            p.id
        ));
    }
    out
}

pub fn format_categories(project: &Project) -> String {
    let mut out = format!("{}\n", project.name);
    for (i, c) in project.categories.iter().enumerate() {
        out.push_str(&format!(
            "  {:>2}. {}  ({} terms)  {}\n",
            i,
            c.name,
            c.terms.len(),
            c.id
        ));
    }
    out
}

pub fn format_terms(ws: &Workspace, category: &Category) -> String {
    let mut out = format!("{}\n", category.name);
    for (i, t) in category.terms.iter().enumerate() {
        let check = if ws.is_selected(&t.text) { "x" } else { " " };
        out.push_str(&format!("  {:>2}. [{}] {}", i, check, t.text));
        if let Some(image) = &t.image {
            out.push_str(&format!("  <{}>", image));
        }
        out.push('\n');
    }
    out
}

pub fn format_selection(selection: &[String]) -> String {
    let mut out = String::new();
    for (i, s) in selection.iter().enumerate() {
        out.push_str(&format!("  {:>2}. {}\n", i, s));
    }
    out
}

pub fn format_templates(templates: &[Template]) -> String {
    let mut out = String::new();
    for t in templates {
        out.push_str(&format!("{}  {}\n    {}\n", t.name, t.id, t.terms.join(", ")));
    }
    out
}

pub fn format_log(entries: &[PromptLogEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        out.push_str(&format!("{}  {}\n", e.display_time(), e.prompt));
    }
    out
}
