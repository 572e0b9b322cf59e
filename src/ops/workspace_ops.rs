//! Workspace-level edits, addressed by project and category id.
//!
//! These wrap the category/term/selection primitives and keep the selection
//! consistent with the hierarchy: removing or renaming a term updates the
//! selected texts in the same step, and the change is reported back.

use crate::model::category::Category;
use crate::model::project::Project;
use crate::model::workspace::Workspace;
use crate::ops::{category_ops, selection_ops, term_ops};
use crate::util::sequence::move_item;

/// Selected texts affected by an edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionChange {
    /// Texts dropped from the selection
    pub removed: Vec<String>,
    /// Texts renamed in place, as (old, new)
    pub renamed: Vec<(String, String)>,
}

impl SelectionChange {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.renamed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Append a project and make it the active one
pub fn add_project(ws: &Workspace, name: &str) -> (Workspace, String) {
    let project = Project::new(name);
    let id = project.id.clone();
    let mut next = ws.clone();
    next.projects.push(project);
    next.active_project_id = id.clone();
    (next, id)
}

/// Remove a project. If it was active, the first remaining project becomes
/// active. Selected texts that no longer exist anywhere are dropped.
pub fn delete_project(ws: &Workspace, project_id: &str) -> (Workspace, SelectionChange) {
    if ws.project(project_id).is_none() {
        return (ws.clone(), SelectionChange::default());
    }
    let mut next = ws.clone();
    next.projects.retain(|p| p.id != project_id);
    if next.active_project_id == project_id {
        next.active_project_id = next
            .projects
            .first()
            .map(|p| p.id.clone())
            .unwrap_or_default();
    }
    prune_selection(&next)
}

pub fn rename_project(ws: &Workspace, project_id: &str, new_name: &str) -> Workspace {
    map_project(ws, project_id, |p| Project {
        name: new_name.to_string(),
        ..p.clone()
    })
}

pub fn reorder_projects(ws: &Workspace, from: usize, to: usize) -> Workspace {
    Workspace {
        projects: move_item(&ws.projects, from, to),
        ..ws.clone()
    }
}

/// Switch the active project. Unknown ids are ignored.
pub fn set_active_project(ws: &Workspace, project_id: &str) -> Workspace {
    let mut next = ws.clone();
    if ws.project(project_id).is_some() {
        next.active_project_id = project_id.to_string();
    }
    next
}

/// Replace the project with the given id by `f(project)`
pub fn map_project<F>(ws: &Workspace, project_id: &str, f: F) -> Workspace
where
    F: FnOnce(&Project) -> Project,
{
    let mut next = ws.clone();
    if let Some(slot) = next.projects.iter_mut().find(|p| p.id == project_id) {
        *slot = f(slot);
    }
    next
}

/// Replace all projects (import). The active project is kept when it still
/// exists, otherwise the first project becomes active.
pub fn replace_projects(ws: &Workspace, projects: Vec<Project>) -> (Workspace, SelectionChange) {
    let mut next = ws.clone();
    next.projects = projects;
    if next.project(&next.active_project_id).is_none() {
        next.active_project_id = next
            .projects
            .first()
            .map(|p| p.id.clone())
            .unwrap_or_default();
    }
    prune_selection(&next)
}

/// Drop every project, the selection and the active project. Templates
/// are kept.
pub fn clear_all(ws: &Workspace) -> Workspace {
    Workspace {
        projects: Vec::new(),
        active_project_id: String::new(),
        selected_terms: Vec::new(),
        templates: ws.templates.clone(),
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Append a category. Returns `None` as the id if the project is unknown.
pub fn add_category(ws: &Workspace, project_id: &str, name: &str) -> (Workspace, Option<String>) {
    let Some(project) = ws.project(project_id) else {
        return (ws.clone(), None);
    };
    let (project, id) = category_ops::add_category(project, name);
    (map_project(ws, project_id, |_| project), Some(id))
}

pub fn delete_category(
    ws: &Workspace,
    project_id: &str,
    category_id: &str,
) -> (Workspace, SelectionChange) {
    let next = map_project(ws, project_id, |p| {
        category_ops::delete_category(p, category_id)
    });
    prune_selection(&next)
}

pub fn rename_category(
    ws: &Workspace,
    project_id: &str,
    category_id: &str,
    new_name: &str,
) -> Workspace {
    map_project(ws, project_id, |p| {
        category_ops::rename_category(p, category_id, new_name)
    })
}

pub fn reorder_categories(ws: &Workspace, project_id: &str, from: usize, to: usize) -> Workspace {
    map_project(ws, project_id, |p| {
        category_ops::reorder_categories(p, from, to)
    })
}

fn map_category<F>(ws: &Workspace, project_id: &str, category_id: &str, f: F) -> Workspace
where
    F: FnOnce(&Category) -> Category,
{
    map_project(ws, project_id, |p| {
        category_ops::map_category(p, category_id, f)
    })
}

fn find_category<'a>(ws: &'a Workspace, project_id: &str, category_id: &str) -> Option<&'a Category> {
    ws.project(project_id)?.category(category_id)
}

// ---------------------------------------------------------------------------
// Terms
// ---------------------------------------------------------------------------

pub fn add_term(
    ws: &Workspace,
    project_id: &str,
    category_id: &str,
    text: &str,
    image: Option<String>,
) -> Workspace {
    map_category(ws, project_id, category_id, |c| {
        term_ops::add_term(c, text, image)
    })
}

/// Remove a term and drop its text from the selection, unless another term
/// with the same text still exists somewhere in the workspace.
pub fn remove_term(
    ws: &Workspace,
    project_id: &str,
    category_id: &str,
    text: &str,
) -> (Workspace, SelectionChange) {
    let exists = find_category(ws, project_id, category_id).is_some_and(|c| c.contains_term(text));
    if !exists {
        return (ws.clone(), SelectionChange::default());
    }
    let mut next = map_category(ws, project_id, category_id, |c| {
        term_ops::remove_term(c, text)
    });
    let mut change = SelectionChange::default();
    if next.is_selected(text) && !next.has_term_text(text) {
        next.selected_terms = selection_ops::remove(&next.selected_terms, text);
        change.removed.push(text.to_string());
    }
    (next, change)
}

/// Edit a term in place and carry a text change over to the selection.
pub fn edit_term(
    ws: &Workspace,
    project_id: &str,
    category_id: &str,
    old_text: &str,
    new_text: &str,
    new_image: Option<String>,
) -> (Workspace, SelectionChange) {
    let exists =
        find_category(ws, project_id, category_id).is_some_and(|c| c.contains_term(old_text));
    if !exists {
        return (ws.clone(), SelectionChange::default());
    }
    let mut next = map_category(ws, project_id, category_id, |c| {
        term_ops::edit_term(c, old_text, new_text, new_image)
    });
    let mut change = SelectionChange::default();
    if old_text != new_text && next.is_selected(old_text) {
        next.selected_terms = selection_ops::update_value(&next.selected_terms, old_text, new_text);
        change
            .renamed
            .push((old_text.to_string(), new_text.to_string()));
    }
    (next, change)
}

pub fn reorder_terms(
    ws: &Workspace,
    project_id: &str,
    category_id: &str,
    from: usize,
    to: usize,
) -> Workspace {
    map_category(ws, project_id, category_id, |c| {
        term_ops::reorder_terms(c, from, to)
    })
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

pub fn toggle_selection(ws: &Workspace, text: &str) -> Workspace {
    Workspace {
        selected_terms: selection_ops::toggle(&ws.selected_terms, text),
        ..ws.clone()
    }
}

pub fn remove_selection(ws: &Workspace, text: &str) -> Workspace {
    Workspace {
        selected_terms: selection_ops::remove(&ws.selected_terms, text),
        ..ws.clone()
    }
}

pub fn reorder_selection(ws: &Workspace, from: usize, to: usize) -> Workspace {
    Workspace {
        selected_terms: selection_ops::reorder(&ws.selected_terms, from, to),
        ..ws.clone()
    }
}

pub fn clear_selection(ws: &Workspace) -> Workspace {
    Workspace {
        selected_terms: Vec::new(),
        ..ws.clone()
    }
}

/// Drop selected texts that no term in the workspace carries anymore
fn prune_selection(ws: &Workspace) -> (Workspace, SelectionChange) {
    let (kept, removed): (Vec<String>, Vec<String>) = ws
        .selected_terms
        .iter()
        .cloned()
        .partition(|t| ws.has_term_text(t));
    let next = Workspace {
        selected_terms: kept,
        ..ws.clone()
    };
    (
        next,
        SelectionChange {
            removed,
            renamed: Vec::new(),
        },
    )
}
