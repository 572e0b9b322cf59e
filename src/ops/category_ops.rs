//! Category-level edits on a project. Every function returns a new project;
//! an unknown category id leaves it unchanged.

use crate::model::category::Category;
use crate::model::project::Project;
use crate::util::sequence::move_item;

/// Append an empty category with a fresh id. Returns the new project and
/// the id of the category that was added.
pub fn add_category(project: &Project, name: &str) -> (Project, String) {
    let category = Category::new(name);
    let id = category.id.clone();
    let mut next = project.clone();
    next.categories.push(category);
    (next, id)
}

pub fn delete_category(project: &Project, category_id: &str) -> Project {
    Project {
        categories: project
            .categories
            .iter()
            .filter(|c| c.id != category_id)
            .cloned()
            .collect(),
        ..project.clone()
    }
}

pub fn rename_category(project: &Project, category_id: &str, new_name: &str) -> Project {
    map_category(project, category_id, |c| Category {
        name: new_name.to_string(),
        ..c.clone()
    })
}

/// Move the category at `from` to `to` (drag-reorder of category cards)
pub fn reorder_categories(project: &Project, from: usize, to: usize) -> Project {
    Project {
        categories: move_item(&project.categories, from, to),
        ..project.clone()
    }
}

/// Replace the category with the given id by `f(category)`.
pub fn map_category<F>(project: &Project, category_id: &str, f: F) -> Project
where
    F: FnOnce(&Category) -> Category,
{
    let mut next = project.clone();
    if let Some(slot) = next.categories.iter_mut().find(|c| c.id == category_id) {
        *slot = f(slot);
    }
    next
}
