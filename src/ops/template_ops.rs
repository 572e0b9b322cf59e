use indexmap::IndexSet;

use crate::model::template::Template;
use crate::model::workspace::Workspace;
use crate::util::ids::new_id;

/// Error type for template operations
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template name must not be empty")]
    EmptyName,
    #[error("template not found: {0}")]
    NotFound(String),
}

/// Split a comma-separated term list, trimming entries and dropping empties.
pub fn parse_terms(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Save a new template. Returns the updated workspace and the template id.
pub fn create_template(
    ws: &Workspace,
    name: &str,
    terms_csv: &str,
    image: Option<String>,
) -> Result<(Workspace, String), TemplateError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TemplateError::EmptyName);
    }
    let template = Template {
        id: new_id(),
        name: name.to_string(),
        terms: parse_terms(terms_csv),
        image: image.filter(|i| !i.is_empty()),
    };
    let id = template.id.clone();
    let mut next = ws.clone();
    next.templates.push(template);
    Ok((next, id))
}

pub fn delete_template(ws: &Workspace, template_id: &str) -> Workspace {
    Workspace {
        templates: ws
            .templates
            .iter()
            .filter(|t| t.id != template_id)
            .cloned()
            .collect(),
        ..ws.clone()
    }
}

/// Replace the selection with the template's terms (first occurrence wins).
pub fn apply_template(ws: &Workspace, template_id: &str) -> Result<Workspace, TemplateError> {
    let template = ws
        .template(template_id)
        .ok_or_else(|| TemplateError::NotFound(template_id.to_string()))?;
    let terms: IndexSet<String> = template.terms.iter().cloned().collect();
    Ok(Workspace {
        selected_terms: terms.into_iter().collect(),
        ..ws.clone()
    })
}
