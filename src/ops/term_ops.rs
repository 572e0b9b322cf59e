//! Term-level edits on a single category. Terms are addressed by text; only
//! the first term with a matching text is touched.

use crate::model::category::Category;
use crate::model::term::Term;
use crate::util::sequence::move_item;

/// Append a term. Duplicate texts are not rejected here.
pub fn add_term(category: &Category, text: &str, image: Option<String>) -> Category {
    let mut next = category.clone();
    next.terms.push(Term::new(text, image));
    next
}

/// Remove the first term whose text matches. Selected texts are not
/// touched; see `workspace_ops::remove_term` for the coupled version.
pub fn remove_term(category: &Category, text: &str) -> Category {
    let mut next = category.clone();
    if let Some(pos) = next.terms.iter().position(|t| t.text == text) {
        next.terms.remove(pos);
    }
    next
}

/// Replace text and image of the first term matching `old_text`, in place.
/// The term keeps its id and position.
pub fn edit_term(
    category: &Category,
    old_text: &str,
    new_text: &str,
    new_image: Option<String>,
) -> Category {
    let mut next = category.clone();
    if let Some(term) = next.terms.iter_mut().find(|t| t.text == old_text) {
        term.text = new_text.to_string();
        term.image = new_image;
    }
    next
}

pub fn reorder_terms(category: &Category, from: usize, to: usize) -> Category {
    Category {
        terms: move_item(&category.terms, from, to),
        ..category.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn category(texts: &[&str]) -> Category {
        Category {
            id: "c1".into(),
            name: "Objects".into(),
            terms: texts.iter().map(|t| Term::new(*t, None)).collect(),
        }
    }

    fn texts(c: &Category) -> Vec<&str> {
        c.terms.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn add_then_reorder_scenario() {
        let c1 = category(&["house"]);
        let c1 = add_term(&c1, "car", None);
        assert_eq!(texts(&c1), vec!["house", "car"]);
        let c1 = reorder_terms(&c1, 0, 1);
        assert_eq!(texts(&c1), vec!["car", "house"]);
    }

    #[test]
    fn add_keeps_image() {
        let c = add_term(&category(&[]), "tree", Some("/uploads/1_tree.png".into()));
        assert_eq!(c.terms[0].image.as_deref(), Some("/uploads/1_tree.png"));
    }

    #[test]
    fn add_accepts_duplicates() {
        let c = add_term(&category(&["car"]), "car", None);
        assert_eq!(texts(&c), vec!["car", "car"]);
    }

    #[test]
    fn remove_then_add_lands_last() {
        let c = category(&["house", "car", "tree"]);
        let c = remove_term(&c, "house");
        let c = add_term(&c, "house", None);
        assert_eq!(texts(&c), vec!["car", "tree", "house"]);
    }

    #[test]
    fn remove_only_first_match() {
        let c = add_term(&category(&["car", "tree"]), "car", None);
        let c = remove_term(&c, "car");
        assert_eq!(texts(&c), vec!["tree", "car"]);
    }

    #[test]
    fn remove_missing_is_noop() {
        let c = category(&["house"]);
        assert_eq!(remove_term(&c, "boat"), c);
    }

    #[test]
    fn edit_preserves_position_and_id() {
        let c = category(&["a", "old", "b"]);
        let id = c.terms[1].id.clone();
        let next = edit_term(&c, "old", "new", Some("img".into()));
        assert_eq!(texts(&next), vec!["a", "new", "b"]);
        assert_eq!(next.terms[1].id, id);
        assert_eq!(next.terms[1].image.as_deref(), Some("img"));
    }

    #[test]
    fn edit_to_colliding_text_does_not_merge() {
        let c = category(&["a", "b"]);
        let next = edit_term(&c, "a", "b", None);
        assert_eq!(next.terms.len(), 2);
        assert_ne!(next.terms[0].id, next.terms[1].id);
    }

    #[test]
    fn edit_missing_is_noop() {
        let c = category(&["a"]);
        assert_eq!(edit_term(&c, "zz", "x", None), c);
    }

    #[test]
    fn reorder_same_index_is_noop() {
        let c = category(&["a", "b", "c"]);
        for i in 0..3 {
            assert_eq!(reorder_terms(&c, i, i), c);
        }
    }

    #[test]
    fn reorder_out_of_range_is_noop() {
        let c = category(&["a", "b"]);
        assert_eq!(reorder_terms(&c, 7, 0), c);
    }
}
