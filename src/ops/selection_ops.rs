//! The selection set: term texts in the order the user picked them.

use crate::util::sequence::move_item;

/// Joins selected terms into prompt text
pub const SEPARATOR: &str = ", ";

/// Remove `value` if selected, otherwise append it at the end.
pub fn toggle(selection: &[String], value: &str) -> Vec<String> {
    if selection.iter().any(|s| s == value) {
        remove(selection, value)
    } else {
        let mut next = selection.to_vec();
        next.push(value.to_string());
        next
    }
}

pub fn remove(selection: &[String], value: &str) -> Vec<String> {
    selection.iter().filter(|s| *s != value).cloned().collect()
}

pub fn reorder(selection: &[String], from: usize, to: usize) -> Vec<String> {
    move_item(selection, from, to)
}

/// Rename every occurrence of `old_value` in place
pub fn update_value(selection: &[String], old_value: &str, new_value: &str) -> Vec<String> {
    selection
        .iter()
        .map(|s| {
            if s == old_value {
                new_value.to_string()
            } else {
                s.clone()
            }
        })
        .collect()
}

/// The prompt text: selected terms joined with `", "`
pub fn serialize(selection: &[String]) -> String {
    serialize_with(selection, SEPARATOR)
}

pub fn serialize_with(selection: &[String], separator: &str) -> String {
    selection.join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn toggle_removes_then_appends_at_end() {
        let s = sel(&["a", "b", "c"]);
        let s = toggle(&s, "b");
        assert_eq!(s, sel(&["a", "c"]));
        let s = toggle(&s, "b");
        assert_eq!(s, sel(&["a", "c", "b"]));
    }

    #[test]
    fn remove_absent_is_noop() {
        let s = sel(&["a"]);
        assert_eq!(remove(&s, "z"), s);
    }

    #[test]
    fn reorder_moves() {
        assert_eq!(reorder(&sel(&["a", "b", "c"]), 2, 0), sel(&["c", "a", "b"]));
    }

    #[test]
    fn update_value_keeps_position() {
        let s = update_value(&sel(&["old", "x"]), "old", "new");
        assert_eq!(s, sel(&["new", "x"]));
        assert_eq!(serialize(&s), "new, x");
    }

    #[test]
    fn serialize_empty_is_empty() {
        assert_eq!(serialize(&[]), "");
    }

    #[test]
    fn serialize_with_custom_separator() {
        assert_eq!(serialize_with(&sel(&["a", "b"]), " | "), "a | b");
    }
}
