use crate::models::MenuItem;

/// Active menu items whose name or category contains `term`,
/// case-insensitively. An empty term matches nothing.
pub fn search_menu(items: &[MenuItem], term: &str) -> Vec<MenuItem> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    items
        .iter()
        .filter(|item| item.is_active)
        .filter(|item| {
            item.name.to_lowercase().contains(&term) || item.category.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}
