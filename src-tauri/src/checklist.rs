//! Checklist template helpers: the default template, per-address copies and
//! the edits made from the settings page.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{ChecklistCategory, ChecklistItem};

fn item(id: &str, label: &str) -> ChecklistItem {
    ChecklistItem {
        id: id.to_string(),
        label: label.to_string(),
        completed: None,
    }
}

/// Template seeded on first use.
pub fn default_template() -> Vec<ChecklistCategory> {
    vec![
        ChecklistCategory {
            id: "category-1".to_string(),
            name: "Préparation".to_string(),
            items: vec![
                item("item-1", "Vérifier les équipements"),
                item("item-2", "Prendre des photos"),
            ],
        },
        ChecklistCategory {
            id: "category-2".to_string(),
            name: "Administration".to_string(),
            items: vec![
                item("item-3", "Créer les annonces"),
                item("item-4", "Vérifier le contrat de location"),
            ],
        },
        ChecklistCategory {
            id: "category-3".to_string(),
            name: "Entretien".to_string(),
            items: vec![item("item-5", "Organiser le ménage")],
        },
    ]
}

/// Copy of `categories` with every item marked not completed.
pub fn reset_copy(categories: &[ChecklistCategory]) -> Vec<ChecklistCategory> {
    categories
        .iter()
        .map(|category| ChecklistCategory {
            id: category.id.clone(),
            name: category.name.clone(),
            items: category
                .items
                .iter()
                .map(|item| ChecklistItem {
                    completed: Some(false),
                    ..item.clone()
                })
                .collect(),
        })
        .collect()
}

/// Copy of `categories` without `completed` flags, the shape the global
/// template is stored in.
pub fn strip_completion(categories: &[ChecklistCategory]) -> Vec<ChecklistCategory> {
    categories
        .iter()
        .map(|category| ChecklistCategory {
            items: category
                .items
                .iter()
                .map(|item| ChecklistItem {
                    completed: None,
                    ..item.clone()
                })
                .collect(),
            ..category.clone()
        })
        .collect()
}

pub fn add_category(categories: &[ChecklistCategory], name: &str) -> Vec<ChecklistCategory> {
    let mut updated = categories.to_vec();
    updated.push(ChecklistCategory {
        id: format!("category-{}", Uuid::new_v4().simple()),
        name: name.to_string(),
        items: Vec::new(),
    });
    updated
}

pub fn remove_category(categories: &[ChecklistCategory], category_id: &str) -> Vec<ChecklistCategory> {
    categories
        .iter()
        .filter(|category| category.id != category_id)
        .cloned()
        .collect()
}

/// Appends an item to the named category. Unknown categories leave the list unchanged.
pub fn add_item(
    categories: &[ChecklistCategory],
    category_id: &str,
    label: &str,
) -> Vec<ChecklistCategory> {
    let mut updated = categories.to_vec();
    if let Some(category) = updated.iter_mut().find(|c| c.id == category_id) {
        category.items.push(ChecklistItem {
            id: format!("item-{}", Uuid::new_v4().simple()),
            label: label.to_string(),
            completed: None,
        });
    }
    updated
}

pub fn remove_item(
    categories: &[ChecklistCategory],
    category_id: &str,
    item_id: &str,
) -> Vec<ChecklistCategory> {
    let mut updated = categories.to_vec();
    if let Some(category) = updated.iter_mut().find(|c| c.id == category_id) {
        category.items.retain(|item| item.id != item_id);
    }
    updated
}

/// Flips one item's completed flag in place. Returns false when the
/// category or item does not exist.
pub fn toggle_item(categories: &mut [ChecklistCategory], category_id: &str, item_id: &str) -> bool {
    let item = categories
        .iter_mut()
        .find(|c| c.id == category_id)
        .and_then(|c| c.items.iter_mut().find(|i| i.id == item_id));

    match item {
        Some(item) => {
            item.completed = Some(!item.is_completed());
            true
        }
        None => false,
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub completed: usize,
    pub total: usize,
}

impl ChecklistProgress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.total as f64) * 100.0
    }
}

pub fn progress(categories: &[ChecklistCategory]) -> ChecklistProgress {
    let items = categories.iter().flat_map(|c| c.items.iter());
    let (completed, total) = items.fold((0, 0), |(done, total), item| {
        (done + usize::from(item.is_completed()), total + 1)
    });

    ChecklistProgress { completed, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_shape() {
        let template = default_template();
        assert_eq!(template.len(), 3);
        let item_count: usize = template.iter().map(|c| c.items.len()).sum();
        assert_eq!(item_count, 5);
        assert!(template
            .iter()
            .flat_map(|c| c.items.iter())
            .all(|i| i.completed.is_none()));
    }

    #[test]
    fn test_reset_copy_clears_completion() {
        let mut categories = reset_copy(&default_template());
        assert!(toggle_item(&mut categories, "category-1", "item-2"));
        assert_eq!(progress(&categories).completed, 1);

        let reset = reset_copy(&categories);
        assert_eq!(progress(&reset).completed, 0);
        assert!(reset
            .iter()
            .flat_map(|c| c.items.iter())
            .all(|i| i.completed == Some(false)));
    }

    #[test]
    fn test_toggle_unknown_item() {
        let mut categories = reset_copy(&default_template());
        assert!(!toggle_item(&mut categories, "category-1", "item-5"));
        assert!(!toggle_item(&mut categories, "missing", "item-1"));
        assert_eq!(categories, reset_copy(&default_template()));
    }

    #[test]
    fn test_template_editing() {
        let template = default_template();

        let with_category = add_category(&template, "Sécurité");
        assert_eq!(with_category.len(), 4);
        let new_id = with_category[3].id.clone();
        assert!(new_id.starts_with("category-"));

        let with_item = add_item(&with_category, &new_id, "Tester le détecteur de fumée");
        assert_eq!(with_item[3].items.len(), 1);
        assert!(with_item[3].items[0].id.starts_with("item-"));

        let without_item = remove_item(&with_item, "category-1", "item-1");
        assert_eq!(without_item[0].items.len(), 1);
        assert_eq!(without_item[0].items[0].id, "item-2");

        let without_category = remove_category(&without_item, "category-2");
        assert_eq!(without_category.len(), 3);
        assert!(without_category.iter().all(|c| c.id != "category-2"));

        // Source list is never mutated.
        assert_eq!(template, default_template());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let once = add_category(&[], "A");
        let twice = add_category(&once, "A");
        assert_ne!(twice[0].id, twice[1].id);
    }

    #[test]
    fn test_progress_percent() {
        let empty = progress(&[]);
        assert_eq!(empty.total, 0);
        assert_eq!(empty.percent(), 0.0);

        let mut categories = reset_copy(&default_template());
        toggle_item(&mut categories, "category-3", "item-5");
        let p = progress(&categories);
        assert_eq!(p, ChecklistProgress { completed: 1, total: 5 });
        assert!((p.percent() - 20.0).abs() < 1e-9);
    }
}
