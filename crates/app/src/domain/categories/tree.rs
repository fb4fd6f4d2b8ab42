//! Category tree traversal.
//!
//! Parent links are not checked for cycles when stored, so every walk here
//! visits each category at most once.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::domain::categories::models::{Category, CategoryNode, CategoryUuid};

type Children = FxHashMap<CategoryUuid, SmallVec<[CategoryUuid; 4]>>;

fn children_by_parent<I>(links: I) -> Children
where
    I: IntoIterator<Item = (CategoryUuid, Option<CategoryUuid>)>,
{
    let mut children = Children::default();

    for (uuid, parent) in links {
        if let Some(parent) = parent {
            children.entry(parent).or_default().push(uuid);
        }
    }

    children
}

/// `root` followed by every category beneath it, breadth first.
pub fn descendants<I>(root: CategoryUuid, links: I) -> Vec<CategoryUuid>
where
    I: IntoIterator<Item = (CategoryUuid, Option<CategoryUuid>)>,
{
    let children = children_by_parent(links);

    let mut visited = FxHashSet::default();
    let mut ordered = Vec::new();
    let mut cursor = 0;

    visited.insert(root);
    ordered.push(root);

    while let Some(current) = ordered.get(cursor).copied() {
        cursor += 1;

        for child in children.get(&current).into_iter().flatten() {
            if visited.insert(*child) {
                ordered.push(*child);
            }
        }
    }

    ordered
}

/// Nest categories under their parents. Categories whose parent is missing
/// are treated as roots; categories caught in a parent cycle are dropped.
pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryNode> {
    let known: FxHashSet<CategoryUuid> = categories.iter().map(|c| c.uuid).collect();
    let children = children_by_parent(categories.iter().map(|c| (c.uuid, c.parent_uuid)));

    let mut by_uuid: FxHashMap<CategoryUuid, Category> =
        categories.into_iter().map(|c| (c.uuid, c)).collect();

    let mut roots: Vec<CategoryUuid> = by_uuid
        .values()
        .filter(|c| c.parent_uuid.is_none_or(|parent| !known.contains(&parent)))
        .map(|c| c.uuid)
        .collect();

    roots.sort();

    let mut visited = FxHashSet::default();

    roots
        .into_iter()
        .filter_map(|root| attach(root, &children, &mut by_uuid, &mut visited))
        .collect()
}

fn attach(
    uuid: CategoryUuid,
    children: &Children,
    by_uuid: &mut FxHashMap<CategoryUuid, Category>,
    visited: &mut FxHashSet<CategoryUuid>,
) -> Option<CategoryNode> {
    if !visited.insert(uuid) {
        return None;
    }

    let category = by_uuid.remove(&uuid)?;

    let mut child_uuids: SmallVec<[CategoryUuid; 4]> =
        children.get(&uuid).cloned().unwrap_or_default();

    child_uuids.sort();

    let subcategories = child_uuids
        .into_iter()
        .filter_map(|child| attach(child, children, by_uuid, visited))
        .collect();

    Some(CategoryNode {
        category,
        subcategories,
    })
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn category(uuid: CategoryUuid, parent: Option<CategoryUuid>, title: &str) -> Category {
        Category {
            uuid,
            parent_uuid: parent,
            title: title.to_string(),
            image_src: None,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn descendants_include_root_and_nested_children() {
        let electronics = CategoryUuid::new();
        let phones = CategoryUuid::new();
        let android = CategoryUuid::new();
        let books = CategoryUuid::new();

        let links = [
            (electronics, None),
            (phones, Some(electronics)),
            (android, Some(phones)),
            (books, None),
        ];

        let found = descendants(electronics, links);

        assert_eq!(found, vec![electronics, phones, android]);
    }

    #[test]
    fn descendants_terminate_on_cycles() {
        let a = CategoryUuid::new();
        let b = CategoryUuid::new();
        let c = CategoryUuid::new();

        let links = [(a, Some(c)), (b, Some(a)), (c, Some(b))];

        let found = descendants(a, links);

        assert_eq!(found.len(), 3, "each category appears once: {found:?}");
        assert_eq!(found.first(), Some(&a));
    }

    #[test]
    fn leaf_descendants_are_just_the_leaf() {
        let root = CategoryUuid::new();
        let leaf = CategoryUuid::new();

        let found = descendants(leaf, [(root, None), (leaf, Some(root))]);

        assert_eq!(found, vec![leaf]);
    }

    #[test]
    fn build_tree_nests_subcategories() {
        let root = CategoryUuid::new();
        let child = CategoryUuid::new();
        let grandchild = CategoryUuid::new();

        let tree = build_tree(vec![
            category(grandchild, Some(child), "Android"),
            category(root, None, "Electronics"),
            category(child, Some(root), "Phones"),
        ]);

        assert_eq!(tree.len(), 1);

        let electronics = tree.first().map(|node| &node.category.title);

        assert_eq!(electronics.map(String::as_str), Some("Electronics"));

        let phones = tree
            .first()
            .and_then(|node| node.subcategories.first())
            .map(|node| (node.category.title.as_str(), node.subcategories.len()));

        assert_eq!(phones, Some(("Phones", 1)));
    }

    #[test]
    fn build_tree_drops_detached_cycles() {
        let root = CategoryUuid::new();
        let a = CategoryUuid::new();
        let b = CategoryUuid::new();

        let tree = build_tree(vec![
            category(root, None, "Root"),
            category(a, Some(b), "A"),
            category(b, Some(a), "B"),
        ]);

        assert_eq!(tree.len(), 1);
        assert!(tree.iter().all(|node| node.subcategories.is_empty()));
    }
}
