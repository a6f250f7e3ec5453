//! Group resolution.
//!
//! A post-pass over the built tree: every entity tagged with `@ingroup` is
//! relocated into the nearest ancestor's `@group` of that name. Group
//! declarations may appear later in the source than the entities that
//! reference them; by the time this pass runs the whole tree is in place.

use crate::entity::Entity;

/// Relocate `@ingroup`-tagged entities. Tags that resolve are cleared, so
/// running the pass again is a no-op; unresolved tags warn and the entity
/// stays where it is.
pub fn resolve(root: &mut Entity) {
    let mut visible = Vec::new();
    let leftover = visit(root, &mut visible);
    for entity in leftover {
        root.add(entity);
    }
}

/// Depth-first walk. Returns entities detached from this subtree that are
/// still travelling up towards their group.
fn visit(entity: &mut Entity, visible: &mut Vec<Vec<String>>) -> Vec<Entity> {
    let groups: Vec<String> = entity.groups.iter().map(|g| g.name.clone()).collect();
    visible.push(groups);

    let mut orphans = Vec::new();
    for map in entity.child_maps_mut() {
        for child in map.iter_mut() {
            orphans.extend(visit(child, visible));
        }
        for child in map.iter() {
            if !child.ingroup.is_empty() && !is_visible(visible, &child.ingroup) {
                eprintln!("warning: unresolved @ingroup {}", child.ingroup);
            }
        }
        orphans.extend(map.take_where(|c| !c.ingroup.is_empty() && is_visible(visible, &c.ingroup)));
    }

    visible.pop();

    // place the orphans whose group lives on this entity; the rest keep
    // bubbling up
    let mut rest = Vec::new();
    for mut orphan in orphans {
        match entity.groups.get_mut(&orphan.ingroup) {
            Some(group) => {
                orphan.ingroup.clear();
                group.add(orphan);
            }
            None => rest.push(orphan),
        }
    }
    rest
}

fn is_visible(visible: &[Vec<String>], name: &str) -> bool {
    visible.iter().any(|level| level.iter().any(|g| g == name))
}
