//! Entity tree model — format-agnostic.

use serde::Serialize;

/// Kind of a documented program element.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Root,
    Namespace,
    Type,
    Enumerator,
    Variable,
    Function,
    Operator,
    Macro,
    Group,
    File,
}

/// One documented element and its children.
///
/// The root of a tree is an `EntityKind::Root` entity with an empty name.
/// Functions and operators may share a name (overload sets); all other
/// child kinds are expected to be unique per name.
#[derive(Debug, Default, Serialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: String,
    /// Declaration signature, up to the body or initializer.
    pub decl: String,
    /// Translated Markdown body.
    pub docs: String,
    /// One-sentence summary from `@brief`/`@short`.
    pub brief: String,
    /// Pending `@ingroup` target; cleared once resolved.
    pub ingroup: String,
    /// Set by `@internal`; the subtree is kept but not emitted.
    pub hide: bool,

    pub namespaces: ChildMap,
    pub groups: ChildMap,
    pub types: ChildMap,
    pub variables: ChildMap,
    pub enumerators: ChildMap,
    pub functions: ChildMap,
    pub operators: ChildMap,
    pub macros: ChildMap,
}

impl Entity {
    /// Attach a child to the map matching its kind.
    pub fn add(&mut self, child: Entity) {
        match child.kind {
            EntityKind::Namespace => self.namespaces.insert_unique(child),
            EntityKind::Group => self.groups.insert_unique(child),
            EntityKind::Type => self.types.insert_unique(child),
            EntityKind::Variable => self.variables.insert_unique(child),
            EntityKind::Enumerator => self.enumerators.insert_unique(child),
            EntityKind::Macro => self.macros.insert_unique(child),
            EntityKind::Function => self.functions.insert(child),
            EntityKind::Operator => self.operators.insert(child),
            EntityKind::Root | EntityKind::File => {
                eprintln!("warning: cannot attach entity: {}", child.name);
            }
        }
    }

    /// All child maps, for passes that treat children uniformly.
    pub fn child_maps_mut(&mut self) -> [&mut ChildMap; 8] {
        [
            &mut self.namespaces,
            &mut self.groups,
            &mut self.types,
            &mut self.variables,
            &mut self.enumerators,
            &mut self.functions,
            &mut self.operators,
            &mut self.macros,
        ]
    }
}

/// Insertion-ordered multimap of child entities, keyed by name.
///
/// Iteration order equals insertion order, which in turn equals source
/// order; overload order stability depends on it.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ChildMap(Vec<Entity>);

impl ChildMap {
    /// Append, allowing repeated names (function/operator overloads).
    pub fn insert(&mut self, child: Entity) {
        self.0.push(child);
    }

    /// Append, warning when the name is already taken. Both entries are
    /// retained, as sequential overloads.
    pub fn insert_unique(&mut self, child: Entity) {
        if self.get(&child.name).is_some() {
            eprintln!("warning: duplicate name: {}", child.name);
        }
        self.0.push(child);
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.0.iter().find(|e| e.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.0.iter_mut().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.0.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Remove and return every child matching the predicate, preserving the
    /// order of both the removed and the remaining entries.
    pub fn take_where<F>(&mut self, mut pred: F) -> Vec<Entity>
    where
        F: FnMut(&Entity) -> bool,
    {
        let mut taken = Vec::new();
        let mut i = 0;
        while i < self.0.len() {
            if pred(&self.0[i]) {
                taken.push(self.0.remove(i));
            } else {
                i += 1;
            }
        }
        taken
    }

    /// Group children by name, in order of first appearance. Overloads of
    /// one name are returned together even when other names were declared
    /// between them.
    pub fn overload_sets(&self) -> Vec<(&str, Vec<&Entity>)> {
        let mut sets: Vec<(&str, Vec<&Entity>)> = Vec::new();
        for child in &self.0 {
            match sets.iter_mut().find(|(name, _)| *name == child.name) {
                Some((_, set)) => set.push(child),
                None => sets.push((&child.name, vec![child])),
            }
        }
        sets
    }
}
