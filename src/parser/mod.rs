//! C++ source parsing.
//!
//! A precompiled tree-sitter query yields one match per documentable
//! declaration, in source order. Each match carries the byte ranges of the
//! declaration, its name, its body or initializer, and the adjacent
//! documentation comment. The matches are folded into an entity tree using
//! nested byte ranges: a stack of open declarations is popped until the top
//! frame contains the new match, which makes the frame below the match's
//! parent.

pub mod cpp;
pub mod tokenizer;
pub mod translate;

use crate::entity::{Entity, EntityKind};
use anyhow::{anyhow, Context, Result};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Query, QueryCursor};

/// One open declaration while building the tree.
struct Frame {
    start: usize,
    end: usize,
    entity: Entity,
}

/// Reusable C++ parser and query.
pub struct Parser {
    parser: tree_sitter::Parser,
    query: Query,
}

impl Parser {
    /// Build the parser and compile the extraction query. A query error is
    /// fatal and names the offending offset.
    pub fn new() -> Result<Self> {
        let language: tree_sitter::Language = tree_sitter_cpp::LANGUAGE.into();
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language)
            .context("failed to load the C++ grammar")?;
        let query = Query::new(&language, cpp::QUERY)
            .map_err(|e| anyhow!("invalid query starting at offset {}: {}", e.offset, e))?;
        Ok(Parser { parser, query })
    }

    /// Parse one translation unit, adding its entities under `global`.
    ///
    /// Syntax errors do not abort: tree-sitter produces a best-effort tree
    /// and the query matches whatever it can.
    pub fn parse(&mut self, source: &str, global: &mut Entity) {
        let Some(tree) = self.parser.parse(source, None) else {
            return;
        };

        let mut stack = vec![Frame {
            start: 0,
            end: source.len(),
            entity: std::mem::take(global),
        }];

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, tree.root_node(), source.as_bytes());
        while let Some(m) = matches.next() {
            let mut kind = None;
            let mut docs = None;
            let mut name = None;
            let mut middle = None;
            let (mut start, mut end) = (0, 0);

            for capture in m.captures {
                let label = self.query.capture_names()[capture.index as usize];
                let range = capture.node.byte_range();
                match label {
                    "docs" => docs = Some(&source[range]),
                    "name" => name = Some(&source[range]),
                    "body" | "value" => middle = Some(range.start),
                    _ => match entity_kind(label) {
                        Some(k) => {
                            kind = Some(k);
                            start = range.start;
                            end = range.end;
                        }
                        None => eprintln!("warning: unrecognized capture: {label}"),
                    },
                }
            }
            let Some(kind) = kind else { continue };

            let mut entity = Entity {
                kind,
                ..Default::default()
            };
            if let Some(docs) = docs {
                translate::translate(docs, &mut entity);
            }
            if let Some(name) = name {
                entity.name = name.to_string();
            }
            let middle = middle.unwrap_or(end).clamp(start, end);
            entity.decl = trim_decl(&source[start..middle]).to_string();

            // pop until the top frame contains this match; each popped
            // frame becomes a child of the one below it
            loop {
                let top = stack.last().expect("root frame");
                if top.start <= start && end <= top.end {
                    break;
                }
                let frame = stack.pop().expect("root frame");
                stack
                    .last_mut()
                    .expect("root frame contains everything")
                    .entity
                    .add(frame.entity);
            }

            // class members cannot be moved out of their type
            if stack.last().expect("root frame").entity.kind == EntityKind::Type {
                entity.ingroup.clear();
            }

            // an @file comment suppresses the entity it was attached to
            if entity.kind == EntityKind::File {
                continue;
            }

            stack.push(Frame { start, end, entity });
        }

        while stack.len() > 1 {
            let frame = stack.pop().expect("checked length");
            stack
                .last_mut()
                .expect("checked length")
                .entity
                .add(frame.entity);
        }
        *global = stack.pop().expect("root frame").entity;
    }
}

fn entity_kind(label: &str) -> Option<EntityKind> {
    match label {
        "namespace" => Some(EntityKind::Namespace),
        "type" => Some(EntityKind::Type),
        "variable" => Some(EntityKind::Variable),
        "function" => Some(EntityKind::Function),
        "operator" => Some(EntityKind::Operator),
        "enumerator" => Some(EntityKind::Enumerator),
        "macro" => Some(EntityKind::Macro),
        _ => None,
    }
}

/// The declaration slice runs from the match start to the body or
/// initializer; drop the trailing separator when there is none.
fn trim_decl(decl: &str) -> &str {
    decl.trim_end()
        .trim_end_matches(';')
        .trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Entity {
        let mut parser = Parser::new().expect("query compiles");
        let mut root = Entity::default();
        parser.parse(source, &mut root);
        root
    }

    #[test]
    fn query_compiles() {
        assert!(Parser::new().is_ok());
    }

    #[test]
    fn empty_file_yields_bare_root() {
        let root = parse("");
        assert_eq!(root.kind, EntityKind::Root);
        assert!(root.namespaces.is_empty());
        assert!(root.functions.is_empty());
    }

    #[test]
    fn namespace_with_variable() {
        let root = parse("namespace foo {\n/** @brief Count. */\nint x;\n}\n");
        let foo = root.namespaces.get("foo").expect("namespace foo");
        let x = foo.variables.get("x").expect("variable x");
        assert_eq!(x.brief, "Count.");
        assert_eq!(x.docs, " Count. ");
        assert_eq!(x.decl, "int x");
    }

    #[test]
    fn namespace_decl_stops_at_body() {
        let root = parse("namespace foo {\n}\n");
        let foo = root.namespaces.get("foo").expect("namespace foo");
        assert_eq!(foo.decl, "namespace foo");
    }

    #[test]
    fn param_comment_on_function() {
        let root = parse("/** @param name the name */\nvoid greet(const char* name);\n");
        let sets = root.functions.overload_sets();
        assert_eq!(sets.len(), 1);
        let greet = sets[0].1[0];
        assert!(greet.docs.starts_with(
            ":material-location-enter: **Parameter** `name`\n:   the name"
        ));
    }

    #[test]
    fn overloads_keep_declaration_order() {
        let root = parse(
            "/** First. */\nint bar(int a);\n/** Second. */\nint bar(int a, int b);\n",
        );
        let sets = root.functions.overload_sets();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].0, "bar");
        assert_eq!(sets[0].1.len(), 2);
        assert!(sets[0].1[0].docs.contains("First"));
        assert!(sets[0].1[1].docs.contains("Second"));
    }

    #[test]
    fn internal_type_is_kept_but_hidden() {
        let root = parse("/** @internal */\nclass Secret {\n};\n");
        let secret = root.types.get("Secret").expect("type Secret");
        assert!(secret.hide);
    }

    #[test]
    fn file_comment_produces_no_entity() {
        let root = parse("/** @file */\nint x;\n");
        assert!(root.variables.is_empty());
    }

    #[test]
    fn class_members_nest_under_the_type() {
        let root = parse(
            "class Point {\n/** X coordinate. */\nint x;\n/** Moves the point. */\nvoid move(int dx);\n};\n",
        );
        let point = root.types.get("Point").expect("type Point");
        assert!(point.variables.get("x").is_some());
        assert_eq!(point.functions.overload_sets().len(), 1);
        assert!(root.variables.is_empty());
    }

    #[test]
    fn class_members_cannot_leave_their_type() {
        let root = parse("class Point {\n/** @ingroup g */\nint x;\n};\n");
        let point = root.types.get("Point").expect("type Point");
        let x = point.variables.get("x").expect("member x");
        assert!(x.ingroup.is_empty());
    }

    #[test]
    fn free_entity_keeps_its_ingroup() {
        let root = parse("/** @ingroup util */\nvoid f();\n");
        let sets = root.functions.overload_sets();
        assert_eq!(sets[0].1[0].ingroup, "util");
    }

    #[test]
    fn enum_with_enumerators() {
        let root = parse(
            "/** Colors. */\nenum Color {\n/** Red channel. */\nRED,\n/** Green channel. */\nGREEN\n};\n",
        );
        let color = root.types.get("Color").expect("enum Color");
        assert!(color.enumerators.get("RED").is_some());
        assert!(color.enumerators.get("GREEN").is_some());
    }

    #[test]
    fn macro_definition() {
        let root = parse("/** Version. */\n#define VERSION 3\n");
        let version = root.macros.get("VERSION").expect("macro VERSION");
        assert!(version.docs.contains("Version."));
    }

    #[test]
    fn undocumented_entity_has_empty_docs() {
        let root = parse("int x;\n");
        let x = root.variables.get("x").expect("variable x");
        assert!(x.docs.is_empty());
        assert!(x.brief.is_empty());
    }

    #[test]
    fn nested_namespaces() {
        let root = parse("namespace outer {\nnamespace inner {\nint x;\n}\n}\n");
        let outer = root.namespaces.get("outer").expect("outer");
        let inner = outer.namespaces.get("inner").expect("inner");
        assert!(inner.variables.get("x").is_some());
    }

    #[test]
    fn operator_is_kept_apart_from_functions() {
        let root = parse(
            "class V {\n/** Adds. */\nV operator+(const V& o);\n};\n",
        );
        let v = root.types.get("V").expect("type V");
        assert_eq!(v.operators.overload_sets().len(), 1);
        assert!(v.functions.is_empty());
    }

    #[test]
    fn trim_decl_drops_separator() {
        assert_eq!(trim_decl("int x;"), "int x");
        assert_eq!(trim_decl("void f() "), "void f()");
        assert_eq!(trim_decl("namespace foo "), "namespace foo");
    }
}
