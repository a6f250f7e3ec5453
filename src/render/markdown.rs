//! Markdown page-tree renderer.
//!
//! Writes one page per documented entity: groups and namespaces get a
//! directory with an `index.md`, types, variables, macros and overload sets
//! get a page of their own. Pages carry YAML `title:` frontmatter so the
//! static-site generator keeps the original capitalization.

use crate::entity::{Entity, EntityKind};
use crate::render::{Options, Renderer};
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static RE_FIRST_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*?[.?!]").unwrap());

static RE_NEWLINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\n\s*").unwrap());

pub struct MarkdownRenderer {
    pub options: Options,
}

impl Renderer for MarkdownRenderer {
    fn render(&self, root: &Entity, dir: &Path) -> Result<()> {
        self.scope(dir, root)
    }
}

impl MarkdownRenderer {
    fn keep(&self, e: &Entity) -> bool {
        self.options.show_hidden || !e.hide
    }

    /// Write the page tree for a root, group or namespace entity.
    fn scope(&self, dir: &Path, node: &Entity) -> Result<()> {
        let base = self.base_dir(dir, node);
        fs::create_dir_all(&base)
            .with_context(|| format!("failed to create directory: {}", base.display()))?;
        write_page(&base.join("index.md"), self.scope_page(node))?;

        for child in node.groups.iter().filter(|e| self.keep(e)) {
            self.scope(&base, child)?;
        }
        for child in node.namespaces.iter().filter(|e| self.keep(e)) {
            self.scope(&base, child)?;
        }
        for child in node.macros.iter().filter(|e| self.keep(e)) {
            self.leaf_page(&base, child, "macro")?;
        }
        for child in node.types.iter().filter(|e| self.keep(e)) {
            self.type_page(&base.join("types"), child)?;
        }
        for child in node.variables.iter().filter(|e| self.keep(e)) {
            self.leaf_page(&base.join("variables"), child, "variable")?;
        }
        for (name, set) in node.operators.overload_sets() {
            let set: Vec<_> = set.into_iter().filter(|e| self.keep(e)).collect();
            if !set.is_empty() {
                self.overload_page(&base.join("operators"), name, &set)?;
            }
        }
        for (name, set) in node.functions.overload_sets() {
            let set: Vec<_> = set.into_iter().filter(|e| self.keep(e)).collect();
            if !set.is_empty() {
                self.overload_page(&base.join("functions"), name, &set)?;
            }
        }
        Ok(())
    }

    fn base_dir(&self, dir: &Path, node: &Entity) -> PathBuf {
        if node.name.is_empty() {
            dir.to_path_buf()
        } else {
            dir.join(sanitize(&node.name))
        }
    }

    /// The `index.md` body for a root, group or namespace entity.
    pub fn scope_page(&self, node: &Entity) -> String {
        let mut out = String::new();
        if node.name.is_empty() {
            if let Some(title) = &self.options.title {
                out.push_str(&format!("# {}\n\n", title));
            }
            if let Some(description) = &self.options.description {
                out.push_str(description);
                out.push_str("\n\n");
            }
        } else {
            frontmatter(&mut out, &node.name);
            out.push_str(&format!("# {}\n\n", node.name));
        }

        let groups: Vec<_> = node.groups.iter().filter(|e| self.keep(e)).collect();
        if !groups.is_empty() {
            out.push_str("## Groups\n\n");
            for group in groups {
                out.push_str(&format!(
                    ":material-view-module-outline: [{}]({}/)\n:   {}\n\n",
                    group.name,
                    sanitize(&group.name),
                    self.brief_of(group)
                ));
            }
        }

        if node.kind == EntityKind::Namespace || node.kind == EntityKind::Group {
            if !node.decl.is_empty() {
                out.push_str(&format!("**{}**\n\n", htmlize(&line(&node.decl))));
            }
            if !node.docs.is_empty() {
                out.push_str(&node.docs);
                out.push_str("\n\n");
            }
        }

        self.table(&mut out, "Namespaces", &node.namespaces.iter().filter(|e| self.keep(e)).collect::<Vec<_>>(), "", "/");
        self.table(&mut out, "Macros", &node.macros.iter().filter(|e| self.keep(e)).collect::<Vec<_>>(), "", "/");
        self.table(&mut out, "Types", &node.types.iter().filter(|e| self.keep(e)).collect::<Vec<_>>(), "types/", "/");
        self.table(&mut out, "Variables", &node.variables.iter().filter(|e| self.keep(e)).collect::<Vec<_>>(), "variables/", "/");
        self.overload_table(&mut out, "Operators", &node.operators, "operators/");
        self.overload_table(&mut out, "Functions", &node.functions, "functions/");
        out
    }

    fn table(&self, out: &mut String, title: &str, rows: &[&Entity], prefix: &str, suffix: &str) {
        if rows.is_empty() {
            return;
        }
        out.push_str(&format!("## {}\n\n", title));
        out.push_str("| Name | Description |\n| ---- | ----------- |\n");
        for row in rows {
            out.push_str(&format!(
                "| [{}]({}{}{}) | {} |\n",
                row.name,
                prefix,
                sanitize(&row.name),
                suffix,
                self.brief_of(row)
            ));
        }
        out.push('\n');
    }

    /// One row per overload set; the description comes from the first
    /// visible overload.
    fn overload_table(
        &self,
        out: &mut String,
        title: &str,
        map: &crate::entity::ChildMap,
        prefix: &str,
    ) {
        let mut rows = String::new();
        for (name, set) in map.overload_sets() {
            let Some(first) = set.iter().find(|e| self.keep(e)) else {
                continue;
            };
            rows.push_str(&format!(
                "| [{}]({}{}/) | {} |\n",
                name,
                prefix,
                sanitize(name),
                self.brief_of(first)
            ));
        }
        if rows.is_empty() {
            return;
        }
        out.push_str(&format!("## {}\n\n", title));
        out.push_str("| Name | Description |\n| ---- | ----------- |\n");
        out.push_str(&rows);
        out.push('\n');
    }

    /// A type page: declaration, docs, enumerators, then member tables and
    /// member detail blocks.
    fn type_page(&self, dir: &Path, node: &Entity) -> Result<()> {
        let mut out = String::new();
        frontmatter(&mut out, &node.name);
        out.push_str(&format!("# {}\n\n", node.name));
        out.push_str(&format!("**{}**\n\n", htmlize(&line(&node.decl))));
        if !node.docs.is_empty() {
            out.push_str(&node.docs);
            out.push_str("\n\n");
        }

        for child in node.enumerators.iter().filter(|e| self.keep(e)) {
            out.push_str(&format!("**{}**\n:   {}\n\n", child.name, child.docs));
        }

        let variables: Vec<_> = node.variables.iter().filter(|e| self.keep(e)).collect();
        let operators = node.operators.overload_sets();
        let functions = node.functions.overload_sets();

        self.member_table(&mut out, "Member Variables", &variables);
        self.member_overload_table(&mut out, "Member Operators", &operators);
        self.member_overload_table(&mut out, "Member Functions", &functions);

        if !variables.is_empty() {
            out.push_str("## Member Variable Details\n\n");
            for child in &variables {
                out.push_str(&format!("<a name=\"{}\"></a>\n\n", sanitize(&child.name)));
                out.push_str(&format!("!!! variable \"{}\"\n\n", htmlize(&line(&child.decl))));
                out.push_str(&indent_body(&child.docs));
                out.push_str("\n\n");
            }
        }
        self.member_details(&mut out, "Member Operator Details", &operators);
        self.member_details(&mut out, "Member Function Details", &functions);

        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory: {}", dir.display()))?;
        write_page(&dir.join(format!("{}.md", sanitize(&node.name))), out)
    }

    fn member_table(&self, out: &mut String, title: &str, rows: &[&Entity]) {
        if rows.is_empty() {
            return;
        }
        out.push_str(&format!("## {}\n\n", title));
        out.push_str("| Name | Description |\n| ---- | ----------- |\n");
        for row in rows {
            out.push_str(&format!(
                "| [{}](#{}) | {} |\n",
                row.name,
                sanitize(&row.name),
                self.brief_of(row)
            ));
        }
        out.push('\n');
    }

    fn member_overload_table(&self, out: &mut String, title: &str, sets: &[(&str, Vec<&Entity>)]) {
        let mut rows = String::new();
        for (name, set) in sets {
            let Some(first) = set.iter().find(|e| self.keep(e)) else {
                continue;
            };
            rows.push_str(&format!(
                "| [{}](#{}) | {} |\n",
                name,
                sanitize(name),
                self.brief_of(first)
            ));
        }
        if rows.is_empty() {
            return;
        }
        out.push_str(&format!("## {}\n\n", title));
        out.push_str("| Name | Description |\n| ---- | ----------- |\n");
        out.push_str(&rows);
        out.push('\n');
    }

    /// Detail blocks: one anchor per overload set, one admonition per
    /// overload, in declaration order.
    fn member_details(&self, out: &mut String, title: &str, sets: &[(&str, Vec<&Entity>)]) {
        let visible: Vec<_> = sets
            .iter()
            .map(|(name, set)| {
                let set: Vec<&Entity> = set.iter().copied().filter(|e| self.keep(e)).collect();
                (*name, set)
            })
            .filter(|(_, set)| !set.is_empty())
            .collect();
        if visible.is_empty() {
            return;
        }
        out.push_str(&format!("## {}\n\n", title));
        for (name, set) in visible {
            out.push_str(&format!("<a name=\"{}\"></a>\n\n", sanitize(name)));
            for child in set {
                out.push_str(&format!("!!! function \"{}\"\n\n", htmlize(&line(&child.decl))));
                out.push_str(&indent_body(&child.docs));
                out.push_str("\n\n");
            }
        }
    }

    /// A page for a single variable or macro.
    fn leaf_page(&self, dir: &Path, node: &Entity, block: &str) -> Result<()> {
        let mut out = String::new();
        frontmatter(&mut out, &node.name);
        out.push_str(&format!("# {}\n\n", node.name));
        out.push_str(&format!("!!! {} \"{}\"\n\n", block, htmlize(&line(&node.decl))));
        out.push_str(&indent_body(&node.docs));
        out.push('\n');

        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory: {}", dir.display()))?;
        write_page(&dir.join(format!("{}.md", sanitize(&node.name))), out)
    }

    /// A page for one function or operator overload set.
    fn overload_page(&self, dir: &Path, name: &str, set: &[&Entity]) -> Result<()> {
        let mut out = String::new();
        frontmatter(&mut out, name);
        out.push_str(&format!("# {}\n\n", name));
        for child in set {
            out.push_str(&format!("!!! function \"{}\"\n\n", htmlize(&line(&child.decl))));
            out.push_str(&indent_body(&child.docs));
            out.push_str("\n\n");
        }

        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory: {}", dir.display()))?;
        write_page(&dir.join(format!("{}.md", sanitize(name))), out)
    }

    /// `@brief` when given, otherwise the first sentence of the docs.
    fn brief_of(&self, e: &Entity) -> String {
        if !e.brief.is_empty() {
            return e.brief.trim().to_string();
        }
        let flat = line(&e.docs);
        RE_FIRST_SENTENCE
            .find(flat.trim())
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

fn write_page(path: &Path, content: String) -> Result<()> {
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

fn frontmatter(out: &mut String, title: &str) {
    out.push_str(&format!("---\ntitle: {}\n---\n\n", title));
}

/// Flatten newline runs to single spaces, for one-line contexts.
fn line(s: &str) -> String {
    RE_NEWLINE_RUN.replace_all(s, " ").to_string()
}

/// Indent a docs body so it nests inside an admonition block.
fn indent_body(s: &str) -> String {
    format!("    {}", s.replace('\n', "\n    "))
}

fn htmlize(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// File-system-safe page name: every character outside `\w` becomes
/// `_uXXXX` of its code point.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push_str(&format!("_u{:04x}", c as u32));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn named(kind: EntityKind, name: &str) -> Entity {
        Entity {
            kind,
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn sanitize_keeps_word_characters() {
        assert_eq!(sanitize("foo_bar2"), "foo_bar2");
    }

    #[test]
    fn sanitize_escapes_punctuation() {
        assert_eq!(sanitize("operator+"), "operator_u002b");
        assert_eq!(sanitize("operator=="), "operator_u003d_u003d");
    }

    #[test]
    fn sanitize_is_code_point_wise() {
        // multibyte identifiers pass through intact
        assert_eq!(sanitize("größe"), "größe");
    }

    #[test]
    fn line_flattens_newlines() {
        assert_eq!(line("a\n  b"), "a b");
    }

    #[test]
    fn indent_body_nests() {
        assert_eq!(indent_body("a\nb"), "    a\n    b");
    }

    #[test]
    fn htmlize_escapes_in_order() {
        assert_eq!(htmlize("a<b> & \"c\""), "a&lt;b&gt; &amp; &quot;c&quot;");
    }

    #[test]
    fn brief_prefers_the_brief_field() {
        let renderer = MarkdownRenderer {
            options: Options::default(),
        };
        let mut e = named(EntityKind::Variable, "x");
        e.brief = "Short.".to_string();
        e.docs = "Long text. More.".to_string();
        assert_eq!(renderer.brief_of(&e), "Short.");
        e.brief.clear();
        assert_eq!(renderer.brief_of(&e), "Long text.");
    }

    #[test]
    fn renders_a_page_tree() {
        let mut root = Entity::default();
        let mut ns = named(EntityKind::Namespace, "math");
        ns.decl = "namespace math".to_string();
        ns.docs = "Math helpers.".to_string();
        let mut v = named(EntityKind::Variable, "count");
        v.decl = "int count".to_string();
        v.brief = "Counter.".to_string();
        ns.add(v);
        let mut f = named(EntityKind::Function, "add");
        f.decl = "int add(int a, int b)".to_string();
        ns.add(f);
        root.add(ns);

        let dir = TempDir::new().unwrap();
        let renderer = MarkdownRenderer {
            options: Options::default(),
        };
        renderer.render(&root, dir.path()).unwrap();

        let index = fs::read_to_string(dir.path().join("index.md")).unwrap();
        assert!(index.contains("## Namespaces"));
        assert!(index.contains("[math](math/)"));

        let ns_page = fs::read_to_string(dir.path().join("math/index.md")).unwrap();
        assert!(ns_page.contains("# math"));
        assert!(ns_page.contains("[count](variables/count/)"));
        assert!(ns_page.contains("[add](functions/add/)"));

        let var_page =
            fs::read_to_string(dir.path().join("math/variables/count.md")).unwrap();
        assert!(var_page.contains("!!! variable \"int count\""));

        let fn_page = fs::read_to_string(dir.path().join("math/functions/add.md")).unwrap();
        assert!(fn_page.contains("!!! function \"int add(int a, int b)\""));
    }

    #[test]
    fn hidden_entities_are_skipped() {
        let mut root = Entity::default();
        let mut secret = named(EntityKind::Type, "Secret");
        secret.hide = true;
        root.add(secret);

        let dir = TempDir::new().unwrap();
        let renderer = MarkdownRenderer {
            options: Options::default(),
        };
        renderer.render(&root, dir.path()).unwrap();

        let index = fs::read_to_string(dir.path().join("index.md")).unwrap();
        assert!(!index.contains("Secret"));
        assert!(!dir.path().join("types/Secret.md").exists());
    }

    #[test]
    fn show_hidden_overrides() {
        let mut root = Entity::default();
        let mut secret = named(EntityKind::Type, "Secret");
        secret.hide = true;
        root.add(secret);

        let dir = TempDir::new().unwrap();
        let renderer = MarkdownRenderer {
            options: Options {
                show_hidden: true,
                ..Default::default()
            },
        };
        renderer.render(&root, dir.path()).unwrap();
        assert!(dir.path().join("types/Secret.md").exists());
    }

    #[test]
    fn overloads_share_one_page() {
        let mut root = Entity::default();
        let mut a = named(EntityKind::Function, "bar");
        a.decl = "void bar(int)".to_string();
        let mut b = named(EntityKind::Function, "bar");
        b.decl = "void bar(double)".to_string();
        root.add(a);
        root.add(b);

        let dir = TempDir::new().unwrap();
        let renderer = MarkdownRenderer {
            options: Options::default(),
        };
        renderer.render(&root, dir.path()).unwrap();

        let page = fs::read_to_string(dir.path().join("functions/bar.md")).unwrap();
        let first = page.find("void bar(int)").unwrap();
        let second = page.find("void bar(double)").unwrap();
        assert!(first < second);
    }
}
