//! Documentation-comment translation.
//!
//! Turns the Doxygen-like markup of one comment into Markdown, writing into
//! the entity under construction. Besides the `docs` body this sets the
//! entity-level signals: `brief`, `hide`, `ingroup`, and the `File` kind
//! for `@file` comments.

use crate::entity::{Entity, EntityKind};
use crate::parser::tokenizer::{
    Token, Tokenizer, CLOSE, COMMAND, ESCAPE, LINE, NONE, OPEN, PARA, SENTENCE, WHITESPACE, WORD,
};

/// Translate one comment slice into `entity`. A comment that does not start
/// with a documentation opener is left alone entirely.
pub fn translate(comment: &str, entity: &mut Entity) {
    let mut tok = Tokenizer::new(comment);
    if !tok.next().is(OPEN) {
        return;
    }

    // drop the decoration between the opener and the first content token
    loop {
        let save = tok.clone();
        if !tok.next().is(WHITESPACE | LINE | PARA) {
            tok = save;
            break;
        }
    }

    let mut indent: usize = 0;
    loop {
        let token = tok.next();
        match token.kind {
            NONE => break,
            k if k & COMMAND != 0 => command(comment, &mut tok, token, entity, &mut indent),
            k if k & ESCAPE != 0 => entity.docs.push_str(&token.text[1..]),
            k if k & PARA != 0 => {
                entity.docs.push_str("\n\n");
                indent = indent.saturating_sub(4);
            }
            k if k & LINE != 0 => {
                entity.docs.push('\n');
                push_spaces(&mut entity.docs, indent);
            }
            k if k & CLOSE != 0 => {}
            _ => entity.docs.push_str(token.text),
        }
    }
}

fn command<'a>(
    comment: &'a str,
    tok: &mut Tokenizer<'a>,
    token: Token<'a>,
    entity: &mut Entity,
    indent: &mut usize,
) {
    let cmd = &token.text[1..];
    match cmd {
        "param" | "param[in]" => param(tok, entity, indent, ":material-location-enter:"),
        "param[out]" => param(tok, entity, indent, ":material-location-exit:"),
        "param[in,out]" => param(
            tok,
            entity,
            indent,
            ":material-location-enter::material-location-exit:",
        ),
        "tparam" => {
            entity.docs.push_str(":material-code-tags: **Template parameter** `");
            entity.docs.push_str(tok.consume(WORD).text);
            entity.docs.push_str("`\n:   ");
            *indent = 4;
            tok.skip_whitespace();
        }
        "p" | "c" => wrap(tok, entity, "`", "`"),
        "e" | "em" | "a" => wrap(tok, entity, "*", "*"),
        "b" => wrap(tok, entity, "**", "**"),
        "anchor" => wrap(tok, entity, "<a name=\"", "\"></a>"),
        "ref" => {
            let href = tok.consume(WORD);
            let text = tok.consume(WORD);
            entity.docs.push('[');
            entity.docs.push_str(text.text);
            entity.docs.push_str("](#");
            entity.docs.push_str(href.text);
            entity.docs.push(')');
        }
        "return" | "returns" | "result" => {
            block(tok, entity, ":material-location-exit: **Return**\n:   ")
        }
        "pre" => block(
            tok,
            entity,
            ":material-check-circle-outline: **Pre-condition**\n:   ",
        ),
        "post" => block(
            tok,
            entity,
            ":material-check-circle-outline: **Post-condition**\n:   ",
        ),
        "throw" => block(tok, entity, ":material-alert-circle-outline: **Throw**\n:   "),
        "see" | "sa" => block(tok, entity, ":material-eye-outline: **See**\n:   "),
        "f$" => entity.docs.push('$'),
        "f[" | "f]" => entity.docs.push_str("$$"),
        "code" | "endcode" | "verbatim" | "endverbatim" => entity.docs.push_str("```"),
        "li" | "arg" => entity.docs.push_str("  - "),
        "note" | "abstract" | "info" | "tip" | "success" | "question" | "warning" | "failure"
        | "danger" | "bug" | "example" | "quote" => {
            entity.docs.push_str("!!! ");
            entity.docs.push_str(cmd);
            entity.docs.push('\n');
            admonition_indent(tok, entity, indent);
        }
        "attention" => {
            entity.docs.push_str("!!! warning \"Attention\"\n");
            admonition_indent(tok, entity, indent);
        }
        "todo" => {
            entity.docs.push_str("!!! example \"To-do\"\n");
            admonition_indent(tok, entity, indent);
        }
        "remark" => {
            entity.docs.push_str("!!! quote \"Remark\"\n");
            admonition_indent(tok, entity, indent);
        }
        "file" => entity.kind = EntityKind::File,
        "internal" => entity.hide = true,
        "brief" | "short" => brief(comment, tok, entity),
        "group" => {
            let name = tok.consume(WORD).text.to_string();
            entity.docs.push_str(":material-view-module-outline: **Group** [");
            entity.docs.push_str(&name);
            entity.docs.push_str("](");
            entity.docs.push_str(&name);
            entity.docs.push_str("/)\n:   ");
            entity.add(Entity {
                kind: EntityKind::Group,
                name,
                ..Default::default()
            });
            tok.skip_whitespace();
        }
        "ingroup" => entity.ingroup = tok.consume(WORD).text.to_string(),
        // legacy re-declaration markers; the name comes from the syntax tree
        "def" | "var" | "fn" | "class" | "struct" | "union" | "enum" | "typedef" | "namespace"
        | "interface" | "protocol" | "property" => {
            tok.consume(WORD);
        }
        _ => {
            if token.text.starts_with('\\') {
                // treat as escape
                entity.docs.push_str(cmd);
            } else {
                eprintln!("warning: unrecognized command: {}", token.text);
                entity.docs.push_str(token.text);
            }
        }
    }
}

fn param(tok: &mut Tokenizer, entity: &mut Entity, indent: &mut usize, icon: &str) {
    entity.docs.push_str(icon);
    entity.docs.push_str(" **Parameter** `");
    entity.docs.push_str(tok.consume(WORD).text);
    entity.docs.push_str("`\n:   ");
    *indent = 4;
    tok.skip_whitespace();
}

/// Inline substitution around one following word.
fn wrap(tok: &mut Tokenizer, entity: &mut Entity, open: &str, close: &str) {
    entity.docs.push_str(open);
    entity.docs.push_str(tok.consume(WORD).text);
    entity.docs.push_str(close);
}

/// Block marker ending in the `:   ` definition-list intro; the body starts
/// right after it, so one following whitespace token is dropped.
fn block(tok: &mut Tokenizer, entity: &mut Entity, text: &str) {
    entity.docs.push_str(text);
    tok.skip_whitespace();
}

/// The emitted indent is the start of the first content line, so one
/// following whitespace token is dropped.
fn admonition_indent(tok: &mut Tokenizer, entity: &mut Entity, indent: &mut usize) {
    *indent += 4;
    push_spaces(&mut entity.docs, *indent);
    tok.skip_whitespace();
}

/// Capture the sentence after `@brief`/`@short` by lookahead. The sentence
/// stays in the stream and is translated into `docs` as ordinary text.
fn brief<'a>(comment: &'a str, tok: &Tokenizer<'a>, entity: &mut Entity) {
    let mut ahead = tok.clone();
    let first = ahead.consume(!(WHITESPACE | LINE | PARA));
    if first.kind == NONE || first.is(CLOSE) {
        return;
    }
    let last = ahead.consume(SENTENCE | CLOSE);
    let end = if last.is(SENTENCE) {
        last.end
    } else if last.kind != NONE {
        last.start
    } else {
        comment.len()
    };
    entity.brief.push_str(comment[first.start..end].trim_end());
}

fn push_spaces(docs: &mut String, n: usize) {
    for _ in 0..n {
        docs.push(' ');
    }
}
