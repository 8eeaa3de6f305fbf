//! Command-argument expansion (§4.3): depth-first, rewrites recognized Commands into Groups
//! carrying their arguments as explicit children.

use crate::error::IllFormed;
use draftex_string::StringBuf;
use draftex_tree::list;
use draftex_tree::NodeRef;
use tracing::trace;

/// Run expansion over the whole tree rooted at `root`, mutating it in place.
pub fn expand(root: &NodeRef) -> Result<(), IllFormed> {
    expand_group(root)
}

fn expand_group(group: &NodeRef) -> Result<(), IllFormed> {
    let mut cur = group.first_child();
    while let Some(node) = cur {
        if node.is_group() {
            expand_group(&node)?;
            cur = node.next();
        } else if node.is_command() {
            let name = node.command_name().expect("is_command");
            cur = match expand_command(&node, name.as_str())? {
                Some(replacement) => replacement.next(),
                None => node.next(),
            };
        } else {
            cur = node.next();
        }
    }
    Ok(())
}

enum Spec {
    NewCommand,
    PackageLike,
    Frac,
    OneArg,
}

/// If `name` is a recognized command, replace `cmd` in place with a Group of kind `name`
/// carrying its popped arguments, and return that Group. Otherwise leave `cmd` untouched.
fn expand_command(cmd: &NodeRef, name: &str) -> Result<Option<NodeRef>, IllFormed> {
    let spec = match name {
        "newcommand" => Spec::NewCommand,
        "usepackage" | "documentclass" => Spec::PackageLike,
        "frac" => Spec::Frac,
        "section" | "subsection" => Spec::OneArg,
        _ => return Ok(None),
    };

    trace!(command = name, "expanding command");
    let group = NodeRef::new_group(name);
    match spec {
        Spec::NewCommand => {
            let a1 = pop_argument(cmd, name)?;
            list::append(&group, a1);
            if let Some(opt) = pop_optional(cmd) {
                list::append(&group, opt);
            }
            let a2 = pop_argument(cmd, name)?;
            list::append(&group, a2);
        }
        Spec::PackageLike => {
            if let Some(opt) = pop_optional(cmd) {
                list::append(&group, opt);
            }
            let a = pop_argument(cmd, name)?;
            list::append(&group, a);
        }
        Spec::Frac => {
            let a1 = pop_argument(cmd, name)?;
            list::append(&group, a1);
            let a2 = pop_argument(cmd, name)?;
            list::append(&group, a2);
        }
        Spec::OneArg => {
            let a = pop_argument(cmd, name)?;
            list::append(&group, a);
        }
    }

    list::insert_before(cmd, group.clone());
    list::remove(cmd);
    expand_group(&group)?;
    Ok(Some(group))
}

/// Pop one argument from `cmd`'s following sibling, per §4.3:
///
/// - a Group sibling is detached and used whole;
/// - a Text sibling whose first character is multi-byte, or whose entire content is a single
///   character, is detached and used whole;
/// - otherwise, exactly the first UTF-8 character is split off the Text sibling into a new node,
///   leaving the rest attached in its original place.
fn pop_argument(cmd: &NodeRef, command_name: &str) -> Result<NodeRef, IllFormed> {
    let sib = cmd
        .next()
        .ok_or_else(|| IllFormed::new(format!("\\{command_name} requires an argument"), 0))?;

    if sib.is_group() {
        return Ok(list::detach(&sib));
    }
    if sib.is_text() {
        let s = sib.text();
        let char_count = s.chars().count();
        let first_len = s.chars().next().map(char::len_utf8).unwrap_or(0);
        if first_len > 1 || char_count <= 1 {
            return Ok(list::detach(&sib));
        }
        return Ok(split_text_prefix(&sib, first_len));
    }
    Err(IllFormed::new(
        format!("\\{command_name} requires a group or text argument, found a bare command"),
        0,
    ))
}

/// Pop an optional `[...]` argument following `cmd`, if present (§4.3). Returns `None` (leaving
/// the tree untouched) when the next sibling isn't a bracketed Text run.
fn pop_optional(cmd: &NodeRef) -> Option<NodeRef> {
    let sib = cmd.next()?;
    if !sib.is_text() {
        return None;
    }
    let close = sib.with_text(|t| {
        let s = t.as_str();
        if !s.starts_with('[') {
            return None;
        }
        s.find(']').map(|i| i + 1)
    })?;
    let total_len = sib.with_text(|t| t.len());
    if close == total_len {
        Some(list::detach(&sib))
    } else {
        Some(split_text_prefix(&sib, close))
    }
}

/// Split the first `len` bytes off `node`'s text into a new, detached Text node, leaving the
/// remainder attached in `node`'s original place.
fn split_text_prefix(node: &NodeRef, len: usize) -> NodeRef {
    let font = node.font();
    let mode = node.mode();
    let prefix: StringBuf = node.with_text_mut(|t| {
        let rest = t.split_off(len);
        std::mem::replace(t, rest)
    });
    NodeRef::new_text(prefix, font, mode)
}
