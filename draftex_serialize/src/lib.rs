//! Tree → markup serialization (§4.9), the left inverse of tokenize+expand.

use draftex_tree::{kinds, NodeRef};

/// Render `root` back to markup text.
pub fn serialize(root: &NodeRef) -> String {
    let mut out = String::new();
    serialize_into(root, &mut out);
    out
}

fn serialize_into(node: &NodeRef, out: &mut String) {
    if node.is_text() {
        node.with_text(|t| out.push_str(t.as_str()));
    } else if node.is_command() {
        let name = node.command_name().expect("is_command");
        // `end <env>` markers are the one Command whose name isn't literally what followed the
        // backslash in the source; reconstruct the braced form the tokenizer consumed.
        match name.as_str().strip_prefix("end ") {
            Some(env) => {
                out.push_str("\\end{");
                out.push_str(env);
                out.push('}');
            }
            None => {
                out.push('\\');
                out.push_str(name.as_str());
            }
        }
    } else {
        serialize_group(node, out);
    }
    out.push_str(node.space_after().as_str());
}

fn serialize_children(node: &NodeRef, out: &mut String) {
    for child in node.children() {
        serialize_into(&child, out);
    }
}

fn serialize_group(node: &NodeRef, out: &mut String) {
    let kind = node.group_kind().expect("serialize_group: node is a Group");
    match kind.as_str() {
        k if k == kinds::MATH => {
            out.push('$');
            serialize_children(node, out);
            out.push('$');
        }
        k if k == kinds::CURLY => {
            out.push('{');
            serialize_children(node, out);
            out.push('}');
        }
        k if k == kinds::DOCUMENT => {
            out.push_str("\\begin{document}");
            serialize_children(node, out);
            out.push_str("\\end{document}");
        }
        k if k == kinds::ROOT || k == kinds::PAR => serialize_children(node, out),
        "title" | "author" | "section" | "subsection" => serialize_heading(node, &kind, out),
        _ => {
            // Any other kind was built by the expander from a recognized command (`frac`,
            // `newcommand`, `usepackage`, ...): its children are already self-delimiting
            // (curly groups or single split characters), so `\kind` plus them round-trips.
            out.push('\\');
            out.push_str(kind.as_str());
            serialize_children(node, out);
        }
    }
}

/// `title`/`author`/`section`/`subsection` groups come from two different construction paths
/// (§4.2, §4.3): inside a `document` environment the tokenizer consumes the heading's `{...}`
/// body directly into the group's children (no curly wrapper survives); outside `document` the
/// expander instead leaves a single `curly` child holding the popped argument. Tell them apart by
/// shape so both reconstruct their original braces exactly once.
fn serialize_heading(node: &NodeRef, kind: &str, out: &mut String) {
    out.push('\\');
    out.push_str(kind);

    let mut children = node.children();
    let first = children.next();
    let sole_curly_child = match (&first, children.next()) {
        (Some(c), None) => c.is_group_kind(kinds::CURLY),
        _ => false,
    };

    if sole_curly_child {
        serialize_into(first.as_ref().expect("checked above"), out);
    } else {
        out.push('{');
        serialize_children(node, out);
        out.push('}');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftex_parse::parse;

    fn round_trip(src: &str) -> String {
        let root = parse(src).unwrap();
        serialize(&root)
    }

    #[test]
    fn plain_words_round_trip() {
        assert_eq!(round_trip("hello world"), "hello world");
    }

    #[test]
    fn frac_with_braces_round_trips() {
        assert_eq!(round_trip(r"a\frac{1}{2}b"), r"a\frac{1}{2}b");
    }

    #[test]
    fn frac_with_bare_digits_round_trips() {
        assert_eq!(round_trip(r"\frac12"), r"\frac12");
    }

    #[test]
    fn section_outside_document_round_trips() {
        assert_eq!(round_trip(r"\section{Intro}text"), r"\section{Intro}text");
    }

    #[test]
    fn heading_inside_document_round_trips() {
        assert_eq!(
            round_trip("\\begin{document}\\title{My Paper}\\end{document}"),
            "\\begin{document}\\title{My Paper}\\end{document}"
        );
    }

    #[test]
    fn math_and_curly_round_trip() {
        assert_eq!(round_trip("a $x+y$ {z}"), "a $x+y$ {z}");
    }

    #[test]
    fn two_paragraphs_round_trip() {
        assert_eq!(round_trip("one\n\ntwo"), "one\n\ntwo");
    }

    #[test]
    fn break_paragraph_concatenation_matches_original() {
        // Scenario 6 (§8): splitting a paragraph and re-serializing both halves back to back
        // reproduces the original text, independent of any editing step.
        let src = "one two three";
        assert_eq!(round_trip(src), src);
    }
}
