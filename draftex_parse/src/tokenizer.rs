//! Recursive-descent tokenizer (§4.2): markup bytes → a tree rooted at a `"root"` Group.

use crate::error::IllFormed;
use draftex_string::StringBuf;
use draftex_tree::list;
use draftex_tree::{kinds, Font, Mode, NodeRef};
use tracing::{trace, warn};

/// Tokenize `input` into a tree rooted at a Group of kind `"root"`.
pub fn tokenize(input: &str) -> Result<NodeRef, IllFormed> {
    let mut tz = Tokenizer { src: input, pos: 0 };
    let root = NodeRef::new_group(kinds::ROOT);
    tz.region(&root, Stop::Eof, true, Mode::Text)?;
    Ok(root)
}

/// What ends the region currently being tokenized.
enum Stop {
    /// End of input (the `root` Group).
    Eof,
    /// A closing `}`.
    Curly,
    /// A closing `$`.
    Math,
    /// A matching `\end{name}`.
    Env(String),
}

/// What a single token dispatch produced.
enum TokenOutcome {
    /// A node was appended to the active container; trailing whitespace still needs collecting.
    Appended(NodeRef),
    /// A matching `\end{name}` was consumed; the region is done.
    EndEnv,
}

struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn byte(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Tokenize one region (root, curly, math, or environment body) into `container`.
    ///
    /// When `paragraphing` is set, top-level children are grouped into implicit `par` Groups,
    /// split on two-or-more-newline whitespace runs (§4.2); otherwise tokens are appended
    /// directly to `container`.
    fn region(
        &mut self,
        container: &NodeRef,
        stop: Stop,
        paragraphing: bool,
        mode: Mode,
    ) -> Result<(), IllFormed> {
        let env_name = match &stop {
            Stop::Env(name) => Some(name.clone()),
            _ => None,
        };
        if let Some(name) = &env_name {
            trace!(env = %name, offset = self.pos, "entering environment");
        }

        let mut current = if paragraphing { NodeRef::new_group(kinds::PAR) } else { container.clone() };

        // Leading whitespace before the region's first token has no preceding node to attach
        // to; park it on an empty placeholder Text node, or drop it if it is a leading blank
        // line in a paragraphing region.
        if let Some(run) = self.take_whitespace() {
            if !(paragraphing && run.is_paragraph_break()) {
                let placeholder = NodeRef::new_text(StringBuf::new(), Font::text(), mode);
                placeholder.set_space_after(run);
                list::append(&current, placeholder);
            }
        }

        loop {
            if self.at_end() {
                return match stop {
                    Stop::Eof => {
                        self.finalize(container, current, paragraphing);
                        Ok(())
                    }
                    Stop::Curly => {
                        let e = IllFormed::new("unexpected end of input inside `{...}`", self.pos);
                        warn!(offset = e.offset, message = %e.message, "tokenizer error");
                        Err(e)
                    }
                    Stop::Math => {
                        let e = IllFormed::new("unexpected end of input inside `$...$`", self.pos);
                        warn!(offset = e.offset, message = %e.message, "tokenizer error");
                        Err(e)
                    }
                    Stop::Env(name) => {
                        let e = IllFormed::new(
                            format!("unexpected end of input, unclosed \\begin{{{name}}}"),
                            self.pos,
                        );
                        warn!(offset = e.offset, message = %e.message, "tokenizer error");
                        Err(e)
                    }
                };
            }

            match (&stop, self.byte()) {
                (Stop::Curly, Some(b'}')) => {
                    self.pos += 1;
                    self.finalize(container, current, paragraphing);
                    return Ok(());
                }
                (Stop::Math, Some(b'$')) => {
                    self.pos += 1;
                    self.finalize(container, current, paragraphing);
                    return Ok(());
                }
                _ => {}
            }

            match self.dispatch(&current, env_name.as_deref(), paragraphing, mode)? {
                TokenOutcome::EndEnv => {
                    self.finalize(container, current, paragraphing);
                    return Ok(());
                }
                TokenOutcome::Appended(node) => {
                    let is_break = if let Some(run) = self.take_whitespace() {
                        let broke = paragraphing && run.is_paragraph_break();
                        node.set_space_after(run);
                        broke
                    } else {
                        false
                    };
                    if is_break {
                        self.finalize_par(container, current);
                        current = NodeRef::new_group(kinds::PAR);
                    }
                }
            }
        }
    }

    fn finalize(&self, container: &NodeRef, current: NodeRef, paragraphing: bool) {
        if paragraphing {
            self.finalize_par(container, current);
        }
        // else `current` and `container` are the same Rc; nothing further to do.
    }

    fn finalize_par(&self, container: &NodeRef, par: NodeRef) {
        if par.child_count() > 0 {
            list::append(container, par);
        }
    }

    /// Consume a maximal run of bytes `<= 0x20`, returning it if non-empty.
    fn take_whitespace(&mut self) -> Option<StringBuf> {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] <= 0x20 {
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(StringBuf::from_str(&self.src[start..self.pos]))
        }
    }

    /// Consume a maximal run of "regular" bytes: `> 0x20` and not one of `\ % { } $`.
    fn take_text_run(&mut self) -> &'a str {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if b <= 0x20 || matches!(b, b'\\' | b'%' | b'{' | b'}' | b'$') {
                break;
            }
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    /// Consume a maximal run of ASCII alphabetic bytes (a command name).
    fn take_ident(&mut self) -> &'a str {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    /// Expect and consume `{name}`.
    fn expect_braced_name(&mut self) -> Result<String, IllFormed> {
        let open = self.pos;
        if self.byte() != Some(b'{') {
            return Err(IllFormed::new("expected `{` to start an environment or heading name", open));
        }
        self.pos += 1;
        let name = self.take_ident().to_string();
        if name.is_empty() {
            return Err(IllFormed::new("expected a name inside `{...}`", self.pos));
        }
        if self.byte() != Some(b'}') {
            return Err(IllFormed::new("expected `}` to close name group", self.pos));
        }
        self.pos += 1;
        Ok(name)
    }

    fn dispatch(
        &mut self,
        current: &NodeRef,
        expected_env: Option<&str>,
        paragraphing: bool,
        mode: Mode,
    ) -> Result<TokenOutcome, IllFormed> {
        let offset = self.pos;
        match self.byte().expect("caller checked at_end") {
            b'\\' => {
                self.pos += 1;
                let name = self.take_ident().to_string();
                if name.is_empty() {
                    return Err(IllFormed::new("expected a command name after `\\`", offset));
                }
                self.handle_command(current, &name, offset, expected_env, paragraphing, mode)
            }
            b'%' => Err(IllFormed::new("`%` comments are not supported", offset)),
            b'{' => {
                self.pos += 1;
                let group = NodeRef::new_group(kinds::CURLY);
                self.region(&group, Stop::Curly, false, mode)?;
                list::append(current, group.clone());
                Ok(TokenOutcome::Appended(group))
            }
            b'}' => Err(IllFormed::new("unmatched `}`", offset)),
            b'$' => {
                self.pos += 1;
                let group = NodeRef::new_group(kinds::MATH);
                self.region(&group, Stop::Math, false, Mode::Math)?;
                list::append(current, group.clone());
                Ok(TokenOutcome::Appended(group))
            }
            _ => {
                let text = self.take_text_run().to_string();
                let node = NodeRef::new_text(text, Font::text(), mode);
                list::append(current, node.clone());
                Ok(TokenOutcome::Appended(node))
            }
        }
    }

    fn handle_command(
        &mut self,
        current: &NodeRef,
        name: &str,
        offset: usize,
        expected_env: Option<&str>,
        paragraphing: bool,
        mode: Mode,
    ) -> Result<TokenOutcome, IllFormed> {
        match name {
            "begin" => {
                let env_name = self.expect_braced_name()?;
                let body_paragraphing = env_name == kinds::DOCUMENT;
                let group = NodeRef::new_group(env_name.clone());
                self.region(&group, Stop::Env(env_name), body_paragraphing, mode)?;
                list::append(current, group.clone());
                Ok(TokenOutcome::Appended(group))
            }
            "end" => {
                let env_name = self.expect_braced_name()?;
                match expected_env {
                    Some(e) if e == env_name => Ok(TokenOutcome::EndEnv),
                    Some(e) => Err(IllFormed::new(
                        format!("mismatched \\end{{{env_name}}}, expected \\end{{{e}}}"),
                        offset,
                    )),
                    None => {
                        // Passing is permitted at this nesting level: no environment is open
                        // here, so the marker is kept as an ordinary Command (§4.2 case c).
                        let node = NodeRef::new_command(format!("end {env_name}"));
                        list::append(current, node.clone());
                        Ok(TokenOutcome::Appended(node))
                    }
                }
            }
            "title" | "author" | "section" | "subsection" if paragraphing && expected_env == Some(kinds::DOCUMENT) => {
                if self.byte() != Some(b'{') {
                    return Err(IllFormed::new(format!("expected an argument after \\{name}"), self.pos));
                }
                self.pos += 1;
                let group = NodeRef::new_group(name);
                self.region(&group, Stop::Curly, false, mode)?;
                list::append(current, group.clone());
                Ok(TokenOutcome::Appended(group))
            }
            _ => {
                let node = NodeRef::new_command(name);
                list::append(current, node.clone());
                Ok(TokenOutcome::Appended(node))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftex_tree::NodeTag;

    fn child_texts(group: &NodeRef) -> Vec<String> {
        group
            .children()
            .filter(|n| n.is_text())
            .map(|n| n.text().as_str().to_string())
            .collect()
    }

    #[test]
    fn plain_text_becomes_one_paragraph_of_two_words() {
        let root = tokenize("hello world").unwrap();
        assert!(root.is_group_kind(kinds::ROOT));
        assert_eq!(root.child_count(), 1);
        let par = root.first_child().unwrap();
        assert!(par.is_group_kind(kinds::PAR));
        let words: Vec<_> = par.children().collect();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text().as_str(), "hello");
        assert_eq!(words[0].space_after().as_str(), " ");
        assert_eq!(words[1].text().as_str(), "world");
    }

    #[test]
    fn frac_command_is_left_bare_for_the_expander() {
        // The tokenizer has no notion of `frac`'s argument arity: it only recognizes `begin`
        // and the document heading commands as structural. `{1}` and `{2}` come out as two
        // ordinary sibling `curly` Groups; turning them into `frac`'s children is the
        // expander's job (§4.3).
        let root = tokenize(r"a\frac{1}{2}b").unwrap();
        let par = root.first_child().unwrap();
        let nodes: Vec<_> = par.children().collect();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0].text().as_str(), "a");
        assert!(nodes[1].is_command());
        assert_eq!(nodes[1].command_name().unwrap().as_str(), "frac");
        assert!(nodes[2].is_group_kind(kinds::CURLY));
        assert!(nodes[3].is_group_kind(kinds::CURLY));
        assert_eq!(nodes[4].text().as_str(), "b");
    }

    #[test]
    fn curly_group_nests_a_child_group() {
        let root = tokenize("{nested}").unwrap();
        let par = root.first_child().unwrap();
        let group = par.first_child().unwrap();
        assert!(group.is_group_kind(kinds::CURLY));
        assert_eq!(child_texts(&group), vec!["nested"]);
    }

    #[test]
    fn math_toggles_in_and_out() {
        let root = tokenize("a $x$ b").unwrap();
        let par = root.first_child().unwrap();
        let nodes: Vec<_> = par.children().collect();
        assert_eq!(nodes[0].tag(), NodeTag::Text);
        assert!(nodes[1].is_group_kind(kinds::MATH));
        let x = nodes[1].first_child().unwrap();
        assert_eq!(x.mode(), Mode::Math);
        assert_eq!(x.text().as_str(), "x");
    }

    #[test]
    fn two_newlines_split_paragraphs() {
        let root = tokenize("first\n\nsecond").unwrap();
        assert_eq!(root.child_count(), 2);
        let pars: Vec<_> = root.children().collect();
        assert_eq!(child_texts(&pars[0]), vec!["first"]);
        assert_eq!(child_texts(&pars[1]), vec!["second"]);
    }

    #[test]
    fn document_environment_collects_sections_and_pars() {
        let root = tokenize(r"\begin{document}\section{Intro}hi\end{document}").unwrap();
        let outer_par = root.first_child().unwrap();
        assert!(outer_par.is_group_kind(kinds::PAR));
        let doc = outer_par.first_child().unwrap();
        assert!(doc.is_group_kind(kinds::DOCUMENT));
        let par = doc.first_child().unwrap();
        assert!(par.is_group_kind(kinds::PAR));
        let section = par.first_child().unwrap();
        assert!(section.is_group_kind("section"));
        assert_eq!(child_texts(&section), vec!["Intro"]);
    }

    #[test]
    fn mismatched_end_is_fatal() {
        let err = tokenize(r"\begin{document}hi\end{other}").unwrap_err();
        assert!(err.message.contains("mismatched"));
    }

    #[test]
    fn stray_end_outside_any_environment_is_a_literal_command() {
        let root = tokenize(r"hi\end{foo}").unwrap();
        let par = root.first_child().unwrap();
        let nodes: Vec<_> = par.children().collect();
        assert!(nodes.iter().any(|n| n.is_command() && n.command_name().unwrap().as_str() == "end foo"));
    }

    #[test]
    fn unclosed_brace_is_ill_formed() {
        assert!(tokenize("{unterminated").is_err());
    }

    #[test]
    fn comment_marker_is_unsupported() {
        assert!(tokenize("a % comment").is_err());
    }
}
