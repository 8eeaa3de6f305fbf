use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use draftex_caret::{Caret, EditState};
use draftex_edit::History;
use draftex_layout::{HeadlessMetrics, LayoutContext};
use draftex_tree::NodeRef;

use super::load::load;

const WIDTH_EM: f32 = 40.0;
const KEY_SIZE: f32 = 10.0;
const APPROX_CHAR_WIDTH: f32 = KEY_SIZE * 0.5;

/// `draftex edit <file>`: an interactive line-oriented REPL (§6). Each line is one driver
/// command; this stands in for the arrow-key/keybinding dispatch a real GUI driver would do.
pub fn run(file: &Path) -> Result<()> {
    let stdin = io::stdin();
    run_with(file, stdin.lock())
}

/// The REPL body, generic over its input source so it can be driven by a fixed script in tests.
fn run_with(file: &Path, input: impl BufRead) -> Result<()> {
    let root = load(file)?;

    let mut ctx = LayoutContext::new(HeadlessMetrics::default(), KEY_SIZE);
    let width = WIDTH_EM * KEY_SIZE;
    draftex_layout::layout(&root, &mut ctx, width);

    let first = first_text(&root).context("document has no text to place a caret on")?;
    let mut state = EditState::new(Caret::new(first, 0));
    let mut history = History::new();

    for line in input.lines() {
        let line = line.context("reading REPL input")?;
        let (cmd, rest) = line.split_once(' ').unwrap_or((line.as_str(), ""));

        let mutated = match cmd {
            "left" => draftex_edit::recede(&mut state, &mut history)?,
            "right" => draftex_edit::advance(&mut state, &mut history)?,
            "up" => {
                state.up(APPROX_CHAR_WIDTH);
                false
            }
            "down" => {
                state.down(APPROX_CHAR_WIDTH);
                false
            }
            "home" => {
                state.home();
                false
            }
            "end" => {
                state.end();
                false
            }
            "tab" => {
                state.next_stop();
                false
            }
            "shift-tab" => {
                state.prev_stop();
                false
            }
            "backspace" => {
                draftex_edit::erase_prev(&mut state, &mut history)?;
                true
            }
            "delete" => {
                draftex_edit::erase_next(&mut state, &mut history)?;
                true
            }
            "insert" => {
                draftex_edit::insert_text(&mut state, &mut history, rest)?;
                true
            }
            "enter" => {
                draftex_edit::break_paragraph(&mut state, &mut history)?;
                true
            }
            "undo" => {
                history.undo()?;
                true
            }
            "redo" => {
                history.redo()?;
                true
            }
            "save" => {
                let out = draftex_serialize::serialize(&root);
                std::fs::write(file, out).with_context(|| format!("writing {}", file.display()))?;
                println!("saved");
                false
            }
            "quit" => break,
            "" => continue,
            other => bail!("unknown command: {other}"),
        };

        if mutated {
            draftex_tree::rules::enforce_rules(&root);
            draftex_layout::layout(&root, &mut ctx, width);
        }
        print_prompt(&state)?;
    }

    Ok(())
}

fn print_prompt(state: &EditState) -> Result<()> {
    let text = state.current.node.with_text(|t| t.as_str().to_string());
    println!("{text:?}@{}", state.current.offset);
    io::stdout().flush().ok();
    Ok(())
}

/// The first Text node of `root` in document order, or `None` for an empty document.
fn first_text(root: &NodeRef) -> Option<NodeRef> {
    if root.is_text() {
        return Some(root.clone());
    }
    draftex_caret::next_text(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scripted(file: &Path, script: &str) -> Result<()> {
        run_with(file, Cursor::new(script.as_bytes()))
    }

    #[test]
    fn insert_then_save_round_trips_through_the_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "hello world").unwrap();

        scripted(file.path(), "right\ninsert !\nsave\nquit\n").unwrap();

        let saved = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(saved, "h!ello world");
    }

    #[test]
    fn undo_restores_text_erased_by_backspace() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "hello").unwrap();

        scripted(file.path(), "right\nbackspace\nundo\nsave\nquit\n").unwrap();

        let saved = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(saved, "hello");
    }

    #[test]
    fn unknown_command_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "hello").unwrap();
        assert!(scripted(file.path(), "frobnicate\n").is_err());
    }
}
