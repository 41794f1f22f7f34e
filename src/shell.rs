// Interactive shell: one line in, one event dispatched, list re-rendered

use crate::event::{self, SHELL_HELP, ShellInput};
use crate::render::{View, render_text};
use crate::state::Change;
use crate::storage::Storage;
use crate::store::TaskListStore;
use eyre::Result;
use std::io::{BufRead, Write};
use tracing::debug;

fn render<S: Storage, W: Write>(store: &TaskListStore<S>, out: &mut W, color: bool) -> Result<()> {
    writeln!(out, "{}", render_text(&View::from_state(store.state()), color))?;
    out.flush()?;
    Ok(())
}

/// Drive `store` from `input` until end of input or `quit`.
///
/// Each line runs to completion (transition, persist, render) before the
/// next is read. Parse errors are reported on `out` and the loop goes on.
pub fn run<S, R, W>(store: &mut TaskListStore<S>, input: R, out: &mut W, color: bool) -> Result<()>
where
    S: Storage,
    R: BufRead,
    W: Write,
{
    writeln!(out, "{}\n", SHELL_HELP)?;
    render(store, out, color)?;

    for line in input.lines() {
        let line = line?;
        let parsed = match event::parse_line(&line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                continue;
            }
        };

        let change = match parsed {
            ShellInput::Event(ev) => store.dispatch(ev),
            ShellInput::Submit => store.submit_pending(),
            ShellInput::List => Change::View,
            ShellInput::Help => {
                writeln!(out, "{}", SHELL_HELP)?;
                Change::Unchanged
            }
            ShellInput::Quit => break,
        };

        debug!(?change, "Shell line handled");
        if change.needs_render() {
            render(store, out, color)?;
        }
    }

    Ok(())
}
