use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::node::{Node, Value};
use crate::slots::Outcome;

/// Small wrapper around stdout/stderr printing to provide consistent, colored
/// user-facing messages. Colors are enabled only when output is a TTY.
fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Write a slot outcome for scripts: the value on its own line, then one line
/// per result child (`name: value` when named), nested children indented.
/// Binary values are written raw so `file.load-binary` can be piped.
pub fn print_outcome(outcome: &Outcome) -> io::Result<()> {
    let stdout = io::stdout();
    let mut w = stdout.lock();
    write_outcome(&mut w, outcome)?;
    w.flush()
}

pub fn write_outcome<W: Write>(w: &mut W, outcome: &Outcome) -> io::Result<()> {
    match &outcome.value {
        Some(Value::Bytes(bytes)) => w.write_all(bytes)?,
        Some(v) => writeln!(w, "{v}")?,
        None => {}
    }
    for child in &outcome.children {
        write_node(w, child, 0)?;
    }
    Ok(())
}

fn write_node<W: Write>(w: &mut W, node: &Node, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    match (&node.value, node.name.is_empty()) {
        (Some(v), true) => writeln!(w, "{indent}{v}")?,
        (Some(v), false) => writeln!(w, "{indent}{}: {v}", node.name)?,
        (None, _) => writeln!(w, "{indent}{}", node.name)?,
    }
    for child in &node.children {
        write_node(w, child, depth + 1)?;
    }
    Ok(())
}
