//! Doc printer.
//!
//! Walks a [`Doc`] with an explicit command stack. A group is printed flat
//! when it has no hard line and everything up to the next possible line
//! break fits in the remaining width; otherwise its lines break.

use crate::doc::Doc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

#[derive(Clone, Copy)]
struct Command<'d> {
    indent: usize,
    mode: Mode,
    doc: &'d Doc,
}

pub struct DocPrinter {
    width: usize,
    tab_width: usize,
    output: String,
    column: usize,
}

impl DocPrinter {
    pub fn new(width: usize, tab_width: usize) -> Self {
        DocPrinter {
            width,
            tab_width,
            output: String::new(),
            column: 0,
        }
    }

    /// Print `doc` and return the text.
    pub fn print(mut self, doc: &Doc) -> String {
        let mut stack = vec![Command {
            indent: 0,
            mode: Mode::Break,
            doc,
        }];
        while let Some(command) = stack.pop() {
            let Command { indent, mode, doc } = command;
            match doc {
                Doc::Nil => {}
                Doc::Text(text) => self.write(text),
                Doc::Concat(docs) => {
                    stack.extend(docs.iter().rev().map(|doc| Command { indent, mode, doc }));
                }
                Doc::Indent(inner) => stack.push(Command {
                    indent: indent + self.tab_width,
                    mode,
                    doc: inner,
                }),
                Doc::Align(width, inner) => stack.push(Command {
                    indent: indent + width,
                    mode,
                    doc: inner,
                }),
                Doc::Group(inner) => {
                    let flat = Command {
                        indent,
                        mode: Mode::Flat,
                        doc: inner,
                    };
                    let mode = if mode == Mode::Flat
                        || (!inner.has_hard_line() && self.fits(flat, &stack))
                    {
                        Mode::Flat
                    } else {
                        Mode::Break
                    };
                    stack.push(Command {
                        indent,
                        mode,
                        doc: inner,
                    });
                }
                Doc::Line => match mode {
                    Mode::Flat => self.write(" "),
                    Mode::Break => self.write_line(indent),
                },
                Doc::SoftLine => {
                    if mode == Mode::Break {
                        self.write_line(indent);
                    }
                }
                Doc::HardLine => self.write_line(indent),
                Doc::IfBreak { broken, flat } => {
                    let chosen = if mode == Mode::Break { broken } else { flat };
                    stack.push(Command {
                        indent,
                        mode,
                        doc: chosen.as_ref(),
                    });
                }
            }
        }
        self.output
    }

    /// Whether `next` printed flat, followed by `rest` up to its first line
    /// break, fits in what is left of the current line.
    fn fits(&self, next: Command<'_>, rest: &[Command<'_>]) -> bool {
        let mut remaining = self.width as isize - self.column as isize;
        let mut rest_index = rest.len();
        let mut stack: Vec<(Mode, &Doc)> = vec![(next.mode, next.doc)];
        loop {
            let (mode, doc) = match stack.pop() {
                Some(entry) => entry,
                None => {
                    if rest_index == 0 {
                        return true;
                    }
                    rest_index -= 1;
                    (rest[rest_index].mode, rest[rest_index].doc)
                }
            };
            match doc {
                Doc::Nil => {}
                Doc::Text(text) => {
                    remaining -= text.chars().count() as isize;
                    if remaining < 0 {
                        return false;
                    }
                    if text.contains('\n') {
                        return true;
                    }
                }
                Doc::Concat(docs) => stack.extend(docs.iter().rev().map(|d| (mode, d))),
                Doc::Indent(inner) | Doc::Align(_, inner) => stack.push((mode, inner.as_ref())),
                Doc::Group(inner) => {
                    let mode = if inner.has_hard_line() { Mode::Break } else { mode };
                    stack.push((mode, inner.as_ref()));
                }
                Doc::Line => {
                    if mode == Mode::Break {
                        return true;
                    }
                    remaining -= 1;
                    if remaining < 0 {
                        return false;
                    }
                }
                Doc::SoftLine => {
                    if mode == Mode::Break {
                        return true;
                    }
                }
                Doc::HardLine => return true,
                Doc::IfBreak { broken, flat } => {
                    let chosen = if mode == Mode::Break { broken } else { flat };
                    stack.push((mode, chosen.as_ref()));
                }
            }
        }
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
        match text.rfind('\n') {
            Some(pos) => self.column = text[pos + 1..].chars().count(),
            None => self.column += text.chars().count(),
        }
    }

    fn write_line(&mut self, indent: usize) {
        let trimmed = self.output.trim_end_matches([' ', '\t']).len();
        self.output.truncate(trimmed);
        self.output.push('\n');
        for _ in 0..indent {
            self.output.push(' ');
        }
        self.column = indent;
    }
}

#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod printer_tests;
