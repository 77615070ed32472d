// Copyright 2025 linuxiano85
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Annotated console output.
//!
//! Every status line carries a bracketed tag so the output stays readable
//! without colour; on a terminal the tag is coloured as well.

use crossterm::style::{style, Color, Stylize};
use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

/// Kind of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Info,
    Warning,
    Success,
    Error,
}

impl LineKind {
    fn tag(self) -> &'static str {
        match self {
            LineKind::Info => "[INFO]",
            LineKind::Warning => "[WARN]",
            LineKind::Success => "[ OK ]",
            LineKind::Error => "[FAIL]",
        }
    }

    fn color(self) -> Color {
        match self {
            LineKind::Info => Color::Cyan,
            LineKind::Warning => Color::Yellow,
            LineKind::Success => Color::Green,
            LineKind::Error => Color::Red,
        }
    }
}

/// Console writer for progress and status lines.
///
/// Output is best-effort: a closed stdout must not turn a finished backup
/// into a failed one, so write errors are dropped.
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<io::Stdout> {
    /// Console on stdout, coloured only when stdout is a terminal.
    pub fn stdout(allow_color: bool) -> Self {
        let out = io::stdout();
        let color = allow_color && out.is_terminal();
        Self { out, color }
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn info(&mut self, message: impl Display) {
        self.status(LineKind::Info, message);
    }

    pub fn warn(&mut self, message: impl Display) {
        self.status(LineKind::Warning, message);
    }

    pub fn success(&mut self, message: impl Display) {
        self.status(LineKind::Success, message);
    }

    pub fn error(&mut self, message: impl Display) {
        self.status(LineKind::Error, message);
    }

    /// Untagged line, used for tables and indented details.
    pub fn line(&mut self, message: impl Display) {
        let _ = writeln!(self.out, "{}", message);
    }

    pub fn status(&mut self, kind: LineKind, message: impl Display) {
        let _ = if self.color {
            writeln!(
                self.out,
                "{} {}",
                style(kind.tag()).with(kind.color()).bold(),
                message
            )
        } else {
            writeln!(self.out, "{} {}", kind.tag(), message)
        };
    }

    pub fn flush(&mut self) {
        let _ = self.out.flush();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
