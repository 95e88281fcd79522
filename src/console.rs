use std::fmt;


/// An ANSI color code for color terminals.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Color {
    Red,
    Yellow,
}

/// Returns the text in the given color if standard error is a color terminal (and `NO_COLOR` is
/// not set), otherwise unchanged.
#[cfg(feature = "console")]
pub fn paint_for_stderr(text: &str, color: Color) -> String {
    let styled = console::style(text).for_stderr().bold();
    let colored = match color {
        Color::Red => styled.red(),
        Color::Yellow => styled.yellow(),
    };
    colored.to_string()
}

#[cfg(not(feature = "console"))]
pub fn paint_for_stderr(text: &str, _color: Color) -> String {
    text.to_owned()
}

pub fn report_error<M: fmt::Display>(message: M) {
    eprintln!("{} {}", paint_for_stderr("error:", Color::Red), message);
}

pub fn report_warning<M: fmt::Display>(message: M) {
    eprintln!("{} {}", paint_for_stderr("warning:", Color::Yellow), message);
}
