//! Terminal styling
//!
//! Maps the semantic line styles onto terminal colors. A `Styler` is created
//! once per process and handed to the output adapter.

use colored::Colorize;
use std::ffi::OsStr;
use std::io::IsTerminal;

use crate::core::model::LineStyle;

/// Applies colors to directory, file, error and header text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styler {
    enabled: bool,
}

impl Styler {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A styler that leaves all text unchanged
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Colors on unless disabled by flag or a non-empty `NO_COLOR`, and only
    /// when stdout is a terminal
    pub fn detect(no_color: bool) -> Self {
        let no_color = no_color || no_color_env(std::env::var_os("NO_COLOR").as_deref());
        Self::new(!no_color && std::io::stdout().is_terminal())
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn directory(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().to_string())
    }

    pub fn file(&self, text: &str) -> String {
        self.paint(text, |t| t.green().to_string())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.red().to_string())
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.magenta().bold().to_string())
    }

    /// Style text by its semantic category
    pub fn apply(&self, style: LineStyle, text: &str) -> String {
        match style {
            LineStyle::Directory => self.directory(text),
            LineStyle::File => self.file(text),
            LineStyle::Error => self.error(text),
        }
    }

    fn paint(&self, text: &str, f: impl FnOnce(&str) -> String) -> String {
        if self.enabled {
            f(text)
        } else {
            text.to_string()
        }
    }
}

/// `NO_COLOR` disables colors when set to any non-empty value
fn no_color_env(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

impl Default for Styler {
    fn default() -> Self {
        Self::plain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_styler_is_identity() {
        let styler = Styler::plain();
        assert_eq!(styler.directory("src"), "src");
        assert_eq!(styler.file("main.rs"), "main.rs");
        assert_eq!(styler.error("oops"), "oops");
        assert_eq!(styler.header("Directory"), "Directory");
        assert!(!styler.is_enabled());
    }

    #[test]
    fn test_enabled_styler_keeps_text() {
        colored::control::set_override(true);
        let styler = Styler::new(true);
        let styled = styler.apply(LineStyle::Error, "denied");
        assert!(styled.contains("denied"));
        assert!(styled.starts_with("\u{1b}["));
    }

    #[test]
    fn test_no_color_env_values() {
        assert!(no_color_env(Some(OsStr::new("1"))));
        assert!(no_color_env(Some(OsStr::new("yes"))));
        assert!(no_color_env(Some(OsStr::new("false"))));
        assert!(!no_color_env(Some(OsStr::new(""))));
        assert!(!no_color_env(None));
    }

    #[test]
    fn test_detect_respects_no_color() {
        assert!(!Styler::detect(true).is_enabled());
    }
}
