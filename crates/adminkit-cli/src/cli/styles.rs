//! Styles for the admin shell.
//!
//! Templates never carry colors. They name what a piece of text *is*
//! (`{{ field.label | style("label") }}`) and the theme below decides how that
//! looks. Changing the look of every page is a change to this file only.
//!
//! Style names come in two layers:
//!
//! 1. Semantic names used by templates: `label`, `value`, `column`, `id`, ...
//! 2. Presentation names shared across semantics: `muted`, `title`, `error`, ...
//!
//! A semantic style is always defined in terms of a presentation style, so that
//! e.g. every de-emphasized piece of text looks the same.
//!
//! An unknown style name is not an error: the text is prefixed with
//! [`MISSING_STYLE_INDICATOR`] so typos in templates show up on screen.

use console::Style;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const MISSING_STYLE_INDICATOR: &str = "(!?)";

/// Style identifiers shared between templates and renderers.
pub mod names {
    pub const REGULAR: &str = "regular";
    pub const MUTED: &str = "muted";
    pub const FAINT: &str = "faint";
    pub const TITLE: &str = "title";
    pub const ERROR: &str = "error";
    pub const WARNING: &str = "warning";
    pub const SUCCESS: &str = "success";
    pub const INFO: &str = "info";
    // Page semantics
    pub const HEADER: &str = "header";
    pub const NAV: &str = "nav";
    pub const TAB: &str = "tab";
    pub const CONTAINER: &str = "container";
    pub const LABEL: &str = "label";
    pub const VALUE: &str = "value";
    pub const EMPTY: &str = "empty";
    pub const COLUMN: &str = "column";
    pub const ID: &str = "id";
    pub const KIND: &str = "kind";
    pub const COMMAND: &str = "command";
    pub const ICON: &str = "icon";
}

/// Named styles applied by the `style` template filter.
#[derive(Clone, Default)]
pub struct Theme {
    styles: HashMap<&'static str, Style>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: &'static str, style: Style) -> Self {
        self.styles.insert(name, style);
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    /// Styles `text`, or flags it when `name` is not a known style.
    pub fn apply(&self, name: &str, text: &str, use_color: bool) -> String {
        match self.styles.get(name) {
            Some(style) if use_color => style.apply_to(text).force_styling(true).to_string(),
            Some(_) => text.to_string(),
            None => format!("{} {}", MISSING_STYLE_INDICATOR, text),
        }
    }
}

pub static ADMIN_THEME: Lazy<Theme> = Lazy::new(build_theme);

fn build_theme() -> Theme {
    let regular = Style::new();
    let muted = Style::new().color256(245);
    let faint = Style::new().color256(240);
    let title = Style::new().bold();
    let accent = Style::new().cyan();

    Theme::new()
        .add(names::REGULAR, regular.clone())
        .add(names::MUTED, muted.clone())
        .add(names::FAINT, faint.clone())
        .add(names::TITLE, title.clone())
        .add(names::ERROR, Style::new().red().bold())
        .add(names::WARNING, Style::new().yellow().bold())
        .add(names::SUCCESS, Style::new().green())
        .add(names::INFO, muted.clone())
        .add(names::HEADER, title.clone().underlined())
        .add(names::NAV, accent.clone())
        .add(names::TAB, title.clone().yellow())
        .add(names::CONTAINER, title)
        .add(names::LABEL, muted.clone())
        .add(names::VALUE, regular)
        .add(names::EMPTY, faint.clone().italic())
        .add(names::COLUMN, muted.clone().bold())
        .add(names::ID, Style::new().yellow())
        .add(names::KIND, faint)
        .add(names::COMMAND, accent)
        .add(names::ICON, muted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_semantic_name_is_defined() {
        for name in [
            names::HEADER,
            names::NAV,
            names::TAB,
            names::CONTAINER,
            names::LABEL,
            names::VALUE,
            names::EMPTY,
            names::COLUMN,
            names::ID,
            names::KIND,
            names::COMMAND,
            names::ICON,
        ] {
            assert!(ADMIN_THEME.has(name), "missing style {}", name);
        }
    }

    #[test]
    fn plain_mode_leaves_text_alone() {
        assert_eq!(ADMIN_THEME.apply(names::TITLE, "Users", false), "Users");
    }

    #[test]
    fn color_mode_emits_ansi() {
        let styled = ADMIN_THEME.apply(names::ERROR, "boom", true);
        assert!(styled.contains("\u{1b}["));
        assert!(styled.contains("boom"));
    }

    #[test]
    fn unknown_style_is_flagged() {
        assert_eq!(ADMIN_THEME.apply("lable", "Name", false), "(!?) Name");
    }
}
