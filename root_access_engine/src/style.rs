//! Style module.
//!
//! The [`GameStyle`] trait gives `&str` and `String` a set of convenience methods
//! for colouring output consistently across the game.

use colored::{ColoredString, Colorize};

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn title_style(&self) -> ColoredString;
    fn intro_style(&self) -> ColoredString;
    fn response_style(&self) -> ColoredString;
    fn npc_line_style(&self) -> ColoredString;
    fn summary_style(&self) -> ColoredString;
    fn reminder_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
    fn section_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn title_style(&self) -> ColoredString {
        self.truecolor(0, 255, 140).bold()
    }
    fn intro_style(&self) -> ColoredString {
        self.truecolor(180, 200, 190).italic()
    }
    fn response_style(&self) -> ColoredString {
        self.normal()
    }
    fn npc_line_style(&self) -> ColoredString {
        self.truecolor(230, 200, 120)
    }
    fn summary_style(&self) -> ColoredString {
        self.truecolor(140, 150, 160).italic()
    }
    fn reminder_style(&self) -> ColoredString {
        self.truecolor(90, 170, 255).dimmed()
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
    fn prompt_style(&self) -> ColoredString {
        self.truecolor(0, 200, 120).bold()
    }
    fn section_style(&self) -> ColoredString {
        self.truecolor(75, 80, 75)
    }
}

impl GameStyle for String {
    fn title_style(&self) -> ColoredString {
        self.as_str().title_style()
    }
    fn intro_style(&self) -> ColoredString {
        self.as_str().intro_style()
    }
    fn response_style(&self) -> ColoredString {
        self.as_str().response_style()
    }
    fn npc_line_style(&self) -> ColoredString {
        self.as_str().npc_line_style()
    }
    fn summary_style(&self) -> ColoredString {
        self.as_str().summary_style()
    }
    fn reminder_style(&self) -> ColoredString {
        self.as_str().reminder_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
    fn section_style(&self) -> ColoredString {
        self.as_str().section_style()
    }
}
