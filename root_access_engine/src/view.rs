//! View module.
//!
//! Handlers never print. Everything to be shown in a turn is pushed into the
//! [`View`] and displayed in one pass at the end of the turn: the command response
//! first, then NPC activity, then the summary and any reminder.

use log::info;
use textwrap::{fill, termwidth};
use variantly::Variantly;

use crate::session::TurnReport;
use crate::style::GameStyle;

const ICON_NPC: &str = "\u{25B8}"; // ▸
const ICON_SUMMARY: &str = "\u{2261}"; // ≡
const ICON_REMINDER: &str = "\u{2709}"; // ✉
const ICON_ERROR: &str = "⚠︎";

/// Something to be displayed at the end of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum ViewItem {
    Banner { title: String, intro: String },
    Response(String),
    Error(String),
    NpcLine(String),
    Summary(String),
    Reminder(String),
}
impl ViewItem {
    /// Display order within a frame; lower goes first.
    fn section(&self) -> u8 {
        match self {
            ViewItem::Banner { .. } => 0,
            ViewItem::Response(_) | ViewItem::Error(_) => 1,
            ViewItem::NpcLine(_) => 2,
            ViewItem::Summary(_) => 3,
            ViewItem::Reminder(_) => 4,
        }
    }
}

/// Aggregates one turn's output.
#[derive(Debug, Clone)]
pub struct View {
    pub width: usize,
    pub items: Vec<ViewItem>,
}
impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}
impl View {
    pub fn new() -> Self {
        Self {
            width: termwidth(),
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: ViewItem) {
        self.items.push(item);
    }

    /// Queue everything in a turn report.
    pub fn push_report(&mut self, report: &TurnReport) {
        self.items
            .extend(report.response.iter().cloned().map(ViewItem::Response));
        self.items.extend(report.shown.iter().cloned().map(ViewItem::NpcLine));
        if let Some(summary) = &report.summary {
            self.items.push(ViewItem::Summary(summary.clone()));
        }
        if let Some(reminder) = &report.reminder {
            self.items.push(ViewItem::Reminder(reminder.clone()));
        }
    }

    /// Plain-text rendering of the pending frame, in display order.
    pub fn render_plain(&self) -> Vec<String> {
        let mut items: Vec<&ViewItem> = self.items.iter().collect();
        items.sort_by_key(|item| item.section());
        items
            .into_iter()
            .flat_map(|item| match item {
                ViewItem::Banner { title, intro } => vec![title.clone(), intro.clone()],
                ViewItem::Response(text) | ViewItem::Summary(text) | ViewItem::Reminder(text) => {
                    text.lines().map(String::from).collect()
                },
                ViewItem::Error(text) => vec![format!("{ICON_ERROR} {text}")],
                ViewItem::NpcLine(text) => vec![format!("{ICON_NPC} {text}")],
            })
            .collect()
    }

    /// Print the frame and clear it.
    pub fn flush(&mut self) {
        self.width = termwidth();
        let width = self.width;
        let mut items = std::mem::take(&mut self.items);
        items.sort_by_key(ViewItem::section);
        for item in &items {
            match item {
                ViewItem::Banner { title, intro } => {
                    println!("\n{}", title.title_style());
                    println!("{}\n", fill(intro, width).intro_style());
                },
                ViewItem::Response(text) => println!("{}", fill(text, width).response_style()),
                ViewItem::Error(text) => {
                    println!("{} {}", ICON_ERROR.error_style(), fill(text, width).error_style());
                },
                ViewItem::NpcLine(text) => {
                    println!("{} {}", ICON_NPC.section_style(), fill(text, width).npc_line_style());
                },
                ViewItem::Summary(text) => {
                    for line in text.lines() {
                        println!("{} {}", ICON_SUMMARY.section_style(), fill(line, width).summary_style());
                    }
                },
                ViewItem::Reminder(text) => {
                    println!("{} {}", ICON_REMINDER.section_style(), text.reminder_style());
                },
            }
        }
        info!("view flushed {} item(s)", items.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_is_rendered_in_section_order() {
        let report = TurnReport {
            response: vec!["You hide in the Dumpster.".into()],
            shown: vec!["Mara gives you the Soda Can.".into()],
            summary: Some("A, B are standing around.".into()),
            reminder: Some("You have 1 unread notification. Type 'notifications' to view it.".into()),
            turn_advanced: true,
            quit: false,
        };
        let mut view = View::new();
        view.push(ViewItem::Reminder("early".into()));
        view.push_report(&report);
        let lines = view.render_plain();
        assert_eq!(lines[0], "You hide in the Dumpster.");
        assert_eq!(lines[1], format!("{ICON_NPC} Mara gives you the Soda Can."));
        assert_eq!(lines[2], "A, B are standing around.");
        assert_eq!(lines[3], "early");
        assert_eq!(lines.len(), 5);
    }
}
