//! Escalation filter and the durable notification log.
//!
//! Only a handful of message types are worth keeping once the turn scrolls away:
//! gifts, gardening results, hazard triggers and detailed hallucinations. Those are
//! copied here and can be read back later with the `notifications` command.

use std::collections::VecDeque;
use std::fmt::{Display, Write as _};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use variantly::Variantly;

use crate::message::{Message, MessageType, Priority};

/// Types that may escalate into the log.
pub const ESCALATED_TYPES: [MessageType; 4] = [
    MessageType::Gift,
    MessageType::Gardening,
    MessageType::HazardTrigger,
    MessageType::HallucinationDetail,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Variantly)]
pub enum NotificationCategory {
    Combat,
    Hazard,
    Item,
    Npc,
    Player,
    General,
}
impl NotificationCategory {
    pub fn key(self) -> &'static str {
        match self {
            NotificationCategory::Combat => "combat",
            NotificationCategory::Hazard => "hazard",
            NotificationCategory::Item => "item",
            NotificationCategory::Npc => "npc",
            NotificationCategory::Player => "player",
            NotificationCategory::General => "general",
        }
    }

    pub fn from_key(key: &str) -> Option<NotificationCategory> {
        let found = match key.trim().to_lowercase().as_str() {
            "combat" => NotificationCategory::Combat,
            "hazard" => NotificationCategory::Hazard,
            "item" | "items" => NotificationCategory::Item,
            "npc" | "npcs" => NotificationCategory::Npc,
            "player" => NotificationCategory::Player,
            "general" => NotificationCategory::General,
            _ => return None,
        };
        Some(found)
    }
}
impl Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub category: NotificationCategory,
    /// 1 (trivia) to 5 (urgent).
    pub importance: u8,
    pub read: bool,
    /// Creation order; larger is newer. Assigned by the log.
    pub order: u64,
}

/// Decides which shown messages become notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscalationFilter;
impl EscalationFilter {
    pub fn should_escalate(self, message: &Message) -> bool {
        ESCALATED_TYPES.contains(&message.kind) && message.priority >= Priority::Medium
    }

    pub fn category(self, message: &Message) -> NotificationCategory {
        match message.kind {
            MessageType::Attack | MessageType::Detection => NotificationCategory::Combat,
            MessageType::HazardTrigger | MessageType::ResistHazard => NotificationCategory::Hazard,
            MessageType::Gift => NotificationCategory::Item,
            MessageType::Talk | MessageType::Interact | MessageType::Idle | MessageType::Unnoticed => {
                NotificationCategory::Npc
            },
            _ if message.source.as_ref().is_some_and(|s| s.is_player) => NotificationCategory::Player,
            _ => NotificationCategory::General,
        }
    }

    /// The notification for `message`, if it qualifies.
    pub fn escalate(self, message: &Message) -> Option<Notification> {
        if !self.should_escalate(message) {
            return None;
        }
        Some(Notification {
            text: message.text.clone(),
            category: self.category(message),
            importance: message.priority.importance(),
            read: false,
            order: 0,
        })
    }
}

/// Bounded log of escalated messages.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
    max_entries: usize,
    reminder_every: u64,
    last_reminder: u64,
    next_order: u64,
}
impl Default for NotificationLog {
    fn default() -> Self {
        NotificationLog::new(50, 5)
    }
}
impl NotificationLog {
    pub fn new(max_entries: usize, reminder_every: u64) -> NotificationLog {
        NotificationLog {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
            reminder_every,
            last_reminder: 0,
            next_order: 0,
        }
    }

    /// Append a notification, dropping the oldest entry when full.
    pub fn push(&mut self, mut note: Notification) {
        note.order = self.next_order;
        self.next_order += 1;
        self.entries.push_back(note);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Read up to `count` unread notifications, most important (then newest) first,
    /// marking them read.
    pub fn read(&mut self, count: usize, category: Option<NotificationCategory>) -> String {
        if self.unread_count() == 0 {
            return "You have no notifications.".to_string();
        }
        let mut picked: Vec<&mut Notification> = self
            .entries
            .iter_mut()
            .filter(|n| !n.read && category.is_none_or(|c| n.category == c))
            .collect();
        if picked.is_empty() {
            return match category {
                Some(c) => format!("No {c} notifications found."),
                None => "You have no notifications.".to_string(),
            };
        }
        picked.sort_by(|a, b| b.importance.cmp(&a.importance).then(b.order.cmp(&a.order)));
        picked.truncate(count.max(1));

        // group by category, keeping the order categories first appear in
        let mut groups: Vec<(NotificationCategory, Vec<String>)> = Vec::new();
        for note in &mut picked {
            note.read = true;
            match groups.iter_mut().find(|(c, _)| *c == note.category) {
                Some((_, lines)) => lines.push(note.text.clone()),
                None => groups.push((note.category, vec![note.text.clone()])),
            }
        }
        let shown = picked.len();

        let mut out = format!("--- Notifications ({shown}) ---");
        for (category, lines) in groups {
            let _ = write!(out, "\n\n[{}]", category.key().to_uppercase());
            for (i, line) in lines.iter().enumerate() {
                let _ = write!(out, "\n{}. {line}", i + 1);
            }
        }
        let remaining = self.unread_count();
        if remaining > 0 {
            let _ = write!(out, "\n\nRemaining unread: {remaining}");
        }
        info!("player read {shown} notification(s), {remaining} unread remain");
        out
    }

    pub fn clear(&mut self) -> String {
        self.entries.clear();
        info!("notification log cleared");
        "All notifications cleared.".to_string()
    }

    /// Reminder line, produced at most once every `reminder_every` turns while
    /// unread notifications exist.
    pub fn reminder(&mut self, turn: u64) -> Option<String> {
        let unread = self.unread_count();
        if unread == 0 || self.reminder_every == 0 || turn.saturating_sub(self.last_reminder) < self.reminder_every
        {
            return None;
        }
        self.last_reminder = turn;
        debug!("reminding player of {unread} unread notification(s) on turn {turn}");
        Some(if unread == 1 {
            "You have 1 unread notification. Type 'notifications' to view it.".to_string()
        } else {
            format!("You have {unread} unread notifications. Type 'notifications' to view them.")
        })
    }
}
