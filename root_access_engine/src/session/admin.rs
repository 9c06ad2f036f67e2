//! Admin handlers: behavior tuning, the NPC switch and the notification log.
//!
//! Every state change made here is logged at `warn!` so it stands out in the log
//! as an audit trail.

use log::warn;

use crate::behavior::{BehaviorSettings, BehaviorType};
use crate::command::CommandError;
use crate::notification::{NotificationCategory, NotificationLog};

/// Default number of notifications shown by `notifications`.
pub const DEFAULT_READ_COUNT: usize = 5;

pub fn list_settings_handler(settings: &BehaviorSettings) -> String {
    settings.describe()
}

/// Resolve `all` or a single behavior key.
fn targets(behavior: &str) -> Result<Vec<BehaviorType>, CommandError> {
    if behavior.eq_ignore_ascii_case("all") {
        return Ok(BehaviorType::ALL.to_vec());
    }
    BehaviorType::from_key(behavior)
        .map(|kind| vec![kind])
        .ok_or_else(|| CommandError::UnknownBehavior(behavior.to_string()))
}

fn describe_targets(behavior: &str, kinds: &[BehaviorType]) -> String {
    match kinds {
        [one] => one.to_string(),
        _ => format!("{} behaviors", behavior.to_lowercase()),
    }
}

/// `behavior-settings <behavior|all> frequency <0-100>`
pub fn set_frequency_handler(
    settings: &mut BehaviorSettings,
    behavior: &str,
    value: &str,
) -> Result<String, CommandError> {
    let kinds = targets(behavior)?;
    let percent: u32 = value
        .trim()
        .parse()
        .ok()
        .filter(|pct| *pct <= 100)
        .ok_or(CommandError::FrequencyOutOfRange)?;
    for kind in &kinds {
        settings.set_frequency_percent(*kind, percent);
    }
    let what = describe_targets(behavior, &kinds);
    warn!("ADMIN: frequency of {what} set to {percent}%");
    Ok(format!("Set frequency of {what} to {percent}%."))
}

/// `behavior-settings <behavior|all> cooldown <turns>`
pub fn set_cooldown_handler(
    settings: &mut BehaviorSettings,
    behavior: &str,
    value: &str,
) -> Result<String, CommandError> {
    let kinds = targets(behavior)?;
    let turns: u32 = value.trim().parse().map_err(|_| CommandError::InvalidCooldown)?;
    for kind in &kinds {
        settings.set_cooldown(*kind, turns);
    }
    let what = describe_targets(behavior, &kinds);
    warn!("ADMIN: cooldown of {what} set to {turns} turns");
    Ok(format!("Set cooldown of {what} to {turns} turns."))
}

pub fn npcs_toggle_handler(settings: &mut BehaviorSettings, on: bool) -> String {
    settings.npcs_enabled = on;
    warn!("ADMIN: NPC behaviors {}", if on { "enabled" } else { "disabled" });
    if on {
        "NPC behaviors enabled.".to_string()
    } else {
        "NPC behaviors disabled.".to_string()
    }
}

/// `notifications [count] [category]`
pub fn read_notifications_handler(
    log: &mut NotificationLog,
    count: Option<&str>,
    category: Option<&str>,
) -> Result<String, CommandError> {
    let count = match count {
        Some(text) => text
            .parse::<usize>()
            .map_err(|_| CommandError::Usage("notifications [count] [category]"))?,
        None => DEFAULT_READ_COUNT,
    };
    let category = category
        .map(|key| NotificationCategory::from_key(key).ok_or_else(|| CommandError::UnknownCategory(key.to_string())))
        .transpose()?;
    Ok(log.read(count, category))
}

pub fn clear_notifications_handler(log: &mut NotificationLog) -> String {
    warn!("ADMIN: notification log cleared ({} entries)", log.len());
    log.clear()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_out_of_range_leaves_settings_untouched() {
        let mut settings = BehaviorSettings::default();
        let before = settings.clone();
        let err = set_frequency_handler(&mut settings, "fight", "150").unwrap_err();
        assert_eq!(err.to_string(), "Frequency must be between 0 and 100.");
        let err = set_frequency_handler(&mut settings, "fight", "-5").unwrap_err();
        assert!(matches!(err, CommandError::FrequencyOutOfRange));
        assert_eq!(settings, before);
    }

    #[test]
    fn unknown_behavior_is_reported_by_name() {
        let mut settings = BehaviorSettings::default();
        let err = set_cooldown_handler(&mut settings, "juggle", "2").unwrap_err();
        assert_eq!(err.to_string(), "Unknown behavior: juggle");
    }

    #[test]
    fn negative_cooldown_is_rejected() {
        let mut settings = BehaviorSettings::default();
        let err = set_cooldown_handler(&mut settings, "talk", "-1").unwrap_err();
        assert_eq!(err.to_string(), "Cooldown must be a non-negative integer.");
    }

    #[test]
    fn all_applies_to_every_behavior() {
        let mut settings = BehaviorSettings::default();
        let line = set_frequency_handler(&mut settings, "all", "40").unwrap();
        assert_eq!(line, "Set frequency of all behaviors to 40%.");
        assert!(
            BehaviorType::ALL
                .iter()
                .all(|kind| settings.params(*kind).frequency_percent() == 40)
        );
        let line = set_cooldown_handler(&mut settings, "gift", "0").unwrap();
        assert_eq!(line, "Set cooldown of gift to 0 turns.");
    }

    #[test]
    fn bad_category_is_an_error() {
        let mut log = NotificationLog::default();
        assert!(matches!(
            read_notifications_handler(&mut log, None, Some("gossip")),
            Err(CommandError::UnknownCategory(_))
        ));
        assert_eq!(
            read_notifications_handler(&mut log, None, None).unwrap(),
            "You have no notifications."
        );
    }
}
