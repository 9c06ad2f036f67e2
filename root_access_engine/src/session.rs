//! Session and turn driver.
//!
//! A [`Session`] owns everything mutable in one game: the world, the behavior
//! settings, the coordinator, the message pipeline and the random source. Each
//! line of input is parsed, handled, and, if it was a world action, followed by
//! the NPC phase, effect ticks, the summary flush and the reminder check.
//!
//! Handler submodules:
//! - `admin`: behavior settings, the NPC switch and notifications
//! - `stealth`: hiding and escape items
//! - `tamper`: hacking NPCs and triggering hazards
//! - `movement`: walking between areas
//! - `system`: look and help

pub mod admin;
pub mod movement;
pub mod stealth;
pub mod system;
pub mod tamper;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use root_access_data::PipelineDef;

use crate::behavior::BehaviorSettings;
use crate::command::{Command, CommandError, parse_command};
use crate::coordinator::Coordinator;
use crate::health::LivingEntity;
use crate::message::MessagePipeline;
use crate::world::RootWorld;

/// Everything that came out of one line of input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Direct response to the command (or its failure text).
    pub response: Vec<String>,
    /// Lines that made it through the throttle this turn.
    pub shown: Vec<String>,
    pub summary: Option<String>,
    pub reminder: Option<String>,
    pub turn_advanced: bool,
    pub quit: bool,
}

/// One running game.
pub struct Session<R: Rng = StdRng> {
    pub world: RootWorld,
    pub settings: BehaviorSettings,
    pub coordinator: Coordinator,
    pub pipeline: MessagePipeline,
    rng: R,
}
impl Session<StdRng> {
    /// Start a session, seeding the random source when `seed` is given.
    pub fn new(world: RootWorld, config: &PipelineDef, seed: Option<u64>) -> Session<StdRng> {
        let rng = match seed {
            Some(seed) => {
                info!("session seeded with {seed}");
                StdRng::seed_from_u64(seed)
            },
            None => StdRng::from_os_rng(),
        };
        Session::with_rng(world, config, rng)
    }
}
impl<R: Rng> Session<R> {
    pub fn with_rng(world: RootWorld, config: &PipelineDef, rng: R) -> Session<R> {
        Session {
            world,
            settings: BehaviorSettings::from_def(config),
            coordinator: Coordinator::from_def(&config.coordinator),
            pipeline: MessagePipeline::from_def(config),
            rng,
        }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Handle one line of input.
    pub fn handle_input(&mut self, input: &str) -> TurnReport {
        let command = parse_command(input);
        self.handle_command(&command)
    }

    pub fn handle_command(&mut self, command: &Command) -> TurnReport {
        let mut report = TurnReport::default();
        if command.is_quit() {
            report.quit = true;
            report.response.push("You jack out of the system. Goodbye.".to_string());
            return report;
        }
        if command.takes_turn() {
            self.pipeline.start_turn();
        }

        match self.dispatch(command) {
            Ok(lines) => report.response = lines,
            Err(err) => {
                if let CommandError::Internal(e) = &err {
                    warn!("command {command:?} failed: {e:#}");
                }
                report.response.push(err.to_string());
                return report;
            },
        }
        if command.takes_turn() {
            self.run_world_turn(&mut report);
        }
        report
    }

    fn dispatch(&mut self, command: &Command) -> Result<Vec<String>, CommandError> {
        match command {
            Command::BehaviorSettings => Ok(vec![admin::list_settings_handler(&self.settings)]),
            Command::SetFrequency { behavior, value } => {
                admin::set_frequency_handler(&mut self.settings, behavior, value).map(|line| vec![line])
            },
            Command::SetCooldown { behavior, value } => {
                admin::set_cooldown_handler(&mut self.settings, behavior, value).map(|line| vec![line])
            },
            Command::SetNpcsEnabled(on) => Ok(vec![admin::npcs_toggle_handler(&mut self.settings, *on)]),
            Command::Notifications { count, category } => admin::read_notifications_handler(
                &mut self.pipeline.notifications,
                count.as_deref(),
                category.as_deref(),
            )
            .map(|text| vec![text]),
            Command::ClearNotifications => Ok(vec![admin::clear_notifications_handler(
                &mut self.pipeline.notifications,
            )]),
            Command::Hide(spot) => stealth::hide_handler(&mut self.world, spot.as_deref()).map(|line| vec![line]),
            Command::Unhide => Ok(vec![stealth::unhide_handler(&mut self.world)]),
            Command::UseItem(item) => stealth::use_item_handler(&mut self.world, item).map(|line| vec![line]),
            Command::Hack { npc, hack } => tamper::hack_handler(&mut self.world, npc, hack).map(|line| vec![line]),
            Command::Trigger(hazard) => {
                tamper::trigger_handler(&mut self.world, &mut self.pipeline, hazard, &mut self.rng)?;
                Ok(Vec::new())
            },
            Command::MoveTo(dest) => movement::move_to_handler(&mut self.world, dest),
            Command::Wait => Ok(vec!["Time passes.".to_string()]),
            Command::Look => system::look_handler(&self.world).map_err(CommandError::from),
            Command::Help => Ok(vec![system::help_text()]),
            Command::Usage(usage) => Err(CommandError::Usage(*usage)),
            Command::Unknown => Ok(vec!["Didn't quite catch that? Type 'help' for commands.".to_string()]),
            Command::Quit => Ok(Vec::new()),
        }
    }

    /// The NPC phase and end-of-turn bookkeeping. The pipeline has already been
    /// reset for this turn and may hold lines from the player's action.
    pub fn run_world_turn(&mut self, report: &mut TurnReport) {
        self.world.turn_count += 1;
        let turn = self.world.turn_count;
        info!("================> BEGIN TURN {turn} <================");

        let actors = self
            .world
            .player_area_id()
            .map(|area_id| self.world.npcs_in_area(area_id))
            .unwrap_or_default();
        let actions = self
            .coordinator
            .process_turn(&mut self.world, &actors, &self.settings, &mut self.rng);
        for action in &actions {
            self.pipeline.submit(&action.text, Some(&action.source));
        }

        for (holder, effect) in self.world.tick_effects() {
            info!("{effect} wore off for {holder}");
        }

        report.turn_advanced = true;
        report.shown = self.pipeline.shown().iter().map(|m| m.text.clone()).collect();
        report.summary = self.pipeline.flush_summary();
        report.reminder = self.pipeline.notifications.reminder(turn);

        if !self.world.player.is_alive() {
            warn!("player knocked out on turn {turn}");
            self.world.player.respawn();
            let home = self
                .world
                .player_area_ref()
                .map_or_else(|_| "somewhere safe".to_string(), |area| format!("the {}", area.name));
            report.response.push(format!(
                "Everything goes dark. You come to in {home}, patched up and forgotten by the gangs."
            ));
        }
    }
}
