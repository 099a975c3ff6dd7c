pub mod catalog;
pub mod choice;
pub mod node;
pub mod runner;
pub mod scenario;
pub mod state;

use anyhow::{Context, Result};
use log::{debug, info, log_enabled, trace, warn, Level};

use crate::console::Console;
use crate::game::catalog::NodeCatalog;
use crate::game::node::{QUIT, RESTART};
use crate::game::runner::{NodeRunner, TurnOutcome};
use crate::game::state::Session;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Node every round starts from.
    pub entry_node: String,
    /// Clear the terminal before each node is shown.
    pub clear_screen: bool,
    /// Shown in the banner above every node.
    pub title: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            entry_node: scenario::ENTRY_NODE.into(),
            clear_screen: true,
            title: "The Simple Choice".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Game loop
// ---------------------------------------------------------------------------

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    Quit,
    Restart,
}

/// Plays rounds until the player quits. Knows nothing about the story
/// beyond the two terminal signals.
pub struct GameLoop<'a> {
    catalog: &'a NodeCatalog,
    config: &'a GameConfig,
    session: Session,
    rounds_played: usize,
}

impl<'a> GameLoop<'a> {
    pub fn new(catalog: &'a NodeCatalog, config: &'a GameConfig) -> Self {
        Self {
            catalog,
            config,
            session: Session::default(),
            rounds_played: 0,
        }
    }

    /// State as the last round left it.
    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub fn rounds_played(&self) -> usize {
        self.rounds_played
    }

    pub fn run<C: Console>(&mut self, console: &mut C) -> Result<()> {
        loop {
            match self.play_round(console)? {
                RoundEnd::Restart => {
                    info!("Player chose to restart");
                    console.write_line("\nRestarting game...")?;
                }
                RoundEnd::Quit => {
                    if log_enabled!(Level::Trace) {
                        let snapshot = serde_json::to_string(&self.session)
                            .context("failed to serialize session")?;
                        trace!("Final session: {snapshot}");
                    }
                    console.write_line("\nThanks for playing!")?;
                    return Ok(());
                }
            }
        }
    }

    /// One round: fresh state, start at the entry node, follow transitions
    /// until a terminal signal.
    pub fn play_round<C: Console>(&mut self, console: &mut C) -> Result<RoundEnd> {
        self.session.reset();
        self.rounds_played += 1;
        console.write_line("Simple Choice Game Initialized!")?;
        info!(
            "Round {} started. Initial node: {}",
            self.rounds_played, self.config.entry_node
        );

        let mut current = self.config.entry_node.clone();
        let end = loop {
            match current.as_str() {
                QUIT => break RoundEnd::Quit,
                RESTART => break RoundEnd::Restart,
                _ => {}
            }
            current = self.take_turn(console, &current)?;
        };

        if self.session.world.is_empty() {
            debug!("Round {} ended ({end:?}) with no flags set", self.rounds_played);
        } else {
            debug!(
                "Round {} ended ({end:?}) with {} flag(s) set",
                self.rounds_played,
                self.session.world.len()
            );
        }
        Ok(end)
    }

    /// Play `current` and return the id to visit next.
    fn take_turn<C: Console>(&mut self, console: &mut C, current: &str) -> Result<String> {
        let outcome = NodeRunner::new(self.catalog, console, &self.config.title)
            .run_turn(current, &mut self.session)?;

        if let TurnOutcome::NodeMissing(err) = &outcome {
            warn!("Round {} ended early: {err}", self.rounds_played);
            console.write_line("A problem occurred. Exiting game.")?;
            return Ok(QUIT.to_string());
        }

        match outcome.choice() {
            Some(choice) => info!(
                "Transition: {current} -> {} (choice: {})",
                outcome.next_id(),
                choice.text
            ),
            None => info!("Transition: {current} -> {}", outcome.next_id()),
        }
        Ok(outcome.next_id().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::game::scenario::simple_choice_catalog;

    fn play(config: &GameConfig, inputs: &[&str]) -> (Session, usize, ScriptedConsole) {
        let catalog = simple_choice_catalog();
        let mut console = ScriptedConsole::new(inputs.iter().copied());
        let mut game = GameLoop::new(&catalog, config);
        game.run(&mut console).unwrap();
        (game.session().clone(), game.rounds_played(), console)
    }

    #[test]
    fn test_full_playthrough_to_secret_ending() {
        // intro, name, blue door, take key, red door, secrets, quit
        let inputs = ["1", "MainPlayer", "2", "1", "1", "2", "2"];
        let (session, rounds, console) = play(&GameConfig::default(), &inputs);
        let output = console.output();

        assert!(output.contains("Hello, MainPlayer!"));
        assert!(output.contains("You find a small key!"));
        assert!(output.contains("Congratulations, MainPlayer!"));
        assert!(output.contains("Thanks for playing!"));
        assert!(!output.contains("A problem occurred"));
        assert!(session.world.flag("hasKey"));
        assert_eq!(session.player.name, "MainPlayer");
        assert_eq!(rounds, 1);
        assert_eq!(console.remaining_inputs(), 0);
    }

    #[test]
    fn test_restart_resets_state() {
        let inputs = [
            // round 1: straight to the secret ending, then play again
            "1", "Ada", "2", "1", "1", "2", "1",
            // round 2: blank name, blue room offers the key again
            "1", "", "2", "1",
        ];
        let (session, rounds, console) = play(&GameConfig::default(), &inputs);
        let output = console.output();

        assert_eq!(rounds, 2);
        assert_eq!(output.matches("Simple Choice Game Initialized!").count(), 2);
        assert!(output.contains("Restarting game..."));
        assert_eq!(output.matches("You find a small key!").count(), 2);
        assert!(output.contains("Hello, Wanderer!"));
        assert_eq!(session.player.name, "Wanderer");
        // input ran dry after taking the key in round 2
        assert!(session.world.flag("hasKey"));
        assert!(output.ends_with("Thanks for playing!"));
    }

    #[test]
    fn test_missing_entry_node_quits_gracefully() {
        let config = GameConfig {
            entry_node: "nowhere".into(),
            ..GameConfig::default()
        };
        let (_, rounds, console) = play(&config, &[]);
        let output = console.output();

        assert_eq!(rounds, 1);
        assert!(output.contains("Error: Node 'nowhere' not found!"));
        assert!(output.contains("A problem occurred. Exiting game."));
        assert!(output.contains("Thanks for playing!"));
    }

    #[test]
    fn test_terminal_entry_is_never_looked_up() {
        let config = GameConfig {
            entry_node: QUIT.into(),
            ..GameConfig::default()
        };
        let (_, _, console) = play(&config, &[]);
        assert_eq!(console.clears, 0);
        assert!(!console.output().contains("not found"));
    }

    #[test]
    fn test_dead_end_entry_quits_on_token() {
        let config = GameConfig {
            entry_node: "deadEnd".into(),
            ..GameConfig::default()
        };
        let (session, _, console) = play(&config, &["x", "Q"]);
        assert!(session.world.is_empty());
        assert!(console.output().contains("Thanks for playing!"));
        assert_eq!(console.remaining_inputs(), 0);
    }

    #[test]
    fn test_one_clear_per_node() {
        let (_, _, console) = play(&GameConfig::default(), &["1", "Bo", "1", "1"]);
        // intro, askName, greeting, redRoom, greeting (input closed)
        assert_eq!(console.clears, 5);
    }
}
