mod console;
mod game;

use anyhow::Result;
use log::{info, warn};

use console::StdConsole;
use game::{GameConfig, GameLoop};

fn main() -> Result<()> {
    // Logs go to stderr and stay quiet unless asked for:
    //   RUST_LOG=info   simple-choice   # rounds + transitions
    //   RUST_LOG=debug  simple-choice   # + turn states, patches, rejected input
    //   RUST_LOG=trace  simple-choice   # + final session snapshot
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();

    let defaults = GameConfig::default();
    let config = GameConfig {
        entry_node: args.get(1).cloned().unwrap_or(defaults.entry_node),
        clear_screen: args
            .get(2)
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.clear_screen),
        title: defaults.title,
    };
    info!("Config: {config:?}");

    let catalog = game::scenario::simple_choice_catalog();
    if catalog.is_empty() {
        anyhow::bail!("no story nodes registered");
    }
    info!("Catalog: {} nodes", catalog.len());
    for (node, target) in catalog.dangling_targets(&config.entry_node) {
        if node.is_empty() {
            warn!("Entry node '{target}' is not registered");
        } else {
            warn!("Node '{node}' points at unknown node '{target}'");
        }
    }

    let mut console = StdConsole::new(config.clear_screen);
    GameLoop::new(&catalog, &config).run(&mut console)
}
