use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE};
use crate::io::session::{HISTORY_FILE, Session};
use crate::io::store::JsonFileStore;
use crate::model::config::WeaverConfig;
use crate::model::workspace::Workspace;

/// Create the data directory: weaver.toml (if missing) and a data file with
/// the starter projects, or an empty one with `--empty`.
pub fn cmd_init(data_dir: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = if data_dir.join(CONFIG_FILE).exists() {
        config_io::read_config(data_dir)?
    } else {
        let config = WeaverConfig::default();
        config_io::write_config(data_dir, &config)?;
        config
    };

    let store = JsonFileStore::new(data_dir.join(&config.storage.data_file));
    if store.path().exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            store.path().display()
        )
        .into());
    }

    let workspace = if args.empty {
        Workspace::default()
    } else {
        Workspace::seeded()
    };
    Session::create(
        store,
        data_dir.join(HISTORY_FILE),
        config.history.max,
        config.storage.autosave,
        workspace,
    )?;

    tracing::info!(dir = %data_dir.display(), "initialized data directory");
    println!("Initialized {}", data_dir.display());
    Ok(())
}
