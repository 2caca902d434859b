// Entrypoint for the CLI application.
// - Keeps `main` small: load settings, start logging, build the client and
//   hand both to the menu loop.

use genesis_cli::{api::ApiClient, config::Settings, logging, ui::main_menu};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    // Dropping the guard flushes buffered lines to logs/error.log.
    let _guard = logging::init(Path::new(logging::LOG_DIR))?;

    let settings = Settings::from_env()?;
    let api = ApiClient::new(&settings.api)?;
    tracing::info!("Using endpoint {}", api.endpoint());

    // Blocks until the operator chooses "Exit".
    main_menu(&api, &settings)?;
    Ok(())
}
