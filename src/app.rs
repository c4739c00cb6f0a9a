//! Application orchestrator.
//! Loads/merges config, initializes logging, validates the root folder,
//! then runs one slot and prints its outcome.

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use slot_io::cli::Args;
use slot_io::config::{LoadResult, load_or_init, validate_and_normalize};
use slot_io::output as out;
use slot_io::{CONFIG_ENV, Config, Dispatcher, RootResolver, default_config_path};

use crate::logging::init_tracing;

fn print_config_location() {
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {cfg_env}\n"));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default slot_io config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info(
                    "No config file exists there yet. Run without --print-config to create a template.",
                );
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    let (mut cfg, source) = match load_or_init()? {
        LoadResult::Loaded(cfg, path) => (cfg, Some(path)),
        LoadResult::CreatedTemplate(path) => {
            out::print_success(&format!(
                "A template slot_io config was written to: {}",
                path.display()
            ));
            if args.root.is_none() {
                out::print_info(
                    "Edit the file to set `root_folder` (and optionally `log_level`, `log_file`, `confine_paths`), then re-run. Or pass --root for a one-off run.",
                );
                out::print_info(&format!("To use a different location set {CONFIG_ENV}."));
                return Ok(());
            }
            (Config::default(), None)
        }
    };
    args.apply_overrides(&mut cfg);

    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;
    if let Some(path) = &source {
        debug!(config = %path.display(), "Loaded config");
    }
    debug!("Starting slot_io: {:?}", args);

    validate_and_normalize(&mut cfg)?;
    let (invocation, call) = args.to_call()?;
    let root = RootResolver::new(&cfg.root_folder)?.with_confinement(cfg.confine_paths);
    let dispatcher = Dispatcher::local(root);

    let verb = invocation.verb;
    let result = if invocation.wait {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("start async runtime")?;
        runtime.block_on(dispatcher.invoke_async(call))
    } else {
        dispatcher.invoke(call)
    };

    match result {
        Ok(outcome) => {
            out::print_outcome(&outcome).context("write slot outcome")?;
            info!(%verb, wait = invocation.wait, "Slot completed");
            Ok(())
        }
        Err(e) => {
            error!(code = e.code(), kind = ?e.kind(), %verb, error = %e, "Slot failed");
            Err(e.into())
        }
    }
}
