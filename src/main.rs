// src/main.rs

use std::path::Path;

use taskflow::{cli, config, logging, print_plan};

fn main() {
    if let Err(err) = run_main() {
        eprintln!("taskflow error: {err:?}");
        std::process::exit(1);
    }
}

fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let cfg = config::load_and_validate(Path::new(&args.config))?;
    logging::init_logging(args.log_level.or(cfg.logging.level))?;
    print_plan(&cfg, args.flow.as_deref())
}
