use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use roll_loading::cli::Cli;
use roll_loading::config::LoadingConfig;
use roll_loading::logger::init_logger;
use roll_loading::phase::PhaseController;
use roll_loading::report::{ConsoleReport, JsonReport, PngReport, ReportSink};
use roll_loading::solver::ScipSession;
use roll_loading::source::{ItemSource, Shorthand, WeightFile};

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logger(args.log_level)?;

    let mut config = match &args.config_file {
        None => LoadingConfig::default(),
        Some(path) => LoadingConfig::from_json_file(path)?,
    };
    args.apply_overrides(&mut config);
    config.validate()?;
    info!("[MAIN] config: {config:?}");

    let items = match &args.input_file {
        Some(path) => WeightFile::new(path)
            .with_column(&args.column)
            .items()
            .with_context(|| format!("could not read weights from {}", path.display()))?,
        None => Shorthand::new(args.weights.clone())
            .items()
            .context("could not read weights from the command line")?,
    };
    info!(
        "[MAIN] {} rolls, total weight {}",
        items.len(),
        items.total_weight()
    );

    let mut session = ScipSession::new().with_output(config.solver_output);
    let controller = PhaseController::new(config.capacities.clone(), config.solve_params());
    let plan = controller.run(&mut session, &items)?;
    if !plan.is_proven() {
        warn!(
            "[MAIN] plan is not proven optimal, worst gap {:.4}",
            plan.worst_gap()
        );
    }

    ConsoleReport::new(std::io::stdout().lock())
        .with_phases(args.phases)
        .render(&plan)?;
    if let Some(path) = &args.json_output {
        JsonReport::new(path).render(&plan)?;
    }
    if let Some(path) = &args.png_output {
        PngReport::new(path).render(&plan)?;
    }

    Ok(())
}
