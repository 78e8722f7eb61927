use anyhow::Result;
use log::{LevelFilter, info};
use std::time::Instant;

/// Installs a stdout logger prefixed with level and time since start.
pub fn init_logger(level_filter: LevelFilter) -> Result<()> {
    let epoch = Instant::now();
    fern::Dispatch::new()
        .format(move |out, message, record| {
            let elapsed = epoch.elapsed().as_secs();
            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}]",
                record.level(),
                elapsed / 3600,
                (elapsed / 60) % 60,
                elapsed % 60,
            );
            out.finish(format_args!("{prefix:<20}{message}"))
        })
        .level(level_filter)
        .chain(std::io::stdout())
        .apply()?;
    info!("[LOG] logger initialized at level {level_filter}");
    Ok(())
}
