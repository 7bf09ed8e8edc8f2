//! Output formatting and logging utilities

use crate::functional_impl::Functional;
use crate::optim_impl::OptimizationTrace;
use color_eyre::eyre::Result;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

/// Wall-clock timer truncated to whole seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let total_seconds = StdSystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        write!(
            w,
            "{:02}:{:02}:{:02}",
            (total_seconds / 3600) % 24,
            (total_seconds / 60) % 60,
            total_seconds % 60
        )
    }
}

/// Setup output logging to file or stdout
pub fn setup_output(output_path: Option<&String>) {
    match output_path {
        Some(path) => match File::create(path) {
            Ok(log) => {
                let file_layer = layer()
                    .with_writer(log)
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false);
                Registry::default().with(file_layer).init();
                info!("Output will be written to: {}", path);
            }
            Err(err) => eprintln!("Could not create output file {}: {}", path, err),
        },
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true);
            Registry::default().with(stdout_layer).init();
        }
    }
}

/// One line per visited point: functional, iteration, energy, parameters
pub fn write_trajectory<W: Write>(
    writer: &mut W,
    functional: Functional,
    trace: &OptimizationTrace,
) -> Result<()> {
    writeln!(writer, "# {} ({})", functional, trace.status)?;
    writeln!(writer, "# iteration energy parameters...")?;
    for (iteration, (energy, params)) in trace
        .energy_history
        .iter()
        .zip(trace.parameter_history.iter())
        .enumerate()
    {
        write!(writer, "{:6} {:20.12}", iteration, energy)?;
        for value in params.iter() {
            write!(writer, " {:16.10}", value)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
