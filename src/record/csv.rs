//! CSV writers for trial event streams.
//!
//! The search driver only exposes in-memory records; these helpers render
//! them as delimited text for downstream plotting. A failed write surfaces
//! as an `io::Error` and never touches trial state.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::compute::TrialResult;
use crate::schema::{RunConfig, SearchMode};

/// Write the generations-to-maximal-fitness intervals, one per line.
pub fn write_f1_intervals<W: Write>(mut w: W, result: &TrialResult) -> io::Result<()> {
    for event in &result.events {
        if event.fitness == 1.0 {
            writeln!(w, "{}", event.since_f1)?;
        }
    }
    Ok(())
}

/// Write every recorded event as one CSV row. Landscape columns are left
/// empty when descriptors were not recorded.
pub fn write_events<W: Write>(mut w: W, result: &TrialResult) -> io::Result<()> {
    writeln!(
        w,
        "generation,fitness,since_event,since_f1,attractors,lineage_attractors,mean_period,max_period"
    )?;
    for event in &result.events {
        write!(
            w,
            "{},{},{},{},",
            event.generation, event.fitness, event.since_event, event.since_f1
        )?;
        match &event.landscape {
            Some(landscape) => writeln!(
                w,
                "{},{},{},{}",
                landscape.attractors,
                landscape.lineage_attractors,
                landscape.mean_period,
                landscape.max_period
            )?,
            None => writeln!(w, ",,,")?,
        }
    }
    Ok(())
}

/// Conventional data-file name for one trial:
/// `<mode>_a<ant>_p<pos>_<policy>_<gens>_gens_<p>.csv`.
pub fn suggested_filename(config: &RunConfig, p_flip: f64) -> String {
    let mode = match config.mode {
        SearchMode::Drift => "drift",
        SearchMode::HillClimb => "evolve",
    };
    format!(
        "{mode}_a{}_p{}_{}_{}_gens_{}.csv",
        config.anterior.target,
        config.posterior.target,
        config.scoring.name(),
        config.generations,
        p_flip
    )
}

/// Write one trial's interval file under `dir`, returning the path.
pub fn save_f1_intervals(
    dir: &Path,
    config: &RunConfig,
    result: &TrialResult,
) -> io::Result<PathBuf> {
    let path = dir.join(suggested_filename(config, result.p_flip));
    let mut w = BufWriter::new(File::create(&path)?);
    write_f1_intervals(&mut w, result)?;
    w.flush()?;
    Ok(path)
}

/// Write one trial's full event file under `dir`, returning the path.
pub fn save_events(dir: &Path, config: &RunConfig, result: &TrialResult) -> io::Result<PathBuf> {
    let path = dir.join(format!(
        "withf_{}",
        suggested_filename(config, result.p_flip)
    ));
    let mut w = BufWriter::new(File::create(&path)?);
    write_events(&mut w, result)?;
    w.flush()?;
    Ok(path)
}
