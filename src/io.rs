use std::{
    fs::{self, File},
    io::{BufWriter, Write},
};

use anyhow::Context;

use crate::{cli::HdmcConfig, handoff::Handoff, params::InputParams, species::Species};

pub struct XYZWriter {
    file: BufWriter<File>,
}

impl XYZWriter {
    pub fn new(p: &str) -> anyhow::Result<Self> {
        let file = File::create(p).with_context(|| format!("creating trajectory file {p}"))?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }

    /// One frame: particle count, blank comment line, then `species x y 0.0` per disc.
    pub fn write_xyz_frame(&mut self, handoff: &Handoff<'_>) -> anyhow::Result<()> {
        let n: usize = Species::ALL.iter().map(|&s| handoff.positions(s).len()).sum();
        writeln!(self.file, "{n}\n")?;
        for s in Species::ALL {
            for pos in handoff.positions(s) {
                writeln!(self.file, "{} {:?} {:?} 0.0", s.label(), pos.x(), pos.y())?;
            }
        }
        self.file.flush()?;
        Ok(())
    }
}

pub fn read_input_params(path: &str) -> anyhow::Result<InputParams> {
    let contents = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let ip = toml::from_str(&contents).with_context(|| format!("parsing {path}"))?;
    Ok(ip)
}

pub fn write_input_params(ip: &InputParams, path: &str) -> anyhow::Result<()> {
    let toml = toml::to_string(ip)?;
    fs::write(path, toml).with_context(|| format!("writing {path}"))?;
    Ok(())
}

/// Dumps the final configuration as JSON for the external analysis step.
pub fn write_snapshot_json(handoff: &Handoff<'_>, path: &str) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, &handoff.snapshot())?;
    w.flush()?;
    Ok(())
}

fn try_delete(p: String) -> anyhow::Result<()> {
    if std::path::Path::new(&p).is_file() {
        fs::remove_file(&p).with_context(|| format!("removing stale {p}"))?;
    }
    Ok(())
}

pub fn clear_out_files(config: &HdmcConfig) -> anyhow::Result<()> {
    try_delete(config.toml())?;
    try_delete(config.trajectory())?;
    try_delete(config.snapshot())?;
    Ok(())
}
