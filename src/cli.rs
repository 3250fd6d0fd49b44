use clap::Parser;

/// Hard-disc Monte Carlo on a periodic 2D cell
#[derive(Parser, Debug, Clone)]
pub struct HdmcConfig {
    /// TOML parameter file. Defaults are used when empty.
    #[arg(long, default_value = "")]
    input: String,
    #[arg(long, default_value = "./out")]
    output_dir: String,
    /// Overrides the seed from the parameter file
    #[arg(long)]
    seed: Option<u64>,
}

impl HdmcConfig {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn toml(&self) -> String {
        format!("{}/config.toml", self.output_dir())
    }

    pub fn trajectory(&self) -> String {
        format!("{}/trajectory.xyz", self.output_dir())
    }

    pub fn snapshot(&self) -> String {
        format!("{}/final.json", self.output_dir())
    }
}
