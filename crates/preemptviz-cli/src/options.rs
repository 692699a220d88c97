use std::path::PathBuf;

use anyhow::Context as _;
use preemptviz_report::{
    graph::InstanceCounts,
    labels::{LabelCatalog, Locale},
    number::NumberFormat,
    render::RenderSpec,
};

/// Output destination and geometry, shared by every figure command.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FigureOpt {
    /// Figure name used for the output files
    #[arg(long)]
    pub figname: String,
    /// Output directory for the rendered images
    #[arg(long, default_value = "figs")]
    pub output_dir: PathBuf,
    /// Output image width in pixels
    #[arg(long, default_value_t = 600)]
    pub width: u32,
    /// Output image height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,
}

impl FigureOpt {
    pub(crate) fn render_spec(&self) -> RenderSpec {
        RenderSpec::new(&self.output_dir, &self.figname, self.width, self.height)
    }
}

/// Locale and label-catalog selection, shared by every command.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LabelOpt {
    /// Output language ('en' or 'br')
    #[arg(long, default_value = "en")]
    pub lang: Locale,
    /// JSON label catalog overriding the built-in tables
    #[arg(long)]
    pub labels_file: Option<PathBuf>,
}

impl LabelOpt {
    pub(crate) fn catalog(&self) -> anyhow::Result<LabelCatalog> {
        match &self.labels_file {
            Some(path) => LabelCatalog::from_path(path)
                .with_context(|| format!("failed to read label catalog {}", path.display())),
            None => Ok(LabelCatalog::builtin(self.lang)),
        }
    }

    pub(crate) fn number_format(&self) -> NumberFormat {
        NumberFormat::for_locale(self.lang)
    }
}

/// Built-in synthetic networks with known per-instance vehicle counts.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub(crate) enum Network {
    Sp,
    Ny,
}

/// Instance→vehicle-count selection for the instance-scaled graphs.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CountsOpt {
    /// Built-in instance vehicle counts of a synthetic network
    #[arg(long, value_enum, conflicts_with = "counts_file")]
    pub network: Option<Network>,
    /// JSON file mapping instance numbers to vehicle counts
    #[arg(long)]
    pub counts_file: Option<PathBuf>,
}

impl CountsOpt {
    pub(crate) fn counts(&self) -> anyhow::Result<InstanceCounts> {
        match (self.network, &self.counts_file) {
            (_, Some(path)) => InstanceCounts::from_path(path)
                .with_context(|| format!("failed to read instance counts {}", path.display())),
            (Some(Network::Sp), None) => Ok(InstanceCounts::synth_sp()),
            (Some(Network::Ny), None) => Ok(InstanceCounts::synth_ny()),
            (None, None) => anyhow::bail!("either --network or --counts-file is required"),
        }
    }
}
