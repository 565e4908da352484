use anyhow::{ensure, Result};
use gesture_dl::{
    model::{num_parameters, ModelKind},
    utils::ImageSize,
};
use prettytable::{cell, row, Table};
use structopt::StructOpt;
use strum::IntoEnumIterator as _;
use tch::{nn, Device};

#[derive(Debug, Clone, StructOpt)]
/// Build stage models and print their sizes and output shapes
struct Args {
    #[structopt(long, default_value = "7")]
    /// number of gesture classes
    pub num_classes: usize,
    #[structopt(long, default_value = "256")]
    /// input image height and width
    pub image_size: usize,
    #[structopt(long)]
    /// model variant among detection, landmark, gesture and full. All variants if unset.
    pub kind: Option<ModelKind>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let Args {
        num_classes,
        image_size,
        kind,
    } = Args::from_args();
    ensure!(num_classes > 0, "--num-classes must be positive");
    let image_size = ImageSize::square(image_size)?;

    let kinds: Vec<ModelKind> = match kind {
        Some(kind) => vec![kind],
        None => ModelKind::iter().collect(),
    };

    let mut table = Table::new();
    table.add_row(row!["model", "parameters", "output", "shape"]);

    for kind in kinds {
        let vs = nn::VarStore::new(Device::Cpu);
        let model = kind.build(&vs.root(), num_classes)?;
        let num_params = num_parameters(&vs);

        for (name, shape) in model.probe(image_size, Device::Cpu)? {
            table.add_row(row![kind, num_params, name, format!("{:?}", shape)]);
        }
    }

    table.printstd();
    Ok(())
}
