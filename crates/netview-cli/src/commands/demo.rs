use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use log::info;
use netview_graph::{description_to_json, gen_chain_network};

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Number of chained subnetworks.
    #[arg(long, default_value_t = 2)]
    pub subnets: usize,
    /// Vertices per subnetwork, junctions included.
    #[arg(long, default_value_t = 4)]
    pub vertices: usize,
    /// Output file; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &DemoArgs) -> Result<(), Box<dyn Error>> {
    let description = gen_chain_network(args.subnets, args.vertices)?;
    let json = description_to_json(&description)?;
    match &args.out {
        Some(path) => {
            fs::write(path, json)?;
            info!("wrote demo network to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
