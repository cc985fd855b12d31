//! Store inspection command implementation

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use sfm_store::Store;

use crate::error::CliResult;

/// List the groups and datasets of a store
#[derive(Args, Debug)]
pub struct InfoCommand {
    /// Store to inspect
    pub store: PathBuf,

    /// Emit the listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct StoreListing {
    path: String,
    groups: Vec<GroupListing>,
    total_datasets: usize,
}

#[derive(Debug, Serialize)]
struct GroupListing {
    name: String,
    datasets: Vec<DatasetListing>,
}

#[derive(Debug, Serialize)]
struct DatasetListing {
    name: String,
    shape: Vec<usize>,
}

impl InfoCommand {
    /// Print the store layout to stdout
    pub fn execute(self) -> CliResult<()> {
        let store = Store::open(&self.store)?;

        let mut groups = Vec::new();
        let mut total_datasets = 0;
        for group in store.groups()? {
            let mut datasets = Vec::new();
            for name in group.dataset_names()? {
                let shape = group.shape(&name)?;
                datasets.push(DatasetListing { name, shape });
            }
            total_datasets += datasets.len();
            groups.push(GroupListing {
                name: group.name().to_string(),
                datasets,
            });
        }
        let listing = StoreListing {
            path: self.store.display().to_string(),
            groups,
            total_datasets,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("{}", listing.path);
            for group in &listing.groups {
                println!("  {}/", group.name);
                for dataset in &group.datasets {
                    println!("    {}  {:?}", dataset.name, dataset.shape);
                }
            }
            println!(
                "{} groups, {} datasets",
                listing.groups.len(),
                listing.total_datasets
            );
        }
        Ok(())
    }
}
