//! `tessera nodes` -- print the static node catalog.

use tessera_core::workflow::catalog::node_catalog;

pub fn print_nodes() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&node_catalog())?);
    Ok(())
}
