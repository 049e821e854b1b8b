//! Query parameter values from a heat pump, e.g.
//!
//! ```text
//! cargo run --example htquery -- /dev/ttyUSB0 "Temp. Aussen" "Betriebsart"
//! ```
//!
//! Without parameter names, every catalog entry is queried.

use anyhow::{Context, Result};

use htpump::client::HtClientBuilder;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let device = args.next().context("usage: htquery <device> [param...]")?;
    let names: Vec<String> = args.collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut hp = HtClientBuilder::new(&device).build()?;
    hp.open_connection()
        .await
        .with_context(|| format!("failed to open {device}"))?;
    hp.login(false).await.context("login failed")?;

    let serial = hp.get_serial_number().await?;
    let (version, revision) = hp.get_version().await?;
    println!("connected to heat pump #{serial}, firmware {version} ({revision})");

    let values = hp.get_params(&name_refs).await?;
    let width = values.keys().map(String::len).max().unwrap_or(0);
    for (name, value) in &values {
        println!("{name:width$} : {value}");
    }

    hp.logout().await;
    hp.close_connection().await;
    Ok(())
}
