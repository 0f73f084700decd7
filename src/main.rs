use anyhow::Result;
use log::info;
use crate::errors::RunError;
use crate::initialization::init;
use crate::worker::run;

mod clock;
mod config;
mod errors;
mod initialization;
mod logging;
mod manager_storage;
mod manager_weather;
mod models;
mod snapshot;
mod worker;

fn main() -> Result<()> {
    // Without config and logger there is nothing sensible to do, so this is the only fatal path
    let (config, mgr) = match init() {
        Ok((c, m)) => (c, m),
        Err(e) => {
            return Err(RunError(format!("Initialization failed: {}", e)))?;
        }
    };

    let report = run(&mgr.weather, &mgr.storage, &mgr.clock, &config.weather.cities, &config.storage.key_prefix);
    info!("run done, bucket: {:?}, fetched: {}, failed: {}, object: {:?}", report.bucket, report.fetched, report.failed, report.object_key);

    Ok(())
}
