// In demos/dump_writer.rs
//
// cargo run --example dump_writer -- [config_path]
//
// Reads `<channel> <on|off>` lines (default `dump_config.txt`) and streams a
// few hundred records per active channel into ./dump_out/.
use cycle_sync::Dump::{DumpConfig, DumpContext, DEFAULT_CONFIG_PATH};
use std::env;

fn main() -> cycle_sync::Result<()> {
    tracing_subscriber::fmt().init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = match DumpConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Dump: {e}; falling back to built-in channels");
            DumpConfig::default()
                .with_channel("frames.log", true)
                .with_channel("timing.log", true)
                .with_channel("verbose.log", false)
        }
    }
    .with_output_dir("dump_out");

    let channels: Vec<String> = config.channels().iter().map(|c| c.name.clone()).collect();
    let mut dump = DumpContext::start(config)?;

    for frame in 0..500 {
        for channel in &channels {
            dump.submit(channel, format!("frame {frame} on {channel}"));
        }
    }

    let submitted = dump.submitted();
    let summary = dump.finish()?;
    println!(
        "Dump: {} records submitted, {} written to {} files",
        submitted, summary.records, summary.files_opened
    );
    Ok(())
}
