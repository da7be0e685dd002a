use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hyprlens_assets::{ImageDecoder, ImageFileDecoder};
use hyprlens_common::DVec2;
use hyprlens_config::{MemoryConfig, IMAGE_PATH_KEY, NEAREST_KEY, TILED_KEY};
use hyprlens_host::{PassKind, SimHost, PRE_BLUR_SYMBOL};
use hyprlens_plugin::Plugin;
use hyprlens_render::MonitorInfo;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hyprlens-cli", about = "CLI tool for hyprlens operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print plugin version and crate info
    Info,
    /// Decode an image the way the plugin would
    Probe {
        /// Image file to decode
        image: PathBuf,
    },
    /// Run the plugin inside a simulated compositor
    Simulate {
        /// YAML file with host configuration values
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Background image, overrides the config file
        #[arg(short, long)]
        background: Option<PathBuf>,
        /// Repeat the image instead of stretching it
        #[arg(long)]
        tiled: bool,
        /// Sample with nearest-neighbour filtering
        #[arg(long)]
        nearest: bool,
        /// Monitor size as WxH, repeat for more monitors
        #[arg(short, long, value_parser = parse_size, default_value = "1920x1080")]
        monitor: Vec<DVec2>,
        /// Number of frames to render
        #[arg(short, long, default_value = "1")]
        frames: u32,
        /// Make the pre-blur symbol resolve to two functions
        #[arg(long)]
        ambiguous: bool,
        /// Write the first monitor's blur framebuffer to this PNG
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
}

fn parse_size(s: &str) -> Result<DVec2, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("monitor size must be non-zero, got {w}x{h}"));
    }
    Ok(DVec2::new(f64::from(w), f64::from(h)))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let info = Plugin::info();
            println!("hyprlens-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("plugin: {} {} by {}", info.name, info.version, info.author);
            println!("  {}", info.description);
            println!("common: {}", hyprlens_common::crate_info());
            println!("config: {}", hyprlens_config::crate_info());
            println!("render: {}", hyprlens_render::crate_info());
            println!("assets: {}", hyprlens_assets::crate_info());
            println!("host: {}", hyprlens_host::crate_info());
            println!("plugin: {}", hyprlens_plugin::crate_info());
        }
        Commands::Probe { image } => {
            let decoded = ImageFileDecoder::new()
                .decode(&image)
                .with_context(|| format!("probing {}", image.display()))?;
            println!(
                "{}: {}x{} {:?}, {} bytes",
                image.display(),
                decoded.width,
                decoded.height,
                decoded.order,
                decoded.pixels.len()
            );
        }
        Commands::Simulate {
            config,
            background,
            tiled,
            nearest,
            monitor,
            frames,
            ambiguous,
            out,
            json,
        } => {
            let mut values = match &config {
                Some(path) => MemoryConfig::load(path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => MemoryConfig::new(),
            };
            if let Some(path) = &background {
                let Some(text) = path.to_str() else {
                    bail!("background path is not valid UTF-8: {}", path.display());
                };
                values.set(IMAGE_PATH_KEY, text);
            }
            if tiled {
                values.set(TILED_KEY, true);
            }
            if nearest {
                values.set(NEAREST_KEY, true);
            }

            let mut host = SimHost::with_config(values);
            if ambiguous {
                host.set_symbol_matches(PRE_BLUR_SYMBOL, 2);
            }
            for (i, size) in monitor.iter().enumerate() {
                host.add_monitor(MonitorInfo::new(format!("SIM-{}", i + 1), *size))
                    .context("adding monitor")?;
            }

            let plugin = Plugin::init(&mut host, Box::new(ImageFileDecoder::new()));
            let mut hooked = 0u64;
            for frame in 0..frames {
                for i in 0..host.monitor_count() {
                    host.request_blur(i);
                }
                let passes = host
                    .render_frame()
                    .with_context(|| format!("rendering frame {frame}"))?;
                hooked += passes.iter().filter(|p| **p == PassKind::Hooked).count() as u64;
            }
            tracing::debug!(frames, hooked, "simulation finished");

            if let Some(path) = &out {
                let fb = host
                    .monitor(0)
                    .context("no monitor to capture")?
                    .monitor_data
                    .blur_fb;
                let image = host
                    .software()
                    .framebuffer(fb)
                    .context("blur framebuffer was never allocated")?;
                image
                    .save(path)
                    .with_context(|| format!("writing {}", path.display()))?;
            }

            let stats = plugin.stats();
            let load = plugin.last_load().map(|o| format!("{o:?}"));
            if json {
                let notifications: Vec<_> = host
                    .notifications()
                    .iter()
                    .map(|n| {
                        let [r, g, b, _] = n.color.to_rgba8();
                        serde_json::json!({
                            "message": n.message,
                            "color": format!("#{r:02x}{g:02x}{b:02x}"),
                            "duration_ms": n.duration.as_millis() as u64,
                        })
                    })
                    .collect();
                let report = serde_json::json!({
                    "intercepting": plugin.is_intercepting(),
                    "install_error": plugin.install_error().map(|e| e.to_string()),
                    "frames": frames,
                    "monitors": host.monitor_count(),
                    "original_runs": host.original_runs(),
                    "hooked_runs": host.hooked_runs(),
                    "stats": stats,
                    "last_load": load,
                    "notifications": notifications,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Simulated {frames} frame(s) on {} monitor(s)",
                    host.monitor_count()
                );
                match plugin.install_error() {
                    None => println!("Intercepting: yes"),
                    Some(e) => println!("Intercepting: no ({e})"),
                }
                println!(
                    "Passes: hooked={}, original={}",
                    host.hooked_runs(),
                    host.original_runs()
                );
                println!(
                    "Outcomes: drawn={}, cleared={}, not_requested={}, unavailable={}, failed={}",
                    stats.drawn,
                    stats.cleared,
                    stats.not_requested,
                    stats.texture_unavailable,
                    stats.failed
                );
                if let Some(load) = &load {
                    println!("Last load: {load}");
                }
                for n in host.notifications() {
                    println!("Notification: {}", n.message);
                }
                if let Some(path) = &out {
                    println!("Wrote {}", path.display());
                }
            }

            plugin.exit(&mut host);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_monitor_sizes() {
        assert_eq!(parse_size("2560x1440"), Ok(DVec2::new(2560.0, 1440.0)));
        assert_eq!(parse_size("800X600"), Ok(DVec2::new(800.0, 600.0)));
        assert!(parse_size("0x600").is_err());
        assert!(parse_size("wide").is_err());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
