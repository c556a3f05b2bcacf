#![doc = include_str!("../README.md")]

mod config;

use clap::Parser;
use config::{CliArgs, CliConfig, IdVersion};
use std::io::{BufWriter, Write};
use std::thread::scope;
use swiftuuid::{
    CachedClock, LazyV7Generator, OsEntropy, ShardedV7Generator, SystemClock, UuidGenerator,
    V4Generator,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_logging();
    tracing::debug!(?config, "starting");

    let (generator, clock) = build_generator(&config)?;
    let result = emit(&config, generator.as_ref());

    if let Some(clock) = clock {
        clock.stop();
    }
    result
}

/// Diagnostics go to stderr so stdout stays a clean list of identifiers.
/// Defaults to `warn`; override with `RUST_LOG`.
fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_target(false),
        )
        .init();
}

type SharedGenerator = Box<dyn UuidGenerator + Send + Sync>;

fn build_generator(config: &CliConfig) -> anyhow::Result<(SharedGenerator, Option<CachedClock>)> {
    Ok(match config.kind {
        IdVersion::V4 => (Box::new(V4Generator::new(OsEntropy)), None),
        IdVersion::V7Lazy => (Box::new(LazyV7Generator::new(SystemClock, OsEntropy)), None),
        IdVersion::V7 => {
            let clock = CachedClock::start_with_interval(config.generator.refresh_interval);
            let generator =
                ShardedV7Generator::with_config(clock.clone(), OsEntropy, &config.generator)?;
            (Box::new(generator), Some(clock))
        }
    })
}

fn emit(config: &CliConfig, generator: &(dyn UuidGenerator + Send + Sync)) -> anyhow::Result<()> {
    if config.threads == 1 {
        let stdout = std::io::stdout();
        return write_ids(generator, config.count, &mut BufWriter::new(stdout.lock()));
    }

    let per_thread = config.count / config.threads;
    let remainder = config.count % config.threads;

    scope(|s| {
        let handles: Vec<_> = (0..config.threads)
            .map(|i| {
                let count = per_thread + usize::from(i < remainder);
                s.spawn(move || -> anyhow::Result<Vec<u8>> {
                    let mut out = Vec::with_capacity(count * 37);
                    write_ids(generator, count, &mut out)?;
                    Ok(out)
                })
            })
            .collect();

        let stdout = std::io::stdout();
        let mut stdout = stdout.lock();
        for handle in handles {
            let chunk = handle
                .join()
                .map_err(|_| anyhow::anyhow!("generator thread panicked"))??;
            stdout.write_all(&chunk)?;
        }
        stdout.flush()?;
        Ok(())
    })
}

fn write_ids<W: Write>(
    generator: &(dyn UuidGenerator + Send + Sync),
    count: usize,
    out: &mut W,
) -> anyhow::Result<()> {
    for _ in 0..count {
        let id = generator.generate()?;
        writeln!(out, "{id}")?;
    }
    out.flush()?;
    Ok(())
}
