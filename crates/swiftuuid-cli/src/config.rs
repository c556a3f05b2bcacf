use anyhow::Context;
use clap::{Parser, ValueEnum};
use core::time::Duration;
use swiftuuid::{DEFAULT_BUFFER_SIZE, GeneratorConfig};

/// Which identifier layout to emit.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdVersion {
    /// Fully random.
    V4,
    /// Sharded, counter-ordered UUIDv7 fed by a cached clock.
    V7,
    /// UUIDv7 with a fresh clock read and no counter.
    V7Lazy,
}

/// Command-line arguments for the `swiftuuid` binary.
///
/// Every option can also be supplied through the environment (or a `.env`
/// file in the working directory).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "swiftuuid",
    version,
    about = "Print RFC 9562 UUIDs, one per line"
)]
pub struct CliArgs {
    /// Identifier version to generate.
    ///
    /// Environment variable: `SWIFTUUID_VERSION`
    #[arg(short, long, env = "SWIFTUUID_VERSION", value_enum, default_value_t = IdVersion::V7)]
    pub kind: IdVersion,

    /// Number of identifiers to print.
    ///
    /// Environment variable: `SWIFTUUID_COUNT`
    #[arg(short = 'n', long, env = "SWIFTUUID_COUNT", default_value_t = 1)]
    pub count: usize,

    /// Worker threads sharing one generator. Output order across threads is
    /// unspecified.
    ///
    /// Environment variable: `SWIFTUUID_THREADS`
    #[arg(short, long, env = "SWIFTUUID_THREADS", default_value_t = 1)]
    pub threads: usize,

    /// Entropy buffer size per worker state, in bytes (v7 only).
    ///
    /// Environment variable: `SWIFTUUID_BUFFER_SIZE`
    #[arg(long, env = "SWIFTUUID_BUFFER_SIZE", default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Clock cache refresh interval in microseconds (v7 only).
    ///
    /// Environment variable: `SWIFTUUID_REFRESH_MICROS`
    #[arg(long, env = "SWIFTUUID_REFRESH_MICROS", default_value_t = 500)]
    pub refresh_micros: u64,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub kind: IdVersion,
    pub count: usize,
    pub threads: usize,
    pub generator: GeneratorConfig,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.threads == 0 {
            anyhow::bail!("SWIFTUUID_THREADS must be greater than 0");
        }

        let generator = GeneratorConfig::default()
            .with_buffer_size(args.buffer_size)
            .with_refresh_interval(Duration::from_micros(args.refresh_micros));
        generator
            .validate()
            .context("invalid generator settings")?;

        Ok(Self {
            kind: args.kind,
            count: args.count,
            threads: args.threads,
            generator,
        })
    }
}
