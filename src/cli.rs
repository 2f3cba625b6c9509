//! CLI arguments

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Resolves Joystream video and channel assets through the Orion GraphQL index")]
pub struct Opts {
    /// Configuration file, extension optional (`config` finds `config.toml`).
    ///
    /// Every key can also be set with `PROXY_<SECTION>__<KEY>`, e.g. `PROXY_SERVER__PORT=9000`.
    #[arg(short, long, default_value = "config")]
    pub config: String,
}
