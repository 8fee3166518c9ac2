use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// コンソールへのログ出力を初期化
///
/// 既定は INFO、`--verbose` で DEBUG。`RUST_LOG` が設定されていればそちらを優先する。
pub fn init_logging(verbose: bool) -> Result<(), anyhow::Error> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(true)
                .with_target(false)
                .with_filter(filter),
        )
        .try_init()?;

    Ok(())
}
