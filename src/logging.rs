use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or blank. The HTML parser crates are chatty
/// at debug.
const DEFAULT_DIRECTIVES: &str = "info,html5ever=warn,selectors=warn";

/// Progress and warnings go to stderr so stdout stays free for piping.
pub fn init() -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter_from(rust_log.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}

/// A malformed `RUST_LOG` is an error rather than a silent fallback, so a
/// typo does not hide the debug output that was asked for.
fn filter_from(rust_log: Option<&str>) -> anyhow::Result<EnvFilter> {
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => EnvFilter::try_new(directives)
            .with_context(|| format!("parse {}={directives:?}", EnvFilter::DEFAULT_ENV)),
        _ => EnvFilter::try_new(DEFAULT_DIRECTIVES).context("build default log filter"),
    }
}
