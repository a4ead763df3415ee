//! Subscriber setup for binaries and test runners.

use std::{fs::File, path::PathBuf};

use eyre::{Result, WrapErr};
use tracing::Subscriber;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt::{format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

const DEFAULT_FILTER: &str = "info";

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directives for the stderr layer.
    pub filter: String,
    /// JSON-lines log file, disabled when `None`.
    pub json_path: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            json_path: None,
        }
    }
}

impl LogConfig {
    /// Read `RUST_LOG` and `GLINT_LOG_JSON`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key| lookup(key).filter(|value: &String| !value.trim().is_empty());
        Self {
            filter: non_empty("RUST_LOG").unwrap_or_else(|| DEFAULT_FILTER.to_string()),
            json_path: non_empty("GLINT_LOG_JSON").map(PathBuf::from),
        }
    }
}

/// Human-readable layer filtered by `config.filter`. [`init`] writes it to stderr.
fn fmt_layer<S, W>(config: &LogConfig, writer: W) -> Result<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(&config.filter)
        .wrap_err_with(|| format!("Invalid log filter {:?}", config.filter))?;
    Ok(tracing_subscriber::fmt::Layer::default()
        .with_writer(writer)
        .with_filter(filter))
}

/// Install `color_eyre` and the global subscriber. Fails if either was already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    color_eyre::install()?;
    let json_layer = match &config.json_path {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("Cannot create log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::Layer::default()
                    .json()
                    .with_file(true)
                    .with_level(true)
                    .with_line_number(true)
                    .with_thread_names(true)
                    .with_thread_ids(true)
                    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
                    .with_writer(file),
            )
        }
        None => None,
    };
    let registry = tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(fmt_layer(config, std::io::stderr)?)
        .with(json_layer);
    #[cfg(feature = "tracy")]
    let registry = registry.with(tracing_tracy::TracyLayer::new());
    registry.try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        io,
        sync::{Arc, Mutex},
    };

    use glint_fake::FakeDriver;
    use tracing_subscriber::Registry;

    use super::*;
    use crate::ShaderProgram;

    #[derive(Clone, Default)]
    struct Output(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Output {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Output {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn config_from(vars: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<_, _> = vars.iter().copied().collect();
        LogConfig::from_lookup(|key| vars.get(key).map(|value| value.to_string()))
    }

    #[test]
    fn defaults_to_info_without_json() {
        assert_eq!(config_from(&[]), LogConfig::default());
    }

    #[test]
    fn blank_variables_count_as_unset() {
        let config = config_from(&[("RUST_LOG", "  "), ("GLINT_LOG_JSON", "")]);
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn reads_filter_and_json_path() {
        let config = config_from(&[
            ("RUST_LOG", "glint=trace,gl=warn"),
            ("GLINT_LOG_JSON", "target/log.jsonl"),
        ]);
        assert_eq!(config.filter, "glint=trace,gl=warn");
        assert_eq!(config.json_path, Some(PathBuf::from("target/log.jsonl")));
    }

    #[test]
    fn default_filter_lets_shader_diagnostics_through() {
        let output = Output::default();
        let layer = fmt_layer::<Registry, _>(&LogConfig::default(), output.clone()).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("below the default filter");
            let driver = FakeDriver::new();
            let program = ShaderProgram::new(&driver, "missing.vert", "missing.frag");
            assert_eq!(program.handle(), None);
        });

        let logs = String::from_utf8(output.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("ERROR::SHADER::FILE_NOT_SUCCESSFULLY_READ"));
        assert!(logs.contains("missing.vert"));
        assert!(!logs.contains("below the default filter"));
    }

    #[test]
    fn invalid_filter_is_rejected() {
        let config = LogConfig {
            filter: "glint=notalevel".to_string(),
            json_path: None,
        };
        let output = Output::default();
        assert!(fmt_layer::<Registry, _>(&config, output).is_err());
    }
}
