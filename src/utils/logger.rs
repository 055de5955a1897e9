use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 人看的單行格式
    #[default]
    Compact,
    /// 給集中式日誌系統收集
    Json,
}

impl LogFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// `RUST_LOG` 未設定時使用的過濾規則
pub fn filter_directive(verbose: bool) -> &'static str {
    if verbose {
        "panos_tagger=debug,info"
    } else {
        "panos_tagger=info"
    }
}

/// Logs go to stderr; stdout carries only the run summary and dry-run output.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose)));

    // Each optional layer sits at a different depth of the subscriber stack,
    // so each needs its own builder instance (same settings).
    macro_rules! base_layer {
        () => {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
        };
    }

    let (compact, json) = match format {
        LogFormat::Compact => (Some(base_layer!().compact()), None),
        LogFormat::Json => (None, Some(base_layer!().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(json)
        .init();
}
