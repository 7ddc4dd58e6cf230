use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter_directives(verbose: bool) -> &'static str {
    if verbose {
        "doc_tools=debug,info"
    } else {
        "doc_tools=info"
    }
}

/// `RUST_LOG` 優先，否則依 verbose 決定等級
fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directives(verbose)))
}

fn compact_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact(),
    )
}

fn json_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .json(),
    )
}

/// 初始化 CLI 日誌，輸出到 stderr，stdout 只留給診斷結果
pub fn init_cli_logger(verbose: bool) {
    compact_subscriber(default_filter(verbose), std::io::stderr).init();
}

/// JSON 格式日誌，給 CI 收集使用
pub fn init_json_logger() {
    json_subscriber(default_filter(false), std::io::stderr).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_json_logger_emits_one_object_per_event() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = json_subscriber(EnvFilter::new(filter_directives(false)), move || {
            writer.clone()
        });

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(file = "a.xml", "checked");
            tracing::debug!("hidden");
        });

        let output = captured.text();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);
        let event: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(event["level"], "INFO");
        assert_eq!(event["fields"]["message"], "checked");
        assert_eq!(event["fields"]["file"], "a.xml");
    }

    #[test]
    fn test_verbose_compact_logger_shows_debug() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = compact_subscriber(EnvFilter::new(filter_directives(true)), move || {
            writer.clone()
        });

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("resolved entities");
        });

        assert!(captured.text().contains("resolved entities"));
    }

    #[test]
    fn test_quiet_compact_logger_hides_debug() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = compact_subscriber(EnvFilter::new(filter_directives(false)), move || {
            writer.clone()
        });

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("resolved entities");
            tracing::warn!("not well-formed");
        });

        let output = captured.text();
        assert!(!output.contains("resolved entities"));
        assert!(output.contains("not well-formed"));
    }
}
