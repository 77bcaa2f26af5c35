use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

pub const LOG_FILE_NAME: &str = "slipstream.log";

/// Target for records the dialogs already print themselves; kept off the console.
pub const DIALOG_TARGET: &str = "slipstream::dialog";

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

fn console_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_target(false)
        .with_writer(writer)
        .with_filter(filter_fn(|meta| meta.target() != DIALOG_TARGET))
}

fn open_log_file(log_dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)
}

/// Log to stdout and append to `slipstream.log` in `log_dir`.
///
/// Keep the returned guard alive until exit so buffered lines reach the file. If the log
/// file can't be opened, only stdout is used and there is no guard.
pub fn init_subscriber(log_dir: &Path, default_filter: &str) -> Option<WorkerGuard> {
    let file_appender = match open_log_file(log_dir) {
        Ok(appender) => appender,
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter(default_filter))
                .with(console_layer(std::io::stdout))
                .init();
            tracing::warn!(
                "Could not open log file in {}, logging to stdout only: {}",
                log_dir.display(),
                e
            );
            return None;
        }
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(console_layer(std::io::stdout))
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Some(guard)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::info;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'w> MakeWriter<'w> for Captured {
        type Writer = Captured;

        fn make_writer(&'w self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_console_skips_dialog_records() {
        let console = Captured::default();
        let subscriber = tracing_subscriber::registry()
            .with(console_layer(console.clone()));

        tracing::subscriber::with_default(subscriber, || {
            info!(target: DIALOG_TARGET, "INFO: Update Available - shown already");
            info!("Successfully authenticated");
        });

        let text = console.text();
        assert!(text.contains("Successfully authenticated"));
        assert!(!text.contains("Update Available"));
    }

    #[test]
    fn test_log_file_created_in_dir() {
        let dir = tempfile::tempdir().unwrap();

        let appender = open_log_file(dir.path());

        assert!(appender.is_ok());
        assert!(dir.path().join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn test_unusable_log_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("blocker");
        std::fs::write(&not_a_dir, "file, not a directory").unwrap();

        assert!(open_log_file(&not_a_dir).is_err());
    }
}
