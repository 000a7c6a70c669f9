use flexi_logger::{
    opt_format, Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle,
    Naming,
};
use std::path::Path;

/// Starts the global logger. The level comes from `RUST_LOG`, falling back to "info".
///
/// With a `log_dir`, logs are also written to size-rotated files there. The
/// returned handle must be kept alive for the duration of the program.
pub fn setup_logging(log_dir: Option<&Path>) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str("info")?.format(opt_format);

    match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir))
            .duplicate_to_stderr(Duplicate::Info)
            .rotate(
                Criterion::Size(10 * 1024 * 1024), // Rotate logs after they reach 10 MB
                Naming::Numbers,
                Cleanup::KeepLogFiles(3),
            )
            .start(),
        None => logger.log_to_stderr().start(),
    }
}
