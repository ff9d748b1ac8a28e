use std::{
    fmt::{Arguments, Display},
    str::FromStr,
    sync::{atomic::AtomicI8, Mutex, OnceLock},
    time::{SystemTime, UNIX_EPOCH},
};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug = 0,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the lowercase name of this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLogLevel(String);

impl Display for InvalidLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid log level `{}`, expected one of: debug, info, warn, error",
            self.0
        )
    }
}

impl std::error::Error for InvalidLogLevel {}

impl FromStr for LogLevel {
    type Err = InvalidLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            _ if s.eq_ignore_ascii_case("debug") => Ok(LogLevel::Debug),
            _ if s.eq_ignore_ascii_case("info") => Ok(LogLevel::Info),
            _ if s.eq_ignore_ascii_case("warn") || s.eq_ignore_ascii_case("warning") => {
                Ok(LogLevel::Warn)
            }
            _ if s.eq_ignore_ascii_case("error") => Ok(LogLevel::Error),
            _ => Err(InvalidLogLevel(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Record<'a> {
    level: LogLevel,
    module_path: &'static str,
    args: Arguments<'a>,
}

impl<'a> Record<'a> {
    pub fn new(level: LogLevel, module_path: &'static str, args: Arguments<'a>) -> Self {
        Record {
            level,
            module_path,
            args,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    pub fn args(&self) -> &Arguments<'a> {
        &self.args
    }
}

pub trait Logger: Send + Sync {
    fn log(&self, record: &Record<'_>);
}

/// A logger that discards every record.
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _record: &Record<'_>) {}
}

/// Returned when a global logger was already installed.
#[derive(Debug)]
pub struct SetLoggerError;

impl Display for SetLoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "logger was already set")
    }
}

impl std::error::Error for SetLoggerError {}

static GLOBAL_LOGGER: OnceLock<Box<dyn Logger>> = OnceLock::new();
static MIN_LOG_LEVEL: AtomicI8 = AtomicI8::new(0);

/// Sets the current logger, this can only be done once.
pub fn set_logger<T: Logger + 'static>(logger: T) -> Result<(), SetLoggerError> {
    GLOBAL_LOGGER
        .set(Box::new(logger))
        .map_err(|_| SetLoggerError)
}

/// Gets the current logger.
pub fn get_logger() -> &'static dyn Logger {
    match GLOBAL_LOGGER.get() {
        Some(logger) => logger.as_ref(),
        None => &NoopLogger,
    }
}

/// Sets a global log filter.
pub fn set_log_filter(level: LogLevel) {
    MIN_LOG_LEVEL.store(level as i8, std::sync::atomic::Ordering::Release);
}

/// Check if the current level can be log.
pub fn can_log(level: LogLevel) -> bool {
    let min_level = MIN_LOG_LEVEL.load(std::sync::atomic::Ordering::Acquire);
    level as i8 >= min_level
}

#[doc(hidden)]
#[inline]
pub fn __log(record: Record<'_>) {
    if can_log(record.level) {
        get_logger().log(&record);
    }
}

/// A logger that logs to the current console.
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, record: &Record<'_>) {
        fn colorize(text: &str, color_code: &str) -> String {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        }

        #[rustfmt::skip]
        let level_str = match record.level {
            LogLevel::Debug => colorize("DEBUG", "37"),
            LogLevel::Info  => colorize("INFO ", "34"),
            LogLevel::Warn  => colorize("WARN ", "33"),
            LogLevel::Error => colorize("ERROR", "31"),
        };

        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        let time_str = colorize(&format!("{:03}ms", ms), "90");
        let module_str = colorize(record.module_path, "36");

        if record.level != LogLevel::Error {
            println!("{level_str} [{time_str}] [{module_str}]: {}", record.args);
        } else {
            eprintln!("{level_str} [{time_str}] [{module_str}]: {}", record.args);
        }
    }
}

/// A logger that keeps the formatted records in memory.
#[derive(Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub const fn new() -> Self {
        MemoryLogger {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of the records captured so far.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether any captured record at `level` contains `text`.
    pub fn contains(&self, level: LogLevel, text: &str) -> bool {
        self.records()
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(text))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, record: &Record<'_>) {
        let line = format!("[{}]: {}", record.module_path, record.args);
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push((record.level, line));
    }
}

// `&'static MemoryLogger` can be installed globally and still be read back.
impl<T: Logger + ?Sized> Logger for &'static T {
    fn log(&self, record: &Record<'_>) {
        (**self).log(record)
    }
}

#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)*) => {
        $crate::__log($crate::Record::new($level, module_path!(), format_args!($($arg)*)));
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Info, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Warn, $($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Error, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::{LogLevel, Logger, MemoryLogger, Record};

    #[test]
    fn should_parse_log_levels() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!(" Warning ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("error".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn should_order_levels_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn should_capture_records_in_memory() {
        let logger = MemoryLogger::new();
        logger.log(&Record::new(
            LogLevel::Warn,
            module_path!(),
            format_args!("missing {}", 42),
        ));

        let records = logger.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, LogLevel::Warn);
        assert!(records[0].1.ends_with("missing 42"));
        assert!(logger.contains(LogLevel::Warn, "missing 42"));
        assert!(!logger.contains(LogLevel::Error, "missing 42"));
    }
}
