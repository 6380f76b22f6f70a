//! Simulation logger
//!
//! Один глобальный `LogPrinter` на процесс: headless/тесты ставят `ConsoleLogger`,
//! хост (движок) может подменить своим принтером через `set_logger`.

use once_cell::sync::Lazy;
use std::sync::Mutex;

static LOGGER: Lazy<Mutex<Option<Box<dyn LogPrinter>>>> = Lazy::new(|| Mutex::new(None));

static LOGGER_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

pub fn set_logger(logger: Box<dyn LogPrinter>) {
    if let Ok(mut slot) = LOGGER.lock() {
        *slot = Some(logger);
    }
}

pub fn set_log_level(level: LogLevel) {
    if let Ok(mut current) = LOGGER_LEVEL.lock() {
        *current = level;
    }
}

pub fn set_logger_if_needed(logger: Box<dyn LogPrinter>) {
    let Ok(mut slot) = LOGGER.lock() else {
        return;
    };
    if slot.is_none() {
        *slot = Some(logger);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

pub trait LogPrinter: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

/// Пишет сообщение если `level` не ниже порога из `set_log_level`.
///
/// Timestamp добавляется здесь, принтеры получают готовую строку.
pub fn log_with_level(level: LogLevel, message: &str) {
    let threshold = LOGGER_LEVEL.lock().map(|l| *l).unwrap_or(LogLevel::Debug);
    if level < threshold {
        return;
    }

    if let Ok(slot) = LOGGER.lock() {
        if let Some(logger) = slot.as_ref() {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            logger.log(level, &format!("[{}] {}", timestamp, message));
        }
    }
}

pub struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn log(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}

pub fn init_logger() {
    set_logger_if_needed(Box::new(ConsoleLogger));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert_eq!(LogLevel::Warning.as_str(), "WARNING");
    }

    struct RecordingLogger(Arc<Mutex<Vec<(LogLevel, String)>>>);

    impl LogPrinter for RecordingLogger {
        fn log(&self, level: LogLevel, message: &str) {
            if let Ok(mut lines) = self.0.lock() {
                lines.push((level, message.to_string()));
            }
        }
    }

    #[test]
    fn test_messages_below_level_are_dropped() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        set_logger(Box::new(RecordingLogger(lines.clone())));
        set_log_level(LogLevel::Warning);

        log("level-filter debug");
        log_info("level-filter info");
        log_warning("level-filter warning");
        log_error("level-filter error");
        set_log_level(LogLevel::Debug);

        let recorded: Vec<(LogLevel, String)> = lines
            .lock()
            .map(|l| l.clone())
            .unwrap_or_default()
            .into_iter()
            .filter(|(_, message)| message.contains("level-filter"))
            .collect();
        let levels: Vec<LogLevel> = recorded.iter().map(|(level, _)| *level).collect();
        assert_eq!(levels, vec![LogLevel::Warning, LogLevel::Error]);
        // Timestamp добавляет log_with_level
        assert!(recorded[0].1.starts_with('['));
        assert!(recorded[0].1.ends_with("level-filter warning"));

        set_logger(Box::new(ConsoleLogger));
    }
}
