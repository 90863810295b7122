//! Mock log generation for exercising log pipelines and parsers.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::types::{SkillError, SkillResult};

/// Upper bound on the number of entries produced in one call.
pub const MAX_LOG_COUNT: usize = 1000;

const SERVICES: &[&str] = &[
    "api-gateway",
    "auth-service",
    "user-service",
    "payment-service",
    "notification-service",
    "cache-manager",
    "db-connector",
    "queue-worker",
];

const INFO_MESSAGES: &[&str] = &[
    "Request processed successfully",
    "User session started",
    "Cache hit for key: user_{}",
    "Connection established to database",
    "Health check passed",
    "Configuration reloaded",
    "Scheduled task completed",
    "Message published to queue",
];

const WARN_MESSAGES: &[&str] = &[
    "High memory usage detected: {}%",
    "Slow query detected: {}ms",
    "Rate limit approaching for client {}",
    "Retry attempt {} of 3",
    "Connection pool running low",
    "Deprecated API endpoint called",
    "Certificate expires in {} days",
];

const ERROR_MESSAGES: &[&str] = &[
    "Failed to connect to database: timeout",
    "Authentication failed for user {}",
    "Payment processing error: insufficient funds",
    "Service unavailable: upstream timeout",
    "Invalid request payload",
    "Queue message processing failed",
    "Disk space critical: {}% used",
];

const DEBUG_MESSAGES: &[&str] = &[
    "Entering function: process_request",
    "Variable state: count={}",
    "SQL query: SELECT * FROM users WHERE id={}",
    "HTTP response: status={}, body_size={}",
    "Cache miss for key: session_{}",
    "Decoding JWT token",
    "Validating input parameters",
];

/// Severity of a generated log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [LogLevel::Info, LogLevel::Warn, LogLevel::Error, LogLevel::Debug];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn messages(self) -> &'static [&'static str] {
        match self {
            LogLevel::Info => INFO_MESSAGES,
            LogLevel::Warn => WARN_MESSAGES,
            LogLevel::Error => ERROR_MESSAGES,
            LogLevel::Debug => DEBUG_MESSAGES,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = SkillError;

    fn from_str(s: &str) -> SkillResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INFO" => Ok(LogLevel::Info),
            "WARN" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "DEBUG" => Ok(LogLevel::Debug),
            _ => Err(SkillError::InvalidLevel(s.to_string())),
        }
    }
}

/// Which levels a generator may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Only(LogLevel),
}

impl FromStr for LevelFilter {
    type Err = SkillError;

    fn from_str(s: &str) -> SkillResult<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(LevelFilter::All);
        }
        s.parse().map(LevelFilter::Only)
    }
}

/// A single generated log line.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub level: LogLevel,
    pub service: &'static str,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] [{:5}] [{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.level,
            self.service,
            self.message
        )
    }
}

/// Random log entry generator.
pub struct LogGenerator {
    rng: StdRng,
}

impl LogGenerator {
    /// Create a generator seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a deterministic generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate `count` entries (capped at [`MAX_LOG_COUNT`]) spaced one second
    /// apart, the first one `count` seconds before `end`.
    pub fn generate(&mut self, count: usize, filter: LevelFilter, end: NaiveDateTime) -> Vec<LogEntry> {
        let count = count.min(MAX_LOG_COUNT);
        let base = end - Duration::seconds(count as i64);

        (0..count)
            .map(|i| {
                let jitter = Duration::milliseconds(self.rng.gen_range(0..=999));
                let timestamp = base + Duration::seconds(i as i64) + jitter;
                self.entry(filter, timestamp)
            })
            .collect()
    }

    /// Generate entries ending at the current local time.
    pub fn generate_now(&mut self, count: usize, filter: LevelFilter) -> Vec<LogEntry> {
        self.generate(count, filter, Local::now().naive_local())
    }

    fn entry(&mut self, filter: LevelFilter, timestamp: NaiveDateTime) -> LogEntry {
        let level = match filter {
            LevelFilter::All => LogLevel::ALL[self.rng.gen_range(0..LogLevel::ALL.len())],
            LevelFilter::Only(level) => level,
        };
        let service = SERVICES[self.rng.gen_range(0..SERVICES.len())];
        let templates = level.messages();
        let template = templates[self.rng.gen_range(0..templates.len())];

        let mut message = String::with_capacity(template.len() + 8);
        let mut pieces = template.split("{}").peekable();
        while let Some(piece) = pieces.next() {
            message.push_str(piece);
            if pieces.peek().is_some() {
                message.push_str(&self.rng.gen_range(1..=9999).to_string());
            }
        }

        LogEntry {
            timestamp,
            level,
            service,
            message,
        }
    }
}

impl Default for LogGenerator {
    fn default() -> Self {
        Self::new()
    }
}
