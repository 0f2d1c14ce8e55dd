//! Log level definitions
//!
//! A [`Level`] is a signed integer rank. The native scale has four points
//! (DEBUG, INFO, WARN, ERROR) spaced [`Level::STEP`] apart; TRACE and FATAL
//! are synthetic levels placed one step outside the native range, so any
//! comparison against a native level keeps its meaning.

use super::error::LoggerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI32, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(i32);

impl Level {
    /// Distance between neighbouring named levels
    pub const STEP: i32 = 4;

    pub const TRACE: Level = Level(Self::DEBUG.0 - Self::STEP);
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);
    pub const FATAL: Level = Level(Self::ERROR.0 + Self::STEP);

    /// Every named level, lowest first
    pub const ALL: [Level; 6] = [
        Level::TRACE,
        Level::DEBUG,
        Level::INFO,
        Level::WARN,
        Level::ERROR,
        Level::FATAL,
    ];

    #[must_use]
    pub const fn from_rank(rank: i32) -> Self {
        Level(rank)
    }

    #[must_use]
    pub const fn rank(self) -> i32 {
        self.0
    }

    /// Case-insensitive lookup of a named level
    ///
    /// # Examples
    ///
    /// ```
    /// use fanout_logger::Level;
    ///
    /// assert_eq!(Level::lookup("trace"), Some(Level::TRACE));
    /// assert_eq!(Level::lookup("Fatal"), Some(Level::FATAL));
    /// assert_eq!(Level::lookup("verbose"), None);
    /// ```
    #[must_use]
    pub fn lookup(name: &str) -> Option<Level> {
        Level::ALL
            .iter()
            .copied()
            .find(|level| level.canonical_name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    /// Name of an exact named level, `None` for in-between ranks
    fn canonical_name(self) -> Option<&'static str> {
        match self {
            Level::TRACE => Some("TRACE"),
            Level::DEBUG => Some("DEBUG"),
            Level::INFO => Some("INFO"),
            Level::WARN => Some("WARN"),
            Level::ERROR => Some("ERROR"),
            Level::FATAL => Some("FATAL"),
            _ => None,
        }
    }

    /// Human-readable name with the synthetic extremes collapsed
    ///
    /// Ranks at or below TRACE render `TRACE`, ranks at or above FATAL render
    /// `FATAL`, everything else renders its [`native_name`](Self::native_name).
    #[must_use]
    pub fn name(self) -> Cow<'static, str> {
        if self <= Level::TRACE {
            Cow::Borrowed("TRACE")
        } else if self >= Level::FATAL {
            Cow::Borrowed("FATAL")
        } else {
            self.native_name()
        }
    }

    /// Name relative to the nearest native level at or below this rank
    ///
    /// ```
    /// use fanout_logger::Level;
    ///
    /// assert_eq!(Level::TRACE.native_name(), "DEBUG-4");
    /// assert_eq!(Level::FATAL.native_name(), "ERROR+4");
    /// assert_eq!(Level::from_rank(2).native_name(), "INFO+2");
    /// ```
    #[must_use]
    pub fn native_name(self) -> Cow<'static, str> {
        let (base, base_name) = if self < Level::INFO {
            (Level::DEBUG, "DEBUG")
        } else if self < Level::WARN {
            (Level::INFO, "INFO")
        } else if self < Level::ERROR {
            (Level::WARN, "WARN")
        } else {
            (Level::ERROR, "ERROR")
        };

        let offset = self.0 - base.0;
        if offset == 0 {
            Cow::Borrowed(base_name)
        } else {
            Cow::Owned(format!("{}{:+}", base_name, offset))
        }
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        if *self <= Level::TRACE {
            BrightBlack
        } else if *self < Level::INFO {
            Blue
        } else if *self < Level::WARN {
            Green
        } else if *self < Level::ERROR {
            Yellow
        } else if *self < Level::FATAL {
            Red
        } else {
            BrightRed
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::INFO
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::lookup(s).ok_or_else(|| LoggerError::unknown_level(s))
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Atomically updatable minimum level shared by a logger and its backends
///
/// # Example
///
/// ```
/// use fanout_logger::{Level, LevelVar};
///
/// let floor = LevelVar::new(Level::INFO);
/// assert!(!floor.set_by_name("verbose"));
/// assert_eq!(floor.get(), Level::INFO);
///
/// assert!(floor.set_by_name("debug"));
/// assert_eq!(floor.get(), Level::DEBUG);
/// ```
#[derive(Debug, Default)]
pub struct LevelVar(AtomicI32);

impl LevelVar {
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self(AtomicI32::new(level.rank()))
    }

    #[inline]
    pub fn get(&self) -> Level {
        Level(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set(&self, level: Level) {
        self.0.store(level.rank(), Ordering::Relaxed);
    }

    /// Set the floor from a level name; unknown names leave it unchanged
    pub fn set_by_name(&self, name: &str) -> bool {
        match Level::lookup(name) {
            Some(level) => {
                self.set(level);
                true
            }
            None => false,
        }
    }

    /// Whether a record at `level` passes this floor
    #[inline]
    pub fn allows(&self, level: Level) -> bool {
        level >= self.get()
    }
}
