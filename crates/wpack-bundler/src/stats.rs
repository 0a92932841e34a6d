//! Report rendering options.

use wpack_config::StatsSettings;

/// Toggles applied when a report is rendered to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsOptions {
    /// ANSI colours in the rendered text.
    pub colors: bool,
    /// Include the build hash line.
    pub hash: bool,
    /// Include per-asset chunk ids.
    pub chunks: bool,
    /// Include the engine version line.
    pub version: bool,
}

impl Default for StatsOptions {
    /// Colours on, hash/chunks/version off.
    fn default() -> Self {
        Self {
            colors: true,
            hash: false,
            chunks: false,
            version: false,
        }
    }
}

impl StatsOptions {
    /// Everything off, suitable for logs and snapshots.
    pub fn plain() -> Self {
        Self {
            colors: false,
            ..Self::default()
        }
    }

    /// Everything on.
    pub fn verbose() -> Self {
        Self {
            colors: true,
            hash: true,
            chunks: true,
            version: true,
        }
    }

    pub fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    pub fn hash(mut self, enabled: bool) -> Self {
        self.hash = enabled;
        self
    }

    pub fn chunks(mut self, enabled: bool) -> Self {
        self.chunks = enabled;
        self
    }

    pub fn version(mut self, enabled: bool) -> Self {
        self.version = enabled;
        self
    }
}

impl From<StatsSettings> for StatsOptions {
    fn from(settings: StatsSettings) -> Self {
        Self {
            colors: settings.colors,
            hash: settings.hash,
            chunks: settings.chunks,
            version: settings.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_readable_log_output() {
        let options = StatsOptions::default();
        assert!(options.colors);
        assert!(!options.hash);
        assert!(!options.chunks);
        assert!(!options.version);
    }

    #[test]
    fn builder_toggles() {
        let options = StatsOptions::plain().hash(true).chunks(true);
        assert_eq!(
            options,
            StatsOptions {
                colors: false,
                hash: true,
                chunks: true,
                version: false,
            }
        );
    }

    #[test]
    fn from_project_settings() {
        let settings = StatsSettings {
            colors: false,
            hash: true,
            chunks: false,
            version: true,
        };
        let options = StatsOptions::from(settings);
        assert!(!options.colors);
        assert!(options.hash);
        assert!(options.version);
    }
}
