use std::fmt;

/// Forwarding entry points. Both reach the same upstream endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Generate,
    Chat,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Generate, Route::Chat];

    /// Path segment under the mount prefix.
    pub fn segment(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Chat => "chat",
        }
    }

    /// Label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Generate => "Build",
            Self::Chat => "Chat",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.segment() == segment)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}
