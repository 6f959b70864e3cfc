use std::fmt;

/// Why a save attempt ended in the failed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FailureKind {
    /// The server did not acknowledge the profile write.
    Persist,
}

/// Lifecycle of the editor as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    LoadingProfile,
    Validating,
    Saving,
    Persisting,
    Done,
    Failed(FailureKind),
}

impl SaveStatus {
    /// Whether a new save request may start from this status.
    pub fn accepts_save(self) -> bool {
        matches!(self, Self::Idle | Self::Done | Self::Failed(_))
    }

    /// Whether a network round-trip owned by this editor is outstanding.
    pub fn is_busy(self) -> bool {
        !self.accepts_save()
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::LoadingProfile => write!(f, "loading-profile"),
            Self::Validating => write!(f, "validating"),
            Self::Saving => write!(f, "saving"),
            Self::Persisting => write!(f, "persisting"),
            Self::Done => write!(f, "done"),
            Self::Failed(FailureKind::Persist) => write!(f, "failed(persist)"),
        }
    }
}

/// General, non field-scoped message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Validation blocked the save; details live in the field errors.
    CorrectErrors,
    /// The chosen image exceeds the upload limit.
    FileTooLarge { limit_bytes: u64 },
    /// The server rejected or never acknowledged the save.
    SaveFailed,
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Self::CorrectErrors => {
                "Please correct the highlighted errors".to_string()
            }
            Self::FileTooLarge { limit_bytes } => format!(
                "File size exceeds the {} KB limit. Please upload a smaller file.",
                limit_bytes / 1024
            ),
            Self::SaveFailed => {
                "Your profile could not be saved. Please try again.".to_string()
            }
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_settled_states_accept_saves() {
        assert!(SaveStatus::Idle.accepts_save());
        assert!(SaveStatus::Done.accepts_save());
        assert!(SaveStatus::Failed(FailureKind::Persist).accepts_save());

        for busy in [
            SaveStatus::LoadingProfile,
            SaveStatus::Validating,
            SaveStatus::Saving,
            SaveStatus::Persisting,
        ] {
            assert!(busy.is_busy(), "{busy} should be busy");
        }
    }

    #[test]
    fn file_too_large_reports_kib() {
        let notice = Notice::FileTooLarge {
            limit_bytes: 800 * 1024,
        };
        assert!(notice.message().contains("800 KB"));
    }
}
