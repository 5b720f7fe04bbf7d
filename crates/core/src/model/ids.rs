use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an ID from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

// The backend hands out opaque string identifiers ("physics", "quiz_3f2a...").
// Each kind gets its own newtype so a topic id can never be passed where a quiz
// id is expected.
macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() || trimmed.contains('/') {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

string_id! {
    /// Unique identifier for a Quiz
    QuizId
}

string_id! {
    /// Unique identifier for a Subject
    SubjectId
}

string_id! {
    /// Unique identifier for a Chapter
    ChapterId
}

string_id! {
    /// Unique identifier for a Topic
    TopicId
}

string_id! {
    /// Unique identifier for a Video
    VideoId
}

string_id! {
    /// Unique identifier for a PDF document
    PdfId
}

string_id! {
    /// Unique identifier for a User (student, teacher or admin)
    UserId
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
