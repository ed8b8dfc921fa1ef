//! Personas
//!
//! The two fixed debate participants. Personas are not user-creatable: the
//! set is closed for the lifetime of the process, and each one carries its
//! own response tables, emotion slot and whiteboard.

use serde::{Deserialize, Serialize};

/// One of the two debate participants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Persona {
    /// Biologist and computer scientist; always speaks first
    Levin,
    /// Physicist and philosopher; always answers second
    Barandes,
}

impl Persona {
    /// Both personas in speaking order
    pub const ALL: [Persona; 2] = [Persona::Levin, Persona::Barandes];

    /// The persona that opens every exchange
    pub const FIRST: Persona = Persona::Levin;

    /// The other participant
    #[must_use]
    pub fn counterpart(self) -> Persona {
        match self {
            Self::Levin => Self::Barandes,
            Self::Barandes => Self::Levin,
        }
    }

    /// Full display name
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Levin => "Michael Levin",
            Self::Barandes => "Jacob Barandes",
        }
    }

    /// Lowercase identifier used for file names (`levin-whiteboard.png`)
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Levin => "levin",
            Self::Barandes => "barandes",
        }
    }

    /// Two-letter initials for compact avatar badges
    #[must_use]
    pub fn initials(self) -> &'static str {
        match self {
            Self::Levin => "ML",
            Self::Barandes => "JB",
        }
    }

    /// Field description shown under the name
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::Levin => "Biologist & Computer Scientist",
            Self::Barandes => "Physicist & Philosopher",
        }
    }

    /// Institutional affiliation
    #[must_use]
    pub fn affiliation(self) -> &'static str {
        match self {
            Self::Levin => "Tufts University, Harvard Wyss Institute",
            Self::Barandes => "Harvard University",
        }
    }

    /// One-line summary of the persona's research program
    #[must_use]
    pub fn tagline(self) -> &'static str {
        match self {
            Self::Levin => {
                "Pioneer of bioelectricity and collective intelligence in biological systems"
            }
            Self::Barandes => "Redefining quantum mechanics through stochastic foundations",
        }
    }

    /// Key insights listed on the persona card
    #[must_use]
    pub fn key_insights(self) -> &'static [&'static str] {
        match self {
            Self::Levin => &[
                "Biology as information processing",
                "Cells as problem-solving agents",
                "Morphospace navigation",
                "Bioelectric software of life",
            ],
            Self::Barandes => &[
                "Reality as indivisible stochastic processes",
                "Reconceptualizing quantum foundations",
                "Mathematics as ontological bridge",
                "Realism through re-foundation",
            ],
        }
    }

    /// Title of the persona's whiteboard panel
    #[must_use]
    pub fn whiteboard_title(self) -> &'static str {
        match self {
            Self::Levin => "Levin's Sketches",
            Self::Barandes => "Barandes' Diagrams",
        }
    }

    /// Signature colour as an RGB triple (emerald for Levin, blue for Barandes)
    #[must_use]
    pub fn signature_rgb(self) -> [u8; 3] {
        match self {
            Self::Levin => [0x10, 0xb9, 0x81],
            Self::Barandes => [0x3b, 0x82, 0xf6],
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Who wrote a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Author {
    /// One of the philosophers
    Persona(Persona),
    /// The person at the keyboard
    User,
}

impl Author {
    /// Display label for message headers
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Persona(p) => p.display_name(),
            Self::User => "You",
        }
    }

    /// The persona behind this author, if any
    #[must_use]
    pub fn persona(self) -> Option<Persona> {
        match self {
            Self::Persona(p) => Some(p),
            Self::User => None,
        }
    }
}

impl From<Persona> for Author {
    fn from(persona: Persona) -> Self {
        Author::Persona(persona)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterpart_is_involution() {
        for p in Persona::ALL {
            assert_ne!(p, p.counterpart());
            assert_eq!(p, p.counterpart().counterpart());
        }
    }

    #[test]
    fn test_slugs_are_file_safe() {
        assert_eq!(Persona::Levin.slug(), "levin");
        assert_eq!(Persona::Barandes.slug(), "barandes");
    }

    #[test]
    fn test_author_labels() {
        assert_eq!(Author::User.label(), "You");
        assert_eq!(Author::from(Persona::Barandes).label(), "Jacob Barandes");
        assert_eq!(Author::User.persona(), None);
        assert_eq!(Author::Persona(Persona::Levin).persona(), Some(Persona::Levin));
    }
}
