//! Response Tables
//!
//! Static keyword-to-paragraph lookup for each persona. There are two
//! table variants: opening statements (keyed by the duel topic) and replies
//! (keyed by a user remark). Both use the same selection rule:
//!
//! 1. Lowercase the input.
//! 2. Walk the persona's keyword groups in order.
//! 3. Return the paragraph of the first group with any keyword contained
//!    in the input.
//! 4. Otherwise return the persona's default paragraph.
//!
//! No scoring and no randomness, so the same input always yields the same
//! paragraph.

use serde::{Deserialize, Serialize};

use crate::persona::Persona;

/// Which table variant to consult
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseKind {
    /// Opening statement for a freshly chosen topic
    Opening,
    /// Reply to a remark the user submitted mid-duel
    Reply,
}

/// An ordered set of keywords bound to one paragraph
#[derive(Debug)]
pub struct KeywordGroup {
    /// Lowercase keywords; any one of them selects the group
    pub keywords: &'static [&'static str],
    /// The paragraph returned on a match
    pub paragraph: &'static str,
}

impl KeywordGroup {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// One persona's table for one [`ResponseKind`]
#[derive(Debug)]
pub struct ResponseTable {
    /// Groups in priority order
    pub groups: &'static [KeywordGroup],
    /// Paragraph used when no group matches
    pub default: &'static str,
}

impl ResponseTable {
    /// Look up the table for a persona and kind
    #[must_use]
    pub fn for_persona(persona: Persona, kind: ResponseKind) -> &'static ResponseTable {
        match (persona, kind) {
            (Persona::Levin, ResponseKind::Opening) => &LEVIN_OPENING,
            (Persona::Barandes, ResponseKind::Opening) => &BARANDES_OPENING,
            (Persona::Levin, ResponseKind::Reply) => &LEVIN_REPLY,
            (Persona::Barandes, ResponseKind::Reply) => &BARANDES_REPLY,
        }
    }

    /// Select the paragraph for `input`
    #[must_use]
    pub fn select(&self, input: &str) -> &'static str {
        let lowered = input.to_lowercase();
        self.groups
            .iter()
            .find(|g| g.matches(&lowered))
            .map_or(self.default, |g| g.paragraph)
    }
}

/// Opening statement for `topic` in `persona`'s voice
#[must_use]
pub fn opening_statement(topic: &str, persona: Persona) -> &'static str {
    ResponseTable::for_persona(persona, ResponseKind::Opening).select(topic)
}

/// Reply to a user remark in `persona`'s voice
#[must_use]
pub fn reply_to(remark: &str, persona: Persona) -> &'static str {
    ResponseTable::for_persona(persona, ResponseKind::Reply).select(remark)
}

// ============================================================================
// Opening statements
// ============================================================================

static LEVIN_OPENING: ResponseTable = ResponseTable {
    groups: &[
        KeywordGroup {
            keywords: &["consciousness", "mind"],
            paragraph: "Fascinating question about consciousness! From my research, consciousness emerges from the collective intelligence of cellular networks. Each cell has primitive cognition, and when they coordinate through bioelectric signals, we get higher-order awareness. It's fundamentally about information processing at multiple scales.",
        },
        KeywordGroup {
            keywords: &["information", "data"],
            paragraph: "This touches on something fundamental - information is the key to understanding reality! Biology shows us that life is essentially sophisticated information processing. Cells store, transmit, and compute with bioelectric patterns. What we call 'physical' reality is really biological software running on cellular hardware.",
        },
        KeywordGroup {
            keywords: &["emergence", "complex"],
            paragraph: "Emergence is absolutely real and irreducible! When cells coordinate electrically, they create collective intelligence that cannot be predicted from individual cell behavior. The whole genuinely transcends its parts - this is what I see in morphogenetic processes every day.",
        },
        KeywordGroup {
            keywords: &["reality", "nature"],
            paragraph: "Reality is fundamentally computational! Every biological system, from cells to organisms, processes information to solve problems. What we perceive as 'physical' is really the hardware running sophisticated biological software. Life shows us that information processing is the deepest level of reality.",
        },
    ],
    default: "This is a profound question that goes to the heart of how biological systems work. From my perspective studying morphogenesis and bioelectricity, I see that living systems approach such questions through collective problem-solving. Cells coordinate through bioelectric networks to navigate complex possibility spaces and achieve sophisticated goals.",
};

static BARANDES_OPENING: ResponseTable = ResponseTable {
    groups: &[
        KeywordGroup {
            keywords: &["consciousness", "mind"],
            paragraph: "Consciousness presents a deep puzzle that might require rethinking our foundations. Rather than computational networks, consciousness might emerge from the mathematical structure of indivisible stochastic processes - the integration of fundamental random events into unified experiential wholes.",
        },
        KeywordGroup {
            keywords: &["information", "data"],
            paragraph: "I'd caution against conflating our mathematical descriptions with ontological reality. Information might be a useful tool for modeling systems, but the actual substrate could be indivisible stochastic processes, not information itself. We must distinguish our descriptive tools from what's really there.",
        },
        KeywordGroup {
            keywords: &["emergence", "complex"],
            paragraph: "Apparent emergence often reflects our incomplete understanding rather than genuine irreducibility. Mathematical frameworks can bridge different scales without requiring true emergence. Stochastic foundations might generate seemingly emergent behaviors through purely reductionist mechanisms.",
        },
        KeywordGroup {
            keywords: &["reality", "nature"],
            paragraph: "Reality consists of indivisible stochastic processes - that's the fundamental level. What we perceive as 'computation' or 'information' are just useful mathematical descriptions, not the actual nature of reality itself. The mathematics is our tool, not the territory.",
        },
    ],
    default: "This question touches on fundamental issues that require careful mathematical and philosophical analysis. I approach such problems by examining the foundational assumptions we make and asking whether alternative mathematical frameworks might provide deeper insight into the underlying reality.",
};

// ============================================================================
// Replies to user remarks
// ============================================================================

static LEVIN_REPLY: ResponseTable = ResponseTable {
    groups: &[
        KeywordGroup {
            keywords: &["consciousness"],
            paragraph: "Fascinating question! Consciousness emerges from the collective intelligence of cellular networks. Each cell has primitive cognition, and when they coordinate through bioelectric signals, we get higher-order awareness. It's like a biological internet!",
        },
        KeywordGroup {
            keywords: &["information", "data"],
            paragraph: "Information is the key! Biology is fundamentally about information processing. Cells store, transmit, and compute with bioelectric patterns. What we call 'life' is really sophisticated biological software running on cellular hardware.",
        },
        KeywordGroup {
            keywords: &["quantum"],
            paragraph: "Quantum effects in biology are intriguing, but I focus on the computational aspects. Cells solve complex problems through bioelectric networks - they don't need quantum mechanics to exhibit collective intelligence and goal-directed behavior.",
        },
    ],
    default: "That's a thought-provoking point! From my perspective, biological systems approach this through collective problem-solving. Cells coordinate through bioelectric networks to navigate morphospace and achieve complex goals.",
};

static BARANDES_REPLY: ResponseTable = ResponseTable {
    groups: &[
        KeywordGroup {
            keywords: &["consciousness"],
            paragraph: "Consciousness might emerge from the mathematical structure of indivisible stochastic processes. Rather than computational networks, it could be the integration of fundamental random events into unified experiential wholes.",
        },
        KeywordGroup {
            keywords: &["information", "data"],
            paragraph: "I'd caution against conflating our mathematical descriptions with ontological reality. Information might be a useful tool for modeling systems, but the substrate could be indivisible stochastic processes, not information itself.",
        },
        KeywordGroup {
            keywords: &["quantum"],
            paragraph: "Exactly! Quantum mechanics reveals the stochastic foundations of reality. My work shows that quantum phenomena emerge from indivisible random processes - no mysterious 'collapse' needed, just pure mathematical realism.",
        },
    ],
    default: "Interesting observation! I approach this through the lens of mathematical foundations. We must distinguish between our descriptive tools and the underlying ontological reality - which I believe consists of indivisible stochastic processes.",
};

/// Example topics suggested on the topic selection screen
pub const EXAMPLE_TOPICS: &[&str] = &[
    "What is the relationship between mind and matter?",
    "How does emergence work in complex systems?",
    "Is information fundamental to reality?",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consciousness_topic_selects_specific_opening() {
        let text = opening_statement("What is consciousness?", Persona::Levin);
        assert!(text.starts_with("Fascinating question about consciousness!"));
        assert_ne!(text, LEVIN_OPENING.default);
    }

    #[test]
    fn test_quantum_remark_selects_quantum_reply() {
        let text = reply_to("Tell me about QUANTUM theory", Persona::Barandes);
        assert!(text.starts_with("Exactly! Quantum mechanics"));
    }

    #[test]
    fn test_first_matching_group_wins() {
        // "mind" (group 1) and "data" (group 2) both present
        let text = opening_statement("data about the mind", Persona::Barandes);
        assert!(text.starts_with("Consciousness presents a deep puzzle"));
    }

    #[test]
    fn test_unmatched_input_falls_back_to_default() {
        assert_eq!(reply_to("hello there", Persona::Levin), LEVIN_REPLY.default);
        assert_eq!(
            opening_statement("", Persona::Barandes),
            BARANDES_OPENING.default
        );
    }

    #[test]
    fn test_reply_table_has_no_emergence_group() {
        // Opening knows "emergence"; replies do not
        assert_ne!(
            opening_statement("emergence", Persona::Levin),
            LEVIN_OPENING.default
        );
        assert_eq!(reply_to("emergence", Persona::Levin), LEVIN_REPLY.default);
    }

    #[test]
    fn test_every_table_yields_non_empty_paragraphs() {
        let inputs = [
            "",
            "   ",
            "consciousness",
            "Information!",
            "quantum data",
            "complex nature",
            "ünïcödé ✨",
        ];
        for persona in Persona::ALL {
            for kind in [ResponseKind::Opening, ResponseKind::Reply] {
                let table = ResponseTable::for_persona(persona, kind);
                for input in inputs {
                    assert!(!table.select(input).trim().is_empty());
                }
            }
        }
    }

    #[test]
    fn test_example_topics_hit_specific_openings() {
        for topic in EXAMPLE_TOPICS {
            assert_ne!(opening_statement(topic, Persona::Levin), LEVIN_OPENING.default);
        }
    }
}
