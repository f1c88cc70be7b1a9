//! System instructions for the summarization calls.
//!
//! Both prompts are plain configuration values; [`Prompts`] carries the pair
//! actually used so callers can swap them without touching the engine.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::chunk::approx_tokens;

/// Instruction for each chunk of a decision.
pub const CHUNK_PROMPT: &str = "Du bist ein juristischer Assistent. \
Du erhältst einen Abschnitt aus einer Entscheidung des Bundesfinanzhofs. \
Fasse den Inhalt dieses Abschnitts in wenigen knappen Sätzen zusammen. \
Vermeide Fußnoten, Aktenzeichen und Zitate. \
Wenn der Abschnitt nur Formalien enthält, sage das in einem Satz.";

/// Instruction for combining the chunk summaries into one paragraph.
pub const REDUCE_PROMPT: &str = "Du bist ein juristischer Assistent. \
Du erhältst Teilzusammenfassungen einer Entscheidung des Bundesfinanzhofs, \
getrennt durch '---'. \
Fasse die BFH-Entscheidung in EINEM kurzen Absatz zusammen. \
Maximal 5 Sätze. \
Vermeide Fußnoten, Aktenzeichen und Zitate. \
Erkläre den Kern der Entscheidung so, dass Steuerberater:innen ihn in 30 Sekunden erfassen können.";

/// Separator between chunk summaries in the reduce input.
pub const REDUCE_SEPARATOR: &str = "\n\n---\n\n";

/// The instruction pair used for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompts {
    /// Per-chunk instruction
    pub chunk: String,

    /// Synthesis instruction
    pub reduce: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            chunk: CHUNK_PROMPT.to_string(),
            reduce: REDUCE_PROMPT.to_string(),
        }
    }
}

impl Prompts {
    /// Approximate token count of the longer instruction.
    pub fn instruction_tokens(&self) -> usize {
        approx_tokens(&self.chunk).max(approx_tokens(&self.reduce))
    }

    /// SHA-256 over both instructions, hex encoded.
    ///
    /// Printed in the report so readers can tell which prompt version
    /// produced a set of summaries.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.chunk.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.reduce.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// First 12 hex digits of [`Prompts::fingerprint`].
    pub fn short_fingerprint(&self) -> String {
        let mut hash = self.fingerprint();
        hash.truncate(12);
        hash
    }
}

/// Join chunk contributions into the reduce input.
pub fn format_reduce_input<'a>(contributions: impl IntoIterator<Item = &'a str>) -> String {
    contributions
        .into_iter()
        .collect::<Vec<_>>()
        .join(REDUCE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_consistent() {
        let hash1 = Prompts::default().fingerprint();
        let hash2 = Prompts::default().fingerprint();
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_eq!(Prompts::default().short_fingerprint().len(), 12);
    }

    #[test]
    fn test_fingerprint_changes_with_prompt() {
        let custom = Prompts {
            chunk: "Kurz.".into(),
            ..Prompts::default()
        };
        assert_ne!(custom.fingerprint(), Prompts::default().fingerprint());
    }

    #[test]
    fn test_fingerprint_separates_fields() {
        let a = Prompts { chunk: "ab".into(), reduce: "c".into() };
        let b = Prompts { chunk: "a".into(), reduce: "bc".into() };
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_format_reduce_input() {
        let joined = format_reduce_input(["Teil A", "Teil B"]);
        assert_eq!(joined, "Teil A\n\n---\n\nTeil B");
    }
}
