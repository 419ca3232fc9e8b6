//! Student-facing selections: subject, learning depth, explanation style and
//! refinement mode.
//!
//! Each enum serialises as its display label (`"Computer Science"`,
//! `"Step-by-Step"`) so the history log stays human-readable. Parsing is
//! lenient: case, spaces, `-` and `_` are ignored, and a few short aliases
//! are accepted (`cs`, `econ`, `steps`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lowercase and drop everything that is not alphanumeric.
fn normalise(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

// ── Subject ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    General,
    Math,
    Science,
    #[serde(rename = "Computer Science")]
    ComputerScience,
    Economics,
}

impl Subject {
    pub const ALL: [Subject; 5] = [
        Subject::General,
        Subject::Math,
        Subject::Science,
        Subject::ComputerScience,
        Subject::Economics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Subject::General => "General",
            Subject::Math => "Math",
            Subject::Science => "Science",
            Subject::ComputerScience => "Computer Science",
            Subject::Economics => "Economics",
        }
    }

    /// Subject-specific guidance embedded in the per-turn prompt.
    pub fn guidance(self) -> &'static str {
        match self {
            Subject::General => {
                "Connect the idea to everyday experience and keep terminology light."
            }
            Subject::Math => {
                "Show the reasoning behind each step, name the rule being applied, and \
                 include one small worked example with numbers."
            }
            Subject::Science => {
                "Explain the underlying mechanism (cause and effect), relate it to an \
                 observable phenomenon, and mention the relevant scientific term."
            }
            Subject::ComputerScience => {
                "Describe what happens step by step as a computer would execute it; use a \
                 short pseudocode or code snippet where it clarifies the concept."
            }
            Subject::Economics => {
                "Frame the concept around incentives and trade-offs, and ground it in a \
                 familiar market or household example."
            }
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "general" => Ok(Subject::General),
            "math" | "maths" | "mathematics" => Ok(Subject::Math),
            "science" => Ok(Subject::Science),
            "computerscience" | "cs" | "computing" => Ok(Subject::ComputerScience),
            "economics" | "econ" => Ok(Subject::Economics),
            _ => Err(unknown("subject", s, Subject::ALL.iter().map(|v| v.label()))),
        }
    }
}

// ── Depth ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Depth {
    Basic,
    Intermediate,
    Detailed,
}

impl Depth {
    pub const ALL: [Depth; 3] = [Depth::Basic, Depth::Intermediate, Depth::Detailed];

    pub fn label(self) -> &'static str {
        match self {
            Depth::Basic => "Basic",
            Depth::Intermediate => "Intermediate",
            Depth::Detailed => "Detailed",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Depth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "basic" => Ok(Depth::Basic),
            "intermediate" => Ok(Depth::Intermediate),
            "detailed" => Ok(Depth::Detailed),
            _ => Err(unknown("depth", s, Depth::ALL.iter().map(|v| v.label()))),
        }
    }
}

// ── Style ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Simple,
    #[serde(rename = "Step-by-Step")]
    StepByStep,
    #[serde(rename = "Concept Breakdown")]
    ConceptBreakdown,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Simple, Style::StepByStep, Style::ConceptBreakdown];

    pub fn label(self) -> &'static str {
        match self {
            Style::Simple => "Simple",
            Style::StepByStep => "Step-by-Step",
            Style::ConceptBreakdown => "Concept Breakdown",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "simple" => Ok(Style::Simple),
            "stepbystep" | "steps" => Ok(Style::StepByStep),
            "conceptbreakdown" | "breakdown" => Ok(Style::ConceptBreakdown),
            _ => Err(unknown("style", s, Style::ALL.iter().map(|v| v.label()))),
        }
    }
}

// ── Refinement ───────────────────────────────────────────────────────────────

/// Alters the next prompt without discarding prior context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinementMode {
    #[default]
    None,
    Simpler,
    MoreExamples,
}

impl RefinementMode {
    /// Instruction line for the per-turn prompt; empty for [`RefinementMode::None`].
    pub fn instruction(self) -> &'static str {
        match self {
            RefinementMode::None => "",
            RefinementMode::Simpler => {
                "Refinement: the previous explanation was too hard. Re-explain the same \
                 idea in simpler words, shorter sentences and with an everyday analogy."
            }
            RefinementMode::MoreExamples => {
                "Refinement: the student asked for more examples. Keep the explanation \
                 brief and give at least three additional, varied real-world examples."
            }
        }
    }
}

impl fmt::Display for RefinementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RefinementMode::None => "none",
            RefinementMode::Simpler => "simpler",
            RefinementMode::MoreExamples => "more_examples",
        })
    }
}

/// The three selections that travel with every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub subject: Subject,
    pub depth: Depth,
    pub style: Style,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            subject: Subject::General,
            depth: Depth::Basic,
            style: Style::Simple,
        }
    }
}

fn unknown<'a>(kind: &str, value: &str, choices: impl Iterator<Item = &'a str>) -> String {
    let choices = choices.collect::<Vec<_>>().join(", ");
    format!("unknown {kind} '{}' (choose one of: {choices})", value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_parses_labels_and_aliases() {
        assert_eq!("Computer Science".parse::<Subject>(), Ok(Subject::ComputerScience));
        assert_eq!("computer-science".parse::<Subject>(), Ok(Subject::ComputerScience));
        assert_eq!("CS".parse::<Subject>(), Ok(Subject::ComputerScience));
        assert_eq!(" maths ".parse::<Subject>(), Ok(Subject::Math));
    }

    #[test]
    fn unknown_subject_lists_choices() {
        let err = "history".parse::<Subject>().unwrap_err();
        assert!(err.contains("unknown subject 'history'"));
        assert!(err.contains("Economics"));
    }

    #[test]
    fn style_parses_hyphenated_forms() {
        assert_eq!("step-by-step".parse::<Style>(), Ok(Style::StepByStep));
        assert_eq!("Step_By_Step".parse::<Style>(), Ok(Style::StepByStep));
        assert_eq!("concept breakdown".parse::<Style>(), Ok(Style::ConceptBreakdown));
    }

    #[test]
    fn depth_rejects_unknown() {
        assert!("expert".parse::<Depth>().is_err());
        assert_eq!("DETAILED".parse::<Depth>(), Ok(Depth::Detailed));
    }

    #[test]
    fn labels_serialise_as_display_text() {
        let json = serde_json::to_string(&Subject::ComputerScience).unwrap();
        assert_eq!(json, "\"Computer Science\"");
        let json = serde_json::to_string(&Style::StepByStep).unwrap();
        assert_eq!(json, "\"Step-by-Step\"");
        let json = serde_json::to_string(&RefinementMode::MoreExamples).unwrap();
        assert_eq!(json, "\"more_examples\"");
    }

    #[test]
    fn refinement_none_has_no_instruction() {
        assert!(RefinementMode::None.instruction().is_empty());
        assert!(RefinementMode::Simpler.instruction().contains("simpler"));
    }
}
