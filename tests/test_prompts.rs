//! Tests for tutor prompt templates in config/prompts

use std::fs;
use std::path::PathBuf;

use learngap::subsystems::tutor::prompt::{self, TurnRequest, SYSTEM_FILE, TURN_FILE};
use learngap::subsystems::tutor::selection::{RefinementMode, Selection, Subject};

fn prompts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/prompts")
}

#[test]
fn test_system_prompt_file_exists() {
    let path = prompts_dir().join(SYSTEM_FILE);
    assert!(fs::metadata(&path).is_ok(), "system.md prompt file missing");
}

#[test]
fn test_turn_prompt_file_exists() {
    let path = prompts_dir().join(TURN_FILE);
    assert!(fs::metadata(&path).is_ok(), "turn.md prompt file missing");
}

#[test]
fn test_system_prompt_lists_answer_sections() {
    let text = fs::read_to_string(prompts_dir().join(SYSTEM_FILE)).unwrap();
    for section in [
        "Concept Explanation",
        "Real-World Example",
        "Key-Point Summary",
        "Common Misconceptions",
        "Quick Practice Questions",
        "Follow-up Support",
    ] {
        assert!(text.contains(section), "system.md should mention {section}");
    }
}

#[test]
fn test_turn_prompt_template_vars() {
    let text = fs::read_to_string(prompts_dir().join(TURN_FILE)).unwrap();
    for var in ["topic", "subject", "guidance", "depth", "style", "refinement", "question"] {
        let placeholder = format!("{{{{{var}}}}}");
        assert!(text.contains(&placeholder), "turn.md should contain {placeholder} variable");
    }
}

#[test]
fn test_shipped_turn_template_renders_without_placeholders() {
    let req = TurnRequest {
        question: "What is opportunity cost?",
        topic: None,
        selection: Selection { subject: Subject::Economics, ..Selection::default() },
        refinement: RefinementMode::Simpler,
    };
    let text = prompt::turn_prompt(prompts_dir(), &req);
    assert!(!text.contains("{{"), "unrendered placeholder in: {text}");
    assert!(text.contains("Subject: Economics"));
    assert!(text.contains(RefinementMode::Simpler.instruction()));
    assert!(text.ends_with("What is opportunity cost?"));
}
