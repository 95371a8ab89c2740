//! System-prompt instruction text and few-shot exemplar loading.

use std::path::Path;

use tracing::warn;

/// System prompt for a first, unreflective draft.
pub fn simple_chat_instruction(language_name: &str) -> String {
    format!(
        "You are an AI that only responds with {language_name} code, NOT ENGLISH. \
         You will be given source code and asked to convert it. \
         Write your full implementation."
    )
}

/// System prompt for a reflective retry, after a prior attempt failed.
pub fn reflection_chat_instruction(language_name: &str) -> String {
    format!(
        "You are an AI {language_name} assistant. You will be given your past \
         implementation, a series of test results, and a hint to change the \
         implementation appropriately. Write your full implementation."
    )
}

/// System prompt for critiquing a failed candidate.
pub fn self_reflection_chat_instruction(language_name: &str) -> String {
    format!(
        "You are a {language_name} programming assistant. You will be given an \
         implementation and a series of test results. Your goal is to write a \
         few sentences explaining why the implementation is wrong, as indicated \
         by the tests. You will need this as a hint when you try again later. \
         Only provide the few-sentence explanation, not the implementation."
    )
}

/// System prompt for generating fresh tests.
pub fn test_generation_chat_instruction(language_name: &str) -> String {
    format!(
        "You are a {language_name} programming assistant, an AI coding assistant \
         that can write unique, diverse, and intuitive tests for the given code."
    )
}

/// Load a few-shot exemplar file from `dir/name`.
///
/// A missing file is logged and treated as an empty exemplar; generation
/// proceeds without it.
pub fn load_exemplar(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(path = %path.display(), %err, "could not load prompt exemplar");
            String::new()
        }
    }
}

pub const REFLECTION_FEW_SHOT_FILE: &str = "reflection_few_shot.md";
pub const SELF_REFLECTION_FEW_SHOT_FILE: &str = "self_reflection_few_shot.md";
pub const TEST_GENERATION_FEW_SHOT_FILE: &str = "test_generation_few_shot.md";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_exemplar_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(load_exemplar(dir.path(), "missing.md"), "");
    }

    #[test]
    fn present_exemplar_file_is_returned_verbatim() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("present.md"), "example\n").expect("write");
        assert_eq!(load_exemplar(dir.path(), "present.md"), "example\n");
    }

    #[test]
    fn instructions_mention_the_target_language() {
        assert!(simple_chat_instruction("Go").contains("Go"));
        assert!(reflection_chat_instruction("Go").contains("Go"));
        assert!(self_reflection_chat_instruction("Go").contains("Go"));
        assert!(test_generation_chat_instruction("Go").contains("Go"));
    }
}
