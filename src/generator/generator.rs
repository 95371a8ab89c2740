//! Prompt-assembly state machine over the LLM client.
//!
//! The generator is a pure function over (LLM, prompt templates, fence tag):
//! it owns no tree state and is reused across every node in a conversion.

use std::path::PathBuf;

use crate::core::cancel::CancellationToken;
use crate::error::Result;
use crate::generator::prompts::{
    self, REFLECTION_FEW_SHOT_FILE, SELF_REFLECTION_FEW_SHOT_FILE, TEST_GENERATION_FEW_SHOT_FILE,
};
use crate::llm::client::LlmClient;
use crate::llm::message::Message;
use crate::sandbox::fence::extract_all_fenced;

pub struct Generator {
    llm: Box<dyn LlmClient>,
    language_name: String,
    reflection_few_shot: String,
    self_reflection_few_shot: String,
    test_generation_few_shot: String,
}

impl Generator {
    /// Load few-shot exemplars from `exemplars_dir` once, at construction.
    pub fn new(llm: Box<dyn LlmClient>, language_name: impl Into<String>, exemplars_dir: &PathBuf) -> Self {
        Self {
            llm,
            language_name: language_name.into(),
            reflection_few_shot: prompts::load_exemplar(exemplars_dir, REFLECTION_FEW_SHOT_FILE),
            self_reflection_few_shot: prompts::load_exemplar(exemplars_dir, SELF_REFLECTION_FEW_SHOT_FILE),
            test_generation_few_shot: prompts::load_exemplar(exemplars_dir, TEST_GENERATION_FEW_SHOT_FILE),
        }
    }

    /// `generate_code(source) -> string`. A first, unreflective draft.
    pub fn generate_code(&self, source: &str, cancel: &CancellationToken) -> Result<String> {
        let messages = vec![
            Message::system(prompts::simple_chat_instruction(&self.language_name)),
            Message::user(source.to_string()),
        ];
        self.llm.chat(&messages, cancel)
    }

    /// `generate_code_with_reflection(...) -> string`. Reconstructs the prior
    /// attempt as a multi-turn context, then asks for a fresh retry on the
    /// original source.
    pub fn generate_code_with_reflection(
        &self,
        source: &str,
        previous_code: &str,
        feedback: &str,
        self_reflection: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let mut system = prompts::reflection_chat_instruction(&self.language_name);
        if !self.reflection_few_shot.is_empty() {
            system.push_str("\n\n");
            system.push_str(&self.reflection_few_shot);
        }

        let messages = vec![
            Message::system(system),
            Message::user(source.to_string()),
            Message::assistant(previous_code.to_string()),
            Message::user(feedback.to_string()),
            Message::assistant(self_reflection.to_string()),
            Message::user(source.to_string()),
        ];
        self.llm.chat(&messages, cancel)
    }

    /// `generate_tests(source, candidate) -> [string]`. Every fenced code
    /// block in the reply (fences intact) becomes one test entry.
    pub fn generate_tests(
        &self,
        source: &str,
        candidate: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        let mut system = prompts::test_generation_chat_instruction(&self.language_name);
        if !self.test_generation_few_shot.is_empty() {
            system.push_str("\n\n");
            system.push_str(&self.test_generation_few_shot);
        }

        let messages = vec![
            Message::system(system),
            Message::user(format!("Original:\n{source}\n\nCandidate:\n{candidate}")),
        ];
        let reply = self.llm.chat(&messages, cancel)?;
        Ok(extract_all_fenced(&reply))
    }

    /// `generate_self_reflection(code, feedback) -> string`.
    pub fn generate_self_reflection(
        &self,
        code: &str,
        feedback: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let mut system = prompts::self_reflection_chat_instruction(&self.language_name);
        if !self.self_reflection_few_shot.is_empty() {
            system.push_str("\n\n");
            system.push_str(&self.self_reflection_few_shot);
        }

        let messages = vec![
            Message::system(system),
            Message::user(format!("Implementation:\n{code}\n\nTest results:\n{feedback}")),
        ];
        self.llm.chat(&messages, cancel)
    }

    /// `query_implementation_is_good(reflection) -> string`. The caller
    /// compares the reply against the literal substring "yes"
    /// (case-insensitive); see [`is_affirmative`].
    pub fn query_implementation_is_good(
        &self,
        reflection: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let messages = vec![
            Message::system(
                "Answer with a single word, yes or no: does this reflection indicate the \
                 tests are at fault rather than the implementation?"
                    .to_string(),
            ),
            Message::user(reflection.to_string()),
        ];
        self.llm.chat(&messages, cancel)
    }
}

/// Whether a `query_implementation_is_good` reply should be read as "yes".
pub fn is_affirmative(reply: &str) -> bool {
    reply.to_lowercase().contains("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedLlm {
        replies: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn new(replies: Vec<&str>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().map(str::to_string).rev().collect()),
            }
        }
    }

    impl LlmClient for ScriptedLlm {
        fn chat(&self, _messages: &[Message], _cancel: &CancellationToken) -> Result<String> {
            Ok(self.replies.lock().unwrap().pop().unwrap_or_default())
        }
    }

    fn generator_with(replies: Vec<&str>) -> Generator {
        let dir = tempfile::tempdir().expect("tempdir");
        Generator::new(Box::new(ScriptedLlm::new(replies)), "go", &dir.path().to_path_buf())
    }

    #[test]
    fn generate_code_returns_llm_reply_verbatim() {
        let generator = generator_with(vec!["```go\nfunc F() {}\n```"]);
        let out = generator
            .generate_code("signature", &CancellationToken::new())
            .expect("generate_code");
        assert_eq!(out, "```go\nfunc F() {}\n```");
    }

    #[test]
    fn generate_tests_splits_every_fenced_block() {
        let generator = generator_with(vec!["```go\ntest one\n```\n```go\ntest two\n```"]);
        let tests = generator
            .generate_tests("source", "candidate", &CancellationToken::new())
            .expect("generate_tests");
        assert_eq!(tests, vec!["```go\ntest one\n```", "```go\ntest two\n```"]);
    }

    #[test]
    fn is_affirmative_is_case_insensitive() {
        assert!(is_affirmative("Yes, the tests are wrong."));
        assert!(is_affirmative("YES"));
        assert!(!is_affirmative("no, the implementation is broken"));
    }
}
