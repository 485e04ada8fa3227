//! Grounding prompt assembly.

use crate::types::SystemPrompt;

/// Persona name used when none is configured.
pub const DEFAULT_ASSISTANT_NAME: &str = "Ragie AI";

/// Marker placed on its own line before and after the evidence block.
const EVIDENCE_BOUNDARY: &str = "===";

/// Separator between consecutive passages inside the evidence block.
const PASSAGE_SEPARATOR: &str = "\n\n";

const TASK_CLAUSE: &str = "Your current task is to help the user based on all of the \
information available to you shown below.";

const STYLE_CLAUSE: &str = "Answer informally, directly, and concisely without a heading or \
greeting but include everything relevant. Use richtext Markdown when appropriate including \
bold, italic, paragraphs, and lists when helpful. If using LaTeX, use double $$ as delimiter \
instead of single $. Use $$...$$ instead of parentheses. Organize information into multiple \
sections or points when appropriate.";

const NO_RAW_IDS_CLAUSE: &str =
    "Don't include raw item IDs or other raw fields from the source.";

const NO_XML_CLAUSE: &str = "Don't use XML or other markup unless requested by the user.";

const EVIDENCE_INTRO: &str = "Here is all of the information available to answer the user:";

const EMPTY_RESULT_CLAUSE: &str = "If the user asked for a search and there are no results, \
make sure to let the user know that you couldn't find anything, and what they might be able \
to do to find the information they need.";

const TERMINATOR: &str = "END SYSTEM INSTRUCTIONS";

/// Builds the system prompt that grounds the model in retrieved passages.
///
/// The template is a fixed policy: persona, informal Markdown answers with
/// `$$` math delimiters, no raw identifiers, no XML, every passage embedded
/// verbatim between `===` markers in the order received, and an explicit
/// instruction for the no-results case. Passages are never truncated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptAssembler {
    assistant_name: String,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptAssembler {
    pub fn new() -> Self {
        Self {
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
        }
    }

    /// Use a different persona name in the opening clause.
    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    /// Assemble the prompt for an ordered sequence of passages.
    ///
    /// Total and deterministic; an empty sequence yields an empty
    /// evidence block.
    ///
    /// # Example
    /// ```
    /// use ragline_prompt::PromptAssembler;
    ///
    /// let prompt = PromptAssembler::new().build(&["Paris is the capital of France."]);
    /// assert!(prompt.as_str().contains("Paris is the capital of France."));
    /// ```
    pub fn build<S: AsRef<str>>(&self, chunks: &[S]) -> SystemPrompt {
        let evidence = chunks
            .iter()
            .map(|chunk| chunk.as_ref())
            .collect::<Vec<&str>>()
            .join(PASSAGE_SEPARATOR);

        let mut prompt = String::with_capacity(evidence.len() + 1536);

        prompt.push_str("These are very important to follow: ");
        prompt.push_str(&self.persona_clause());
        prompt.push(' ');
        prompt.push_str(TASK_CLAUSE);
        prompt.push(' ');
        prompt.push_str(STYLE_CLAUSE);
        prompt.push(' ');
        prompt.push_str(NO_RAW_IDS_CLAUSE);
        prompt.push(' ');
        prompt.push_str(NO_XML_CLAUSE);
        prompt.push_str("\n\n");

        prompt.push_str(EVIDENCE_INTRO);
        prompt.push('\n');
        prompt.push_str(EVIDENCE_BOUNDARY);
        prompt.push('\n');
        prompt.push_str(&evidence);
        prompt.push('\n');
        prompt.push_str(EVIDENCE_BOUNDARY);
        prompt.push_str("\n\n");

        prompt.push_str(EMPTY_RESULT_CLAUSE);
        prompt.push_str("\n\n");
        prompt.push_str(TERMINATOR);

        tracing::debug!(
            chunks = chunks.len(),
            bytes = prompt.len(),
            "Assembled system prompt"
        );

        SystemPrompt::new(prompt)
    }

    fn persona_clause(&self) -> String {
        format!(
            "You are \"{}\", a professional but friendly AI chatbot working as an assistant to the user.",
            self.assistant_name
        )
    }
}
