//! Conversation session: the append-only chat log, its own dataset store,
//! and the query augmenter that grounds a question in the attached data.

use polars::prelude::*;

use crate::ingest::Dataset;
use crate::statistics;

/// Upper bound on preview rows included in an augmented prompt.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Human,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Assistant => "assistant",
        }
    }
}

/// One chat exchange entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Chat-side session state. The dataset here is uploaded separately from the
/// exploration context and the two never alias. The history grows
/// append-only: one human and one assistant message per submitted question,
/// in that order, success or failure.
#[derive(Debug, Default)]
pub struct ChatSession {
    pub dataset: Option<Dataset>,
    pub history: Vec<Message>,
}

impl ChatSession {
    pub fn push(&mut self, message: Message) {
        self.history.push(message);
    }
}

/// Uniform random sample of `min(limit, rows)` rows without replacement.
/// `seed` is threaded for deterministic tests; `None` draws a fresh sample,
/// so repeated questions may see different previews.
pub fn preview_sample(frame: &DataFrame, limit: usize, seed: Option<u64>) -> DataFrame {
    let n = limit.min(frame.height());
    match frame.sample_n_literal(n, false, false, seed) {
        Ok(sample) => sample,
        // n <= height, so sampling cannot fail; keep the prompt grounded anyway.
        Err(_) => frame.head(Some(n)),
    }
}

/// Builds the final user-prompt text. With a dataset attached, the question
/// is prefixed with the describe table and a row sample; without one, it
/// passes through verbatim. Stateless: summary and sample are recomputed on
/// every call.
pub fn augment_question(
    dataset: Option<&Dataset>,
    question: &str,
    preview_rows: usize,
    seed: Option<u64>,
) -> String {
    let Some(dataset) = dataset else {
        return question.to_string();
    };
    let summary = match statistics::describe_frame(&dataset.frame) {
        Ok(frame) => format!("{}", frame),
        Err(_) => String::new(),
    };
    let preview = preview_sample(&dataset.frame, preview_rows, seed);
    format!(
        "data summary is {}\ndata preview is {}\nnow answer the question based on this data {}",
        summary, preview, question
    )
}
