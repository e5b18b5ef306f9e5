//! Shared test doubles: a presenter that records everything it is shown and
//! a completion transport that replays a scripted response sequence.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::ops::Deref;
use std::rc::Rc;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::DataFrame;
use serde_json::Value;

use infopulse::completion::HttpResponse;
use infopulse::{ChartSpec, CompletionTransport, Message, Presenter};

/// Captures every presenter call for later assertions.
#[derive(Default)]
pub struct RecordingPresenter {
    pub infos: Vec<String>,
    pub successes: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub tables: Vec<(String, DataFrame)>,
    pub plots: Vec<ChartSpec>,
    pub messages: Vec<Message>,
}

impl RecordingPresenter {
    pub fn table_titles(&self) -> Vec<&str> {
        self.tables.iter().map(|(title, _)| title.as_str()).collect()
    }
}

impl Presenter for RecordingPresenter {
    fn info(&mut self, text: &str) {
        self.infos.push(text.to_string());
    }

    fn success(&mut self, text: &str) {
        self.successes.push(text.to_string());
    }

    fn warning(&mut self, text: &str) {
        self.warnings.push(text.to_string());
    }

    fn error(&mut self, text: &str) {
        self.errors.push(text.to_string());
    }

    fn table(&mut self, title: &str, frame: &DataFrame) {
        self.tables.push((title.to_string(), frame.clone()));
    }

    fn plot(&mut self, spec: &ChartSpec) {
        self.plots.push(spec.clone());
    }

    fn message(&mut self, message: &Message) {
        self.messages.push(message.clone());
    }
}

/// Replays canned responses in order and records call count and payloads.
///
/// A cheap `Clone` handle over shared state: the test keeps one handle to
/// inspect calls/payloads after the client takes ownership of another. The
/// trait is implemented on this local type (not on `Rc<_>`) so the orphan
/// rule is satisfied from the integration-test crate.
#[derive(Clone)]
pub struct ScriptedTransport {
    inner: Rc<ScriptedInner>,
}

pub struct ScriptedInner {
    responses: RefCell<VecDeque<Result<HttpResponse>>>,
    pub calls: Cell<u32>,
    pub payloads: RefCell<Vec<Value>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<HttpResponse>>) -> Self {
        Self {
            inner: Rc::new(ScriptedInner {
                responses: RefCell::new(responses.into()),
                calls: Cell::new(0),
                payloads: RefCell::new(Vec::new()),
            }),
        }
    }
}

impl Deref for ScriptedTransport {
    type Target = ScriptedInner;

    fn deref(&self) -> &ScriptedInner {
        &self.inner
    }
}

impl CompletionTransport for ScriptedTransport {
    fn post_json(&self, _url: &str, _bearer: &str, payload: &Value) -> Result<HttpResponse> {
        self.calls.set(self.calls.get() + 1);
        self.payloads.borrow_mut().push(payload.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(eyre!("script exhausted")))
    }
}

pub fn response(status: u16, body: &str) -> Result<HttpResponse> {
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

pub fn answer_body(answer: &str) -> String {
    serde_json::json!({"choices": [{"message": {"role": "assistant", "content": answer}}]})
        .to_string()
}
