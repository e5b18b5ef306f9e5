//! infopulse: session-driven exploration of an uploaded tabular dataset
//! (ingest, confirm, summarize, visualize) plus an AI query mode that grounds
//! questions in a separately attached dataset and forwards them to a remote
//! completion endpoint.
//!
//! The crate is the stateful core only. Rendering and input collection belong
//! to an external presentation layer behind [`Presenter`]; plot rasterization
//! belongs to the external renderer consuming [`ChartSpec`]; HTTP mechanics
//! beyond the retry contract belong to the [`CompletionTransport`].

use color_eyre::Result;

pub mod chart;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod error_display;
pub mod explore;
pub mod ingest;
pub mod presenter;
pub mod statistics;

pub use chart::{build_chart_spec, ChartKind, ChartSpec};
pub use completion::{CompletionClient, CompletionOutcome, CompletionTransport};
pub use config::{AppConfig, ConfigManager};
pub use conversation::{ChatSession, Message, Role};
pub use explore::{Choice, ExploreGate, ExploreSession, GateState};
pub use ingest::Dataset;
pub use presenter::Presenter;

/// Application name used for the config directory.
pub const APP_NAME: &str = "infopulse";

/// A discrete action reported by the presentation layer, together with the
/// widget values current at the time of the action.
#[derive(Debug)]
pub enum SessionEvent {
    /// An upload arrived in the exploration context.
    LoadData { name: String, bytes: Vec<u8> },
    /// The explore yes/no selection changed.
    ExploreChoice(Choice),
    /// The explore submit button was pressed.
    SubmitExplore,
    /// The correlation-matrix opt-in selection changed.
    CorrelationChoice(Choice),
    /// A visualization kind was selected.
    ChartKindSelected(ChartKind),
    /// The visualization column selection changed.
    ColumnsSelected(Vec<String>),
    /// The generate-plot button was pressed.
    GeneratePlot,
    /// An upload arrived in the conversation context.
    AttachChatData { name: String, bytes: Vec<u8> },
    /// A question was submitted in the conversation context.
    AskQuestion(String),
}

/// The session context: all mutable state for one user's interaction with
/// the tool. Created at session start, dropped at session end; nothing is
/// persisted across process restarts. The exploration and conversation sides
/// each own their dataset; no operation reads or writes across them.
pub struct App {
    pub explore: ExploreSession,
    pub chat: ChatSession,
    config: AppConfig,
    client: CompletionClient,
    sample_seed: Option<u64>,
}

impl App {
    /// App with the production HTTP transport.
    pub fn new(config: AppConfig) -> App {
        let client = CompletionClient::from_config(&config.completion);
        Self::with_client(config, client)
    }

    /// App with a caller-supplied completion client (tests script the
    /// transport through this).
    pub fn with_client(config: AppConfig, client: CompletionClient) -> App {
        App {
            explore: ExploreSession::default(),
            chat: ChatSession::default(),
            config,
            client,
            sample_seed: None,
        }
    }

    /// Fixes the preview-sample seed. Normal operation leaves this unset so
    /// each question draws a fresh sample.
    pub fn with_sample_seed(mut self, seed: u64) -> App {
        self.sample_seed = Some(seed);
        self
    }

    /// Runs one action to completion. Every failure reachable from an event
    /// resolves to a presenter notice; no event terminates the session.
    pub fn handle(&mut self, event: SessionEvent, presenter: &mut dyn Presenter) -> Result<()> {
        match event {
            SessionEvent::LoadData { name, bytes } => self.load_data(name, bytes, presenter)?,
            SessionEvent::ExploreChoice(choice) => {
                // The explore widgets do not exist before a dataset is read.
                if self.explore.gate.state() != GateState::NoData {
                    self.explore.choice = choice;
                }
            }
            SessionEvent::SubmitExplore => {
                if self.explore.gate.submit(self.explore.choice) {
                    self.show_summary(presenter)?;
                }
            }
            SessionEvent::CorrelationChoice(choice) => {
                if self.explore.gate.state() != GateState::NoData {
                    self.explore.correlation_choice = choice;
                    if choice == Choice::Yes && self.explore.gate.is_unlocked() {
                        self.show_correlation(presenter);
                    }
                }
            }
            SessionEvent::ChartKindSelected(kind) => self.explore.chart_kind = kind,
            SessionEvent::ColumnsSelected(columns) => self.explore.selected_columns = columns,
            SessionEvent::GeneratePlot => self.generate_plot(presenter),
            SessionEvent::AttachChatData { name, bytes } => {
                self.attach_chat_data(name, bytes, presenter)
            }
            SessionEvent::AskQuestion(question) => self.ask_question(question, presenter),
        }
        Ok(())
    }

    /// Ingests an upload into the exploration context. The new dataset
    /// replaces the prior one only on success; the gate's confirmation latch
    /// is never reset by a replacement.
    fn load_data(
        &mut self,
        name: String,
        bytes: Vec<u8>,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        match ingest::read_dataset(&name, bytes) {
            Ok(dataset) => {
                presenter.table("Data preview", &dataset.frame.head(Some(5)));
                presenter.success(&format!("Data '{}' read successfully", dataset.name));
                self.explore.dataset = Some(dataset);
                self.explore.gate.notify_data_loaded();
            }
            Err(report) => presenter.error(&error_display::user_message(&report)),
        }
        Ok(())
    }

    /// Emits the summary artifacts once the gate is open: describe table,
    /// per-column info, data-point count, and the correlation matrix when
    /// opted in.
    fn show_summary(&self, presenter: &mut dyn Presenter) -> Result<()> {
        let Some(dataset) = &self.explore.dataset else {
            return Ok(());
        };
        let describe = statistics::describe_frame(&dataset.frame)?;
        presenter.table("Data summary", &describe);

        let info = statistics::column_info_frame(&dataset.frame)?;
        presenter.table("Column info and missing values", &info);

        let rows = dataset.rows();
        let columns = dataset.columns();
        presenter.info(&format!(
            "There are {} data points ({} rows × {} columns)",
            rows * columns,
            rows,
            columns
        ));

        if self.explore.correlation_choice == Choice::Yes {
            self.show_correlation(presenter);
        }
        Ok(())
    }

    fn show_correlation(&self, presenter: &mut dyn Presenter) {
        let Some(dataset) = &self.explore.dataset else {
            return;
        };
        match statistics::correlation_frame(&dataset.frame) {
            Ok(frame) => presenter.table("Correlation between columns", &frame),
            Err(report) => presenter.warning(&error_display::user_message(&report)),
        }
    }

    /// Validates the current selection and hands a plot request to the
    /// presenter. An invalid selection produces no plot; the user gets a
    /// warning naming the kind's requirement.
    fn generate_plot(&self, presenter: &mut dyn Presenter) {
        if self.explore.dataset.is_none() || !self.explore.gate.is_unlocked() {
            return;
        }
        let kind = self.explore.chart_kind;
        match build_chart_spec(kind, &self.explore.selected_columns) {
            Some(spec) => presenter.plot(&spec),
            None => presenter.warning(&format!(
                "{} needs {}; {} selected",
                kind.as_str(),
                kind.requirement(),
                self.explore.selected_columns.len()
            )),
        }
    }

    /// Ingests an upload into the conversation context, independent of the
    /// exploration side.
    fn attach_chat_data(&mut self, name: String, bytes: Vec<u8>, presenter: &mut dyn Presenter) {
        match ingest::read_dataset(&name, bytes) {
            Ok(dataset) => {
                presenter.success(&format!("File '{}' uploaded successfully!", dataset.name));
                self.chat.dataset = Some(dataset);
            }
            Err(report) => presenter.error(&error_display::user_message(&report)),
        }
    }

    /// One question/answer exchange: the human message is appended before the
    /// network call, the assistant message after it: exactly one each,
    /// success or failure.
    fn ask_question(&mut self, question: String, presenter: &mut dyn Presenter) {
        let human = Message::human(question.clone());
        presenter.message(&human);
        self.chat.push(human);

        let prompt = conversation::augment_question(
            self.chat.dataset.as_ref(),
            &question,
            self.config.query.preview_rows,
            self.sample_seed,
        );
        let outcome = self.client.complete(&prompt);

        let assistant = Message::assistant(outcome.into_text());
        presenter.message(&assistant);
        self.chat.push(assistant);
    }
}
