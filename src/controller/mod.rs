//! Application state and the main event loop.
//!
//! The controller owns the document, the analysis results and the async
//! plumbing. Server calls run on a tokio runtime and land in shared slots
//! that the event loop drains on every tick, so the UI never blocks on
//! the network.

mod flows;
mod keys;

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::config::RcConfig;
use crate::document::Document;
use crate::examples_store::ExampleStore;
use crate::protocol::{AnalysisPayload, ExecutionPayload};
use crate::view;

/// How long the event loop waits for a key before draining async slots.
const TICK_INTERVAL: Duration = Duration::from_millis(50);
/// Execution output stays on screen this long, then the pane collapses.
const EXECUTION_VISIBLE: Duration = Duration::from_secs(10);
/// Second Ctrl+L press must arrive within this window to clear the editor.
const CLEAR_CONFIRM_WINDOW: Duration = Duration::from_secs(3);
/// Lifetime of the longer informational notices (offline examples, example
/// details); ordinary notices use the configured duration.
const LONG_NOTICE_SECS: u64 = 4;
const MAX_NOTICES: usize = 5;

/// Which surface owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Edit,
    OpenPrompt,
    ExamplePicker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A transient toast shown in the top-right corner.
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    expires_at: Instant,
}

/// Execution output together with the moment it appeared.
pub struct ExecutionView {
    pub payload: ExecutionPayload,
    shown_at: Instant,
}

impl ExecutionView {
    fn new(payload: ExecutionPayload) -> Self {
        Self {
            payload,
            shown_at: Instant::now(),
        }
    }

    pub fn failed(&self) -> bool {
        !self.payload.success
    }

    pub fn text(&self) -> &str {
        if self.payload.success {
            if self.payload.output.is_empty() {
                "(sin salida)"
            } else {
                &self.payload.output
            }
        } else {
            self.payload.error.as_deref().unwrap_or("error de ejecución")
        }
    }
}

type PendingSlot<T> = Arc<Mutex<Option<T>>>;

pub struct Controller {
    pub document: Document,
    pub config: RcConfig,
    pub store: ExampleStore,
    pub analysis: Option<AnalysisPayload>,
    pub execution: Option<ExecutionView>,
    pub notices: Vec<Notice>,
    pub mode: UiMode,
    /// An analysis request is in flight. Guards against double submission.
    pub busy: bool,
    /// Result of the startup connectivity probe. `None` until it lands.
    pub online: Option<bool>,
    pub prompt_input: String,
    pub picker_index: usize,
    pub scroll_row: usize,
    pub scroll_col: usize,

    should_quit: bool,
    clear_armed: Option<Instant>,
    api: ApiClient,
    runtime: Arc<Runtime>,

    // Async result holders, drained by check_pending_requests.
    pending_analysis: Option<PendingSlot<Result<AnalysisPayload, ApiError>>>,
    pending_execution: Option<PendingSlot<Result<ExecutionPayload, ApiError>>>,
    pending_examples: Option<PendingSlot<Result<BTreeMap<String, String>, ApiError>>>,
    pending_probe: Option<PendingSlot<bool>>,
}

impl Controller {
    pub fn new(
        config: RcConfig,
        api: ApiClient,
        runtime: Arc<Runtime>,
        document: Document,
    ) -> Self {
        Self {
            document,
            config,
            store: ExampleStore::empty(),
            analysis: None,
            execution: None,
            notices: Vec::new(),
            mode: UiMode::Edit,
            busy: false,
            online: None,
            prompt_input: String::new(),
            picker_index: 0,
            scroll_row: 0,
            scroll_col: 0,
            should_quit: false,
            clear_armed: None,
            api,
            runtime,
            pending_analysis: None,
            pending_execution: None,
            pending_examples: None,
            pending_probe: None,
        }
    }

    /// Run the application until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        info!(server = %self.api.base_url(), "starting session");
        self.start_probe();
        self.start_example_fetch();

        loop {
            terminal.draw(|frame| view::render(frame, self))?;

            if self.should_quit {
                break;
            }

            if event::poll(TICK_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            self.check_pending_requests();
            self.expire_transients();
        }

        info!("session closed");
        Ok(())
    }

    pub fn display_filename(&self) -> &str {
        self.document
            .filename
            .as_ref()
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str())
            .unwrap_or("sin título")
    }

    pub(crate) fn notice(&mut self, message: impl Into<String>, kind: NoticeKind) {
        self.notice_for(message, kind, self.config.notice_secs);
    }

    pub(crate) fn notice_for(&mut self, message: impl Into<String>, kind: NoticeKind, secs: u64) {
        let message = message.into();
        match kind {
            NoticeKind::Error => warn!("{message}"),
            _ => info!("{message}"),
        }
        self.notices.insert(
            0,
            Notice {
                message,
                kind,
                expires_at: Instant::now() + Duration::from_secs(secs),
            },
        );
        self.notices.truncate(MAX_NOTICES);
    }

    fn expire_transients(&mut self) {
        let now = Instant::now();
        self.notices.retain(|notice| notice.expires_at > now);
        if self
            .execution
            .as_ref()
            .is_some_and(|view| view.shown_at.elapsed() >= EXECUTION_VISIBLE)
        {
            self.execution = None;
        }
        if self
            .clear_armed
            .is_some_and(|armed| armed.elapsed() >= CLEAR_CONFIRM_WINDOW)
        {
            self.clear_armed = None;
        }
    }
}
