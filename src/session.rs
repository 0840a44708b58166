use std::thread;
use std::time::Instant;

use crate::client::ApiClient;
use crate::config::{Config, ConfigError};
use crate::executor::{Executor, Outcome, Progress, Strategy};
use crate::messages;
use crate::request::{Selection, build_request};
use crate::state::{Effect, Event, Timing, UiState, transition};

/// Renders what the session is doing. The terminal is one implementation;
/// tests record calls instead.
pub trait Presenter {
    fn state_changed(&mut self, state: &UiState);
    fn rejected(&mut self, message: &str);
    fn progress(&mut self, _progress: &Progress) {}
    fn outcome(&mut self, _outcome: &Outcome) {}
}

/// How a single trigger ended, before any display delay runs out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finish {
    Rejected(String),
    Ignored,
    Ready(String),
    Failed(String),
}

/// One page lifetime: owns the state, the contract clients and the presenter.
pub struct Session<P> {
    client: ApiClient,
    executor: Executor,
    strategy: Strategy,
    timing: Timing,
    selection: Selection,
    state: UiState,
    reset_at: Option<Instant>,
    presenter: P,
}

impl<P: Presenter> Session<P> {
    pub fn new(
        client: ApiClient,
        executor: Executor,
        strategy: Strategy,
        timing: Timing,
        selection: Selection,
        presenter: P,
    ) -> Self {
        Self {
            client,
            executor,
            strategy,
            timing,
            selection,
            state: UiState::Idle,
            reset_at: None,
            presenter,
        }
    }

    pub fn from_config(
        config: &Config,
        selection: Selection,
        presenter: P,
    ) -> Result<Self, ConfigError> {
        let http = config.http_client()?;
        let client = ApiClient::new(http.clone(), config.api_url.clone(), &config.api_key);
        let executor = Executor::new(http, &config.output_dir, config.open_links);
        Ok(Self::new(
            client,
            executor,
            config.flavor.strategy(),
            config.timing(),
            selection,
            presenter,
        ))
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Takes effect on the next trigger.
    pub fn set_selection(&mut self, selection: Selection) {
        log::debug!("mode switched to {}", selection.mode().as_str());
        self.selection = selection;
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// Run one user action to completion. Ignored unless the session is idle.
    pub fn trigger(&mut self, input: &str) -> Finish {
        self.poll(Instant::now());

        let url = match self.dispatch(Event::Trigger {
            input: input.to_string(),
        }) {
            Effect::Submit(url) => url,
            Effect::Reject(message) => {
                self.presenter.rejected(&message);
                return Finish::Rejected(message);
            }
            _ => {
                log::debug!("trigger ignored while {:?}", self.state);
                return Finish::Ignored;
            }
        };

        self.run(&url);

        match &self.state {
            UiState::Ready { filename } => Finish::Ready(filename.clone()),
            UiState::Error { message } => Finish::Failed(message.clone()),
            other => Finish::Failed(format!("unexpected state {other:?}")),
        }
    }

    /// Wait out any pending display delay and return to idle.
    pub fn settle(&mut self) {
        if let Some(at) = self.reset_at {
            thread::sleep(at.saturating_duration_since(Instant::now()));
            self.poll(at);
        }
    }

    /// Fire the auto-reset if its deadline has passed at `now`.
    pub fn poll(&mut self, now: Instant) {
        if self.reset_at.is_some_and(|at| at <= now) {
            self.reset_at = None;
            self.dispatch(Event::Expired);
        }
    }

    fn run(&mut self, url: &str) {
        let request = build_request(url, &self.selection);
        log::info!("requesting {} as {}", request.url, self.selection.mode().as_str());

        let resolved = match self.client.submit(&request) {
            Ok(resp) => match resp.resolved() {
                Some(resolved) => resolved.clone(),
                None => {
                    log::warn!("api returned status {}", resp.status());
                    self.fail(messages::response_message(&resp));
                    return;
                }
            },
            Err(e) => {
                log::error!("submit failed: {e}");
                self.fail(messages::transport_message(&e));
                return;
            }
        };

        if self.dispatch(Event::Resolved) != Effect::Execute {
            return;
        }

        let presenter = &mut self.presenter;
        let result = self.executor.execute(
            self.strategy,
            &resolved,
            self.selection.mode(),
            &mut |p: Progress| presenter.progress(&p),
        );

        match result {
            Ok(outcome) => {
                self.presenter.outcome(&outcome);
                self.dispatch(Event::Finished {
                    filename: outcome.filename(),
                });
            }
            Err(e) => {
                log::error!("download failed: {e}");
                self.fail(messages::download_message(&e));
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.dispatch(Event::Failed { message });
    }

    fn dispatch(&mut self, event: Event) -> Effect {
        let step = transition(&self.state, event, &self.timing);
        if step.state != self.state {
            self.state = step.state;
            self.presenter.state_changed(&self.state);
        }
        if let Effect::ResetAfter(delay) = step.effect {
            self.reset_at = Some(Instant::now() + delay);
        }
        step.effect
    }
}
