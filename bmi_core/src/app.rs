//! Application orchestration.
//!
//! `App` owns the injected preference and history stores together with the
//! view state a front end renders. Every completed mutation bumps
//! `ViewState::version`; front ends redraw when the version they last
//! rendered differs from the current one.

use crate::engine;
use crate::history::HistoryLog;
use crate::preferences::{PreferenceStore, HEIGHT_KEY, RESULTS_KEY};
use crate::{BmiResult, EntryId, HistoryEntry, InputError, Result};

/// User-facing alert raised by a storage operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alert {
    Saved,
    SaveFailed,
    LoadFailed,
}

impl Alert {
    pub fn title(&self) -> &'static str {
        match self {
            Alert::Saved => "Saved",
            Alert::SaveFailed | Alert::LoadFailed => "Error",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Alert::Saved => "Successfully saved on device",
            Alert::SaveFailed => "There was an error while saving the data",
            Alert::LoadFailed => "There was an error while loading the data",
        }
    }
}

/// Everything a front end needs to draw the screen
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub weight: String,
    pub height: String,
    /// Result area text: the last result or an input error message
    pub results: String,
    /// True while `results` holds an input error
    pub danger: bool,
    /// History snapshot, newest first
    pub entries: Vec<HistoryEntry>,
    /// Incremented after every completed mutation
    pub version: u64,
}

/// Result of pressing "Compute BMI"
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub result: std::result::Result<BmiResult, InputError>,
    pub alerts: Vec<Alert>,
}

/// The BMI application with its stores injected
pub struct App<P, H> {
    prefs: P,
    history: H,
    state: ViewState,
}

fn raise(alerts: &mut Vec<Alert>, alert: Alert) {
    if !alerts.contains(&alert) {
        alerts.push(alert);
    }
}

impl<P: PreferenceStore, H: HistoryLog> App<P, H> {
    pub fn new(prefs: P, history: H) -> Self {
        Self {
            prefs,
            history,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn preferences(&self) -> &P {
        &self.prefs
    }

    /// Application launch: prepare history and restore remembered values
    pub fn startup(&mut self, reset_history: bool) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if let Err(e) = self.history.initialize(reset_history) {
            tracing::warn!("Failed to initialize history: {}", e);
            raise(&mut alerts, Alert::LoadFailed);
        }

        if let Err(e) = self.restore_preferences() {
            tracing::warn!("Failed to load preferences: {}", e);
            raise(&mut alerts, Alert::LoadFailed);
        }

        self.refresh_entries(&mut alerts);
        self.state.version += 1;
        alerts
    }

    fn restore_preferences(&mut self) -> Result<()> {
        self.state.height = self.prefs.get(HEIGHT_KEY)?.unwrap_or_default();
        self.state.results = self.prefs.get(RESULTS_KEY)?.unwrap_or_default();
        Ok(())
    }

    pub fn set_weight(&mut self, text: impl Into<String>) {
        self.state.weight = text.into();
        self.state.version += 1;
    }

    pub fn set_height(&mut self, text: impl Into<String>) {
        self.state.height = text.into();
        self.state.version += 1;
    }

    /// Validate the input fields and, on success, persist the result
    pub fn calculate(&mut self) -> Outcome {
        let measurement = match engine::validate(&self.state.weight, &self.state.height) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("Rejected input: {}", e);
                self.state.results = e.to_string();
                self.state.danger = true;
                self.state.version += 1;
                return Outcome {
                    result: Err(e),
                    alerts: Vec::new(),
                };
            }
        };

        let result = engine::compute(&measurement);
        self.state.danger = false;
        self.state.results = engine::result_text(&result);

        let mut alerts = Vec::new();
        match self.save_preferences() {
            Ok(()) => raise(&mut alerts, Alert::Saved),
            Err(e) => {
                tracing::warn!("Failed to save preferences: {}", e);
                raise(&mut alerts, Alert::SaveFailed);
            }
        }

        if let Err(e) = self.history.append(Some(&result.label)) {
            tracing::warn!("Failed to record history entry: {}", e);
            raise(&mut alerts, Alert::SaveFailed);
        }

        self.refresh_entries(&mut alerts);
        self.state.version += 1;

        Outcome {
            result: Ok(result),
            alerts,
        }
    }

    fn save_preferences(&mut self) -> Result<()> {
        self.prefs.set(HEIGHT_KEY, &self.state.height)?;
        self.prefs.set(RESULTS_KEY, &self.state.results)?;
        Ok(())
    }

    /// Delete one history entry (tap-to-delete)
    pub fn delete_entry(&mut self, id: EntryId) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if let Err(e) = self.history.remove(id) {
            tracing::warn!("Failed to delete history entry {}: {}", id, e);
            raise(&mut alerts, Alert::SaveFailed);
        }

        self.refresh_entries(&mut alerts);
        self.state.version += 1;
        alerts
    }

    fn refresh_entries(&mut self, alerts: &mut Vec<Alert>) {
        match self.history.list() {
            Ok(entries) => self.state.entries = entries,
            Err(e) => {
                tracing::warn!("Failed to read history: {}", e);
                raise(alerts, Alert::LoadFailed);
            }
        }
    }
}
