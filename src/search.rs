/*============================================================
  Bundlescope
  Module: bundlescope::search
  ------------------------------------------------------------
  Purpose:
    View state for the search page: the current input plus one
    of Idle / Loading / Error / Results. Each submission mints
    a generation ticket and completions carrying an older
    ticket are dropped.

  Revision History:
    2026-10-16  Authored search state machine.
============================================================*/

use crate::error::LookupError;
use crate::package_info::PackageBundleInfo;

/// Shown when a failed lookup carries no message of its own.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Loading { package: String },
    Error { message: String },
    Results(PackageBundleInfo),
}

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct SearchSession {
    input: String,
    state: SearchState,
    generation: u64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            state: SearchState::Idle,
            generation: 0,
        }
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SearchState::Loading { .. })
    }

    /// Start a lookup for the current input. Blank input leaves the state
    /// untouched and returns `None`; otherwise any previous result or error
    /// is discarded and the trimmed package name is returned with its
    /// ticket.
    pub fn submit(&mut self) -> Option<(Ticket, String)> {
        let package = self.input.trim();
        if package.is_empty() {
            return None;
        }
        let package = package.to_string();
        self.generation += 1;
        self.state = SearchState::Loading {
            package: package.clone(),
        };
        Some((Ticket(self.generation), package))
    }

    /// Apply a finished lookup. Returns `false` and changes nothing when the
    /// ticket has been superseded by a later submission.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<PackageBundleInfo, LookupError>,
    ) -> bool {
        if ticket.0 != self.generation || !self.is_loading() {
            return false;
        }
        self.state = match outcome {
            Ok(info) => SearchState::Results(info),
            Err(err) => {
                let message = err.message().trim();
                SearchState::Error {
                    message: if message.is_empty() {
                        UNEXPECTED_ERROR_MESSAGE.to_string()
                    } else {
                        message.to_string()
                    },
                }
            }
        };
        true
    }
}
