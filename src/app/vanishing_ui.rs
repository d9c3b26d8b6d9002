use anyhow::Result;

use crate::session::Session;

use super::{options::UiOptions, runtime::App};

/// Interactive terminal front end over a [`Session`].
#[derive(Debug)]
pub struct VanishingUi {
    session: Session,
    options: UiOptions,
}

impl VanishingUi {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            options: UiOptions::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options.title = title.into();
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs until the user quits and hands the session back for reporting.
    pub fn run(self) -> Result<Session> {
        let VanishingUi { session, options } = self;
        App::new(session, options).run()
    }
}
