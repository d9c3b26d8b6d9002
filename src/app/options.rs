use std::time::Duration;

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub title: String,
    pub show_help: bool,
    /// Blur the focused element before quitting so an open field closes and records its values.
    pub close_on_quit: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            title: "Fields".to_string(),
            show_help: true,
            close_on_quit: true,
        }
    }
}

impl UiOptions {
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_close_on_quit(mut self, enabled: bool) -> Self {
        self.close_on_quit = enabled;
        self
    }
}
