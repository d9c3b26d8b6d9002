mod focus;
mod input;
mod options;
mod runtime;
mod status;
mod terminal;
mod vanishing_ui;
mod view;

pub use options::UiOptions;
pub use vanishing_ui::VanishingUi;
