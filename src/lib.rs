#![deny(rust_2018_idioms)]

pub mod dom;
mod error;
pub mod field;
pub mod io;
pub mod registry;
pub mod session;

#[cfg(feature = "tui")]
mod app;

pub use dom::{Document, DocumentSpec, ElementId, ElementSpec, Selector};
pub use error::FieldError;
pub use field::{
    FieldController, FieldEvent, FieldEventKind, FieldHost, FieldOptions, FieldState, FieldValue,
    GlobalOptions, LabelTemplate, TabIndexStart, ValueMap,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, parse_document_str,
    parse_with_fallback,
};
pub use registry::{
    Interaction, Propagation, RegistrationContext, RegistrationReport, Registry, SkipReason,
};
pub use session::{FieldReport, Script, Session, SessionReport, Step};

#[cfg(feature = "tui")]
pub use app::{UiOptions, VanishingUi};

pub mod prelude {
    pub use super::{
        Document, FieldController, FieldOptions, GlobalOptions, Interaction, Registry, Script,
        Session, Step,
    };
    #[cfg(feature = "tui")]
    pub use super::{UiOptions, VanishingUi};
}
