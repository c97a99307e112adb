//! Core of a timed multiple-choice quiz widget: CSV question ingestion,
//! session control with a countdown, scoring, and result delivery. The
//! rendering layer and the remote scoring endpoint sit behind the [`output`]
//! and [`sink`] seams; the operator's password and open/close window live in
//! the [`admin`] config store.

pub mod admin;
pub mod bank;
pub mod gate;
pub mod ingest;
pub mod output;
pub mod session;
pub mod sink;

pub use bank::{BankHandle, OptionLabel, QuestionBank, QuestionRecord};
pub use session::{
    Candidate, Features, SessionConfig, SessionController, SessionError, SessionStatus, StartError,
};
pub use sink::ResultPayload;
