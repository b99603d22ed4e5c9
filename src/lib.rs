mod commands;
mod config;
mod console;
mod errors;
mod fields;
mod helpers;
mod listing;
mod models;
mod queue;
mod resolver;
mod session;
mod spec;
mod storage;
mod validators;

// Library exports
pub mod prelude {
    // Session
    pub use crate::config::{AppConfig, Cli, CliCommand, HelperCommand, SessionOptions};
    pub use crate::helpers::run_helper;
    pub use crate::session::ChatSession;

    // Commands
    pub use crate::commands::traits::{Command, Descriptor, Executable, Outcome};
    pub use crate::commands::{CommandName, CommandRegistry, HandlerContext, Invocation};

    // Parameters
    pub use crate::spec::builder::{ParameterSpecBuilder, SchemaBuilder};
    pub use crate::spec::schema::ParameterSchema;
    pub use crate::spec::{FromParameters, ParamType, ParamValue, ParameterValues, ToParameters};

    // Queue
    pub use crate::queue::{DispatchQueue, QueueHandle, QueueItem};

    // Records and listing
    pub use crate::fields::{FieldDescriptor, FieldRegistry, MatchMode};
    pub use crate::listing::{FilterMode, ListRequest, OrderMode, apply};
    pub use crate::models::Record;
    pub use crate::models::contact::{Contact, ContactField};
    pub use crate::models::note::{Note, NoteField};
    pub use crate::storage::DataStore;

    // Console
    pub use crate::console::terminal::TerminalConsole;
    pub use crate::console::{Console, SelectOption, Tone};

    pub use crate::errors::AssistantError;
}

// Internal imports for use within the crate
#[allow(unused_imports)]
pub(crate) mod imports {
    pub use crate::params;

    // Parameters
    pub use crate::resolver::RawArg;
    pub use crate::spec::builder::{ParameterSpecBuilder, SchemaBuilder};
    pub use crate::spec::parameter::ParameterSpec;
    pub use crate::spec::schema::ParameterSchema;
    pub use crate::spec::{FromParameters, ParamType, ParamValue, ParameterValues, ToParameters};

    // Console
    pub use crate::console::render::CardRow;
    pub use crate::console::{
        Console, SelectOption, Tone, render_canceled, render_error, render_good,
    };

    // Records
    pub use crate::fields::value::FieldValue;
    pub use crate::fields::{FieldDescriptor, FieldRegistry, MatchMode};
    pub use crate::listing::{FilterMode, ListRequest, OrderMode, apply};
    pub use crate::models::Record;
    pub use crate::models::contact::Contact;
    pub use crate::models::note::Note;
    pub use crate::storage::{DataStore, StoreData};

    // Dispatch
    pub use crate::commands::traits::{Command, CommandFactory, Descriptor, Executable, Outcome};
    pub use crate::commands::{CommandName, CommandRegistry, HandlerContext, Invocation};
    pub use crate::queue::tokenize::parse_line;
    pub use crate::queue::{DispatchQueue, QueueHandle, QueueItem};

    pub use crate::config::SessionOptions;
    pub use crate::errors::AssistantError;

    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use uuid::Uuid;

    // Result and error handling
    pub type Result<T> = anyhow::Result<T>;
    pub use anyhow::Context as _;

    // File I/O
    pub use std::path::PathBuf;

    // Collections
    pub use std::collections::{HashMap, HashSet, VecDeque};

    // Async
    pub use std::sync::Arc;

    // Lazy initialization
    pub use std::sync::LazyLock;

    #[cfg(test)]
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }
}
