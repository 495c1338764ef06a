//! pxutil: small command-line helpers and the thin wrappers behind them.

pub mod app;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod display;
pub mod http;
pub mod input;
pub mod logging;
pub mod providers;
pub mod system;
pub mod tools;
pub mod utils;

pub use crate::chat::{ChatApi, ChatHistory, ChatSettings};
pub use crate::config::Config;
pub use crate::core::error::PxError;
pub use crate::core::executor::{CompletedProcess, bash, bash_in, bashx};
pub use crate::http::{HttpClient, HttpSettings, RequestOptions, post, request};
pub use crate::providers::{ChatTransport, Message, Role};
pub use crate::tools::modlist::{ModuleListing, list_module_contents};
pub use crate::tools::onefile::{OneFileOptions, OneFileReport, combine_files};
pub use crate::tools::purge::{PurgeOptions, PurgeReport, purge_older_than};
pub use crate::utils::duration::{format_duration, parse_duration};
pub use crate::utils::files::{is_text_file, normal_path, replace_in_file};
pub use crate::utils::grep::{GrepSource, grep};
pub use crate::utils::text::trim_docstring;
