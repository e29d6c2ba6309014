//! Support library for the `camb` command line tool.
//!
//! Provides kubectl-style context configuration, request file loading and
//! result output.

pub mod config;
pub mod output;
pub mod request;

pub use config::{load_config, mask_api_key, Config, Context};
pub use output::{format_bytes, print_success, print_verbose, Output, OutputFormat};
pub use request::{load_request, parse_request, RequestError};
