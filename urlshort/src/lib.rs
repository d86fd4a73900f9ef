//! Path-to-URL redirection for axum.
//!
//! A [`RedirectTable`] maps exact request paths to destination URLs. It is
//! built once, either from a literal map or from YAML, JSON or TOML records,
//! and then wrapped around a fallback service with [`map_handler`] and
//! friends:
//!
//! ```no_run
//! use axum::{handler::HandlerWithoutStateExt, Router};
//!
//! let fallback = (|| async { "hello, world" }).into_service();
//! let yaml = b"- path: /example\n  url: https://www.google.com\n";
//! let redirect = urlshort::yaml_handler(yaml, fallback).unwrap();
//! let app: Router = Router::new().fallback_service(redirect);
//! ```

mod decode;
mod handler;
mod table;

pub use decode::{
    parse_json, parse_toml, parse_yaml, DecodeError, Format, PathRecord, UnknownFormat,
};
pub use handler::{
    json_handler, map_handler, toml_handler, yaml_handler, FallbackPolicy, Redirect,
};
pub use table::RedirectTable;
