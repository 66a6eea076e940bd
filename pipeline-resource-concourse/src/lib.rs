//! # pipeline-resource-concourse
//!
//! [`ConcourseClient`] implements both [`Connector`] and [`Directory`] against
//! a Concourse server's HTTP API.
//!
//! [`Connector`]: pipeline_resource_core::Connector
//! [`Directory`]: pipeline_resource_core::Directory

pub mod client;

pub use client::{ConcourseClient, ConcourseSession};
