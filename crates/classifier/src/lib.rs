//! Client for the third-party generative-AI waste classification service.
//!
//! The service receives a fixed analysis prompt plus an inline image and is
//! expected to answer with the JSON shape parsed by
//! [`wastewise_core::verification`].

mod client;

pub use client::{ClassifierClient, ClassifierConfig, ClassifierError};
