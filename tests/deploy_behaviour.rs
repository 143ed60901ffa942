//! Behavioural scenarios for the build and deploy pipeline.

mod deploy;
