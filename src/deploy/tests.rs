//! Unit tests for the deployment driver.
//!
//! Split by pipeline step; shared fixtures live in `fixtures`.
