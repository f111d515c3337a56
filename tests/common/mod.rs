//! Common test utilities for meteoport.
//!
//! This module provides shared utilities for testing the meteoport server.

pub mod assertions;
pub mod http_client;
pub mod test_data;
