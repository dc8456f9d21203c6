//! Fairlead Server
//!
//! Backend for a maritime operations collaboration platform: shared
//! operation rooms where brokers, owners, charterers and other parties
//! exchange messages around ship-to-ship transfers. Message read
//! visibility is computed per request from role defaults and explicit
//! per-room grants.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod visibility;
