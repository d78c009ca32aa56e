//! HTTP request handlers
//!
//! This module organizes all API handlers into logical groups:
//! - `api` - Health check endpoint
//! - `audio` - Audio chunk planning for avatar video requests
//! - `idle_video` - Idle video generation, preloading and cache status

pub mod api;
pub mod audio;
pub mod idle_video;
