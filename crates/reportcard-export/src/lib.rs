//! reportcard-export
//!
//! LaTeX source, HTML preview and PDF generation for tutorial reports.

pub mod error;
pub mod filename;
pub mod latex;
pub mod logo;
pub mod pdf;
pub mod preview;
pub mod render;
pub mod styles;
