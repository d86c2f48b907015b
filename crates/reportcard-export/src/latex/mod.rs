pub mod convert;
pub mod document;
pub mod escape;

pub use convert::html_to_latex;
pub use document::{LatexExport, LogoFile, build_latex};
pub use escape::escape_latex;
