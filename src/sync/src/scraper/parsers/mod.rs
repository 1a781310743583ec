//! JSON parsers for the draw notice endpoint.

pub mod draw;

pub use draw::DrawParser;
