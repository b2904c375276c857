//! Markdown-to-HTML rendering for the quill blog engine.
//!
//! This crate implements the renderer used for post bodies and comment
//! previews: a deliberately small, predictable transformation rather than a
//! CommonMark processor. Input is untrusted author text; output is an HTML
//! string safe to inject into a page's content region. Raw HTML typed by the
//! author is escaped to literal text, while the constructs the renderer
//! itself produces (images, code blocks, inline code) are carried through
//! verbatim.
//!
//! The transformation is a fixed sequence of passes over a working buffer.
//! The pass order is observable behavior: images are consumed before links
//! so `![alt](src)` can never be mis-read as a link, and generated fragments
//! are swapped for placeholders before the blanket escape pass so their
//! markup survives it. See [`render`] for the full sequence.
//!
//! # Example
//!
//! ```
//! use quill_renderer::render;
//!
//! let html = render("# Hello\n\n**Bold** text");
//! assert!(html.contains("<h1"));
//! assert!(html.contains("<strong>Bold</strong>"));
//! ```

mod escape;
mod protect;
mod renderer;

pub use escape::escape_html;
pub use renderer::render;
