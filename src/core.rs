//! Platform-neutral building blocks
//!
//! Byte string primitives, the result decoder, the navigation state machine
//! and timers. None of it touches the DOM.
//!
//! # Examples
//!
//! ```rust
//! use lexi::core::text::contains_ignore_ascii_case;
//!
//! assert!(contains_ignore_ascii_case(b"Chateau", b"TEAU"));
//! assert!(!contains_ignore_ascii_case("Château".as_bytes(), "CHÂ".as_bytes()));
//! ```

pub use lexi_core::*;
