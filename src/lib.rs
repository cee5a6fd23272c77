//! Scroll-synchronized motion for terminal UIs.
//!
//! The [`motion`] module is the embeddable engine: normalized scroll
//! progress, one-shot visibility triggers, staggered reveals, damped-spring
//! pointer offsets, and a smooth-scroll emulator, all driven by a single
//! frame scheduler.  The binary in this crate is a scrollable demo page
//! built on top of it.

pub mod motion;
