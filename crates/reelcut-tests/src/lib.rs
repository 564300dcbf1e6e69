//! Integration test crate for Reelcut.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every reelcut crate to verify they work together.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod render;

#[cfg(test)]
mod audio;

#[cfg(test)]
mod export;

#[cfg(test)]
mod support;
