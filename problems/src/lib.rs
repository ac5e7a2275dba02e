//! Stable problem codes and messages for edubot compile errors.
//!
//! The [`Problem`] enumeration is generated at build time from
//! `resources/problem-codes.csv`. Each problem has a stable user-facing
//! code (for documentation) and a constant message; per-instance context
//! (the offending statement text or source position) is attached by the
//! compiler's diagnostics, not here.

include!(concat!(env!("OUT_DIR"), "/problems.rs"));
