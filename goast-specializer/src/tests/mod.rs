//! Specialization tests over whole template and provider modules
//!
//! The unit tests next to each module cover single operations; these drive the
//! engine end to end with templates shaped like the ones found in real
//! `go:generate` setups.
