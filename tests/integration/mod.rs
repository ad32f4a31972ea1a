//! Integration tests for tagship
//!
//! Every test drives the built binary against a throwaway git repository
//! whose `origin` is a local bare repository.

mod helpers;
mod test_init;
mod test_push;
mod test_release;
mod test_status;
mod test_sync;
