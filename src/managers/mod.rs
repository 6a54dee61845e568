// State managers
// Managers own mutable session state and coordinate its persistence.

pub mod bookmark_store;
