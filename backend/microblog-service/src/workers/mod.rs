pub mod search_sync;
