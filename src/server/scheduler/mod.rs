pub mod rename_queue;
