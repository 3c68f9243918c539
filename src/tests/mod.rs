mod common;
mod token_store;
