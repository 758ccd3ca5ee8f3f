mod builtin;
mod common;
mod summary;
