pub mod config;
pub mod corpus_dir;
