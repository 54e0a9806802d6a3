//! Integration tests driving the crawl loop against a mock site

mod crawl_tests;
mod support;
