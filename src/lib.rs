//! # Juken News
//!
//! A news collection and publishing pipeline for a school-admissions news
//! site. Fresh items are discovered through repeated search queries,
//! summarized through an LLM API, classified by keyword, and merged into the
//! `const newsData = [...]` array literal embedded in the site's `script.js`.
//!
//! ## Pipeline Stages
//!
//! The pipeline runs as three independent binaries, each usable on its own:
//!
//! 1. **collect_news**: query the Google Custom Search API, summarize and
//!    categorize each hit, and write the batch to `new_news.json`
//! 2. **update_site**: merge the batch into the store embedded in
//!    `script.js`, deduplicated by URL, newest first, capped at a maximum
//!    item count
//! 3. **deploy_site**: upload the rewritten asset to the web host
//!
//! ## The Store
//!
//! The site has no database. Its news list lives as a JavaScript array
//! literal inside `script.js`, consumed directly by the front end. The
//! [`store`] module owns everything with real invariants: URL uniqueness,
//! newest-first ordering, the bounded item count, and the codec that locates
//! and rewrites the literal without touching any byte around it.

pub mod batch;
pub mod categorize;
pub mod cli;
pub mod config;
pub mod deploy;
pub mod models;
pub mod search;
pub mod sources;
pub mod store;
pub mod summarize;
pub mod utils;
