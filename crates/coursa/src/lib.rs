//! coursa: search and recommendation for scraped online courses.
//!
//! Courses from several learning platforms are normalized into one catalog,
//! indexed for full-text and faceted search, and recommended to users from their
//! likes, dislikes and views blended with what similar learners engaged with.

#![warn(missing_docs)]

pub mod cli;
