//! Output generation for the board page.
//!
//! # Submodules
//!
//! - [`page`]: The [`page::Board`] display surface and the HTML document it
//!   serializes to
//!
//! Markup comes from the askama templates `templates/page.html` and
//! `templates/card.html`, which escape every feed-supplied value.
//!
//! # Output Structure
//!
//! ```text
//! index.html
//! ├── #lastUpdated   # "Last updated: <newest feed timestamp>"
//! └── #brands        # one <article class="card"> per brand, registry order
//! ```

pub mod page;
