//! Treemap layout and mutation engine.
//!
//! A [`domain::WeightedTree`] is partitioned into rectangles by
//! [`domain::layout`], mapped back from screen points by
//! [`domain::point_to_leaf`], and edited through [`domain::select_and_delete`]
//! and [`domain::resize_leaf`]. Trees come from a directory walk or from
//! World Bank population data.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
