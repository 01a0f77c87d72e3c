//! Collection paging
//!
//! Plans the page requests needed to read a whole collection and stitches the
//! decoded pages back together in order.

pub mod pagination;

pub use pagination::{PagePlan, PageQuery, PageStyle, collect_pages, plan_from_total, plan_pages};
