//! Shared response envelope types.

use nyumba_core::page::PageMeta;
use serde::Serialize;

/// One page of results plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, meta: PageMeta) -> Self {
        Self { data, meta }
    }
}
