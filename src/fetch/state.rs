//! Fetch State Module
//!
//! The externally observable result of loading one key.

use crate::error::CacheError;

// == Fetch Status ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Failed,
}

// == Fetch State ==
/// What a consumer currently sees for a key.
///
/// A stale-while-revalidate refresh replaces `data` in place without ever
/// passing through `is_loading`, so this state does not always mirror the
/// orchestrator's internal fetch activity.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<CacheError>,
}

impl<T> FetchState<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            is_loading: false,
            error: None,
        }
    }

    pub fn status(&self) -> FetchStatus {
        if self.is_loading {
            FetchStatus::Loading
        } else if self.error.is_some() {
            FetchStatus::Failed
        } else if self.data.is_some() {
            FetchStatus::Success
        } else {
            FetchStatus::Idle
        }
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}
