// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helper functions for state event handlers.

use std::collections::BTreeMap;

/// Keys that know their successor.
pub(crate) trait SequentialKey: Copy + Ord + Default {
    fn successor(self) -> Self;
}

macro_rules! sequential_key {
    ($($id:ty),+ $(,)?) => {
        $(
            impl SequentialKey for $id {
                fn successor(self) -> Self {
                    self.next()
                }
            }
        )+
    };
}

sequential_key!(
    js_core::UserId,
    js_core::OrgId,
    js_core::ProjectId,
    js_core::WorkspaceId,
    js_core::BackendId,
    js_core::JobRequestId,
    js_core::JobId,
);

/// One past the largest key in use; keys start at 1.
pub(crate) fn next_key<K: SequentialKey, V>(map: &BTreeMap<K, V>) -> K {
    map.last_key_value().map(|(k, _)| *k).unwrap_or_default().successor()
}
