//! Poison-aware access to the shared in-memory state.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Result, ServiceError};

pub(crate) fn read<'a, T>(
    lock: &'a RwLock<T>,
    store: &'static str,
) -> Result<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| ServiceError::LockPoisoned(store))
}

pub(crate) fn write<'a, T>(
    lock: &'a RwLock<T>,
    store: &'static str,
) -> Result<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| ServiceError::LockPoisoned(store))
}
