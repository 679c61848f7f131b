//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`StorePort`] as a flat key → `i32` map under the
//! `timerelay` namespace.  Values are the ON/OFF durations in minutes.
//!
//! - ESP32: ESP-IDF NVS i32 API, one commit per write.
//! - Host: in-memory map (dev/test only).
//!
//! NVS keys are limited to 15 bytes; longer keys are truncated.

use log::{info, warn};

use crate::app::ports::{StorageError, StorePort};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// NVS namespace holding every persisted value.
pub const NAMESPACE: &str = "timerelay";

/// NVS name length limit, excluding the terminator.
const MAX_NAME_LEN: usize = 15;

pub struct NvsStore {
    #[cfg(not(target_os = "espidf"))]
    values: HashMap<String, i32>,
}

impl NvsStore {
    /// Initialise NVS flash.
    ///
    /// On first boot or after a version mismatch the partition is erased
    /// and re-initialised automatically.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any other NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as i32 || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as i32 {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK as i32 {
                    return Err(StorageError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK as i32 {
                    return Err(StorageError::IoError);
                }
            } else if ret != ESP_OK as i32 {
                return Err(StorageError::IoError);
            }
            info!("NvsStore: ESP-IDF NVS initialised (ns={})", NAMESPACE);
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsStore: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            values: HashMap::new(),
        })
    }

    /// Open the namespace, run `f` with the handle, then close it.
    #[cfg(target_os = "espidf")]
    fn with_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let ns = c_name(NAMESPACE);
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };
        let mut handle: nvs_handle_t = 0;
        // SAFETY: ns is NUL-terminated; handle is written by nvs_open.
        let ret = unsafe { nvs_open(ns.as_ptr().cast(), mode, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(ret);
        }
        let result = f(handle);
        // SAFETY: handle was opened above and is not used afterwards.
        unsafe { nvs_close(handle) };
        result
    }
}

/// NUL-terminated copy of `name`, truncated to the NVS limit.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
fn c_name(name: &str) -> [u8; MAX_NAME_LEN + 1] {
    let mut buf = [0u8; MAX_NAME_LEN + 1];
    let bytes = name.as_bytes();
    let len = bytes.len().min(MAX_NAME_LEN);
    buf[..len].copy_from_slice(&bytes[..len]);
    buf
}

impl StorePort for NvsStore {
    fn get(&self, key: &str, default: i32) -> i32 {
        #[cfg(not(target_os = "espidf"))]
        {
            self.values.get(key).copied().unwrap_or(default)
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_handle(false, |handle| {
                let name = c_name(key);
                let mut value: i32 = 0;
                // SAFETY: name is NUL-terminated; value is a valid out-pointer.
                let ret = unsafe { nvs_get_i32(handle, name.as_ptr().cast(), &mut value) };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                Ok(value)
            });
            match result {
                Ok(value) => value,
                // A fresh partition has no namespace yet: nvs_open fails
                // with NOT_FOUND just like a missing key.
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND as i32 => default,
                Err(e) => {
                    warn!("NvsStore: read '{}' failed (rc={}), using {}", key, e, default);
                    default
                }
            }
        }
    }

    fn set(&mut self, key: &str, value: i32) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            self.values.insert(key.to_owned(), value);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_handle(true, |handle| {
                let name = c_name(key);
                // SAFETY: name is NUL-terminated; handle is open read-write.
                let ret = unsafe { nvs_set_i32(handle, name.as_ptr().cast(), value) };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|e| {
                warn!("NvsStore: write '{}' failed (rc={})", key, e);
                if e == ESP_ERR_NVS_NOT_ENOUGH_SPACE as i32 {
                    StorageError::Full
                } else {
                    StorageError::IoError
                }
            })
        }
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        info!("NvsStore: erasing namespace '{}'", NAMESPACE);

        #[cfg(not(target_os = "espidf"))]
        {
            self.values.clear();
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_handle(true, |handle| {
                // SAFETY: handle is open read-write.
                let ret = unsafe { nvs_erase_all(handle) };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|e| {
                warn!("NvsStore: erase failed (rc={})", e);
                StorageError::IoError
            })
        }
    }
}
