//! macOS dynamic store adapter.
//! Talks to configd through the SystemConfiguration framework and converts
//! CoreFoundation property lists into owned [`Value`]s.

use crate::value::{Dictionary, Value};
use crate::{DynamicStore, Result, StoreError};
use objc2_core_foundation::{
    CFArray, CFBoolean, CFData, CFDictionary, CFNumber, CFRetained, CFString, CFType,
};
use objc2_system_configuration::SCDynamicStore;
use std::ffi::c_void;
use std::ptr;
use tracing::{debug, info};

/// Session with the system configuration daemon
pub struct SystemStore {
    session: CFRetained<SCDynamicStore>,
}

// SAFETY: SCDynamicStore sessions may be used from any thread; the handle
// is only read after creation.
unsafe impl Send for SystemStore {}
unsafe impl Sync for SystemStore {}

impl SystemStore {
    pub fn new(session_name: &str) -> Result<Self> {
        let name = CFString::from_str(session_name);
        // SAFETY: no callout is registered, so the null context is never read
        let session = unsafe { SCDynamicStore::new(None, &name, None, ptr::null_mut()) }
            .ok_or_else(|| StoreError::Backend {
                code: -1,
                message: format!("failed to open session {session_name:?}"),
            })?;
        info!("Initializing macOS SystemConfiguration store \"{}\"", session_name);
        Ok(Self { session })
    }
}

impl DynamicStore for SystemStore {
    fn name(&self) -> &str {
        "system"
    }

    fn copy_value(&self, key: &str) -> Result<Option<Value>> {
        let cf_key = CFString::from_str(key);
        // SAFETY: session and key are live CF objects
        let value = unsafe { SCDynamicStore::value(Some(&self.session), &cf_key) };
        let Some(value) = value else {
            debug!("No value for {}", key);
            return Ok(None);
        };
        convert(&value).map(Some).ok_or_else(|| StoreError::Malformed {
            key: key.to_string(),
            reason: "value is not a property list".to_string(),
        })
    }
}

/// Deep-copy a property list into an owned [`Value`]
fn convert(cf: &CFType) -> Option<Value> {
    if let Some(string) = cf.downcast_ref::<CFString>() {
        return Some(Value::String(string.to_string()));
    }
    if let Some(boolean) = cf.downcast_ref::<CFBoolean>() {
        return Some(Value::Boolean(boolean.as_bool()));
    }
    if let Some(number) = cf.downcast_ref::<CFNumber>() {
        return if number.is_float_type() {
            number.as_f64().map(Value::Real)
        } else {
            number.as_i64().map(Value::Integer)
        };
    }
    if let Some(data) = cf.downcast_ref::<CFData>() {
        return Some(Value::Data(data.to_vec()));
    }
    if let Some(array) = cf.downcast_ref::<CFArray>() {
        return (0..array.count())
            .map(|index| {
                // SAFETY: index is in bounds; property list arrays hold CF objects
                unsafe { element(array.value_at_index(index)) }.and_then(convert)
            })
            .collect::<Option<Vec<_>>>()
            .map(Value::Array);
    }
    if let Some(dict) = cf.downcast_ref::<CFDictionary>() {
        let count = usize::try_from(dict.count()).ok()?;
        let mut keys: Vec<*const c_void> = vec![ptr::null(); count];
        let mut values: Vec<*const c_void> = vec![ptr::null(); count];
        // SAFETY: both buffers hold `count` slots
        unsafe { dict.keys_and_values(keys.as_mut_ptr(), values.as_mut_ptr()) };

        let mut entries = Dictionary::new();
        for (key, value) in keys.into_iter().zip(values) {
            // SAFETY: entries borrowed from a live dictionary
            let key = unsafe { element(key) }?.downcast_ref::<CFString>()?;
            let value = unsafe { element(value) }?;
            entries.insert(key.to_string(), convert(value)?);
        }
        return Some(Value::Dictionary(entries));
    }
    None
}

/// # Safety
/// `item` must be null or point to a CF object that outlives `'a`.
unsafe fn element<'a>(item: *const c_void) -> Option<&'a CFType> {
    (item as *const CFType).as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;

    #[test]
    fn test_string_keeps_interior_nul() {
        let cf = CFString::from_str("Workstation\u{0}7 \u{2603}");
        assert_eq!(convert(&cf), Some(Value::from("Workstation\u{0}7 \u{2603}")));
    }

    #[test]
    fn test_number_conversion() {
        assert_eq!(convert(&CFNumber::new_i64(8080)), Some(Value::Integer(8080)));
        assert_eq!(convert(&CFNumber::new_f64(0.5)), Some(Value::Real(0.5)));
    }

    #[test]
    fn test_unknown_key_is_absent() {
        let store = SystemStore::new("dynamic-store-tests").unwrap();
        let value = store
            .copy_value(&keys::state_key("/DynamicStoreTests/NoSuchKey"))
            .unwrap();
        assert_eq!(value, None);
    }
}
