//! Async wrappers for use inside a tokio runtime.
//! Each query runs on the blocking pool since the store calls block.

use crate::encoding::StringEncoding;
use crate::proxies::ProxySettings;
use crate::specific::{self, Gid, Uid};
use crate::Session;
use tracing::warn;

async fn run_blocking<T, F>(operation: &'static str, query: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> Option<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(query).await {
        Ok(value) => value,
        Err(e) => {
            warn!("{} task failed: {}", operation, e);
            None
        }
    }
}

/// Computer name together with its encoding
pub async fn copy_computer_name(session: Option<Session>) -> Option<(String, StringEncoding)> {
    run_blocking("copy_computer_name", move || {
        let mut encoding = StringEncoding::default();
        specific::copy_computer_name(session.as_ref(), Some(&mut encoding))
            .map(|name| (name, encoding))
    })
    .await
}

/// Console user name with uid and gid
pub async fn copy_console_user(session: Option<Session>) -> Option<(String, Uid, Gid)> {
    run_blocking("copy_console_user", move || {
        let (mut uid, mut gid) = (0, 0);
        specific::copy_console_user(session.as_ref(), Some(&mut uid), Some(&mut gid))
            .map(|name| (name, uid, gid))
    })
    .await
}

pub async fn copy_local_host_name(session: Option<Session>) -> Option<String> {
    run_blocking("copy_local_host_name", move || {
        specific::copy_local_host_name(session.as_ref())
    })
    .await
}

pub async fn copy_location(session: Option<Session>) -> Option<String> {
    run_blocking("copy_location", move || specific::copy_location(session.as_ref())).await
}

pub async fn copy_proxies(session: Option<Session>) -> Option<ProxySettings> {
    run_blocking("copy_proxies", move || specific::copy_proxies(session.as_ref())).await
}
