// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Configuration Push Sink
//
// Nebo pushes settings updates through the Configure rpc present on every
// capability service. All services share one process-wide callback.
//
// Concurrency contract: the callback is invoked directly from whichever call
// delivered the push, with no serialization. Pushes arriving on different
// services at the same time enter the callback concurrently, hence the
// `Fn + Send + Sync` bound. Callbacks that mutate state must lock it
// themselves.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Settings pushed by Nebo: flat string-to-string map
pub type Settings = HashMap<String, String>;

/// Process-wide configuration callback
pub type ConfigureHook = Arc<dyn Fn(Settings) + Send + Sync>;

/// Shared sink for configuration pushes
#[derive(Clone, Default)]
pub struct ConfigSink {
    hook: Option<ConfigureHook>,
}

impl ConfigSink {
    pub fn new(hook: Option<ConfigureHook>) -> Self {
        Self { hook }
    }

    /// Deliver a push. Returns whether a callback was registered to receive it.
    ///
    /// Fire-and-forget: the callback cannot report failure to the caller.
    pub fn push(&self, settings: Settings) -> bool {
        match &self.hook {
            Some(hook) => {
                debug!(keys = settings.len(), "Delivering configuration push");
                hook(settings);
                true
            }
            None => {
                debug!("Configuration push ignored: no callback registered");
                false
            }
        }
    }

    pub fn is_set(&self) -> bool {
        self.hook.is_some()
    }
}

impl fmt::Debug for ConfigSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSink")
            .field("hook", &self.hook.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_push_without_hook_is_ignored() {
        let sink = ConfigSink::default();
        assert!(!sink.is_set());
        assert!(!sink.push(Settings::new()));
    }

    #[test]
    fn test_push_invokes_hook_with_map() {
        let seen: Arc<Mutex<Vec<Settings>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let sink = ConfigSink::new(Some(Arc::new(move |s: Settings| {
            seen_clone.lock().unwrap().push(s);
        })));

        let settings = Settings::from([("api_key".to_string(), "secret".to_string())]);
        assert!(sink.push(settings.clone()));

        assert_eq!(*seen.lock().unwrap(), vec![settings]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_pushes_are_all_delivered() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let sink = ConfigSink::new(Some(Arc::new(move |s: Settings| {
            if let Some(v) = s.get("n") {
                seen_clone.lock().unwrap().push(v.clone());
            }
        })));

        let mut handles = Vec::new();
        for i in 0..32 {
            let sink = sink.clone();
            handles.push(tokio::spawn(async move {
                sink.push(Settings::from([("n".to_string(), i.to_string())]))
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        let mut seen = seen.lock().unwrap().clone();
        seen.sort_by_key(|v| v.parse::<u32>().unwrap());
        let expected: Vec<String> = (0..32).map(|i| i.to_string()).collect();
        assert_eq!(seen, expected);
    }
}
