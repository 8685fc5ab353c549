//! Hook Dispatcher
//!
//! Priority-ordered extension points shared by every pipeline stage:
//!
//! - **Actions** notify: callbacks run in priority order, return values are ignored
//! - **Filters** transform: a value is piped through every callback in priority
//!   order and the last return value wins
//!
//! Callbacks with equal priority run in registration order. External modules
//! rely on this to compose edits to the same stage, so the sort is stable.
//!
//! Filters are typed. A filter registered for `String` only takes part in
//! `apply_filters::<String>`; a call with any other value type treats it as a
//! failed callback.
//!
//! # Example
//!
//! ```rust
//! use larabuilder_core::hooks::{HookArgs, HookDispatcher};
//!
//! let mut hooks = HookDispatcher::new();
//! hooks.add_filter("html.generated", 10, |html: String, _args: &HookArgs<'_>| {
//!     Ok(format!("{html}<!-- rendered -->"))
//! });
//!
//! let out = hooks
//!     .apply_filters("html.generated", "<p>hi</p>".to_string(), &HookArgs::default())
//!     .unwrap();
//! assert_eq!(out, "<p>hi</p><!-- rendered -->");
//! ```

pub mod names;

use crate::models::{BlockNode, CanvasSettings, Document, RenderContext};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Priority used when the caller has no preference
pub const DEFAULT_PRIORITY: i32 = 20;

/// Hook callback failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HookError {
    /// Callback returned an error
    #[error("Callback on '{hook}' failed: {reason}")]
    CallbackFailed { hook: String, reason: String },

    /// Callback panicked
    #[error("Callback on '{hook}' panicked")]
    CallbackPanicked { hook: String },

    /// Filter was registered for a different value type
    #[error("Filter on '{hook}' expects a different value type than {expected}")]
    TypeMismatch { hook: String, expected: &'static str },
}

impl HookError {
    /// Error for a callback to return when it cannot produce a value
    pub fn callback_failed(hook: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CallbackFailed {
            hook: hook.into(),
            reason: reason.into(),
        }
    }
}

/// What happens when a callback fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookErrorPolicy {
    /// Skip the failing callback and keep the value unchanged
    #[default]
    Isolate,
    /// Abort the chain and return the error
    Propagate,
}

/// Extra arguments handed to callbacks alongside the value being filtered.
///
/// Each pipeline stage fills in the fields it has; the rest stay `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HookArgs<'a> {
    pub document: Option<&'a Document>,
    pub node: Option<&'a BlockNode>,
    pub context: Option<&'a RenderContext>,
    pub canvas: Option<&'a CanvasSettings>,
}

/// Registration handle returned by `add_action`/`add_filter`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

type ActionCallback = dyn Fn(&HookArgs<'_>) -> Result<(), HookError> + Send + Sync;
type FilterCallback<T> = dyn Fn(T, &HookArgs<'_>) -> Result<T, HookError> + Send + Sync;

struct Registration<C: ?Sized> {
    id: HookId,
    priority: i32,
    callback: Box<C>,
}

type FilterList = Vec<Registration<dyn Any + Send + Sync>>;
type ActionList = Vec<Registration<ActionCallback>>;

/// Insert keeping the list sorted by priority; equal priorities keep
/// registration order.
fn insert_sorted<C: ?Sized>(list: &mut Vec<Registration<C>>, registration: Registration<C>) {
    let position = list.partition_point(|r| r.priority <= registration.priority);
    list.insert(position, registration);
}

fn remove_registration<C: ?Sized>(list: &mut Vec<Registration<C>>, id: HookId, priority: i32) -> bool {
    let before = list.len();
    list.retain(|r| !(r.id == id && r.priority == priority));
    list.len() != before
}

static NEXT_HOOK_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> HookId {
    HookId(NEXT_HOOK_ID.fetch_add(1, Ordering::Relaxed))
}

/// Registry of actions and filters.
///
/// Populated during bootstrap through `&mut self`, then shared read-only
/// (typically behind an `Arc`) by concurrent renders.
#[derive(Default)]
pub struct HookDispatcher {
    actions: HashMap<String, ActionList>,
    filters: HashMap<String, FilterList>,
    policy: HookErrorPolicy,
}

impl HookDispatcher {
    /// Create an empty dispatcher with the isolating error policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dispatcher with the given error policy
    pub fn with_policy(policy: HookErrorPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> HookErrorPolicy {
        self.policy
    }

    /// Register an action callback
    pub fn add_action<F>(&mut self, name: impl Into<String>, priority: i32, callback: F) -> HookId
    where
        F: Fn(&HookArgs<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let id = next_id();
        let list = self.actions.entry(name.into()).or_default();
        insert_sorted(
            list,
            Registration {
                id,
                priority,
                callback: Box::new(callback) as Box<ActionCallback>,
            },
        );
        id
    }

    /// Register a filter callback for values of type `T`
    pub fn add_filter<T, F>(&mut self, name: impl Into<String>, priority: i32, callback: F) -> HookId
    where
        T: 'static,
        F: Fn(T, &HookArgs<'_>) -> Result<T, HookError> + Send + Sync + 'static,
    {
        let id = next_id();
        let typed: Box<FilterCallback<T>> = Box::new(callback);
        let list = self.filters.entry(name.into()).or_default();
        insert_sorted(
            list,
            Registration {
                id,
                priority,
                callback: Box::new(typed) as Box<dyn Any + Send + Sync>,
            },
        );
        id
    }

    /// Unregister an action by handle and priority
    pub fn remove_action(&mut self, name: &str, id: HookId, priority: i32) -> bool {
        self.actions
            .get_mut(name)
            .map(|list| remove_registration(list, id, priority))
            .unwrap_or(false)
    }

    /// Unregister a filter by handle and priority
    pub fn remove_filter(&mut self, name: &str, id: HookId, priority: i32) -> bool {
        self.filters
            .get_mut(name)
            .map(|list| remove_registration(list, id, priority))
            .unwrap_or(false)
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.get(name).is_some_and(|l| !l.is_empty())
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.get(name).is_some_and(|l| !l.is_empty())
    }

    pub fn filter_count(&self, name: &str) -> usize {
        self.filters.get(name).map_or(0, Vec::len)
    }

    /// Invoke every action registered under `name` in priority order
    pub fn do_action(&self, name: &str, args: &HookArgs<'_>) -> Result<(), HookError> {
        self.do_action_with(self.policy, name, args)
    }

    /// `do_action` under an explicit error policy instead of the dispatcher's
    pub fn do_action_with(
        &self,
        policy: HookErrorPolicy,
        name: &str,
        args: &HookArgs<'_>,
    ) -> Result<(), HookError> {
        let Some(list) = self.actions.get(name) else {
            return Ok(());
        };

        for registration in list {
            let outcome = catch_unwind(AssertUnwindSafe(|| (registration.callback)(args)))
                .unwrap_or_else(|_| {
                    Err(HookError::CallbackPanicked {
                        hook: name.to_string(),
                    })
                });

            if let Err(e) = outcome {
                handle_failure(policy, name, e)?;
            }
        }
        Ok(())
    }

    /// Pipe `value` through every filter registered under `name`.
    ///
    /// Returns the input unchanged when nothing is registered.
    pub fn apply_filters<T>(&self, name: &str, value: T, args: &HookArgs<'_>) -> Result<T, HookError>
    where
        T: Clone + 'static,
    {
        self.apply_filters_with(self.policy, name, value, args)
    }

    /// `apply_filters` under an explicit error policy instead of the dispatcher's
    pub fn apply_filters_with<T>(
        &self,
        policy: HookErrorPolicy,
        name: &str,
        value: T,
        args: &HookArgs<'_>,
    ) -> Result<T, HookError>
    where
        T: Clone + 'static,
    {
        let Some(list) = self.filters.get(name) else {
            return Ok(value);
        };

        let mut current = value;
        for registration in list {
            let Some(callback) = registration.callback.downcast_ref::<Box<FilterCallback<T>>>() else {
                handle_failure(
                    policy,
                    name,
                    HookError::TypeMismatch {
                        hook: name.to_string(),
                        expected: std::any::type_name::<T>(),
                    },
                )?;
                continue;
            };

            let snapshot = current.clone();
            let outcome = catch_unwind(AssertUnwindSafe(|| callback(snapshot, args)))
                .unwrap_or_else(|_| {
                    Err(HookError::CallbackPanicked {
                        hook: name.to_string(),
                    })
                });

            match outcome {
                Ok(next) => current = next,
                Err(e) => handle_failure(policy, name, e)?,
            }
        }
        Ok(current)
    }
}

fn handle_failure(policy: HookErrorPolicy, name: &str, error: HookError) -> Result<(), HookError> {
    match policy {
        HookErrorPolicy::Isolate => {
            tracing::warn!(hook = name, "Skipping failed hook callback: {}", error);
            Ok(())
        }
        HookErrorPolicy::Propagate => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn args() -> HookArgs<'static> {
        HookArgs::default()
    }

    #[test]
    fn test_no_filters_returns_input() {
        let hooks = HookDispatcher::new();
        let out = hooks.apply_filters("html.block", "<p>x</p>".to_string(), &args()).unwrap();
        assert_eq!(out, "<p>x</p>");
    }

    #[test]
    fn test_filters_run_in_priority_order() {
        let mut hooks = HookDispatcher::new();
        hooks.add_filter("t", 20, |s: String, _: &HookArgs<'_>| Ok(format!("{s}B")));
        hooks.add_filter("t", 10, |s: String, _: &HookArgs<'_>| Ok(format!("{s}A")));
        hooks.add_filter("t", 30, |s: String, _: &HookArgs<'_>| Ok(format!("{s}C")));

        assert_eq!(hooks.apply_filters("t", String::new(), &args()).unwrap(), "ABC");
    }

    #[test]
    fn test_equal_priority_keeps_registration_order() {
        let mut hooks = HookDispatcher::new();
        for tag in ["1", "2", "3"] {
            hooks.add_filter("t", DEFAULT_PRIORITY, move |s: String, _: &HookArgs<'_>| {
                Ok(format!("{s}{tag}"))
            });
        }
        assert_eq!(hooks.apply_filters("t", String::new(), &args()).unwrap(), "123");
    }

    #[test]
    fn test_remove_filter_requires_matching_priority() {
        let mut hooks = HookDispatcher::new();
        let a = hooks.add_filter("t", 10, |s: String, _: &HookArgs<'_>| Ok(format!("{s}A")));
        hooks.add_filter("t", 20, |s: String, _: &HookArgs<'_>| Ok(format!("{s}B")));

        assert!(!hooks.remove_filter("t", a, 20));
        assert_eq!(hooks.filter_count("t"), 2);

        assert!(hooks.remove_filter("t", a, 10));
        assert_eq!(hooks.apply_filters("t", String::new(), &args()).unwrap(), "B");
        assert!(!hooks.remove_filter("missing", a, 10));
    }

    #[test]
    fn test_failed_filter_is_isolated() {
        let mut hooks = HookDispatcher::new();
        hooks.add_filter("t", 10, |s: String, _: &HookArgs<'_>| Ok(format!("{s}A")));
        hooks.add_filter("t", 15, |_: String, _: &HookArgs<'_>| {
            Err(HookError::callback_failed("t", "boom"))
        });
        hooks.add_filter("t", 20, |s: String, _: &HookArgs<'_>| Ok(format!("{s}B")));

        assert_eq!(hooks.apply_filters("t", String::new(), &args()).unwrap(), "AB");
    }

    #[test]
    fn test_panicking_filter_is_isolated() {
        let mut hooks = HookDispatcher::new();
        hooks.add_filter("t", 10, |_: String, _: &HookArgs<'_>| -> Result<String, HookError> {
            panic!("extension bug")
        });
        hooks.add_filter("t", 20, |s: String, _: &HookArgs<'_>| Ok(format!("{s}!")));

        assert_eq!(hooks.apply_filters("t", "x".to_string(), &args()).unwrap(), "x!");
    }

    #[test]
    fn test_propagate_policy_returns_error() {
        let mut hooks = HookDispatcher::with_policy(HookErrorPolicy::Propagate);
        hooks.add_filter("t", 10, |_: String, _: &HookArgs<'_>| {
            Err(HookError::callback_failed("t", "boom"))
        });

        let err = hooks.apply_filters("t", String::new(), &args()).unwrap_err();
        assert!(matches!(err, HookError::CallbackFailed { .. }));
    }

    #[test]
    fn test_explicit_policy_overrides_dispatcher() {
        let mut hooks = HookDispatcher::new();
        hooks.add_filter("t", 10, |_: String, _: &HookArgs<'_>| {
            Err(HookError::callback_failed("t", "boom"))
        });

        let out = hooks.apply_filters("t", "kept".to_string(), &args()).unwrap();
        assert_eq!(out, "kept");
        assert!(hooks
            .apply_filters_with(HookErrorPolicy::Propagate, "t", String::new(), &args())
            .is_err());
    }

    #[test]
    fn test_type_mismatch_is_skipped() {
        let mut hooks = HookDispatcher::new();
        hooks.add_filter("t", 10, |n: u32, _: &HookArgs<'_>| Ok(n + 1));
        hooks.add_filter("t", 20, |s: String, _: &HookArgs<'_>| Ok(format!("{s}!")));

        assert_eq!(hooks.apply_filters("t", "x".to_string(), &args()).unwrap(), "x!");
        assert_eq!(hooks.apply_filters("t", 1u32, &args()).unwrap(), 2);
    }

    #[test]
    fn test_actions_run_in_order_and_are_removable() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = HookDispatcher::new();

        let s = seen.clone();
        hooks.add_action("render.started", 20, move |_| {
            s.lock().unwrap().push("late");
            Ok(())
        });
        let s = seen.clone();
        let early = hooks.add_action("render.started", 5, move |_| {
            s.lock().unwrap().push("early");
            Ok(())
        });

        hooks.do_action("render.started", &args()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["early", "late"]);

        assert!(hooks.remove_action("render.started", early, 5));
        seen.lock().unwrap().clear();
        hooks.do_action("render.started", &args()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["late"]);
    }

    #[test]
    fn test_has_hooks() {
        let mut hooks = HookDispatcher::new();
        assert!(!hooks.has_filter("t"));
        let id = hooks.add_filter("t", 10, |s: String, _: &HookArgs<'_>| Ok(s));
        assert!(hooks.has_filter("t"));
        hooks.remove_filter("t", id, 10);
        assert!(!hooks.has_filter("t"));
        assert!(!hooks.has_action("t"));
    }
}
