//! Scope management for local overlays.
//!
//! Active scopes live in a thread-local registry keyed by [`ScopeId`]. Entering
//! a scope returns a [`ScopeGuard`]; the local cache is created by the first
//! guard and discarded when the last guard for that id is dropped, whether the
//! work inside returned normally, bailed out early with `?` or panicked.
//!
//! A guard cannot leave the thread that created it, so two threads never share
//! a local cache.

use super::LocalCache;
use std::{
	cell::RefCell,
	collections::HashMap,
	marker::PhantomData,
	sync::atomic::{AtomicU64, Ordering},
};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies the local cache of one overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

impl ScopeId {
	/// Allocates an id that is unique within the process.
	#[must_use]
	pub fn new() -> Self {
		Self(NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for ScopeId {
	fn default() -> Self {
		Self::new()
	}
}

#[derive(Debug)]
struct ActiveScope {
	depth: usize,
	cache: LocalCache,
}

thread_local! {
	static SCOPES: RefCell<HashMap<ScopeId, ActiveScope>> = RefCell::new(HashMap::new());
}

/// Keeps a local scope open until dropped.
#[must_use = "the local scope closes as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ScopeGuard {
	id: ScopeId,
	_thread_bound: PhantomData<*const ()>,
}

impl ScopeGuard {
	pub fn id(&self) -> ScopeId {
		self.id
	}
}

impl Drop for ScopeGuard {
	fn drop(&mut self) {
		// The registry is already gone if the thread is shutting down.
		let _ = SCOPES.try_with(|scopes| {
			let mut scopes = scopes.borrow_mut();
			let Some(scope) = scopes.get_mut(&self.id) else {
				return;
			};
			scope.depth = scope.depth.saturating_sub(1);
			if scope.depth == 0
				&& let Some(scope) = scopes.remove(&self.id)
			{
				log::debug!(
					"closed local cache scope {:?}, discarded {} entries",
					self.id,
					scope.cache.len()
				);
			}
		});
	}
}

/// Opens (or re-enters) the scope for `id` on the current thread.
///
/// Nested calls reuse the open local cache; only the outermost guard tears it down.
pub fn enter(id: ScopeId) -> ScopeGuard {
	SCOPES.with_borrow_mut(|scopes| {
		let scope = scopes.entry(id).or_insert_with(|| {
			log::debug!("opened local cache scope {id:?}");
			ActiveScope {
				depth: 0,
				cache: LocalCache::new(),
			}
		});
		scope.depth += 1;
	});
	ScopeGuard {
		id,
		_thread_bound: PhantomData,
	}
}

pub fn is_active(id: ScopeId) -> bool {
	SCOPES.with_borrow(|scopes| scopes.contains_key(&id))
}

/// Number of guards currently holding the scope open.
pub fn depth(id: ScopeId) -> usize {
	SCOPES.with_borrow(|scopes| scopes.get(&id).map_or(0, |scope| scope.depth))
}

/// Runs `f` on the local cache of `id`, or returns `None` if no scope is open.
///
/// `f` must not call back into a store: the registry stays borrowed while it runs.
pub(crate) fn with_local<R>(id: ScopeId, f: impl FnOnce(&mut LocalCache) -> R) -> Option<R> {
	SCOPES.with_borrow_mut(|scopes| scopes.get_mut(&id).map(|scope| f(&mut scope.cache)))
}
