//! # IDs
//! Layers, subscriptions, and anything else that needs a stable handle get an `EditorID<T>`,
//! namespaced by the type `T`. IDs are unique for the lifetime of the process and are never reused,
//! even after the object they named is destroyed.
//!
//! Get a fresh ID through `EditorID`'s `Default` impl.

// Next free value per namespace. Entries are only ever inserted, so the write lock is
// taken at most once per namespace for the life of the process.
static ID_SERVER: parking_lot::RwLock<
    std::collections::BTreeMap<std::any::TypeId, std::sync::atomic::AtomicU64>,
> = parking_lot::const_rwlock(std::collections::BTreeMap::new());

/// ID that is unique within this execution of the program.
/// IDs of different namespaces may share a numeric value but never compare equal, as they are distinct types.
pub struct EditorID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    _namespace: std::marker::PhantomData<fn() -> T>,
}
impl<T: std::any::Any> Clone for EditorID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for EditorID<T> {}
impl<T: std::any::Any> PartialEq for EditorID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for EditorID<T> {}
impl<T: std::any::Any> PartialOrd for EditorID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
/// Ordering is by allocation, but carries no other meaning.
impl<T: std::any::Any> Ord for EditorID<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}
impl<T: std::any::Any> std::hash::Hash for EditorID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: std::any::Any> EditorID<T> {
    /// Get the raw numeric value of this ID.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id.get()
    }
    fn allocate() -> Self {
        let ty = std::any::TypeId::of::<T>();
        let value = {
            let read = ID_SERVER.upgradable_read();
            if let Some(counter) = read.get(&ty) {
                counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            } else {
                let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
                // Zero is the niche. Hand out 1 now, 2 is next.
                write.insert(ty, 2.into());
                1
            }
        };
        // A u64 counter bumped once per allocation will not wrap in practice, but
        // wrapping to zero would alias the first ID, so refuse to continue.
        let Some(id) = std::num::NonZeroU64::new(value) else {
            log::error!("{} ID space exhausted", std::any::type_name::<T>());
            panic!("{} ID space exhausted", std::any::type_name::<T>());
        };
        Self {
            id,
            _namespace: std::marker::PhantomData,
        }
    }
}
impl<T: std::any::Any> Default for EditorID<T> {
    fn default() -> Self {
        Self::allocate()
    }
}
impl<T: std::any::Any> std::fmt::Display for EditorID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let full = std::any::type_name::<T>();
        let short = full.rsplit("::").next().unwrap_or(full);
        write!(f, "{short}#{}", self.id)
    }
}
impl<T: std::any::Any> std::fmt::Debug for EditorID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
