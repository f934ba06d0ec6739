/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! A type-map of configuration values attached to a request.
//!
//! Each middleware stage reads the values it needs (region, credentials, metrics...) from the bag
//! and may write values for later stages.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasherDefault, Hasher};
use std::sync::{Mutex, MutexGuard};

type AnyMap = HashMap<TypeId, Box<dyn Any + Send + Sync>, BuildHasherDefault<IdHasher>>;

// With TypeIds as keys, there's no need to hash them. They are already hashes
// themselves, coming from the compiler. The IdHasher just holds the u64 of
// the TypeId, and then returns it, instead of doing any bit fiddling.
#[derive(Default)]
struct IdHasher(u64);

impl Hasher for IdHasher {
    fn write(&mut self, _: &[u8]) {
        unreachable!("TypeId calls write_u64");
    }

    #[inline]
    fn write_u64(&mut self, id: u64) {
        self.0 = id;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

#[derive(Default)]
pub struct PropertyBag {
    map: AnyMap,
}

impl PropertyBag {
    pub fn new() -> PropertyBag {
        PropertyBag {
            map: AnyMap::default(),
        }
    }

    /// Insert a type into this `PropertyBag`.
    ///
    /// If a value of this type already existed, it will be returned.
    pub fn insert<T: Send + Sync + 'static>(&mut self, val: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(val))
            .and_then(|boxed| (boxed as Box<dyn Any + 'static>).downcast().ok().map(|boxed| *boxed))
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|boxed| (&**boxed as &(dyn Any + 'static)).downcast_ref())
    }

    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| (&mut **boxed as &mut (dyn Any + 'static)).downcast_mut())
    }

    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.map.remove(&TypeId::of::<T>()).and_then(|boxed| {
            (boxed as Box<dyn Any + 'static>)
                .downcast()
                .ok()
                .map(|boxed| *boxed)
        })
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

/// Locks a shared bag, recovering it if a middleware panicked while holding the lock
pub fn lock(properties: &Mutex<PropertyBag>) -> MutexGuard<'_, PropertyBag> {
    properties
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl fmt::Debug for PropertyBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBag")
            .field("entries", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::PropertyBag;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_extensions() {
        #[derive(Debug, PartialEq)]
        struct MyType(i32);

        let mut property_bag = PropertyBag::new();

        property_bag.insert(5i32);
        property_bag.insert(MyType(10));

        assert_eq!(property_bag.get(), Some(&5i32));
        assert_eq!(property_bag.get_mut(), Some(&mut 5i32));

        assert_eq!(property_bag.remove::<i32>(), Some(5i32));
        assert!(property_bag.get::<i32>().is_none());

        assert_eq!(property_bag.get::<bool>(), None);
        assert_eq!(property_bag.get(), Some(&MyType(10)));
    }

    #[test]
    fn poisoned_bag_stays_usable() {
        let bag = Arc::new(Mutex::new(PropertyBag::new()));
        let poisoner = bag.clone();
        let _ = std::thread::spawn(move || {
            let mut guard = poisoner.lock().unwrap();
            guard.insert(7u32);
            panic!("middleware panicked while holding the bag");
        })
        .join();
        assert!(bag.is_poisoned());
        let mut properties = super::lock(&bag);
        assert_eq!(properties.get::<u32>(), Some(&7));
        properties.insert(8u32);
        assert_eq!(properties.get::<u32>(), Some(&8));
    }
}
