#![forbid(unsafe_code)]

//! Property containers.
//!
//! [`PropertiesSet`] is the container a description or collector fills:
//! it enforces the put/add discipline per kind and instance uniqueness.
//! [`PropertiesList`] is the flattened view the aggregate exposes, where
//! only instance uniqueness applies.

use std::collections::HashMap;
use std::rc::Rc;
use xades_core::{Error, InsertionPolicy, PropertyKind};

/// Common view over every qualifying property.
pub trait Property {
    fn kind(&self) -> PropertyKind;

    fn name(&self) -> &str {
        self.kind().name()
    }

    fn is_signed(&self) -> bool {
        self.kind().is_signed()
    }

    fn is_signature_level(&self) -> bool {
        self.kind().is_signature_level()
    }
}

/// A cheap handle to a property instance.
///
/// Two handles are the same instance when they point at the same
/// allocation, regardless of payload equality.
pub trait PropertyInstance: Property + Clone {
    fn same_instance(&self, other: &Self) -> bool;
}

impl<P: Property + ?Sized> Property for Rc<P> {
    fn kind(&self) -> PropertyKind {
        (**self).kind()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: Property + ?Sized> PropertyInstance for Rc<P> {
    fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

/// Insertion-ordered property container with put/add semantics.
///
/// A per-kind count is kept alongside the entries so kind checks do not
/// scan the list.
#[derive(Debug, Clone)]
pub struct PropertiesSet<T> {
    entries: Vec<T>,
    kind_counts: HashMap<PropertyKind, usize>,
}

impl<T> Default for PropertiesSet<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            kind_counts: HashMap::new(),
        }
    }
}

impl<T: PropertyInstance> PropertiesSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `prop` as the only property of its kind.
    pub fn put(&mut self, prop: T) -> Result<(), Error> {
        let kind = prop.kind();
        if self.contains_kind(kind) {
            return Err(Error::DuplicatePropertyKind(kind));
        }
        self.push_entry(prop);
        Ok(())
    }

    /// Insert `prop` alongside any other properties of its kind.
    pub fn add(&mut self, prop: T) -> Result<(), Error> {
        if self.contains(&prop) {
            return Err(Error::DuplicateInstance(prop.kind()));
        }
        self.push_entry(prop);
        Ok(())
    }

    fn push_entry(&mut self, prop: T) {
        *self.kind_counts.entry(prop.kind()).or_insert(0) += 1;
        self.entries.push(prop);
    }

    /// `put` or `add`, following the kind's insertion policy.
    pub fn put_or_add(&mut self, prop: T) -> Result<(), Error> {
        match prop.kind().insertion_policy() {
            InsertionPolicy::Put => self.put(prop),
            InsertionPolicy::Add => self.add(prop),
        }
    }

    /// Remove exactly this instance.
    pub fn remove(&mut self, prop: &T) -> Result<(), Error> {
        let pos = self
            .entries
            .iter()
            .position(|p| p.same_instance(prop))
            .ok_or(Error::NotPresent(prop.kind()))?;
        let removed = self.entries.remove(pos);
        let kind = removed.kind();
        if let Some(count) = self.kind_counts.get_mut(&kind) {
            *count -= 1;
            if *count == 0 {
                self.kind_counts.remove(&kind);
            }
        }
        Ok(())
    }

    pub fn contains(&self, prop: &T) -> bool {
        self.entries.iter().any(|p| p.same_instance(prop))
    }

    pub fn contains_kind(&self, kind: PropertyKind) -> bool {
        self.kind_counts.contains_key(&kind)
    }

    /// Number of properties of `kind` held.
    pub fn count_of(&self, kind: PropertyKind) -> usize {
        self.kind_counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn of_kind(&self, kind: PropertyKind) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().filter(move |p| p.kind() == kind)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a PropertiesSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Ordered list of distinct property instances. Kinds may repeat freely.
#[derive(Debug, Clone)]
pub struct PropertiesList<T> {
    entries: Vec<T>,
}

impl<T> Default for PropertiesList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: PropertyInstance> PropertiesList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, prop: T) -> Result<(), Error> {
        if self.contains(&prop) {
            return Err(Error::DuplicateInstance(prop.kind()));
        }
        self.entries.push(prop);
        Ok(())
    }

    /// Append unless the instance is already listed. Returns whether it was
    /// appended.
    pub fn push_unique(&mut self, prop: T) -> bool {
        if self.contains(&prop) {
            return false;
        }
        self.entries.push(prop);
        true
    }

    pub fn contains(&self, prop: &T) -> bool {
        self.entries.iter().any(|p| p.same_instance(prop))
    }

    pub fn contains_kind(&self, kind: PropertyKind) -> bool {
        self.entries.iter().any(|p| p.kind() == kind)
    }

    pub fn of_kind(&self, kind: PropertyKind) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().filter(move |p| p.kind() == kind)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: PropertyInstance> FromIterator<T> for PropertiesList<T> {
    /// Collects distinct instances, keeping the first occurrence.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for prop in iter {
            list.push_unique(prop);
        }
        list
    }
}

impl<'a, T> IntoIterator for &'a PropertiesList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug)]
    struct Marker(PropertyKind);

    impl Property for Marker {
        fn kind(&self) -> PropertyKind {
            self.0
        }
    }

    fn marker(kind: PropertyKind) -> Rc<Marker> {
        Rc::new(Marker(kind))
    }

    #[test]
    fn test_put_rejects_second_of_kind() {
        let mut set = PropertiesSet::new();
        set.put(marker(PropertyKind::SigningTime)).unwrap();
        let err = set.put(marker(PropertyKind::SigningTime)).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicatePropertyKind(PropertyKind::SigningTime)
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_add_allows_kind_collision_but_not_same_instance() {
        let mut set = PropertiesSet::new();
        let a = marker(PropertyKind::CommitmentType);
        set.add(a.clone()).unwrap();
        set.add(marker(PropertyKind::CommitmentType)).unwrap();
        assert!(matches!(
            set.add(a.clone()),
            Err(Error::DuplicateInstance(PropertyKind::CommitmentType))
        ));
        assert_eq!(set.of_kind(PropertyKind::CommitmentType).count(), 2);
    }

    #[test]
    fn test_add_after_put_of_same_kind() {
        let mut set = PropertiesSet::new();
        set.put(marker(PropertyKind::DataObjectFormat)).unwrap();
        set.add(marker(PropertyKind::DataObjectFormat)).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_put_or_add_follows_policy() {
        let mut set = PropertiesSet::new();
        set.put_or_add(marker(PropertyKind::DataObjectFormat)).unwrap();
        assert!(set.put_or_add(marker(PropertyKind::DataObjectFormat)).is_err());
        set.put_or_add(marker(PropertyKind::SignatureTimeStamp)).unwrap();
        set.put_or_add(marker(PropertyKind::SignatureTimeStamp)).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut set = PropertiesSet::new();
        let a = marker(PropertyKind::SignerRole);
        set.put(a.clone()).unwrap();
        let look_alike = marker(PropertyKind::SignerRole);
        assert!(matches!(
            set.remove(&look_alike),
            Err(Error::NotPresent(PropertyKind::SignerRole))
        ));
        set.remove(&a).unwrap();
        assert!(set.is_empty());
        set.put(look_alike).unwrap();
    }

    #[test]
    fn test_kind_marker_clears_with_last_instance() {
        let mut set = PropertiesSet::new();
        let a = marker(PropertyKind::CommitmentType);
        let b = marker(PropertyKind::CommitmentType);
        set.add(a.clone()).unwrap();
        set.add(b.clone()).unwrap();
        assert_eq!(set.count_of(PropertyKind::CommitmentType), 2);

        set.remove(&a).unwrap();
        assert!(set.contains_kind(PropertyKind::CommitmentType));
        assert_eq!(set.count_of(PropertyKind::CommitmentType), 1);

        set.remove(&b).unwrap();
        assert!(!set.contains_kind(PropertyKind::CommitmentType));
        assert_eq!(set.count_of(PropertyKind::CommitmentType), 0);
        set.put(marker(PropertyKind::CommitmentType)).unwrap();
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut set = PropertiesSet::new();
        let kinds = [
            PropertyKind::SignerRole,
            PropertyKind::SigningTime,
            PropertyKind::SignatureProductionPlace,
        ];
        for kind in kinds {
            set.put(marker(kind)).unwrap();
        }
        let got: Vec<_> = set.iter().map(|p| p.kind()).collect();
        assert_eq!(got, kinds);
    }

    #[test]
    fn test_list_dedups_instances_only() {
        let a = marker(PropertyKind::DataObjectFormat);
        let b = marker(PropertyKind::DataObjectFormat);
        let list: PropertiesList<_> = vec![a.clone(), b, a.clone()].into_iter().collect();
        assert_eq!(list.len(), 2);
        let mut list = list;
        assert!(matches!(list.push(a), Err(Error::DuplicateInstance(_))));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(usize),
        Reinsert(usize),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..PropertyKind::VALUES.len()).prop_map(Op::Insert),
            any::<usize>().prop_map(Op::Reinsert),
            any::<usize>().prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_put_kinds_stay_unique_and_failures_change_nothing(
            ops in proptest::collection::vec(op(), 0..64)
        ) {
            let mut set = PropertiesSet::new();
            let mut created: Vec<Rc<Marker>> = Vec::new();
            for op in ops {
                let before: Vec<_> = set.iter().cloned().collect();
                let result = match op {
                    Op::Insert(i) => {
                        let p = marker(PropertyKind::VALUES[i]);
                        created.push(p.clone());
                        set.put_or_add(p)
                    }
                    Op::Reinsert(i) if !created.is_empty() => {
                        set.put_or_add(created[i % created.len()].clone())
                    }
                    Op::Remove(i) if !created.is_empty() => {
                        set.remove(&created[i % created.len()])
                    }
                    _ => Ok(()),
                };
                if result.is_err() {
                    let after: Vec<_> = set.iter().cloned().collect();
                    prop_assert_eq!(before.len(), after.len());
                    for (x, y) in before.iter().zip(after.iter()) {
                        prop_assert!(Rc::ptr_eq(x, y));
                    }
                }
            }
            for kind in PropertyKind::VALUES {
                let held = set.of_kind(kind).count();
                prop_assert_eq!(set.count_of(kind), held);
                prop_assert_eq!(set.contains_kind(kind), held > 0);
                if kind.insertion_policy() == InsertionPolicy::Put {
                    prop_assert!(held <= 1);
                }
            }
            for (i, a) in set.iter().enumerate() {
                for b in set.iter().skip(i + 1) {
                    prop_assert!(!Rc::ptr_eq(a, b));
                }
            }
        }
    }
}
