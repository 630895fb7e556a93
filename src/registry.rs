//! Interning variable names to ids
//!
//! There's one registry per solve.  It's threaded by `&mut` through every
//! level of formula expansion, so a name that shows up in several nested
//! formulas still ends up as a single variable.

use crate::data::VarId;
use crate::vec_map::VecMap;
use indexmap::IndexMap;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Origin {
    /// Written by the user somewhere in the expansion tree
    Named,
    /// Made up during expansion, and never shown to the user
    Auxiliary,
}

/// A bijection between user names and ids, plus auxiliary variables that
/// have no name a user can refer to
///
/// Ids are dense over both kinds: `1..=len`.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// User names only, in id order
    ids: IndexMap<String, VarId>,
    /// Display name of every variable; for auxiliaries it's only a label
    labels: VecMap<VarId, String>,
    origins: VecMap<VarId, Origin>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variables, which is also the largest id handed out
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The id for this name, allocating the next one if it's new
    ///
    /// Never returns an auxiliary, even if the name matches its label.
    pub fn intern(&mut self, name: &str) -> VarId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.allocate(name.to_owned(), Origin::Named);
        self.ids.insert(name.to_owned(), id);
        id
    }

    /// A brand new variable, outside the name namespace
    pub fn intern_auxiliary(&mut self, label: &str) -> VarId {
        let label = format!("{}#{}", label, self.len() + 1);
        self.allocate(label, Origin::Auxiliary)
    }

    fn allocate(&mut self, label: String, origin: Origin) -> VarId {
        let id = VarId::new(self.len() as u32 + 1);
        log::trace!("Interned {:?} ({:?}) as {:?}", label, origin, id);
        self.labels.push(label);
        self.origins.push(origin);
        id
    }

    /// Only finds user-visible variables
    pub fn id_of(&self, name: &str) -> Option<VarId> {
        self.ids.get(name).copied()
    }

    pub fn name_of(&self, id: VarId) -> Option<&str> {
        if id.0 == 0 {
            return None;
        }
        self.labels.get(id).map(String::as_str)
    }

    pub fn is_auxiliary(&self, id: VarId) -> bool {
        id.0 != 0 && self.origins.get(id) == Some(&Origin::Auxiliary)
    }

    /// All ids, in allocation order
    pub fn vars(&self) -> impl Iterator<Item = VarId> {
        (1..=self.len() as u32).map(VarId::new)
    }

    /// The user-visible variables and their names, in id order
    pub fn iter(&self) -> impl Iterator<Item = (VarId, &str)> + '_ {
        self.ids.iter().map(|(name, &id)| (id, name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_first_use_ordered() {
        let mut reg = Registry::new();
        assert_eq!(reg.intern("b"), VarId(1));
        assert_eq!(reg.intern("a"), VarId(2));
        assert_eq!(reg.intern("b"), VarId(1));
        assert_eq!(reg.intern("c"), VarId(3));
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.name_of(VarId(2)), Some("a"));
        assert_eq!(reg.name_of(VarId(4)), None);
        assert_eq!(reg.name_of(VarId(0)), None);
    }

    #[test]
    fn auxiliaries_are_hidden() {
        let mut reg = Registry::new();
        let x = reg.intern("x");
        let t = reg.intern_auxiliary("x");
        assert_ne!(x, t);
        assert!(reg.is_auxiliary(t));
        assert!(!reg.is_auxiliary(x));
        let name = reg.name_of(t).unwrap().to_owned();
        assert_eq!(reg.id_of(&name), None);
        assert_eq!(reg.iter().map(|(_, n)| n).collect::<Vec<_>>(), ["x"]);
        assert_eq!(reg.vars().count(), 2);
    }

    #[test]
    fn user_name_matching_an_auxiliary_label_is_its_own_variable() {
        let mut reg = Registry::new();
        let t = reg.intern_auxiliary("r");
        let label = reg.name_of(t).unwrap().to_owned();
        assert_eq!(label, "r#1");

        let r = reg.intern(&label);
        assert_ne!(r, t);
        assert!(!reg.is_auxiliary(r));
        assert_eq!(reg.id_of(&label), Some(r));
        assert_eq!(reg.intern(&label), r);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.iter().collect::<Vec<_>>(), [(r, "r#1")]);
    }
}
